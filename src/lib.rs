//! UWEFlix - cinema booking and management web application.
//!
//! Customers browse screenings and book tickets, club representatives
//! make bulk bookings against a prepaid club balance, and cinema/account
//! managers run the catalog, clubs, approvals and monthly statements.

pub mod auth;
pub mod booking;
pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod notify;
pub mod qr;
pub mod routes;
pub mod statements;

use sqlx::PgPool;

use crate::cache::AppCache;
use crate::notify::Notifier;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub cache: AppCache,
    pub notifier: Notifier,
}
