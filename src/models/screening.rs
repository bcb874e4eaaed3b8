//! Screening models
//!
//! Seats remaining is never stored; it is derived from screen capacity
//! minus the ticket counts of non-cancelled bookings, so every read and
//! every seat check agree on the same number.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Screening from database
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Screening {
    pub id: i64,
    pub movie_id: i64,
    pub screen_id: i64,
    pub showing_at: DateTime<Utc>,
}

/// Screening joined with its movie/screen names and the derived seat count,
/// as listed on booking and management pages.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ScreeningSummary {
    pub id: i64,
    pub movie_id: i64,
    pub movie_name: String,
    pub screen_id: i64,
    pub screen_name: String,
    pub showing_at: DateTime<Utc>,
    pub seats_remaining: i64,
}

impl ScreeningSummary {
    /// Day grouping key used by the per-movie screening tabs
    pub fn day(&self) -> String {
        self.showing_at.format("%d/%m/%Y").to_string()
    }

    /// Date formatting used on confirmation pages and in the
    /// notification payload
    pub fn long_date(&self) -> String {
        self.showing_at.format("%d %B %Y - %H:%M").to_string()
    }
}
