//! Booking model and status lifecycle

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

/// Booking lifecycle: owners may request a cancellation, cinema managers
/// approve (cancelled) or deny (back to active).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
pub enum BookingStatus {
    Active,
    CancelRequested,
    Cancelled,
}

impl BookingStatus {
    pub fn label(&self) -> &'static str {
        match self {
            BookingStatus::Active => "Active",
            BookingStatus::CancelRequested => "Cancellation requested",
            BookingStatus::Cancelled => "Cancelled",
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Booking from database. `user_id` and `club_id` are weak references:
/// anonymous customer bookings carry neither, customer bookings carry a
/// user only, club-rep bookings carry both.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Booking {
    pub id: i64,
    pub screening_id: i64,
    pub user_id: Option<i64>,
    pub club_id: Option<i64>,
    pub adult_tickets: i32,
    pub child_tickets: i32,
    pub student_tickets: i32,
    pub total_price: Decimal,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

/// Booking joined with its screening's movie/screen names, as shown on
/// transaction and management pages.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BookingSummary {
    pub id: i64,
    pub movie_name: String,
    pub screen_name: String,
    pub showing_at: DateTime<Utc>,
    pub adult_tickets: i32,
    pub child_tickets: i32,
    pub student_tickets: i32,
    pub total_price: Decimal,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

impl BookingSummary {
    pub fn total_tickets(&self) -> i32 {
        self.adult_tickets + self.child_tickets + self.student_tickets
    }

    pub fn showing_label(&self) -> String {
        self.showing_at.format("%d/%m/%Y %H:%M").to_string()
    }
}
