//! Monthly statement generation
//!
//! Sums each club's non-cancelled bookings for the current calendar month
//! into one immutable statement row per club per month.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use sqlx::PgPool;

use crate::db;
use crate::error::Result;

/// The calendar month containing `now`: the statement period label (first
/// day of the month) and the half-open [from, until) booking window.
pub fn month_window(now: DateTime<Utc>) -> (NaiveDate, DateTime<Utc>, DateTime<Utc>) {
    let date = now.date_naive();
    let period = date.with_day(1).expect("day 1 exists in every month");
    let next = if period.month() == 12 {
        NaiveDate::from_ymd_opt(period.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(period.year(), period.month() + 1, 1)
    }
    .expect("first of month is always valid");

    (
        period,
        period.and_hms_opt(0, 0, 0).expect("midnight").and_utc(),
        next.and_hms_opt(0, 0, 0).expect("midnight").and_utc(),
    )
}

/// Generate statements for every club for the current month. Clubs that
/// already have one keep it; returns how many new statements were written.
pub async fn generate_for_current_month(pool: &PgPool) -> Result<u64> {
    let (period, from, until) = month_window(Utc::now());
    let created = db::generate_statements(pool, period, from, until).await?;
    tracing::info!(%period, created, "monthly statement run");
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_month_window_mid_month() {
        let now = Utc.with_ymd_and_hms(2023, 4, 17, 15, 30, 0).unwrap();
        let (period, from, until) = month_window(now);
        assert_eq!(period, NaiveDate::from_ymd_opt(2023, 4, 1).unwrap());
        assert_eq!(from, Utc.with_ymd_and_hms(2023, 4, 1, 0, 0, 0).unwrap());
        assert_eq!(until, Utc.with_ymd_and_hms(2023, 5, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_month_window_december_rolls_over_the_year() {
        let now = Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap();
        let (period, from, until) = month_window(now);
        assert_eq!(period, NaiveDate::from_ymd_opt(2023, 12, 1).unwrap());
        assert_eq!(from, Utc.with_ymd_and_hms(2023, 12, 1, 0, 0, 0).unwrap());
        assert_eq!(until, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_month_window_boundaries_are_half_open() {
        let now = Utc.with_ymd_and_hms(2023, 4, 1, 0, 0, 0).unwrap();
        let (_, from, until) = month_window(now);
        // a booking created exactly at month start is inside the window
        assert!(from <= now && now < until);
    }
}
