//! Booking queries
//!
//! The confirm-time write path runs inside a transaction: the screening
//! row is locked, the remaining-seat count is recomputed under the lock,
//! and the insert itself is guarded by that count, so two concurrent
//! confirmations for the same screening serialize instead of overselling.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};

use crate::booking::session::TicketCounts;
use crate::error::{AppError, Result};
use crate::models::{Booking, BookingStatus, BookingSummary};

const BOOKING_COLUMNS: &str = "id, screening_id, user_id, club_id, adult_tickets, \
     child_tickets, student_tickets, total_price, status, created_at";

const SUMMARY_SELECT: &str = r#"
    SELECT
        b.id,
        m.name AS movie_name,
        sc.name AS screen_name,
        s.showing_at,
        b.adult_tickets,
        b.child_tickets,
        b.student_tickets,
        b.total_price,
        b.status,
        b.created_at
    FROM bookings b
    JOIN screenings s ON s.id = b.screening_id
    JOIN movies m ON m.id = s.movie_id
    JOIN screens sc ON sc.id = s.screen_id
"#;

pub async fn get_booking(pool: &PgPool, id: i64) -> Result<Booking> {
    sqlx::query_as::<_, Booking>(&format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound)
}

/// Take a row lock on the screening so seat arithmetic below is stable
/// for the rest of the transaction
pub async fn lock_screening(conn: &mut PgConnection, screening_id: i64) -> Result<()> {
    sqlx::query("SELECT id FROM screenings WHERE id = $1 FOR UPDATE")
        .bind(screening_id)
        .fetch_optional(&mut *conn)
        .await?
        .map(|_: sqlx::postgres::PgRow| ())
        .ok_or(AppError::NotFound)
}

/// Remaining seats for a screening, derived under whatever isolation the
/// caller's executor provides
pub async fn seats_remaining(conn: &mut PgConnection, screening_id: i64) -> Result<i64> {
    let (remaining,): (i64,) = sqlx::query_as(
        r#"
        SELECT sc.capacity::BIGINT - COALESCE(
            SUM(b.adult_tickets + b.child_tickets + b.student_tickets)
                FILTER (WHERE b.status <> 'cancelled'),
            0
        )
        FROM screenings s
        JOIN screens sc ON sc.id = s.screen_id
        LEFT JOIN bookings b ON b.screening_id = s.id
        WHERE s.id = $1
        GROUP BY sc.capacity
        "#,
    )
    .bind(screening_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or(AppError::NotFound)?;

    Ok(remaining)
}

/// Insert a booking only if the screening still has room for it.
/// Returns the new booking id, or None when the seats are gone.
pub async fn insert_booking_if_seats(
    conn: &mut PgConnection,
    screening_id: i64,
    user_id: Option<i64>,
    club_id: Option<i64>,
    counts: TicketCounts,
    total_price: Decimal,
) -> Result<Option<i64>> {
    let row: Option<(i64,)> = sqlx::query_as(
        r#"
        INSERT INTO bookings
            (screening_id, user_id, club_id, adult_tickets, child_tickets,
             student_tickets, total_price, status)
        SELECT $1, $2, $3, $4, $5, $6, $7, 'active'
        WHERE (
            SELECT sc.capacity::BIGINT - COALESCE(
                SUM(b.adult_tickets + b.child_tickets + b.student_tickets)
                    FILTER (WHERE b.status <> 'cancelled'),
                0
            )
            FROM screenings s
            JOIN screens sc ON sc.id = s.screen_id
            LEFT JOIN bookings b ON b.screening_id = s.id
            WHERE s.id = $1
            GROUP BY sc.capacity
        ) >= $8
        RETURNING id
        "#,
    )
    .bind(screening_id)
    .bind(user_id)
    .bind(club_id)
    .bind(counts.adult)
    .bind(counts.child)
    .bind(counts.student)
    .bind(total_price)
    .bind(i64::from(counts.total()))
    .fetch_optional(&mut *conn)
    .await?;

    Ok(row.map(|(id,)| id))
}

/// Booking row locked for the rest of the transaction, so a cancellation
/// decision (and its refund) can never be applied twice
pub async fn get_booking_for_update(conn: &mut PgConnection, id: i64) -> Result<Booking> {
    sqlx::query_as::<_, Booking>(&format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1 FOR UPDATE"
    ))
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or(AppError::NotFound)
}

pub async fn set_status(pool: &PgPool, id: i64, status: BookingStatus) -> Result<()> {
    sqlx::query("UPDATE bookings SET status = $2 WHERE id = $1")
        .bind(id)
        .bind(status)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn set_status_tx(
    conn: &mut PgConnection,
    id: i64,
    status: BookingStatus,
) -> Result<()> {
    sqlx::query("UPDATE bookings SET status = $2 WHERE id = $1")
        .bind(id)
        .bind(status)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

pub async fn all_bookings(pool: &PgPool) -> Result<Vec<BookingSummary>> {
    let bookings =
        sqlx::query_as::<_, BookingSummary>(&format!("{SUMMARY_SELECT} ORDER BY b.created_at DESC"))
            .fetch_all(pool)
            .await?;

    Ok(bookings)
}

/// A club's bookings created in the given window (a calendar month)
pub async fn club_bookings_between(
    pool: &PgPool,
    club_id: i64,
    from: DateTime<Utc>,
    until: DateTime<Utc>,
) -> Result<Vec<BookingSummary>> {
    let bookings = sqlx::query_as::<_, BookingSummary>(&format!(
        r#"{SUMMARY_SELECT}
        WHERE b.club_id = $1 AND b.created_at >= $2 AND b.created_at < $3
        ORDER BY b.created_at DESC"#
    ))
    .bind(club_id)
    .bind(from)
    .bind(until)
    .fetch_all(pool)
    .await?;

    Ok(bookings)
}

/// A user's bookings created in the given window
pub async fn user_bookings_between(
    pool: &PgPool,
    user_id: i64,
    from: DateTime<Utc>,
    until: DateTime<Utc>,
) -> Result<Vec<BookingSummary>> {
    let bookings = sqlx::query_as::<_, BookingSummary>(&format!(
        r#"{SUMMARY_SELECT}
        WHERE b.user_id = $1 AND b.created_at >= $2 AND b.created_at < $3
        ORDER BY b.created_at DESC"#
    ))
    .bind(user_id)
    .bind(from)
    .bind(until)
    .fetch_all(pool)
    .await?;

    Ok(bookings)
}

/// Bookings awaiting a cancellation decision from a cinema manager
pub async fn cancellation_requests(pool: &PgPool) -> Result<Vec<BookingSummary>> {
    let bookings = sqlx::query_as::<_, BookingSummary>(&format!(
        "{SUMMARY_SELECT} WHERE b.status = 'cancel_requested' ORDER BY b.created_at"
    ))
    .fetch_all(pool)
    .await?;

    Ok(bookings)
}
