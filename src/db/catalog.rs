//! Movie, screen, screening and ticket-price queries

use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::error::{AppError, Result};
use crate::models::{Movie, Rating, Screen, Screening, ScreeningSummary, Ticket, TicketKind, TicketPrices};

// Seats remaining is always derived with the same expression: capacity
// minus the ticket counts of bookings that are not cancelled.
const SCREENING_SUMMARY: &str = r#"
    SELECT
        s.id,
        s.movie_id,
        m.name AS movie_name,
        s.screen_id,
        sc.name AS screen_name,
        s.showing_at,
        sc.capacity::BIGINT - COALESCE(
            SUM(b.adult_tickets + b.child_tickets + b.student_tickets)
                FILTER (WHERE b.status <> 'cancelled'),
            0
        ) AS seats_remaining
    FROM screenings s
    JOIN movies m ON m.id = s.movie_id
    JOIN screens sc ON sc.id = s.screen_id
    LEFT JOIN bookings b ON b.screening_id = s.id
"#;

pub async fn list_movies(pool: &PgPool) -> Result<Vec<Movie>> {
    let movies = sqlx::query_as::<_, Movie>(
        r#"
        SELECT id, name, minutes_long, description, rating, image_url
        FROM movies
        ORDER BY name
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(movies)
}

pub async fn get_movie(pool: &PgPool, id: i64) -> Result<Movie> {
    sqlx::query_as::<_, Movie>(
        r#"
        SELECT id, name, minutes_long, description, rating, image_url
        FROM movies
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound)
}

pub async fn create_movie(
    pool: &PgPool,
    name: &str,
    minutes_long: i32,
    description: &str,
    rating: Rating,
    image_url: Option<&str>,
) -> Result<i64> {
    let (id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO movies (name, minutes_long, description, rating, image_url)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
        "#,
    )
    .bind(name)
    .bind(minutes_long)
    .bind(description)
    .bind(rating)
    .bind(image_url)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

pub async fn update_movie(
    pool: &PgPool,
    id: i64,
    name: &str,
    minutes_long: i32,
    description: &str,
    rating: Rating,
    image_url: Option<&str>,
) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE movies
        SET name = $2, minutes_long = $3, description = $4, rating = $5, image_url = $6
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(minutes_long)
    .bind(description)
    .bind(rating)
    .bind(image_url)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn delete_movie(pool: &PgPool, id: i64) -> Result<()> {
    sqlx::query("DELETE FROM movies WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn list_screens(pool: &PgPool) -> Result<Vec<Screen>> {
    let screens = sqlx::query_as::<_, Screen>(
        "SELECT id, name, description, capacity FROM screens ORDER BY name",
    )
    .fetch_all(pool)
    .await?;

    Ok(screens)
}

pub async fn get_screen(pool: &PgPool, id: i64) -> Result<Screen> {
    sqlx::query_as::<_, Screen>("SELECT id, name, description, capacity FROM screens WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::NotFound)
}

pub async fn create_screen(
    pool: &PgPool,
    name: &str,
    description: &str,
    capacity: i32,
) -> Result<i64> {
    let (id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO screens (name, description, capacity)
        VALUES ($1, $2, $3)
        RETURNING id
        "#,
    )
    .bind(name)
    .bind(description)
    .bind(capacity)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

pub async fn update_screen(
    pool: &PgPool,
    id: i64,
    name: &str,
    description: &str,
    capacity: i32,
) -> Result<()> {
    sqlx::query("UPDATE screens SET name = $2, description = $3, capacity = $4 WHERE id = $1")
        .bind(id)
        .bind(name)
        .bind(description)
        .bind(capacity)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn delete_screen(pool: &PgPool, id: i64) -> Result<()> {
    sqlx::query("DELETE FROM screens WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn get_screening(pool: &PgPool, id: i64) -> Result<Screening> {
    sqlx::query_as::<_, Screening>(
        "SELECT id, movie_id, screen_id, showing_at FROM screenings WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound)
}

/// All screenings with derived seat counts, for the management listing
pub async fn list_screenings(pool: &PgPool) -> Result<Vec<ScreeningSummary>> {
    let screenings = sqlx::query_as::<_, ScreeningSummary>(&format!(
        "{SCREENING_SUMMARY} GROUP BY s.id, m.name, sc.name, sc.capacity ORDER BY s.showing_at"
    ))
    .fetch_all(pool)
    .await?;

    Ok(screenings)
}

/// One screening with its derived seat count
pub async fn get_screening_summary(pool: &PgPool, id: i64) -> Result<ScreeningSummary> {
    sqlx::query_as::<_, ScreeningSummary>(&format!(
        "{SCREENING_SUMMARY} WHERE s.id = $1 GROUP BY s.id, m.name, sc.name, sc.capacity"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound)
}

/// Upcoming screenings of one movie that still have at least one seat,
/// for the public booking page
pub async fn screenings_for_movie(pool: &PgPool, movie_id: i64) -> Result<Vec<ScreeningSummary>> {
    let screenings = sqlx::query_as::<_, ScreeningSummary>(&format!(
        r#"{SCREENING_SUMMARY}
        WHERE s.movie_id = $1
        GROUP BY s.id, m.name, sc.name, sc.capacity
        HAVING sc.capacity::BIGINT - COALESCE(
            SUM(b.adult_tickets + b.child_tickets + b.student_tickets)
                FILTER (WHERE b.status <> 'cancelled'),
            0
        ) >= 1
        ORDER BY s.showing_at"#
    ))
    .bind(movie_id)
    .fetch_all(pool)
    .await?;

    Ok(screenings)
}

pub async fn create_screening(
    pool: &PgPool,
    movie_id: i64,
    screen_id: i64,
    showing_at: chrono::DateTime<chrono::Utc>,
) -> Result<i64> {
    let (id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO screenings (movie_id, screen_id, showing_at)
        VALUES ($1, $2, $3)
        RETURNING id
        "#,
    )
    .bind(movie_id)
    .bind(screen_id)
    .bind(showing_at)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

pub async fn update_screening(
    pool: &PgPool,
    id: i64,
    movie_id: i64,
    screen_id: i64,
    showing_at: chrono::DateTime<chrono::Utc>,
) -> Result<()> {
    sqlx::query(
        "UPDATE screenings SET movie_id = $2, screen_id = $3, showing_at = $4 WHERE id = $1",
    )
    .bind(id)
    .bind(movie_id)
    .bind(screen_id)
    .bind(showing_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn delete_screening(pool: &PgPool, id: i64) -> Result<()> {
    sqlx::query("DELETE FROM screenings WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Unit prices for the three seeded ticket kinds
pub async fn get_ticket_prices(pool: &PgPool) -> Result<TicketPrices> {
    let tickets = sqlx::query_as::<_, Ticket>("SELECT id, kind, price FROM tickets")
        .fetch_all(pool)
        .await?;

    let mut prices = TicketPrices {
        adult: Decimal::ZERO,
        child: Decimal::ZERO,
        student: Decimal::ZERO,
    };
    for ticket in tickets {
        match ticket.kind {
            TicketKind::Adult => prices.adult = ticket.price,
            TicketKind::Child => prices.child = ticket.price,
            TicketKind::Student => prices.student = ticket.price,
        }
    }

    Ok(prices)
}

pub async fn update_ticket_prices(pool: &PgPool, prices: &TicketPrices) -> Result<()> {
    for kind in TicketKind::ALL {
        sqlx::query("UPDATE tickets SET price = $2 WHERE kind = $1")
            .bind(kind)
            .bind(prices.get(kind))
            .execute(pool)
            .await?;
    }
    Ok(())
}
