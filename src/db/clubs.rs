//! Club queries and balance mutations
//!
//! Balance changes are single conditional statements so concurrent
//! bookings and top-ups can never overdraw or lose an update.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};

use crate::error::{AppError, Result};
use crate::models::Club;

const CLUB_COLUMNS: &str =
    "id, name, card_number_hash, card_expiry, discount_rate, address, balance";

pub async fn list_clubs(pool: &PgPool) -> Result<Vec<Club>> {
    let clubs = sqlx::query_as::<_, Club>(&format!(
        "SELECT {CLUB_COLUMNS} FROM clubs ORDER BY name"
    ))
    .fetch_all(pool)
    .await?;

    Ok(clubs)
}

pub async fn get_club(pool: &PgPool, id: i64) -> Result<Club> {
    sqlx::query_as::<_, Club>(&format!("SELECT {CLUB_COLUMNS} FROM clubs WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::NotFound)
}

#[allow(clippy::too_many_arguments)]
pub async fn create_club(
    pool: &PgPool,
    name: &str,
    card_number_hash: &str,
    card_expiry: NaiveDate,
    discount_rate: Decimal,
    address: &str,
) -> Result<i64> {
    let (id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO clubs (name, card_number_hash, card_expiry, discount_rate, address, balance)
        VALUES ($1, $2, $3, $4, $5, 0)
        RETURNING id
        "#,
    )
    .bind(name)
    .bind(card_number_hash)
    .bind(card_expiry)
    .bind(discount_rate)
    .bind(address)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

pub async fn update_club(
    pool: &PgPool,
    id: i64,
    name: &str,
    card_expiry: NaiveDate,
    discount_rate: Decimal,
    address: &str,
) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE clubs
        SET name = $2, card_expiry = $3, discount_rate = $4, address = $5
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(card_expiry)
    .bind(discount_rate)
    .bind(address)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn delete_club(pool: &PgPool, id: i64) -> Result<()> {
    sqlx::query("DELETE FROM clubs WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Credit a club balance (top-up, cancellation refund).
/// Returns the new balance.
pub async fn credit_balance(pool: &PgPool, id: i64, amount: Decimal) -> Result<Decimal> {
    let (balance,): (Decimal,) = sqlx::query_as(
        "UPDATE clubs SET balance = balance + $2 WHERE id = $1 RETURNING balance",
    )
    .bind(id)
    .bind(amount)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound)?;

    Ok(balance)
}

/// Debit a club balance only if it covers the amount - the
/// decrement-if-sufficient guard behind club booking confirmation.
/// Returns the new balance, or None when funds were insufficient.
pub async fn debit_balance_if_sufficient(
    conn: &mut PgConnection,
    id: i64,
    amount: Decimal,
) -> Result<Option<Decimal>> {
    let row: Option<(Decimal,)> = sqlx::query_as(
        r#"
        UPDATE clubs
        SET balance = balance - $2
        WHERE id = $1 AND balance >= $2
        RETURNING balance
        "#,
    )
    .bind(id)
    .bind(amount)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(row.map(|(balance,)| balance))
}

/// Refund a club booking inside the cancellation transaction
pub async fn credit_balance_tx(conn: &mut PgConnection, id: i64, amount: Decimal) -> Result<()> {
    sqlx::query("UPDATE clubs SET balance = balance + $2 WHERE id = $1")
        .bind(id)
        .bind(amount)
        .execute(&mut *conn)
        .await?;
    Ok(())
}
