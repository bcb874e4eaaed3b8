//! Monthly-statement queries

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

use crate::error::Result;
use crate::models::StatementSummary;

/// Write one statement per club covering the given month window.
///
/// The UNIQUE (club_id, period) index plus ON CONFLICT DO NOTHING makes
/// re-invocation within a month a no-op per club; amounts count only
/// non-cancelled bookings. Returns how many statements were created.
pub async fn generate_statements(
    pool: &PgPool,
    period: NaiveDate,
    from: DateTime<Utc>,
    until: DateTime<Utc>,
) -> Result<u64> {
    let result = sqlx::query(
        r#"
        INSERT INTO monthly_statements (club_id, period, amount)
        SELECT
            c.id,
            $1,
            COALESCE(SUM(b.total_price), 0)
        FROM clubs c
        LEFT JOIN bookings b
            ON b.club_id = c.id
            AND b.created_at >= $2
            AND b.created_at < $3
            AND b.status <> 'cancelled'
        GROUP BY c.id
        ON CONFLICT (club_id, period) DO NOTHING
        "#,
    )
    .bind(period)
    .bind(from)
    .bind(until)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

pub async fn list_statements(pool: &PgPool) -> Result<Vec<StatementSummary>> {
    let statements = sqlx::query_as::<_, StatementSummary>(
        r#"
        SELECT ms.id, c.name AS club_name, ms.period, ms.amount
        FROM monthly_statements ms
        JOIN clubs c ON c.id = ms.club_id
        ORDER BY ms.period DESC, c.name
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(statements)
}
