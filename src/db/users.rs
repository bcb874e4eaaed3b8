//! User account queries: registration, approval, club-join workflow

use sqlx::PgPool;

use crate::error::Result;
use crate::models::{Role, User};

const USER_COLUMNS: &str =
    "id, username, password_hash, password_salt, role, club_id, requested_club_id, is_active";

pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
    ))
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn username_exists(pool: &PgPool, username: &str) -> Result<bool> {
    let (exists,): (bool,) =
        sqlx::query_as("SELECT EXISTS (SELECT 1 FROM users WHERE username = $1)")
            .bind(username)
            .fetch_one(pool)
            .await?;

    Ok(exists)
}

pub async fn create_user(
    pool: &PgPool,
    username: &str,
    password_hash: &str,
    password_salt: &str,
    role: Role,
    club_id: Option<i64>,
    is_active: bool,
) -> Result<i64> {
    let (id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO users (username, password_hash, password_salt, role, club_id, is_active)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id
        "#,
    )
    .bind(username)
    .bind(password_hash)
    .bind(password_salt)
    .bind(role)
    .bind(club_id)
    .bind(is_active)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

pub async fn set_active(pool: &PgPool, id: i64, active: bool) -> Result<()> {
    sqlx::query("UPDATE users SET is_active = $2 WHERE id = $1")
        .bind(id)
        .bind(active)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn delete_user(pool: &PgPool, id: i64) -> Result<()> {
    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Staff accounts created by self-registration start inactive and sit in
/// the cinema manager's approval queue
pub async fn inactive_users(pool: &PgPool) -> Result<Vec<User>> {
    let users = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE NOT is_active ORDER BY id"
    ))
    .fetch_all(pool)
    .await?;

    Ok(users)
}

pub async fn staff_accounts(pool: &PgPool) -> Result<Vec<User>> {
    let users = sqlx::query_as::<_, User>(&format!(
        r#"
        SELECT {USER_COLUMNS}
        FROM users
        WHERE role IN ('cinema_manager', 'account_manager', 'club_rep')
        ORDER BY username
        "#
    ))
    .fetch_all(pool)
    .await?;

    Ok(users)
}

/// Record a student's request to join a club
pub async fn request_join(pool: &PgPool, user_id: i64, club_id: i64) -> Result<()> {
    sqlx::query("UPDATE users SET requested_club_id = $2 WHERE id = $1")
        .bind(user_id)
        .bind(club_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Accept a pending join request: the requested club becomes the club.
/// Scoped to the rep's club so a rep can only accept requests aimed at it.
pub async fn accept_join(pool: &PgPool, user_id: i64, club_id: i64) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE users
        SET club_id = requested_club_id, requested_club_id = NULL
        WHERE id = $1 AND requested_club_id = $2
        "#,
    )
    .bind(user_id)
    .bind(club_id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Reject a pending join request: the request is cleared, nothing else
pub async fn reject_join(pool: &PgPool, user_id: i64, club_id: i64) -> Result<()> {
    sqlx::query(
        "UPDATE users SET requested_club_id = NULL WHERE id = $1 AND requested_club_id = $2",
    )
    .bind(user_id)
    .bind(club_id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Users with a pending request to join the given club
pub async fn pending_join_requests(pool: &PgPool, club_id: i64) -> Result<Vec<User>> {
    let users = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE requested_club_id = $1 ORDER BY username"
    ))
    .bind(club_id)
    .fetch_all(pool)
    .await?;

    Ok(users)
}
