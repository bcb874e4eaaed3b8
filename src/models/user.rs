//! User account model and roles

use serde::Serialize;
use sqlx::FromRow;

/// Account roles. One role per user; protected pages declare the set of
/// roles they accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
pub enum Role {
    CinemaManager,
    AccountManager,
    ClubRep,
    Student,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::CinemaManager => "cinema_manager",
            Role::AccountManager => "account_manager",
            Role::ClubRep => "club_rep",
            Role::Student => "student",
        }
    }

    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "cinema_manager" => Some(Role::CinemaManager),
            "account_manager" => Some(Role::AccountManager),
            "club_rep" => Some(Role::ClubRep),
            "student" => Some(Role::Student),
            _ => None,
        }
    }

    /// Label used on staff-account and approval pages
    pub fn label(&self) -> &'static str {
        match self {
            Role::CinemaManager => "Cinema Manager",
            Role::AccountManager => "Account Manager",
            Role::ClubRep => "Club Representative",
            Role::Student => "Customer",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// User from database.
///
/// A `club_rep` always has a non-null `club_id`; the schema enforces it
/// with a CHECK constraint. `requested_club_id` carries a pending
/// join-club request until a rep accepts or rejects it.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[serde(skip_serializing)]
    pub password_salt: String,
    pub role: Role,
    pub club_id: Option<i64>,
    pub requested_club_id: Option<i64>,
    pub is_active: bool,
}
