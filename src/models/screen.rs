//! Screen (auditorium) model

use serde::Serialize;
use sqlx::FromRow;

/// Screen from database
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Screen {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub capacity: i32,
}
