//! Monthly statement model

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

/// One statement per club per calendar month, joined with the club name
/// for the listing page; immutable once created. `period` is the first
/// day of the covered month.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StatementSummary {
    pub id: i64,
    pub club_name: String,
    pub period: NaiveDate,
    pub amount: Decimal,
}

impl StatementSummary {
    pub fn month_label(&self) -> String {
        self.period.format("%B %Y").to_string()
    }
}
