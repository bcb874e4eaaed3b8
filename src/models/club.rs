//! Club model

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

/// Club from database.
///
/// `card_number_hash` holds a one-way hex digest of the payment card
/// number; the raw number is never stored. Top-up validates by hashing
/// the submitted number and comparing digests.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Club {
    pub id: i64,
    pub name: String,
    pub card_number_hash: String,
    pub card_expiry: NaiveDate,
    pub discount_rate: Decimal,
    pub address: String,
    pub balance: Decimal,
}

impl Club {
    pub fn check_card(&self, card_number: &str) -> bool {
        crate::auth::passwords::hash_card_number(card_number) == self.card_number_hash
    }
}
