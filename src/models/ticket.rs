//! Ticket kinds and prices

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

/// The three ticket kinds seeded at setup; prices change, the set does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
pub enum TicketKind {
    Adult,
    Child,
    Student,
}

impl TicketKind {
    pub const ALL: [TicketKind; 3] = [TicketKind::Adult, TicketKind::Child, TicketKind::Student];

    pub fn as_str(&self) -> &'static str {
        match self {
            TicketKind::Adult => "adult",
            TicketKind::Child => "child",
            TicketKind::Student => "student",
        }
    }
}

impl std::fmt::Display for TicketKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ticket row from database
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Ticket {
    pub id: i64,
    pub kind: TicketKind,
    pub price: Decimal,
}

/// Unit prices for all three kinds, loaded in one read and cached
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TicketPrices {
    pub adult: Decimal,
    pub child: Decimal,
    pub student: Decimal,
}

impl TicketPrices {
    pub fn get(&self, kind: TicketKind) -> Decimal {
        match kind {
            TicketKind::Adult => self.adult,
            TicketKind::Child => self.child,
            TicketKind::Student => self.student,
        }
    }
}
