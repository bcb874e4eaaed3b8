//! Database row models and shared enums

mod booking;
mod club;
mod movie;
mod screen;
mod screening;
mod statement;
mod ticket;
mod user;

pub use booking::{Booking, BookingStatus, BookingSummary};
pub use club::Club;
pub use movie::{Movie, Rating};
pub use screen::Screen;
pub use screening::{Screening, ScreeningSummary};
pub use statement::StatementSummary;
pub use ticket::{Ticket, TicketKind, TicketPrices};
pub use user::{Role, User};
