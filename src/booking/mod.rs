//! Booking engine
//!
//! The multi-step booking flow is an explicit state machine value
//! ([`session::BookingSession`]) persisted server-side, stepped by pure
//! functions in [`session`], priced by pure functions in [`pricing`], and
//! committed atomically by [`services`].

pub mod pricing;
pub mod requests;
pub mod services;
pub mod session;

pub use pricing::{discounted_total, price_tickets, round_up_money};
pub use session::{BookingSession, TicketCounts};
