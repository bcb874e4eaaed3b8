//! Database queries, split by area

pub mod bookings;
pub mod catalog;
pub mod clubs;
pub mod statements;
pub mod users;

pub use bookings::*;
pub use catalog::*;
pub use clubs::*;
pub use statements::*;
pub use users::*;
