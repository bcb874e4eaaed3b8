//! Authentication and role-based access control
//!
//! Sessions are server-side: the browser holds only an opaque uuid token
//! in a cookie, and everything about the logged-in user lives in the
//! session store.

pub mod gate;
pub mod passwords;
pub mod sessions;

pub use gate::RoleCheck;
pub use sessions::{AuthSession, AUTH_COOKIE, BOOKING_COOKIE};
