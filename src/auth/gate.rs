//! Reusable role gate
//!
//! Every protected handler declares the set of roles it accepts and calls
//! [`require`] first. Denials redirect to the landing page without saying
//! why; anonymous and deactivated users never pass.

use axum::http::HeaderMap;
use std::sync::Arc;

use crate::auth::sessions::{self, AuthSession};
use crate::cache::AppCache;
use crate::error::{AppError, Result};
use crate::models::Role;

/// A capability check parameterized with one or more acceptable roles.
#[derive(Debug, Clone)]
pub struct RoleCheck {
    roles: &'static [Role],
}

impl RoleCheck {
    pub const fn new(roles: &'static [Role]) -> Self {
        Self { roles }
    }

    pub fn allows(&self, session: Option<&AuthSession>) -> bool {
        match session {
            Some(s) => self.roles.contains(&s.role),
            None => false,
        }
    }
}

/// Gate a handler on the given role set. Returns the session on success
/// so handlers have the acting user at hand.
pub async fn require(
    cache: &AppCache,
    headers: &HeaderMap,
    roles: &'static [Role],
) -> Result<Arc<AuthSession>> {
    match sessions::current_user(cache, headers).await {
        Some(session) if RoleCheck::new(roles).allows(Some(session.as_ref())) => Ok(session),
        _ => Err(AppError::Forbidden),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(role: Role) -> AuthSession {
        AuthSession {
            user_id: 1,
            username: "u".to_string(),
            role,
            club_id: None,
        }
    }

    #[test]
    fn test_anonymous_is_always_denied() {
        let check = RoleCheck::new(&[Role::Student]);
        assert!(!check.allows(None));
    }

    #[test]
    fn test_single_role_gate() {
        let check = RoleCheck::new(&[Role::CinemaManager]);
        assert!(check.allows(Some(&session(Role::CinemaManager))));
        assert!(!check.allows(Some(&session(Role::AccountManager))));
        assert!(!check.allows(Some(&session(Role::Student))));
    }

    #[test]
    fn test_multi_role_gate() {
        let check = RoleCheck::new(&[Role::CinemaManager, Role::AccountManager]);
        assert!(check.allows(Some(&session(Role::CinemaManager))));
        assert!(check.allows(Some(&session(Role::AccountManager))));
        assert!(!check.allows(Some(&session(Role::ClubRep))));
    }
}
