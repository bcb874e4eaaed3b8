//! Server-side auth sessions and cookie plumbing

use axum::http::{header, HeaderMap, HeaderValue};
use std::sync::Arc;
use uuid::Uuid;

use crate::cache::AppCache;
use crate::models::Role;

pub const AUTH_COOKIE: &str = "uweflix_session";
pub const BOOKING_COOKIE: &str = "uweflix_booking";

/// Everything the request layer needs to know about a logged-in user.
/// `club_id` is populated for club reps so booking and top-up handlers
/// never re-fetch the user row just to find their club.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user_id: i64,
    pub username: String,
    pub role: Role,
    pub club_id: Option<i64>,
}

/// Pull a named cookie value out of the request headers
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;
    raw.split(';').find_map(|pair| {
        let (k, v) = pair.trim().split_once('=')?;
        (k == name).then(|| v.to_string())
    })
}

/// Token from a named cookie, if present and well-formed
pub fn cookie_token(headers: &HeaderMap, name: &str) -> Option<Uuid> {
    cookie_value(headers, name).and_then(|v| Uuid::parse_str(&v).ok())
}

/// `Set-Cookie` value for a session token
pub fn session_cookie(name: &str, token: Uuid) -> HeaderValue {
    HeaderValue::from_str(&format!("{name}={token}; Path=/; HttpOnly; SameSite=Lax"))
        .unwrap_or_else(|_| HeaderValue::from_static(""))
}

/// `Set-Cookie` value that expires a session cookie
pub fn clear_cookie(name: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("{name}=; Path=/; HttpOnly; Max-Age=0"))
        .unwrap_or_else(|_| HeaderValue::from_static(""))
}

/// Resolve the current user from the auth cookie, if any
pub async fn current_user(cache: &AppCache, headers: &HeaderMap) -> Option<Arc<AuthSession>> {
    let token = cookie_token(headers, AUTH_COOKIE)?;
    cache.auth_sessions.get(&token).await
}

/// Open a new auth session and return its token
pub async fn open_session(cache: &AppCache, session: AuthSession) -> Uuid {
    let token = Uuid::new_v4();
    cache.auth_sessions.insert(token, Arc::new(session)).await;
    token
}

/// Drop the session behind the auth cookie, if any
pub async fn close_session(cache: &AppCache, headers: &HeaderMap) {
    if let Some(token) = cookie_token(headers, AUTH_COOKIE) {
        cache.auth_sessions.invalidate(&token).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_value_parses_multiple_pairs() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("a=1; uweflix_session=abc; b=2"),
        );
        assert_eq!(
            cookie_value(&headers, "uweflix_session").as_deref(),
            Some("abc")
        );
        assert_eq!(cookie_value(&headers, "b").as_deref(), Some("2"));
        assert_eq!(cookie_value(&headers, "missing"), None);
    }

    #[test]
    fn test_cookie_token_rejects_non_uuid() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("uweflix_session=not-a-uuid"),
        );
        assert_eq!(cookie_token(&headers, AUTH_COOKIE), None);

        let token = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            session_cookie_pair(AUTH_COOKIE, token).parse().unwrap(),
        );
        assert_eq!(cookie_token(&headers, AUTH_COOKIE), Some(token));
    }

    fn session_cookie_pair(name: &str, token: Uuid) -> String {
        format!("{name}={token}")
    }
}
