//! In-memory session and price caching using moka
//!
//! Holds the server-side session stores (auth sessions and in-flight
//! booking flows, both keyed by a cookie token) and a small cache for the
//! three ticket prices, which are read on every booking confirmation but
//! change rarely.

use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::auth::AuthSession;
use crate::booking::session::BookingSession;
use crate::models::TicketPrices;

const PRICES_KEY: &str = "ticket_prices";

/// Application cache holding sessions and ticket prices
#[derive(Clone)]
pub struct AppCache {
    /// Logged-in sessions (token -> AuthSession)
    pub auth_sessions: Cache<Uuid, Arc<AuthSession>>,
    /// In-flight booking flows (token -> BookingSession)
    pub booking_sessions: Cache<Uuid, BookingSession>,
    /// Ticket prices (singleton)
    prices: Cache<&'static str, TicketPrices>,
}

impl AppCache {
    /// Create a new cache instance with configured TTLs
    pub fn new() -> Self {
        Self {
            // Auth sessions: 8 hour TTL, sliding 1 hour idle
            auth_sessions: Cache::builder()
                .max_capacity(10_000)
                .time_to_live(Duration::from_secs(8 * 60 * 60))
                .time_to_idle(Duration::from_secs(60 * 60))
                .build(),

            // Booking flows are short-lived; abandoned ones expire
            booking_sessions: Cache::builder()
                .max_capacity(10_000)
                .time_to_live(Duration::from_secs(45 * 60))
                .time_to_idle(Duration::from_secs(20 * 60))
                .build(),

            // Prices: 1 entry, 5 min TTL so price changes show up promptly
            prices: Cache::builder()
                .max_capacity(1)
                .time_to_live(Duration::from_secs(5 * 60))
                .build(),
        }
    }

    pub async fn get_prices(&self) -> Option<TicketPrices> {
        self.prices.get(PRICES_KEY).await
    }

    pub async fn put_prices(&self, prices: TicketPrices) {
        self.prices.insert(PRICES_KEY, prices).await;
    }

    /// Drop the cached prices after a price update so the next booking
    /// sees the new values immediately
    pub async fn invalidate_prices(&self) {
        self.prices.invalidate(PRICES_KEY).await;
    }
}

impl Default for AppCache {
    fn default() -> Self {
        Self::new()
    }
}
