//! Environment-driven configuration

use std::env;

/// Application configuration read once at startup.
///
/// `.env` files are honored via dotenvy before these are read.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Postgres connection string
    pub database_url: String,
    /// Address to bind the HTTP listener to
    pub bind_addr: String,
    /// Endpoint the booking-confirmation payload is POSTed to
    pub notify_url: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
        let notify_url = env::var("NOTIFY_URL")
            .unwrap_or_else(|_| "http://django-rest-api:8001/my-api/".to_string());

        Ok(Self {
            database_url,
            bind_addr,
            notify_url,
        })
    }
}
