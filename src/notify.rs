//! Outbound booking-confirmation notification
//!
//! Fire-and-forget JSON POST to the configured endpoint. Failures are
//! logged and swallowed; the booking is already committed and the user is
//! sent home either way.

use serde::Serialize;

/// Payload shape expected by the notification endpoint
#[derive(Debug, Clone, Serialize)]
pub struct BookingConfirmation {
    pub name: String,
    pub email: String,
    pub movie: String,
    pub date: String,
    pub screen: String,
    pub total_tickets: i32,
    pub total_price: String,
    pub id: i64,
}

#[derive(Clone)]
pub struct Notifier {
    client: reqwest::Client,
    url: String,
}

impl Notifier {
    pub fn new(url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
        }
    }

    /// Post the confirmation; the response body is not inspected
    pub async fn send(&self, confirmation: &BookingConfirmation) {
        match self.client.post(&self.url).json(confirmation).send().await {
            Ok(response) => {
                tracing::debug!(
                    booking_id = confirmation.id,
                    status = %response.status(),
                    "booking confirmation dispatched"
                );
            }
            Err(e) => {
                tracing::warn!(booking_id = confirmation.id, "confirmation dispatch failed: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{TimeZone, Utc};

    use crate::models::ScreeningSummary;

    #[test]
    fn test_payload_built_from_an_owned_screening_summary() {
        // Mirrors the confirmation handler: the formatted date is bound
        // before the name fields are moved out of the summary.
        let screening = ScreeningSummary {
            id: 3,
            movie_id: 1,
            movie_name: "Heat".to_string(),
            screen_id: 2,
            screen_name: "Screen 1".to_string(),
            showing_at: Utc.with_ymd_and_hms(2023, 4, 1, 19, 30, 0).unwrap(),
            seats_remaining: 95,
        };

        let showing = screening.long_date();
        let confirmation = BookingConfirmation {
            name: "Guest".to_string(),
            email: "someone@example.com".to_string(),
            movie: screening.movie_name,
            date: showing,
            screen: screening.screen_name,
            total_tickets: 5,
            total_price: "20.95".to_string(),
            id: 7,
        };

        assert_eq!(confirmation.movie, "Heat");
        assert_eq!(confirmation.date, "01 April 2023 - 19:30");
        assert_eq!(confirmation.screen, "Screen 1");
    }

    #[test]
    fn test_payload_matches_the_endpoint_contract() {
        let confirmation = BookingConfirmation {
            name: "UWEFlix".to_string(),
            email: "someone@example.com".to_string(),
            movie: "Heat".to_string(),
            date: "01 April 2023 - 19:30".to_string(),
            screen: "Screen 1".to_string(),
            total_tickets: 5,
            total_price: "20.95".to_string(),
            id: 7,
        };

        let json = serde_json::to_value(&confirmation).unwrap();
        assert_eq!(json["name"], "UWEFlix");
        assert_eq!(json["email"], "someone@example.com");
        assert_eq!(json["movie"], "Heat");
        assert_eq!(json["date"], "01 April 2023 - 19:30");
        assert_eq!(json["screen"], "Screen 1");
        assert_eq!(json["total_tickets"], 5);
        // price travels as a string, exactly as billed
        assert_eq!(json["total_price"], "20.95");
        assert_eq!(json["id"], 7);
    }
}
