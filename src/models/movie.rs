//! Movie catalog models

use serde::Serialize;
use sqlx::FromRow;

/// BBFC classification set carried over from the cinema's listings
/// (excludes 12, home video only, and R18, licensed premises only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "UPPERCASE")]
pub enum Rating {
    /// Exempt from classification
    E,
    U,
    #[sqlx(rename = "PG")]
    Pg,
    #[sqlx(rename = "12A")]
    TwelveA,
    #[sqlx(rename = "15")]
    Fifteen,
    #[sqlx(rename = "18")]
    Eighteen,
}

impl Rating {
    pub const ALL: [Rating; 6] = [
        Rating::E,
        Rating::U,
        Rating::Pg,
        Rating::TwelveA,
        Rating::Fifteen,
        Rating::Eighteen,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::E => "E",
            Rating::U => "U",
            Rating::Pg => "PG",
            Rating::TwelveA => "12A",
            Rating::Fifteen => "15",
            Rating::Eighteen => "18",
        }
    }

    pub fn parse(s: &str) -> Option<Rating> {
        Rating::ALL.iter().copied().find(|r| r.as_str() == s)
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Movie from database
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Movie {
    pub id: i64,
    pub name: String,
    pub minutes_long: i32,
    pub description: String,
    pub rating: Rating,
    pub image_url: Option<String>,
}

impl Movie {
    /// Placeholder shown when no poster has been uploaded
    pub const DEFAULT_IMAGE: &'static str = "/static/images/no_image_available.png";

    pub fn image(&self) -> &str {
        self.image_url.as_deref().unwrap_or(Self::DEFAULT_IMAGE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_round_trips_through_strings() {
        for rating in Rating::ALL {
            assert_eq!(Rating::parse(rating.as_str()), Some(rating));
        }
        assert_eq!(Rating::parse("R18"), None);
    }
}
