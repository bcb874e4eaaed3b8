//! Core ticket pricing functions.
//!
//! Pure functions for booking math - no database access.

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

use crate::models::TicketPrices;
use crate::booking::session::TicketCounts;

/// Round up to the given number of decimal places.
///
/// Rounds normally first (banker's), then bumps by the smallest unit if
/// that landed below the true value. The bank never lets the payer keep a
/// fractional penny, so neither do we: the billed amount is never less
/// than the exact computed amount, and never more than 0.01 above it.
pub fn round_up_money(amount: Decimal, places: u32) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(places, RoundingStrategy::MidpointNearestEven);
    if rounded < amount {
        rounded += Decimal::new(1, places);
    }
    rounded
}

/// Subtotal for a set of ticket counts at the current unit prices
pub fn price_tickets(counts: &TicketCounts, prices: &TicketPrices) -> Decimal {
    Decimal::from(counts.adult) * prices.adult
        + Decimal::from(counts.child) * prices.child
        + Decimal::from(counts.student) * prices.student
}

/// Total billed to a club rep: subtotal less the club discount, rounded
/// up to whole pennies. Non-club bookings pay the subtotal unchanged.
pub fn discounted_total(subtotal: Decimal, discount_rate: Decimal) -> Decimal {
    round_up_money(subtotal * (Decimal::ONE - discount_rate), 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn prices() -> TicketPrices {
        TicketPrices {
            adult: dec!(4.99),
            child: dec!(2.99),
            student: dec!(3.99),
        }
    }

    // ==================== round_up_money tests ====================

    #[test]
    fn test_round_up_exact_values_unchanged() {
        assert_eq!(round_up_money(dec!(20.95), 2), dec!(20.95));
        assert_eq!(round_up_money(dec!(35.91), 2), dec!(35.91));
        assert_eq!(round_up_money(dec!(0), 2), dec!(0));
    }

    #[test]
    fn test_round_up_never_decreases() {
        for value in [
            dec!(1.001),
            dec!(1.005),
            dec!(1.0049),
            dec!(1.999),
            dec!(35.9100001),
            dec!(0.0001),
        ] {
            let rounded = round_up_money(value, 2);
            assert!(rounded >= value, "{rounded} < {value}");
            assert!(rounded - value < dec!(0.01), "{rounded} too far above {value}");
        }
    }

    #[test]
    fn test_round_up_adds_a_penny_when_rounding_down() {
        // 1.005 rounds to 1.00 (banker's), which is below, so bump
        assert_eq!(round_up_money(dec!(1.005), 2), dec!(1.01));
        assert_eq!(round_up_money(dec!(1.001), 2), dec!(1.01));
        // 1.006 rounds to 1.01 already
        assert_eq!(round_up_money(dec!(1.006), 2), dec!(1.01));
    }

    #[test]
    fn test_round_up_other_precision() {
        assert_eq!(round_up_money(dec!(1.24), 1), dec!(1.3));
        assert_eq!(round_up_money(dec!(1.2), 1), dec!(1.2));
    }

    // ==================== price_tickets tests ====================

    #[test]
    fn test_price_tickets_mixed_counts() {
        // 3 adult + 2 child: 3 * 4.99 + 2 * 2.99 = 20.95
        let counts = TicketCounts {
            adult: 3,
            child: 2,
            student: 0,
        };
        assert_eq!(price_tickets(&counts, &prices()), dec!(20.95));
    }

    #[test]
    fn test_price_tickets_zero_counts() {
        let counts = TicketCounts::default();
        assert_eq!(price_tickets(&counts, &prices()), dec!(0));
    }

    #[test]
    fn test_price_tickets_students_only() {
        let counts = TicketCounts {
            adult: 0,
            child: 0,
            student: 10,
        };
        assert_eq!(price_tickets(&counts, &prices()), dec!(39.90));
    }

    // ==================== discounted_total tests ====================

    #[test]
    fn test_discounted_total_club_rate() {
        // 39.90 * 0.90 = 35.91 exactly
        assert_eq!(discounted_total(dec!(39.90), dec!(0.10)), dec!(35.91));
    }

    #[test]
    fn test_discounted_total_rounds_up_fractional_penny() {
        // 20.95 * 0.85 = 17.8075 -> 17.81
        assert_eq!(discounted_total(dec!(20.95), dec!(0.15)), dec!(17.81));
    }

    #[test]
    fn test_discounted_total_zero_rate_is_identity() {
        assert_eq!(discounted_total(dec!(20.95), dec!(0)), dec!(20.95));
    }
}
