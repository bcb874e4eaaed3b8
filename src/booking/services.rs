//! Booking service functions with database access.
//!
//! These wrap the pure pricing/session logic in the transactions that
//! make seat and balance checks atomic: the screening row is locked, the
//! remaining-seat count recomputed under the lock, the club balance
//! debited with a decrement-if-sufficient update, and the booking row
//! inserted behind a seat guard, all committing together.

use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::booking::pricing::{discounted_total, price_tickets};
use crate::booking::session::{
    validate_counts, BookingPath, BookingRuleError, BookingSession, TicketCounts,
};
use crate::cache::AppCache;
use crate::db;
use crate::error::{AppError, Result};
use crate::models::{BookingStatus, TicketPrices};

/// Priced summary shown on the confirmation page
#[derive(Debug, Clone, Copy)]
pub struct Quote {
    pub subtotal: Decimal,
    pub total: Decimal,
    pub discount_rate: Option<Decimal>,
    pub total_tickets: i32,
}

/// Price a set of counts, applying the club discount when present
pub fn quote(
    counts: TicketCounts,
    prices: &TicketPrices,
    discount_rate: Option<Decimal>,
) -> Quote {
    let subtotal = price_tickets(&counts, prices);
    let total = match discount_rate {
        Some(rate) => discounted_total(subtotal, rate),
        None => subtotal,
    };
    Quote {
        subtotal,
        total,
        discount_rate,
        total_tickets: counts.total(),
    }
}

/// Ticket prices, from cache when warm
pub async fn ticket_prices(pool: &PgPool, cache: &AppCache) -> Result<TicketPrices> {
    if let Some(prices) = cache.get_prices().await {
        return Ok(prices);
    }
    let prices = db::get_ticket_prices(pool).await?;
    cache.put_prices(prices).await;
    Ok(prices)
}

/// Outcome of the confirm step
#[derive(Debug)]
pub enum ConfirmOutcome {
    /// Booking committed; the advanced session carries the booking id
    Booked {
        session: BookingSession,
        booking_id: i64,
        total_price: Decimal,
    },
    /// A business rule failed; the session is unchanged and the rule is
    /// surfaced as a warning on the re-rendered page
    Rejected {
        session: BookingSession,
        rule: BookingRuleError,
    },
}

/// Step 3: create the booking.
///
/// Re-validates seats (they may have been consumed since step 2) and, for
/// club bookings, debits the balance, inside one transaction.
pub async fn confirm_booking(
    pool: &PgPool,
    session: BookingSession,
    user_id: Option<i64>,
    prices: &TicketPrices,
    discount_rate: Option<Decimal>,
) -> Result<ConfirmOutcome> {
    let Some(counts) = session.counts() else {
        return Ok(ConfirmOutcome::Rejected {
            session,
            rule: BookingRuleError::OutOfOrder,
        });
    };
    let path = session.path();
    let screening_id = session.screening_id();
    let priced = quote(counts, prices, discount_rate);

    let mut tx = pool.begin().await?;

    db::lock_screening(&mut *tx, screening_id).await?;
    let remaining = db::seats_remaining(&mut *tx, screening_id).await?;
    if let Err(rule) = validate_counts(path, counts, remaining) {
        return Ok(ConfirmOutcome::Rejected { session, rule });
    }

    let club_id = match path {
        BookingPath::ClubRep { club_id } => {
            let debited =
                db::debit_balance_if_sufficient(&mut *tx, club_id, priced.total).await?;
            if debited.is_none() {
                return Ok(ConfirmOutcome::Rejected {
                    session,
                    rule: BookingRuleError::InsufficientFunds,
                });
            }
            Some(club_id)
        }
        BookingPath::Customer => None,
    };

    let booking_id = match db::insert_booking_if_seats(
        &mut *tx,
        screening_id,
        user_id,
        club_id,
        counts,
        priced.total,
    )
    .await?
    {
        Some(id) => id,
        None => {
            return Ok(ConfirmOutcome::Rejected {
                session,
                rule: BookingRuleError::NotEnoughSeats { remaining },
            });
        }
    };

    tx.commit().await?;
    tracing::info!(booking_id, screening_id, total = %priced.total, "booking confirmed");

    let session = session
        .confirmed(booking_id, priced.total)
        .map_err(|_| AppError::Internal("confirm from unexpected session state".to_string()))?;

    Ok(ConfirmOutcome::Booked {
        session,
        booking_id,
        total_price: priced.total,
    })
}

/// Owner marks a booking for cancellation; a cinema manager decides later
pub async fn request_cancellation(pool: &PgPool, booking_id: i64, user_id: i64) -> Result<()> {
    let booking = db::get_booking(pool, booking_id).await?;
    if booking.user_id != Some(user_id) {
        return Err(AppError::Forbidden);
    }
    db::set_status(pool, booking_id, BookingStatus::CancelRequested).await
}

/// Cinema manager approves a requested cancellation. Seats come back by
/// derivation; a club booking's price is credited back to the club.
pub async fn approve_cancellation(pool: &PgPool, booking_id: i64) -> Result<()> {
    let mut tx = pool.begin().await?;

    let booking = db::get_booking_for_update(&mut *tx, booking_id).await?;
    if booking.status != BookingStatus::CancelRequested {
        // decided already, nothing to do
        return Ok(());
    }

    db::set_status_tx(&mut *tx, booking_id, BookingStatus::Cancelled).await?;
    if let Some(club_id) = booking.club_id {
        db::clubs::credit_balance_tx(&mut *tx, club_id, booking.total_price).await?;
    }

    tx.commit().await?;
    tracing::info!(booking_id, "cancellation approved");
    Ok(())
}

/// Cinema manager denies a requested cancellation; the booking stays live
pub async fn deny_cancellation(pool: &PgPool, booking_id: i64) -> Result<()> {
    let mut tx = pool.begin().await?;

    let booking = db::get_booking_for_update(&mut *tx, booking_id).await?;
    if booking.status == BookingStatus::CancelRequested {
        db::set_status_tx(&mut *tx, booking_id, BookingStatus::Active).await?;
    }

    tx.commit().await?;
    Ok(())
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

    #[test]
    fn test_customer_quote_has_no_discount() {
        let counts = TicketCounts {
            adult: 3,
            child: 2,
            student: 0,
        };
        let quote = quote(counts, &prices(), None);
        assert_eq!(quote.subtotal, dec!(20.95));
        assert_eq!(quote.total, dec!(20.95));
        assert_eq!(quote.discount_rate, None);
        assert_eq!(quote.total_tickets, 5);
    }

    #[test]
    fn test_club_quote_applies_discount_rounding_up() {
        let counts = TicketCounts {
            adult: 0,
            child: 0,
            student: 10,
        };
        let quote = quote(counts, &prices(), Some(dec!(0.10)));
        assert_eq!(quote.subtotal, dec!(39.90));
        assert_eq!(quote.total, dec!(35.91));
        assert_eq!(quote.total_tickets, 10);
    }
}
