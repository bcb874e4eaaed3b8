//! Booking-flow state machine
//!
//! One value per in-flight booking, persisted server-side keyed by the
//! booking cookie token. Each step consumes the previous state and either
//! advances or reports the violated rule; handlers re-render the same
//! form with the warning. Nothing here touches the database - seat counts
//! and balances are passed in by the service layer, which re-checks them
//! atomically at commit time.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Which rules apply to the flow: customers book 1-9 tickets of any mix,
/// club reps book 10 or more student tickets against the club account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingPath {
    Customer,
    ClubRep { club_id: i64 },
}

/// Per-kind ticket counts chosen in step two
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketCounts {
    pub adult: i32,
    pub child: i32,
    pub student: i32,
}

impl TicketCounts {
    /// Saturating sum, so absurd form input cannot wrap a huge request
    /// into a small-looking total; the range checks then reject it.
    pub fn total(&self) -> i32 {
        self.adult
            .saturating_add(self.child)
            .saturating_add(self.student)
    }
}

/// A business rule violated by a booking step. Every variant is
/// recoverable by resubmitting corrected input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookingRuleError {
    #[error("Not enough seats available — there are only {remaining} seats left")]
    NotEnoughSeats { remaining: i64 },

    #[error("No tickets selected")]
    NoTicketsSelected,

    #[error("Too many tickets, no more than 9 in one booking")]
    TooManyTickets,

    #[error("A club booking requirement is 10 tickets or more")]
    ClubMinimum,

    #[error("Insufficient funds")]
    InsufficientFunds,

    /// Step submitted against a session that is not at that step,
    /// e.g. a stale confirm after the flow already completed.
    #[error("Booking session is not at this step")]
    OutOfOrder,
}

/// Validate chosen quantities against the path rules and the seats left.
/// Used identically at selection time and again inside the commit
/// transaction, so both checks always agree.
pub fn validate_counts(
    path: BookingPath,
    counts: TicketCounts,
    seats_remaining: i64,
) -> Result<(), BookingRuleError> {
    let total = counts.total();
    if i64::from(total) > seats_remaining {
        return Err(BookingRuleError::NotEnoughSeats {
            remaining: seats_remaining,
        });
    }
    match path {
        BookingPath::Customer => {
            if total == 0 {
                Err(BookingRuleError::NoTicketsSelected)
            } else if total > 9 {
                Err(BookingRuleError::TooManyTickets)
            } else {
                Ok(())
            }
        }
        BookingPath::ClubRep { .. } => {
            if total < 10 {
                Err(BookingRuleError::ClubMinimum)
            } else {
                Ok(())
            }
        }
    }
}

/// The flow itself: select screening, choose quantities, confirm, email.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BookingSession {
    /// Screening picked, waiting for ticket quantities
    SelectingTickets {
        screening_id: i64,
        path: BookingPath,
    },
    /// Quantities accepted, waiting for payment/confirmation
    ReadyToConfirm {
        screening_id: i64,
        path: BookingPath,
        counts: TicketCounts,
    },
    /// Booking row written, waiting for the confirmation email address
    Confirmed {
        screening_id: i64,
        path: BookingPath,
        counts: TicketCounts,
        booking_id: i64,
        total_price: Decimal,
    },
}

impl BookingSession {
    /// Step 1: select a screening
    pub fn start(screening_id: i64, path: BookingPath) -> Self {
        BookingSession::SelectingTickets { screening_id, path }
    }

    pub fn screening_id(&self) -> i64 {
        match self {
            BookingSession::SelectingTickets { screening_id, .. }
            | BookingSession::ReadyToConfirm { screening_id, .. }
            | BookingSession::Confirmed { screening_id, .. } => *screening_id,
        }
    }

    pub fn path(&self) -> BookingPath {
        match self {
            BookingSession::SelectingTickets { path, .. }
            | BookingSession::ReadyToConfirm { path, .. }
            | BookingSession::Confirmed { path, .. } => *path,
        }
    }

    /// Step 2: choose quantities. Allowed from the selection step and as a
    /// resubmission from the confirm step; not after the booking exists.
    pub fn choose(
        self,
        counts: TicketCounts,
        seats_remaining: i64,
    ) -> Result<Self, BookingRuleError> {
        let (screening_id, path) = match self {
            BookingSession::SelectingTickets { screening_id, path }
            | BookingSession::ReadyToConfirm {
                screening_id, path, ..
            } => (screening_id, path),
            BookingSession::Confirmed { .. } => return Err(BookingRuleError::OutOfOrder),
        };
        validate_counts(path, counts, seats_remaining)?;
        Ok(BookingSession::ReadyToConfirm {
            screening_id,
            path,
            counts,
        })
    }

    /// Counts chosen so far, if the flow has reached step 2
    pub fn counts(&self) -> Option<TicketCounts> {
        match self {
            BookingSession::SelectingTickets { .. } => None,
            BookingSession::ReadyToConfirm { counts, .. }
            | BookingSession::Confirmed { counts, .. } => Some(*counts),
        }
    }

    /// Step 3 result: booking written, remember its id for the email step
    pub fn confirmed(self, booking_id: i64, total_price: Decimal) -> Result<Self, BookingRuleError> {
        match self {
            BookingSession::ReadyToConfirm {
                screening_id,
                path,
                counts,
            } => Ok(BookingSession::Confirmed {
                screening_id,
                path,
                counts,
                booking_id,
                total_price,
            }),
            _ => Err(BookingRuleError::OutOfOrder),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const CUSTOMER: BookingPath = BookingPath::Customer;
    const CLUB: BookingPath = BookingPath::ClubRep { club_id: 7 };

    fn counts(adult: i32, child: i32, student: i32) -> TicketCounts {
        TicketCounts {
            adult,
            child,
            student,
        }
    }

    // ==================== validate_counts tests ====================

    #[test]
    fn test_customer_range_is_one_to_nine() {
        assert_eq!(
            validate_counts(CUSTOMER, counts(0, 0, 0), 100),
            Err(BookingRuleError::NoTicketsSelected)
        );
        assert_eq!(validate_counts(CUSTOMER, counts(1, 0, 0), 100), Ok(()));
        assert_eq!(validate_counts(CUSTOMER, counts(3, 3, 3), 100), Ok(()));
        assert_eq!(
            validate_counts(CUSTOMER, counts(4, 3, 3), 100),
            Err(BookingRuleError::TooManyTickets)
        );
    }

    #[test]
    fn test_club_minimum_is_ten() {
        assert_eq!(
            validate_counts(CLUB, counts(0, 0, 9), 100),
            Err(BookingRuleError::ClubMinimum)
        );
        assert_eq!(validate_counts(CLUB, counts(0, 0, 10), 100), Ok(()));
        assert_eq!(validate_counts(CLUB, counts(0, 0, 40), 100), Ok(()));
    }

    #[test]
    fn test_seat_shortage_beats_range_rules() {
        // 6 requested against 5 remaining: rejected as not-enough-seats
        assert_eq!(
            validate_counts(CUSTOMER, counts(6, 0, 0), 5),
            Err(BookingRuleError::NotEnoughSeats { remaining: 5 })
        );
        // exactly the remaining seats is fine
        assert_eq!(validate_counts(CUSTOMER, counts(5, 0, 0), 5), Ok(()));
        assert_eq!(
            validate_counts(CLUB, counts(0, 0, 12), 10),
            Err(BookingRuleError::NotEnoughSeats { remaining: 10 })
        );
    }

    #[test]
    fn test_huge_counts_saturate_instead_of_wrapping() {
        // Two counts whose i32 sum would wrap negative must still read as
        // an over-limit request, not slip past the range checks.
        assert_eq!(counts(i32::MAX, 1, 0).total(), i32::MAX);
        assert_eq!(
            validate_counts(CUSTOMER, counts(2_000_000_000, 2_000_000_000, 0), 100),
            Err(BookingRuleError::NotEnoughSeats { remaining: 100 })
        );
        assert_eq!(
            validate_counts(CLUB, counts(0, 0, 2_000_000_000), 100),
            Err(BookingRuleError::NotEnoughSeats { remaining: 100 })
        );
    }

    // ==================== transition tests ====================

    #[test]
    fn test_happy_path_transitions() {
        let session = BookingSession::start(42, CUSTOMER);
        assert_eq!(session.screening_id(), 42);
        assert_eq!(session.counts(), None);

        let session = session.choose(counts(3, 2, 0), 100).unwrap();
        assert_eq!(session.counts(), Some(counts(3, 2, 0)));

        let session = session.confirmed(9, dec!(20.95)).unwrap();
        match session {
            BookingSession::Confirmed {
                booking_id,
                total_price,
                ..
            } => {
                assert_eq!(booking_id, 9);
                assert_eq!(total_price, dec!(20.95));
            }
            other => panic!("unexpected state: {other:?}"),
        }
    }

    #[test]
    fn test_choose_can_be_resubmitted_before_confirm() {
        let session = BookingSession::start(1, CUSTOMER)
            .choose(counts(2, 0, 0), 50)
            .unwrap()
            .choose(counts(4, 0, 0), 50)
            .unwrap();
        assert_eq!(session.counts(), Some(counts(4, 0, 0)));
    }

    #[test]
    fn test_steps_out_of_order_are_rejected() {
        let fresh = BookingSession::start(1, CUSTOMER);
        assert_eq!(
            fresh.clone().confirmed(1, dec!(1)).unwrap_err(),
            BookingRuleError::OutOfOrder
        );

        let done = fresh
            .choose(counts(1, 0, 0), 10)
            .unwrap()
            .confirmed(5, dec!(4.99))
            .unwrap();
        // a replayed step 2 after the booking exists must not restart
        assert_eq!(
            done.clone().choose(counts(2, 0, 0), 10).unwrap_err(),
            BookingRuleError::OutOfOrder
        );
        assert_eq!(
            done.confirmed(6, dec!(1)).unwrap_err(),
            BookingRuleError::OutOfOrder
        );
    }

    #[test]
    fn test_invalid_choose_reports_rule_and_preserves_nothing() {
        let err = BookingSession::start(1, CLUB)
            .choose(counts(0, 0, 5), 100)
            .unwrap_err();
        assert_eq!(err, BookingRuleError::ClubMinimum);
        assert_eq!(
            err.to_string(),
            "A club booking requirement is 10 tickets or more"
        );
    }
}
