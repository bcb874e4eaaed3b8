//! Database-backed booking and statement tests.
//!
//! The seat guard, the decrement-if-sufficient balance debit and the
//! per-month statement guard all live in SQL, so they are exercised
//! against a real database here. Each test gets its own migrated
//! database, provisioned by `#[sqlx::test]` from `DATABASE_URL`, with
//! the seeded ticket prices (adult 4.99, child 2.99, student 3.99).

use chrono::{Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sqlx::PgPool;

use uweflix_web::booking::services::{self, ConfirmOutcome};
use uweflix_web::booking::session::{
    BookingPath, BookingRuleError, BookingSession, TicketCounts,
};
use uweflix_web::db;
use uweflix_web::models::Rating;
use uweflix_web::statements::month_window;

async fn seed_screening(pool: &PgPool, capacity: i32) -> i64 {
    let movie_id = db::create_movie(pool, "Heat", 170, "Thieves and cops", Rating::Fifteen, None)
        .await
        .unwrap();
    let screen_id = db::create_screen(pool, "Screen 1", "Main hall", capacity)
        .await
        .unwrap();
    db::create_screening(pool, movie_id, screen_id, Utc::now() + Duration::days(1))
        .await
        .unwrap()
}

async fn seed_club(pool: &PgPool, balance: Decimal) -> i64 {
    let expiry = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
    let club_id = db::create_club(
        pool,
        "Chess Society",
        "cardhash",
        expiry,
        dec!(0.10),
        "1 Main St",
    )
    .await
    .unwrap();
    if balance > Decimal::ZERO {
        db::credit_balance(pool, club_id, balance).await.unwrap();
    }
    club_id
}

fn students(n: i32) -> TicketCounts {
    TicketCounts {
        adult: 0,
        child: 0,
        student: n,
    }
}

#[sqlx::test]
async fn test_customer_booking_decrements_seats(pool: PgPool) {
    let screening_id = seed_screening(&pool, 100).await;
    let prices = db::get_ticket_prices(&pool).await.unwrap();

    // 3 adult + 2 child at the seeded prices comes to 20.95
    let session = BookingSession::start(screening_id, BookingPath::Customer)
        .choose(
            TicketCounts {
                adult: 3,
                child: 2,
                student: 0,
            },
            100,
        )
        .unwrap();
    let outcome = services::confirm_booking(&pool, session, None, &prices, None)
        .await
        .unwrap();
    match outcome {
        ConfirmOutcome::Booked { total_price, .. } => assert_eq!(total_price, dec!(20.95)),
        ConfirmOutcome::Rejected { rule, .. } => panic!("rejected: {rule}"),
    }

    let summary = db::get_screening_summary(&pool, screening_id).await.unwrap();
    assert_eq!(summary.seats_remaining, 95);
}

#[sqlx::test]
async fn test_club_debit_is_exact_and_guarded(pool: PgPool) {
    let screening_id = seed_screening(&pool, 100).await;
    let club_id = seed_club(&pool, dec!(50.00)).await;
    let prices = db::get_ticket_prices(&pool).await.unwrap();
    let path = BookingPath::ClubRep { club_id };

    // 10 students at 3.99 less the 10% club discount is exactly 35.91
    let session = BookingSession::start(screening_id, path)
        .choose(students(10), 100)
        .unwrap();
    let outcome = services::confirm_booking(&pool, session, None, &prices, Some(dec!(0.10)))
        .await
        .unwrap();
    assert!(
        matches!(outcome, ConfirmOutcome::Booked { total_price, .. } if total_price == dec!(35.91))
    );
    assert_eq!(db::get_club(&pool, club_id).await.unwrap().balance, dec!(14.09));

    // 14.09 left cannot cover a second 35.91 booking; nothing changes
    let session = BookingSession::start(screening_id, path)
        .choose(students(10), 90)
        .unwrap();
    let outcome = services::confirm_booking(&pool, session, None, &prices, Some(dec!(0.10)))
        .await
        .unwrap();
    assert!(matches!(
        outcome,
        ConfirmOutcome::Rejected {
            rule: BookingRuleError::InsufficientFunds,
            ..
        }
    ));
    assert_eq!(db::get_club(&pool, club_id).await.unwrap().balance, dec!(14.09));
    let summary = db::get_screening_summary(&pool, screening_id).await.unwrap();
    assert_eq!(summary.seats_remaining, 90);
}

#[sqlx::test]
async fn test_confirm_recheck_catches_stale_seat_counts(pool: PgPool) {
    let screening_id = seed_screening(&pool, 5).await;
    let prices = db::get_ticket_prices(&pool).await.unwrap();

    // The choose step saw stale availability; the commit transaction
    // recomputes the count under the screening lock and rejects.
    let session = BookingSession::start(screening_id, BookingPath::Customer)
        .choose(
            TicketCounts {
                adult: 6,
                child: 0,
                student: 0,
            },
            100,
        )
        .unwrap();
    let outcome = services::confirm_booking(&pool, session, None, &prices, None)
        .await
        .unwrap();
    assert!(matches!(
        outcome,
        ConfirmOutcome::Rejected {
            rule: BookingRuleError::NotEnoughSeats { remaining: 5 },
            ..
        }
    ));
    let summary = db::get_screening_summary(&pool, screening_id).await.unwrap();
    assert_eq!(summary.seats_remaining, 5);
}

#[sqlx::test]
async fn test_statement_generation_is_once_per_month(pool: PgPool) {
    let screening_id = seed_screening(&pool, 100).await;
    let club_id = seed_club(&pool, dec!(50.00)).await;
    let prices = db::get_ticket_prices(&pool).await.unwrap();

    let session = BookingSession::start(screening_id, BookingPath::ClubRep { club_id })
        .choose(students(10), 100)
        .unwrap();
    let outcome = services::confirm_booking(&pool, session, None, &prices, Some(dec!(0.10)))
        .await
        .unwrap();
    assert!(matches!(outcome, ConfirmOutcome::Booked { .. }));

    let (period, from, until) = month_window(Utc::now());
    let created = db::generate_statements(&pool, period, from, until).await.unwrap();
    assert_eq!(created, 1);

    // Re-running inside the same month creates nothing more
    let created_again = db::generate_statements(&pool, period, from, until).await.unwrap();
    assert_eq!(created_again, 0);

    let statements = db::list_statements(&pool).await.unwrap();
    assert_eq!(statements.len(), 1);
    assert_eq!(statements[0].amount, dec!(35.91));
}
