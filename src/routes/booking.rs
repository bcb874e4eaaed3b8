//! Booking flow and booking management handlers
//!
//! The flow state lives server-side keyed by a cookie token; each handler
//! loads it, drives it one step, and stores it back. A request arriving
//! without a live flow is bounced to the movie listings.

use askama::Template;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::auth::{gate, sessions, BOOKING_COOKIE};
use crate::booking::requests::{EmailForm, PaymentForm, QuantitiesForm};
use crate::booking::services::{self, ConfirmOutcome};
use crate::booking::session::{BookingPath, BookingSession};
use crate::db;
use crate::error::{AppError, Result};
use crate::models::{BookingSummary, Role, ScreeningSummary};
use crate::notify::BookingConfirmation;
use crate::statements::month_window;
use crate::{qr, AppState};

async fn load_flow(state: &AppState, headers: &HeaderMap) -> Option<(Uuid, BookingSession)> {
    let token = sessions::cookie_token(headers, BOOKING_COOKIE)?;
    let session = state.cache.booking_sessions.get(&token).await?;
    Some((token, session))
}

fn money(amount: Decimal) -> String {
    format!("{amount:.2}")
}

/// Club discount, when the flow runs on the club path
async fn flow_discount(state: &AppState, path: BookingPath) -> Result<Option<Decimal>> {
    match path {
        BookingPath::ClubRep { club_id } => {
            let club = db::get_club(&state.db, club_id).await?;
            Ok(Some(club.discount_rate))
        }
        BookingPath::Customer => Ok(None),
    }
}

#[derive(Template)]
#[template(path = "booking_form.html")]
struct BookingFormTemplate {
    movie_name: String,
    screen_name: String,
    showing: String,
    seats_remaining: i64,
    is_club: bool,
    adult_price: String,
    child_price: String,
    student_price: String,
    warning: String,
    has_warning: bool,
}

impl BookingFormTemplate {
    async fn build(
        state: &AppState,
        screening: &ScreeningSummary,
        is_club: bool,
        warning: String,
    ) -> Result<Self> {
        let prices = services::ticket_prices(&state.db, &state.cache).await?;
        Ok(Self {
            movie_name: screening.movie_name.clone(),
            screen_name: screening.screen_name.clone(),
            showing: screening.long_date(),
            seats_remaining: screening.seats_remaining,
            is_club,
            adult_price: money(prices.adult),
            child_price: money(prices.child),
            student_price: money(prices.student),
            has_warning: !warning.is_empty(),
            warning,
        })
    }
}

/// Step 1: pick a screening. Club reps enter the club path; everyone
/// else, signed in or not, books as a customer.
pub async fn start(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(screening_id): Path<i64>,
) -> Result<Response> {
    let screening = db::get_screening_summary(&state.db, screening_id).await?;

    let path = match sessions::current_user(&state.cache, &headers).await {
        Some(user) if user.role == Role::ClubRep => match user.club_id {
            Some(club_id) => BookingPath::ClubRep { club_id },
            None => BookingPath::Customer,
        },
        _ => BookingPath::Customer,
    };
    let is_club = matches!(path, BookingPath::ClubRep { .. });

    let token = Uuid::new_v4();
    state
        .cache
        .booking_sessions
        .insert(token, BookingSession::start(screening_id, path))
        .await;

    let html = BookingFormTemplate::build(&state, &screening, is_club, String::new())
        .await?
        .render()?;
    let mut response = Html(html).into_response();
    response.headers_mut().append(
        header::SET_COOKIE,
        sessions::session_cookie(BOOKING_COOKIE, token),
    );
    Ok(response)
}

/// Step 2: ticket quantities. Rule failures re-render the form with the
/// warning; customers go on to payment, club reps straight to confirm.
pub async fn choose_tickets(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<QuantitiesForm>,
) -> Result<Response> {
    let Some((token, session)) = load_flow(&state, &headers).await else {
        return Ok(Redirect::to("/movies").into_response());
    };
    let screening = db::get_screening_summary(&state.db, session.screening_id()).await?;
    let path = session.path();
    let is_club = matches!(path, BookingPath::ClubRep { .. });

    match session.choose(form.counts(), screening.seats_remaining) {
        Ok(advanced) => {
            state.cache.booking_sessions.insert(token, advanced).await;
            let next = if is_club {
                "/booking/confirm"
            } else {
                "/booking/payment"
            };
            Ok(Redirect::to(next).into_response())
        }
        Err(rule) => {
            let html = BookingFormTemplate::build(&state, &screening, is_club, rule.to_string())
                .await?
                .render()?;
            Ok(Html(html).into_response())
        }
    }
}

#[derive(Template)]
#[template(path = "payment.html")]
struct PaymentTemplate {
    movie_name: String,
    showing: String,
    total_tickets: i32,
    total: String,
}

pub async fn payment_page(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response> {
    let Some((_, session)) = load_flow(&state, &headers).await else {
        return Ok(Redirect::to("/movies").into_response());
    };
    let Some(counts) = session.counts() else {
        return Ok(Redirect::to("/movies").into_response());
    };
    let screening = db::get_screening_summary(&state.db, session.screening_id()).await?;
    let prices = services::ticket_prices(&state.db, &state.cache).await?;
    let quote = services::quote(counts, &prices, None);

    let showing = screening.long_date();
    let html = PaymentTemplate {
        movie_name: screening.movie_name,
        showing,
        total_tickets: quote.total_tickets,
        total: money(quote.total),
    }
    .render()?;
    Ok(Html(html).into_response())
}

/// Card details are collected and discarded; the step only gates the
/// confirm page.
pub async fn payment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(_form): Form<PaymentForm>,
) -> Result<Redirect> {
    if load_flow(&state, &headers).await.is_none() {
        return Ok(Redirect::to("/movies"));
    }
    Ok(Redirect::to("/booking/confirm"))
}

#[derive(Template)]
#[template(path = "confirm_booking.html")]
struct ConfirmTemplate {
    movie_name: String,
    screen_name: String,
    showing: String,
    total_tickets: i32,
    subtotal: String,
    total: String,
    has_discount: bool,
    warning: String,
    has_warning: bool,
}

async fn render_confirm(
    state: &AppState,
    session: &BookingSession,
    warning: String,
) -> Result<Response> {
    let Some(counts) = session.counts() else {
        return Ok(Redirect::to("/movies").into_response());
    };
    let screening = db::get_screening_summary(&state.db, session.screening_id()).await?;
    let prices = services::ticket_prices(&state.db, &state.cache).await?;
    let discount = flow_discount(state, session.path()).await?;
    let quote = services::quote(counts, &prices, discount);

    let showing = screening.long_date();
    let html = ConfirmTemplate {
        movie_name: screening.movie_name,
        screen_name: screening.screen_name,
        showing,
        total_tickets: quote.total_tickets,
        subtotal: money(quote.subtotal),
        total: money(quote.total),
        has_discount: quote.discount_rate.is_some(),
        has_warning: !warning.is_empty(),
        warning,
    }
    .render()?;
    Ok(Html(html).into_response())
}

pub async fn confirm_page(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response> {
    let Some((_, session)) = load_flow(&state, &headers).await else {
        return Ok(Redirect::to("/movies").into_response());
    };
    render_confirm(&state, &session, String::new()).await
}

/// Step 3: write the booking. Seats and, on the club path, the balance
/// are re-checked inside the transaction; a failed check re-renders the
/// page with the violated rule.
pub async fn confirm(State(state): State<AppState>, headers: HeaderMap) -> Result<Response> {
    let Some((token, session)) = load_flow(&state, &headers).await else {
        return Ok(Redirect::to("/movies").into_response());
    };
    let prices = services::ticket_prices(&state.db, &state.cache).await?;
    let discount = flow_discount(&state, session.path()).await?;
    let user_id = sessions::current_user(&state.cache, &headers)
        .await
        .map(|u| u.user_id);

    match services::confirm_booking(&state.db, session, user_id, &prices, discount).await? {
        ConfirmOutcome::Booked { session, .. } => {
            state.cache.booking_sessions.insert(token, session).await;
            Ok(Redirect::to("/booking/email").into_response())
        }
        ConfirmOutcome::Rejected { session, rule } => {
            render_confirm(&state, &session, rule.to_string()).await
        }
    }
}

#[derive(Template)]
#[template(path = "email_confirmation.html")]
struct EmailTemplate {
    booking_id: i64,
    movie_name: String,
    showing: String,
    total_tickets: i32,
    total: String,
    qr_data: String,
    has_qr: bool,
}

pub async fn email_page(State(state): State<AppState>, headers: HeaderMap) -> Result<Response> {
    let Some((_, session)) = load_flow(&state, &headers).await else {
        return Ok(Redirect::to("/movies").into_response());
    };
    let BookingSession::Confirmed {
        screening_id,
        booking_id,
        total_price,
        counts,
        ..
    } = session
    else {
        return Ok(Redirect::to("/movies").into_response());
    };
    let screening = db::get_screening_summary(&state.db, screening_id).await?;

    let qr_data = qr::booking_qr_data_uri(booking_id);
    let showing = screening.long_date();
    let html = EmailTemplate {
        booking_id,
        movie_name: screening.movie_name,
        showing,
        total_tickets: counts.total(),
        total: money(total_price),
        has_qr: qr_data.is_some(),
        qr_data: qr_data.unwrap_or_default(),
    }
    .render()?;
    Ok(Html(html).into_response())
}

/// Step 4: send the confirmation. The notification POST is fire and
/// forget; a slow or dead receiver never blocks the response.
pub async fn email(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<EmailForm>,
) -> Result<Response> {
    let Some((token, session)) = load_flow(&state, &headers).await else {
        return Ok(Redirect::to("/movies").into_response());
    };
    let BookingSession::Confirmed {
        screening_id,
        booking_id,
        total_price,
        counts,
        ..
    } = session
    else {
        return Ok(Redirect::to("/movies").into_response());
    };

    let screening = db::get_screening_summary(&state.db, screening_id).await?;
    let name = match sessions::current_user(&state.cache, &headers).await {
        Some(user) => user.username.clone(),
        None => "Guest".to_string(),
    };
    let showing = screening.long_date();
    let confirmation = BookingConfirmation {
        name,
        email: form.email_address,
        movie: screening.movie_name,
        date: showing,
        screen: screening.screen_name,
        total_tickets: counts.total(),
        total_price: money(total_price),
        id: booking_id,
    };
    let notifier = state.notifier.clone();
    tokio::spawn(async move {
        notifier.send(&confirmation).await;
    });

    // flow complete
    state.cache.booking_sessions.invalidate(&token).await;
    let mut response = Redirect::to("/").into_response();
    response
        .headers_mut()
        .append(header::SET_COOKIE, sessions::clear_cookie(BOOKING_COOKIE));
    Ok(response)
}

#[derive(Template)]
#[template(path = "my_bookings.html")]
struct MyBookingsTemplate {
    bookings: Vec<BookingSummary>,
}

pub async fn my_bookings(State(state): State<AppState>, headers: HeaderMap) -> Result<Html<String>> {
    let user = sessions::current_user(&state.cache, &headers)
        .await
        .ok_or(AppError::Forbidden)?;
    let (_, from, until) = month_window(Utc::now());
    let bookings = db::user_bookings_between(&state.db, user.user_id, from, until).await?;
    Ok(Html(MyBookingsTemplate { bookings }.render()?))
}

pub async fn request_cancel(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Redirect> {
    let user = sessions::current_user(&state.cache, &headers)
        .await
        .ok_or(AppError::Forbidden)?;
    services::request_cancellation(&state.db, id, user.user_id).await?;
    Ok(Redirect::to("/bookings/mine"))
}

#[derive(Template)]
#[template(path = "manage_bookings.html")]
struct ManageBookingsTemplate {
    bookings: Vec<BookingSummary>,
}

pub async fn manage_bookings(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Html<String>> {
    gate::require(&state.cache, &headers, super::ANY_MANAGER).await?;
    let bookings = db::all_bookings(&state.db).await?;
    Ok(Html(ManageBookingsTemplate { bookings }.render()?))
}

#[derive(Template)]
#[template(path = "cancellations.html")]
struct CancellationsTemplate {
    bookings: Vec<BookingSummary>,
}

pub async fn cancellations(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Html<String>> {
    gate::require(&state.cache, &headers, super::CINEMA_MANAGER).await?;
    let bookings = db::cancellation_requests(&state.db).await?;
    Ok(Html(CancellationsTemplate { bookings }.render()?))
}

pub async fn approve_cancellation(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Redirect> {
    gate::require(&state.cache, &headers, super::CINEMA_MANAGER).await?;
    services::approve_cancellation(&state.db, id).await?;
    Ok(Redirect::to("/manage/cancellations"))
}

pub async fn deny_cancellation(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Redirect> {
    gate::require(&state.cache, &headers, super::CINEMA_MANAGER).await?;
    services::deny_cancellation(&state.db, id).await?;
    Ok(Redirect::to("/manage/cancellations"))
}

#[derive(Template)]
#[template(path = "club_bookings.html")]
struct ClubBookingsTemplate {
    club_name: String,
    bookings: Vec<BookingSummary>,
}

pub async fn club_bookings(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Html<String>> {
    let user = gate::require(&state.cache, &headers, super::CLUB_REP).await?;
    let club_id = user.club_id.ok_or(AppError::Forbidden)?;
    let club = db::get_club(&state.db, club_id).await?;
    let (_, from, until) = month_window(Utc::now());
    let bookings = db::club_bookings_between(&state.db, club_id, from, until).await?;
    Ok(Html(
        ClubBookingsTemplate {
            club_name: club.name,
            bookings,
        }
        .render()?,
    ))
}
