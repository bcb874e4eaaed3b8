//! Club management, top-up and join-club handlers

use askama::Template;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::auth::{gate, passwords};
use crate::db;
use crate::error::{AppError, Result};
use crate::models::{BookingSummary, Club, User};
use crate::statements::month_window;
use crate::AppState;

#[derive(Template)]
#[template(path = "clubs.html")]
struct ClubsTemplate {
    clubs: Vec<Club>,
}

pub async fn list(State(state): State<AppState>, headers: HeaderMap) -> Result<Html<String>> {
    gate::require(&state.cache, &headers, super::ANY_MANAGER).await?;
    let clubs = db::list_clubs(&state.db).await?;
    Ok(Html(ClubsTemplate { clubs }.render()?))
}

#[derive(Template)]
#[template(path = "club_form.html")]
struct ClubFormTemplate {
    action: String,
    // card number is only collected at creation; edits keep the stored hash
    is_edit: bool,
    name: String,
    card_expiry: String,
    discount_rate: String,
    address: String,
    error: String,
    has_error: bool,
}

#[derive(Debug, Deserialize)]
pub struct ClubForm {
    pub name: String,
    #[serde(default)]
    pub card_number: String,
    /// As posted by a date input
    pub card_expiry: String,
    pub discount_rate: Decimal,
    pub address: String,
}

impl ClubForm {
    fn expiry(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.card_expiry, "%Y-%m-%d").ok()
    }

    fn validated(&self, needs_card: bool) -> std::result::Result<NaiveDate, String> {
        if self.name.trim().is_empty() {
            return Err("Name must not be empty".to_string());
        }
        if needs_card && self.card_number.trim().is_empty() {
            return Err("Card number must not be empty".to_string());
        }
        if self.discount_rate.is_sign_negative() || self.discount_rate >= Decimal::ONE {
            return Err("Discount rate must be between 0 and 1".to_string());
        }
        self.expiry().ok_or("Enter a valid expiry date".to_string())
    }
}

fn club_form_with_error(action: String, is_edit: bool, form: &ClubForm, error: String) -> ClubFormTemplate {
    ClubFormTemplate {
        action,
        is_edit,
        name: form.name.clone(),
        card_expiry: form.card_expiry.clone(),
        discount_rate: form.discount_rate.to_string(),
        address: form.address.clone(),
        has_error: !error.is_empty(),
        error,
    }
}

pub async fn new_club_page(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Html<String>> {
    gate::require(&state.cache, &headers, super::ANY_MANAGER).await?;
    let html = ClubFormTemplate {
        action: "/clubs/new".to_string(),
        is_edit: false,
        name: String::new(),
        card_expiry: String::new(),
        discount_rate: String::new(),
        address: String::new(),
        error: String::new(),
        has_error: false,
    }
    .render()?;
    Ok(Html(html))
}

/// The card number is hashed before it touches the database; the raw
/// number is dropped with the request.
pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<ClubForm>,
) -> Result<Response> {
    gate::require(&state.cache, &headers, super::ANY_MANAGER).await?;
    match form.validated(true) {
        Ok(expiry) => {
            let card_hash = passwords::hash_card_number(form.card_number.trim());
            db::create_club(
                &state.db,
                form.name.trim(),
                &card_hash,
                expiry,
                form.discount_rate,
                &form.address,
            )
            .await?;
            Ok(Redirect::to("/clubs").into_response())
        }
        Err(error) => {
            let html =
                club_form_with_error("/clubs/new".to_string(), false, &form, error).render()?;
            Ok(Html(html).into_response())
        }
    }
}

pub async fn edit_club_page(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Html<String>> {
    gate::require(&state.cache, &headers, super::ANY_MANAGER).await?;
    let club = db::get_club(&state.db, id).await?;
    let html = ClubFormTemplate {
        action: format!("/clubs/{id}/edit"),
        is_edit: true,
        name: club.name,
        card_expiry: club.card_expiry.format("%Y-%m-%d").to_string(),
        discount_rate: club.discount_rate.to_string(),
        address: club.address,
        error: String::new(),
        has_error: false,
    }
    .render()?;
    Ok(Html(html))
}

pub async fn update(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Form(form): Form<ClubForm>,
) -> Result<Response> {
    gate::require(&state.cache, &headers, super::ANY_MANAGER).await?;
    match form.validated(false) {
        Ok(expiry) => {
            db::update_club(
                &state.db,
                id,
                form.name.trim(),
                expiry,
                form.discount_rate,
                &form.address,
            )
            .await?;
            Ok(Redirect::to("/clubs").into_response())
        }
        Err(error) => {
            let html =
                club_form_with_error(format!("/clubs/{id}/edit"), true, &form, error).render()?;
            Ok(Html(html).into_response())
        }
    }
}

pub async fn delete(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Redirect> {
    gate::require(&state.cache, &headers, super::ANY_MANAGER).await?;
    db::delete_club(&state.db, id).await?;
    Ok(Redirect::to("/clubs"))
}

#[derive(Template)]
#[template(path = "club_transactions.html")]
struct ClubTransactionsTemplate {
    club_name: String,
    month: String,
    bookings: Vec<BookingSummary>,
    total: String,
}

/// The club's bookings for the current calendar month, with a month total
pub async fn transactions(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Html<String>> {
    gate::require(&state.cache, &headers, super::ACCOUNT_MANAGER).await?;
    let club = db::get_club(&state.db, id).await?;
    let (period, from, until) = month_window(Utc::now());
    let bookings = db::club_bookings_between(&state.db, id, from, until).await?;
    let total: Decimal = bookings.iter().map(|b| b.total_price).sum();

    let html = ClubTransactionsTemplate {
        club_name: club.name,
        month: period.format("%B %Y").to_string(),
        bookings,
        total: format!("{total:.2}"),
    }
    .render()?;
    Ok(Html(html))
}

#[derive(Template)]
#[template(path = "club_top_up.html")]
struct TopUpTemplate {
    club_name: String,
    balance: String,
    error: String,
    has_error: bool,
}

#[derive(Debug, Deserialize)]
pub struct TopUpForm {
    pub card_number: String,
    pub card_expiry: String,
    pub amount: Decimal,
}

async fn rep_club(state: &AppState, headers: &HeaderMap) -> Result<Club> {
    let user = gate::require(&state.cache, headers, super::CLUB_REP).await?;
    let club_id = user.club_id.ok_or(AppError::Forbidden)?;
    db::get_club(&state.db, club_id).await
}

pub async fn top_up_page(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Html<String>> {
    let club = rep_club(&state, &headers).await?;
    let html = TopUpTemplate {
        club_name: club.name,
        balance: format!("{:.2}", club.balance),
        error: String::new(),
        has_error: false,
    }
    .render()?;
    Ok(Html(html))
}

/// Top up the club balance. The card number and expiry must match the
/// details stored for the club.
pub async fn top_up(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<TopUpForm>,
) -> Result<Response> {
    let club = rep_club(&state, &headers).await?;

    let error = if !club.check_card(form.card_number.trim()) {
        Some("Card number does not match")
    } else if NaiveDate::parse_from_str(&form.card_expiry, "%Y-%m-%d") != Ok(club.card_expiry) {
        Some("Expiry date does not match")
    } else if form.amount <= Decimal::ZERO {
        Some("Amount must be positive")
    } else {
        None
    };

    if let Some(error) = error {
        let html = TopUpTemplate {
            club_name: club.name,
            balance: format!("{:.2}", club.balance),
            error: error.to_string(),
            has_error: true,
        }
        .render()?;
        return Ok(Html(html).into_response());
    }

    let balance = db::credit_balance(&state.db, club.id, form.amount).await?;
    tracing::info!(club_id = club.id, amount = %form.amount, balance = %balance, "club topped up");
    Ok(Redirect::to("/club-rep").into_response())
}

#[derive(Template)]
#[template(path = "pending_requests.html")]
struct PendingRequestsTemplate {
    users: Vec<User>,
}

pub async fn pending_requests(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Html<String>> {
    let club = rep_club(&state, &headers).await?;
    let users = db::pending_join_requests(&state.db, club.id).await?;
    Ok(Html(PendingRequestsTemplate { users }.render()?))
}

pub async fn accept_request(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Redirect> {
    let club = rep_club(&state, &headers).await?;
    db::accept_join(&state.db, id, club.id).await?;
    Ok(Redirect::to("/club/requests"))
}

pub async fn reject_request(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Redirect> {
    let club = rep_club(&state, &headers).await?;
    db::reject_join(&state.db, id, club.id).await?;
    Ok(Redirect::to("/club/requests"))
}

#[derive(Template)]
#[template(path = "join_club.html")]
struct JoinClubTemplate {
    clubs: Vec<Club>,
}

#[derive(Debug, Deserialize)]
pub struct JoinClubForm {
    pub club_id: i64,
}

pub async fn join_club_page(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Html<String>> {
    gate::require(&state.cache, &headers, super::STUDENT).await?;
    let clubs = db::list_clubs(&state.db).await?;
    Ok(Html(JoinClubTemplate { clubs }.render()?))
}

/// A student asks to join a club; the club's rep decides later
pub async fn join_club(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<JoinClubForm>,
) -> Result<Redirect> {
    let user = gate::require(&state.cache, &headers, super::STUDENT).await?;
    let club = db::get_club(&state.db, form.club_id).await?;
    db::request_join(&state.db, user.user_id, club.id).await?;
    Ok(Redirect::to("/"))
}
