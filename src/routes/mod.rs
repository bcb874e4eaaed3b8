//! Route handlers and router assembly

pub mod accounts;
pub mod booking;
pub mod catalog;
pub mod clubs;
pub mod pages;
pub mod statements;

use axum::routing::{get, post};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::models::Role;
use crate::AppState;

// Role sets accepted by the protected pages
pub(crate) const CINEMA_MANAGER: &[Role] = &[Role::CinemaManager];
pub(crate) const ACCOUNT_MANAGER: &[Role] = &[Role::AccountManager];
pub(crate) const ANY_MANAGER: &[Role] = &[Role::CinemaManager, Role::AccountManager];
pub(crate) const CLUB_REP: &[Role] = &[Role::ClubRep];
pub(crate) const STUDENT: &[Role] = &[Role::Student];

pub fn router(state: AppState) -> Router {
    Router::new()
        // Public pages
        .route("/", get(pages::home))
        .route("/account", get(pages::account))
        .route("/movies", get(catalog::movies))
        .route("/movies/:id/screenings", get(catalog::movie_screenings))
        // Accounts
        .route("/login", get(accounts::login_page).post(accounts::login))
        .route("/logout", get(accounts::logout))
        .route("/register", get(accounts::register_page).post(accounts::register))
        .route(
            "/register-staff",
            get(accounts::register_staff_page).post(accounts::register_staff),
        )
        // Booking flow
        .route("/booking/start/:screening_id", get(booking::start))
        .route("/booking/tickets", post(booking::choose_tickets))
        .route(
            "/booking/payment",
            get(booking::payment_page).post(booking::payment),
        )
        .route(
            "/booking/confirm",
            get(booking::confirm_page).post(booking::confirm),
        )
        .route(
            "/booking/email",
            get(booking::email_page).post(booking::email),
        )
        .route("/bookings/mine", get(booking::my_bookings))
        .route("/bookings/:id/request-cancel", post(booking::request_cancel))
        // Cinema manager
        .route("/manage", get(pages::cinema_manager))
        .route("/manage/movies", get(catalog::manage_movies))
        .route(
            "/manage/movies/new",
            get(catalog::new_movie_page).post(catalog::create_movie),
        )
        .route(
            "/manage/movies/:id/edit",
            get(catalog::edit_movie_page).post(catalog::update_movie),
        )
        .route("/manage/movies/:id/delete", post(catalog::delete_movie))
        .route("/manage/screens", get(catalog::manage_screens))
        .route(
            "/manage/screens/new",
            get(catalog::new_screen_page).post(catalog::create_screen),
        )
        .route(
            "/manage/screens/:id/edit",
            get(catalog::edit_screen_page).post(catalog::update_screen),
        )
        .route("/manage/screens/:id/delete", post(catalog::delete_screen))
        .route("/manage/screenings", get(catalog::manage_screenings))
        .route(
            "/manage/screenings/new",
            get(catalog::new_screening_page).post(catalog::create_screening),
        )
        .route(
            "/manage/screenings/:id/edit",
            get(catalog::edit_screening_page).post(catalog::update_screening),
        )
        .route(
            "/manage/screenings/:id/delete",
            post(catalog::delete_screening),
        )
        .route(
            "/manage/ticket-prices",
            get(catalog::ticket_prices_page).post(catalog::update_ticket_prices),
        )
        .route("/manage/bookings", get(booking::manage_bookings))
        .route("/manage/cancellations", get(booking::cancellations))
        .route(
            "/manage/cancellations/:id/approve",
            post(booking::approve_cancellation),
        )
        .route(
            "/manage/cancellations/:id/deny",
            post(booking::deny_cancellation),
        )
        .route("/manage/approvals", get(accounts::approvals))
        .route("/manage/approvals/:id/approve", post(accounts::approve_account))
        .route("/manage/approvals/:id/reject", post(accounts::reject_account))
        .route("/manage/staff", get(accounts::staff_accounts))
        .route("/manage/staff/:id/activate", post(accounts::activate_account))
        .route(
            "/manage/staff/:id/deactivate",
            post(accounts::deactivate_account),
        )
        .route(
            "/manage/club-reps/new",
            get(accounts::new_club_rep_page).post(accounts::create_club_rep),
        )
        // Clubs
        .route("/clubs", get(clubs::list))
        .route("/clubs/new", get(clubs::new_club_page).post(clubs::create))
        .route(
            "/clubs/:id/edit",
            get(clubs::edit_club_page).post(clubs::update),
        )
        .route("/clubs/:id/delete", post(clubs::delete))
        .route("/clubs/:id/transactions", get(clubs::transactions))
        // Club rep
        .route("/club-rep", get(pages::club_rep))
        .route("/club/top-up", get(clubs::top_up_page).post(clubs::top_up))
        .route("/club/bookings", get(booking::club_bookings))
        .route("/club/requests", get(clubs::pending_requests))
        .route("/club/requests/:id/accept", post(clubs::accept_request))
        .route("/club/requests/:id/reject", post(clubs::reject_request))
        // Student
        .route("/student", get(pages::student))
        .route(
            "/join-club",
            get(clubs::join_club_page).post(clubs::join_club),
        )
        // Account manager
        .route("/account-manager", get(pages::account_manager))
        .route("/statements", get(statements::list))
        .route("/statements/generate", post(statements::generate))
        .nest_service("/static", ServeDir::new("static"))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .with_state(state)
}
