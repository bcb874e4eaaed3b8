//! Login, registration, account approval and staff management

use askama::Template;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use serde::Deserialize;

use crate::auth::{gate, passwords, sessions, AuthSession, AUTH_COOKIE};
use crate::db;
use crate::error::Result;
use crate::models::{Role, User};
use crate::AppState;

#[derive(Template)]
#[template(path = "login.html")]
struct LoginTemplate {
    error: String,
    has_error: bool,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

pub async fn login_page() -> Result<Html<String>> {
    Ok(Html(
        LoginTemplate {
            error: String::new(),
            has_error: false,
        }
        .render()?,
    ))
}

fn login_failed() -> Result<Response> {
    let html = LoginTemplate {
        error: "Invalid username or password".to_string(),
        has_error: true,
    }
    .render()?;
    Ok(Html(html).into_response())
}

pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let Some(user) = db::find_by_username(&state.db, &form.username).await? else {
        return login_failed();
    };
    // Deactivated accounts cannot authenticate
    if !user.is_active
        || !passwords::verify_password(&form.password, &user.password_salt, &user.password_hash)
    {
        return login_failed();
    }

    let destination = match user.role {
        Role::ClubRep => "/club-rep",
        _ => "/",
    };
    let token = sessions::open_session(
        &state.cache,
        AuthSession {
            user_id: user.id,
            username: user.username,
            role: user.role,
            club_id: user.club_id,
        },
    )
    .await;

    let mut response = Redirect::to(destination).into_response();
    response
        .headers_mut()
        .append(header::SET_COOKIE, sessions::session_cookie(AUTH_COOKIE, token));
    Ok(response)
}

pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    sessions::close_session(&state.cache, &headers).await;
    let mut response = Redirect::to("/").into_response();
    response
        .headers_mut()
        .append(header::SET_COOKIE, sessions::clear_cookie(AUTH_COOKIE));
    response
}

#[derive(Template)]
#[template(path = "register.html")]
struct RegisterTemplate {
    error: String,
    has_error: bool,
}

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub password1: String,
    pub password2: String,
}

pub async fn register_page() -> Result<Html<String>> {
    Ok(Html(
        RegisterTemplate {
            error: String::new(),
            has_error: false,
        }
        .render()?,
    ))
}

/// Customer self-registration; the account is active immediately
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Result<Response> {
    if let Some(error) = registration_error(&state, &form).await? {
        let html = RegisterTemplate {
            error,
            has_error: true,
        }
        .render()?;
        return Ok(Html(html).into_response());
    }

    let salt = passwords::new_salt();
    let hash = passwords::hash_password(&form.password1, &salt);
    db::create_user(&state.db, &form.username, &hash, &salt, Role::Student, None, true).await?;

    Ok(Redirect::to("/login").into_response())
}

async fn registration_error(state: &AppState, form: &RegisterForm) -> Result<Option<String>> {
    if form.username.trim().is_empty() {
        return Ok(Some("Username must not be empty".to_string()));
    }
    if form.password1 != form.password2 {
        return Ok(Some("Passwords do not match".to_string()));
    }
    if db::username_exists(&state.db, &form.username).await? {
        return Ok(Some("Username already taken".to_string()));
    }
    Ok(None)
}

#[derive(Template)]
#[template(path = "register_staff.html")]
struct RegisterStaffTemplate {
    error: String,
    has_error: bool,
}

#[derive(Debug, Deserialize)]
pub struct RegisterStaffForm {
    pub username: String,
    pub password1: String,
    pub password2: String,
    pub role: String,
}

pub async fn register_staff_page() -> Result<Html<String>> {
    Ok(Html(
        RegisterStaffTemplate {
            error: String::new(),
            has_error: false,
        }
        .render()?,
    ))
}

/// Staff self-registration; the account starts inactive and waits in the
/// cinema manager's approval queue
pub async fn register_staff(
    State(state): State<AppState>,
    Form(form): Form<RegisterStaffForm>,
) -> Result<Response> {
    let plain = RegisterForm {
        username: form.username.clone(),
        password1: form.password1.clone(),
        password2: form.password2.clone(),
    };
    // only the two manager roles register this way
    let role = Role::parse(&form.role)
        .filter(|r| matches!(r, Role::CinemaManager | Role::AccountManager));

    let error = match (registration_error(&state, &plain).await?, role) {
        (Some(error), _) => Some(error),
        (None, None) => Some("Choose a staff role".to_string()),
        (None, Some(_)) => None,
    };
    if let Some(error) = error {
        let html = RegisterStaffTemplate {
            error,
            has_error: true,
        }
        .render()?;
        return Ok(Html(html).into_response());
    }

    let salt = passwords::new_salt();
    let hash = passwords::hash_password(&form.password1, &salt);
    db::create_user(
        &state.db,
        &form.username,
        &hash,
        &salt,
        role.unwrap_or(Role::Student),
        None,
        false,
    )
    .await?;

    Ok(Redirect::to("/login").into_response())
}

#[derive(Template)]
#[template(path = "approvals.html")]
struct ApprovalsTemplate {
    users: Vec<User>,
}

/// Staff accounts waiting for activation
pub async fn approvals(State(state): State<AppState>, headers: HeaderMap) -> Result<Html<String>> {
    gate::require(&state.cache, &headers, super::CINEMA_MANAGER).await?;
    let users = db::inactive_users(&state.db).await?;
    Ok(Html(ApprovalsTemplate { users }.render()?))
}

pub async fn approve_account(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Redirect> {
    gate::require(&state.cache, &headers, super::CINEMA_MANAGER).await?;
    db::set_active(&state.db, id, true).await?;
    Ok(Redirect::to("/manage/approvals"))
}

pub async fn reject_account(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Redirect> {
    gate::require(&state.cache, &headers, super::CINEMA_MANAGER).await?;
    db::delete_user(&state.db, id).await?;
    Ok(Redirect::to("/manage/approvals"))
}

#[derive(Template)]
#[template(path = "staff_accounts.html")]
struct StaffAccountsTemplate {
    users: Vec<User>,
}

pub async fn staff_accounts(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Html<String>> {
    gate::require(&state.cache, &headers, super::CINEMA_MANAGER).await?;
    let users = db::staff_accounts(&state.db).await?;
    Ok(Html(StaffAccountsTemplate { users }.render()?))
}

pub async fn activate_account(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Redirect> {
    gate::require(&state.cache, &headers, super::CINEMA_MANAGER).await?;
    db::set_active(&state.db, id, true).await?;
    Ok(Redirect::to("/manage/staff"))
}

pub async fn deactivate_account(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Redirect> {
    gate::require(&state.cache, &headers, super::CINEMA_MANAGER).await?;
    db::set_active(&state.db, id, false).await?;
    Ok(Redirect::to("/manage/staff"))
}

#[derive(Template)]
#[template(path = "club_rep_form.html")]
struct ClubRepFormTemplate {
    clubs: Vec<crate::models::Club>,
}

#[derive(Template)]
#[template(path = "club_rep_created.html")]
struct ClubRepCreatedTemplate {
    username: String,
    password: String,
}

#[derive(Debug, Deserialize)]
pub struct ClubRepForm {
    pub club_id: i64,
}

pub async fn new_club_rep_page(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Html<String>> {
    gate::require(&state.cache, &headers, super::CINEMA_MANAGER).await?;
    let clubs = db::list_clubs(&state.db).await?;
    Ok(Html(ClubRepFormTemplate { clubs }.render()?))
}

/// Issue credentials for a new club representative. The generated
/// username/password pair is shown exactly once.
pub async fn create_club_rep(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<ClubRepForm>,
) -> Result<Html<String>> {
    gate::require(&state.cache, &headers, super::CINEMA_MANAGER).await?;
    // club must exist; reps always carry a club
    let club = db::get_club(&state.db, form.club_id).await?;

    let (mut username, password) = passwords::issue_rep_credentials();
    while db::username_exists(&state.db, &username).await? {
        username = passwords::issue_rep_credentials().0;
    }
    let salt = passwords::new_salt();
    let hash = passwords::hash_password(&password, &salt);
    db::create_user(
        &state.db,
        &username,
        &hash,
        &salt,
        Role::ClubRep,
        Some(club.id),
        true,
    )
    .await?;

    Ok(Html(ClubRepCreatedTemplate { username, password }.render()?))
}
