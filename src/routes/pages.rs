//! Landing and per-role dashboard pages

use askama::Template;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse, Redirect, Response};

use crate::auth::{gate, sessions};
use crate::error::Result;
use crate::models::Role;
use crate::AppState;

/// Homepage template
#[derive(Template)]
#[template(path = "home.html")]
struct HomeTemplate {
    logged_in: bool,
    username: String,
    account_href: String,
}

fn account_href(role: Role) -> &'static str {
    match role {
        Role::Student => "/student",
        Role::ClubRep => "/club-rep",
        Role::AccountManager => "/account-manager",
        Role::CinemaManager => "/manage",
    }
}

/// Landing page; shows sign-in or the role's own links
pub async fn home(State(state): State<AppState>, headers: HeaderMap) -> Result<Html<String>> {
    let template = match sessions::current_user(&state.cache, &headers).await {
        Some(session) => HomeTemplate {
            logged_in: true,
            username: session.username.clone(),
            account_href: account_href(session.role).to_string(),
        },
        None => HomeTemplate {
            logged_in: false,
            username: String::new(),
            account_href: String::new(),
        },
    };

    Ok(Html(template.render()?))
}

/// Redirect logged-in users to the page for their role
pub async fn account(State(state): State<AppState>, headers: HeaderMap) -> Response {
    match sessions::current_user(&state.cache, &headers).await {
        Some(session) => Redirect::to(account_href(session.role)).into_response(),
        None => Redirect::to("/").into_response(),
    }
}

#[derive(Template)]
#[template(path = "cmanager.html")]
struct CinemaManagerTemplate;

pub async fn cinema_manager(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Html<String>> {
    gate::require(&state.cache, &headers, super::CINEMA_MANAGER).await?;
    Ok(Html(CinemaManagerTemplate.render()?))
}

#[derive(Template)]
#[template(path = "amanager.html")]
struct AccountManagerTemplate;

pub async fn account_manager(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Html<String>> {
    gate::require(&state.cache, &headers, super::ACCOUNT_MANAGER).await?;
    Ok(Html(AccountManagerTemplate.render()?))
}

#[derive(Template)]
#[template(path = "club_rep.html")]
struct ClubRepTemplate;

pub async fn club_rep(State(state): State<AppState>, headers: HeaderMap) -> Result<Html<String>> {
    gate::require(&state.cache, &headers, super::CLUB_REP).await?;
    Ok(Html(ClubRepTemplate.render()?))
}

#[derive(Template)]
#[template(path = "student.html")]
struct StudentTemplate;

pub async fn student(State(state): State<AppState>, headers: HeaderMap) -> Result<Html<String>> {
    gate::require(&state.cache, &headers, super::STUDENT).await?;
    Ok(Html(StudentTemplate.render()?))
}
