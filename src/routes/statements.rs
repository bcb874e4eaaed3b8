//! Monthly statement pages for the account manager

use askama::Template;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{Html, Redirect};

use crate::auth::gate;
use crate::db;
use crate::error::Result;
use crate::models::StatementSummary;
use crate::{statements, AppState};

#[derive(Template)]
#[template(path = "statements.html")]
struct StatementsTemplate {
    statements: Vec<StatementSummary>,
}

pub async fn list(State(state): State<AppState>, headers: HeaderMap) -> Result<Html<String>> {
    gate::require(&state.cache, &headers, super::ACCOUNT_MANAGER).await?;
    let statements = db::list_statements(&state.db).await?;
    Ok(Html(StatementsTemplate { statements }.render()?))
}

/// Run statement generation for the current month. Re-running is
/// harmless; clubs that already have this month's statement keep it.
pub async fn generate(State(state): State<AppState>, headers: HeaderMap) -> Result<Redirect> {
    gate::require(&state.cache, &headers, super::ACCOUNT_MANAGER).await?;
    statements::generate_for_current_month(&state.db).await?;
    Ok(Redirect::to("/statements"))
}
