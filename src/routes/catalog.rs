//! Public catalog pages and cinema-manager CRUD for movies, screens,
//! screenings and ticket prices

use askama::Template;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::auth::gate;
use crate::db;
use crate::error::Result;
use crate::models::{Movie, Rating, Screen, ScreeningSummary, TicketPrices};
use crate::AppState;

#[derive(Template)]
#[template(path = "movies.html")]
struct MoviesTemplate {
    movies: Vec<Movie>,
}

pub async fn movies(State(state): State<AppState>) -> Result<Html<String>> {
    let movies = db::list_movies(&state.db).await?;
    Ok(Html(MoviesTemplate { movies }.render()?))
}

#[derive(Template)]
#[template(path = "movie_screenings.html")]
struct MovieScreeningsTemplate {
    movie: Movie,
    screenings: Vec<ScreeningSummary>,
}

/// Upcoming screenings of one movie; full screenings are not listed
pub async fn movie_screenings(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Html<String>> {
    let movie = db::get_movie(&state.db, id).await?;
    let screenings = db::screenings_for_movie(&state.db, id).await?;
    Ok(Html(MovieScreeningsTemplate { movie, screenings }.render()?))
}

#[derive(Template)]
#[template(path = "manage_movies.html")]
struct ManageMoviesTemplate {
    movies: Vec<Movie>,
}

pub async fn manage_movies(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Html<String>> {
    gate::require(&state.cache, &headers, super::CINEMA_MANAGER).await?;
    let movies = db::list_movies(&state.db).await?;
    Ok(Html(ManageMoviesTemplate { movies }.render()?))
}

#[derive(Template)]
#[template(path = "movie_form.html")]
struct MovieFormTemplate {
    action: String,
    name: String,
    minutes_long: String,
    description: String,
    rating: String,
    ratings: Vec<String>,
    image_url: String,
    error: String,
    has_error: bool,
}

impl MovieFormTemplate {
    fn blank(action: &str) -> Self {
        Self {
            action: action.to_string(),
            name: String::new(),
            minutes_long: String::new(),
            description: String::new(),
            rating: String::new(),
            ratings: rating_options(),
            image_url: String::new(),
            error: String::new(),
            has_error: false,
        }
    }

    fn from_movie(action: &str, movie: &Movie) -> Self {
        Self {
            action: action.to_string(),
            name: movie.name.clone(),
            minutes_long: movie.minutes_long.to_string(),
            description: movie.description.clone(),
            rating: movie.rating.as_str().to_string(),
            ratings: rating_options(),
            image_url: movie.image_url.clone().unwrap_or_default(),
            error: String::new(),
            has_error: false,
        }
    }

    fn from_form(action: &str, form: &MovieForm, error: String) -> Self {
        Self {
            action: action.to_string(),
            name: form.name.clone(),
            minutes_long: form.minutes_long.to_string(),
            description: form.description.clone(),
            rating: form.rating.clone(),
            ratings: rating_options(),
            image_url: form.image_url.clone(),
            has_error: !error.is_empty(),
            error,
        }
    }
}

fn rating_options() -> Vec<String> {
    Rating::ALL.iter().map(|r| r.as_str().to_string()).collect()
}

#[derive(Debug, Deserialize)]
pub struct MovieForm {
    pub name: String,
    pub minutes_long: i32,
    pub description: String,
    pub rating: String,
    #[serde(default)]
    pub image_url: String,
}

impl MovieForm {
    fn validated(&self) -> std::result::Result<(Rating, Option<&str>), String> {
        if self.name.trim().is_empty() {
            return Err("Name must not be empty".to_string());
        }
        if self.minutes_long <= 0 {
            return Err("Duration must be a positive number of minutes".to_string());
        }
        let rating = Rating::parse(&self.rating).ok_or("Choose a rating".to_string())?;
        let image_url = match self.image_url.trim() {
            "" => None,
            url => Some(url),
        };
        Ok((rating, image_url))
    }
}

pub async fn new_movie_page(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Html<String>> {
    gate::require(&state.cache, &headers, super::CINEMA_MANAGER).await?;
    Ok(Html(MovieFormTemplate::blank("/manage/movies/new").render()?))
}

pub async fn create_movie(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<MovieForm>,
) -> Result<Response> {
    gate::require(&state.cache, &headers, super::CINEMA_MANAGER).await?;
    match form.validated() {
        Ok((rating, image_url)) => {
            db::create_movie(
                &state.db,
                form.name.trim(),
                form.minutes_long,
                &form.description,
                rating,
                image_url,
            )
            .await?;
            Ok(Redirect::to("/manage/movies").into_response())
        }
        Err(error) => {
            let html = MovieFormTemplate::from_form("/manage/movies/new", &form, error).render()?;
            Ok(Html(html).into_response())
        }
    }
}

pub async fn edit_movie_page(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Html<String>> {
    gate::require(&state.cache, &headers, super::CINEMA_MANAGER).await?;
    let movie = db::get_movie(&state.db, id).await?;
    let action = format!("/manage/movies/{id}/edit");
    Ok(Html(MovieFormTemplate::from_movie(&action, &movie).render()?))
}

pub async fn update_movie(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Form(form): Form<MovieForm>,
) -> Result<Response> {
    gate::require(&state.cache, &headers, super::CINEMA_MANAGER).await?;
    match form.validated() {
        Ok((rating, image_url)) => {
            db::update_movie(
                &state.db,
                id,
                form.name.trim(),
                form.minutes_long,
                &form.description,
                rating,
                image_url,
            )
            .await?;
            Ok(Redirect::to("/manage/movies").into_response())
        }
        Err(error) => {
            let action = format!("/manage/movies/{id}/edit");
            let html = MovieFormTemplate::from_form(&action, &form, error).render()?;
            Ok(Html(html).into_response())
        }
    }
}

pub async fn delete_movie(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Redirect> {
    gate::require(&state.cache, &headers, super::CINEMA_MANAGER).await?;
    db::delete_movie(&state.db, id).await?;
    Ok(Redirect::to("/manage/movies"))
}

#[derive(Template)]
#[template(path = "manage_screens.html")]
struct ManageScreensTemplate {
    screens: Vec<Screen>,
}

pub async fn manage_screens(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Html<String>> {
    gate::require(&state.cache, &headers, super::CINEMA_MANAGER).await?;
    let screens = db::list_screens(&state.db).await?;
    Ok(Html(ManageScreensTemplate { screens }.render()?))
}

#[derive(Template)]
#[template(path = "screen_form.html")]
struct ScreenFormTemplate {
    action: String,
    name: String,
    description: String,
    capacity: String,
    error: String,
    has_error: bool,
}

#[derive(Debug, Deserialize)]
pub struct ScreenForm {
    pub name: String,
    pub description: String,
    pub capacity: i32,
}

pub async fn new_screen_page(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Html<String>> {
    gate::require(&state.cache, &headers, super::CINEMA_MANAGER).await?;
    let html = ScreenFormTemplate {
        action: "/manage/screens/new".to_string(),
        name: String::new(),
        description: String::new(),
        capacity: String::new(),
        error: String::new(),
        has_error: false,
    }
    .render()?;
    Ok(Html(html))
}

pub async fn create_screen(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<ScreenForm>,
) -> Result<Response> {
    gate::require(&state.cache, &headers, super::CINEMA_MANAGER).await?;
    if form.capacity <= 0 {
        let html = ScreenFormTemplate {
            action: "/manage/screens/new".to_string(),
            name: form.name,
            description: form.description,
            capacity: form.capacity.to_string(),
            error: "Capacity must be a positive number of seats".to_string(),
            has_error: true,
        }
        .render()?;
        return Ok(Html(html).into_response());
    }
    db::create_screen(&state.db, form.name.trim(), &form.description, form.capacity).await?;
    Ok(Redirect::to("/manage/screens").into_response())
}

pub async fn edit_screen_page(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Html<String>> {
    gate::require(&state.cache, &headers, super::CINEMA_MANAGER).await?;
    let screen = db::get_screen(&state.db, id).await?;
    let html = ScreenFormTemplate {
        action: format!("/manage/screens/{id}/edit"),
        name: screen.name,
        description: screen.description,
        capacity: screen.capacity.to_string(),
        error: String::new(),
        has_error: false,
    }
    .render()?;
    Ok(Html(html))
}

pub async fn update_screen(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Form(form): Form<ScreenForm>,
) -> Result<Response> {
    gate::require(&state.cache, &headers, super::CINEMA_MANAGER).await?;
    if form.capacity <= 0 {
        let html = ScreenFormTemplate {
            action: format!("/manage/screens/{id}/edit"),
            name: form.name,
            description: form.description,
            capacity: form.capacity.to_string(),
            error: "Capacity must be a positive number of seats".to_string(),
            has_error: true,
        }
        .render()?;
        return Ok(Html(html).into_response());
    }
    db::update_screen(&state.db, id, form.name.trim(), &form.description, form.capacity).await?;
    Ok(Redirect::to("/manage/screens").into_response())
}

pub async fn delete_screen(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Redirect> {
    gate::require(&state.cache, &headers, super::CINEMA_MANAGER).await?;
    db::delete_screen(&state.db, id).await?;
    Ok(Redirect::to("/manage/screens"))
}

#[derive(Template)]
#[template(path = "manage_screenings.html")]
struct ManageScreeningsTemplate {
    screenings: Vec<ScreeningSummary>,
}

pub async fn manage_screenings(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Html<String>> {
    gate::require(&state.cache, &headers, super::CINEMA_MANAGER).await?;
    let screenings = db::list_screenings(&state.db).await?;
    Ok(Html(ManageScreeningsTemplate { screenings }.render()?))
}

#[derive(Template)]
#[template(path = "screening_form.html")]
struct ScreeningFormTemplate {
    action: String,
    movies: Vec<Movie>,
    screens: Vec<Screen>,
    movie_id: i64,
    screen_id: i64,
    showing_at: String,
    error: String,
    has_error: bool,
}

#[derive(Debug, Deserialize)]
pub struct ScreeningForm {
    pub movie_id: i64,
    pub screen_id: i64,
    /// As posted by a datetime-local input
    pub showing_at: String,
}

impl ScreeningForm {
    fn showing_at_utc(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        NaiveDateTime::parse_from_str(&self.showing_at, "%Y-%m-%dT%H:%M")
            .ok()
            .map(|naive| naive.and_utc())
    }
}

async fn screening_form(
    state: &AppState,
    action: String,
    movie_id: i64,
    screen_id: i64,
    showing_at: String,
    error: String,
) -> Result<ScreeningFormTemplate> {
    Ok(ScreeningFormTemplate {
        action,
        movies: db::list_movies(&state.db).await?,
        screens: db::list_screens(&state.db).await?,
        movie_id,
        screen_id,
        showing_at,
        has_error: !error.is_empty(),
        error,
    })
}

pub async fn new_screening_page(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Html<String>> {
    gate::require(&state.cache, &headers, super::CINEMA_MANAGER).await?;
    let template = screening_form(
        &state,
        "/manage/screenings/new".to_string(),
        0,
        0,
        String::new(),
        String::new(),
    )
    .await?;
    Ok(Html(template.render()?))
}

pub async fn create_screening(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<ScreeningForm>,
) -> Result<Response> {
    gate::require(&state.cache, &headers, super::CINEMA_MANAGER).await?;
    let Some(showing_at) = form.showing_at_utc() else {
        let template = screening_form(
            &state,
            "/manage/screenings/new".to_string(),
            form.movie_id,
            form.screen_id,
            form.showing_at,
            "Enter a valid date and time".to_string(),
        )
        .await?;
        return Ok(Html(template.render()?).into_response());
    };
    db::create_screening(&state.db, form.movie_id, form.screen_id, showing_at).await?;
    Ok(Redirect::to("/manage/screenings").into_response())
}

pub async fn edit_screening_page(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Html<String>> {
    gate::require(&state.cache, &headers, super::CINEMA_MANAGER).await?;
    let screening = db::get_screening(&state.db, id).await?;
    let template = screening_form(
        &state,
        format!("/manage/screenings/{id}/edit"),
        screening.movie_id,
        screening.screen_id,
        screening.showing_at.format("%Y-%m-%dT%H:%M").to_string(),
        String::new(),
    )
    .await?;
    Ok(Html(template.render()?))
}

pub async fn update_screening(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Form(form): Form<ScreeningForm>,
) -> Result<Response> {
    gate::require(&state.cache, &headers, super::CINEMA_MANAGER).await?;
    let Some(showing_at) = form.showing_at_utc() else {
        let template = screening_form(
            &state,
            format!("/manage/screenings/{id}/edit"),
            form.movie_id,
            form.screen_id,
            form.showing_at,
            "Enter a valid date and time".to_string(),
        )
        .await?;
        return Ok(Html(template.render()?).into_response());
    };
    db::update_screening(&state.db, id, form.movie_id, form.screen_id, showing_at).await?;
    Ok(Redirect::to("/manage/screenings").into_response())
}

pub async fn delete_screening(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Redirect> {
    gate::require(&state.cache, &headers, super::CINEMA_MANAGER).await?;
    db::delete_screening(&state.db, id).await?;
    Ok(Redirect::to("/manage/screenings"))
}

#[derive(Template)]
#[template(path = "ticket_prices.html")]
struct TicketPricesTemplate {
    adult: String,
    child: String,
    student: String,
    error: String,
    has_error: bool,
}

#[derive(Debug, Deserialize)]
pub struct TicketPricesForm {
    pub adult: Decimal,
    pub child: Decimal,
    pub student: Decimal,
}

impl TicketPricesForm {
    fn validated(&self) -> std::result::Result<TicketPrices, String> {
        if self.adult.is_sign_negative()
            || self.child.is_sign_negative()
            || self.student.is_sign_negative()
        {
            return Err("Prices must not be negative".to_string());
        }
        Ok(TicketPrices {
            adult: self.adult,
            child: self.child,
            student: self.student,
        })
    }
}

pub async fn ticket_prices_page(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Html<String>> {
    gate::require(&state.cache, &headers, super::CINEMA_MANAGER).await?;
    let prices = db::get_ticket_prices(&state.db).await?;
    let html = TicketPricesTemplate {
        adult: format!("{:.2}", prices.adult),
        child: format!("{:.2}", prices.child),
        student: format!("{:.2}", prices.student),
        error: String::new(),
        has_error: false,
    }
    .render()?;
    Ok(Html(html))
}

/// Price changes drop the cached prices so the next quote reads fresh
pub async fn update_ticket_prices(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<TicketPricesForm>,
) -> Result<Response> {
    gate::require(&state.cache, &headers, super::CINEMA_MANAGER).await?;
    let prices = match form.validated() {
        Ok(prices) => prices,
        Err(error) => {
            let html = TicketPricesTemplate {
                adult: format!("{:.2}", form.adult),
                child: format!("{:.2}", form.child),
                student: format!("{:.2}", form.student),
                has_error: !error.is_empty(),
                error,
            }
            .render()?;
            return Ok(Html(html).into_response());
        }
    };
    db::update_ticket_prices(&state.db, &prices).await?;
    state.cache.invalidate_prices().await;
    Ok(Redirect::to("/manage/ticket-prices").into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_negative_price_is_a_form_error_not_a_failure() {
        let form = TicketPricesForm {
            adult: dec!(4.99),
            child: dec!(-0.01),
            student: dec!(3.99),
        };
        assert_eq!(
            form.validated().err(),
            Some("Prices must not be negative".to_string())
        );

        let form = TicketPricesForm {
            adult: dec!(4.99),
            child: dec!(2.99),
            student: dec!(3.99),
        };
        let prices = form.validated().unwrap();
        assert_eq!(prices.student, dec!(3.99));
    }
}
