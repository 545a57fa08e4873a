//! The route table.
//!
//! Handlers render askama pages or answer with a 303 redirect after a
//! successful form post. Routes that need a signed in user sit behind
//! `require_login`.

pub mod main;
pub mod patterns;
pub mod posts;
pub mod sections;
pub mod users;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
};
use serde::Deserialize;
use tower_http::services::ServeDir;

use axum::response::Response;
use blogwright_core::{PageRequest, domain::pagination::DEFAULT_PER_PAGE};

use crate::error::AppError;
use crate::forms::FieldErrors;
use crate::middleware::{load_session, require_login};
use crate::state::AppState;
use crate::views::{EditorTemplate, NavContext, render};

/// Uploaded profile pictures are capped at this size.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .route("/", get(main::home))
        .route("/home", get(main::home))
        .route("/about", get(main::about))
        .route("/register", get(users::register_form).post(users::register))
        .route("/login", get(users::login_form).post(users::login))
        .route("/logout", get(users::logout))
        .route("/user/{username}", get(users::user_posts))
        .route(
            "/reset_password",
            get(users::reset_request_form).post(users::reset_request),
        )
        .route(
            "/reset_password/{token}",
            get(users::reset_token_form).post(users::reset_token),
        )
        .route("/post/{id}", get(posts::show))
        .route("/patterns", get(patterns::index))
        .route("/patterns/index", get(patterns::index))
        .route("/patterns/{id}", get(patterns::show))
        .route("/sections/{id}", get(sections::show));

    let protected = Router::new()
        .route(
            "/account",
            get(users::account)
                .post(users::update_account)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/post/new", get(posts::new_form).post(posts::create))
        .route("/post/{id}/update", get(posts::edit_form).post(posts::update))
        .route("/post/{id}/delete", post(posts::delete))
        .route("/patterns/new", get(patterns::new_form).post(patterns::create))
        .route(
            "/patterns/{id}/update",
            get(patterns::edit_form).post(patterns::update),
        )
        .route("/patterns/{id}/delete", post(patterns::delete))
        .route(
            "/patterns/{id}/sections/new",
            get(sections::new_form).post(sections::create),
        )
        .route(
            "/sections/{id}/update",
            get(sections::edit_form).post(sections::update),
        )
        .route("/sections/{id}/delete", post(sections::delete))
        .route_layer(from_fn(require_login));

    let static_files = ServeDir::new(&state.static_dir);

    public
        .merge(protected)
        .nest_service("/static", static_files)
        .fallback(not_found)
        .layer(from_fn_with_state(state.clone(), load_session))
        .with_state(state)
}

async fn not_found() -> AppError {
    AppError::NotFound
}

/// The title/content form shared by posts, patterns and sections.
pub(crate) fn editor(
    nav: NavContext,
    legend: &str,
    action: String,
    title: &str,
    content: &str,
    errors: FieldErrors,
) -> Result<Response, AppError> {
    render(&EditorTemplate {
        nav,
        page_title: legend.to_owned(),
        legend: legend.to_owned(),
        action,
        title: title.to_owned(),
        content: content.to_owned(),
        errors,
    })
}

/// `?page=` as sent by the pagination links. Anything unparsable means the
/// first page; zero or negative numbers select no page at all.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    page: Option<String>,
}

impl PageQuery {
    pub fn request(&self) -> PageRequest {
        let page = match self.page.as_deref().map(|p| p.trim().parse::<i64>()) {
            None | Some(Err(_)) => 1,
            Some(Ok(n)) => u32::try_from(n).unwrap_or(0),
        };
        PageRequest::new(page, DEFAULT_PER_PAGE)
    }
}
