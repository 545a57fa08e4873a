pub mod models;
pub mod pages;

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

pub use models::*;
pub use pages::*;

use crate::error::AppError;

/// Render a page with status 200.
pub fn render<T: Template>(template: &T) -> Result<Response, AppError> {
    Ok(Html(template.render()?).into_response())
}

/// Error page for `status`, falling back to plain text when rendering fails.
pub fn render_error(status: StatusCode, nav: NavContext) -> Response {
    let (heading, message) = match status {
        StatusCode::NOT_FOUND => (
            "Oops. Page Not Found (404)",
            "That page does not exist. Please try a different location",
        ),
        StatusCode::FORBIDDEN => (
            "You don't have permission to do that (403)",
            "Please check your account and try again",
        ),
        StatusCode::BAD_REQUEST => (
            "Bad request (400)",
            "The submitted form could not be read. Please try again",
        ),
        _ => (
            "Something went wrong (500)",
            "We're experiencing some trouble on our end. Please try again in the near future",
        ),
    };

    let template = ErrorTemplate {
        nav,
        page_title: heading.to_owned(),
        status: status.as_u16(),
        heading: heading.to_owned(),
        message: message.to_owned(),
    };
    match template.render() {
        Ok(body) => (status, Html(body)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to render error page");
            (status, heading).into_response()
        }
    }
}
