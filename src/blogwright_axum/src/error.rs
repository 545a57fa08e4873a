use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use blogwright_application::{
    LogoutError, PatternError, PostError, RegisterError, RequestPasswordResetError,
    ResetPasswordError, UpdateAccountError,
};
use blogwright_core::{PatternStoreError, PostStoreError, UserStoreError};
use thiserror::Error;

/// Failures a handler turns into an error page.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found")]
    NotFound,
    #[error("Forbidden")]
    Forbidden,
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Marker left on error responses. `load_session` swaps the plain body for
/// the rendered error page, which needs the signed in user for its nav bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorPage(pub StatusCode);

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            AppError::Unexpected(e) => tracing::error!(error = %e, "Request failed"),
            AppError::BadRequest(e) => tracing::debug!(error = %e, "Bad request"),
            AppError::NotFound | AppError::Forbidden => {}
        }

        let reason = status.canonical_reason().unwrap_or("Error");
        let mut response = (status, reason).into_response();
        response.extensions_mut().insert(ErrorPage(status));
        response
    }
}

impl From<askama::Error> for AppError {
    fn from(e: askama::Error) -> Self {
        AppError::Unexpected(format!("Template error: {e}"))
    }
}

impl From<PostError> for AppError {
    fn from(e: PostError) -> Self {
        match e {
            PostError::NotFound => AppError::NotFound,
            PostError::Forbidden => AppError::Forbidden,
            other => AppError::Unexpected(other.to_string()),
        }
    }
}

impl From<PatternError> for AppError {
    fn from(e: PatternError) -> Self {
        match e {
            PatternError::PatternNotFound | PatternError::SectionNotFound => AppError::NotFound,
            PatternError::Forbidden => AppError::Forbidden,
            other => AppError::Unexpected(other.to_string()),
        }
    }
}

impl From<UserStoreError> for AppError {
    fn from(e: UserStoreError) -> Self {
        match e {
            UserStoreError::UserNotFound => AppError::NotFound,
            other => AppError::Unexpected(other.to_string()),
        }
    }
}

impl From<PostStoreError> for AppError {
    fn from(e: PostStoreError) -> Self {
        match e {
            PostStoreError::PostNotFound => AppError::NotFound,
            other => AppError::Unexpected(other.to_string()),
        }
    }
}

impl From<PatternStoreError> for AppError {
    fn from(e: PatternStoreError) -> Self {
        match e {
            PatternStoreError::PatternNotFound | PatternStoreError::SectionNotFound => {
                AppError::NotFound
            }
            other => AppError::Unexpected(other.to_string()),
        }
    }
}

impl From<RegisterError> for AppError {
    fn from(e: RegisterError) -> Self {
        AppError::Unexpected(e.to_string())
    }
}

impl From<LogoutError> for AppError {
    fn from(e: LogoutError) -> Self {
        AppError::Unexpected(e.to_string())
    }
}

impl From<UpdateAccountError> for AppError {
    fn from(e: UpdateAccountError) -> Self {
        match e {
            UpdateAccountError::UserStoreError(e) => e.into(),
            other => AppError::Unexpected(other.to_string()),
        }
    }
}

impl From<RequestPasswordResetError> for AppError {
    fn from(e: RequestPasswordResetError) -> Self {
        AppError::Unexpected(e.to_string())
    }
}

impl From<ResetPasswordError> for AppError {
    fn from(e: ResetPasswordError) -> Self {
        AppError::Unexpected(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_errors_map_to_status() {
        assert_eq!(AppError::from(PostError::NotFound).status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::from(PostError::Forbidden).status(), StatusCode::FORBIDDEN);
        assert_eq!(
            AppError::from(PostError::PostStoreError(PostStoreError::UnexpectedError(
                "boom".to_owned()
            )))
            .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_pattern_errors_map_to_status() {
        assert_eq!(
            AppError::from(PatternError::SectionNotFound).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(AppError::from(PatternError::Forbidden).status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_error_response_is_marked_for_rendering() {
        let response = AppError::Forbidden.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            response.extensions().get::<ErrorPage>(),
            Some(&ErrorPage(StatusCode::FORBIDDEN))
        );
    }
}
