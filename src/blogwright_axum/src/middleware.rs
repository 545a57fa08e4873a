//! Session loading and login guard.

use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, OriginalUri, Request, State},
    http::{header::SET_COOKIE, request::Parts},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use blogwright_adapters::auth::{SessionClaims, SessionError, extract_token, validate_session_token};
use blogwright_core::{Identity, UserStoreError};

use crate::error::ErrorPage;
use crate::flash::{self, FlashCategory, FlashInbox, FlashMessage};
use crate::state::AppState;
use crate::views::{self, NavContext};

pub const LOGIN_REQUIRED_MESSAGE: &str = "Please log in to access this page.";

/// Resolve the session cookie into an `Identity` and stash the incoming flash
/// messages. Requests with a missing, expired or revoked token carry on
/// anonymously. Error responses are rendered here as full pages.
pub async fn load_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let session = resolve_session(&state, &jar).await;
    let user = session.as_ref().map(|(identity, _)| identity.clone());
    if let Some((identity, claims)) = session {
        request.extensions_mut().insert(identity);
        request.extensions_mut().insert(claims);
    }

    let inbox = FlashInbox::from_jar(&jar);
    request.extensions_mut().insert(inbox.clone());

    let mut response = next.run(request).await;

    if let Some(ErrorPage(status)) = response.extensions().get::<ErrorPage>().copied() {
        let nav = NavContext::new(user.as_ref(), Vec::new());
        let headers = std::mem::take(response.headers_mut());
        response = views::render_error(status, nav);
        for value in headers.get_all(SET_COOKIE) {
            response.headers_mut().append(SET_COOKIE, value.clone());
        }
    }

    if !inbox.is_empty() && inbox.was_consumed() && !flash::response_sets_flash(response.headers())
    {
        flash::append_removal(response.headers_mut());
    }
    response
}

async fn resolve_session(state: &AppState, jar: &CookieJar) -> Option<(Identity, SessionClaims)> {
    let token = extract_token(jar, &state.session.cookie_name).ok()?;

    let claims = match validate_session_token(token, &*state.revoked_sessions, &state.session).await
    {
        Ok(claims) => claims,
        Err(SessionError::UnexpectedError(e)) => {
            tracing::error!(error = %e, "Failed to validate session");
            return None;
        }
        Err(e) => {
            tracing::debug!(error = %e, "Ignoring session cookie");
            return None;
        }
    };

    match state.user_store.get_user(claims.sub).await {
        Ok(user) => Some((user.identity(), claims)),
        Err(UserStoreError::UserNotFound) => None,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load session user");
            None
        }
    }
}

/// Redirect anonymous visitors to the login page, remembering where they
/// were headed.
pub async fn require_login(jar: CookieJar, request: Request, next: Next) -> Response {
    if request.extensions().get::<Identity>().is_some() {
        return next.run(request).await;
    }

    let target = request
        .extensions()
        .get::<OriginalUri>()
        .map(|uri| uri.0.clone())
        .unwrap_or_else(|| request.uri().clone());
    let next_path = target
        .path_and_query()
        .map(|pq| pq.as_str().to_owned())
        .unwrap_or_else(|| "/".to_owned());

    let jar = flash::push(jar, FlashCategory::Info, LOGIN_REQUIRED_MESSAGE);
    let location = format!("/login?next={}", encode_query_value(&next_path));
    (jar, Redirect::to(&location)).into_response()
}

pub(crate) fn encode_query_value(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Only same-site absolute paths are followed after login.
pub fn safe_next_path(next: Option<&str>) -> Option<&str> {
    next.filter(|path| path.starts_with('/') && !path.starts_with("//") && !path.contains('\\'))
}

/// The signed in user, if any.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Option<Identity>);

impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(CurrentUser(parts.extensions.get::<Identity>().cloned()))
    }
}

/// The signed in user on routes behind `require_login`.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Identity);

impl<S: Send + Sync> FromRequestParts<S> for AuthUser {
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| Redirect::to("/login"))
    }
}

/// The validated session token, needed to revoke it at logout.
#[derive(Debug, Clone)]
pub struct CurrentSession(pub Option<SessionClaims>);

impl<S: Send + Sync> FromRequestParts<S> for CurrentSession {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(CurrentSession(parts.extensions.get::<SessionClaims>().cloned()))
    }
}

/// Everything the page layout needs: the signed in user and the flash
/// messages waiting to be shown.
#[derive(Debug, Clone)]
pub struct PageContext {
    pub user: Option<Identity>,
    inbox: FlashInbox,
}

impl PageContext {
    pub fn new(user: Option<Identity>, inbox: FlashInbox) -> Self {
        Self { user, inbox }
    }

    /// Navigation state for a rendered page. Marks the flash messages as shown.
    pub fn nav(&self) -> NavContext {
        NavContext::new(self.user.as_ref(), self.inbox.take())
    }

    /// Like [`PageContext::nav`], plus a message for the page being rendered.
    pub fn nav_with(&self, category: FlashCategory, message: &str) -> NavContext {
        let mut messages = self.inbox.take();
        messages.push(FlashMessage {
            category,
            message: message.to_owned(),
        });
        NavContext::new(self.user.as_ref(), messages)
    }
}

impl<S: Send + Sync> FromRequestParts<S> for PageContext {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(PageContext::new(
            parts.extensions.get::<Identity>().cloned(),
            parts.extensions.get::<FlashInbox>().cloned().unwrap_or_default(),
        ))
    }
}
