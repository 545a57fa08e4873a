//! One-shot messages carried across a redirect in a cookie.
//!
//! Handlers queue messages with [`push`]. The session middleware reads the
//! cookie into a [`FlashInbox`]; once a page has rendered the messages the
//! cookie is cleared on the way out.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use axum::http::{HeaderMap, HeaderValue, header::SET_COOKIE};
use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};
use serde::{Deserialize, Serialize};

use crate::middleware::encode_query_value;

pub const FLASH_COOKIE_NAME: &str = "_flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashCategory {
    Success,
    Info,
    Warning,
    Danger,
}

impl FlashCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlashCategory::Success => "success",
            FlashCategory::Info => "info",
            FlashCategory::Warning => "warning",
            FlashCategory::Danger => "danger",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlashMessage {
    pub category: FlashCategory,
    pub message: String,
}

/// Messages that arrived with the request.
#[derive(Debug, Clone, Default)]
pub struct FlashInbox {
    messages: Vec<FlashMessage>,
    consumed: Arc<AtomicBool>,
}

impl FlashInbox {
    pub fn from_jar(jar: &CookieJar) -> Self {
        Self {
            messages: read(jar),
            consumed: Arc::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Hand the messages to a page and mark them as shown.
    pub fn take(&self) -> Vec<FlashMessage> {
        self.consumed.store(true, Ordering::SeqCst);
        self.messages.clone()
    }

    pub fn was_consumed(&self) -> bool {
        self.consumed.load(Ordering::SeqCst)
    }
}

fn read(jar: &CookieJar) -> Vec<FlashMessage> {
    jar.get(FLASH_COOKIE_NAME)
        .and_then(|cookie| urlencoding::decode(cookie.value()).ok())
        .and_then(|json| serde_json::from_str(&json).ok())
        .unwrap_or_default()
}

fn flash_cookie(value: String) -> Cookie<'static> {
    Cookie::build((FLASH_COOKIE_NAME, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Queue a message for the next rendered page, keeping any already queued.
pub fn push(jar: CookieJar, category: FlashCategory, message: impl Into<String>) -> CookieJar {
    let mut messages = read(&jar);
    messages.push(FlashMessage {
        category,
        message: message.into(),
    });
    match serde_json::to_string(&messages) {
        Ok(value) => jar.add(flash_cookie(encode_query_value(&value))),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode flash messages");
            jar
        }
    }
}

pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = flash_cookie(String::new());
    cookie.make_removal();
    cookie
}

/// True when the response already replaces the flash cookie.
pub fn response_sets_flash(headers: &HeaderMap) -> bool {
    let prefix = format!("{FLASH_COOKIE_NAME}=");
    headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .any(|value| value.starts_with(&prefix))
}

pub fn append_removal(headers: &mut HeaderMap) {
    if let Ok(value) = HeaderValue::from_str(&removal_cookie().to_string()) {
        headers.append(SET_COOKIE, value);
    }
}
