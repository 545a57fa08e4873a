//! HTML form payloads and their field validation.
//!
//! Every form keeps the raw submitted values so a page can be re-rendered
//! with them, and reports problems per field in [`FieldErrors`].

use std::collections::BTreeMap;

use blogwright_core::{Email, Password, PatternUpdate, PostUpdate, SectionUpdate, Title, Username};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

pub const REQUIRED: &str = "This field is required.";
pub const PASSWORDS_MUST_MATCH: &str = "Field must be equal to password.";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldErrors(BTreeMap<&'static str, Vec<String>>);

impl FieldErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has(&self, field: &str) -> bool {
        !self.get(field).is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn into_result<T>(self, value: impl FnOnce() -> Option<T>) -> Result<T, FieldErrors> {
        match value() {
            Some(value) if self.is_empty() => Ok(value),
            _ => Err(self),
        }
    }
}

fn required<'a>(errors: &mut FieldErrors, field: &'static str, value: &'a str) -> Option<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.add(field, REQUIRED);
        return None;
    }
    Some(trimmed)
}

fn title(errors: &mut FieldErrors, value: &str) -> Option<Title> {
    let value = required(errors, "title", value)?;
    Title::try_from(value.to_owned())
        .map_err(|e| errors.add("title", e.to_string()))
        .ok()
}

fn username(errors: &mut FieldErrors, value: &str) -> Option<Username> {
    let value = required(errors, "username", value)?;
    Username::try_from(value.to_owned())
        .map_err(|e| errors.add("username", e.to_string()))
        .ok()
}

fn email(errors: &mut FieldErrors, value: &str) -> Option<Email> {
    let value = required(errors, "email", value)?;
    Email::try_from(value.to_owned())
        .map_err(|e| errors.add("email", e.to_string()))
        .ok()
}

fn secret_value(value: &Option<Secret<String>>) -> &str {
    value.as_ref().map(|s| s.expose_secret().as_str()).unwrap_or("")
}

fn new_password(
    errors: &mut FieldErrors,
    password: &Option<Secret<String>>,
    confirm: &Option<Secret<String>>,
) -> Option<Password> {
    let raw = secret_value(password);
    let confirmation = secret_value(confirm);

    if confirmation.is_empty() {
        errors.add("confirm_password", REQUIRED);
    } else if confirmation != raw {
        errors.add("confirm_password", PASSWORDS_MUST_MATCH);
    }

    if raw.is_empty() {
        errors.add("password", REQUIRED);
        return None;
    }
    Password::try_from(Secret::new(raw.to_owned()))
        .map_err(|e| errors.add("password", e.to_string()))
        .ok()
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PostForm {
    pub title: String,
    pub content: String,
}

impl PostForm {
    pub fn validate(&self) -> Result<PostUpdate, FieldErrors> {
        let mut errors = FieldErrors::default();
        let title = title(&mut errors, &self.title);
        let content = required(&mut errors, "content", &self.content).map(str::to_owned);
        errors.into_result(|| {
            Some(PostUpdate {
                title: title?,
                content: content?,
            })
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PatternForm {
    pub title: String,
    pub content: String,
}

impl PatternForm {
    /// Pattern content is optional; blank content is stored as none.
    pub fn validate(&self) -> Result<PatternUpdate, FieldErrors> {
        let mut errors = FieldErrors::default();
        let title = title(&mut errors, &self.title);
        let content = Some(self.content.trim())
            .filter(|c| !c.is_empty())
            .map(str::to_owned);
        errors.into_result(|| {
            Some(PatternUpdate {
                title: title?,
                content,
            })
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SectionForm {
    pub title: String,
    pub content: String,
}

impl SectionForm {
    pub fn validate(&self) -> Result<SectionUpdate, FieldErrors> {
        let mut errors = FieldErrors::default();
        let title = title(&mut errors, &self.title);
        let content = required(&mut errors, "content", &self.content).map(str::to_owned);
        errors.into_result(|| {
            Some(SectionUpdate {
                title: title?,
                content: content?,
            })
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegistrationForm {
    pub username: String,
    pub email: String,
    pub password: Option<Secret<String>>,
    pub confirm_password: Option<Secret<String>>,
}

#[derive(Debug, Clone)]
pub struct Registration {
    pub username: Username,
    pub email: Email,
    pub password: Password,
}

impl RegistrationForm {
    pub fn validate(&self) -> Result<Registration, FieldErrors> {
        let mut errors = FieldErrors::default();
        let username = username(&mut errors, &self.username);
        let email = email(&mut errors, &self.email);
        let password = new_password(&mut errors, &self.password, &self.confirm_password);
        errors.into_result(|| {
            Some(Registration {
                username: username?,
                email: email?,
                password: password?,
            })
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub email: String,
    pub password: Option<Secret<String>>,
    /// Checkbox, present only when ticked.
    pub remember: Option<String>,
}

impl LoginForm {
    pub fn remember(&self) -> bool {
        self.remember.is_some()
    }

    /// Only presence is checked here. A password that could never have been
    /// stored is rejected as a failed login by the handler.
    pub fn validate(&self) -> Result<(Email, Secret<String>), FieldErrors> {
        let mut errors = FieldErrors::default();
        let email = email(&mut errors, &self.email);
        let raw = secret_value(&self.password);
        if raw.is_empty() {
            errors.add("password", REQUIRED);
        }
        errors.into_result(|| Some((email?, Secret::new(raw.to_owned()))))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RequestResetForm {
    pub email: String,
}

impl RequestResetForm {
    pub fn validate(&self) -> Result<Email, FieldErrors> {
        let mut errors = FieldErrors::default();
        let email = email(&mut errors, &self.email);
        errors.into_result(|| email)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ResetPasswordForm {
    pub password: Option<Secret<String>>,
    pub confirm_password: Option<Secret<String>>,
}

impl ResetPasswordForm {
    pub fn validate(&self) -> Result<Password, FieldErrors> {
        let mut errors = FieldErrors::default();
        let password = new_password(&mut errors, &self.password, &self.confirm_password);
        errors.into_result(|| password)
    }
}

/// Text fields of the account form. The picture arrives as a separate
/// multipart part.
#[derive(Debug, Clone, Default)]
pub struct AccountForm {
    pub username: String,
    pub email: String,
}

impl AccountForm {
    pub fn validate(&self) -> Result<(Username, Email), FieldErrors> {
        let mut errors = FieldErrors::default();
        let username = username(&mut errors, &self.username);
        let email = email(&mut errors, &self.email);
        errors.into_result(|| Some((username?, email?)))
    }
}
