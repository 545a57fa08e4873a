use std::fmt;

use thiserror::Error;

const MIN_USERNAME_LENGTH: usize = 2;
const MAX_USERNAME_LENGTH: usize = 20;

#[derive(Debug, Error, PartialEq)]
pub enum UsernameError {
    #[error("Username must be between {MIN_USERNAME_LENGTH} and {MAX_USERNAME_LENGTH} characters long.")]
    InvalidLength,
    #[error("Username may not contain whitespace or slashes.")]
    InvalidCharacters,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Username {
    type Error = UsernameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let trimmed = value.trim();
        let length = trimmed.chars().count();
        if !(MIN_USERNAME_LENGTH..=MAX_USERNAME_LENGTH).contains(&length) {
            return Err(UsernameError::InvalidLength);
        }
        // usernames appear in `/user/{username}` paths
        if trimmed.chars().any(|c| c.is_whitespace() || c == '/') {
            return Err(UsernameError::InvalidCharacters);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
