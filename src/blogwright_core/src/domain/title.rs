use std::fmt;

use thiserror::Error;

const MAX_TITLE_LENGTH: usize = 100;

#[derive(Debug, Error, PartialEq)]
pub enum TitleError {
    #[error("This field is required.")]
    Empty,
    #[error("Title must be at most {MAX_TITLE_LENGTH} characters long.")]
    TooLong,
}

/// Title shared by posts, patterns and sections.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Title(String);

impl Title {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl TryFrom<String> for Title {
    type Error = TitleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(TitleError::Empty);
        }
        if trimmed.chars().count() > MAX_TITLE_LENGTH {
            return Err(TitleError::TooLong);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_title_is_rejected() {
        assert_eq!(Title::try_from("   ".to_owned()), Err(TitleError::Empty));
    }

    #[test]
    fn test_title_length_limit() {
        assert!(Title::try_from("t".repeat(MAX_TITLE_LENGTH)).is_ok());
        assert_eq!(
            Title::try_from("t".repeat(MAX_TITLE_LENGTH + 1)),
            Err(TitleError::TooLong)
        );
    }
}
