//! Password reset token contract.
//!
//! A reset token is a signed, self-contained credential naming a user and an
//! expiry. Nothing is stored when one is issued. Implementations must reject
//! tokens whose signature does not match the current secret (`Invalid`) and
//! tokens whose expiry has passed (`Expired`).
//!
//! Verification alone does not stop a token being replayed within its TTL;
//! the reset flow records the `token_id` of consumed tokens in a
//! `RevokedTokenStore` so each token works once.

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use crate::domain::user::UserId;

pub const DEFAULT_RESET_TOKEN_TTL_SECONDS: i64 = 1800;

#[derive(Debug, Clone)]
pub struct IssuedResetToken {
    pub token: String,
    pub token_id: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedResetToken {
    pub user_id: UserId,
    pub token_id: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Error, PartialEq)]
pub enum ResetTokenError {
    #[error("Reset token has expired")]
    Expired,
    #[error("Reset token is invalid")]
    Invalid,
    #[error("Unexpected error: {0}")]
    UnexpectedError(String),
}

pub trait ResetTokenService: Send + Sync {
    /// TTL used when the caller does not pick one.
    fn default_ttl(&self) -> Duration {
        Duration::seconds(DEFAULT_RESET_TOKEN_TTL_SECONDS)
    }

    fn issue(&self, user_id: UserId, ttl: Duration) -> Result<IssuedResetToken, ResetTokenError>;

    fn verify(&self, token: &str) -> Result<VerifiedResetToken, ResetTokenError>;
}
