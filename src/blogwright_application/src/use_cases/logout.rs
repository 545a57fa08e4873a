use blogwright_core::{RevokedTokenStore, RevokedTokenStoreError};
use chrono::{DateTime, Utc};

#[derive(Debug, thiserror::Error)]
pub enum LogoutError {
    #[error("Revoked token store error: {0}")]
    RevokedTokenStoreError(#[from] RevokedTokenStoreError),
}

/// Logout use case - revokes the id of the current session token
pub struct LogoutUseCase<'a, R>
where
    R: RevokedTokenStore + ?Sized,
{
    revoked_token_store: &'a R,
}

impl<'a, R> LogoutUseCase<'a, R>
where
    R: RevokedTokenStore + ?Sized,
{
    pub fn new(revoked_token_store: &'a R) -> Self {
        Self {
            revoked_token_store,
        }
    }

    #[tracing::instrument(name = "LogoutUseCase::execute", skip_all)]
    pub async fn execute(
        &self,
        token_id: String,
        expires_at: DateTime<Utc>,
    ) -> Result<(), LogoutError> {
        if !self
            .revoked_token_store
            .revoke_token(token_id, expires_at)
            .await?
        {
            tracing::debug!("Session was already revoked");
        }
        Ok(())
    }
}
