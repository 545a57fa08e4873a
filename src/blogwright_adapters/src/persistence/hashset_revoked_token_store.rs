use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use blogwright_core::{RevokedTokenStore, RevokedTokenStoreError};
use chrono::{DateTime, Utc};

/// In-process revocation set. Each token id is kept until the token itself
/// expires; stale entries are pruned whenever a new one is added.
#[derive(Debug, Default, Clone)]
pub struct HashSetRevokedTokenStore {
    revoked_tokens: Arc<RwLock<HashMap<String, DateTime<Utc>>>>,
}

impl HashSetRevokedTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.revoked_tokens.read().await.len()
    }
}

#[async_trait::async_trait]
impl RevokedTokenStore for HashSetRevokedTokenStore {
    async fn revoke_token(
        &self,
        token: String,
        expires_at: DateTime<Utc>,
    ) -> Result<bool, RevokedTokenStoreError> {
        let now = Utc::now();
        let mut revoked_tokens = self.revoked_tokens.write().await;
        revoked_tokens.retain(|_, expiry| *expiry > now);

        if revoked_tokens.contains_key(&token) {
            return Ok(false);
        }
        revoked_tokens.insert(token, expires_at);
        Ok(true)
    }

    async fn is_revoked(&self, token: &str) -> Result<bool, RevokedTokenStoreError> {
        let revoked_tokens = self.revoked_tokens.read().await;
        Ok(revoked_tokens.contains_key(token))
    }
}
