use std::sync::Arc;

use blogwright_core::{RevokedTokenStore, RevokedTokenStoreError};
use chrono::{DateTime, Utc};
use redis::{Commands, Connection};
use tokio::sync::RwLock;

/// Redis-backed revocation list. Each key expires together with the token it
/// revokes.
#[derive(Clone)]
pub struct RedisRevokedTokenStore {
    conn: Arc<RwLock<Connection>>,
    key_prefix: &'static str,
}

impl RedisRevokedTokenStore {
    pub fn new(conn: Arc<RwLock<Connection>>, key_prefix: &'static str) -> Self {
        Self { conn, key_prefix }
    }

    fn key(&self, token: &str) -> String {
        format!("{}{}", self.key_prefix, token)
    }
}

/// Seconds left until `expires_at`, never less than one so the key is written.
fn remaining_seconds(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    u64::try_from((expires_at - now).num_seconds())
        .unwrap_or_default()
        .max(1)
}

#[async_trait::async_trait]
impl RevokedTokenStore for RedisRevokedTokenStore {
    /// `SET key 1 NX EX ttl`: only the first writer gets `OK` back.
    #[tracing::instrument(name = "Revoking token in Redis", skip_all)]
    async fn revoke_token(
        &self,
        token: String,
        expires_at: DateTime<Utc>,
    ) -> Result<bool, RevokedTokenStoreError> {
        let key = self.key(&token);
        let ttl = remaining_seconds(expires_at, Utc::now());

        let mut conn = self.conn.write().await;
        let reply: Option<String> = redis::cmd("SET")
            .arg(&key)
            .arg(1)
            .arg("NX")
            .arg("EX")
            .arg(ttl)
            .query(&mut *conn)
            .map_err(|e| RevokedTokenStoreError::DatabaseError(e.to_string()))?;

        Ok(reply.is_some())
    }

    #[tracing::instrument(name = "Checking token revocation in Redis", skip_all)]
    async fn is_revoked(&self, token: &str) -> Result<bool, RevokedTokenStoreError> {
        let key = self.key(token);
        let mut conn = self.conn.write().await;
        conn.exists(&key)
            .map_err(|e| RevokedTokenStoreError::DatabaseError(e.to_string()))
    }
}

// Prefixes keep session and reset-token revocations apart in one Redis database.
pub const SESSION_TOKEN_KEY_PREFIX: &str = "revoked_session:";
pub const RESET_TOKEN_KEY_PREFIX: &str = "revoked_reset_token:";

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn test_ttl_follows_token_expiry() {
        let now = Utc::now();
        assert_eq!(remaining_seconds(now + Duration::seconds(1800), now), 1800);
    }

    #[test]
    fn test_ttl_is_at_least_one_second() {
        let now = Utc::now();
        assert_eq!(remaining_seconds(now - Duration::seconds(5), now), 1);
        assert_eq!(remaining_seconds(now, now), 1);
    }
}
