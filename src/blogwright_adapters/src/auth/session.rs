use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};
use blogwright_core::{RevokedTokenStore, UserId};
use chrono::{DateTime, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Validation, decode, encode};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub secret: Secret<String>,
    pub ttl_in_seconds: i64,
    pub secure_cookie: bool,
}

impl SessionConfig {
    pub fn as_bytes(&self) -> &[u8] {
        self.secret.expose_secret().as_bytes()
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Missing token")]
    MissingToken,
    #[error("Token error: {0}")]
    TokenError(jsonwebtoken::errors::Error),
    #[error("Token is revoked")]
    TokenIsRevoked,
    #[error("Unexpected error: {0}")]
    UnexpectedError(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionClaims {
    pub sub: UserId,
    pub exp: usize,
    pub jti: String,
}

impl SessionClaims {
    /// When the token stops validating. An out of range `exp` never expires.
    pub fn expires_at(&self) -> DateTime<Utc> {
        i64::try_from(self.exp)
            .ok()
            .and_then(|exp| DateTime::<Utc>::from_timestamp(exp, 0))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

pub fn extract_token<'a>(jar: &'a CookieJar, cookie_name: &str) -> Result<&'a str, SessionError> {
    match jar.get(cookie_name) {
        Some(cookie) => Ok(cookie.value()),
        None => Err(SessionError::MissingToken),
    }
}

/// Issue a session token for `user_id` and wrap it in a cookie. A `persistent`
/// cookie survives browser restarts for the lifetime of the token.
pub fn generate_session_cookie(
    user_id: UserId,
    config: &SessionConfig,
    persistent: bool,
) -> Result<Cookie<'static>, SessionError> {
    let token = generate_session_token(user_id, config.ttl_in_seconds, config.as_bytes())?;
    let mut cookie = create_session_cookie(token, config);
    if persistent {
        cookie.set_max_age(time::Duration::seconds(config.ttl_in_seconds));
    }
    Ok(cookie)
}

pub fn create_session_cookie(token: String, config: &SessionConfig) -> Cookie<'static> {
    Cookie::build((config.cookie_name.clone(), token))
        .path("/")
        .http_only(true)
        .secure(config.secure_cookie)
        .same_site(SameSite::Lax)
        .build()
}

pub fn create_removal_cookie(config: &SessionConfig) -> Cookie<'static> {
    let mut cookie = create_session_cookie(String::new(), config);
    cookie.make_removal();
    cookie
}

pub fn generate_session_token(
    user_id: UserId,
    token_ttl_seconds: i64,
    secret: &[u8],
) -> Result<String, SessionError> {
    let delta = chrono::Duration::try_seconds(token_ttl_seconds).ok_or(
        SessionError::UnexpectedError("Failed to create session token duration".to_string()),
    )?;

    let exp = Utc::now()
        .checked_add_signed(delta)
        .ok_or(SessionError::UnexpectedError(
            "Duration out of range".to_string(),
        ))?
        .timestamp();

    let exp: usize = exp
        .try_into()
        .map_err(|_| SessionError::UnexpectedError("Failed to cast i64 to usize".to_string()))?;

    let claims = SessionClaims {
        sub: user_id,
        exp,
        jti: uuid::Uuid::new_v4().to_string(),
    };

    encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(SessionError::TokenError)
}

/// Decode a session token and reject it if its id was revoked at logout.
pub async fn validate_session_token(
    token: &str,
    revoked_token_store: &dyn RevokedTokenStore,
    config: &SessionConfig,
) -> Result<SessionClaims, SessionError> {
    let claims = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(config.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(SessionError::TokenError)?;

    let is_revoked = revoked_token_store
        .is_revoked(&claims.jti)
        .await
        .map_err(|e| SessionError::UnexpectedError(e.to_string()))?;

    if is_revoked {
        return Err(SessionError::TokenIsRevoked);
    }

    Ok(claims)
}

#[cfg(test)]
mod tests {
    use crate::persistence::HashSetRevokedTokenStore;

    use super::*;

    fn session_config() -> SessionConfig {
        SessionConfig {
            cookie_name: "session".to_string(),
            secret: Secret::from("secret".to_owned()),
            ttl_in_seconds: 600,
            secure_cookie: false,
        }
    }

    #[test]
    fn test_generate_session_cookie() {
        let config = session_config();
        let cookie = generate_session_cookie(UserId(1), &config, false).unwrap();
        assert_eq!(cookie.name(), config.cookie_name);
        assert_eq!(cookie.value().split('.').count(), 3);
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.max_age(), None);
    }

    #[test]
    fn test_persistent_cookie_has_max_age() {
        let config = session_config();
        let cookie = generate_session_cookie(UserId(1), &config, true).unwrap();
        assert_eq!(cookie.max_age(), Some(time::Duration::seconds(600)));
    }

    #[test]
    fn test_removal_cookie_is_empty() {
        let config = session_config();
        let cookie = create_removal_cookie(&config);
        assert_eq!(cookie.name(), "session");
        assert_eq!(cookie.value(), "");
    }

    #[tokio::test]
    async fn test_validate_token_with_valid_token() {
        let config = session_config();
        let store = HashSetRevokedTokenStore::default();
        let token = generate_session_token(UserId(7), 600, config.as_bytes()).unwrap();

        let claims = validate_session_token(&token, &store, &config).await.unwrap();

        assert_eq!(claims.sub, UserId(7));
        assert!(claims.exp > (Utc::now().timestamp() + 540) as usize);
    }

    #[tokio::test]
    async fn test_validate_token_with_invalid_token() {
        let config = session_config();
        let store = HashSetRevokedTokenStore::default();
        let result = validate_session_token("invalid_token", &store, &config).await;
        assert!(matches!(result, Err(SessionError::TokenError(_))));
    }

    #[tokio::test]
    async fn test_token_signed_with_other_secret_is_rejected() {
        let config = session_config();
        let store = HashSetRevokedTokenStore::default();
        let token = generate_session_token(UserId(7), 600, b"another secret").unwrap();
        let result = validate_session_token(&token, &store, &config).await;
        assert!(matches!(result, Err(SessionError::TokenError(_))));
    }

    #[tokio::test]
    async fn test_revoked_token_is_rejected() {
        let config = session_config();
        let store = HashSetRevokedTokenStore::default();
        let token = generate_session_token(UserId(7), 600, config.as_bytes()).unwrap();
        let claims = validate_session_token(&token, &store, &config).await.unwrap();

        let expires_at = claims.expires_at();
        assert!(expires_at > Utc::now());
        store.revoke_token(claims.jti, expires_at).await.unwrap();

        let result = validate_session_token(&token, &store, &config).await;
        assert!(matches!(result, Err(SessionError::TokenIsRevoked)));
    }
}
