use std::sync::Arc;

use blogwright_adapters::{
    auth::{JwtResetTokenService, SessionConfig},
    config::{BlogSettings, DatabaseSettings, EmailClientSettings, RedisSettings},
    email::{MockEmailClient, PostmarkEmailClient},
    persistence::{
        HashMapPatternStore, HashMapPostStore, HashMapUserStore, HashSetRevokedTokenStore,
        PostgresPatternStore, PostgresPostStore, PostgresUserStore, RESET_TOKEN_KEY_PREFIX,
        RedisRevokedTokenStore, SESSION_TOKEN_KEY_PREFIX,
    },
    pictures::LocalPictureStore,
};
use blogwright_axum::AppState;
use blogwright_core::{
    Email, EmailClient, PatternStore, PictureStore, PostStore, ResetTokenService,
    RevokedTokenStore, SystemClock, UserStore,
};
use redis::{Client, RedisResult};
use secrecy::{ExposeSecret, Secret};
use sqlx::{PgPool, postgres::PgPoolOptions};
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
    #[error("Invalid email sender: {0}")]
    Sender(String),
}

/// The adapters behind every port the web layer uses.
pub struct Ports {
    pub user_store: Arc<dyn UserStore>,
    pub post_store: Arc<dyn PostStore>,
    pub pattern_store: Arc<dyn PatternStore>,
    pub revoked_sessions: Arc<dyn RevokedTokenStore>,
    pub revoked_reset_tokens: Arc<dyn RevokedTokenStore>,
    pub reset_tokens: Arc<dyn ResetTokenService>,
    pub email_client: Arc<dyn EmailClient>,
    pub picture_store: Arc<dyn PictureStore>,
}

impl Ports {
    /// In-memory stores with the given token service, mailer and picture store.
    pub fn in_memory(
        reset_tokens: Arc<dyn ResetTokenService>,
        email_client: Arc<dyn EmailClient>,
        picture_store: Arc<dyn PictureStore>,
    ) -> Self {
        Self {
            user_store: Arc::new(HashMapUserStore::new()),
            post_store: Arc::new(HashMapPostStore::new()),
            pattern_store: Arc::new(HashMapPatternStore::new()),
            revoked_sessions: Arc::new(HashSetRevokedTokenStore::new()),
            revoked_reset_tokens: Arc::new(HashSetRevokedTokenStore::new()),
            reset_tokens,
            email_client,
            picture_store,
        }
    }

    pub fn into_state(self, settings: &BlogSettings) -> AppState {
        AppState {
            user_store: self.user_store,
            post_store: self.post_store,
            pattern_store: self.pattern_store,
            revoked_sessions: self.revoked_sessions,
            revoked_reset_tokens: self.revoked_reset_tokens,
            reset_tokens: self.reset_tokens,
            email_client: self.email_client,
            picture_store: self.picture_store,
            session: SessionConfig {
                cookie_name: settings.session.cookie_name.clone(),
                secret: settings.session.secret.clone(),
                ttl_in_seconds: settings.session.ttl_in_seconds,
                secure_cookie: settings.session.secure_cookie,
            },
            public_url: settings.application.public_url.clone(),
            static_dir: settings.application.static_dir.clone(),
            bootstrap_admins: Arc::new(settings.admin.bootstrap_emails.clone()),
        }
    }
}

pub fn reset_token_service(settings: &BlogSettings) -> JwtResetTokenService<SystemClock> {
    JwtResetTokenService::new(
        settings.reset_token.secret.clone(),
        SystemClock,
        chrono::Duration::seconds(settings.reset_token.ttl_in_seconds),
    )
}

/// Pick adapters from settings. Without a database the content stores live
/// in memory; without Redis so do the revocation lists; without a Postmark
/// token emails are only logged.
pub async fn build_state(settings: &BlogSettings) -> Result<AppState, StartupError> {
    let picture_store = Arc::new(LocalPictureStore::new(
        settings.application.profile_pics_dir(),
    ));
    let mut ports = Ports::in_memory(
        Arc::new(reset_token_service(settings)),
        configure_email_client(&settings.email_client)?,
        picture_store,
    );

    match &settings.database {
        Some(database) => {
            let pool = configure_postgresql(database).await?;
            ports.user_store = Arc::new(PostgresUserStore::new(pool.clone()));
            ports.post_store = Arc::new(PostgresPostStore::new(pool.clone()));
            ports.pattern_store = Arc::new(PostgresPatternStore::new(pool));
        }
        None => tracing::warn!("No database configured, using in-memory stores"),
    }

    if let Some(redis) = &settings.redis {
        let conn = Arc::new(RwLock::new(configure_redis(redis)?));
        ports.revoked_sessions = Arc::new(RedisRevokedTokenStore::new(
            conn.clone(),
            SESSION_TOKEN_KEY_PREFIX,
        ));
        ports.revoked_reset_tokens =
            Arc::new(RedisRevokedTokenStore::new(conn, RESET_TOKEN_KEY_PREFIX));
    }

    Ok(ports.into_state(settings))
}

pub fn configure_email_client(
    settings: &EmailClientSettings,
) -> Result<Arc<dyn EmailClient>, StartupError> {
    let Some(auth_token) = settings.auth_token.clone() else {
        tracing::warn!("No email auth token configured, emails will only be logged");
        return Ok(Arc::new(MockEmailClient::new()));
    };

    let sender = Email::try_from(Secret::new(settings.sender.clone()))
        .map_err(|e| StartupError::Sender(e.to_string()))?;
    let http_client = reqwest::Client::builder()
        .timeout(settings.timeout())
        .build()?;

    Ok(Arc::new(PostmarkEmailClient::new(
        settings.base_url.clone(),
        sender,
        auth_token,
        http_client,
    )))
}

/// Connect to PostgreSQL and run pending migrations.
pub async fn configure_postgresql(settings: &DatabaseSettings) -> Result<PgPool, sqlx::Error> {
    let pg_pool = get_postgres_pool(settings.url.expose_secret(), settings.max_connections).await?;

    sqlx::migrate!("./migrations").run(&pg_pool).await?;

    Ok(pg_pool)
}

pub fn configure_redis(settings: &RedisSettings) -> RedisResult<redis::Connection> {
    get_redis_client(&settings.host_name)?.get_connection()
}

pub async fn get_postgres_pool(url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(url)
        .await
}

pub fn get_redis_client(redis_hostname: &str) -> RedisResult<Client> {
    let redis_url = format!("redis://{}/", redis_hostname);
    redis::Client::open(redis_url)
}
