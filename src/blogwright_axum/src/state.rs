use std::path::PathBuf;
use std::sync::Arc;

use blogwright_adapters::auth::SessionConfig;
use blogwright_core::{
    EmailClient, PatternStore, PictureStore, PostStore, ResetTokenService, RevokedTokenStore,
    UserStore,
};

/// Everything a handler needs, cloned into each request.
#[derive(Clone)]
pub struct AppState {
    pub user_store: Arc<dyn UserStore>,
    pub post_store: Arc<dyn PostStore>,
    pub pattern_store: Arc<dyn PatternStore>,
    pub revoked_sessions: Arc<dyn RevokedTokenStore>,
    pub revoked_reset_tokens: Arc<dyn RevokedTokenStore>,
    pub reset_tokens: Arc<dyn ResetTokenService>,
    pub email_client: Arc<dyn EmailClient>,
    pub picture_store: Arc<dyn PictureStore>,
    pub session: SessionConfig,
    pub public_url: String,
    pub static_dir: PathBuf,
    pub bootstrap_admins: Arc<Vec<String>>,
}
