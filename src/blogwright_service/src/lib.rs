mod blog_service;
mod helpers;
pub mod tracing;

pub use blog_service::BlogService;
pub use helpers::{
    Ports, StartupError, build_state, configure_email_client, configure_postgresql,
    configure_redis, get_postgres_pool, get_redis_client, reset_token_service,
};
