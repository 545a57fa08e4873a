pub mod hashmap_pattern_store;
pub mod hashmap_post_store;
pub mod hashmap_user_store;
pub mod hashset_revoked_token_store;
pub mod password_hash;
pub mod postgres_pattern_store;
pub mod postgres_post_store;
pub mod postgres_user_store;
pub mod redis_revoked_token_store;

pub use hashmap_pattern_store::HashMapPatternStore;
pub use hashmap_post_store::HashMapPostStore;
pub use hashmap_user_store::HashMapUserStore;
pub use hashset_revoked_token_store::HashSetRevokedTokenStore;
pub use postgres_pattern_store::PostgresPatternStore;
pub use postgres_post_store::PostgresPostStore;
pub use postgres_user_store::PostgresUserStore;
pub use redis_revoked_token_store::{
    RESET_TOKEN_KEY_PREFIX, RedisRevokedTokenStore, SESSION_TOKEN_KEY_PREFIX,
};
