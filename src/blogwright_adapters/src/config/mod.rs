pub mod constants;
pub mod settings;

pub use constants::*;
pub use settings::{
    AdminSettings, ApplicationSettings, BlogSettings, DatabaseSettings, EmailClientSettings,
    Environment, RedisSettings, ResetTokenSettings, SessionSettings,
};
