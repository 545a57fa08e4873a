use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, ConfigError, File};
use secrecy::Secret;
use serde::Deserialize;

use super::constants::{DEFAULT_CONFIG_DIR, PROFILE_PICS_DIR, env};

#[derive(Debug, Clone, Deserialize)]
pub struct BlogSettings {
    pub application: ApplicationSettings,
    pub session: SessionSettings,
    pub reset_token: ResetTokenSettings,
    #[serde(default)]
    pub database: Option<DatabaseSettings>,
    #[serde(default)]
    pub redis: Option<RedisSettings>,
    pub email_client: EmailClientSettings,
    #[serde(default)]
    pub admin: AdminSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
    pub public_url: String,
    pub static_dir: PathBuf,
}

impl ApplicationSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn profile_pics_dir(&self) -> PathBuf {
        self.static_dir.join(PROFILE_PICS_DIR)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionSettings {
    pub secret: Secret<String>,
    pub cookie_name: String,
    pub ttl_in_seconds: i64,
    #[serde(default = "default_secure_cookie")]
    pub secure_cookie: bool,
}

fn default_secure_cookie() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResetTokenSettings {
    pub secret: Secret<String>,
    pub ttl_in_seconds: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: Secret<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedisSettings {
    pub host_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmailClientSettings {
    pub base_url: String,
    pub sender: String,
    #[serde(default)]
    pub auth_token: Option<Secret<String>>,
    pub timeout_in_millis: u64,
}

impl EmailClientSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_in_millis)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminSettings {
    #[serde(default)]
    pub bootstrap_emails: Vec<String>,
}

impl AdminSettings {
    pub fn is_bootstrap_admin(&self, email: &str) -> bool {
        self.bootstrap_emails
            .iter()
            .any(|admin| admin.trim().eq_ignore_ascii_case(email.trim()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{other} is not a supported environment. Use either `local` or `production`."
            )),
        }
    }
}

impl BlogSettings {
    /// Load settings from `.env`, the JSON files in the config directory and
    /// `APP__`-prefixed environment variables, later sources winning.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment: Environment = std::env::var(env::APP_ENVIRONMENT_ENV_VAR)
            .unwrap_or_else(|_| "local".into())
            .try_into()
            .map_err(ConfigError::Message)?;

        let config_dir = std::env::var(env::APP_CONFIG_DIR_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_DIR));

        Self::load_from(&config_dir, environment)
    }

    pub fn load_from(config_dir: &Path, environment: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(config_dir.join("base.json")))
            .add_source(
                File::from(config_dir.join(format!("{}.json", environment.as_str())))
                    .required(false),
            )
            .add_source(
                config::Environment::with_prefix(env::ENV_PREFIX)
                    .prefix_separator(env::ENV_SEPARATOR)
                    .separator(env::ENV_SEPARATOR)
                    .list_separator(",")
                    .with_list_parse_key("admin.bootstrap_emails")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    const BASE: &str = r#"{
        "application": {
            "host": "127.0.0.1",
            "port": 8000,
            "public_url": "http://127.0.0.1:8000",
            "static_dir": "static"
        },
        "session": { "secret": "base-secret", "cookie_name": "session", "ttl_in_seconds": 3600 },
        "reset_token": { "secret": "reset-secret", "ttl_in_seconds": 1800 },
        "email_client": {
            "base_url": "https://api.postmarkapp.com/",
            "sender": "noreply@example.com",
            "timeout_in_millis": 10000
        }
    }"#;

    fn write_config(files: &[(&str, &str)]) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("blogwright_config_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        for (name, contents) in files {
            std::fs::write(dir.join(name), contents).unwrap();
        }
        dir
    }

    #[test]
    fn test_base_file_alone_is_enough() {
        let dir = write_config(&[("base.json", BASE)]);

        let settings = BlogSettings::load_from(&dir, Environment::Local).unwrap();

        assert_eq!(settings.application.address(), "127.0.0.1:8000");
        assert!(settings.database.is_none());
        assert!(settings.redis.is_none());
        assert!(settings.email_client.auth_token.is_none());
        assert!(settings.session.secure_cookie);
        assert!(settings.admin.bootstrap_emails.is_empty());
        assert_eq!(settings.email_client.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_environment_file_overrides_base() {
        let dir = write_config(&[
            ("base.json", BASE),
            (
                "production.json",
                r#"{
                    "application": { "host": "0.0.0.0" },
                    "session": { "secret": "prod-secret" },
                    "database": { "url": "postgres://db/blog" },
                    "admin": { "bootstrap_emails": ["Admin@Example.com"] }
                }"#,
            ),
        ]);

        let settings = BlogSettings::load_from(&dir, Environment::Production).unwrap();

        assert_eq!(settings.application.host, "0.0.0.0");
        assert_eq!(settings.application.port, 8000);
        assert_eq!(settings.session.secret.expose_secret(), "prod-secret");
        assert_eq!(
            settings.database.unwrap().url.expose_secret(),
            "postgres://db/blog"
        );
        assert!(settings.admin.is_bootstrap_admin("admin@example.com"));
    }

    #[test]
    fn test_missing_base_file_is_an_error() {
        let dir = write_config(&[]);
        assert!(BlogSettings::load_from(&dir, Environment::Local).is_err());
    }

    #[test]
    fn test_environment_parsing() {
        assert_eq!(
            Environment::try_from("Production".to_string()),
            Ok(Environment::Production)
        );
        assert!(Environment::try_from("staging".to_string()).is_err());
    }
}
