pub mod env {
    pub const APP_ENVIRONMENT_ENV_VAR: &str = "APP_ENVIRONMENT";
    pub const APP_CONFIG_DIR_ENV_VAR: &str = "APP_CONFIG_DIR";
    pub const ENV_PREFIX: &str = "APP";
    pub const ENV_SEPARATOR: &str = "__";
}

pub const DEFAULT_CONFIG_DIR: &str = "config";
pub const PROFILE_PICS_DIR: &str = "profile_pics";

pub mod prod {
    pub mod email_client {
        pub const BASE_URL: &str = "https://api.postmarkapp.com/";
    }
}

pub mod test {
    pub const APP_ADDRESS: &str = "127.0.0.1:0";
    pub mod email_client {
        use std::time::Duration;

        pub const SENDER: &str = "noreply@blogwright.test";
        pub const TIMEOUT: Duration = std::time::Duration::from_millis(200);
    }
}
