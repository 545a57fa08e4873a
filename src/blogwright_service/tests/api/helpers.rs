use std::path::PathBuf;
use std::sync::Arc;

use blogwright_adapters::{
    auth::JwtResetTokenService,
    config::{
        AdminSettings, ApplicationSettings, BlogSettings, EmailClientSettings, ResetTokenSettings,
        SessionSettings, prod, test,
    },
    email::MockEmailClient,
    pictures::LocalPictureStore,
};
use blogwright_core::{DEFAULT_RESET_TOKEN_TTL_SECONDS, ManualClock};
use blogwright_service::{BlogService, Ports};
use reqwest::{Response, redirect::Policy};
use secrecy::Secret;
use tokio::net::TcpListener;

pub const ADMIN_EMAIL: &str = "admin@blogwright.test";
pub const PASSWORD: &str = "correct-horse";

pub struct TestApp {
    pub address: String,
    pub http_client: reqwest::Client,
    pub email_client: MockEmailClient,
    pub clock: ManualClock,
    pub static_dir: PathBuf,
}

fn settings(address: &str, static_dir: PathBuf) -> BlogSettings {
    BlogSettings {
        application: ApplicationSettings {
            host: "127.0.0.1".to_owned(),
            port: 0,
            public_url: address.to_owned(),
            static_dir,
        },
        session: SessionSettings {
            secret: Secret::new("test-session-secret".to_owned()),
            cookie_name: "session".to_owned(),
            ttl_in_seconds: 3600,
            secure_cookie: false,
        },
        reset_token: ResetTokenSettings {
            secret: Secret::new("test-reset-secret".to_owned()),
            ttl_in_seconds: DEFAULT_RESET_TOKEN_TTL_SECONDS,
        },
        database: None,
        redis: None,
        email_client: EmailClientSettings {
            base_url: prod::email_client::BASE_URL.to_owned(),
            sender: test::email_client::SENDER.to_owned(),
            auth_token: None,
            timeout_in_millis: test::email_client::TIMEOUT.as_millis() as u64,
        },
        admin: AdminSettings {
            bootstrap_emails: vec![ADMIN_EMAIL.to_owned()],
        },
    }
}

impl TestApp {
    pub async fn new() -> Self {
        let listener = TcpListener::bind(test::APP_ADDRESS).await.unwrap();
        let address = format!("http://{}", listener.local_addr().unwrap());

        let static_dir = std::env::temp_dir().join(format!("blogwright_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&static_dir).unwrap();
        let settings = settings(&address, static_dir.clone());

        let clock = ManualClock::default();
        let email_client = MockEmailClient::new();
        let reset_tokens = JwtResetTokenService::new(
            settings.reset_token.secret.clone(),
            clock.clone(),
            chrono::Duration::seconds(settings.reset_token.ttl_in_seconds),
        );
        let state = Ports::in_memory(
            Arc::new(reset_tokens),
            Arc::new(email_client.clone()),
            Arc::new(LocalPictureStore::new(
                settings.application.profile_pics_dir(),
            )),
        )
        .into_state(&settings);

        tokio::spawn(BlogService::new(state).run_standalone(listener));

        let http_client = reqwest::Client::builder()
            .cookie_store(true)
            .redirect(Policy::none())
            .build()
            .unwrap();

        Self {
            address,
            http_client,
            email_client,
            clock,
            static_dir,
        }
    }

    /// A second browser against the same server.
    pub fn new_browser(&self) -> reqwest::Client {
        reqwest::Client::builder()
            .cookie_store(true)
            .redirect(Policy::none())
            .build()
            .unwrap()
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn get(&self, path: &str) -> Response {
        self.http_client.get(self.url(path)).send().await.unwrap()
    }

    pub async fn get_html(&self, path: &str) -> String {
        self.get(path).await.text().await.unwrap()
    }

    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Response {
        self.http_client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .unwrap()
    }

    pub async fn register(&self, username: &str, email: &str) -> Response {
        self.post_form(
            "/register",
            &[
                ("username", username),
                ("email", email),
                ("password", PASSWORD),
                ("confirm_password", PASSWORD),
            ],
        )
        .await
    }

    pub async fn login(&self, email: &str, password: &str) -> Response {
        self.post_form("/login", &[("email", email), ("password", password)])
            .await
    }

    /// Register and sign in on this app's client.
    pub async fn sign_up(&self, username: &str, email: &str) {
        assert_redirects_to(&self.register(username, email).await, "/login");
        assert_redirects_to(&self.login(email, PASSWORD).await, "/");
    }

    pub async fn logout(&self) -> Response {
        self.get("/logout").await
    }

    pub async fn create_post(&self, title: &str, content: &str) -> Response {
        self.post_form("/post/new", &[("title", title), ("content", content)])
            .await
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.static_dir);
    }
}

pub fn location(response: &Response) -> &str {
    response
        .headers()
        .get("location")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

#[track_caller]
pub fn assert_redirects_to(response: &Response, path: &str) {
    assert_eq!(response.status().as_u16(), 303, "expected a redirect");
    assert_eq!(location(response), path);
}
