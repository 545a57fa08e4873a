use std::sync::Arc;

use blogwright_core::{Email, EmailClient};
use tokio::sync::RwLock;

#[derive(Debug, Clone, PartialEq)]
pub struct SentEmail {
    pub recipient: String,
    pub subject: String,
    pub content: String,
}

/// Email client for development and tests. Messages are logged and kept in
/// memory instead of being delivered.
#[derive(Debug, Clone, Default)]
pub struct MockEmailClient {
    sent: Arc<RwLock<Vec<SentEmail>>>,
}

impl MockEmailClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn sent(&self) -> Vec<SentEmail> {
        self.sent.read().await.clone()
    }

    pub async fn last_sent_to(&self, recipient: &str) -> Option<SentEmail> {
        self.sent
            .read()
            .await
            .iter()
            .rev()
            .find(|email| email.recipient.eq_ignore_ascii_case(recipient))
            .cloned()
    }
}

#[async_trait::async_trait]
impl EmailClient for MockEmailClient {
    async fn send_email(
        &self,
        recipient: &Email,
        subject: &str,
        content: &str,
    ) -> Result<(), String> {
        tracing::info!(subject, "Email not delivered, mock client in use");
        self.sent.write().await.push(SentEmail {
            recipient: recipient.as_str().to_owned(),
            subject: subject.to_owned(),
            content: content.to_owned(),
        });
        Ok(())
    }
}
