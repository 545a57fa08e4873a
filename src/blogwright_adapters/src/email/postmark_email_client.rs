use blogwright_core::{Email, EmailClient};
use reqwest::{Client, Url};
use secrecy::{ExposeSecret, Secret};

pub struct PostmarkEmailClient {
    http_client: Client,
    base_url: String,
    sender: Email,
    authorization_token: Secret<String>,
}

impl PostmarkEmailClient {
    pub fn new(
        base_url: String,
        sender: Email,
        authorization_token: Secret<String>,
        http_client: Client,
    ) -> Self {
        Self {
            http_client,
            base_url,
            sender,
            authorization_token,
        }
    }

    fn endpoint(&self) -> Result<Url, String> {
        Url::parse(&self.base_url)
            .and_then(|base| base.join("/email"))
            .map_err(|e| e.to_string())
    }
}

#[async_trait::async_trait]
impl EmailClient for PostmarkEmailClient {
    /// Mail goes out as plain text with link tracking off, so the reset link
    /// reaches the reader exactly as it was signed.
    #[tracing::instrument(name = "Sending email through Postmark", skip_all)]
    async fn send_email(
        &self,
        recipient: &Email,
        subject: &str,
        content: &str,
    ) -> Result<(), String> {
        let message = PlainTextMessage {
            from: self.sender.as_str(),
            to: recipient.as_str(),
            subject,
            text_body: content,
            tag: MESSAGE_TAG,
            track_links: "None",
            message_stream: MESSAGE_STREAM,
        };

        let response = self
            .http_client
            .post(self.endpoint()?)
            .header(
                POSTMARK_AUTH_HEADER,
                self.authorization_token.expose_secret(),
            )
            .json(&message)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        // Postmark explains rejections in the body; fall back to the status.
        match response.json::<PostmarkRejection>().await {
            Ok(rejection) => Err(format!(
                "Postmark rejected the message ({}): {}",
                rejection.error_code, rejection.message
            )),
            Err(_) => Err(format!("Postmark responded with {status}")),
        }
    }
}

const MESSAGE_STREAM: &str = "outbound";
const MESSAGE_TAG: &str = "blogwright";
const POSTMARK_AUTH_HEADER: &str = "X-Postmark-Server-Token";

#[derive(serde::Serialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct PlainTextMessage<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text_body: &'a str,
    tag: &'a str,
    track_links: &'a str,
    message_stream: &'a str,
}

#[derive(serde::Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct PostmarkRejection {
    error_code: i64,
    message: String,
}
