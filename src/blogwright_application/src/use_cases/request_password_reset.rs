use blogwright_core::{
    Email, EmailClient, IssuedResetToken, ResetTokenError, ResetTokenService, UserStore,
    UserStoreError,
};

pub const RESET_EMAIL_SUBJECT: &str = "Password Reset Request";

#[derive(Debug, thiserror::Error)]
pub enum RequestPasswordResetError {
    #[error("There is no account with that email. You must register first.")]
    UnknownEmail,
    #[error("User store error: {0}")]
    UserStoreError(#[from] UserStoreError),
    #[error("Reset token error: {0}")]
    ResetTokenError(#[from] ResetTokenError),
    #[error("Failed to send email: {0}")]
    EmailError(String),
}

pub fn reset_link(public_url: &str, token: &str) -> String {
    format!("{}/reset_password/{}", public_url.trim_end_matches('/'), token)
}

fn reset_email_body(link: &str) -> String {
    format!(
        "To reset your password, visit the following link:\n{link}\n\n\
         If you did not make this request then simply ignore this email and no changes will be made.\n"
    )
}

/// Request password reset use case - issues a reset token for the account
/// behind `email` and mails a link containing it.
pub struct RequestPasswordResetUseCase<'a, U, T, E>
where
    U: UserStore + ?Sized,
    T: ResetTokenService + ?Sized,
    E: EmailClient + ?Sized,
{
    user_store: &'a U,
    token_service: &'a T,
    email_client: &'a E,
    public_url: &'a str,
}

impl<'a, U, T, E> RequestPasswordResetUseCase<'a, U, T, E>
where
    U: UserStore + ?Sized,
    T: ResetTokenService + ?Sized,
    E: EmailClient + ?Sized,
{
    pub fn new(
        user_store: &'a U,
        token_service: &'a T,
        email_client: &'a E,
        public_url: &'a str,
    ) -> Self {
        Self {
            user_store,
            token_service,
            email_client,
            public_url,
        }
    }

    #[tracing::instrument(name = "RequestPasswordResetUseCase::execute", skip_all)]
    pub async fn execute(&self, email: Email) -> Result<IssuedResetToken, RequestPasswordResetError> {
        let user = match self.user_store.get_user_by_email(&email).await {
            Ok(user) => user,
            Err(UserStoreError::UserNotFound) => {
                return Err(RequestPasswordResetError::UnknownEmail);
            }
            Err(e) => return Err(e.into()),
        };

        let issued = self
            .token_service
            .issue(user.id, self.token_service.default_ttl())?;

        let body = reset_email_body(&reset_link(self.public_url, &issued.token));
        self.email_client
            .send_email(&user.email, RESET_EMAIL_SUBJECT, &body)
            .await
            .map_err(RequestPasswordResetError::EmailError)?;

        tracing::info!(user_id = %user.id, expires_at = %issued.expires_at, "Reset token issued");
        Ok(issued)
    }
}
