use async_trait::async_trait;
use thiserror::Error;

use crate::domain::email::Email;

/// Port trait for email sending service
#[async_trait]
pub trait EmailClient: Send + Sync {
    async fn send_email(
        &self,
        recipient: &Email,
        subject: &str,
        content: &str,
    ) -> Result<(), String>;
}

#[derive(Debug, Error)]
pub enum PictureStoreError {
    #[error("File does not have an allowed extension (jpg, jpeg, png).")]
    UnsupportedExtension,
    #[error("Failed to store picture: {0}")]
    Io(String),
}

/// Port trait for persisting uploaded profile pictures.
#[async_trait]
pub trait PictureStore: Send + Sync {
    /// Store the picture and return the file name it is served under.
    async fn save_picture(
        &self,
        original_name: &str,
        bytes: Vec<u8>,
    ) -> Result<String, PictureStoreError>;
}
