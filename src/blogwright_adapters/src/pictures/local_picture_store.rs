use std::path::{Path, PathBuf};

use blogwright_core::{PictureStore, PictureStoreError};

pub const ALLOWED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Writes uploaded pictures into a directory served as static files, each
/// under a random 16 hex digit name that keeps the original extension.
#[derive(Debug, Clone)]
pub struct LocalPictureStore {
    directory: PathBuf,
}

impl LocalPictureStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }
}

fn allowed_extension(original_name: &str) -> Option<String> {
    let extension = Path::new(original_name)
        .extension()?
        .to_str()?
        .to_ascii_lowercase();
    ALLOWED_EXTENSIONS
        .contains(&extension.as_str())
        .then_some(extension)
}

fn random_hex() -> String {
    rand::random::<[u8; 8]>()
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect()
}

#[async_trait::async_trait]
impl PictureStore for LocalPictureStore {
    #[tracing::instrument(name = "Saving profile picture", skip(self, bytes))]
    async fn save_picture(
        &self,
        original_name: &str,
        bytes: Vec<u8>,
    ) -> Result<String, PictureStoreError> {
        let extension =
            allowed_extension(original_name).ok_or(PictureStoreError::UnsupportedExtension)?;
        let file_name = format!("{}.{}", random_hex(), extension);

        tokio::fs::create_dir_all(&self.directory)
            .await
            .map_err(|e| PictureStoreError::Io(e.to_string()))?;
        tokio::fs::write(self.directory.join(&file_name), bytes)
            .await
            .map_err(|e| PictureStoreError::Io(e.to_string()))?;

        Ok(file_name)
    }
}
