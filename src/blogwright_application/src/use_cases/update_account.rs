use blogwright_core::{
    Email, PictureStore, PictureStoreError, ProfileUpdate, User, UserId, UserStore,
    UserStoreError, Username,
};

#[derive(Debug, thiserror::Error)]
pub enum UpdateAccountError {
    #[error("User store error: {0}")]
    UserStoreError(#[from] UserStoreError),
    #[error("Picture store error: {0}")]
    PictureStoreError(#[from] PictureStoreError),
}

/// A file received from the account form.
#[derive(Debug, Clone)]
pub struct UploadedPicture {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Update account use case - changes username/email and optionally the
/// profile picture of the current user.
pub struct UpdateAccountUseCase<'a, U, P>
where
    U: UserStore + ?Sized,
    P: PictureStore + ?Sized,
{
    user_store: &'a U,
    picture_store: &'a P,
}

impl<'a, U, P> UpdateAccountUseCase<'a, U, P>
where
    U: UserStore + ?Sized,
    P: PictureStore + ?Sized,
{
    pub fn new(user_store: &'a U, picture_store: &'a P) -> Self {
        Self {
            user_store,
            picture_store,
        }
    }

    /// Uniqueness against other accounts is checked before the picture is written.
    #[tracing::instrument(name = "UpdateAccountUseCase::execute", skip(self, email, picture))]
    pub async fn execute(
        &self,
        user_id: UserId,
        username: Username,
        email: Email,
        picture: Option<UploadedPicture>,
    ) -> Result<User, UpdateAccountError> {
        self.ensure_available(user_id, &username, &email).await?;

        let image_file = match picture {
            Some(picture) => Some(
                self.picture_store
                    .save_picture(&picture.file_name, picture.bytes)
                    .await?,
            ),
            None => None,
        };

        let user = self
            .user_store
            .update_profile(
                user_id,
                ProfileUpdate {
                    username,
                    email,
                    image_file,
                },
            )
            .await?;

        Ok(user)
    }

    async fn ensure_available(
        &self,
        user_id: UserId,
        username: &Username,
        email: &Email,
    ) -> Result<(), UserStoreError> {
        match self.user_store.get_user_by_username(username).await {
            Ok(other) if other.id != user_id => return Err(UserStoreError::UsernameTaken),
            Ok(_) | Err(UserStoreError::UserNotFound) => {}
            Err(e) => return Err(e),
        }
        match self.user_store.get_user_by_email(email).await {
            Ok(other) if other.id != user_id => Err(UserStoreError::EmailTaken),
            Ok(_) | Err(UserStoreError::UserNotFound) => Ok(()),
            Err(e) => Err(e),
        }
    }
}
