use blogwright_core::{Email, Password, User, UserStore, UserStoreError};

#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("Incorrect credentials")]
    IncorrectCredentials,
    #[error("User store error: {0}")]
    UserStoreError(#[from] UserStoreError),
}

/// Login use case - checks an email and password pair
pub struct LoginUseCase<'a, U>
where
    U: UserStore + ?Sized,
{
    user_store: &'a U,
}

impl<'a, U> LoginUseCase<'a, U>
where
    U: UserStore + ?Sized,
{
    pub fn new(user_store: &'a U) -> Self {
        Self { user_store }
    }

    /// Unknown emails and wrong passwords are reported the same way.
    #[tracing::instrument(name = "LoginUseCase::execute", skip_all)]
    pub async fn execute(&self, email: Email, password: Password) -> Result<User, LoginError> {
        match self.user_store.authenticate_user(&email, &password).await {
            Ok(user) => Ok(user),
            Err(UserStoreError::UserNotFound | UserStoreError::IncorrectPassword) => {
                Err(LoginError::IncorrectCredentials)
            }
            Err(e) => Err(e.into()),
        }
    }
}
