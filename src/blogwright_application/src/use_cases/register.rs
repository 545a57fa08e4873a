use blogwright_core::{Email, NewUser, Password, Role, User, UserStore, UserStoreError, Username};

#[derive(Debug, thiserror::Error)]
pub enum RegisterError {
    #[error("User store error: {0}")]
    UserStoreError(#[from] UserStoreError),
}

/// Register use case - creates an account. Emails on the bootstrap list
/// become admins.
pub struct RegisterUseCase<'a, U>
where
    U: UserStore + ?Sized,
{
    user_store: &'a U,
    bootstrap_admins: &'a [String],
}

impl<'a, U> RegisterUseCase<'a, U>
where
    U: UserStore + ?Sized,
{
    pub fn new(user_store: &'a U, bootstrap_admins: &'a [String]) -> Self {
        Self {
            user_store,
            bootstrap_admins,
        }
    }

    fn role_for(&self, email: &Email) -> Role {
        let is_admin = self
            .bootstrap_admins
            .iter()
            .any(|admin| admin.trim().eq_ignore_ascii_case(email.as_str()));
        if is_admin { Role::Admin } else { Role::User }
    }

    /// Execute the register use case
    ///
    /// # Returns
    /// The stored user, or `UsernameTaken` / `EmailTaken` from the store
    #[tracing::instrument(name = "RegisterUseCase::execute", skip(self, email, password))]
    pub async fn execute(
        &self,
        username: Username,
        email: Email,
        password: Password,
    ) -> Result<User, RegisterError> {
        let role = self.role_for(&email);
        let user = self
            .user_store
            .add_user(NewUser {
                username,
                email,
                password,
                role,
            })
            .await?;

        tracing::info!(user_id = %user.id, role = %user.role, "Account created");
        Ok(user)
    }
}
