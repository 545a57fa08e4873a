use blogwright_core::{
    Password, ResetTokenError, ResetTokenService, RevokedTokenStore, RevokedTokenStoreError, User,
    UserStore, UserStoreError, VerifiedResetToken,
};

#[derive(Debug, thiserror::Error)]
pub enum ResetPasswordError {
    #[error("Reset token error: {0}")]
    ResetTokenError(#[from] ResetTokenError),
    #[error("User store error: {0}")]
    UserStoreError(#[from] UserStoreError),
    #[error("Revoked token store error: {0}")]
    RevokedTokenStoreError(#[from] RevokedTokenStoreError),
}

impl ResetPasswordError {
    /// Expired, tampered, reused and orphaned tokens all read the same to the user.
    pub fn is_token_rejection(&self) -> bool {
        matches!(
            self,
            ResetPasswordError::ResetTokenError(ResetTokenError::Expired | ResetTokenError::Invalid)
        )
    }
}

/// Reset password use case - resolves a reset token back to its user and
/// sets a new password. Each token works once.
pub struct ResetPasswordUseCase<'a, U, T, R>
where
    U: UserStore + ?Sized,
    T: ResetTokenService + ?Sized,
    R: RevokedTokenStore + ?Sized,
{
    user_store: &'a U,
    token_service: &'a T,
    revoked_token_store: &'a R,
}

impl<'a, U, T, R> ResetPasswordUseCase<'a, U, T, R>
where
    U: UserStore + ?Sized,
    T: ResetTokenService + ?Sized,
    R: RevokedTokenStore + ?Sized,
{
    pub fn new(user_store: &'a U, token_service: &'a T, revoked_token_store: &'a R) -> Self {
        Self {
            user_store,
            token_service,
            revoked_token_store,
        }
    }

    /// Verify the token and load its user. Used before showing the form.
    #[tracing::instrument(name = "ResetPasswordUseCase::resolve", skip_all)]
    pub async fn resolve(&self, token: &str) -> Result<(User, VerifiedResetToken), ResetPasswordError> {
        let verified = self.token_service.verify(token)?;

        if self.revoked_token_store.is_revoked(&verified.token_id).await? {
            tracing::warn!("Reset token reused");
            return Err(ResetTokenError::Invalid.into());
        }

        let user = match self.user_store.get_user(verified.user_id).await {
            Ok(user) => user,
            Err(UserStoreError::UserNotFound) => return Err(ResetTokenError::Invalid.into()),
            Err(e) => return Err(e.into()),
        };

        Ok((user, verified))
    }

    /// The token id is claimed before the password changes. Only one of any
    /// concurrent submissions of the same token wins the claim.
    #[tracing::instrument(name = "ResetPasswordUseCase::execute", skip_all)]
    pub async fn execute(&self, token: &str, new_password: Password) -> Result<User, ResetPasswordError> {
        let (user, verified) = self.resolve(token).await?;

        let claimed = self
            .revoked_token_store
            .revoke_token(verified.token_id, verified.expires_at)
            .await?;
        if !claimed {
            tracing::warn!("Reset token used concurrently");
            return Err(ResetTokenError::Invalid.into());
        }

        self.user_store
            .set_new_password(user.id, new_password)
            .await?;

        tracing::info!(user_id = %user.id, "Password reset");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use blogwright_adapters::{
        auth::JwtResetTokenService,
        persistence::{HashMapUserStore, HashSetRevokedTokenStore},
    };
    use blogwright_core::{Email, ManualClock, NewUser, ProfileUpdate, Role, UserId, Username};
    use chrono::Duration;
    use secrecy::Secret;

    use super::*;

    fn password(s: &str) -> Password {
        Password::try_from(Secret::from(s.to_owned())).unwrap()
    }

    struct Fixture {
        users: HashMapUserStore,
        tokens: JwtResetTokenService<ManualClock>,
        revoked: HashSetRevokedTokenStore,
        clock: ManualClock,
        user: User,
    }

    async fn fixture() -> Fixture {
        let users = HashMapUserStore::new();
        let user = users
            .add_user(NewUser {
                username: Username::try_from("alice".to_owned()).unwrap(),
                email: Email::try_from("alice@example.com".to_owned()).unwrap(),
                password: password("password123"),
                role: Role::User,
            })
            .await
            .unwrap();
        let clock = ManualClock::default();
        let tokens = JwtResetTokenService::new(
            Secret::from("secret".to_owned()),
            clock.clone(),
            Duration::seconds(1800),
        );
        Fixture {
            users,
            tokens,
            revoked: HashSetRevokedTokenStore::new(),
            clock,
            user,
        }
    }

    #[tokio::test]
    async fn test_token_resets_password_once() {
        let f = fixture().await;
        let use_case = ResetPasswordUseCase::new(&f.users, &f.tokens, &f.revoked);
        let issued = f.tokens.issue(f.user.id, Duration::seconds(1800)).unwrap();

        let (resolved, _) = use_case.resolve(&issued.token).await.unwrap();
        assert_eq!(resolved.id, f.user.id);

        use_case
            .execute(&issued.token, password("newpassword"))
            .await
            .unwrap();
        let email = Email::try_from("alice@example.com".to_owned()).unwrap();
        assert!(
            f.users
                .authenticate_user(&email, &password("newpassword"))
                .await
                .is_ok()
        );

        let reuse = use_case
            .execute(&issued.token, password("thirdpassword"))
            .await;
        assert!(matches!(
            reuse,
            Err(ResetPasswordError::ResetTokenError(ResetTokenError::Invalid))
        ));
    }

    /// Delegates to the in-memory store but yields on lookups, the way an
    /// I/O-backed store would.
    struct YieldingUserStore(HashMapUserStore);

    #[async_trait::async_trait]
    impl UserStore for YieldingUserStore {
        async fn add_user(&self, user: NewUser) -> Result<User, UserStoreError> {
            self.0.add_user(user).await
        }

        async fn authenticate_user(
            &self,
            email: &Email,
            password: &Password,
        ) -> Result<User, UserStoreError> {
            self.0.authenticate_user(email, password).await
        }

        async fn get_user(&self, id: UserId) -> Result<User, UserStoreError> {
            tokio::task::yield_now().await;
            self.0.get_user(id).await
        }

        async fn get_user_by_email(&self, email: &Email) -> Result<User, UserStoreError> {
            self.0.get_user_by_email(email).await
        }

        async fn get_user_by_username(&self, username: &Username) -> Result<User, UserStoreError> {
            self.0.get_user_by_username(username).await
        }

        async fn update_profile(
            &self,
            id: UserId,
            update: ProfileUpdate,
        ) -> Result<User, UserStoreError> {
            self.0.update_profile(id, update).await
        }

        async fn set_new_password(
            &self,
            id: UserId,
            new_password: Password,
        ) -> Result<(), UserStoreError> {
            self.0.set_new_password(id, new_password).await
        }

        async fn set_role(&self, id: UserId, role: Role) -> Result<(), UserStoreError> {
            self.0.set_role(id, role).await
        }
    }

    #[tokio::test]
    async fn test_concurrent_submissions_reset_once() {
        let f = fixture().await;
        let users = YieldingUserStore(f.users.clone());
        let use_case = ResetPasswordUseCase::new(&users, &f.tokens, &f.revoked);
        let issued = f.tokens.issue(f.user.id, Duration::seconds(1800)).unwrap();

        let (first, second) = tokio::join!(
            use_case.execute(&issued.token, password("first-pass")),
            use_case.execute(&issued.token, password("second-pass")),
        );

        assert!(first.is_ok() ^ second.is_ok());
        let loser = if first.is_ok() { second } else { first };
        assert!(loser.unwrap_err().is_token_rejection());
    }

    #[tokio::test]
    async fn test_expired_token_is_rejected() {
        let f = fixture().await;
        let use_case = ResetPasswordUseCase::new(&f.users, &f.tokens, &f.revoked);
        let issued = f.tokens.issue(f.user.id, Duration::seconds(1800)).unwrap();

        f.clock.advance(Duration::seconds(1800));

        let result = use_case.resolve(&issued.token).await;
        let err = result.unwrap_err();
        assert!(matches!(
            err,
            ResetPasswordError::ResetTokenError(ResetTokenError::Expired)
        ));
        assert!(err.is_token_rejection());
    }

    #[tokio::test]
    async fn test_token_for_deleted_user_is_invalid() {
        let f = fixture().await;
        let use_case = ResetPasswordUseCase::new(&f.users, &f.tokens, &f.revoked);
        let issued = f.tokens.issue(UserId(999), Duration::seconds(1800)).unwrap();

        let result = use_case.resolve(&issued.token).await;

        assert!(result.unwrap_err().is_token_rejection());
    }
}
