use blogwright_core::{
    Email, NewUser, Password, ProfileUpdate, Role, User, UserId, UserStore, UserStoreError,
    Username,
};
use secrecy::{ExposeSecret, Secret};
use sqlx::{FromRow, PgPool};

use super::password_hash::{compute_password_hash, verify_password_hash};

const USERNAME_CONSTRAINT: &str = "users_username_key";
const EMAIL_CONSTRAINT: &str = "users_email_lower_key";

#[derive(Clone)]
pub struct PostgresUserStore {
    pool: PgPool,
}

impl PostgresUserStore {
    pub fn new(pool: PgPool) -> Self {
        PostgresUserStore { pool }
    }
}

#[derive(FromRow)]
struct UserRow {
    id: i64,
    username: String,
    email: String,
    image_file: String,
    password_hash: String,
    role: String,
}

impl TryFrom<UserRow> for User {
    type Error = UserStoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: UserId(row.id),
            username: Username::try_from(row.username).map_err(unexpected)?,
            email: Email::try_from(row.email).map_err(unexpected)?,
            image_file: row.image_file,
            password_hash: Secret::from(row.password_hash),
            role: row.role.parse::<Role>().map_err(unexpected)?,
        })
    }
}

fn unexpected(e: impl ToString) -> UserStoreError {
    UserStoreError::UnexpectedError(e.to_string())
}

fn map_write_error(e: sqlx::Error) -> UserStoreError {
    if let Some(db_err) = e.as_database_error() {
        match db_err.constraint() {
            Some(USERNAME_CONSTRAINT) => return UserStoreError::UsernameTaken,
            Some(EMAIL_CONSTRAINT) => return UserStoreError::EmailTaken,
            _ => {}
        }
    }
    UserStoreError::UnexpectedError(e.to_string())
}

const SELECT_USER: &str =
    "SELECT id, username, email, image_file, password_hash, role FROM users";

#[async_trait::async_trait]
impl UserStore for PostgresUserStore {
    #[tracing::instrument(name = "Adding user to PostgreSQL", skip_all)]
    async fn add_user(&self, user: NewUser) -> Result<User, UserStoreError> {
        let password_hash = compute_password_hash(user.password)
            .await
            .map_err(UserStoreError::UnexpectedError)?;

        let row = sqlx::query_as::<_, UserRow>(
            r#"
                INSERT INTO users (username, email, password_hash, role)
                VALUES ($1, $2, $3, $4)
                RETURNING id, username, email, image_file, password_hash, role
            "#,
        )
        .bind(user.username.as_str())
        .bind(user.email.as_str())
        .bind(password_hash.expose_secret())
        .bind(user.role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;

        row.try_into()
    }

    #[tracing::instrument(name = "Validating user credentials in PostgreSQL", skip_all)]
    async fn authenticate_user(
        &self,
        email: &Email,
        password: &Password,
    ) -> Result<User, UserStoreError> {
        let user = self.get_user_by_email(email).await?;

        verify_password_hash(user.password_hash.clone(), password.clone())
            .await
            .map_err(|_| UserStoreError::IncorrectPassword)?;

        Ok(user)
    }

    #[tracing::instrument(name = "Retrieving user from PostgreSQL", skip(self))]
    async fn get_user(&self, id: UserId) -> Result<User, UserStoreError> {
        let row = sqlx::query_as::<_, UserRow>(&format!("{SELECT_USER} WHERE id = $1"))
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| UserStoreError::UnexpectedError(e.to_string()))?;

        row.ok_or(UserStoreError::UserNotFound)?.try_into()
    }

    #[tracing::instrument(name = "Retrieving user by email from PostgreSQL", skip_all)]
    async fn get_user_by_email(&self, email: &Email) -> Result<User, UserStoreError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "{SELECT_USER} WHERE lower(email) = lower($1)"
        ))
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserStoreError::UnexpectedError(e.to_string()))?;

        row.ok_or(UserStoreError::UserNotFound)?.try_into()
    }

    #[tracing::instrument(name = "Retrieving user by username from PostgreSQL", skip(self))]
    async fn get_user_by_username(&self, username: &Username) -> Result<User, UserStoreError> {
        let row = sqlx::query_as::<_, UserRow>(&format!("{SELECT_USER} WHERE username = $1"))
            .bind(username.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| UserStoreError::UnexpectedError(e.to_string()))?;

        row.ok_or(UserStoreError::UserNotFound)?.try_into()
    }

    #[tracing::instrument(name = "Updating user profile in PostgreSQL", skip(self, update))]
    async fn update_profile(
        &self,
        id: UserId,
        update: ProfileUpdate,
    ) -> Result<User, UserStoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
                UPDATE users
                SET username = $1, email = $2, image_file = COALESCE($3, image_file)
                WHERE id = $4
                RETURNING id, username, email, image_file, password_hash, role
            "#,
        )
        .bind(update.username.as_str())
        .bind(update.email.as_str())
        .bind(update.image_file)
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?;

        row.ok_or(UserStoreError::UserNotFound)?.try_into()
    }

    #[tracing::instrument(name = "Set new password", skip_all)]
    async fn set_new_password(
        &self,
        id: UserId,
        new_password: Password,
    ) -> Result<(), UserStoreError> {
        let password_hash = compute_password_hash(new_password)
            .await
            .map_err(UserStoreError::UnexpectedError)?;

        let result = sqlx::query("UPDATE users SET password_hash = $1 WHERE id = $2")
            .bind(password_hash.expose_secret())
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| UserStoreError::UnexpectedError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(UserStoreError::UserNotFound);
        }

        Ok(())
    }

    #[tracing::instrument(name = "Set user role", skip(self))]
    async fn set_role(&self, id: UserId, role: Role) -> Result<(), UserStoreError> {
        let result = sqlx::query("UPDATE users SET role = $1 WHERE id = $2")
            .bind(role.as_str())
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(|e| UserStoreError::UnexpectedError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(UserStoreError::UserNotFound);
        }

        Ok(())
    }
}
