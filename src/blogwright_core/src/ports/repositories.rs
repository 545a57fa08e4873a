use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::{
    email::Email,
    pagination::{Page, PageRequest},
    password::Password,
    pattern::{NewPattern, NewSection, Pattern, PatternId, PatternUpdate, Section, SectionId, SectionUpdate},
    post::{NewPost, Post, PostId, PostUpdate},
    user::{NewUser, ProfileUpdate, Role, User, UserId},
    username::Username,
};

// UserStore port trait and errors
#[derive(Debug, Error)]
pub enum UserStoreError {
    #[error("That username is taken. Please choose a different one.")]
    UsernameTaken,
    #[error("That email is taken. Please choose a different one.")]
    EmailTaken,
    #[error("User not found")]
    UserNotFound,
    #[error("Incorrect password")]
    IncorrectPassword,
    #[error("Unexpected error {0}")]
    UnexpectedError(String),
}

impl PartialEq for UserStoreError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::UsernameTaken, Self::UsernameTaken)
                | (Self::EmailTaken, Self::EmailTaken)
                | (Self::UserNotFound, Self::UserNotFound)
                | (Self::IncorrectPassword, Self::IncorrectPassword)
                | (Self::UnexpectedError(_), Self::UnexpectedError(_))
        )
    }
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn add_user(&self, user: NewUser) -> Result<User, UserStoreError>;
    async fn authenticate_user(
        &self,
        email: &Email,
        password: &Password,
    ) -> Result<User, UserStoreError>;
    async fn get_user(&self, id: UserId) -> Result<User, UserStoreError>;
    async fn get_user_by_email(&self, email: &Email) -> Result<User, UserStoreError>;
    async fn get_user_by_username(&self, username: &Username) -> Result<User, UserStoreError>;
    async fn update_profile(
        &self,
        id: UserId,
        update: ProfileUpdate,
    ) -> Result<User, UserStoreError>;
    async fn set_new_password(
        &self,
        id: UserId,
        new_password: Password,
    ) -> Result<(), UserStoreError>;
    async fn set_role(&self, id: UserId, role: Role) -> Result<(), UserStoreError>;
}

// PostStore port trait and errors
#[derive(Debug, Error)]
pub enum PostStoreError {
    #[error("Post not found")]
    PostNotFound,
    #[error("Unexpected error {0}")]
    UnexpectedError(String),
}

impl PartialEq for PostStoreError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::PostNotFound, Self::PostNotFound)
                | (Self::UnexpectedError(_), Self::UnexpectedError(_))
        )
    }
}

/// Listings are ordered newest first.
#[async_trait]
pub trait PostStore: Send + Sync {
    async fn add_post(&self, post: NewPost) -> Result<Post, PostStoreError>;
    async fn get_post(&self, id: PostId) -> Result<Post, PostStoreError>;
    async fn update_post(&self, id: PostId, update: PostUpdate) -> Result<Post, PostStoreError>;
    async fn delete_post(&self, id: PostId) -> Result<(), PostStoreError>;
    async fn list_posts(&self, request: PageRequest) -> Result<Page<Post>, PostStoreError>;
    async fn list_posts_by_author(
        &self,
        author_id: UserId,
        request: PageRequest,
    ) -> Result<Page<Post>, PostStoreError>;
}

// PatternStore port trait and errors
#[derive(Debug, Error)]
pub enum PatternStoreError {
    #[error("Pattern not found")]
    PatternNotFound,
    #[error("Section not found")]
    SectionNotFound,
    #[error("A pattern with that title already exists.")]
    TitleTaken,
    #[error("Unexpected error {0}")]
    UnexpectedError(String),
}

impl PartialEq for PatternStoreError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::PatternNotFound, Self::PatternNotFound)
                | (Self::SectionNotFound, Self::SectionNotFound)
                | (Self::TitleTaken, Self::TitleTaken)
                | (Self::UnexpectedError(_), Self::UnexpectedError(_))
        )
    }
}

/// Patterns and their sections. Deleting a pattern removes its sections.
#[async_trait]
pub trait PatternStore: Send + Sync {
    async fn add_pattern(&self, pattern: NewPattern) -> Result<Pattern, PatternStoreError>;
    async fn get_pattern(&self, id: PatternId) -> Result<Pattern, PatternStoreError>;
    async fn update_pattern(
        &self,
        id: PatternId,
        update: PatternUpdate,
    ) -> Result<Pattern, PatternStoreError>;
    async fn delete_pattern(&self, id: PatternId) -> Result<(), PatternStoreError>;
    /// All patterns ordered by title.
    async fn list_patterns(&self) -> Result<Vec<Pattern>, PatternStoreError>;

    async fn add_section(&self, section: NewSection) -> Result<Section, PatternStoreError>;
    async fn get_section(&self, id: SectionId) -> Result<Section, PatternStoreError>;
    async fn update_section(
        &self,
        id: SectionId,
        update: SectionUpdate,
    ) -> Result<Section, PatternStoreError>;
    async fn delete_section(&self, id: SectionId) -> Result<(), PatternStoreError>;
    /// Sections of a pattern in creation order.
    async fn list_sections(&self, pattern_id: PatternId) -> Result<Vec<Section>, PatternStoreError>;
}

// RevokedTokenStore port trait and errors
#[derive(Debug, Error)]
pub enum RevokedTokenStoreError {
    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// Records session tokens ended by logout and reset tokens that were already used.
#[async_trait]
pub trait RevokedTokenStore: Send + Sync {
    /// Atomically claim `token` until `expires_at`. Returns `false` when the
    /// token was already revoked, so exactly one caller wins a concurrent claim.
    async fn revoke_token(
        &self,
        token: String,
        expires_at: DateTime<Utc>,
    ) -> Result<bool, RevokedTokenStoreError>;
    async fn is_revoked(&self, token: &str) -> Result<bool, RevokedTokenStoreError>;
}
