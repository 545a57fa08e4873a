pub mod clock;
pub mod domain;
pub mod guard;
pub mod ports;
pub mod reset_token;

// Re-export commonly used types for convenience
pub use domain::{
    email::{Email, EmailError},
    pagination::{Page, PageLink, PageRequest},
    password::{Password, PasswordError},
    pattern::{NewPattern, NewSection, Pattern, PatternId, PatternUpdate, Section, SectionId, SectionUpdate},
    post::{NewPost, Post, PostId, PostUpdate},
    title::{Title, TitleError},
    user::{Identity, NewUser, ProfileUpdate, Role, RoleError, User, UserId},
    username::{Username, UsernameError},
};

pub use ports::{
    repositories::{
        PatternStore, PatternStoreError, PostStore, PostStoreError, RevokedTokenStore,
        RevokedTokenStoreError, UserStore, UserStoreError,
    },
    services::{EmailClient, PictureStore, PictureStoreError},
};

pub use clock::{Clock, ManualClock, SystemClock};
pub use guard::{Guarded, Ownership, ResourceKind, can_create, can_modify};
pub use reset_token::{
    DEFAULT_RESET_TOKEN_TTL_SECONDS, IssuedResetToken, ResetTokenError, ResetTokenService,
    VerifiedResetToken,
};
