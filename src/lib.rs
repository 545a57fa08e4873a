//! # Blogwright
//!
//! Facade crate re-exporting the public APIs of the blog's components.
//!
//! ## Structure
//!
//! - **Core domain types**: `User`, `Post`, `Pattern`, `Section`, `Page`, etc.
//! - **Repository traits**: `UserStore`, `PostStore`, `PatternStore`, `RevokedTokenStore`
//! - **Use cases**: `RegisterUseCase`, `LoginUseCase`, `ListPostsUseCase`, etc.
//! - **Adapters**: `PostgresPostStore`, `RedisRevokedTokenStore`, `PostmarkEmailClient`, etc.
//! - **Service**: `BlogService` - serves the whole site

// ============================================================================
// Core Domain Types
// ============================================================================

/// Core domain types and value objects
pub mod core {
    pub use blogwright_core::*;
}

pub use blogwright_core::{
    Email, Identity, Page, PageRequest, Password, Pattern, PatternId, Post, PostId, Role,
    Section, SectionId, Title, User, UserId, Username,
};

// ============================================================================
// Ports
// ============================================================================

/// Repository trait definitions
pub mod repositories {
    pub use blogwright_core::{
        PatternStore, PatternStoreError, PostStore, PostStoreError, RevokedTokenStore,
        RevokedTokenStoreError, UserStore, UserStoreError,
    };
}

pub use blogwright_core::{
    Clock, EmailClient, PatternStore, PictureStore, PostStore, ResetTokenService,
    RevokedTokenStore, UserStore,
};

// ============================================================================
// Use Cases (Application Layer)
// ============================================================================

/// Application use cases
pub mod use_cases {
    pub use blogwright_application::*;
}

pub use blogwright_application::{
    CreatePostUseCase, DeletePostUseCase, EditPostUseCase, ListPostsUseCase, LoginUseCase,
    LogoutUseCase, ManagePatternsUseCase, ManageSectionsUseCase, RegisterUseCase,
    RequestPasswordResetUseCase, ResetPasswordUseCase, ShowPostUseCase, UpdateAccountUseCase,
};

// ============================================================================
// Adapters (Infrastructure)
// ============================================================================

/// Infrastructure adapters
pub mod adapters {
    /// Session cookies and reset tokens
    pub mod auth {
        pub use blogwright_adapters::auth::*;
    }

    /// Configuration
    pub mod config {
        pub use blogwright_adapters::config::*;
    }

    /// Email client implementations
    pub mod email {
        pub use blogwright_adapters::email::*;
    }

    /// Persistence implementations
    pub mod persistence {
        pub use blogwright_adapters::persistence::*;
    }

    /// Profile picture storage
    pub mod pictures {
        pub use blogwright_adapters::pictures::*;
    }
}

pub use blogwright_adapters::{
    email::{MockEmailClient, PostmarkEmailClient},
    persistence::{
        HashMapPatternStore, HashMapPostStore, HashMapUserStore, HashSetRevokedTokenStore,
        PostgresPatternStore, PostgresPostStore, PostgresUserStore, RedisRevokedTokenStore,
    },
};

// ============================================================================
// Web Layer
// ============================================================================

/// Axum routes, extractors and views
pub mod web {
    pub use blogwright_axum::*;
}

// ============================================================================
// Blog Service (Main Entry Point)
// ============================================================================

pub use blogwright_service::{BlogService, Ports, build_state};

// ============================================================================
// Re-export common external dependencies
// ============================================================================

/// Re-export async-trait for implementing repository traits
pub use async_trait::async_trait;

/// Re-export secrecy for working with secrets
pub use secrecy::{ExposeSecret, Secret};
