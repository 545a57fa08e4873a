//! Axum front end of the blog: server-rendered pages, cookie sessions and
//! flash messages over the use cases in `blogwright_application`.
//!
//! ```text
//! request ─► load_session ─► [require_login] ─► handler ─► use case ─► ports
//!                 │                                │
//!                 └── Identity, FlashInbox ────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use blogwright_axum::{AppState, router};
//!
//! let app = router(state);
//! axum::serve(listener, app).await?;
//! ```

pub mod error;
pub mod flash;
pub mod forms;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod views;

// Re-export for convenience
pub use error::AppError;
pub use flash::{FlashCategory, FlashMessage};
pub use middleware::{AuthUser, CurrentUser, PageContext};
pub use routes::router;
pub use state::AppState;
