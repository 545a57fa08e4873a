pub mod login;
pub mod logout;
pub mod patterns;
pub mod posts;
pub mod register;
pub mod request_password_reset;
pub mod reset_password;
pub mod update_account;

// Re-export for convenience
pub use login::{LoginError, LoginUseCase};
pub use logout::{LogoutError, LogoutUseCase};
pub use patterns::{
    BrowsePatternsUseCase, ManagePatternsUseCase, ManageSectionsUseCase, PatternError,
    PatternWithSections,
};
pub use posts::{
    AuthoredPost, CreatePostUseCase, DeletePostUseCase, EditPostUseCase, ListPostsUseCase,
    PostError, ShowPostUseCase,
};
pub use register::{RegisterError, RegisterUseCase};
pub use request_password_reset::{
    RESET_EMAIL_SUBJECT, RequestPasswordResetError, RequestPasswordResetUseCase, reset_link,
};
pub use reset_password::{ResetPasswordError, ResetPasswordUseCase};
pub use update_account::{UpdateAccountError, UpdateAccountUseCase, UploadedPicture};
