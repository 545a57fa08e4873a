pub mod reset_token;
pub mod session;

pub use reset_token::JwtResetTokenService;
pub use session::{
    SessionClaims, SessionConfig, SessionError, create_removal_cookie, create_session_cookie,
    extract_token, generate_session_cookie, generate_session_token, validate_session_token,
};
