pub mod email;
pub mod pagination;
pub mod password;
pub mod pattern;
pub mod post;
pub mod title;
pub mod user;
pub mod username;
