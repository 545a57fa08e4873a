mod helpers;
mod patterns;
mod posts;
mod reset_password;
mod users;
