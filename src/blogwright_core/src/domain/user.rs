use std::fmt;
use std::str::FromStr;

use secrecy::Secret;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{email::Email, password::Password, username::Username};

pub const DEFAULT_IMAGE_FILE: &str = "default.jpg";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Role of an account. Stored as `user` / `admin`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

#[derive(Debug, Error, PartialEq)]
#[error("Unknown role: {0}")]
pub struct RoleError(String);

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(RoleError(other.to_owned())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted account.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub username: Username,
    pub email: Email,
    pub image_file: String,
    pub password_hash: Secret<String>,
    pub role: Role,
}

impl User {
    pub fn identity(&self) -> Identity {
        Identity {
            id: self.id,
            username: self.username.clone(),
            role: self.role,
        }
    }
}

/// The authenticated principal making a request.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub id: UserId,
    pub username: Username,
    pub role: Role,
}

impl From<&User> for Identity {
    fn from(user: &User) -> Self {
        user.identity()
    }
}

/// Registration data handed to a `UserStore`, which is responsible for hashing the password.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: Username,
    pub email: Email,
    pub password: Password,
    pub role: Role,
}

#[derive(Debug, Clone)]
pub struct ProfileUpdate {
    pub username: Username,
    pub email: Email,
    pub image_file: Option<String>,
}
