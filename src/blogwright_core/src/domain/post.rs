use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{title::Title, user::UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(pub i64);

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub id: PostId,
    pub title: Title,
    pub content: String,
    pub date_posted: DateTime<Utc>,
    pub author_id: UserId,
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: Title,
    pub content: String,
    pub author_id: UserId,
}

#[derive(Debug, Clone)]
pub struct PostUpdate {
    pub title: Title,
    pub content: String,
}
