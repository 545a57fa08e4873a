use std::fmt;

use serde::{Deserialize, Serialize};

use super::title::Title;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatternId(pub i64);

impl fmt::Display for PatternId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionId(pub i64);

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An admin-curated pattern. Titles are unique.
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    pub id: PatternId,
    pub title: Title,
    pub content: Option<String>,
}

/// A section belonging to exactly one pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub id: SectionId,
    pub pattern_id: PatternId,
    pub title: Title,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct NewPattern {
    pub title: Title,
    pub content: Option<String>,
}

pub type PatternUpdate = NewPattern;

#[derive(Debug, Clone)]
pub struct NewSection {
    pub pattern_id: PatternId,
    pub title: Title,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct SectionUpdate {
    pub title: Title,
    pub content: String,
}
