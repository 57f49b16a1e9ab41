use crate::domain_model::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(
    Debug, Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(transparent)]
pub struct PostId(pub i64);

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PostId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>().map(PostId)
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Post {
    pub post_id: PostId,
    pub title: String,
    pub content: String,
    pub author: UserId,
    pub created_at: DateTime<Utc>,
    pub like_count: i64, // derived on read
    pub comment_count: i64, // derived on read
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    pub title: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum PostOrder {
    Newest,
    MostCommented,
}

/// Page size used by the "recent" and "top commented" listings.
pub const FEATURED_POST_LIMIT: u32 = 10;
