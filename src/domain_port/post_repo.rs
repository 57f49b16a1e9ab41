use crate::application_port::*;
use crate::domain_model::*;

pub enum LikeClaim {
    Won,
    Existing,
}

#[async_trait::async_trait]
pub trait PostRepo: Send + Sync {
    async fn get(&self, post_id: PostId) -> Result<Option<Post>, ForumError>;

    async fn get_by_title(&self, title: &str) -> Result<Option<Post>, ForumError>;

    async fn list(&self, order: PostOrder, limit: Option<u32>) -> Result<Vec<Post>, ForumError>;

    /// Fails with `ForumError::Duplicate` when the title is taken.
    async fn insert(&self, post: NewPost, author: UserId) -> Result<Post, ForumError>;

    /// Writes title and content back; author and timestamps are immutable.
    async fn replace(&self, post: &Post) -> Result<Post, ForumError>;

    /// Removes the post together with its comments and likes.
    async fn remove(&self, post_id: PostId) -> Result<(), ForumError>;

    async fn add_like(&self, post_id: PostId, user_id: UserId) -> Result<LikeClaim, ForumError>;
}
