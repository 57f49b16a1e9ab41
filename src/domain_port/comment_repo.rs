use crate::application_port::*;
use crate::domain_model::*;

#[async_trait::async_trait]
pub trait CommentRepo: Send + Sync {
    async fn get(&self, comment_id: CommentId) -> Result<Option<Comment>, ForumError>;

    /// Comments of one post, oldest first.
    async fn list_for_post(&self, post_id: PostId) -> Result<Vec<Comment>, ForumError>;

    async fn insert(
        &self,
        post_id: PostId,
        author: UserId,
        content: &str,
    ) -> Result<Comment, ForumError>;

    async fn replace(&self, comment: &Comment) -> Result<Comment, ForumError>;

    async fn remove(&self, comment_id: CommentId) -> Result<(), ForumError>;
}
