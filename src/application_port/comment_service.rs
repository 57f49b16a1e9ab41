use crate::application_port::ForumError;
use crate::domain_model::*;

#[async_trait::async_trait]
pub trait CommentService: Send + Sync {
    async fn comments_for_post(&self, post_id: PostId) -> Result<Vec<Comment>, ForumError>;

    async fn get_comment(&self, comment_id: CommentId) -> Result<Comment, ForumError>;

    async fn create_comment(
        &self,
        post_id: PostId,
        content: String,
        author: &User,
    ) -> Result<Comment, ForumError>;

    async fn update_comment(
        &self,
        comment_id: CommentId,
        content: String,
        acting_user: &User,
    ) -> Result<Comment, ForumError>;

    async fn delete_comment(
        &self,
        comment_id: CommentId,
        acting_user: &User,
    ) -> Result<(), ForumError>;
}
