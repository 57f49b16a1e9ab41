use crate::application_port::ForumError;
use crate::domain_model::*;

#[async_trait::async_trait]
pub trait PostService: Send + Sync {
    async fn list_posts(&self) -> Result<Vec<Post>, ForumError>;

    async fn get_post(&self, post_id: PostId) -> Result<Post, ForumError>;

    async fn recent_posts(&self) -> Result<Vec<Post>, ForumError>;

    async fn top_commented_posts(&self) -> Result<Vec<Post>, ForumError>;

    async fn create_post(&self, new_post: NewPost, author: &User) -> Result<Post, ForumError>;

    async fn update_post(
        &self,
        post_id: PostId,
        changes: PostChanges,
        acting_user: &User,
    ) -> Result<Post, ForumError>;

    async fn delete_post(&self, post_id: PostId, acting_user: &User) -> Result<(), ForumError>;

    async fn like_post(&self, post_id: PostId, acting_user: &User) -> Result<Post, ForumError>;
}
