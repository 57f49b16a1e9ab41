use crate::application_port::{ForumError, PostService};
use crate::domain_model::*;
use crate::domain_port::{LikeClaim, PostRepo};
use crate::logger::*;
use std::sync::Arc;

const BLOCKED_CANNOT_POST: &str = "Blocked users cannot create posts.";
const BLOCKED_CANNOT_LIKE: &str = "Blocked users cannot like posts.";
const ONLY_AUTHOR_CAN_UPDATE: &str = "Only the author can update the post.";
const ONLY_AUTHOR_OR_MODERATOR_CAN_DELETE: &str =
    "Only admin, moderator or the author can delete the post.";

pub struct RealPostService {
    post_repo: Arc<dyn PostRepo>,
}

impl RealPostService {
    pub fn new(post_repo: Arc<dyn PostRepo>) -> Self {
        RealPostService { post_repo }
    }

    async fn ensure_title_free(
        &self,
        title: &str,
        owner: Option<PostId>,
    ) -> Result<(), ForumError> {
        match self.post_repo.get_by_title(title).await? {
            Some(existing) if Some(existing.post_id) != owner => {
                Err(ForumError::duplicate("Post", "title", title))
            }
            _ => Ok(()),
        }
    }
}

#[async_trait::async_trait]
impl PostService for RealPostService {
    async fn list_posts(&self) -> Result<Vec<Post>, ForumError> {
        self.post_repo.list(PostOrder::Newest, None).await
    }

    async fn get_post(&self, post_id: PostId) -> Result<Post, ForumError> {
        self.post_repo
            .get(post_id)
            .await?
            .ok_or_else(|| ForumError::not_found("Post", "id", post_id))
    }

    async fn recent_posts(&self) -> Result<Vec<Post>, ForumError> {
        self.post_repo
            .list(PostOrder::Newest, Some(FEATURED_POST_LIMIT))
            .await
    }

    async fn top_commented_posts(&self) -> Result<Vec<Post>, ForumError> {
        self.post_repo
            .list(PostOrder::MostCommented, Some(FEATURED_POST_LIMIT))
            .await
    }

    async fn create_post(&self, new_post: NewPost, author: &User) -> Result<Post, ForumError> {
        if author.blocked {
            return Err(ForumError::authorization(BLOCKED_CANNOT_POST));
        }
        self.ensure_title_free(&new_post.title, None).await?;

        let post = self.post_repo.insert(new_post, author.user_id).await?;
        info!(post_id = %post.post_id, author = %author.user_id, "post created");
        Ok(post)
    }

    async fn update_post(
        &self,
        post_id: PostId,
        changes: PostChanges,
        acting_user: &User,
    ) -> Result<Post, ForumError> {
        let mut post = self.get_post(post_id).await?;
        if post.author != acting_user.user_id {
            return Err(ForumError::authorization(ONLY_AUTHOR_CAN_UPDATE));
        }

        if let Some(title) = changes.title {
            self.ensure_title_free(&title, Some(post_id)).await?;
            post.title = title;
        }
        if let Some(content) = changes.content {
            post.content = content;
        }

        let post = self.post_repo.replace(&post).await?;
        info!(%post_id, "post updated");
        Ok(post)
    }

    async fn delete_post(&self, post_id: PostId, acting_user: &User) -> Result<(), ForumError> {
        let post = self.get_post(post_id).await?;
        if !acting_user.may_act_on(post.author) {
            return Err(ForumError::authorization(ONLY_AUTHOR_OR_MODERATOR_CAN_DELETE));
        }

        self.post_repo.remove(post_id).await?;
        info!(%post_id, by = %acting_user.user_id, "post deleted");
        Ok(())
    }

    async fn like_post(&self, post_id: PostId, acting_user: &User) -> Result<Post, ForumError> {
        self.get_post(post_id).await?;
        if acting_user.blocked {
            return Err(ForumError::authorization(BLOCKED_CANNOT_LIKE));
        }

        match self.post_repo.add_like(post_id, acting_user.user_id).await? {
            LikeClaim::Won => {
                info!(%post_id, by = %acting_user.user_id, "post liked");
                self.get_post(post_id).await
            }
            LikeClaim::Existing => Err(ForumError::duplicate(
                "Like",
                "user",
                &acting_user.username,
            )),
        }
    }
}
