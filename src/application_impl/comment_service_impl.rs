use crate::application_port::{CommentService, ForumError};
use crate::domain_model::*;
use crate::domain_port::{CommentRepo, PostRepo};
use crate::logger::*;
use std::sync::Arc;

const BLOCKED_CANNOT_COMMENT: &str = "Blocked users cannot comment.";
const ONLY_AUTHOR_CAN_UPDATE: &str = "Only the author can update the comment.";
const ONLY_AUTHOR_OR_MODERATOR_CAN_DELETE: &str =
    "Only admin, moderator or the author can delete the comment.";

pub struct RealCommentService {
    comment_repo: Arc<dyn CommentRepo>,
    post_repo: Arc<dyn PostRepo>,
}

impl RealCommentService {
    pub fn new(comment_repo: Arc<dyn CommentRepo>, post_repo: Arc<dyn PostRepo>) -> Self {
        RealCommentService {
            comment_repo,
            post_repo,
        }
    }

    async fn ensure_post_exists(&self, post_id: PostId) -> Result<(), ForumError> {
        match self.post_repo.get(post_id).await? {
            Some(_) => Ok(()),
            None => Err(ForumError::not_found("Post", "id", post_id)),
        }
    }
}

#[async_trait::async_trait]
impl CommentService for RealCommentService {
    async fn comments_for_post(&self, post_id: PostId) -> Result<Vec<Comment>, ForumError> {
        self.ensure_post_exists(post_id).await?;
        self.comment_repo.list_for_post(post_id).await
    }

    async fn get_comment(&self, comment_id: CommentId) -> Result<Comment, ForumError> {
        self.comment_repo
            .get(comment_id)
            .await?
            .ok_or_else(|| ForumError::not_found("Comment", "id", comment_id))
    }

    async fn create_comment(
        &self,
        post_id: PostId,
        content: String,
        author: &User,
    ) -> Result<Comment, ForumError> {
        if author.blocked {
            return Err(ForumError::authorization(BLOCKED_CANNOT_COMMENT));
        }
        self.ensure_post_exists(post_id).await?;

        let comment = self
            .comment_repo
            .insert(post_id, author.user_id, &content)
            .await?;
        info!(comment_id = %comment.comment_id, %post_id, "comment created");
        Ok(comment)
    }

    async fn update_comment(
        &self,
        comment_id: CommentId,
        content: String,
        acting_user: &User,
    ) -> Result<Comment, ForumError> {
        let mut comment = self.get_comment(comment_id).await?;
        if comment.author != acting_user.user_id {
            return Err(ForumError::authorization(ONLY_AUTHOR_CAN_UPDATE));
        }

        comment.content = content;
        let comment = self.comment_repo.replace(&comment).await?;
        info!(%comment_id, "comment updated");
        Ok(comment)
    }

    async fn delete_comment(
        &self,
        comment_id: CommentId,
        acting_user: &User,
    ) -> Result<(), ForumError> {
        let comment = self.get_comment(comment_id).await?;
        if !acting_user.may_act_on(comment.author) {
            return Err(ForumError::authorization(ONLY_AUTHOR_OR_MODERATOR_CAN_DELETE));
        }

        self.comment_repo.remove(comment_id).await?;
        info!(%comment_id, by = %acting_user.user_id, "comment deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain_port::UserRepo;
    use crate::infra_memory::MemoryStore;

    struct Fixture {
        store: Arc<MemoryStore>,
        service: RealCommentService,
        post_id: PostId,
        author: User,
    }

    impl Fixture {
        async fn new() -> Self {
            let store = Arc::new(MemoryStore::new());
            let service = RealCommentService::new(store.clone(), store.clone());
            let mut fx = Fixture {
                store,
                service,
                post_id: PostId(0),
                author: dummy_user(),
            };
            fx.author = fx.user("author", Capabilities::NONE).await;
            let post = PostRepo::insert(
                fx.store.as_ref(),
                NewPost {
                    title: "discussion".to_string(),
                    content: "what do you think".to_string(),
                },
                fx.author.user_id,
            )
            .await
            .unwrap();
            fx.post_id = post.post_id;
            fx
        }

        async fn user(&self, username: &str, capabilities: Capabilities) -> User {
            UserRepo::insert(
                self.store.as_ref(),
                NewUser {
                    username: username.to_string(),
                    first_name: "First".to_string(),
                    last_name: "Last".to_string(),
                    email: format!("{username}@forum.test"),
                    password_hash: "hash".to_string(),
                    capabilities,
                },
            )
            .await
            .unwrap()
        }
    }

    fn dummy_user() -> User {
        User {
            user_id: UserId(0),
            username: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            password_hash: String::new(),
            capabilities: Capabilities::NONE,
            blocked: false,
        }
    }

    #[tokio::test]
    async fn comments_are_listed_oldest_first() {
        let fx = Fixture::new().await;
        let bob = fx.user("bob", Capabilities::NONE).await;
        fx.service
            .create_comment(fx.post_id, "first".to_string(), &bob)
            .await
            .unwrap();
        fx.service
            .create_comment(fx.post_id, "second".to_string(), &fx.author)
            .await
            .unwrap();

        let comments = fx.service.comments_for_post(fx.post_id).await.unwrap();
        let contents: Vec<&str> = comments.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn commenting_on_missing_post_is_not_found() {
        let fx = Fixture::new().await;
        let err = fx
            .service
            .create_comment(PostId(42), "hi".to_string(), &fx.author)
            .await
            .unwrap_err();
        assert_eq!(err, ForumError::not_found("Post", "id", 42));
        assert_eq!(
            fx.service.comments_for_post(PostId(42)).await.unwrap_err(),
            ForumError::not_found("Post", "id", 42)
        );
    }

    #[tokio::test]
    async fn blocked_user_cannot_comment() {
        let fx = Fixture::new().await;
        let mut bob = fx.user("bob", Capabilities::NONE).await;
        bob.blocked = true;

        let err = fx
            .service
            .create_comment(fx.post_id, "hi".to_string(), &bob)
            .await
            .unwrap_err();
        assert_eq!(err, ForumError::authorization(BLOCKED_CANNOT_COMMENT));
    }

    #[tokio::test]
    async fn only_author_updates_comment() {
        let fx = Fixture::new().await;
        let bob = fx.user("bob", Capabilities::NONE).await;
        let comment = fx
            .service
            .create_comment(fx.post_id, "draft".to_string(), &bob)
            .await
            .unwrap();

        let err = fx
            .service
            .update_comment(comment.comment_id, "hijacked".to_string(), &fx.author)
            .await
            .unwrap_err();
        assert_eq!(err, ForumError::authorization(ONLY_AUTHOR_CAN_UPDATE));

        let updated = fx
            .service
            .update_comment(comment.comment_id, "final".to_string(), &bob)
            .await
            .unwrap();
        assert_eq!(updated.content, "final");
    }

    #[tokio::test]
    async fn admin_deletes_foreign_comment() {
        let fx = Fixture::new().await;
        let bob = fx.user("bob", Capabilities::NONE).await;
        let admin = fx.user("admin", Capabilities::ADMIN).await;
        let comment = fx
            .service
            .create_comment(fx.post_id, "spam".to_string(), &bob)
            .await
            .unwrap();

        let err = fx
            .service
            .delete_comment(comment.comment_id, &fx.author)
            .await
            .unwrap_err();
        assert!(matches!(err, ForumError::Authorization(_)));

        fx.service
            .delete_comment(comment.comment_id, &admin)
            .await
            .unwrap();
        assert_eq!(
            fx.service.get_comment(comment.comment_id).await.unwrap_err(),
            ForumError::not_found("Comment", "id", comment.comment_id)
        );
    }
}
