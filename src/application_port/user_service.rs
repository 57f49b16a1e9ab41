use crate::application_port::ForumError;
use crate::domain_model::*;

#[async_trait::async_trait]
pub trait UserService: Send + Sync {
    /// Every user. Callers gate this to admins.
    async fn list_users(&self) -> Result<Vec<User>, ForumError>;

    async fn get_by_id(&self, user_id: UserId) -> Result<User, ForumError>;

    async fn get_by_username(&self, username: &str) -> Result<User, ForumError>;

    async fn search_users(&self, options: &UserFilterOptions) -> Result<Vec<User>, ForumError>;

    async fn create(&self, user: NewUser) -> Result<User, ForumError>;

    /// Only `current_user` may update their own record.
    async fn update(&self, user_to_update: User, current_user: &User) -> Result<User, ForumError>;

    async fn delete(&self, user_id: UserId, acting_user: &User) -> Result<(), ForumError>;

    async fn block_user(&self, user_id: UserId, acting_user: &User) -> Result<(), ForumError>;

    async fn unblock_user(&self, user_id: UserId, acting_user: &User) -> Result<(), ForumError>;
}
