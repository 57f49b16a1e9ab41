use crate::application_port::*;
use crate::domain_model::*;

/// Persistent collection of users. Business rules live in `UserService`;
/// the store only backs the username uniqueness constraint.
#[async_trait::async_trait]
pub trait UserRepo: Send + Sync {
    async fn get(&self, user_id: UserId) -> Result<Option<User>, ForumError>;

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, ForumError>;

    /// All users ordered by id.
    async fn list(&self) -> Result<Vec<User>, ForumError>;

    async fn search(&self, filter: &UserFilterOptions) -> Result<Vec<User>, ForumError>;

    /// Fails with `ForumError::Duplicate` when the username is taken.
    async fn insert(&self, user: NewUser) -> Result<User, ForumError>;

    /// Writes username, names, email and password hash. Role flags and the
    /// blocked flag of the stored record are left untouched.
    async fn update_profile(&self, user: &User) -> Result<User, ForumError>;

    async fn set_blocked(&self, user_id: UserId, blocked: bool) -> Result<(), ForumError>;

    /// Removes the user together with their posts, comments and likes.
    async fn remove(&self, user_id: UserId) -> Result<(), ForumError>;
}
