use crate::application_port::{ForumError, UserService};
use crate::domain_model::*;
use crate::domain_port::UserRepo;
use crate::logger::*;
use std::sync::Arc;

const ONLY_SELF_CAN_UPDATE: &str = "Only the user themselves can update the user.";
const ONLY_ADMIN_OR_SELF_CAN_DELETE: &str =
    "Only admin or the user themselves can delete the user.";
const ONLY_MODERATORS_CAN_BLOCK: &str = "Only admins or moderators can block or unblock users.";

pub struct RealUserService {
    user_repo: Arc<dyn UserRepo>,
}

impl RealUserService {
    pub fn new(user_repo: Arc<dyn UserRepo>) -> RealUserService {
        RealUserService { user_repo }
    }

    async fn set_blocked(
        &self,
        user_id: UserId,
        acting_user: &User,
        blocked: bool,
    ) -> Result<(), ForumError> {
        if !acting_user.capabilities.can_moderate() {
            return Err(ForumError::authorization(ONLY_MODERATORS_CAN_BLOCK));
        }

        let target = self.get_by_id(user_id).await?;
        self.user_repo.set_blocked(target.user_id, blocked).await?;

        info!(%user_id, blocked, by = %acting_user.user_id, "user block state changed");
        Ok(())
    }
}

#[async_trait::async_trait]
impl UserService for RealUserService {
    async fn list_users(&self) -> Result<Vec<User>, ForumError> {
        self.user_repo.list().await
    }

    async fn get_by_id(&self, user_id: UserId) -> Result<User, ForumError> {
        self.user_repo
            .get(user_id)
            .await?
            .ok_or_else(|| ForumError::not_found("User", "id", user_id))
    }

    async fn get_by_username(&self, username: &str) -> Result<User, ForumError> {
        self.user_repo
            .get_by_username(username)
            .await?
            .ok_or_else(|| ForumError::not_found("User", "username", username))
    }

    async fn search_users(&self, options: &UserFilterOptions) -> Result<Vec<User>, ForumError> {
        if options.is_unconstrained() {
            return self.user_repo.list().await;
        }
        self.user_repo.search(options).await
    }

    async fn create(&self, user: NewUser) -> Result<User, ForumError> {
        // Fast fail only; the store's unique index decides concurrent creates.
        if self.user_repo.get_by_username(&user.username).await?.is_some() {
            return Err(ForumError::duplicate("User", "username", &user.username));
        }

        let created = self.user_repo.insert(user).await?;
        info!(user_id = %created.user_id, username = %created.username, "user created");
        Ok(created)
    }

    async fn update(&self, user_to_update: User, current_user: &User) -> Result<User, ForumError> {
        if current_user.user_id != user_to_update.user_id {
            return Err(ForumError::authorization(ONLY_SELF_CAN_UPDATE));
        }

        if let Some(existing) = self
            .user_repo
            .get_by_username(&user_to_update.username)
            .await?
        {
            if existing.user_id != current_user.user_id {
                return Err(ForumError::duplicate(
                    "User",
                    "username",
                    &user_to_update.username,
                ));
            }
        }

        // role flags and block state only change through their own operations
        let updated = self.user_repo.update_profile(&user_to_update).await?;
        info!(user_id = %updated.user_id, "user updated");
        Ok(updated)
    }

    async fn delete(&self, user_id: UserId, acting_user: &User) -> Result<(), ForumError> {
        let target = self.get_by_id(user_id).await?;
        if !acting_user.may_act_on(target.user_id) {
            return Err(ForumError::authorization(ONLY_ADMIN_OR_SELF_CAN_DELETE));
        }

        self.user_repo.remove(target.user_id).await?;
        info!(%user_id, by = %acting_user.user_id, "user deleted");
        Ok(())
    }

    async fn block_user(&self, user_id: UserId, acting_user: &User) -> Result<(), ForumError> {
        self.set_blocked(user_id, acting_user, true).await
    }

    async fn unblock_user(&self, user_id: UserId, acting_user: &User) -> Result<(), ForumError> {
        self.set_blocked(user_id, acting_user, false).await
    }
}
