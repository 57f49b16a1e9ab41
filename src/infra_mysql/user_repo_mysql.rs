use super::util::{column, is_dup_key, like_pattern};
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use sqlx::mysql::MySqlRow;
use sqlx::{MySql, MySqlPool, QueryBuilder};

const USER_COLUMNS: &str = r#"
SELECT user_id, username, first_name, last_name, email, password_hash,
       is_admin, is_moderator, is_blocked
FROM user
"#;

pub struct MySqlUserRepo {
    pool: MySqlPool,
}

impl MySqlUserRepo {
    pub fn new(pool: MySqlPool) -> Self {
        MySqlUserRepo { pool }
    }

    fn row_to_user(row: MySqlRow) -> Result<User, ForumError> {
        Ok(User {
            user_id: column(&row, "user_id")?,
            username: column(&row, "username")?,
            first_name: column(&row, "first_name")?,
            last_name: column(&row, "last_name")?,
            email: column(&row, "email")?,
            password_hash: column(&row, "password_hash")?,
            capabilities: Capabilities {
                admin: column(&row, "is_admin")?,
                moderator: column(&row, "is_moderator")?,
            },
            blocked: column(&row, "is_blocked")?,
        })
    }

    async fn fetch_users(
        &self,
        mut query: QueryBuilder<'_, MySql>,
    ) -> Result<Vec<User>, ForumError> {
        query.push(" ORDER BY user_id");

        let rows = query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| ForumError::store(format!("query users: {e}")))?;

        rows.into_iter().map(Self::row_to_user).collect()
    }
}

#[async_trait::async_trait]
impl UserRepo for MySqlUserRepo {
    async fn get(&self, user_id: UserId) -> Result<Option<User>, ForumError> {
        let row_opt = sqlx::query(&format!("{USER_COLUMNS} WHERE user_id = ?"))
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| ForumError::store(format!("query user: {e}")))?;

        row_opt.map(Self::row_to_user).transpose()
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, ForumError> {
        let row_opt = sqlx::query(&format!("{USER_COLUMNS} WHERE username = ?"))
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| ForumError::store(format!("query user by username: {e}")))?;

        row_opt.map(Self::row_to_user).transpose()
    }

    async fn list(&self) -> Result<Vec<User>, ForumError> {
        self.fetch_users(QueryBuilder::new(USER_COLUMNS)).await
    }

    async fn search(&self, filter: &UserFilterOptions) -> Result<Vec<User>, ForumError> {
        let mut query = QueryBuilder::<MySql>::new(USER_COLUMNS);
        query.push(" WHERE 1 = 1");
        if let Some(username) = filter.username() {
            query.push(" AND username LIKE ").push_bind(like_pattern(username));
        }
        if let Some(email) = filter.email() {
            query.push(" AND email LIKE ").push_bind(like_pattern(email));
        }
        if let Some(first_name) = filter.first_name() {
            query.push(" AND first_name LIKE ").push_bind(like_pattern(first_name));
        }

        self.fetch_users(query).await
    }

    async fn insert(&self, user: NewUser) -> Result<User, ForumError> {
        let res = sqlx::query(
            r#"
INSERT INTO user (username, first_name, last_name, email, password_hash, is_admin, is_moderator)
VALUES (?, ?, ?, ?, ?, ?, ?)
"#,
        )
        .bind(&user.username)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.capabilities.admin)
        .bind(user.capabilities.moderator)
        .execute(&self.pool)
        .await;

        let user_id = match res {
            Ok(done) => UserId(done.last_insert_id() as i64),
            Err(e) if is_dup_key(&e) => {
                return Err(ForumError::duplicate("User", "username", &user.username));
            }
            Err(e) => return Err(ForumError::store(format!("insert user: {e}"))),
        };

        UserRepo::get(self, user_id)
            .await?
            .ok_or_else(|| ForumError::store(format!("user {user_id} vanished after insert")))
    }

    async fn update_profile(&self, user: &User) -> Result<User, ForumError> {
        let res = sqlx::query(
            r#"
UPDATE user
SET username = ?, first_name = ?, last_name = ?, email = ?, password_hash = ?
WHERE user_id = ?
"#,
        )
        .bind(&user.username)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.user_id)
        .execute(&self.pool)
        .await;

        match res {
            Ok(_) => {}
            Err(e) if is_dup_key(&e) => {
                return Err(ForumError::duplicate("User", "username", &user.username));
            }
            Err(e) => return Err(ForumError::store(format!("update user: {e}"))),
        }

        // MySQL reports zero affected rows for a no-op update, so re-read instead.
        UserRepo::get(self, user.user_id)
            .await?
            .ok_or_else(|| ForumError::not_found("User", "id", user.user_id))
    }

    async fn set_blocked(&self, user_id: UserId, blocked: bool) -> Result<(), ForumError> {
        sqlx::query("UPDATE user SET is_blocked = ? WHERE user_id = ?")
            .bind(blocked)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| ForumError::store(format!("update user block state: {e}")))?;

        Ok(())
    }

    async fn remove(&self, user_id: UserId) -> Result<(), ForumError> {
        // post, comment and post_like rows go with it through ON DELETE CASCADE
        let done = sqlx::query("DELETE FROM user WHERE user_id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| ForumError::store(format!("delete user: {e}")))?;

        if done.rows_affected() == 0 {
            return Err(ForumError::not_found("User", "id", user_id));
        }

        Ok(())
    }
}
