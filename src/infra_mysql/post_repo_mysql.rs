use super::util::{column, is_dup_key};
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use sqlx::mysql::MySqlRow;
use sqlx::{MySql, MySqlPool, QueryBuilder};

const POST_COLUMNS: &str = r#"
SELECT p.post_id, p.title, p.content, p.author_id, p.created_at,
       (SELECT COUNT(*) FROM post_like l WHERE l.post_id = p.post_id) AS like_count,
       (SELECT COUNT(*) FROM comment c WHERE c.post_id = p.post_id) AS comment_count
FROM post p
"#;

pub struct MySqlPostRepo {
    pool: MySqlPool,
}

impl MySqlPostRepo {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_post(row: MySqlRow) -> Result<Post, ForumError> {
        Ok(Post {
            post_id: column(&row, "post_id")?,
            title: column(&row, "title")?,
            content: column(&row, "content")?,
            author: column(&row, "author_id")?,
            created_at: column(&row, "created_at")?,
            like_count: column(&row, "like_count")?,
            comment_count: column(&row, "comment_count")?,
        })
    }
}

#[async_trait::async_trait]
impl PostRepo for MySqlPostRepo {
    async fn get(&self, post_id: PostId) -> Result<Option<Post>, ForumError> {
        let row_opt = sqlx::query(&format!("{POST_COLUMNS} WHERE p.post_id = ?"))
            .bind(post_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| ForumError::store(format!("query post: {e}")))?;

        row_opt.map(Self::row_to_post).transpose()
    }

    async fn get_by_title(&self, title: &str) -> Result<Option<Post>, ForumError> {
        let row_opt = sqlx::query(&format!("{POST_COLUMNS} WHERE p.title = ?"))
            .bind(title)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| ForumError::store(format!("query post by title: {e}")))?;

        row_opt.map(Self::row_to_post).transpose()
    }

    async fn list(&self, order: PostOrder, limit: Option<u32>) -> Result<Vec<Post>, ForumError> {
        let mut query = QueryBuilder::<MySql>::new(POST_COLUMNS);
        match order {
            PostOrder::Newest => query.push(" ORDER BY p.created_at DESC, p.post_id DESC"),
            PostOrder::MostCommented => query.push(" ORDER BY comment_count DESC, p.post_id ASC"),
        };
        if let Some(limit) = limit {
            query.push(" LIMIT ").push_bind(limit as i64);
        }

        let rows = query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| ForumError::store(format!("list posts: {e}")))?;

        rows.into_iter().map(Self::row_to_post).collect()
    }

    async fn insert(&self, post: NewPost, author: UserId) -> Result<Post, ForumError> {
        let res = sqlx::query("INSERT INTO post (title, content, author_id) VALUES (?, ?, ?)")
            .bind(&post.title)
            .bind(&post.content)
            .bind(author)
            .execute(&self.pool)
            .await;

        let post_id = match res {
            Ok(done) => PostId(done.last_insert_id() as i64),
            Err(e) if is_dup_key(&e) => {
                return Err(ForumError::duplicate("Post", "title", &post.title));
            }
            Err(e) => return Err(ForumError::store(format!("insert post: {e}"))),
        };

        PostRepo::get(self, post_id)
            .await?
            .ok_or_else(|| ForumError::store(format!("post {post_id} vanished after insert")))
    }

    async fn replace(&self, post: &Post) -> Result<Post, ForumError> {
        let res = sqlx::query("UPDATE post SET title = ?, content = ? WHERE post_id = ?")
            .bind(&post.title)
            .bind(&post.content)
            .bind(post.post_id)
            .execute(&self.pool)
            .await;

        match res {
            Ok(_) => {}
            Err(e) if is_dup_key(&e) => {
                return Err(ForumError::duplicate("Post", "title", &post.title));
            }
            Err(e) => return Err(ForumError::store(format!("update post: {e}"))),
        }

        PostRepo::get(self, post.post_id)
            .await?
            .ok_or_else(|| ForumError::not_found("Post", "id", post.post_id))
    }

    async fn remove(&self, post_id: PostId) -> Result<(), ForumError> {
        let done = sqlx::query("DELETE FROM post WHERE post_id = ?")
            .bind(post_id)
            .execute(&self.pool)
            .await
            .map_err(|e| ForumError::store(format!("delete post: {e}")))?;

        if done.rows_affected() == 0 {
            return Err(ForumError::not_found("Post", "id", post_id));
        }

        Ok(())
    }

    async fn add_like(&self, post_id: PostId, user_id: UserId) -> Result<LikeClaim, ForumError> {
        let res = sqlx::query("INSERT INTO post_like (post_id, user_id) VALUES (?, ?)")
            .bind(post_id)
            .bind(user_id)
            .execute(&self.pool)
            .await;

        match res {
            Ok(_) => Ok(LikeClaim::Won),
            Err(e) if is_dup_key(&e) => Ok(LikeClaim::Existing),
            Err(e) => Err(ForumError::store(format!("insert like: {e}"))),
        }
    }
}
