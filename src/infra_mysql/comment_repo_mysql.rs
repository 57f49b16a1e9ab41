use super::util::column;
use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use sqlx::MySqlPool;
use sqlx::mysql::MySqlRow;

pub struct MySqlCommentRepo {
    pool: MySqlPool,
}

impl MySqlCommentRepo {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn row_to_comment(row: MySqlRow) -> Result<Comment, ForumError> {
        Ok(Comment {
            comment_id: column(&row, "comment_id")?,
            post_id: column(&row, "post_id")?,
            author: column(&row, "author_id")?,
            content: column(&row, "content")?,
            created_at: column(&row, "created_at")?,
        })
    }
}

#[async_trait::async_trait]
impl CommentRepo for MySqlCommentRepo {
    async fn get(&self, comment_id: CommentId) -> Result<Option<Comment>, ForumError> {
        let row_opt = sqlx::query(
            r#"
SELECT comment_id, post_id, author_id, content, created_at
FROM comment
WHERE comment_id = ?
"#,
        )
        .bind(comment_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| ForumError::store(format!("query comment: {e}")))?;

        row_opt.map(Self::row_to_comment).transpose()
    }

    async fn list_for_post(&self, post_id: PostId) -> Result<Vec<Comment>, ForumError> {
        let rows = sqlx::query(
            r#"
SELECT comment_id, post_id, author_id, content, created_at
FROM comment
WHERE post_id = ?
ORDER BY created_at ASC, comment_id ASC
"#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ForumError::store(format!("list comments: {e}")))?;

        rows.into_iter().map(Self::row_to_comment).collect()
    }

    async fn insert(
        &self,
        post_id: PostId,
        author: UserId,
        content: &str,
    ) -> Result<Comment, ForumError> {
        let done = sqlx::query("INSERT INTO comment (post_id, author_id, content) VALUES (?, ?, ?)")
            .bind(post_id)
            .bind(author)
            .bind(content)
            .execute(&self.pool)
            .await
            .map_err(|e| ForumError::store(format!("insert comment: {e}")))?;

        let comment_id = CommentId(done.last_insert_id() as i64);
        CommentRepo::get(self, comment_id)
            .await?
            .ok_or_else(|| ForumError::store(format!("comment {comment_id} vanished after insert")))
    }

    async fn replace(&self, comment: &Comment) -> Result<Comment, ForumError> {
        sqlx::query("UPDATE comment SET content = ? WHERE comment_id = ?")
            .bind(&comment.content)
            .bind(comment.comment_id)
            .execute(&self.pool)
            .await
            .map_err(|e| ForumError::store(format!("update comment: {e}")))?;

        CommentRepo::get(self, comment.comment_id)
            .await?
            .ok_or_else(|| ForumError::not_found("Comment", "id", comment.comment_id))
    }

    async fn remove(&self, comment_id: CommentId) -> Result<(), ForumError> {
        let done = sqlx::query("DELETE FROM comment WHERE comment_id = ?")
            .bind(comment_id)
            .execute(&self.pool)
            .await
            .map_err(|e| ForumError::store(format!("delete comment: {e}")))?;

        if done.rows_affected() == 0 {
            return Err(ForumError::not_found("Comment", "id", comment_id));
        }

        Ok(())
    }
}
