use crate::application_port::*;
use crate::domain_model::*;
use crate::domain_port::*;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Clone)]
struct PostRow {
    post_id: PostId,
    title: String,
    content: String,
    author: UserId,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct State {
    users: BTreeMap<UserId, User>,
    posts: BTreeMap<PostId, PostRow>,
    comments: BTreeMap<CommentId, Comment>,
    likes: BTreeSet<(PostId, UserId)>,
    last_user_id: i64,
    last_post_id: i64,
    last_comment_id: i64,
}

impl State {
    fn username_owner(&self, username: &str) -> Option<UserId> {
        self.users
            .values()
            .find(|u| u.username == username)
            .map(|u| u.user_id)
    }

    fn title_owner(&self, title: &str) -> Option<PostId> {
        self.posts
            .values()
            .find(|p| p.title == title)
            .map(|p| p.post_id)
    }

    fn hydrate(&self, row: &PostRow) -> Post {
        let like_count = self
            .likes
            .iter()
            .filter(|(post_id, _)| *post_id == row.post_id)
            .count();
        let comment_count = self
            .comments
            .values()
            .filter(|c| c.post_id == row.post_id)
            .count();

        Post {
            post_id: row.post_id,
            title: row.title.clone(),
            content: row.content.clone(),
            author: row.author,
            created_at: row.created_at,
            like_count: like_count as i64,
            comment_count: comment_count as i64,
        }
    }

    fn remove_post(&mut self, post_id: PostId) {
        self.posts.remove(&post_id);
        self.comments.retain(|_, c| c.post_id != post_id);
        self.likes.retain(|(p, _)| *p != post_id);
    }
}

/// Store kept entirely in process memory. Every operation runs under one lock,
/// so the uniqueness checks here are atomic with the write that follows them.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> Result<MutexGuard<'_, State>, ForumError> {
        self.state
            .lock()
            .map_err(|e| ForumError::store(format!("memory store poisoned: {e}")))
    }
}

#[async_trait::async_trait]
impl UserRepo for MemoryStore {
    async fn get(&self, user_id: UserId) -> Result<Option<User>, ForumError> {
        Ok(self.state()?.users.get(&user_id).cloned())
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>, ForumError> {
        let state = self.state()?;
        Ok(state
            .username_owner(username)
            .and_then(|id| state.users.get(&id).cloned()))
    }

    async fn list(&self) -> Result<Vec<User>, ForumError> {
        Ok(self.state()?.users.values().cloned().collect())
    }

    async fn search(&self, filter: &UserFilterOptions) -> Result<Vec<User>, ForumError> {
        Ok(self
            .state()?
            .users
            .values()
            .filter(|u| filter.matches(u))
            .cloned()
            .collect())
    }

    async fn insert(&self, user: NewUser) -> Result<User, ForumError> {
        let mut state = self.state()?;
        if state.username_owner(&user.username).is_some() {
            return Err(ForumError::duplicate("User", "username", &user.username));
        }

        state.last_user_id += 1;
        let stored = User {
            user_id: UserId(state.last_user_id),
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            password_hash: user.password_hash,
            capabilities: user.capabilities,
            blocked: false,
        };
        state.users.insert(stored.user_id, stored.clone());

        Ok(stored)
    }

    async fn update_profile(&self, user: &User) -> Result<User, ForumError> {
        let mut state = self.state()?;
        match state.username_owner(&user.username) {
            Some(owner) if owner != user.user_id => {
                return Err(ForumError::duplicate("User", "username", &user.username));
            }
            _ => {}
        }
        let Some(stored) = state.users.get_mut(&user.user_id) else {
            return Err(ForumError::not_found("User", "id", user.user_id));
        };

        stored.username = user.username.clone();
        stored.first_name = user.first_name.clone();
        stored.last_name = user.last_name.clone();
        stored.email = user.email.clone();
        stored.password_hash = user.password_hash.clone();
        Ok(stored.clone())
    }

    async fn set_blocked(&self, user_id: UserId, blocked: bool) -> Result<(), ForumError> {
        let mut state = self.state()?;
        let Some(stored) = state.users.get_mut(&user_id) else {
            return Err(ForumError::not_found("User", "id", user_id));
        };
        stored.blocked = blocked;
        Ok(())
    }

    async fn remove(&self, user_id: UserId) -> Result<(), ForumError> {
        let mut state = self.state()?;
        if state.users.remove(&user_id).is_none() {
            return Err(ForumError::not_found("User", "id", user_id));
        }

        let authored: Vec<PostId> = state
            .posts
            .values()
            .filter(|p| p.author == user_id)
            .map(|p| p.post_id)
            .collect();
        for post_id in authored {
            state.remove_post(post_id);
        }
        state.comments.retain(|_, c| c.author != user_id);
        state.likes.retain(|(_, u)| *u != user_id);

        Ok(())
    }
}

#[async_trait::async_trait]
impl PostRepo for MemoryStore {
    async fn get(&self, post_id: PostId) -> Result<Option<Post>, ForumError> {
        let state = self.state()?;
        Ok(state.posts.get(&post_id).map(|row| state.hydrate(row)))
    }

    async fn get_by_title(&self, title: &str) -> Result<Option<Post>, ForumError> {
        let state = self.state()?;
        Ok(state
            .title_owner(title)
            .and_then(|id| state.posts.get(&id))
            .map(|row| state.hydrate(row)))
    }

    async fn list(&self, order: PostOrder, limit: Option<u32>) -> Result<Vec<Post>, ForumError> {
        let state = self.state()?;
        let mut posts: Vec<Post> = state.posts.values().map(|row| state.hydrate(row)).collect();

        match order {
            PostOrder::Newest => posts.sort_by(|a, b| {
                (b.created_at, b.post_id).cmp(&(a.created_at, a.post_id))
            }),
            PostOrder::MostCommented => posts.sort_by(|a, b| {
                b.comment_count
                    .cmp(&a.comment_count)
                    .then(a.post_id.cmp(&b.post_id))
            }),
        }
        if let Some(limit) = limit {
            posts.truncate(limit as usize);
        }

        Ok(posts)
    }

    async fn insert(&self, post: NewPost, author: UserId) -> Result<Post, ForumError> {
        let mut state = self.state()?;
        if !state.users.contains_key(&author) {
            return Err(ForumError::not_found("User", "id", author));
        }
        if state.title_owner(&post.title).is_some() {
            return Err(ForumError::duplicate("Post", "title", &post.title));
        }

        state.last_post_id += 1;
        let row = PostRow {
            post_id: PostId(state.last_post_id),
            title: post.title,
            content: post.content,
            author,
            created_at: Utc::now(),
        };
        let stored = state.hydrate(&row);
        state.posts.insert(row.post_id, row);

        Ok(stored)
    }

    async fn replace(&self, post: &Post) -> Result<Post, ForumError> {
        let mut state = self.state()?;
        match state.title_owner(&post.title) {
            Some(owner) if owner != post.post_id => {
                return Err(ForumError::duplicate("Post", "title", &post.title));
            }
            _ => {}
        }

        let row = state
            .posts
            .get_mut(&post.post_id)
            .ok_or_else(|| ForumError::not_found("Post", "id", post.post_id))?;
        row.title = post.title.clone();
        row.content = post.content.clone();
        let row = row.clone();

        Ok(state.hydrate(&row))
    }

    async fn remove(&self, post_id: PostId) -> Result<(), ForumError> {
        let mut state = self.state()?;
        if !state.posts.contains_key(&post_id) {
            return Err(ForumError::not_found("Post", "id", post_id));
        }
        state.remove_post(post_id);
        Ok(())
    }

    async fn add_like(&self, post_id: PostId, user_id: UserId) -> Result<LikeClaim, ForumError> {
        let mut state = self.state()?;
        if !state.posts.contains_key(&post_id) {
            return Err(ForumError::not_found("Post", "id", post_id));
        }

        if state.likes.insert((post_id, user_id)) {
            Ok(LikeClaim::Won)
        } else {
            Ok(LikeClaim::Existing)
        }
    }
}

#[async_trait::async_trait]
impl CommentRepo for MemoryStore {
    async fn get(&self, comment_id: CommentId) -> Result<Option<Comment>, ForumError> {
        Ok(self.state()?.comments.get(&comment_id).cloned())
    }

    async fn list_for_post(&self, post_id: PostId) -> Result<Vec<Comment>, ForumError> {
        let mut comments: Vec<Comment> = self
            .state()?
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| (a.created_at, a.comment_id).cmp(&(b.created_at, b.comment_id)));
        Ok(comments)
    }

    async fn insert(
        &self,
        post_id: PostId,
        author: UserId,
        content: &str,
    ) -> Result<Comment, ForumError> {
        let mut state = self.state()?;
        if !state.posts.contains_key(&post_id) {
            return Err(ForumError::not_found("Post", "id", post_id));
        }

        state.last_comment_id += 1;
        let comment = Comment {
            comment_id: CommentId(state.last_comment_id),
            post_id,
            author,
            content: content.to_string(),
            created_at: Utc::now(),
        };
        state.comments.insert(comment.comment_id, comment.clone());

        Ok(comment)
    }

    async fn replace(&self, comment: &Comment) -> Result<Comment, ForumError> {
        let mut state = self.state()?;
        let stored = state
            .comments
            .get_mut(&comment.comment_id)
            .ok_or_else(|| ForumError::not_found("Comment", "id", comment.comment_id))?;
        stored.content = comment.content.clone();
        Ok(stored.clone())
    }

    async fn remove(&self, comment_id: CommentId) -> Result<(), ForumError> {
        self.state()?
            .comments
            .remove(&comment_id)
            .map(|_| ())
            .ok_or_else(|| ForumError::not_found("Comment", "id", comment_id))
    }
}
