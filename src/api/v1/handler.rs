use super::error::*;
use crate::application_port::*;
use crate::domain_model::*;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::sync::Arc;
use warp::http::StatusCode;
use warp::{self, reject};

const ONLY_ADMINS_SEE_USERS: &str = "Only admins can access user's information";

const USERNAME_LEN: RangeInclusive<usize> = 4..=32;
const NAME_LEN: RangeInclusive<usize> = 1..=32;
const EMAIL_LEN: RangeInclusive<usize> = 3..=255;
const PASSWORD_LEN: RangeInclusive<usize> = 1..=128;
const TITLE_LEN: RangeInclusive<usize> = 16..=64;
const POST_CONTENT_LEN: RangeInclusive<usize> = 32..=8192;
const COMMENT_CONTENT_LEN: RangeInclusive<usize> = 1..=8192;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(error: ApiError) -> Self {
        ApiResponse {
            success: false,
            data: None,
            error: Some(error),
        }
    }
}

fn json_with_status<T: Serialize>(data: T, status: StatusCode) -> impl warp::Reply {
    warp::reply::with_status(warp::reply::json(&ApiResponse::ok(data)), status)
}

fn no_content() -> impl warp::Reply {
    warp::reply::with_status(warp::reply(), StatusCode::NO_CONTENT)
}

fn check_len(field: &str, value: &str, range: RangeInclusive<usize>) -> Result<(), ApiError> {
    let len = value.chars().count();
    if range.contains(&len) {
        return Ok(());
    }
    Err(ApiError::new(
        ApiErrorCode::InvalidInput,
        format!(
            "{field} must be between {} and {} characters.",
            range.start(),
            range.end()
        ),
    ))
}

fn check_email(email: &str) -> Result<(), ApiError> {
    check_len("email", email, EMAIL_LEN)?;
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(ApiError::new(
            ApiErrorCode::InvalidInput,
            "email must be a valid address.",
        )),
    }
}

// region users

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user_id: UserId,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_admin: bool,
    pub is_moderator: bool,
    pub blocked: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            user_id: user.user_id,
            is_admin: user.is_admin(),
            is_moderator: user.is_moderator(),
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            blocked: user.blocked,
        }
    }
}

fn user_list(users: Vec<User>) -> Vec<UserResponse> {
    users.into_iter().map(UserResponse::from).collect()
}

fn require_admin(user: &User) -> Result<(), warp::Rejection> {
    if user.is_admin() {
        Ok(())
    } else {
        Err(reject::custom(ApiError::new(
            ApiErrorCode::Unauthorized,
            ONLY_ADMINS_SEE_USERS,
        )))
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl CreateUserRequest {
    fn validate(&self) -> Result<(), ApiError> {
        check_len("username", &self.username, USERNAME_LEN)?;
        check_len("password", &self.password, PASSWORD_LEN)?;
        check_len("first_name", &self.first_name, NAME_LEN)?;
        check_len("last_name", &self.last_name, NAME_LEN)?;
        check_email(&self.email)
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

impl UpdateUserRequest {
    fn validate(&self) -> Result<(), ApiError> {
        if let Some(username) = &self.username {
            check_len("username", username, USERNAME_LEN)?;
        }
        if let Some(password) = &self.password {
            check_len("password", password, PASSWORD_LEN)?;
        }
        if let Some(first_name) = &self.first_name {
            check_len("first_name", first_name, NAME_LEN)?;
        }
        if let Some(last_name) = &self.last_name {
            check_len("last_name", last_name, NAME_LEN)?;
        }
        if let Some(email) = &self.email {
            check_email(email)?;
        }
        Ok(())
    }
}

pub async fn list_users(
    current_user: User,
    user_service: Arc<dyn UserService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    require_admin(&current_user)?;

    let users = user_service
        .list_users()
        .await
        .map_err(ApiError::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&ApiResponse::ok(user_list(users))))
}

pub async fn get_user(
    user_id: UserId,
    current_user: User,
    user_service: Arc<dyn UserService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    require_admin(&current_user)?;

    let user = user_service
        .get_by_id(user_id)
        .await
        .map_err(ApiError::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&ApiResponse::ok(UserResponse::from(user))))
}

pub async fn search_users(
    query: UserFilterOptions,
    user_service: Arc<dyn UserService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let users = user_service
        .search_users(&query)
        .await
        .map_err(ApiError::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&ApiResponse::ok(user_list(users))))
}

pub async fn create_user(
    body: CreateUserRequest,
    user_service: Arc<dyn UserService>,
    credential_hasher: Arc<dyn CredentialHasher>,
) -> Result<impl warp::Reply, warp::Rejection> {
    body.validate().map_err(reject::custom)?;

    let password_hash = credential_hasher
        .hash_password(&body.password)
        .await
        .map_err(ApiError::from)
        .map_err(reject::custom)?;

    let new_user = NewUser {
        username: body.username,
        first_name: body.first_name,
        last_name: body.last_name,
        email: body.email,
        password_hash,
        capabilities: Capabilities::NONE,
    };
    let user = user_service
        .create(new_user)
        .await
        .map_err(ApiError::from)
        .map_err(reject::custom)?;

    Ok(json_with_status(UserResponse::from(user), StatusCode::CREATED))
}

pub async fn update_user(
    user_id: UserId,
    body: UpdateUserRequest,
    current_user: User,
    user_service: Arc<dyn UserService>,
    credential_hasher: Arc<dyn CredentialHasher>,
) -> Result<impl warp::Reply, warp::Rejection> {
    body.validate().map_err(reject::custom)?;

    // role flags and block state are never taken from the request
    let mut user_to_update = user_service
        .get_by_id(user_id)
        .await
        .map_err(ApiError::from)
        .map_err(reject::custom)?;

    if let Some(password) = &body.password {
        user_to_update.password_hash = credential_hasher
            .hash_password(password)
            .await
            .map_err(ApiError::from)
            .map_err(reject::custom)?;
    }
    if let Some(username) = body.username {
        user_to_update.username = username;
    }
    if let Some(first_name) = body.first_name {
        user_to_update.first_name = first_name;
    }
    if let Some(last_name) = body.last_name {
        user_to_update.last_name = last_name;
    }
    if let Some(email) = body.email {
        user_to_update.email = email;
    }

    let user = user_service
        .update(user_to_update, &current_user)
        .await
        .map_err(ApiError::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&ApiResponse::ok(UserResponse::from(user))))
}

pub async fn delete_user(
    user_id: UserId,
    current_user: User,
    user_service: Arc<dyn UserService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    user_service
        .delete(user_id, &current_user)
        .await
        .map_err(ApiError::from)
        .map_err(reject::custom)?;

    Ok(no_content())
}

pub async fn block_user(
    user_id: UserId,
    current_user: User,
    user_service: Arc<dyn UserService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    user_service
        .block_user(user_id, &current_user)
        .await
        .map_err(|e| ApiError::from(e).forbidding())
        .map_err(reject::custom)?;

    Ok(no_content())
}

pub async fn unblock_user(
    user_id: UserId,
    current_user: User,
    user_service: Arc<dyn UserService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    user_service
        .unblock_user(user_id, &current_user)
        .await
        .map_err(|e| ApiError::from(e).forbidding())
        .map_err(reject::custom)?;

    Ok(no_content())
}

// endregion

// region posts

#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub post_id: PostId,
    pub title: String,
    pub content: String,
    pub author: UserId,
    pub created_at: DateTime<Utc>,
    pub like_count: i64,
    pub comment_count: i64,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        PostResponse {
            post_id: post.post_id,
            title: post.title,
            content: post.content,
            author: post.author,
            created_at: post.created_at,
            like_count: post.like_count,
            comment_count: post.comment_count,
        }
    }
}

fn post_list(posts: Vec<Post>) -> Vec<PostResponse> {
    posts.into_iter().map(PostResponse::from).collect()
}

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

pub async fn list_posts(
    post_service: Arc<dyn PostService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let posts = post_service
        .list_posts()
        .await
        .map_err(ApiError::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&ApiResponse::ok(post_list(posts))))
}

pub async fn recent_posts(
    post_service: Arc<dyn PostService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let posts = post_service
        .recent_posts()
        .await
        .map_err(ApiError::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&ApiResponse::ok(post_list(posts))))
}

pub async fn top_commented_posts(
    post_service: Arc<dyn PostService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let posts = post_service
        .top_commented_posts()
        .await
        .map_err(ApiError::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&ApiResponse::ok(post_list(posts))))
}

pub async fn get_post(
    post_id: PostId,
    post_service: Arc<dyn PostService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let post = post_service
        .get_post(post_id)
        .await
        .map_err(ApiError::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&ApiResponse::ok(PostResponse::from(post))))
}

pub async fn create_post(
    body: CreatePostRequest,
    current_user: User,
    post_service: Arc<dyn PostService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    check_len("title", &body.title, TITLE_LEN).map_err(reject::custom)?;
    check_len("content", &body.content, POST_CONTENT_LEN).map_err(reject::custom)?;

    let new_post = NewPost {
        title: body.title,
        content: body.content,
    };
    let post = post_service
        .create_post(new_post, &current_user)
        .await
        .map_err(ApiError::from)
        .map_err(reject::custom)?;

    Ok(json_with_status(PostResponse::from(post), StatusCode::CREATED))
}

pub async fn update_post(
    post_id: PostId,
    body: UpdatePostRequest,
    current_user: User,
    post_service: Arc<dyn PostService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    if let Some(title) = &body.title {
        check_len("title", title, TITLE_LEN).map_err(reject::custom)?;
    }
    if let Some(content) = &body.content {
        check_len("content", content, POST_CONTENT_LEN).map_err(reject::custom)?;
    }

    let changes = PostChanges {
        title: body.title,
        content: body.content,
    };
    let post = post_service
        .update_post(post_id, changes, &current_user)
        .await
        .map_err(ApiError::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&ApiResponse::ok(PostResponse::from(post))))
}

pub async fn delete_post(
    post_id: PostId,
    current_user: User,
    post_service: Arc<dyn PostService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    post_service
        .delete_post(post_id, &current_user)
        .await
        .map_err(ApiError::from)
        .map_err(reject::custom)?;

    Ok(no_content())
}

pub async fn like_post(
    post_id: PostId,
    current_user: User,
    post_service: Arc<dyn PostService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let post = post_service
        .like_post(post_id, &current_user)
        .await
        .map_err(ApiError::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&ApiResponse::ok(PostResponse::from(post))))
}

// endregion

// region comments

#[derive(Debug, Serialize)]
pub struct CommentResponse {
    pub comment_id: CommentId,
    pub post_id: PostId,
    pub author: UserId,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        CommentResponse {
            comment_id: comment.comment_id,
            post_id: comment.post_id,
            author: comment.author,
            content: comment.content,
            created_at: comment.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub content: String,
}

pub async fn list_comments(
    post_id: PostId,
    comment_service: Arc<dyn CommentService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let comments: Vec<CommentResponse> = comment_service
        .comments_for_post(post_id)
        .await
        .map_err(ApiError::from)
        .map_err(reject::custom)?
        .into_iter()
        .map(CommentResponse::from)
        .collect();

    Ok(warp::reply::json(&ApiResponse::ok(comments)))
}

pub async fn create_comment(
    post_id: PostId,
    body: CommentRequest,
    current_user: User,
    comment_service: Arc<dyn CommentService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    check_len("content", &body.content, COMMENT_CONTENT_LEN).map_err(reject::custom)?;

    let comment = comment_service
        .create_comment(post_id, body.content, &current_user)
        .await
        .map_err(ApiError::from)
        .map_err(reject::custom)?;

    Ok(json_with_status(
        CommentResponse::from(comment),
        StatusCode::CREATED,
    ))
}

pub async fn update_comment(
    comment_id: CommentId,
    body: CommentRequest,
    current_user: User,
    comment_service: Arc<dyn CommentService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    check_len("content", &body.content, COMMENT_CONTENT_LEN).map_err(reject::custom)?;

    let comment = comment_service
        .update_comment(comment_id, body.content, &current_user)
        .await
        .map_err(ApiError::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&ApiResponse::ok(CommentResponse::from(comment))))
}

pub async fn delete_comment(
    comment_id: CommentId,
    current_user: User,
    comment_service: Arc<dyn CommentService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    comment_service
        .delete_comment(comment_id, &current_user)
        .await
        .map_err(ApiError::from)
        .map_err(reject::custom)?;

    Ok(no_content())
}

// endregion
