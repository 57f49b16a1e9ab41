use super::error::*;
use super::handler;
use crate::application_port::*;
use crate::domain_model::*;
use crate::server::*;
use std::convert::Infallible;
use std::sync::Arc;
use warp::{Filter, reject};

const MAX_BODY_BYTES: u64 = 64 * 1024;

pub fn routes(
    server: Arc<Server>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    user_routes(server.clone())
        .or(post_routes(server.clone()))
        .or(comment_routes(server))
}

fn user_routes(
    server: Arc<Server>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let list_users = warp::path("users")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_verification(server.auth_service.clone()))
        .and(with(server.user_service.clone()))
        .and_then(handler::list_users);

    let create_user = warp::path("users")
        .and(warp::path::end())
        .and(warp::post())
        .and(json_body())
        .and(with(server.user_service.clone()))
        .and(with(server.credential_hasher.clone()))
        .and_then(handler::create_user);

    let search_users = warp::path!("users" / "search")
        .and(warp::get())
        .and(warp::query::<UserFilterOptions>())
        .and(with(server.user_service.clone()))
        .and_then(handler::search_users);

    let get_user = warp::path!("users" / UserId)
        .and(warp::get())
        .and(with_verification(server.auth_service.clone()))
        .and(with(server.user_service.clone()))
        .and_then(handler::get_user);

    let update_user = warp::path!("users" / UserId)
        .and(warp::put())
        .and(json_body())
        .and(with_verification(server.auth_service.clone()))
        .and(with(server.user_service.clone()))
        .and(with(server.credential_hasher.clone()))
        .and_then(handler::update_user);

    let delete_user = warp::path!("users" / UserId)
        .and(warp::delete())
        .and(with_verification(server.auth_service.clone()))
        .and(with(server.user_service.clone()))
        .and_then(handler::delete_user);

    let block_user = warp::path!("users" / UserId / "block")
        .and(warp::put())
        .and(with_verification(server.auth_service.clone()))
        .and(with(server.user_service.clone()))
        .and_then(handler::block_user);

    let unblock_user = warp::path!("users" / UserId / "unblock")
        .and(warp::put())
        .and(with_verification(server.auth_service.clone()))
        .and(with(server.user_service.clone()))
        .and_then(handler::unblock_user);

    list_users
        .or(create_user)
        .or(search_users)
        .or(get_user)
        .or(update_user)
        .or(delete_user)
        .or(block_user)
        .or(unblock_user)
}

fn post_routes(
    server: Arc<Server>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let list_posts = warp::path("posts")
        .and(warp::path::end())
        .and(warp::get())
        .and(with(server.post_service.clone()))
        .and_then(handler::list_posts);

    let create_post = warp::path("posts")
        .and(warp::path::end())
        .and(warp::post())
        .and(json_body())
        .and(with_verification(server.auth_service.clone()))
        .and(with(server.post_service.clone()))
        .and_then(handler::create_post);

    let recent_posts = warp::path!("posts" / "recent")
        .and(warp::get())
        .and(with(server.post_service.clone()))
        .and_then(handler::recent_posts);

    let top_commented_posts = warp::path!("posts" / "top-commented")
        .and(warp::get())
        .and(with(server.post_service.clone()))
        .and_then(handler::top_commented_posts);

    let get_post = warp::path!("posts" / PostId)
        .and(warp::get())
        .and(with(server.post_service.clone()))
        .and_then(handler::get_post);

    let update_post = warp::path!("posts" / PostId)
        .and(warp::put())
        .and(json_body())
        .and(with_verification(server.auth_service.clone()))
        .and(with(server.post_service.clone()))
        .and_then(handler::update_post);

    let delete_post = warp::path!("posts" / PostId)
        .and(warp::delete())
        .and(with_verification(server.auth_service.clone()))
        .and(with(server.post_service.clone()))
        .and_then(handler::delete_post);

    let like_post = warp::path!("posts" / PostId / "like")
        .and(warp::post())
        .and(with_verification(server.auth_service.clone()))
        .and(with(server.post_service.clone()))
        .and_then(handler::like_post);

    list_posts
        .or(create_post)
        .or(recent_posts)
        .or(top_commented_posts)
        .or(get_post)
        .or(update_post)
        .or(delete_post)
        .or(like_post)
}

fn comment_routes(
    server: Arc<Server>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let list_comments = warp::path!("posts" / PostId / "comments")
        .and(warp::get())
        .and(with(server.comment_service.clone()))
        .and_then(handler::list_comments);

    let create_comment = warp::path!("posts" / PostId / "comments")
        .and(warp::post())
        .and(json_body())
        .and(with_verification(server.auth_service.clone()))
        .and(with(server.comment_service.clone()))
        .and_then(handler::create_comment);

    let update_comment = warp::path!("comments" / CommentId)
        .and(warp::put())
        .and(json_body())
        .and(with_verification(server.auth_service.clone()))
        .and(with(server.comment_service.clone()))
        .and_then(handler::update_comment);

    let delete_comment = warp::path!("comments" / CommentId)
        .and(warp::delete())
        .and(with_verification(server.auth_service.clone()))
        .and(with(server.comment_service.clone()))
        .and_then(handler::delete_comment);

    list_comments
        .or(create_comment)
        .or(update_comment)
        .or(delete_comment)
}

fn with<ServiceType>(
    service: Arc<ServiceType>,
) -> impl Filter<Extract = (Arc<ServiceType>,), Error = Infallible> + Clone
where
    ServiceType: Send + Sync + ?Sized,
{
    warp::any().map(move || service.clone())
}

fn json_body<T>() -> impl Filter<Extract = (T,), Error = warp::Rejection> + Clone
where
    T: serde::de::DeserializeOwned + Send,
{
    warp::body::content_length_limit(MAX_BODY_BYTES).and(warp::body::json())
}

/// Resolves the acting user from `Authorization: <username> <password>`.
fn with_verification(
    auth_service: Arc<dyn AuthService>,
) -> impl Filter<Extract = (User,), Error = warp::Rejection> + Clone {
    warp::header::optional::<String>("authorization").and_then(move |header: Option<String>| {
        let auth_service = auth_service.clone();
        async move {
            let Some(credentials) = header.as_deref().and_then(Credentials::parse) else {
                return Err(reject::custom(ApiError::new(
                    ApiErrorCode::InvalidCredentials,
                    INVALID_AUTHENTICATION,
                )));
            };
            let user = auth_service
                .resolve(&credentials)
                .await
                .map_err(ApiError::from)
                .map_err(reject::custom)?;
            Ok::<User, warp::Rejection>(user)
        }
    })
}
