mod common;

use common::*;
use serde_json::{Value, json};
use warp::http::StatusCode;

fn post_body(title: &str) -> Value {
    json!({
        "title": title,
        "content": "a body that is comfortably longer than thirty two characters",
    })
}

#[tokio::test]
async fn post_lifecycle() {
    let api = api().await;
    call(&api, "POST", "/api/v1/users", None, Some(signup("alice"))).await;
    call(&api, "POST", "/api/v1/users", None, Some(signup("bobby"))).await;

    let anonymous = call(
        &api,
        "POST",
        "/api/v1/posts",
        None,
        Some(post_body("how do lifetimes work")),
    )
    .await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);

    let created = call(
        &api,
        "POST",
        "/api/v1/posts",
        Some(&auth_of("alice")),
        Some(post_body("how do lifetimes work")),
    )
    .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let post_path = format!("/api/v1/posts/{}", created.body["data"]["post_id"]);

    let duplicate = call(
        &api,
        "POST",
        "/api/v1/posts",
        Some(&auth_of("bobby")),
        Some(post_body("how do lifetimes work")),
    )
    .await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);

    let foreign_edit = call(
        &api,
        "PUT",
        &post_path,
        Some(&auth_of("bobby")),
        Some(json!({"title": "hijacked title for sure"})),
    )
    .await;
    assert_eq!(foreign_edit.status, StatusCode::UNAUTHORIZED);

    let edit = call(
        &api,
        "PUT",
        &post_path,
        Some(&auth_of("alice")),
        Some(json!({"title": "how do lifetimes really work"})),
    )
    .await;
    assert_eq!(edit.status, StatusCode::OK);
    assert_eq!(edit.body["data"]["title"], "how do lifetimes really work");

    let fetched = call(&api, "GET", &post_path, None, None).await;
    assert_eq!(fetched.body["data"]["title"], "how do lifetimes really work");

    let foreign_delete = call(&api, "DELETE", &post_path, Some(&auth_of("bobby")), None).await;
    assert_eq!(foreign_delete.status, StatusCode::UNAUTHORIZED);

    let deleted = call(&api, "DELETE", &post_path, Some(ADMIN), None).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let gone = call(&api, "GET", &post_path, None, None).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn post_fields_are_validated() {
    let api = api().await;
    call(&api, "POST", "/api/v1/users", None, Some(signup("alice"))).await;

    let short_title = call(
        &api,
        "POST",
        "/api/v1/posts",
        Some(&auth_of("alice")),
        Some(post_body("short")),
    )
    .await;
    assert_eq!(short_title.status, StatusCode::BAD_REQUEST);

    let short_content = call(
        &api,
        "POST",
        "/api/v1/posts",
        Some(&auth_of("alice")),
        Some(json!({"title": "a long enough title", "content": "too short"})),
    )
    .await;
    assert_eq!(short_content.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn likes_are_counted_once_per_user() {
    let api = api().await;
    call(&api, "POST", "/api/v1/users", None, Some(signup("alice"))).await;
    call(&api, "POST", "/api/v1/users", None, Some(signup("bobby"))).await;
    let created = call(
        &api,
        "POST",
        "/api/v1/posts",
        Some(&auth_of("alice")),
        Some(post_body("likes are counted here")),
    )
    .await;
    let like_path = format!("/api/v1/posts/{}/like", created.body["data"]["post_id"]);

    let liked = call(&api, "POST", &like_path, Some(&auth_of("bobby")), None).await;
    assert_eq!(liked.status, StatusCode::OK);
    assert_eq!(liked.body["data"]["like_count"], 1);

    let again = call(&api, "POST", &like_path, Some(&auth_of("bobby")), None).await;
    assert_eq!(again.status, StatusCode::CONFLICT);

    let missing = call(&api, "POST", "/api/v1/posts/99/like", Some(&auth_of("bobby")), None).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn comments_flow_and_feed_counts() {
    let api = api().await;
    call(&api, "POST", "/api/v1/users", None, Some(signup("alice"))).await;
    call(&api, "POST", "/api/v1/users", None, Some(signup("bobby"))).await;
    let quiet = call(
        &api,
        "POST",
        "/api/v1/posts",
        Some(&auth_of("alice")),
        Some(post_body("a quiet post nobody reads")),
    )
    .await;
    let busy = call(
        &api,
        "POST",
        "/api/v1/posts",
        Some(&auth_of("alice")),
        Some(post_body("a busy post everyone reads")),
    )
    .await;
    let comments_path = format!("/api/v1/posts/{}/comments", busy.body["data"]["post_id"]);

    let comment = call(
        &api,
        "POST",
        &comments_path,
        Some(&auth_of("bobby")),
        Some(json!({"content": "great point"})),
    )
    .await;
    assert_eq!(comment.status, StatusCode::CREATED);
    let comment_path = format!("/api/v1/comments/{}", comment.body["data"]["comment_id"]);

    let empty = call(
        &api,
        "POST",
        &comments_path,
        Some(&auth_of("bobby")),
        Some(json!({"content": ""})),
    )
    .await;
    assert_eq!(empty.status, StatusCode::BAD_REQUEST);

    let foreign_edit = call(
        &api,
        "PUT",
        &comment_path,
        Some(&auth_of("alice")),
        Some(json!({"content": "edited by someone else"})),
    )
    .await;
    assert_eq!(foreign_edit.status, StatusCode::UNAUTHORIZED);

    let edit = call(
        &api,
        "PUT",
        &comment_path,
        Some(&auth_of("bobby")),
        Some(json!({"content": "great point, agreed"})),
    )
    .await;
    assert_eq!(edit.status, StatusCode::OK);

    let listed = call(&api, "GET", &comments_path, None, None).await;
    assert_eq!(listed.body["data"][0]["content"], "great point, agreed");

    let top = call(&api, "GET", "/api/v1/posts/top-commented", None, None).await;
    assert_eq!(top.body["data"][0]["post_id"], busy.body["data"]["post_id"]);
    assert_eq!(top.body["data"][0]["comment_count"], 1);

    let recent = call(&api, "GET", "/api/v1/posts/recent", None, None).await;
    assert_eq!(recent.body["data"].as_array().unwrap().len(), 2);
    assert_eq!(quiet.status, StatusCode::CREATED);

    let deleted = call(&api, "DELETE", &comment_path, Some(&auth_of("bobby")), None).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);
    let listed = call(&api, "GET", &comments_path, None, None).await;
    assert!(listed.body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn wrong_method_is_rejected() {
    let api = api().await;
    let reply = call(&api, "PATCH", "/api/v1/posts", None, None).await;
    assert_eq!(reply.status, StatusCode::METHOD_NOT_ALLOWED);
}
