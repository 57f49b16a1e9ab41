mod common;

use common::*;
use serde_json::json;
use warp::http::StatusCode;

#[tokio::test]
async fn signup_then_duplicate_username_conflicts() {
    let api = api().await;

    let created = call(&api, "POST", "/api/v1/users", None, Some(signup("alice"))).await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["data"]["username"], "alice");
    assert!(created.body["data"].get("password_hash").is_none());

    let again = call(&api, "POST", "/api/v1/users", None, Some(signup("alice"))).await;
    assert_eq!(again.status, StatusCode::CONFLICT);
    assert_eq!(again.body["success"], false);
    assert_eq!(again.body["error"]["code"], "Duplicate");
}

#[tokio::test]
async fn signup_validates_fields() {
    let api = api().await;

    let short = call(&api, "POST", "/api/v1/users", None, Some(signup("bob"))).await;
    assert_eq!(short.status, StatusCode::BAD_REQUEST);

    let mut bad_email = signup("carol");
    bad_email["email"] = json!("carol.forum.test");
    let reply = call(&api, "POST", "/api/v1/users", None, Some(bad_email)).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);

    let missing = call(
        &api,
        "POST",
        "/api/v1/users",
        None,
        Some(json!({"username": "dave"})),
    )
    .await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn listing_users_requires_admin() {
    let api = api().await;
    call(&api, "POST", "/api/v1/users", None, Some(signup("alice"))).await;

    let anonymous = call(&api, "GET", "/api/v1/users", None, None).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
    assert_eq!(anonymous.body["error"]["code"], "InvalidCredentials");

    let wrong_password = call(&api, "GET", "/api/v1/users", Some("alice nope"), None).await;
    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);

    let regular = call(&api, "GET", "/api/v1/users", Some(&auth_of("alice")), None).await;
    assert_eq!(regular.status, StatusCode::UNAUTHORIZED);
    assert_eq!(regular.body["error"]["code"], "Unauthorized");

    let admin = call(&api, "GET", "/api/v1/users", Some(ADMIN), None).await;
    assert_eq!(admin.status, StatusCode::OK);
    let usernames: Vec<&str> = admin.body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["username"].as_str().unwrap())
        .collect();
    assert_eq!(usernames, vec!["admin", "alice"]);
}

#[tokio::test]
async fn get_unknown_user_is_not_found() {
    let api = api().await;
    let reply = call(&api, "GET", "/api/v1/users/99", Some(ADMIN), None).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.body["error"]["message"], "User with id 99 not found.");
}

#[tokio::test]
async fn search_matches_substrings() {
    let api = api().await;
    for name in ["alice", "alicia", "bobby"] {
        call(&api, "POST", "/api/v1/users", None, Some(signup(name))).await;
    }

    let reply = call(&api, "GET", "/api/v1/users/search?username=ali", None, None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["data"].as_array().unwrap().len(), 2);

    let everyone = call(&api, "GET", "/api/v1/users/search", None, None).await;
    assert_eq!(everyone.body["data"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn user_updates_only_themselves() {
    let api = api().await;
    let alice = call(&api, "POST", "/api/v1/users", None, Some(signup("alice"))).await;
    let bob = call(&api, "POST", "/api/v1/users", None, Some(signup("bobby"))).await;
    let alice_path = format!("/api/v1/users/{}", alice.body["data"]["user_id"]);
    let bob_path = format!("/api/v1/users/{}", bob.body["data"]["user_id"]);

    let renamed = call(
        &api,
        "PUT",
        &alice_path,
        Some(&auth_of("alice")),
        Some(json!({"first_name": "Alicia"})),
    )
    .await;
    assert_eq!(renamed.status, StatusCode::OK);
    assert_eq!(renamed.body["data"]["first_name"], "Alicia");
    assert_eq!(renamed.body["data"]["username"], "alice");

    let foreign = call(
        &api,
        "PUT",
        &bob_path,
        Some(&auth_of("alice")),
        Some(json!({"first_name": "Mallory"})),
    )
    .await;
    assert_eq!(foreign.status, StatusCode::UNAUTHORIZED);

    let taken = call(
        &api,
        "PUT",
        &alice_path,
        Some(&auth_of("alice")),
        Some(json!({"username": "bobby"})),
    )
    .await;
    assert_eq!(taken.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn password_change_takes_effect() {
    let api = api().await;
    let alice = call(&api, "POST", "/api/v1/users", None, Some(signup("alice"))).await;
    let alice_path = format!("/api/v1/users/{}", alice.body["data"]["user_id"]);

    let reply = call(
        &api,
        "PUT",
        &alice_path,
        Some(&auth_of("alice")),
        Some(json!({"password": "new-password"})),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);

    let old = call(&api, "DELETE", &alice_path, Some(&auth_of("alice")), None).await;
    assert_eq!(old.status, StatusCode::UNAUTHORIZED);
    let new = call(&api, "DELETE", &alice_path, Some("alice new-password"), None).await;
    assert_eq!(new.status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn delete_rules() {
    let api = api().await;
    let alice = call(&api, "POST", "/api/v1/users", None, Some(signup("alice"))).await;
    call(&api, "POST", "/api/v1/users", None, Some(signup("bobby"))).await;
    let alice_path = format!("/api/v1/users/{}", alice.body["data"]["user_id"]);

    let foreign = call(&api, "DELETE", &alice_path, Some(&auth_of("bobby")), None).await;
    assert_eq!(foreign.status, StatusCode::UNAUTHORIZED);

    let admin = call(&api, "DELETE", &alice_path, Some(ADMIN), None).await;
    assert_eq!(admin.status, StatusCode::NO_CONTENT);

    let gone = call(&api, "DELETE", &alice_path, Some(ADMIN), None).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn blocking_requires_moderation_rights() {
    let api = api().await;
    let alice = call(&api, "POST", "/api/v1/users", None, Some(signup("alice"))).await;
    call(&api, "POST", "/api/v1/users", None, Some(signup("bobby"))).await;
    let block_path = format!("/api/v1/users/{}/block", alice.body["data"]["user_id"]);
    let unblock_path = format!("/api/v1/users/{}/unblock", alice.body["data"]["user_id"]);

    let regular = call(&api, "PUT", &block_path, Some(&auth_of("bobby")), None).await;
    assert_eq!(regular.status, StatusCode::FORBIDDEN);

    let missing = call(&api, "PUT", "/api/v1/users/99/block", Some(ADMIN), None).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);

    let blocked = call(&api, "PUT", &block_path, Some(ADMIN), None).await;
    assert_eq!(blocked.status, StatusCode::NO_CONTENT);

    let post = call(
        &api,
        "POST",
        "/api/v1/posts",
        Some(&auth_of("alice")),
        Some(json!({
            "title": "a perfectly valid title",
            "content": "long enough content for a forum post body",
        })),
    )
    .await;
    assert_eq!(post.status, StatusCode::UNAUTHORIZED);

    let unblocked = call(&api, "PUT", &unblock_path, Some(ADMIN), None).await;
    assert_eq!(unblocked.status, StatusCode::NO_CONTENT);

    let user_path = format!("/api/v1/users/{}", alice.body["data"]["user_id"]);
    let user = call(&api, "GET", &user_path, Some(ADMIN), None).await;
    assert_eq!(user.body["data"]["blocked"], false);
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let api = api().await;
    let mut body = signup("alice");
    body["first_name"] = json!("x".repeat(70 * 1024));

    let reply = call(&api, "POST", "/api/v1/users", None, Some(body)).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["error"]["message"], "Request body too large.");

    let admin = call(&api, "GET", "/api/v1/users", Some(ADMIN), None).await;
    assert_eq!(admin.body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let api = api().await;
    let reply = call(&api, "GET", "/api/v1/nothing", None, None).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
}
