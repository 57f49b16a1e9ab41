#![allow(dead_code)]

use forum::api;
use forum::server::Server;
use forum::settings::*;
use serde_json::Value;
use std::convert::Infallible;
use std::sync::Arc;
use warp::Filter;
use warp::http::StatusCode;

pub const ADMIN: &str = "admin admin-dev-password";

pub fn memory_settings() -> Settings {
    Settings {
        auth: Auth {
            backend: "fake".to_string(),
        },
        http: Http {
            address: "127.0.0.1:0".to_string(),
            cert_path: None,
            key_path: None,
        },
        log: Log {
            filter: "warn".to_string(),
        },
        store: Store {
            backend: "memory".to_string(),
            mysql_dsn: None,
            max_connections: 1,
        },
        admin: Some(Admin {
            username: "admin".to_string(),
            password: "admin-dev-password".to_string(),
        }),
    }
}

pub async fn api()
-> impl Filter<Extract = (impl warp::Reply,), Error = Infallible> + Clone + 'static {
    let server = Arc::new(Server::try_new(&memory_settings()).await.unwrap());
    warp::path("api")
        .and(warp::path("v1"))
        .and(api::v1::routes(server))
        .recover(api::v1::recover_error)
}

pub struct Reply {
    pub status: StatusCode,
    pub body: Value,
}

pub async fn call<F>(
    filter: &F,
    method: &str,
    path: &str,
    auth: Option<&str>,
    body: Option<Value>,
) -> Reply
where
    F: Filter + Clone + 'static,
    F::Extract: warp::Reply + Send,
{
    let mut request = warp::test::request().method(method).path(path);
    if let Some(auth) = auth {
        request = request.header("authorization", auth);
    }
    if let Some(body) = body {
        request = request.json(&body);
    }
    let response = request.reply(filter).await;
    let body = if response.body().is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(response.body()).unwrap()
    };
    Reply {
        status: response.status(),
        body,
    }
}

pub fn signup(username: &str) -> Value {
    serde_json::json!({
        "username": username,
        "password": "pw",
        "first_name": "First",
        "last_name": "Last",
        "email": format!("{username}@forum.test"),
    })
}

pub fn auth_of(username: &str) -> String {
    format!("{username} pw")
}
