#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use bucketlist_api::{AppState, app, auth::TokenSigner, db};
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub const PASSWORD: &str = "password";
pub const OWNER: &str = "lade";
pub const OTHER: &str = "dave";
pub const DEFAULT_BUCKETLIST: &str = "This is a default bucketlist";
pub const DEFAULT_ITEM: &str = "This is a default bucketlist item";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

/// An app over a fresh in-memory database seeded with two users, one
/// bucketlist owned by `lade` (id 1) and one item in it (id 1).
pub async fn seeded_app() -> TestApp {
    let app = empty_app().await;
    let lade = app.state.auth.register(OWNER, PASSWORD).await.unwrap();
    app.state.auth.register(OTHER, PASSWORD).await.unwrap();

    let list = app
        .state
        .store
        .create_bucketlist(lade.id, DEFAULT_BUCKETLIST)
        .await
        .unwrap();
    app.state
        .store
        .create_item(lade.id, list.bucketlist.id, DEFAULT_ITEM, false)
        .await
        .unwrap();
    app
}

pub async fn empty_app() -> TestApp {
    let pool = db::connect_in_memory().await.unwrap();
    db::run_migrations(&pool).await.unwrap();
    let state = AppState::new(Arc::new(pool), TokenSigner::new(b"test-secret", 3600));
    TestApp {
        router: app(state.clone()),
        state,
    }
}

pub fn basic(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{username}:{password}")))
}

impl TestApp {
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        auth: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::ACCEPT, "application/json");
        if let Some(auth) = auth {
            builder = builder.header(header::AUTHORIZATION, auth);
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Log in with username/password and return the issued token.
    pub async fn token_for(&self, username: &str) -> String {
        let response = self
            .send(
                Method::POST,
                "/api/v1/auth/login",
                Some(&basic(username, PASSWORD)),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
        response.body["token"].as_str().unwrap().to_string()
    }

    /// Basic auth header with a fresh token in the username slot.
    pub async fn token_auth(&self, username: &str) -> String {
        let token = self.token_for(username).await;
        basic(&token, PASSWORD)
    }
}
