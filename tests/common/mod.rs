#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use hostelhub::router::init_router;
use hostelhub::state::AppState;
use hostelhub_config::{CorsConfig, JwtConfig};
use hostelhub_core::Role;
use hostelhub_core::password::hash_password_with_cost;
use hostelhub_db::{IdentityStore, MemoryIdentityStore};
use hostelhub_models::{Identity, NewIdentity};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

pub const TEST_SECRET: &str = "test-secret-key-at-least-32-characters-long";
pub const PASSWORD: &str = "Passw0rd!";

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryIdentityStore>,
    pub state: AppState,
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Logs in and returns the bearer token.
    pub async fn login_token(&self, handle: &str, password: &str) -> String {
        let response = self
            .send(json_request(
                "POST",
                "/api/auth/login",
                None,
                json!({ "handle": handle, "password": password }),
            ))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        body_json(response).await["token"]
            .as_str()
            .unwrap()
            .to_string()
    }
}

pub fn setup_test_app() -> TestApp {
    let store = Arc::new(MemoryIdentityStore::new());
    let state = AppState::new(
        store.clone(),
        JwtConfig::new(TEST_SECRET, 3600).unwrap(),
        CorsConfig::from_lookup(|_| None),
    );

    TestApp {
        router: init_router(state.clone()),
        store,
        state,
    }
}

/// Inserts an identity with [`PASSWORD`], hashed at the minimum bcrypt cost.
pub async fn seed_identity(store: &MemoryIdentityStore, handle: &str, role: Role) -> Identity {
    store
        .insert(NewIdentity {
            name: format!("{} Tester", role),
            handle: handle.to_string(),
            secret: hash_password_with_cost(PASSWORD, 4).unwrap(),
            role,
            contact: None,
        })
        .await
        .unwrap()
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

pub fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}
