#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use rewards_api::config::{LogFormat, ServerConfig};
use rewards_api::router::build_app_router;
use rewards_api::state::AppState;
use rewards_coordinator::{CoordinatorConfig, MutationCoordinator};
use rewards_core::types::{Amount, DbId};
use rewards_db::repositories::AccountRepo;
use rewards_economy::{Economy, EconomyConfig};
use rewards_events::EventBus;
use sqlx::PgPool;
use tower::ServiceExt;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".parse().unwrap()],
        request_timeout_secs: 30,
        lock_cleanup_interval_secs: 60,
        notify_webhook_url: None,
        log_format: LogFormat::Text,
    }
}

/// Build the full application router over `pool`, as one service instance.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_bus(pool).0
}

/// Like [`build_test_app`], also returning the bus processors publish on.
pub fn build_test_app_with_bus(pool: PgPool) -> (Router, Arc<EventBus>) {
    let config = test_config();
    let coordinator = MutationCoordinator::new(
        pool.clone(),
        &CoordinatorConfig {
            instance_id: "api-test".to_string(),
            lock_ttl: Duration::from_secs(10),
        },
    );
    let event_bus = Arc::new(EventBus::default());
    let economy = Economy::new(coordinator, Arc::clone(&event_bus), EconomyConfig::default());

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        economy,
        event_bus: Arc::clone(&event_bus),
    };
    (build_app_router(state, &config), event_bus)
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_empty(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn account(pool: &PgPool, id: DbId, balance: Amount) {
    AccountRepo::ensure(pool, id, None).await.unwrap();
    if !balance.is_zero() {
        AccountRepo::credit(pool, id, balance).await.unwrap();
    }
}
