#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::response::Response;
use axum::Router;
use habitstake_api::auth::jwt::JwtConfig;
use habitstake_api::config::{ServerConfig, SweepConfig};
use habitstake_api::router::build_app_router;
use habitstake_api::state::{AppState, MailHandle};
use habitstake_notify::{MailError, Mailer, OutgoingEmail};
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

pub const TEST_JWT_SECRET: &str = "test-secret-do-not-use-in-production";
pub const TEST_CRON_SECRET: &str = "cron-test-secret";
pub const TEST_FROM: &str = "Bet On Yourself <test@betonyou.app>";

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin, a development environment
/// (cron calls need no secret) and the sweep disabled.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        app_env: "development".to_string(),
        cron_secret: None,
        sweep: SweepConfig {
            enabled: false,
            interval_secs: 86_400,
        },
        app_url: "http://localhost:5173".to_string(),
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

/// Build the full application router with no mail provider.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, test_config(), None)
}

/// Build the full application router with the given config and mailer.
pub fn build_test_app_with(
    pool: PgPool,
    config: ServerConfig,
    mailer: Option<Arc<dyn Mailer>>,
) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        mail: mailer.map(|mailer| MailHandle {
            mailer,
            from: TEST_FROM.to_string(),
        }),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Fake mailer
// ---------------------------------------------------------------------------

/// Records every email instead of delivering it. Fails every send when
/// built with [`FakeMailer::failing`].
#[derive(Default)]
pub struct FakeMailer {
    sent: Mutex<Vec<OutgoingEmail>>,
    fail: bool,
}

impl FakeMailer {
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for FakeMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<String, MailError> {
        if self.fail {
            return Err(MailError::HttpStatus {
                status: 500,
                body: "provider down".to_string(),
            });
        }
        let mut sent = self.sent.lock().unwrap();
        sent.push(email.clone());
        Ok(format!("fake-{}", sent.len()))
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

/// POST with auth and no body at all.
pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// Register a user through the API and return `(profile_id, access_token)`.
pub async fn register(app: Router, email: &str) -> (i64, String) {
    let body = serde_json::json!({
        "email": email,
        "password": TEST_PASSWORD,
        "display_name": email.split('@').next().unwrap(),
    });
    let response = post_json(app, "/api/auth/register", body).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    let json = body_json(response).await;
    let id = json["data"]["profile"]["id"].as_i64().unwrap();
    let token = json["data"]["access_token"].as_str().unwrap().to_string();
    (id, token)
}

/// Create a bet through the API and return its JSON.
pub async fn create_bet(
    app: Router,
    token: &str,
    stake: i64,
    weeks: i32,
    buddy_email: Option<&str>,
) -> serde_json::Value {
    let body = serde_json::json!({
        "habit_description": "Meditate every morning",
        "category": "health",
        "stake_amount": stake,
        "duration_weeks": weeks,
        "buddy_email": buddy_email,
    });
    let response = post_json_auth(app, "/api/bets", body, token).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["data"].clone()
}
