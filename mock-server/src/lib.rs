//! In-memory fake of the img-src HTTP API.
//!
//! Serves the same routes, status codes and JSON shapes as the real service
//! so the client can be exercised over real HTTP. Nothing is persisted and no
//! image is decoded; search results are visible immediately.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};

mod account;
mod images;
mod presets;

pub const DEFAULT_API_KEY: &str = "imgsrc_test_key";

#[derive(Clone, Debug)]
pub struct MockConfig {
    /// Expected bearer credential.
    pub api_key: String,
    /// `free` disables presets and signed URLs (403).
    pub plan: String,
    pub username: String,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            api_key: DEFAULT_API_KEY.to_string(),
            plan: "pro".to_string(),
            username: "mock-user".to_string(),
        }
    }
}

impl MockConfig {
    /// Defaults overridden by `MOCK_API_KEY` and `MOCK_PLAN`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(key) = std::env::var("MOCK_API_KEY") {
            config.api_key = key;
        }
        if let Ok(plan) = std::env::var("MOCK_PLAN") {
            config.plan = plan;
        }
        config
    }

    fn is_free(&self) -> bool {
        self.plan == "free"
    }
}

pub(crate) struct Store {
    images: Vec<images::Image>,
    presets: Vec<presets::Preset>,
    settings: account::Settings,
}

pub(crate) type Db = Arc<RwLock<Store>>;

#[derive(Clone)]
pub(crate) struct AppState {
    config: Arc<MockConfig>,
    db: Db,
}

pub fn app() -> Router {
    app_with(MockConfig::default())
}

pub fn app_with(config: MockConfig) -> Router {
    let store = Store {
        images: Vec::new(),
        presets: Vec::new(),
        settings: account::Settings::new(&config),
    };
    let state = AppState {
        config: Arc::new(config),
        db: Arc::new(RwLock::new(store)),
    };
    Router::new()
        .route(
            "/api/v1/settings",
            get(account::get_settings).put(account::update_settings),
        )
        .route("/api/v1/usage", get(account::get_usage))
        .route("/api/v1/images", get(images::list).post(images::upload))
        .route("/api/v1/images/search", get(images::search))
        .route(
            "/api/v1/images/{id}",
            get(images::metadata).delete(images::delete),
        )
        .route(
            "/api/v1/images/{id}/visibility",
            patch(images::update_visibility),
        )
        .route(
            "/api/v1/images/{id}/signed-url",
            post(images::create_signed_url),
        )
        .route(
            "/api/v1/settings/presets",
            get(presets::list).post(presets::create),
        )
        .route(
            "/api/v1/settings/presets/{id}",
            get(presets::get).put(presets::update).delete(presets::delete),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_bearer))
        .with_state(state)
}

pub async fn run(listener: TcpListener, config: MockConfig) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(config)).await
}

/// Rejects with a bare 401 (no JSON body), like the service's edge does.
async fn require_bearer(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let expected = format!("Bearer {}", state.config.api_key);
    let presented = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    if presented != Some(expected.as_str()) {
        tracing::warn!(path = %request.uri().path(), "rejected request without valid bearer");
        return StatusCode::UNAUTHORIZED.into_response();
    }
    next.run(request).await
}

/// A structured `{"error": {...}}` response.
#[derive(Debug)]
pub(crate) struct Failure {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl Failure {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    pub(crate) fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", message)
    }

    pub(crate) fn not_found(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, code, message)
    }

    pub(crate) fn conflict(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, code, message)
    }

    pub(crate) fn plan_required(feature: &str) -> Self {
        Self::new(
            StatusCode::FORBIDDEN,
            "PLAN_REQUIRED",
            format!("{feature} require a Pro plan"),
        )
    }
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        let body = json!({
            "error": {
                "status": self.status.as_u16(),
                "code": self.code,
                "message": self.message,
            }
        });
        (self.status, Json(body)).into_response()
    }
}

pub(crate) fn now() -> i64 {
    chrono::Utc::now().timestamp()
}
