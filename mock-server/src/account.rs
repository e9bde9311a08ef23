use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{now, AppState, Failure, MockConfig, Store};

const FIT_MODES: &[&str] = &["cover", "contain", "fill", "inside", "outside"];
const THEMES: &[&str] = &["light", "dark", "system"];

const MIB: f64 = 1024.0 * 1024.0;
const GIB: f64 = MIB * 1024.0;

#[derive(Clone, Debug, Serialize)]
pub(crate) struct Settings {
    id: String,
    username: String,
    email: Option<String>,
    plan: String,
    delivery_formats: Vec<String>,
    default_quality: i64,
    default_fit_mode: String,
    default_max_width: Option<i64>,
    default_max_height: Option<i64>,
    theme: String,
    language: String,
    created_at: i64,
    updated_at: i64,
    total_uploads: i64,
    storage_used_bytes: i64,
}

impl Settings {
    pub(crate) fn new(config: &MockConfig) -> Self {
        let created = now();
        Self {
            id: format!("user_{}", Uuid::new_v4().simple()),
            username: config.username.clone(),
            email: Some(format!("{}@example.com", config.username)),
            plan: config.plan.clone(),
            delivery_formats: vec!["webp".to_string(), "avif".to_string()],
            default_quality: 80,
            default_fit_mode: "cover".to_string(),
            default_max_width: None,
            default_max_height: None,
            theme: "system".to_string(),
            language: "en".to_string(),
            created_at: created,
            updated_at: created,
            total_uploads: 0,
            storage_used_bytes: 0,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct UpdateSettings {
    delivery_formats: Option<Vec<String>>,
    default_quality: Option<i64>,
    default_fit_mode: Option<String>,
    default_max_width: Option<i64>,
    default_max_height: Option<i64>,
    theme: Option<String>,
    language: Option<String>,
}

impl UpdateSettings {
    fn validate(&self) -> Result<(), Failure> {
        if let Some(q) = self.default_quality {
            if !(1..=100).contains(&q) {
                return Err(Failure::bad_request("default_quality must be between 1 and 100"));
            }
        }
        if let Some(mode) = &self.default_fit_mode {
            if !FIT_MODES.contains(&mode.as_str()) {
                return Err(Failure::bad_request(format!("unknown fit mode: {mode}")));
            }
        }
        if let Some(theme) = &self.theme {
            if !THEMES.contains(&theme.as_str()) {
                return Err(Failure::bad_request(format!("unknown theme: {theme}")));
            }
        }
        Ok(())
    }

    fn apply(self, settings: &mut Settings) {
        if let Some(v) = self.delivery_formats {
            settings.delivery_formats = v;
        }
        if let Some(v) = self.default_quality {
            settings.default_quality = v;
        }
        if let Some(v) = self.default_fit_mode {
            settings.default_fit_mode = v;
        }
        if let Some(v) = self.default_max_width {
            settings.default_max_width = Some(v);
        }
        if let Some(v) = self.default_max_height {
            settings.default_max_height = Some(v);
        }
        if let Some(v) = self.theme {
            settings.theme = v;
        }
        if let Some(v) = self.language {
            settings.language = v;
        }
        settings.updated_at = now();
    }
}

/// Settings with the upload counters derived from the image store.
fn snapshot(store: &Store) -> Settings {
    let mut settings = store.settings.clone();
    settings.total_uploads = store.images.len() as i64;
    settings.storage_used_bytes = storage_used(store);
    settings
}

fn storage_used(store: &Store) -> i64 {
    store.images.iter().map(|i| i.size()).sum()
}

pub(crate) async fn get_settings(State(state): State<AppState>) -> Json<Value> {
    let store = state.db.read().await;
    Json(json!({ "settings": snapshot(&store) }))
}

pub(crate) async fn update_settings(
    State(state): State<AppState>,
    Json(input): Json<UpdateSettings>,
) -> Result<Json<Value>, Failure> {
    input.validate()?;
    let mut store = state.db.write().await;
    input.apply(&mut store.settings);
    tracing::info!("settings updated");
    Ok(Json(json!({
        "settings": snapshot(&store),
        "message": "Settings updated",
    })))
}

pub(crate) async fn get_usage(State(state): State<AppState>) -> Json<Value> {
    let store = state.db.read().await;
    let plan = state.config.plan.as_str();
    let used = storage_used(&store);
    let (quota, api_requests, transformations) = quota(plan);
    Json(json!({
        "plan": plan,
        "plan_name": plan_name(plan),
        "plan_status": "active",
        "total_images": store.images.len(),
        "storage_used_bytes": used,
        "storage_used_mb": used as f64 / MIB,
        "storage_used_gb": used as f64 / GIB,
        "credits": {
            "storage_bytes": (quota - used).max(0),
            "api_requests": api_requests,
            "transformations": transformations,
        },
    }))
}

/// Storage bytes, API requests and transformations per plan.
fn quota(plan: &str) -> (i64, i64, i64) {
    match plan {
        "free" => (1 << 30, 10_000, 1_000),
        _ => (100 << 30, 1_000_000, 100_000),
    }
}

fn plan_name(plan: &str) -> String {
    let mut chars = plan.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
