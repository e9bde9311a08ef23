use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::{now, AppState, Failure};

#[derive(Clone, Debug, Serialize)]
pub(crate) struct Preset {
    id: String,
    name: String,
    description: Option<String>,
    /// Stored and echoed verbatim, key order included.
    params: Map<String, Value>,
    created_at: i64,
    updated_at: i64,
    usage_count: i64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreatePreset {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    params: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UpdatePreset {
    name: Option<String>,
    description: Option<String>,
    params: Option<Map<String, Value>>,
}

fn require_paid(state: &AppState) -> Result<(), Failure> {
    if state.config.is_free() {
        return Err(Failure::plan_required("Presets"));
    }
    Ok(())
}

fn validate_name(name: &str) -> Result<String, Failure> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Failure::bad_request("preset name must not be empty"));
    }
    Ok(name.to_string())
}

fn preset_not_found(id: &str) -> Failure {
    Failure::not_found("PRESET_NOT_FOUND", format!("Preset {id} not found"))
}

pub(crate) async fn list(State(state): State<AppState>) -> Result<Json<Value>, Failure> {
    require_paid(&state)?;
    let store = state.db.read().await;
    Ok(Json(json!({
        "presets": store.presets,
        "total": store.presets.len(),
    })))
}

pub(crate) async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreatePreset>,
) -> Result<(StatusCode, Json<Preset>), Failure> {
    require_paid(&state)?;
    let name = validate_name(&input.name)?;

    let mut store = state.db.write().await;
    if store.presets.iter().any(|p| p.name == name) {
        return Err(Failure::conflict(
            "PRESET_EXISTS",
            format!("A preset named {name} already exists"),
        ));
    }
    let created = now();
    let preset = Preset {
        id: format!("preset_{}", Uuid::new_v4().simple()),
        name,
        description: input.description,
        params: input.params,
        created_at: created,
        updated_at: created,
        usage_count: 0,
    };
    tracing::info!(id = %preset.id, name = %preset.name, "preset created");
    store.presets.push(preset.clone());
    Ok((StatusCode::CREATED, Json(preset)))
}

pub(crate) async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Preset>, Failure> {
    require_paid(&state)?;
    let store = state.db.read().await;
    store
        .presets
        .iter()
        .find(|p| p.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(|| preset_not_found(&id))
}

pub(crate) async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<UpdatePreset>,
) -> Result<Json<Preset>, Failure> {
    require_paid(&state)?;
    let name = input.name.as_deref().map(validate_name).transpose()?;

    let mut store = state.db.write().await;
    let preset = store
        .presets
        .iter_mut()
        .find(|p| p.id == id)
        .ok_or_else(|| preset_not_found(&id))?;
    if let Some(name) = name {
        preset.name = name;
    }
    if let Some(description) = input.description {
        preset.description = Some(description);
    }
    if let Some(params) = input.params {
        preset.params = params;
    }
    preset.updated_at = now();
    Ok(Json(preset.clone()))
}

pub(crate) async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, Failure> {
    require_paid(&state)?;
    let mut store = state.db.write().await;
    let index = store
        .presets
        .iter()
        .position(|p| p.id == id)
        .ok_or_else(|| preset_not_found(&id))?;
    store.presets.remove(index);
    tracing::info!(%id, "preset deleted");
    Ok(Json(json!({
        "success": true,
        "message": "Preset deleted",
    })))
}
