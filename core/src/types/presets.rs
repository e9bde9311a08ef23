use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Transform parameters of a preset (`w`, `h`, `fit`, ...).
///
/// The schema is owned by the server. Keys keep insertion order and values
/// are carried through untouched.
pub type PresetParams = Map<String, Value>;

/// A named, reusable set of transform parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preset {
    #[serde(deserialize_with = "super::null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(deserialize_with = "super::null_as_default")]
    pub params: PresetParams,
    #[serde(deserialize_with = "super::null_as_default")]
    pub created_at: i64,
    #[serde(deserialize_with = "super::null_as_default")]
    pub updated_at: i64,
    #[serde(deserialize_with = "super::null_as_default")]
    pub usage_count: i64,
}

impl Preset {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn params(&self) -> &PresetParams {
        &self.params
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    pub fn updated_at(&self) -> i64 {
        self.updated_at
    }

    pub fn usage_count(&self) -> i64 {
        self.usage_count
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreatePresetRequest {
    #[serde(deserialize_with = "super::null_as_default")]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(deserialize_with = "super::null_as_default")]
    pub params: PresetParams,
}

impl CreatePresetRequest {
    pub fn new(name: impl Into<String>, params: PresetParams) -> Self {
        Self {
            name: name.into(),
            description: None,
            params,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Partial update; `None` fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdatePresetRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<PresetParams>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListPresetsResponse {
    #[serde(deserialize_with = "super::null_as_default")]
    pub presets: Vec<Preset>,
    #[serde(deserialize_with = "super::null_as_default")]
    pub total: i64,
}

impl ListPresetsResponse {
    pub fn presets(&self) -> &[Preset] {
        &self.presets
    }

    pub fn total(&self) -> i64 {
        self.total
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeletePresetResponse {
    #[serde(deserialize_with = "super::null_as_default")]
    pub success: bool,
    #[serde(deserialize_with = "super::null_as_default")]
    pub message: String,
}

impl DeletePresetResponse {
    pub fn success(&self) -> bool {
        self.success
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
