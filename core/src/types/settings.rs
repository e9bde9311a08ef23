use serde::{Deserialize, Serialize};

/// Account-level defaults applied to image delivery.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    #[serde(deserialize_with = "super::null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(deserialize_with = "super::null_as_default")]
    pub plan: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub delivery_formats: Vec<String>,
    #[serde(deserialize_with = "super::null_as_default")]
    pub default_quality: i64,
    #[serde(deserialize_with = "super::null_as_default")]
    pub default_fit_mode: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_max_width: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_max_height: Option<i64>,
    #[serde(deserialize_with = "super::null_as_default")]
    pub theme: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub language: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub created_at: i64,
    #[serde(deserialize_with = "super::null_as_default")]
    pub updated_at: i64,
    #[serde(deserialize_with = "super::null_as_default")]
    pub total_uploads: i64,
    #[serde(deserialize_with = "super::null_as_default")]
    pub storage_used_bytes: i64,
}

impl UserSettings {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn plan(&self) -> &str {
        &self.plan
    }

    pub fn delivery_formats(&self) -> &[String] {
        &self.delivery_formats
    }

    pub fn default_quality(&self) -> i64 {
        self.default_quality
    }

    pub fn default_fit_mode(&self) -> &str {
        &self.default_fit_mode
    }

    pub fn default_max_width(&self) -> Option<i64> {
        self.default_max_width
    }

    pub fn default_max_height(&self) -> Option<i64> {
        self.default_max_height
    }

    pub fn theme(&self) -> &str {
        &self.theme
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    pub fn updated_at(&self) -> i64 {
        self.updated_at
    }

    pub fn total_uploads(&self) -> i64 {
        self.total_uploads
    }

    pub fn storage_used_bytes(&self) -> i64 {
        self.storage_used_bytes
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsResponse {
    #[serde(deserialize_with = "super::null_as_default")]
    pub settings: UserSettings,
}

impl SettingsResponse {
    pub fn settings(&self) -> &UserSettings {
        &self.settings
    }
}

/// Partial update. Only the fields that are `Some` are sent; the server
/// leaves the rest unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateSettingsRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_formats: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_quality: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_fit_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_max_width: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_max_height: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsUpdateResponse {
    #[serde(deserialize_with = "super::null_as_default")]
    pub settings: UserSettings,
    #[serde(deserialize_with = "super::null_as_default")]
    pub message: String,
}

impl SettingsUpdateResponse {
    pub fn settings(&self) -> &UserSettings {
        &self.settings
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
