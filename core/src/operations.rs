//! Request and response envelopes.
//!
//! # Design
//! Some calls mix location-bound data (an image or preset id in the URL path,
//! a file part in a multipart form) with a JSON body. The envelopes keep both
//! halves in one value, but JSON encoding only ever sees the body half: the
//! path-bound id is never written to or read from the payload. The client
//! fills it into the URL.
//!
//! Response envelopes pair the parsed body with the HTTP metadata of the
//! response it came from.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::http::HttpMetadata;
use crate::multipart::Form;
use crate::types;

/// A parsed response: transport metadata plus the decoded body.
///
/// `body` is `None` for responses that carry no payload. Serializing emits
/// only the body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiResponse<T> {
    pub http_meta: HttpMetadata,
    pub body: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn http_meta(&self) -> &HttpMetadata {
        &self.http_meta
    }

    pub fn body(&self) -> Option<&T> {
        self.body.as_ref()
    }

    pub fn into_body(self) -> Option<T> {
        self.body
    }
}

impl<T: Serialize> Serialize for ApiResponse<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.body.serialize(serializer)
    }
}

pub type GetSettingsResponse = ApiResponse<types::SettingsResponse>;
pub type UpdateSettingsResponse = ApiResponse<types::SettingsUpdateResponse>;
pub type GetUsageResponse = ApiResponse<types::UsageResponse>;
pub type UploadImageResponse = ApiResponse<types::UploadResponse>;
pub type ListImagesResponse = ApiResponse<types::ImageListResponse>;
pub type SearchImagesResponse = ApiResponse<types::SearchResponse>;
pub type GetImageMetadataResponse = ApiResponse<types::MetadataResponse>;
pub type UpdateVisibilityResponse = ApiResponse<types::UpdateVisibilityResponse>;
pub type CreateSignedUrlResponse = ApiResponse<types::SignedUrlResponse>;
pub type DeleteImageResponse = ApiResponse<types::DeleteResponse>;
pub type ListPresetsResponse = ApiResponse<types::ListPresetsResponse>;
pub type PresetResponse = ApiResponse<types::Preset>;
pub type DeletePresetResponse = ApiResponse<types::DeletePresetResponse>;

/// The file part of an upload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct File {
    pub file_name: String,
    pub content: Vec<u8>,
}

impl File {
    pub fn new(file_name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            content: content.into(),
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }
}

/// Multipart body of the upload call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadImageRequestBody {
    pub file: Option<File>,
    /// Folder-like path the image is filed under, e.g. `photos/vacation.png`.
    pub target_path: Option<String>,
    pub visibility: Option<types::Visibility>,
}

impl UploadImageRequestBody {
    pub fn new(file: File) -> Self {
        Self {
            file: Some(file),
            ..Default::default()
        }
    }

    pub fn with_target_path(mut self, target_path: impl Into<String>) -> Self {
        self.target_path = Some(target_path.into());
        self
    }

    pub fn with_visibility(mut self, visibility: types::Visibility) -> Self {
        self.visibility = Some(visibility);
        self
    }

    pub fn file(&self) -> Option<&File> {
        self.file.as_ref()
    }

    pub fn target_path(&self) -> Option<&str> {
        self.target_path.as_deref()
    }

    pub fn visibility(&self) -> Option<&types::Visibility> {
        self.visibility.as_ref()
    }

    /// Multipart form: `file`, then `target_path` and `visibility` when set.
    pub fn to_form(&self, form: Form) -> Form {
        let mut form = form;
        if let Some(file) = &self.file {
            form = form.file("file", &file.file_name, file.content.clone());
        }
        if let Some(path) = &self.target_path {
            form = form.text("target_path", path);
        }
        if let Some(visibility) = &self.visibility {
            form = form.text("visibility", visibility.as_str());
        }
        form
    }
}

/// Query of the list call. Unset fields fall back to server defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListImagesRequest {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    /// Only images filed under this path.
    pub path: Option<String>,
}

impl ListImagesRequest {
    pub(crate) fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(limit) = self.limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(offset) = self.offset {
            query.push(("offset", offset.to_string()));
        }
        if let Some(path) = &self.path {
            query.push(("path", path.clone()));
        }
        query
    }
}

/// Query of the search call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchImagesRequest {
    pub q: String,
    pub limit: Option<i64>,
}

impl SearchImagesRequest {
    pub fn new(q: impl Into<String>) -> Self {
        Self {
            q: q.into(),
            limit: None,
        }
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub(crate) fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![("q", self.q.clone())];
        if let Some(limit) = self.limit {
            query.push(("limit", limit.to_string()));
        }
        query
    }
}

/// `PATCH /images/{id}/visibility`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateVisibilityRequest {
    /// Path-bound; never part of the JSON body.
    pub id: String,
    pub body: types::UpdateVisibilityRequest,
}

/// `POST /images/{id}/signed-url`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateSignedUrlRequest {
    pub id: String,
    pub body: types::CreateSignedUrlRequest,
}

/// `PUT /settings/presets/{id}`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdatePresetRequest {
    pub id: String,
    pub body: types::UpdatePresetRequest,
}

impl UpdateVisibilityRequest {
    pub fn new(id: impl Into<String>, visibility: types::Visibility) -> Self {
        Self {
            id: id.into(),
            body: types::UpdateVisibilityRequest::new(visibility),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn body(&self) -> &types::UpdateVisibilityRequest {
        &self.body
    }
}

impl CreateSignedUrlRequest {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn body(&self) -> &types::CreateSignedUrlRequest {
        &self.body
    }
}

impl UpdatePresetRequest {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn body(&self) -> &types::UpdatePresetRequest {
        &self.body
    }
}

// Path-bound envelopes encode as their body alone and decode the payload into
// the body, leaving `id` empty for the caller to fill.

impl Serialize for UpdateVisibilityRequest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.body.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for UpdateVisibilityRequest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let body = types::UpdateVisibilityRequest::deserialize(deserializer)?;
        Ok(Self {
            id: String::new(),
            body,
        })
    }
}

impl Serialize for CreateSignedUrlRequest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.body.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CreateSignedUrlRequest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let body = types::CreateSignedUrlRequest::deserialize(deserializer)?;
        Ok(Self {
            id: String::new(),
            body,
        })
    }
}

impl Serialize for UpdatePresetRequest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.body.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for UpdatePresetRequest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let body = types::UpdatePresetRequest::deserialize(deserializer)?;
        Ok(Self {
            id: String::new(),
            body,
        })
    }
}
