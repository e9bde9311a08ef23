use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Visibility;

/// A signed URL that is currently valid for an image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActiveSignedUrl {
    #[serde(deserialize_with = "super::null_as_default")]
    pub signed_url: String,
    /// Absolute expiry, epoch seconds.
    #[serde(deserialize_with = "super::null_as_default")]
    pub expires_at: i64,
}

impl ActiveSignedUrl {
    pub fn signed_url(&self) -> &str {
        &self.signed_url
    }

    pub fn expires_at(&self) -> i64 {
        self.expires_at
    }
}

/// Returned by the upload call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadResponse {
    #[serde(deserialize_with = "super::null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub hash: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub url: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub paths: Vec<String>,
    #[serde(deserialize_with = "super::null_as_default")]
    pub size: i64,
    #[serde(deserialize_with = "super::null_as_default")]
    pub format: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub uploaded_at: DateTime<Utc>,
    pub visibility: Visibility,
}

impl UploadResponse {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    pub fn size(&self) -> i64 {
        self.size
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    pub fn uploaded_at(&self) -> DateTime<Utc> {
        self.uploaded_at
    }

    pub fn visibility(&self) -> &Visibility {
        &self.visibility
    }
}

/// One entry of an image listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageListItem {
    #[serde(deserialize_with = "super::null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub original_filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sanitized_filename: Option<String>,
    #[serde(deserialize_with = "super::null_as_default")]
    pub size: i64,
    #[serde(deserialize_with = "super::null_as_default")]
    pub uploaded_at: DateTime<Utc>,
    #[serde(deserialize_with = "super::null_as_default")]
    pub url: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub paths: Vec<String>,
    pub visibility: Visibility,
    /// Present only while a signed URL is active for the image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_signed_url: Option<ActiveSignedUrl>,
}

impl ImageListItem {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn original_filename(&self) -> &str {
        &self.original_filename
    }

    pub fn sanitized_filename(&self) -> Option<&str> {
        self.sanitized_filename.as_deref()
    }

    pub fn size(&self) -> i64 {
        self.size
    }

    pub fn uploaded_at(&self) -> DateTime<Utc> {
        self.uploaded_at
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    pub fn visibility(&self) -> &Visibility {
        &self.visibility
    }

    pub fn active_signed_url(&self) -> Option<&ActiveSignedUrl> {
        self.active_signed_url.as_ref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageListResponse {
    #[serde(deserialize_with = "super::null_as_default")]
    pub images: Vec<ImageListItem>,
    #[serde(deserialize_with = "super::null_as_default")]
    pub total: i64,
    #[serde(deserialize_with = "super::null_as_default")]
    pub limit: i64,
    #[serde(deserialize_with = "super::null_as_default")]
    pub offset: i64,
    #[serde(deserialize_with = "super::null_as_default")]
    pub has_more: bool,
}

impl ImageListResponse {
    pub fn images(&self) -> &[ImageListItem] {
        &self.images
    }

    pub fn total(&self) -> i64 {
        self.total
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchResult {
    #[serde(deserialize_with = "super::null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub original_filename: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub paths: Vec<String>,
    #[serde(deserialize_with = "super::null_as_default")]
    pub size: i64,
    #[serde(deserialize_with = "super::null_as_default")]
    pub uploaded_at: DateTime<Utc>,
    #[serde(deserialize_with = "super::null_as_default")]
    pub url: String,
    pub visibility: Visibility,
}

impl SearchResult {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn original_filename(&self) -> &str {
        &self.original_filename
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    pub fn size(&self) -> i64 {
        self.size
    }

    pub fn uploaded_at(&self) -> DateTime<Utc> {
        self.uploaded_at
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn visibility(&self) -> &Visibility {
        &self.visibility
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchResponse {
    #[serde(deserialize_with = "super::null_as_default")]
    pub results: Vec<SearchResult>,
    #[serde(deserialize_with = "super::null_as_default")]
    pub total: i64,
    #[serde(deserialize_with = "super::null_as_default")]
    pub query: String,
}

impl SearchResponse {
    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    pub fn total(&self) -> i64 {
        self.total
    }

    pub fn query(&self) -> &str {
        &self.query
    }
}

/// File-level facts recorded at upload time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageMetadata {
    #[serde(deserialize_with = "super::null_as_default")]
    pub hash: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub original_filename: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub size: i64,
    #[serde(deserialize_with = "super::null_as_default")]
    pub mime_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploaded_at: Option<DateTime<Utc>>,
}

impl ImageMetadata {
    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn original_filename(&self) -> &str {
        &self.original_filename
    }

    pub fn size(&self) -> i64 {
        self.size
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn width(&self) -> Option<i64> {
        self.width
    }

    pub fn height(&self) -> Option<i64> {
        self.height
    }

    pub fn uploaded_at(&self) -> Option<DateTime<Utc>> {
        self.uploaded_at
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataResponse {
    #[serde(deserialize_with = "super::null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub metadata: ImageMetadata,
    /// Delivery URLs keyed by format.
    #[serde(deserialize_with = "super::null_as_default")]
    pub urls: BTreeMap<String, String>,
    pub visibility: Visibility,
    #[serde(rename = "_links")]
    #[serde(deserialize_with = "super::null_as_default")]
    pub links: BTreeMap<String, String>,
}

impl MetadataResponse {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn metadata(&self) -> &ImageMetadata {
        &self.metadata
    }

    pub fn urls(&self) -> &BTreeMap<String, String> {
        &self.urls
    }

    pub fn visibility(&self) -> &Visibility {
        &self.visibility
    }

    pub fn links(&self) -> &BTreeMap<String, String> {
        &self.links
    }
}

/// Body of the update-visibility call. Serializes to exactly
/// `{"visibility":"..."}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateVisibilityRequest {
    pub visibility: Visibility,
}

impl UpdateVisibilityRequest {
    pub fn new(visibility: Visibility) -> Self {
        Self { visibility }
    }

    pub fn visibility(&self) -> &Visibility {
        &self.visibility
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateVisibilityResponse {
    #[serde(deserialize_with = "super::null_as_default")]
    pub id: String,
    pub visibility: Visibility,
    #[serde(deserialize_with = "super::null_as_default")]
    pub message: String,
}

impl UpdateVisibilityResponse {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn visibility(&self) -> &Visibility {
        &self.visibility
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateSignedUrlRequest {
    /// Server default applies when omitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in_seconds: Option<i64>,
}

impl CreateSignedUrlRequest {
    pub fn expires_in_seconds(&self) -> Option<i64> {
        self.expires_in_seconds
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignedUrlResponse {
    #[serde(deserialize_with = "super::null_as_default")]
    pub signed_url: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub expires_at: i64,
    #[serde(deserialize_with = "super::null_as_default")]
    pub expires_in_seconds: i64,
}

impl SignedUrlResponse {
    pub fn signed_url(&self) -> &str {
        &self.signed_url
    }

    pub fn expires_at(&self) -> i64 {
        self.expires_at
    }

    pub fn expires_in_seconds(&self) -> i64 {
        self.expires_in_seconds
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeleteResponse {
    #[serde(deserialize_with = "super::null_as_default")]
    pub success: bool,
    #[serde(deserialize_with = "super::null_as_default")]
    pub message: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub deleted_paths: Vec<String>,
}

impl DeleteResponse {
    pub fn success(&self) -> bool {
        self.success
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn deleted_paths(&self) -> &[String] {
        &self.deleted_paths
    }
}
