use std::path::Path as FsPath;

use axum::{
    body::Bytes,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{now, AppState, Failure};

const CDN_BASE: &str = "https://cdn.img-src.mock";
const DEFAULT_LIST_LIMIT: usize = 50;
const MAX_LIST_LIMIT: usize = 100;
const DEFAULT_SEARCH_LIMIT: usize = 20;
const DEFAULT_SIGNED_TTL: i64 = 3600;
const SIGNED_TTL_RANGE: std::ops::RangeInclusive<i64> = 60..=604_800;

#[derive(Clone, Debug)]
pub(crate) struct Image {
    id: String,
    hash: String,
    original_filename: String,
    sanitized_filename: String,
    size: i64,
    format: String,
    uploaded_at: DateTime<Utc>,
    url: String,
    paths: Vec<String>,
    visibility: String,
    signed: Option<(String, i64)>,
}

impl Image {
    pub(crate) fn size(&self) -> i64 {
        self.size
    }

    fn mime_type(&self) -> String {
        match self.format.as_str() {
            "svg" => "image/svg+xml".to_string(),
            other => format!("image/{other}"),
        }
    }

    fn matches(&self, needle: &str) -> bool {
        self.original_filename.to_lowercase().contains(needle)
            || self.paths.iter().any(|p| p.to_lowercase().contains(needle))
    }

    fn under(&self, prefix: &str) -> bool {
        prefix.is_empty() || self.paths.iter().any(|p| p.starts_with(prefix))
    }

    fn list_item(&self, at: i64) -> Value {
        let mut item = json!({
            "id": self.id,
            "original_filename": self.original_filename,
            "sanitized_filename": self.sanitized_filename,
            "size": self.size,
            "uploaded_at": self.uploaded_at,
            "url": self.url,
            "paths": self.paths,
            "visibility": self.visibility,
        });
        if let Some((signed_url, expires_at)) = &self.signed {
            if *expires_at > at {
                item["active_signed_url"] = json!({
                    "signed_url": signed_url,
                    "expires_at": expires_at,
                });
            }
        }
        item
    }

    fn search_result(&self) -> Value {
        json!({
            "id": self.id,
            "original_filename": self.original_filename,
            "paths": self.paths,
            "size": self.size,
            "uploaded_at": self.uploaded_at,
            "url": self.url,
            "visibility": self.visibility,
        })
    }
}

/// Lowercased filename restricted to `[a-z0-9._-]`.
fn sanitize(filename: &str) -> String {
    filename
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '.' | '_' | '-' => c,
            _ => '-',
        })
        .collect()
}

fn image_format(filename: &str) -> Option<&'static str> {
    let ext = FsPath::new(filename).extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("jpeg"),
        "png" => Some("png"),
        "gif" => Some("gif"),
        "webp" => Some("webp"),
        "avif" => Some("avif"),
        "svg" => Some("svg"),
        _ => None,
    }
}

/// FNV-1a; stands in for the service's content hash.
fn content_hash(bytes: &[u8]) -> String {
    let hash = bytes.iter().fold(0xcbf2_9ce4_8422_2325_u64, |h, b| {
        (h ^ u64::from(*b)).wrapping_mul(0x0100_0000_01b3)
    });
    format!("{hash:016x}")
}

fn parse_visibility(value: &str) -> Result<String, Failure> {
    match value {
        "public" | "private" => Ok(value.to_string()),
        other => Err(Failure::bad_request(format!("invalid visibility: {other}"))),
    }
}

fn image_not_found(id: &str) -> Failure {
    Failure::not_found("IMAGE_NOT_FOUND", format!("Image {id} not found"))
}

fn bad_multipart(err: impl std::fmt::Display) -> Failure {
    Failure::bad_request(format!("malformed multipart body: {err}"))
}

pub(crate) async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Value>), Failure> {
    let mut file: Option<(String, Bytes)> = None;
    let mut target_path = None;
    let mut visibility = None;

    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let bytes = field.bytes().await.map_err(bad_multipart)?;
                file = Some((file_name, bytes));
            }
            "target_path" => target_path = Some(field.text().await.map_err(bad_multipart)?),
            "visibility" => visibility = Some(field.text().await.map_err(bad_multipart)?),
            _ => {}
        }
    }

    let (original_filename, content) =
        file.ok_or_else(|| Failure::bad_request("missing file part"))?;
    if content.is_empty() {
        return Err(Failure::bad_request("file is empty"));
    }
    let format = image_format(&original_filename).ok_or_else(|| {
        Failure::bad_request(format!("unsupported file type: {original_filename}"))
    })?;
    let visibility = match visibility.as_deref() {
        None | Some("") => "public".to_string(),
        Some(v) => parse_visibility(v)?,
    };

    let sanitized_filename = sanitize(&original_filename);
    let dir = target_path.as_deref().unwrap_or_default().trim_matches('/');
    let path = if dir.is_empty() {
        sanitized_filename.clone()
    } else {
        format!("{dir}/{sanitized_filename}")
    };
    let hash = content_hash(&content);

    let mut store = state.db.write().await;

    // Identical content gains a path instead of a second copy.
    if let Some(existing) = store.images.iter_mut().find(|i| i.hash == hash) {
        if !existing.paths.contains(&path) {
            existing.paths.push(path);
        }
        tracing::info!(id = %existing.id, "duplicate upload, path added");
        return Ok((StatusCode::OK, Json(upload_body(existing))));
    }

    let image = Image {
        id: format!("img_{}", Uuid::new_v4().simple()),
        url: format!("{CDN_BASE}/{}/{path}", state.config.username),
        hash,
        original_filename,
        sanitized_filename,
        size: content.len() as i64,
        format: format.to_string(),
        uploaded_at: Utc::now(),
        paths: vec![path],
        visibility,
        signed: None,
    };
    tracing::info!(id = %image.id, size = image.size, "image uploaded");
    let body = upload_body(&image);
    store.images.insert(0, image);
    Ok((StatusCode::CREATED, Json(body)))
}

fn upload_body(image: &Image) -> Value {
    json!({
        "id": image.id,
        "hash": image.hash,
        "url": image.url,
        "paths": image.paths,
        "size": image.size,
        "format": image.format,
        "uploaded_at": image.uploaded_at,
        "visibility": image.visibility,
    })
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListQuery {
    limit: Option<usize>,
    offset: Option<usize>,
    path: Option<String>,
}

pub(crate) async fn list(State(state): State<AppState>, Query(query): Query<ListQuery>) -> Json<Value> {
    let limit = query.limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT);
    let offset = query.offset.unwrap_or(0);
    let prefix = query.path.as_deref().unwrap_or_default().trim_matches('/');

    let store = state.db.read().await;
    let at = now();
    let matching: Vec<&Image> = store.images.iter().filter(|i| i.under(prefix)).collect();
    let total = matching.len();
    let page: Vec<Value> = matching
        .iter()
        .skip(offset)
        .take(limit)
        .map(|i| i.list_item(at))
        .collect();
    let has_more = offset + page.len() < total;

    Json(json!({
        "images": page,
        "total": total,
        "limit": limit,
        "offset": offset,
        "has_more": has_more,
    }))
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchQuery {
    q: Option<String>,
    limit: Option<usize>,
}

pub(crate) async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Value>, Failure> {
    let q = query.q.unwrap_or_default();
    let needle = q.trim().to_lowercase();
    if needle.is_empty() {
        return Err(Failure::bad_request("query parameter q is required"));
    }
    let limit = query.limit.unwrap_or(DEFAULT_SEARCH_LIMIT).clamp(1, MAX_LIST_LIMIT);

    let store = state.db.read().await;
    let hits: Vec<&Image> = store.images.iter().filter(|i| i.matches(&needle)).collect();
    let results: Vec<Value> = hits.iter().take(limit).map(|i| i.search_result()).collect();

    Ok(Json(json!({
        "results": results,
        "total": hits.len(),
        "query": q,
    })))
}

pub(crate) async fn metadata(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, Failure> {
    let store = state.db.read().await;
    let image = store
        .images
        .iter()
        .find(|i| i.id == id)
        .ok_or_else(|| image_not_found(&id))?;
    let links = format!("/api/v1/images/{id}");

    Ok(Json(json!({
        "id": image.id,
        "metadata": {
            "hash": image.hash,
            "original_filename": image.original_filename,
            "size": image.size,
            "mime_type": image.mime_type(),
            "uploaded_at": image.uploaded_at,
        },
        "urls": {
            "original": image.url,
        },
        "visibility": image.visibility,
        "_links": {
            "self": links,
            "visibility": format!("{links}/visibility"),
            "signed_url": format!("{links}/signed-url"),
        },
    })))
}

#[derive(Debug, Deserialize)]
pub(crate) struct VisibilityBody {
    visibility: String,
}

pub(crate) async fn update_visibility(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<VisibilityBody>,
) -> Result<Json<Value>, Failure> {
    let visibility = parse_visibility(&input.visibility)?;
    let mut store = state.db.write().await;
    let image = store
        .images
        .iter_mut()
        .find(|i| i.id == id)
        .ok_or_else(|| image_not_found(&id))?;
    image.visibility = visibility;
    tracing::info!(%id, visibility = %image.visibility, "visibility updated");

    Ok(Json(json!({
        "id": image.id,
        "visibility": image.visibility,
        "message": format!("Visibility updated to {}", image.visibility),
    })))
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SignedUrlBody {
    #[serde(default)]
    expires_in_seconds: Option<i64>,
}

pub(crate) async fn create_signed_url(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<SignedUrlBody>,
) -> Result<Json<Value>, Failure> {
    if state.config.is_free() {
        return Err(Failure::plan_required("Signed URLs"));
    }
    let ttl = input.expires_in_seconds.unwrap_or(DEFAULT_SIGNED_TTL);
    if !SIGNED_TTL_RANGE.contains(&ttl) {
        return Err(Failure::bad_request(format!(
            "expires_in_seconds must be between {} and {}",
            SIGNED_TTL_RANGE.start(),
            SIGNED_TTL_RANGE.end()
        )));
    }

    let mut store = state.db.write().await;
    let image = store
        .images
        .iter_mut()
        .find(|i| i.id == id)
        .ok_or_else(|| image_not_found(&id))?;
    let expires_at = now() + ttl;
    let signed_url = format!(
        "{}?token={}&expires={expires_at}",
        image.url,
        Uuid::new_v4().simple()
    );
    image.signed = Some((signed_url.clone(), expires_at));

    Ok(Json(json!({
        "signed_url": signed_url,
        "expires_at": expires_at,
        "expires_in_seconds": ttl,
    })))
}

pub(crate) async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, Failure> {
    let mut store = state.db.write().await;
    let index = store
        .images
        .iter()
        .position(|i| i.id == id)
        .ok_or_else(|| image_not_found(&id))?;
    let image = store.images.remove(index);
    tracing::info!(%id, "image deleted");

    Ok(Json(json!({
        "success": true,
        "message": "Image deleted",
        "deleted_paths": image.paths,
    })))
}
