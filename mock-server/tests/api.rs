use axum::{
    body::Body,
    http::{self, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use mock_server::{app, app_with, MockConfig, DEFAULT_API_KEY};
use serde_json::Value;
use tower::ServiceExt;

const BOUNDARY: &str = "test-boundary";

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn authed(method: &str, uri: &str) -> http::request::Builder {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::AUTHORIZATION, format!("Bearer {DEFAULT_API_KEY}"))
}

fn get(uri: &str) -> Request<Body> {
    authed("GET", uri).body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    authed(method, uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn upload_request(file_name: &str, content: &[u8], fields: &[(&str, &str)]) -> Request<Body> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                .as_bytes(),
        );
    }
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    authed("POST", "/api/v1/images")
        .header(
            http::header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn upload(app: &Router, file_name: &str, content: &[u8], fields: &[(&str, &str)]) -> Value {
    let resp = app
        .clone()
        .oneshot(upload_request(file_name, content, fields))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    body_json(resp).await
}

// --- auth ---

#[tokio::test]
async fn missing_bearer_is_bare_401() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri("/api/v1/usage")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(body_bytes(resp).await.is_empty());
}

#[tokio::test]
async fn wrong_bearer_is_rejected() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri("/api/v1/settings")
                .header(http::header::AUTHORIZATION, "Bearer nope")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// --- settings & usage ---

#[tokio::test]
async fn settings_update_is_partial() {
    let app = app();
    let resp = app
        .clone()
        .oneshot(json_request("PUT", "/api/v1/settings", r#"{"theme":"dark"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["settings"]["theme"], "dark");
    assert_eq!(body["settings"]["default_quality"], 80);
    assert_eq!(body["message"], "Settings updated");

    let resp = app.oneshot(get("/api/v1/settings")).await.unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["settings"]["theme"], "dark");
}

#[tokio::test]
async fn settings_update_validates_quality() {
    let resp = app()
        .oneshot(json_request("PUT", "/api/v1/settings", r#"{"default_quality":150}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["error"]["status"], 400);
}

#[tokio::test]
async fn usage_counts_uploaded_bytes() {
    let app = app();
    upload(&app, "a.png", b"12345", &[]).await;

    let resp = app.oneshot(get("/api/v1/usage")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["plan"], "pro");
    assert_eq!(body["plan_name"], "Pro");
    assert_eq!(body["plan_status"], "active");
    assert_eq!(body["total_images"], 1);
    assert_eq!(body["storage_used_bytes"], 5);
}

// --- images ---

#[tokio::test]
async fn upload_places_file_under_target_path() {
    let app = app();
    let body = upload(
        &app,
        "Cat Photo.PNG",
        b"\x89PNG....",
        &[("target_path", "/pets/"), ("visibility", "private")],
    )
    .await;

    assert_eq!(body["paths"][0], "pets/cat-photo.png");
    assert_eq!(body["format"], "png");
    assert_eq!(body["visibility"], "private");
    assert_eq!(body["size"], 8);
    assert!(body["id"].as_str().unwrap().starts_with("img_"));
}

#[tokio::test]
async fn upload_without_file_is_400() {
    let req = authed("POST", "/api/v1/images")
        .header(
            http::header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"visibility\"\r\n\r\npublic\r\n--{BOUNDARY}--\r\n"
        )))
        .unwrap();
    let resp = app().oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["error"]["message"], "missing file part");
}

#[tokio::test]
async fn upload_rejects_unknown_visibility() {
    let resp = app()
        .oneshot(upload_request("a.png", b"x", &[("visibility", "unlisted")]))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_filters_by_path_and_pages() {
    let app = app();
    upload(&app, "a.png", b"a", &[("target_path", "album")]).await;
    upload(&app, "b.png", b"b", &[("target_path", "album")]).await;
    upload(&app, "c.png", b"c", &[]).await;

    let resp = app
        .clone()
        .oneshot(get("/api/v1/images?path=album&limit=1"))
        .await
        .unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["total"], 2);
    assert_eq!(body["images"].as_array().unwrap().len(), 1);
    assert_eq!(body["has_more"], true);

    let resp = app
        .oneshot(get("/api/v1/images?path=album&limit=1&offset=1"))
        .await
        .unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["offset"], 1);
    assert_eq!(body["has_more"], false);
}

#[tokio::test]
async fn search_requires_query() {
    let resp = app().oneshot(get("/api/v1/images/search?q=")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn search_matches_filename_case_insensitively() {
    let app = app();
    upload(&app, "Sunset.jpg", b"sun", &[]).await;
    upload(&app, "forest.jpg", b"tree", &[]).await;

    let resp = app.oneshot(get("/api/v1/images/search?q=SUNSET")).await.unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["query"], "SUNSET");
    assert_eq!(body["results"][0]["original_filename"], "Sunset.jpg");
}

#[tokio::test]
async fn metadata_for_unknown_image_is_structured_404() {
    let resp = app().oneshot(get("/api/v1/images/img_missing")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = body_json(resp).await;
    assert_eq!(body["error"]["status"], 404);
    assert_eq!(body["error"]["code"], "IMAGE_NOT_FOUND");
}

#[tokio::test]
async fn signed_urls_require_paid_plan() {
    let config = MockConfig {
        plan: "free".to_string(),
        ..MockConfig::default()
    };
    let app = app_with(config);
    let uploaded = upload(&app, "a.png", b"a", &[]).await;
    let id = uploaded["id"].as_str().unwrap();

    let resp = app
        .oneshot(json_request(
            "POST",
            &format!("/api/v1/images/{id}/signed-url"),
            "{}",
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body = body_json(resp).await;
    assert_eq!(body["error"]["code"], "PLAN_REQUIRED");
}

// --- full image lifecycle ---

#[tokio::test]
async fn image_lifecycle() {
    let app = app();
    let uploaded = upload(&app, "photo.webp", b"webp-bytes", &[]).await;
    let id = uploaded["id"].as_str().unwrap().to_string();

    // metadata
    let resp = app.clone().oneshot(get(&format!("/api/v1/images/{id}"))).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let meta = body_json(resp).await;
    assert_eq!(meta["visibility"], "public");
    assert_eq!(meta["metadata"]["mime_type"], "image/webp");
    assert_eq!(meta["_links"]["self"], format!("/api/v1/images/{id}"));

    // visibility toggle
    let resp = app
        .clone()
        .oneshot(json_request(
            "PATCH",
            &format!("/api/v1/images/{id}/visibility"),
            r#"{"visibility":"private"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["visibility"], "private");

    // signed url shows up in listing
    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("/api/v1/images/{id}/signed-url"),
            r#"{"expires_in_seconds":600}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let signed = body_json(resp).await;
    assert_eq!(signed["expires_in_seconds"], 600);

    let resp = app.clone().oneshot(get("/api/v1/images")).await.unwrap();
    let list = body_json(resp).await;
    assert_eq!(list["images"][0]["active_signed_url"]["signed_url"], signed["signed_url"]);

    // delete
    let resp = app
        .clone()
        .oneshot(authed("DELETE", &format!("/api/v1/images/{id}")).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let deleted = body_json(resp).await;
    assert_eq!(deleted["success"], true);
    assert_eq!(deleted["deleted_paths"][0], "photo.webp");

    let resp = app.oneshot(get(&format!("/api/v1/images/{id}"))).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- presets ---

#[tokio::test]
async fn presets_forbidden_on_free_plan() {
    let config = MockConfig {
        plan: "free".to_string(),
        ..MockConfig::default()
    };
    let resp = app_with(config)
        .oneshot(get("/api/v1/settings/presets"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn preset_lifecycle_preserves_param_order() {
    let app = app();
    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/settings/presets",
            r#"{"name":"thumb","params":{"w":200,"h":200,"fit":"cover"}}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let raw = body_bytes(resp).await;
    let text = std::str::from_utf8(&raw).unwrap();
    assert!(text.contains(r#""params":{"w":200,"h":200,"fit":"cover"}"#));
    let created: Value = serde_json::from_slice(&raw).unwrap();
    let id = created["id"].as_str().unwrap().to_string();

    let resp = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/v1/settings/presets/{id}"),
            r#"{"description":"square thumbnail"}"#,
        ))
        .await
        .unwrap();
    let updated = body_json(resp).await;
    assert_eq!(updated["name"], "thumb");
    assert_eq!(updated["description"], "square thumbnail");

    let resp = app.clone().oneshot(get("/api/v1/settings/presets")).await.unwrap();
    assert_eq!(body_json(resp).await["total"], 1);

    let resp = app
        .clone()
        .oneshot(
            authed("DELETE", &format!("/api/v1/settings/presets/{id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(body_json(resp).await["success"], true);

    let resp = app
        .oneshot(get(&format!("/api/v1/settings/presets/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn duplicate_preset_name_conflicts() {
    let app = app();
    let body = r#"{"name":"thumb","params":{}}"#;
    let resp = app
        .clone()
        .oneshot(json_request("POST", "/api/v1/settings/presets", body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = app
        .oneshot(json_request("POST", "/api/v1/settings/presets", body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}
