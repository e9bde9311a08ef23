//! Stateless HTTP request builder and response parser for the img-src API.
//!
//! # Design
//! `ImgSrcClient` holds only the parsed server URL and the static credential.
//! Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`. The
//! caller (usually [`crate::ImgSrc`]) executes the round-trip in between,
//! keeping this layer deterministic and free of I/O.

use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::config::ClientConfig;
use crate::error::{ApiError, ErrorResponse};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::multipart::Form;
use crate::operations::{
    self, ApiResponse, CreateSignedUrlRequest, ListImagesRequest, SearchImagesRequest,
    UpdatePresetRequest, UpdateVisibilityRequest, UploadImageRequestBody,
};
use crate::types::{CreatePresetRequest, UpdateSettingsRequest};

const API_PREFIX: [&str; 2] = ["api", "v1"];

/// Synchronous, stateless request builder / response parser.
#[derive(Clone)]
pub struct ImgSrcClient {
    base: Url,
    api_key: String,
    user_agent: String,
}

impl ImgSrcClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        config.validate()?;
        let base = Url::parse(config.server_url())
            .map_err(|e| ApiError::InvalidConfig(format!("server URL: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidConfig(format!(
                "server URL {base} cannot carry a path"
            )));
        }
        Ok(Self {
            base,
            api_key: config.api_key().to_string(),
            user_agent: config.user_agent().to_string(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    // --- settings ---

    pub fn build_get_settings(&self) -> Result<HttpRequest, ApiError> {
        self.request(HttpMethod::Get, &["settings"], &[])
    }

    pub fn build_update_settings(&self, input: &UpdateSettingsRequest) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Put, &["settings"], input)
    }

    pub fn parse_get_settings(&self, response: HttpResponse) -> Result<operations::GetSettingsResponse, ApiError> {
        parse_json(response)
    }

    pub fn parse_update_settings(
        &self,
        response: HttpResponse,
    ) -> Result<operations::UpdateSettingsResponse, ApiError> {
        parse_json(response)
    }

    // --- usage ---

    pub fn build_get_usage(&self) -> Result<HttpRequest, ApiError> {
        self.request(HttpMethod::Get, &["usage"], &[])
    }

    pub fn parse_get_usage(&self, response: HttpResponse) -> Result<operations::GetUsageResponse, ApiError> {
        parse_json(response)
    }

    // --- images ---

    pub fn build_upload_image(&self, input: &UploadImageRequestBody) -> Result<HttpRequest, ApiError> {
        self.build_upload_image_with(input, Form::new())
    }

    /// Upload with a caller-supplied (e.g. fixed-boundary) form.
    pub fn build_upload_image_with(
        &self,
        input: &UploadImageRequestBody,
        form: Form,
    ) -> Result<HttpRequest, ApiError> {
        if input.file().is_none() {
            return Err(ApiError::InvalidRequest("upload requires a file part".to_string()));
        }
        let form = input.to_form(form);
        let mut req = self.request(HttpMethod::Post, &["images"], &[])?;
        req.headers.push(("content-type".to_string(), form.content_type()));
        req.body = Some(form.encode());
        Ok(req)
    }

    pub fn build_list_images(&self, input: &ListImagesRequest) -> Result<HttpRequest, ApiError> {
        self.request(HttpMethod::Get, &["images"], &input.query())
    }

    pub fn build_search_images(&self, input: &SearchImagesRequest) -> Result<HttpRequest, ApiError> {
        if input.q.trim().is_empty() {
            return Err(ApiError::InvalidRequest("search query is empty".to_string()));
        }
        self.request(HttpMethod::Get, &["images", "search"], &input.query())
    }

    pub fn build_get_image_metadata(&self, id: &str) -> Result<HttpRequest, ApiError> {
        self.request(HttpMethod::Get, &["images", require_id(id, "image")?], &[])
    }

    pub fn build_update_visibility(&self, input: &UpdateVisibilityRequest) -> Result<HttpRequest, ApiError> {
        let id = require_id(input.id(), "image")?;
        self.json_request(HttpMethod::Patch, &["images", id, "visibility"], input)
    }

    pub fn build_create_signed_url(&self, input: &CreateSignedUrlRequest) -> Result<HttpRequest, ApiError> {
        let id = require_id(input.id(), "image")?;
        self.json_request(HttpMethod::Post, &["images", id, "signed-url"], input)
    }

    pub fn build_delete_image(&self, id: &str) -> Result<HttpRequest, ApiError> {
        self.request(HttpMethod::Delete, &["images", require_id(id, "image")?], &[])
    }

    pub fn parse_upload_image(&self, response: HttpResponse) -> Result<operations::UploadImageResponse, ApiError> {
        parse_json(response)
    }

    pub fn parse_list_images(&self, response: HttpResponse) -> Result<operations::ListImagesResponse, ApiError> {
        parse_json(response)
    }

    pub fn parse_search_images(
        &self,
        response: HttpResponse,
    ) -> Result<operations::SearchImagesResponse, ApiError> {
        parse_json(response)
    }

    pub fn parse_get_image_metadata(
        &self,
        response: HttpResponse,
    ) -> Result<operations::GetImageMetadataResponse, ApiError> {
        parse_json(response)
    }

    pub fn parse_update_visibility(
        &self,
        response: HttpResponse,
    ) -> Result<operations::UpdateVisibilityResponse, ApiError> {
        parse_json(response)
    }

    pub fn parse_create_signed_url(
        &self,
        response: HttpResponse,
    ) -> Result<operations::CreateSignedUrlResponse, ApiError> {
        parse_json(response)
    }

    pub fn parse_delete_image(&self, response: HttpResponse) -> Result<operations::DeleteImageResponse, ApiError> {
        parse_json(response)
    }

    // --- presets ---

    pub fn build_list_presets(&self) -> Result<HttpRequest, ApiError> {
        self.request(HttpMethod::Get, &["settings", "presets"], &[])
    }

    pub fn build_create_preset(&self, input: &CreatePresetRequest) -> Result<HttpRequest, ApiError> {
        if input.name.trim().is_empty() {
            return Err(ApiError::InvalidRequest("preset name is empty".to_string()));
        }
        self.json_request(HttpMethod::Post, &["settings", "presets"], input)
    }

    pub fn build_get_preset(&self, id: &str) -> Result<HttpRequest, ApiError> {
        self.request(HttpMethod::Get, &["settings", "presets", require_id(id, "preset")?], &[])
    }

    pub fn build_update_preset(&self, input: &UpdatePresetRequest) -> Result<HttpRequest, ApiError> {
        let id = require_id(input.id(), "preset")?;
        self.json_request(HttpMethod::Put, &["settings", "presets", id], input)
    }

    pub fn build_delete_preset(&self, id: &str) -> Result<HttpRequest, ApiError> {
        self.request(HttpMethod::Delete, &["settings", "presets", require_id(id, "preset")?], &[])
    }

    pub fn parse_list_presets(&self, response: HttpResponse) -> Result<operations::ListPresetsResponse, ApiError> {
        parse_json(response)
    }

    pub fn parse_create_preset(&self, response: HttpResponse) -> Result<operations::PresetResponse, ApiError> {
        parse_json(response)
    }

    pub fn parse_get_preset(&self, response: HttpResponse) -> Result<operations::PresetResponse, ApiError> {
        parse_json(response)
    }

    pub fn parse_update_preset(&self, response: HttpResponse) -> Result<operations::PresetResponse, ApiError> {
        parse_json(response)
    }

    pub fn parse_delete_preset(
        &self,
        response: HttpResponse,
    ) -> Result<operations::DeletePresetResponse, ApiError> {
        parse_json(response)
    }

    // --- plumbing ---

    fn url(&self, segments: &[&str], query: &[(&str, String)]) -> Result<String, ApiError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidConfig(format!("server URL {} cannot carry a path", self.base)))?
            .pop_if_empty()
            .extend(API_PREFIX)
            .extend(segments);
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in query {
                pairs.append_pair(k, v);
            }
        }
        Ok(url.into())
    }

    fn request(
        &self,
        method: HttpMethod,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest {
            method,
            url: self.url(segments, query)?,
            headers: vec![
                ("authorization".to_string(), format!("Bearer {}", self.api_key)),
                ("accept".to_string(), "application/json".to_string()),
                ("user-agent".to_string(), self.user_agent.clone()),
            ],
            body: None,
        })
    }

    fn json_request<T: Serialize>(
        &self,
        method: HttpMethod,
        segments: &[&str],
        input: &T,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_vec(input).map_err(ApiError::Serialization)?;
        let mut req = self.request(method, segments, &[])?;
        req.headers.push(("content-type".to_string(), "application/json".to_string()));
        req.body = Some(body);
        Ok(req)
    }
}

impl std::fmt::Debug for ImgSrcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImgSrcClient")
            .field("base", &self.base.as_str())
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}

fn require_id<'a>(id: &'a str, what: &str) -> Result<&'a str, ApiError> {
    if id.trim().is_empty() {
        return Err(ApiError::InvalidRequest(format!("{what} id is empty")));
    }
    Ok(id)
}

/// Map a non-2xx response to the matching `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    match serde_json::from_str::<ErrorResponse>(&response.body) {
        Ok(mut parsed) => {
            parsed.http_meta = response.metadata();
            Err(ApiError::Response(parsed))
        }
        Err(_) => Err(ApiError::Api {
            status: response.status,
            body: response.body.clone(),
            http_meta: response.metadata(),
        }),
    }
}

/// Decode a 2xx body. An empty body yields `body: None`.
fn parse_json<T: DeserializeOwned>(response: HttpResponse) -> Result<ApiResponse<T>, ApiError> {
    check_status(&response)?;
    let http_meta = response.metadata();
    if response.body.trim().is_empty() {
        return Ok(ApiResponse { http_meta, body: None });
    }
    let body = serde_json::from_str(&response.body).map_err(ApiError::Deserialization)?;
    Ok(ApiResponse {
        http_meta,
        body: Some(body),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::{classify, FailureKind};
    use crate::operations::File;
    use crate::types::{OrZero, Visibility};

    fn client() -> ImgSrcClient {
        ImgSrcClient::new(&ClientConfig::new("test-key").with_server_url("http://localhost:3000")).unwrap()
    }

    fn ok(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: body.to_string(),
        }
    }

    #[test]
    fn every_request_carries_credentials() {
        let req = client().build_get_settings().unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:3000/api/v1/settings");
        assert_eq!(req.header("Authorization"), Some("Bearer test-key"));
        assert_eq!(req.header("accept"), Some("application/json"));
        assert!(req.body.is_none());
    }

    #[test]
    fn base_path_prefix_is_kept() {
        let c = ImgSrcClient::new(&ClientConfig::new("k").with_server_url("https://proxy.example.com/imgsrc/")).unwrap();
        assert_eq!(c.build_get_usage().unwrap().url, "https://proxy.example.com/imgsrc/api/v1/usage");
    }

    #[test]
    fn list_images_encodes_query() {
        let req = client()
            .build_list_images(&ListImagesRequest {
                limit: Some(50),
                offset: None,
                path: Some("__sdk_e2e_test/rust/a b.png".to_string()),
            })
            .unwrap();
        assert_eq!(
            req.url,
            "http://localhost:3000/api/v1/images?limit=50&path=__sdk_e2e_test%2Frust%2Fa+b.png"
        );

        let bare = client().build_list_images(&ListImagesRequest::default()).unwrap();
        assert_eq!(bare.url, "http://localhost:3000/api/v1/images");
    }

    #[test]
    fn search_requires_query() {
        let req = client()
            .build_search_images(&SearchImagesRequest::new("test-image").with_limit(10))
            .unwrap();
        assert_eq!(req.url, "http://localhost:3000/api/v1/images/search?q=test-image&limit=10");
        assert!(matches!(
            client().build_search_images(&SearchImagesRequest::new("  ")),
            Err(ApiError::InvalidRequest(_))
        ));
    }

    #[test]
    fn ids_are_encoded_as_one_segment() {
        let req = client().build_get_image_metadata("a/b?c").unwrap();
        assert_eq!(req.url, "http://localhost:3000/api/v1/images/a%2Fb%3Fc");
        assert!(matches!(client().build_delete_image(""), Err(ApiError::InvalidRequest(_))));
    }

    #[test]
    fn update_visibility_keeps_id_out_of_body() {
        let input = UpdateVisibilityRequest::new("img_abc123", Visibility::PRIVATE);
        let req = client().build_update_visibility(&input).unwrap();
        assert_eq!(req.method, HttpMethod::Patch);
        assert_eq!(req.url, "http://localhost:3000/api/v1/images/img_abc123/visibility");
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert_eq!(req.body_text(), Some(r#"{"visibility":"private"}"#));
    }

    #[test]
    fn update_preset_routes_by_id() {
        let input = UpdatePresetRequest {
            id: "preset_1".to_string(),
            body: crate::types::UpdatePresetRequest {
                name: Some("renamed".to_string()),
                ..Default::default()
            },
        };
        let req = client().build_update_preset(&input).unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.url, "http://localhost:3000/api/v1/settings/presets/preset_1");
        let body: serde_json::Value = serde_json::from_slice(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({"name": "renamed"}));
    }

    #[test]
    fn upload_is_multipart() {
        let input = UploadImageRequestBody::new(File::new("test-image.png", b"png".to_vec()))
            .with_target_path("__sdk_e2e_test/rust/test-image.png")
            .with_visibility(Visibility::PUBLIC);
        let req = client()
            .build_upload_image_with(&input, Form::with_boundary("BOUNDARY"))
            .unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:3000/api/v1/images");
        assert_eq!(req.header("content-type"), Some("multipart/form-data; boundary=BOUNDARY"));
        let body = String::from_utf8(req.body.unwrap()).unwrap();
        assert!(body.starts_with("--BOUNDARY\r\n"));
        assert!(body.contains("filename=\"test-image.png\""));
        assert!(body.ends_with("--BOUNDARY--\r\n"));
    }

    #[test]
    fn upload_without_file_is_rejected() {
        let err = client().build_upload_image(&UploadImageRequestBody::default()).unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequest(_)));
    }

    #[test]
    fn parse_keeps_http_metadata() {
        let resp = client()
            .parse_update_visibility(ok(200, r#"{"id":"img_xyz","visibility":"private","message":"Image is now private"}"#))
            .unwrap();
        assert_eq!(resp.http_meta().status(), 200);
        assert_eq!(resp.http_meta().header("Content-Type"), Some("application/json"));
        let body = resp.body().unwrap();
        assert_eq!(body.visibility(), &Visibility::PRIVATE);
        assert_eq!(body.message(), "Image is now private");
    }

    #[test]
    fn empty_success_body_parses_to_none() {
        let resp = client().parse_delete_preset(ok(204, "")).unwrap();
        assert!(resp.body().is_none());
        assert!(!resp.body().or_zero().success());
    }

    #[test]
    fn structured_error_body_is_classified() {
        let err = client()
            .parse_create_signed_url(ok(
                403,
                r#"{"error":{"status":403,"code":"PLAN_REQUIRED","message":"Signed URLs require Pro"}}"#,
            ))
            .unwrap_err();
        let c = classify(&err).unwrap();
        assert_eq!(c.kind, FailureKind::ErrorResponse);
        assert_eq!(c.status, 403);
        match err {
            ApiError::Response(resp) => {
                assert_eq!(resp.error().code(), "PLAN_REQUIRED");
                assert_eq!(resp.http_meta.status, 403);
            }
            other => panic!("expected structured error, got {other:?}"),
        }
    }

    #[test]
    fn unparseable_error_body_is_api_error() {
        let err = client().parse_get_usage(ok(502, "<html>Bad Gateway</html>")).unwrap_err();
        assert!(matches!(err, ApiError::Api { status: 502, .. }));
        assert_eq!(classify(&err).unwrap().kind, FailureKind::Api);

        let err = client().parse_get_usage(ok(401, "")).unwrap_err();
        assert_eq!(err.status(), Some(401));
    }

    #[test]
    fn bad_success_json_is_fatal() {
        let err = client().parse_list_images(ok(200, "not json")).unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));

        let err = client().parse_list_images(ok(200, r#"{"images":"nope"}"#)).unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }

    #[test]
    fn unknown_fields_and_values_are_tolerated() {
        let resp = client()
            .parse_list_images(ok(
                200,
                r#"{"images":[{"id":"img_1","visibility":"team","brand_new_field":{"x":1}}],"total":1,"has_more":false,"folders":[]}"#,
            ))
            .unwrap();
        let list = resp.body().unwrap();
        assert_eq!(list.images()[0].visibility().as_str(), "team");
        assert!(!list.images()[0].visibility().is_exact());
    }
}
