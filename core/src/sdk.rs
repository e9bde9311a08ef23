//! Blocking dispatcher: `ImgSrcClient` plus a `Transport`.
//!
//! Every call builds one request, executes it on the calling thread and
//! parses the response. There is no retry, polling or shared mutable state;
//! waiting for eventually-consistent results (search indexing, for example)
//! is up to the caller.

use tracing::{debug, warn};

use crate::client::ImgSrcClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::operations::{self, ListImagesRequest, SearchImagesRequest, UploadImageRequestBody};
use crate::transport::{Transport, UreqTransport};
use crate::types;

/// Entry point of the library.
///
/// # Example
///
/// ```no_run
/// use imgsrc_core::{ClientConfig, ImgSrc};
///
/// # fn main() -> Result<(), imgsrc_core::ApiError> {
/// let sdk = ImgSrc::new(ClientConfig::new("imgsrc_live_xxx"))?;
/// let usage = sdk.usage().get()?;
/// if let Some(usage) = usage.body() {
///     println!("{} images on plan {}", usage.total_images(), usage.plan());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ImgSrc<T: Transport = UreqTransport> {
    client: ImgSrcClient,
    transport: T,
}

impl ImgSrc<UreqTransport> {
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let transport = UreqTransport::new(config.timeout());
        Self::with_transport(&config, transport)
    }

    /// Configuration from `IMGSRC_API_KEY` / `IMGSRC_SERVER_URL`.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::new(ClientConfig::from_env()?)
    }
}

impl<T: Transport> ImgSrc<T> {
    pub fn with_transport(config: &ClientConfig, transport: T) -> Result<Self, ApiError> {
        Ok(Self {
            client: ImgSrcClient::new(config)?,
            transport,
        })
    }

    /// The underlying request builder / response parser.
    pub fn client(&self) -> &ImgSrcClient {
        &self.client
    }

    pub fn settings(&self) -> Settings<'_, T> {
        Settings { sdk: self }
    }

    pub fn usage(&self) -> Usage<'_, T> {
        Usage { sdk: self }
    }

    pub fn images(&self) -> Images<'_, T> {
        Images { sdk: self }
    }

    pub fn presets(&self) -> Presets<'_, T> {
        Presets { sdk: self }
    }

    fn dispatch<R>(
        &self,
        operation: &'static str,
        request: Result<HttpRequest, ApiError>,
        parse: impl FnOnce(&ImgSrcClient, HttpResponse) -> Result<R, ApiError>,
    ) -> Result<R, ApiError> {
        let request = request?;
        debug!(operation, method = request.method.as_str(), url = %request.url, "sending request");

        let response = self.transport.execute(&request).map_err(|e| {
            warn!(operation, error = %e, "transport failure");
            e
        })?;
        debug!(operation, status = response.status, "received response");

        parse(&self.client, response).map_err(|e| {
            warn!(operation, status = ?e.status(), error = %e, "request failed");
            e
        })
    }
}

/// `/settings`.
pub struct Settings<'a, T: Transport> {
    sdk: &'a ImgSrc<T>,
}

impl<T: Transport> Settings<'_, T> {
    pub fn get(&self) -> Result<operations::GetSettingsResponse, ApiError> {
        let c = &self.sdk.client;
        self.sdk
            .dispatch("settings.get", c.build_get_settings(), ImgSrcClient::parse_get_settings)
    }

    pub fn update(
        &self,
        input: &types::UpdateSettingsRequest,
    ) -> Result<operations::UpdateSettingsResponse, ApiError> {
        let c = &self.sdk.client;
        self.sdk.dispatch(
            "settings.update",
            c.build_update_settings(input),
            ImgSrcClient::parse_update_settings,
        )
    }
}

/// `/usage`.
pub struct Usage<'a, T: Transport> {
    sdk: &'a ImgSrc<T>,
}

impl<T: Transport> Usage<'_, T> {
    pub fn get(&self) -> Result<operations::GetUsageResponse, ApiError> {
        let c = &self.sdk.client;
        self.sdk.dispatch("usage.get", c.build_get_usage(), ImgSrcClient::parse_get_usage)
    }
}

/// `/images`.
pub struct Images<'a, T: Transport> {
    sdk: &'a ImgSrc<T>,
}

impl<T: Transport> Images<'_, T> {
    pub fn upload(&self, input: &UploadImageRequestBody) -> Result<operations::UploadImageResponse, ApiError> {
        let c = &self.sdk.client;
        self.sdk
            .dispatch("images.upload", c.build_upload_image(input), ImgSrcClient::parse_upload_image)
    }

    pub fn list(&self, input: &ListImagesRequest) -> Result<operations::ListImagesResponse, ApiError> {
        let c = &self.sdk.client;
        self.sdk
            .dispatch("images.list", c.build_list_images(input), ImgSrcClient::parse_list_images)
    }

    pub fn search(&self, input: &SearchImagesRequest) -> Result<operations::SearchImagesResponse, ApiError> {
        let c = &self.sdk.client;
        self.sdk
            .dispatch("images.search", c.build_search_images(input), ImgSrcClient::parse_search_images)
    }

    pub fn get_metadata(&self, id: &str) -> Result<operations::GetImageMetadataResponse, ApiError> {
        let c = &self.sdk.client;
        self.sdk.dispatch(
            "images.get_metadata",
            c.build_get_image_metadata(id),
            ImgSrcClient::parse_get_image_metadata,
        )
    }

    pub fn update_visibility(
        &self,
        id: &str,
        body: types::UpdateVisibilityRequest,
    ) -> Result<operations::UpdateVisibilityResponse, ApiError> {
        let input = operations::UpdateVisibilityRequest {
            id: id.to_string(),
            body,
        };
        let c = &self.sdk.client;
        self.sdk.dispatch(
            "images.update_visibility",
            c.build_update_visibility(&input),
            ImgSrcClient::parse_update_visibility,
        )
    }

    pub fn create_signed_url(
        &self,
        id: &str,
        body: types::CreateSignedUrlRequest,
    ) -> Result<operations::CreateSignedUrlResponse, ApiError> {
        let input = operations::CreateSignedUrlRequest {
            id: id.to_string(),
            body,
        };
        let c = &self.sdk.client;
        self.sdk.dispatch(
            "images.create_signed_url",
            c.build_create_signed_url(&input),
            ImgSrcClient::parse_create_signed_url,
        )
    }

    pub fn delete(&self, id: &str) -> Result<operations::DeleteImageResponse, ApiError> {
        let c = &self.sdk.client;
        self.sdk
            .dispatch("images.delete", c.build_delete_image(id), ImgSrcClient::parse_delete_image)
    }
}

/// `/settings/presets`.
pub struct Presets<'a, T: Transport> {
    sdk: &'a ImgSrc<T>,
}

impl<T: Transport> Presets<'_, T> {
    pub fn list(&self) -> Result<operations::ListPresetsResponse, ApiError> {
        let c = &self.sdk.client;
        self.sdk
            .dispatch("presets.list", c.build_list_presets(), ImgSrcClient::parse_list_presets)
    }

    pub fn create(&self, input: &types::CreatePresetRequest) -> Result<operations::PresetResponse, ApiError> {
        let c = &self.sdk.client;
        self.sdk
            .dispatch("presets.create", c.build_create_preset(input), ImgSrcClient::parse_create_preset)
    }

    pub fn get(&self, id: &str) -> Result<operations::PresetResponse, ApiError> {
        let c = &self.sdk.client;
        self.sdk
            .dispatch("presets.get", c.build_get_preset(id), ImgSrcClient::parse_get_preset)
    }

    pub fn update(
        &self,
        id: &str,
        body: types::UpdatePresetRequest,
    ) -> Result<operations::PresetResponse, ApiError> {
        let input = operations::UpdatePresetRequest {
            id: id.to_string(),
            body,
        };
        let c = &self.sdk.client;
        self.sdk
            .dispatch("presets.update", c.build_update_preset(&input), ImgSrcClient::parse_update_preset)
    }

    pub fn delete(&self, id: &str) -> Result<operations::DeletePresetResponse, ApiError> {
        let c = &self.sdk.client;
        self.sdk
            .dispatch("presets.delete", c.build_delete_preset(id), ImgSrcClient::parse_delete_preset)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::error::is_http_status;
    use crate::http::HttpMethod;
    use crate::types::Visibility;

    fn sdk<F>(respond: F) -> ImgSrc<F>
    where
        F: Fn(&HttpRequest) -> Result<HttpResponse, ApiError> + Send + Sync,
    {
        let config = ClientConfig::new("key").with_server_url("http://mock.local");
        ImgSrc::with_transport(&config, respond).unwrap()
    }

    fn json(status: u16, body: &str) -> Result<HttpResponse, ApiError> {
        Ok(HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        })
    }

    #[test]
    fn update_visibility_sends_envelope_body_to_id_route() {
        let seen = Mutex::new(Vec::new());
        let sdk = sdk(|req: &HttpRequest| {
            seen.lock().unwrap().push((req.method, req.url.clone(), req.body_text().map(str::to_string)));
            json(200, r#"{"id":"img_1","visibility":"private","message":"ok"}"#)
        });

        let resp = sdk
            .images()
            .update_visibility("img_1", types::UpdateVisibilityRequest::new(Visibility::PRIVATE))
            .unwrap();
        assert_eq!(resp.body().unwrap().visibility(), &Visibility::PRIVATE);

        assert_eq!(
            *seen.lock().unwrap(),
            vec![(
                HttpMethod::Patch,
                "http://mock.local/api/v1/images/img_1/visibility".to_string(),
                Some(r#"{"visibility":"private"}"#.to_string()),
            )]
        );
    }

    #[test]
    fn transport_errors_propagate_unchanged() {
        let sdk = sdk(|_: &HttpRequest| Err(ApiError::Transport("connection refused".to_string())));
        let err = sdk.usage().get().unwrap_err();
        assert!(matches!(err, ApiError::Transport(ref m) if m == "connection refused"));
        assert!(err.status().is_none());
    }

    #[test]
    fn invalid_requests_never_reach_the_transport() {
        let sdk = sdk(|_: &HttpRequest| -> Result<HttpResponse, ApiError> {
            panic!("transport must not be called")
        });
        assert!(matches!(sdk.presets().get(""), Err(ApiError::InvalidRequest(_))));
    }

    #[test]
    fn plan_gated_calls_surface_403() {
        let sdk = sdk(|_: &HttpRequest| {
            json(403, r#"{"error":{"status":403,"code":"PLAN_REQUIRED","message":"Pro plan required"}}"#)
        });
        let err = sdk.presets().list().unwrap_err();
        assert!(is_http_status(&err, 403));
    }
}
