//! Client configuration.

use std::time::Duration;

use url::Url;

use crate::error::ApiError;

pub const DEFAULT_SERVER_URL: &str = "https://api.img-src.io";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub const API_KEY_ENV: &str = "IMGSRC_API_KEY";
pub const SERVER_URL_ENV: &str = "IMGSRC_SERVER_URL";

/// Server location, credential and per-call deadline.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use imgsrc_core::ClientConfig;
///
/// let config = ClientConfig::new("imgsrc_live_xxx")
///     .with_server_url("http://localhost:8787")
///     .with_timeout(Duration::from_secs(5));
/// assert_eq!(config.server_url(), "http://localhost:8787");
/// ```
#[derive(Clone)]
pub struct ClientConfig {
    server_url: String,
    api_key: String,
    timeout: Duration,
    user_agent: String,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            api_key: api_key.into(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("imgsrc-rust/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Reads `IMGSRC_API_KEY` (required) and `IMGSRC_SERVER_URL` (optional).
    pub fn from_env() -> Result<Self, ApiError> {
        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ApiError::InvalidConfig(format!("{API_KEY_ENV} is not set")))?;
        let mut config = Self::new(api_key);
        if let Ok(url) = std::env::var(SERVER_URL_ENV) {
            if !url.is_empty() {
                config = config.with_server_url(url);
            }
        }
        config.validate()?;
        Ok(config)
    }

    pub fn with_server_url(mut self, server_url: impl Into<String>) -> Self {
        self.server_url = server_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// The server URL must be absolute http(s) and the key non-empty.
    pub fn validate(&self) -> Result<(), ApiError> {
        let url = Url::parse(&self.server_url)
            .map_err(|e| ApiError::InvalidConfig(format!("server URL {:?}: {e}", self.server_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ApiError::InvalidConfig(format!(
                "server URL {:?}: unsupported scheme {}",
                self.server_url,
                url.scheme()
            )));
        }
        if self.api_key.is_empty() {
            return Err(ApiError::InvalidConfig("API key is empty".to_string()));
        }
        Ok(())
    }
}

// Keeps the credential out of logs and panics.
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("server_url", &self.server_url)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}
