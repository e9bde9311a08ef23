//! Synchronous client for the img-src image hosting API.
//!
//! # Overview
//! Upload, list, search, inspect, re-scope and delete hosted images; read and
//! update account settings and usage; manage transformation presets.
//!
//! # Design
//! - `ImgSrcClient` builds `HttpRequest` values and parses `HttpResponse`
//!   values without touching the network. It holds only the base URL and
//!   credentials, so it is cheap to clone and fully deterministic to test.
//! - Each operation is split into `build_*` (produces a request) and
//!   `parse_*` (consumes a response), keeping the I/O boundary explicit.
//! - `ImgSrc` pairs the client with a [`Transport`] (by default a blocking
//!   `ureq` agent) and exposes the operations grouped by resource.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod multipart;
pub mod operations;
pub mod sdk;
pub mod transport;
pub mod types;

pub use client::ImgSrcClient;
pub use config::ClientConfig;
pub use error::{classify, is_http_status, ApiError, Classified, ErrorDetail, ErrorResponse, FailureKind};
pub use http::{HttpMetadata, HttpMethod, HttpRequest, HttpResponse};
pub use operations::{ApiResponse, File, ListImagesRequest, SearchImagesRequest, UploadImageRequestBody};
pub use sdk::ImgSrc;
pub use transport::{Transport, UreqTransport};
pub use types::{IsExact, OrZero, PlanStatus, Visibility};
