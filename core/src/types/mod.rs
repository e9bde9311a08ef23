//! Domain DTOs for the img-src API.
//!
//! # Design
//! Response models mirror the service's JSON but decode leniently: every
//! struct is `#[serde(default)]`, so a missing field takes its zero value and
//! unknown fields are ignored. Strict shape checks would turn every additive
//! server change into a client outage.
//!
//! Each field has a getter. Combined with [`OrZero`], getters stay usable on
//! aggregates that may be absent, yielding zero values instead of failing.

use std::borrow::Cow;

use serde::{Deserialize, Deserializer};

mod images;
mod presets;
mod settings;
mod usage;
mod visibility;

pub use images::{
    ActiveSignedUrl, CreateSignedUrlRequest, DeleteResponse, ImageListItem, ImageListResponse,
    ImageMetadata, MetadataResponse, SearchResponse, SearchResult, SignedUrlResponse,
    UpdateVisibilityRequest, UpdateVisibilityResponse, UploadResponse,
};
pub use presets::{
    CreatePresetRequest, DeletePresetResponse, ListPresetsResponse, Preset, PresetParams,
    UpdatePresetRequest,
};
pub use settings::{SettingsResponse, SettingsUpdateResponse, UpdateSettingsRequest, UserSettings};
pub use usage::{Credits, UsageResponse};
pub use visibility::{IsExact, PlanStatus, Visibility};

/// Field decoder that reads an explicit JSON `null` as the zero value,
/// the same as an absent field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Absent-safe access to an optional aggregate.
///
/// `None` yields the type's zero value, so getters chain through optional
/// levels without pattern matching at every step:
///
/// ```
/// use imgsrc_core::types::{ImageListItem, OrZero};
///
/// let item: Option<ImageListItem> = None;
/// assert_eq!(item.as_ref().or_zero().active_signed_url().or_zero().expires_at(), 0);
/// ```
pub trait OrZero<'a> {
    type Target: Clone + Default + 'a;

    fn or_zero(self) -> Cow<'a, Self::Target>;
}

impl<'a, T: Clone + Default + 'a> OrZero<'a> for Option<&'a T> {
    type Target = T;

    fn or_zero(self) -> Cow<'a, T> {
        match self {
            Some(value) => Cow::Borrowed(value),
            None => Cow::Owned(T::default()),
        }
    }
}
