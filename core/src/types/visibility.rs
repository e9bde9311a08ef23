//! Open string enums.
//!
//! # Design
//! The service may start sending new values before this crate learns about
//! them, so these are newtypes over `String` rather than closed Rust enums.
//! Any string decodes, every string re-encodes verbatim, and `is_exact`
//! tells the caller whether the value is one of the documented constants.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Who can fetch an image through the CDN.
///
/// Known values are [`Visibility::PUBLIC`] and [`Visibility::PRIVATE`]; any
/// other string is kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Visibility(Cow<'static, str>);

impl Visibility {
    pub const PUBLIC: Visibility = Visibility(Cow::Borrowed("public"));
    pub const PRIVATE: Visibility = Visibility(Cow::Borrowed("private"));

    const KNOWN: [&'static str; 2] = ["public", "private"];

    pub fn new(value: impl Into<String>) -> Self {
        Visibility(Cow::Owned(value.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True only for the documented constants. Empty and unrecognised
    /// values report `false`.
    pub fn is_exact(&self) -> bool {
        Self::KNOWN.contains(&self.as_str())
    }
}

impl From<&str> for Visibility {
    fn from(value: &str) -> Self {
        Visibility::new(value)
    }
}

impl From<String> for Visibility {
    fn from(value: String) -> Self {
        Visibility::new(value)
    }
}

// `null` reads as the empty value, like an absent field.
impl<'de> Deserialize<'de> for Visibility {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Option::<String>::deserialize(deserializer)?.map(Visibility::new).unwrap_or_default())
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Subscription state reported by the usage endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PlanStatus(Cow<'static, str>);

impl PlanStatus {
    pub const ACTIVE: PlanStatus = PlanStatus(Cow::Borrowed("active"));
    pub const CANCELLING: PlanStatus = PlanStatus(Cow::Borrowed("cancelling"));
    pub const EXPIRED: PlanStatus = PlanStatus(Cow::Borrowed("expired"));

    const KNOWN: [&'static str; 3] = ["active", "cancelling", "expired"];

    pub fn new(value: impl Into<String>) -> Self {
        PlanStatus(Cow::Owned(value.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_exact(&self) -> bool {
        Self::KNOWN.contains(&self.as_str())
    }
}

impl From<&str> for PlanStatus {
    fn from(value: &str) -> Self {
        PlanStatus::new(value)
    }
}

impl From<String> for PlanStatus {
    fn from(value: String) -> Self {
        PlanStatus::new(value)
    }
}

impl<'de> Deserialize<'de> for PlanStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Option::<String>::deserialize(deserializer)?.map(PlanStatus::new).unwrap_or_default())
    }
}

impl fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `is_exact` for a value that may be absent. Absent is never exact.
pub trait IsExact {
    fn is_exact(&self) -> bool;
}

impl IsExact for Option<&Visibility> {
    fn is_exact(&self) -> bool {
        self.is_some_and(Visibility::is_exact)
    }
}

impl IsExact for Option<Visibility> {
    fn is_exact(&self) -> bool {
        self.as_ref().is_some_and(Visibility::is_exact)
    }
}

impl IsExact for Option<&PlanStatus> {
    fn is_exact(&self) -> bool {
        self.is_some_and(PlanStatus::is_exact)
    }
}

impl IsExact for Option<PlanStatus> {
    fn is_exact(&self) -> bool {
        self.as_ref().is_some_and(PlanStatus::is_exact)
    }
}
