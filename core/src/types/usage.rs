use serde::{Deserialize, Serialize};

use super::PlanStatus;

/// Consumption counters for the current billing period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Credits {
    #[serde(deserialize_with = "super::null_as_default")]
    pub storage_bytes: i64,
    #[serde(deserialize_with = "super::null_as_default")]
    pub api_requests: i64,
    #[serde(deserialize_with = "super::null_as_default")]
    pub transformations: i64,
}

impl Credits {
    pub fn storage_bytes(&self) -> i64 {
        self.storage_bytes
    }

    pub fn api_requests(&self) -> i64 {
        self.api_requests
    }

    pub fn transformations(&self) -> i64 {
        self.transformations
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UsageResponse {
    #[serde(deserialize_with = "super::null_as_default")]
    pub plan: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub plan_name: String,
    pub plan_status: PlanStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription_ends_at: Option<i64>,
    #[serde(deserialize_with = "super::null_as_default")]
    pub total_images: i64,
    #[serde(deserialize_with = "super::null_as_default")]
    pub storage_used_bytes: i64,
    #[serde(deserialize_with = "super::null_as_default")]
    pub storage_used_mb: f64,
    #[serde(deserialize_with = "super::null_as_default")]
    pub storage_used_gb: f64,
    #[serde(deserialize_with = "super::null_as_default")]
    pub credits: Credits,
}

impl UsageResponse {
    pub fn plan(&self) -> &str {
        &self.plan
    }

    pub fn plan_name(&self) -> &str {
        &self.plan_name
    }

    pub fn plan_status(&self) -> &PlanStatus {
        &self.plan_status
    }

    pub fn subscription_ends_at(&self) -> Option<i64> {
        self.subscription_ends_at
    }

    pub fn total_images(&self) -> i64 {
        self.total_images
    }

    pub fn storage_used_bytes(&self) -> i64 {
        self.storage_used_bytes
    }

    pub fn storage_used_mb(&self) -> f64 {
        self.storage_used_mb
    }

    pub fn storage_used_gb(&self) -> f64 {
        self.storage_used_gb
    }

    pub fn credits(&self) -> Credits {
        self.credits
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::types::OrZero;

    #[test]
    fn credits_decode_and_default_to_zero() {
        let c: Credits =
            serde_json::from_str(r#"{"storage_bytes":10485760,"api_requests":2000,"transformations":750}"#).unwrap();
        assert_eq!(c.storage_bytes(), 10_485_760);
        assert_eq!(c.api_requests(), 2000);
        assert_eq!(c.transformations(), 750);

        let partial: Credits = serde_json::from_str(r#"{"api_requests":3}"#).unwrap();
        assert_eq!(partial, Credits { api_requests: 3, ..Default::default() });
    }

    #[test]
    fn absent_usage_has_zero_credits() {
        let absent: Option<&UsageResponse> = None;
        assert_eq!(absent.or_zero().credits(), Credits::default());
        assert_eq!(absent.or_zero().credits().transformations(), 0);
        assert!(!absent.or_zero().plan_status().is_exact());
    }

    #[test]
    fn usage_nests_credits_object() {
        let u = UsageResponse {
            plan: "pro".to_string(),
            plan_name: "Pro Plan".to_string(),
            plan_status: PlanStatus::ACTIVE,
            total_images: 42,
            storage_used_bytes: 5_000_000,
            storage_used_mb: 4.77,
            storage_used_gb: 0.005,
            credits: Credits {
                storage_bytes: 5_000_000,
                api_requests: 999,
                transformations: 123,
            },
            ..Default::default()
        };
        let v = serde_json::to_value(&u).unwrap();
        assert_eq!(
            v["credits"],
            json!({"storage_bytes": 5000000, "api_requests": 999, "transformations": 123})
        );
        assert_eq!(v["plan_status"], "active");
        assert!(v.get("subscription_ends_at").is_none());
    }

    #[test]
    fn null_plan_status_and_credits_decode_as_zero() {
        let u: UsageResponse =
            serde_json::from_str(r#"{"plan":"free","plan_status":null,"credits":null,"total_images":null}"#).unwrap();
        assert_eq!(u.plan(), "free");
        assert_eq!(u.plan_status().as_str(), "");
        assert!(!u.plan_status().is_exact());
        assert_eq!(u.credits(), Credits::default());
        assert_eq!(u.total_images(), 0);
        assert_eq!(u.subscription_ends_at(), None);
    }
}
