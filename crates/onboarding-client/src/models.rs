//! Onboarding request payloads exchanged with the broker and MCP servers.
//!
//! Decoding is deliberately lenient: the request usually comes from model
//! output, and anything that is well-formed JSON is forwarded. Missing fields
//! decode as empty and are left out again when re-encoded; `null` counts as
//! missing, other non-string scalars are kept as their JSON text, and unknown
//! fields are kept in `extra` and passed through.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Employee id the asset allocation probe uses in place of a real one.
pub const PROBE_EMPLOYEE_ID: &str = "TEST001";

fn str_is_empty(s: &str) -> bool {
    s.is_empty()
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_opt_string(deserializer)?.unwrap_or_default())
}

fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

/// One requested piece of equipment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRequest {
    /// laptop, monitor, phone, ...
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "str_is_empty"
    )]
    pub category: String,
    #[serde(
        default,
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub specifications: Option<String>,
    /// e.g. `quantity`
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Structured new-hire record submitted to the onboarding services.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingRequest {
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "str_is_empty"
    )]
    pub first_name: String,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "str_is_empty"
    )]
    pub last_name: String,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "str_is_empty"
    )]
    pub email: String,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "str_is_empty"
    )]
    pub department: String,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "str_is_empty"
    )]
    pub position: String,
    /// `YYYY-MM-DD`
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "str_is_empty"
    )]
    pub start_date: String,
    #[serde(
        default,
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub manager: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub manager_email: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assets: Option<Vec<AssetRequest>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl OnboardingRequest {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// True when the record carries nothing at all, as for a bare `{}`.
    pub fn is_empty(&self) -> bool {
        self.first_name.is_empty()
            && self.last_name.is_empty()
            && self.email.is_empty()
            && self.department.is_empty()
            && self.position.is_empty()
            && self.start_date.is_empty()
            && self.manager.is_none()
            && self.manager_email.is_none()
            && self.company_name.is_none()
            && self.assets.is_none()
            && self.extra.is_empty()
    }

    /// Requested assets, empty when the model supplied none.
    pub fn assets(&self) -> &[AssetRequest] {
        self.assets.as_deref().unwrap_or_default()
    }
}

/// Body for `allocate-assets`: the request's identity fields under a probe id.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetAllocationProbe<'a> {
    pub employee_id: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub department: &'a str,
    pub position: &'a str,
    pub assets: &'a [AssetRequest],
}

impl<'a> From<&'a OnboardingRequest> for AssetAllocationProbe<'a> {
    fn from(request: &'a OnboardingRequest) -> Self {
        Self {
            employee_id: PROBE_EMPLOYEE_ID,
            first_name: &request.first_name,
            last_name: &request.last_name,
            email: &request.email,
            department: &request.department,
            position: &request.position,
            assets: request.assets(),
        }
    }
}

/// Body for `test-email-config`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailConfigProbe<'a> {
    pub test_email: &'a str,
}

/// Body for `get-onboarding-status`; the id is echoed back as the broker sent it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusLookup<'a> {
    pub employee_id: &'a Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decodes_documented_schema() {
        let request: OnboardingRequest = serde_json::from_value(json!({
            "firstName": "Sarah",
            "lastName": "Johnson",
            "email": "sarah.johnson@techcorp.com",
            "department": "Engineering",
            "position": "Senior Software Engineer",
            "startDate": "2024-03-01",
            "manager": "Mike Chen",
            "managerEmail": "mike.chen@techcorp.com",
            "assets": [
                {"category": "laptop", "specifications": "MacBook Pro"},
                {"category": "monitor"}
            ]
        }))
        .unwrap();

        assert_eq!(request.full_name(), "Sarah Johnson");
        assert_eq!(request.manager.as_deref(), Some("Mike Chen"));
        assert!(request.company_name.is_none());
        assert_eq!(request.assets().len(), 2);
        assert_eq!(request.assets()[1].specifications, None);
    }

    #[test]
    fn test_missing_fields_are_not_reinvented() {
        let request: OnboardingRequest =
            serde_json::from_value(json!({"firstName": "Alex"})).unwrap();
        assert!(request.email.is_empty());
        assert!(request.assets().is_empty());

        let encoded = serde_json::to_value(&request).unwrap();
        assert_eq!(encoded, json!({"firstName": "Alex"}));
    }

    #[test]
    fn test_unknown_fields_pass_through() {
        let request: OnboardingRequest = serde_json::from_value(json!({
            "firstName": "Emma",
            "employmentType": "full-time"
        }))
        .unwrap();
        let encoded = serde_json::to_value(&request).unwrap();
        assert_eq!(encoded["employmentType"], "full-time");
    }

    #[test]
    fn test_unknown_asset_fields_pass_through() {
        let request: OnboardingRequest = serde_json::from_value(json!({
            "firstName": "Emma",
            "assets": [{"category": "monitor", "quantity": 2}]
        }))
        .unwrap();
        assert_eq!(request.assets()[0].extra["quantity"], 2);

        let encoded = serde_json::to_value(&request).unwrap();
        assert_eq!(encoded["assets"], json!([{"category": "monitor", "quantity": 2}]));

        let probe = serde_json::to_value(AssetAllocationProbe::from(&request)).unwrap();
        assert_eq!(probe["assets"][0]["quantity"], 2);
    }

    #[test]
    fn test_null_and_non_string_fields_still_decode() {
        let request: OnboardingRequest = serde_json::from_value(json!({
            "firstName": "Emma",
            "lastName": "Davis",
            "startDate": null,
            "position": 7,
            "manager": null,
            "assets": null
        }))
        .unwrap();
        assert_eq!(request.full_name(), "Emma Davis");
        assert!(request.start_date.is_empty());
        assert_eq!(request.position, "7");
        assert!(request.manager.is_none());
        assert!(request.assets().is_empty());

        let encoded = serde_json::to_value(&request).unwrap();
        assert_eq!(
            encoded,
            json!({"firstName": "Emma", "lastName": "Davis", "position": "7"})
        );
    }

    #[test]
    fn test_empty_record() {
        let request: OnboardingRequest = serde_json::from_value(json!({})).unwrap();
        assert!(request.is_empty());

        let request: OnboardingRequest =
            serde_json::from_value(json!({"startDate": null, "notes": "x"})).unwrap();
        assert!(!request.is_empty());
    }

    #[test]
    fn test_asset_probe_body() {
        let request: OnboardingRequest = serde_json::from_value(json!({
            "firstName": "Alex",
            "lastName": "Rodriguez",
            "email": "alex.rodriguez@company.com",
            "department": "Marketing",
            "position": "Marketing Manager"
        }))
        .unwrap();
        let body = serde_json::to_value(AssetAllocationProbe::from(&request)).unwrap();
        assert_eq!(body["employeeId"], "TEST001");
        assert_eq!(body["lastName"], "Rodriguez");
        assert_eq!(body["assets"], json!([]));
    }

    #[test]
    fn test_status_lookup_echoes_id_shape() {
        let id = json!(42);
        let body = serde_json::to_value(StatusLookup { employee_id: &id }).unwrap();
        assert_eq!(body, json!({"employeeId": 42}));
    }
}
