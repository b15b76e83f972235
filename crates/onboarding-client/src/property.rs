//! Classification of the broker's `orchestrationEnabled` health property.
//!
//! A broken deployment returns the unresolved configuration placeholder as a
//! string instead of a boolean. Each health fetch is classified into exactly
//! one [`PropertyCheck`] case; only [`PropertyCheck::CorrectBoolean`] counts as
//! fixed.

use serde::Serialize;
use serde_json::Value;

use crate::error::ClientResult;
use crate::service::ServiceResponse;

/// Health-body field under test.
pub const PROPERTY_FIELD: &str = "orchestrationEnabled";

/// Placeholder spellings observed from the misconfigured broker.
pub const PLACEHOLDER_FORMS: [&str; 2] = [
    "${agent.broker.orchestration.enabled}",
    "'${agent.broker.orchestration.enabled}'",
];

/// What one health fetch said about the property.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PropertyCheck {
    /// A real JSON boolean
    CorrectBoolean(bool),
    /// The unresolved configuration token
    PlaceholderString(String),
    OtherString(String),
    /// Number, array or object
    OtherType(Value),
    /// Field missing or `null`
    Absent,
    /// The body was not JSON
    MalformedBody(String),
    HttpError { status: u16, body: String },
    NetworkError(String),
}

impl PropertyCheck {
    pub fn is_converged(&self) -> bool {
        matches!(self, Self::CorrectBoolean(_))
    }

    /// Short machine-friendly label.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CorrectBoolean(_) => "correct_boolean",
            Self::PlaceholderString(_) => "placeholder_string",
            Self::OtherString(_) => "other_string",
            Self::OtherType(_) => "other_type",
            Self::Absent => "absent",
            Self::MalformedBody(_) => "malformed_body",
            Self::HttpError { .. } => "http_error",
            Self::NetworkError(_) => "network_error",
        }
    }
}

impl std::fmt::Display for PropertyCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CorrectBoolean(v) => write!(f, "{PROPERTY_FIELD} is boolean: {v}"),
            Self::PlaceholderString(s) => {
                write!(f, "{PROPERTY_FIELD} is still a property placeholder: {s}")
            }
            Self::OtherString(s) => write!(f, "{PROPERTY_FIELD} is a string but not a placeholder: {s}"),
            Self::OtherType(v) => write!(
                f,
                "{PROPERTY_FIELD} has unexpected type: {} = {v}",
                json_type_name(v)
            ),
            Self::Absent => write!(f, "{PROPERTY_FIELD} property not found in response"),
            Self::MalformedBody(e) => write!(f, "health response is not JSON: {e}"),
            Self::HttpError { status, body } => {
                write!(f, "health endpoint returned {status}: {body}")
            }
            Self::NetworkError(e) => write!(f, "error reaching health endpoint: {e}"),
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Classify the property in an already-decoded health body.
///
/// A body that is not an object has no fields and classifies as `Absent`.
pub fn classify_body(body: &Value) -> PropertyCheck {
    match body.get(PROPERTY_FIELD) {
        None | Some(Value::Null) => PropertyCheck::Absent,
        Some(Value::Bool(b)) => PropertyCheck::CorrectBoolean(*b),
        Some(Value::String(s)) if PLACEHOLDER_FORMS.contains(&s.as_str()) => {
            PropertyCheck::PlaceholderString(s.clone())
        }
        Some(Value::String(s)) => PropertyCheck::OtherString(s.clone()),
        Some(other) => PropertyCheck::OtherType(other.clone()),
    }
}

/// One classified health fetch, with the decoded body when there was one.
#[derive(Debug, Clone, Serialize)]
pub struct PropertyProbe {
    pub check: PropertyCheck,
    pub body: Option<Value>,
}

/// Classify the outcome of a `GET /health`.
pub fn classify_response(outcome: ClientResult<ServiceResponse>) -> PropertyProbe {
    let response = match outcome {
        Ok(response) => response,
        Err(e) => {
            return PropertyProbe {
                check: PropertyCheck::NetworkError(e.to_string()),
                body: None,
            }
        }
    };

    if !response.is_ok() {
        return PropertyProbe {
            check: PropertyCheck::HttpError {
                status: response.status.as_u16(),
                body: response.body,
            },
            body: None,
        };
    }

    match response.json() {
        Ok(body) => PropertyProbe {
            check: classify_body(&body),
            body: Some(body),
        },
        Err(e) => PropertyProbe {
            check: PropertyCheck::MalformedBody(e.to_string()),
            body: None,
        },
    }
}
