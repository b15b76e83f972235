//! Full onboarding through the agent broker.
//!
//! One orchestration call, then (when the broker hands back an employee id)
//! one best-effort status lookup after a fixed pause. Neither call is retried,
//! and a failed lookup never fails the orchestration step.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::config::{PacingConfig, TimeoutConfig};
use crate::error::{ClientError, ClientResult};
use crate::models::{OnboardingRequest, StatusLookup};
use crate::service::McpServiceClient;
use crate::sleeper::Sleeper;

pub const ORCHESTRATE_TOOL: &str = "orchestrate-employee-onboarding";
pub const STATUS_TOOL: &str = "get-onboarding-status";

/// Outcome of the follow-up status lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum StatusCheck {
    /// The broker returned no usable employee id
    Skipped,
    Retrieved(Value),
    Failed(String),
}

/// A successful orchestration call and what followed it.
#[derive(Debug, Clone, Serialize)]
pub struct OrchestrationReport {
    pub result: Value,
    pub employee_id: Option<Value>,
    pub status: StatusCheck,
}

/// JSON truthiness: `null`, `false`, `0`, `""`, `[]` and `{}` are false.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Pull `employeeId` out of a broker result if it is present and truthy.
pub fn extract_employee_id(result: &Value) -> Option<Value> {
    result.get("employeeId").filter(|id| is_truthy(id)).cloned()
}

#[derive(Debug, Clone)]
pub struct OrchestrationDriver {
    broker: McpServiceClient,
    orchestration_timeout: Duration,
    status_timeout: Duration,
    status_delay: Duration,
    sleeper: Arc<dyn Sleeper>,
}

impl OrchestrationDriver {
    pub fn new(
        broker: McpServiceClient,
        timeouts: &TimeoutConfig,
        pacing: &PacingConfig,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        Self {
            broker,
            orchestration_timeout: timeouts.orchestration(),
            status_timeout: timeouts.tool(),
            status_delay: pacing.status_delay(),
            sleeper,
        }
    }

    /// Submit the request for orchestration and check status once.
    ///
    /// Errors only when the orchestration call itself fails (transport error,
    /// non-200, a body that is not JSON, or an empty result).
    pub async fn run(&self, request: &OnboardingRequest) -> ClientResult<OrchestrationReport> {
        info!(email = %request.email, "Starting employee onboarding orchestration");

        let result = self
            .broker
            .call_tool(ORCHESTRATE_TOOL, request, self.orchestration_timeout)
            .await?;
        if !is_truthy(&result) {
            return Err(ClientError::invalid_response("result", "empty"));
        }
        info!("Employee onboarding orchestration completed");

        let employee_id = extract_employee_id(&result);
        let status = match &employee_id {
            Some(id) => {
                self.sleeper.sleep(self.status_delay).await;
                self.lookup_status(id).await
            }
            None => StatusCheck::Skipped,
        };

        Ok(OrchestrationReport {
            result,
            employee_id,
            status,
        })
    }

    /// `get-onboarding-status` for one employee id.
    pub async fn lookup_status(&self, employee_id: &Value) -> StatusCheck {
        info!(employee_id = %employee_id, "Getting onboarding status");
        let body = StatusLookup { employee_id };
        match self
            .broker
            .call_tool(STATUS_TOOL, &body, self.status_timeout)
            .await
        {
            Ok(status) if is_truthy(&status) => {
                info!("Status retrieved");
                StatusCheck::Retrieved(status)
            }
            Ok(_) => {
                warn!("Status monitoring check returned an empty body");
                StatusCheck::Failed("empty status response".to_string())
            }
            Err(e) => {
                warn!(error = %e, "Status monitoring check failed");
                StatusCheck::Failed(e.to_string())
            }
        }
    }
}
