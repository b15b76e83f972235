//! Single-request probes against each MCP tool server.
//!
//! The three calls run one after another and never short-circuit: a failing
//! employee service still gets the asset and notification probes. Only the
//! status code is judged; bodies are ignored.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Serialize, Serializer};
use tracing::{error, info};

use crate::models::{AssetAllocationProbe, EmailConfigProbe, OnboardingRequest};
use crate::service::{FabricServices, McpServiceClient};

pub const CREATE_EMPLOYEE_TOOL: &str = "create-employee";
pub const ALLOCATE_ASSETS_TOOL: &str = "allocate-assets";
pub const TEST_EMAIL_CONFIG_TOOL: &str = "test-email-config";

/// Which tool server a probe targeted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ServiceKey {
    EmployeeService,
    AssetService,
    NotificationService,
}

impl ServiceKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EmployeeService => "employee_service",
            Self::AssetService => "asset_service",
            Self::NotificationService => "notification_service",
        }
    }
}

impl std::fmt::Display for ServiceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ServiceKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Pass/fail per probed service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ServiceResults(BTreeMap<ServiceKey, bool>);

impl ServiceResults {
    pub fn record(&mut self, key: ServiceKey, passed: bool) {
        self.0.insert(key, passed);
    }

    pub fn get(&self, key: ServiceKey) -> Option<bool> {
        self.0.get(&key).copied()
    }

    pub fn all_passed(&self) -> bool {
        self.0.values().all(|passed| *passed)
    }

    pub fn failed(&self) -> Vec<ServiceKey> {
        self.0
            .iter()
            .filter(|(_, passed)| !**passed)
            .map(|(key, _)| *key)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ServiceKey, bool)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }
}

impl std::fmt::Display for ServiceResults {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(key, passed)| format!("{}={}", key, passed))
            .collect();
        write!(f, "{{{}}}", parts.join(", "))
    }
}

/// Drives the three tool probes.
#[derive(Debug, Clone)]
pub struct ServiceExerciser {
    employee: McpServiceClient,
    assets: McpServiceClient,
    notifications: McpServiceClient,
    timeout: Duration,
}

impl ServiceExerciser {
    pub fn new(fabric: &FabricServices, timeout: Duration) -> Self {
        Self {
            employee: fabric.employee.clone(),
            assets: fabric.assets.clone(),
            notifications: fabric.notifications.clone(),
            timeout,
        }
    }

    pub async fn exercise(&self, request: &OnboardingRequest) -> ServiceResults {
        info!("Testing individual MCP services");
        let mut results = ServiceResults::default();

        let passed = self
            .probe(ServiceKey::EmployeeService, &self.employee, CREATE_EMPLOYEE_TOOL, request)
            .await;
        results.record(ServiceKey::EmployeeService, passed);

        let asset_body = AssetAllocationProbe::from(request);
        let passed = self
            .probe(ServiceKey::AssetService, &self.assets, ALLOCATE_ASSETS_TOOL, &asset_body)
            .await;
        results.record(ServiceKey::AssetService, passed);

        let email_body = EmailConfigProbe {
            test_email: &request.email,
        };
        let passed = self
            .probe(
                ServiceKey::NotificationService,
                &self.notifications,
                TEST_EMAIL_CONFIG_TOOL,
                &email_body,
            )
            .await;
        results.record(ServiceKey::NotificationService, passed);

        info!(%results, "Individual service test results");
        results
    }

    async fn probe<B: Serialize>(
        &self,
        key: ServiceKey,
        service: &McpServiceClient,
        tool: &str,
        body: &B,
    ) -> bool {
        info!(service = %service.name(), tool, "Testing service");
        match service.post_tool(tool, body, self.timeout).await {
            Ok(response) if response.is_ok() => {
                info!(%key, "Service test passed");
                true
            }
            Ok(response) => {
                error!(%key, status = response.status.as_u16(), "Service test failed");
                false
            }
            Err(e) => {
                error!(%key, error = %e, "Service test error");
                false
            }
        }
    }
}
