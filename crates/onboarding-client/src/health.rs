//! Health probing across the onboarding fabric.
//!
//! Every service is probed, in order, even after a failure, so the log trail
//! always covers all four. A service is healthy only on HTTP 200.

use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{error, info};

use crate::service::{FabricServices, McpServiceClient};

/// Overall verdict across all probed services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FabricHealthStatus {
    /// Every service answered 200
    Healthy,
    /// Some services answered 200, some did not
    Degraded,
    /// No service answered 200
    Unreachable,
}

impl std::fmt::Display for FabricHealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Healthy => write!(f, "healthy"),
            Self::Degraded => write!(f, "degraded"),
            Self::Unreachable => write!(f, "unreachable"),
        }
    }
}

/// Probe result for a single service.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceHealth {
    pub name: String,
    pub url: String,
    pub healthy: bool,
    /// Status code or transport error when unhealthy.
    pub detail: Option<String>,
    pub duration_ms: u64,
}

/// Results of one health sweep, in probe order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HealthReport {
    pub services: Vec<ServiceHealth>,
}

impl HealthReport {
    pub fn all_healthy(&self) -> bool {
        !self.services.is_empty() && self.services.iter().all(|s| s.healthy)
    }

    pub fn status(&self) -> FabricHealthStatus {
        let healthy = self.services.iter().filter(|s| s.healthy).count();
        match healthy {
            0 => FabricHealthStatus::Unreachable,
            n if n == self.services.len() => FabricHealthStatus::Healthy,
            _ => FabricHealthStatus::Degraded,
        }
    }

    pub fn unhealthy(&self) -> impl Iterator<Item = &ServiceHealth> {
        self.services.iter().filter(|s| !s.healthy)
    }
}

/// Probes `/health` on each service with a fixed per-request timeout.
#[derive(Debug, Clone)]
pub struct HealthChecker {
    services: Vec<McpServiceClient>,
    timeout: Duration,
}

impl HealthChecker {
    pub fn new(services: Vec<McpServiceClient>, timeout: Duration) -> Self {
        Self { services, timeout }
    }

    /// Checker over the standard four services.
    pub fn for_fabric(fabric: &FabricServices, timeout: Duration) -> Self {
        Self::new(fabric.all().into_iter().cloned().collect(), timeout)
    }

    /// Probe every service sequentially.
    pub async fn check_all(&self) -> HealthReport {
        info!("Performing health checks on all services");
        let mut report = HealthReport::default();
        for service in &self.services {
            report.services.push(self.check(service).await);
        }
        info!(status = %report.status(), "Health sweep finished");
        report
    }

    async fn check(&self, service: &McpServiceClient) -> ServiceHealth {
        let started = Instant::now();
        let outcome = service.health(self.timeout).await;
        let duration_ms = started.elapsed().as_millis() as u64;

        let (healthy, detail) = match outcome {
            Ok(response) if response.is_ok() => {
                info!(service = %service.name(), "Service is healthy");
                (true, None)
            }
            Ok(response) => {
                error!(
                    service = %service.name(),
                    status = response.status.as_u16(),
                    "Health check failed"
                );
                (false, Some(format!("HTTP {}", response.status.as_u16())))
            }
            Err(e) => {
                error!(
                    service = %service.name(),
                    error = %e,
                    recoverable = e.is_recoverable(),
                    "Health check failed"
                );
                (false, Some(e.to_string()))
            }
        };

        ServiceHealth {
            name: service.name().to_string(),
            url: service.health_url(),
            healthy,
            detail,
            duration_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, healthy: bool) -> ServiceHealth {
        ServiceHealth {
            name: name.to_string(),
            url: format!("http://{name}/health"),
            healthy,
            detail: (!healthy).then(|| "HTTP 503".to_string()),
            duration_ms: 1,
        }
    }

    #[test]
    fn test_all_healthy() {
        let report = HealthReport {
            services: vec![entry("a", true), entry("b", true)],
        };
        assert!(report.all_healthy());
        assert_eq!(report.status(), FabricHealthStatus::Healthy);
        assert_eq!(report.unhealthy().count(), 0);
    }

    #[test]
    fn test_degraded() {
        let report = HealthReport {
            services: vec![entry("a", true), entry("b", false)],
        };
        assert!(!report.all_healthy());
        assert_eq!(report.status(), FabricHealthStatus::Degraded);
        let names: Vec<&str> = report.unhealthy().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["b"]);
    }

    #[test]
    fn test_unreachable() {
        let report = HealthReport {
            services: vec![entry("a", false), entry("b", false)],
        };
        assert_eq!(report.status(), FabricHealthStatus::Unreachable);
    }

    #[test]
    fn test_empty_report_is_not_healthy() {
        assert!(!HealthReport::default().all_healthy());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(FabricHealthStatus::Healthy.to_string(), "healthy");
        assert_eq!(FabricHealthStatus::Degraded.to_string(), "degraded");
        assert_eq!(FabricHealthStatus::Unreachable.to_string(), "unreachable");
    }

    #[tokio::test]
    async fn test_unreachable_service_is_unhealthy() {
        let service = McpServiceClient::new("Nowhere", "http://127.0.0.1:19999").unwrap();
        let checker = HealthChecker::new(vec![service], Duration::from_millis(500));
        let report = checker.check_all().await;
        assert_eq!(report.services.len(), 1);
        assert!(!report.services[0].healthy);
        assert!(report.services[0].detail.is_some());
    }
}
