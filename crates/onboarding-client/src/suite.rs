//! End-to-end test case runner for the comprehensive tester.
//!
//! A case is: parse the text, sweep health, probe each tool server, then
//! orchestrate. Parse failure or an unhealthy fabric ends the case early.
//! Individual probe failures are reported but do not decide the verdict; the
//! orchestration step does.

use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info};

use crate::config::ClientConfig;
use crate::error::ClientResult;
use crate::exerciser::{ServiceExerciser, ServiceResults};
use crate::health::{HealthChecker, HealthReport};
use crate::models::OnboardingRequest;
use crate::nlp::RequestParser;
use crate::orchestration::{OrchestrationDriver, OrchestrationReport};
use crate::service::FabricServices;
use crate::sleeper::Sleeper;

/// Where a case stopped, if it did not run to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStage {
    Parse,
    Health,
    Orchestration,
}

/// Everything one case produced.
#[derive(Debug, Clone, Serialize)]
pub struct CaseOutcome {
    pub request: Option<OnboardingRequest>,
    pub health: Option<HealthReport>,
    pub services: Option<ServiceResults>,
    pub orchestration: Option<OrchestrationReport>,
    /// First stage that failed; `None` means the case passed.
    pub failed_at: Option<CaseStage>,
    pub error: Option<String>,
}

impl CaseOutcome {
    fn empty() -> Self {
        Self {
            request: None,
            health: None,
            services: None,
            orchestration: None,
            failed_at: None,
            error: None,
        }
    }

    fn fail(mut self, stage: CaseStage, error: impl Into<String>) -> Self {
        self.failed_at = Some(stage);
        self.error = Some(error.into());
        self
    }

    pub fn passed(&self) -> bool {
        self.failed_at.is_none()
    }
}

/// Wires the parser, health checker, exerciser and orchestration driver.
#[derive(Debug, Clone)]
pub struct OnboardingSuite {
    parser: RequestParser,
    health: HealthChecker,
    exerciser: ServiceExerciser,
    driver: OrchestrationDriver,
}

impl OnboardingSuite {
    pub fn new(
        parser: RequestParser,
        health: HealthChecker,
        exerciser: ServiceExerciser,
        driver: OrchestrationDriver,
    ) -> Self {
        Self {
            parser,
            health,
            exerciser,
            driver,
        }
    }

    /// Assemble the suite for a resolved config.
    pub fn from_config(
        config: &ClientConfig,
        parser: RequestParser,
        sleeper: Arc<dyn Sleeper>,
    ) -> ClientResult<Self> {
        let fabric = FabricServices::from_endpoints(&config.services)?;
        Ok(Self::new(
            parser,
            HealthChecker::for_fabric(&fabric, config.timeouts.health()),
            ServiceExerciser::new(&fabric, config.timeouts.tool()),
            OrchestrationDriver::new(
                fabric.broker.clone(),
                &config.timeouts,
                &config.pacing,
                sleeper,
            ),
        ))
    }

    pub async fn check_health(&self) -> HealthReport {
        self.health.check_all().await
    }

    /// Run one natural-language case end to end.
    pub async fn run_case(&self, text: &str) -> CaseOutcome {
        info!("Starting comprehensive NLP-based onboarding test");
        let mut outcome = CaseOutcome::empty();

        let request = match self.parser.parse(text).await {
            Ok(request) => request,
            Err(e) => {
                error!(error = %e, "Failed to parse natural language request");
                return outcome.fail(CaseStage::Parse, e.to_string());
            }
        };
        info!(
            request = %serde_json::to_string_pretty(&request).unwrap_or_default(),
            "Parsed employee data"
        );
        outcome.request = Some(request.clone());

        let health = self.health.check_all().await;
        let healthy = health.all_healthy();
        outcome.health = Some(health);
        if !healthy {
            error!("Health checks failed. Cannot proceed with testing.");
            return outcome.fail(CaseStage::Health, "one or more services are unhealthy");
        }

        outcome.services = Some(self.exerciser.exercise(&request).await);

        match self.driver.run(&request).await {
            Ok(report) => {
                info!("Complete orchestration test passed");
                outcome.orchestration = Some(report);
                outcome
            }
            Err(e) => {
                error!(error = %e, "Complete orchestration test failed");
                outcome.fail(CaseStage::Orchestration, e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_pass_fail() {
        let outcome = CaseOutcome::empty();
        assert!(outcome.passed());
        let outcome = outcome.fail(CaseStage::Health, "down");
        assert!(!outcome.passed());
        assert_eq!(outcome.failed_at, Some(CaseStage::Health));
        assert_eq!(outcome.error.as_deref(), Some("down"));
    }

    #[tokio::test]
    async fn test_case_without_parser_stops_at_parse() {
        let config = ClientConfig::for_base_url("http://127.0.0.1:19999");
        let suite = OnboardingSuite::from_config(
            &config,
            RequestParser::new(None, config.llm.clone()),
            Arc::new(crate::sleeper::RecordingSleeper::new()),
        )
        .unwrap();

        let outcome = suite.run_case("Onboard Sarah Johnson").await;
        assert_eq!(outcome.failed_at, Some(CaseStage::Parse));
        assert!(outcome.request.is_none());
        assert!(outcome.health.is_none());
    }
}
