//! # Deployment Verification Poller
//!
//! Re-fetches the broker health endpoint until `orchestrationEnabled` comes
//! back as a real boolean, or the attempt budget runs out.
//!
//! ```text
//!            ┌──────────── Retry (sleep interval) ◄──┐
//!            ▼                                       │ not converged,
//!        Checking ── converged ──► Success           │ attempts left
//!            │                                       │
//!            └── not converged ──────────────────────┘
//!                    │ no attempts left
//!                    ▼
//!                Exhausted
//! ```
//!
//! The interval is fixed: no backoff, no jitter, and no sleep after the last
//! attempt.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::config::PollConfig;
use crate::property::{classify_response, PropertyCheck, PropertyProbe};
use crate::service::McpServiceClient;
use crate::sleeper::Sleeper;

/// Where the poller is after an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PollState {
    Checking,
    Success,
    Retry,
    Exhausted,
}

impl PollState {
    /// Transition out of `Checking` given the attempt's classification.
    pub fn after(check: &PropertyCheck, attempt: u32, max_attempts: u32) -> Self {
        if check.is_converged() {
            Self::Success
        } else if attempt < max_attempts {
            Self::Retry
        } else {
            Self::Exhausted
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Exhausted)
    }
}

/// Attempt budget and spacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub max_attempts: u32,
    pub interval: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        PollConfig::default().into()
    }
}

impl From<PollConfig> for PollPolicy {
    fn from(config: PollConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            interval: config.interval(),
        }
    }
}

/// What happened on one attempt; handed to the observer.
#[derive(Debug, Clone, Serialize)]
pub struct AttemptRecord {
    pub attempt: u32,
    pub max_attempts: u32,
    pub check: PropertyCheck,
    pub body: Option<Value>,
    pub next: PollState,
}

/// Terminal result of a polling run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PollOutcome {
    Converged { attempts: u32, value: bool },
    Exhausted { attempts: u32, last: PropertyCheck },
}

impl PollOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Converged { .. })
    }

    pub fn attempts(&self) -> u32 {
        match self {
            Self::Converged { attempts, .. } | Self::Exhausted { attempts, .. } => *attempts,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DeploymentPoller {
    broker: McpServiceClient,
    timeout: Duration,
    policy: PollPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl DeploymentPoller {
    pub fn new(
        broker: McpServiceClient,
        timeout: Duration,
        policy: PollPolicy,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        Self {
            broker,
            timeout,
            policy,
            sleeper,
        }
    }

    pub fn policy(&self) -> PollPolicy {
        self.policy
    }

    /// Fetch and classify the health property once.
    pub async fn check_once(&self) -> PropertyProbe {
        classify_response(self.broker.health(self.timeout).await)
    }

    pub async fn run(&self) -> PollOutcome {
        self.run_with(|_| {}).await
    }

    /// Poll until converged or exhausted, reporting every attempt to `observe`.
    pub async fn run_with<F>(&self, mut observe: F) -> PollOutcome
    where
        F: FnMut(&AttemptRecord),
    {
        let max_attempts = self.policy.max_attempts;
        info!(
            url = %self.broker.health_url(),
            max_attempts,
            interval_secs = self.policy.interval.as_secs(),
            "Waiting for deployment to converge"
        );

        let mut attempt = 0;
        let mut state = PollState::Checking;
        let mut last = PropertyCheck::NetworkError(String::new());
        loop {
            match state {
                PollState::Checking => {
                    attempt += 1;
                    let probe = self.check_once().await;
                    let next = PollState::after(&probe.check, attempt, max_attempts);

                    match next {
                        PollState::Success => {
                            info!(attempt, check = %probe.check, "Property fix verified")
                        }
                        _ => warn!(attempt, kind = probe.check.kind(), check = %probe.check, "Property not yet fixed"),
                    }

                    let record = AttemptRecord {
                        attempt,
                        max_attempts,
                        check: probe.check,
                        body: probe.body,
                        next,
                    };
                    observe(&record);
                    last = record.check;
                    state = next;
                }
                PollState::Retry => {
                    self.sleeper.sleep(self.policy.interval).await;
                    state = PollState::Checking;
                }
                PollState::Success => {
                    let value = matches!(last, PropertyCheck::CorrectBoolean(true));
                    return PollOutcome::Converged {
                        attempts: attempt,
                        value,
                    };
                }
                PollState::Exhausted => {
                    warn!(attempts = attempt, "Deployment verification timed out");
                    return PollOutcome::Exhausted {
                        attempts: attempt,
                        last,
                    };
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sleeper::RecordingSleeper;

    #[test]
    fn test_transition_success_on_boolean() {
        let check = PropertyCheck::CorrectBoolean(false);
        assert_eq!(PollState::after(&check, 1, 20), PollState::Success);
        assert_eq!(PollState::after(&check, 20, 20), PollState::Success);
    }

    #[test]
    fn test_transition_retry_then_exhausted() {
        let check = PropertyCheck::PlaceholderString("${agent.broker.orchestration.enabled}".into());
        assert_eq!(PollState::after(&check, 1, 20), PollState::Retry);
        assert_eq!(PollState::after(&check, 19, 20), PollState::Retry);
        assert_eq!(PollState::after(&check, 20, 20), PollState::Exhausted);
        assert!(PollState::Exhausted.is_terminal());
        assert!(!PollState::Retry.is_terminal());
        assert!(!PollState::Checking.is_terminal());
    }

    #[test]
    fn test_default_policy() {
        let policy = PollPolicy::default();
        assert_eq!(policy.max_attempts, 20);
        assert_eq!(policy.interval, Duration::from_secs(30));
    }

    #[test]
    fn test_policy_never_zero_attempts() {
        let policy: PollPolicy = PollConfig {
            max_attempts: 0,
            interval_secs: 1,
        }
        .into();
        assert_eq!(policy.max_attempts, 1);
    }

    #[tokio::test]
    async fn test_unreachable_broker_exhausts_budget() {
        let broker = McpServiceClient::new("Agent Broker", "http://127.0.0.1:19999").unwrap();
        let sleeper = RecordingSleeper::new();
        let poller = DeploymentPoller::new(
            broker,
            Duration::from_millis(500),
            PollPolicy {
                max_attempts: 3,
                interval: Duration::from_secs(30),
            },
            Arc::new(sleeper.clone()),
        );

        let mut kinds = Vec::new();
        let outcome = poller
            .run_with(|record| kinds.push(record.check.kind()))
            .await;

        assert!(!outcome.is_success());
        assert_eq!(outcome.attempts(), 3);
        assert_eq!(kinds, vec!["network_error"; 3]);
        assert_eq!(sleeper.calls(), vec![Duration::from_secs(30); 2]);
    }
}
