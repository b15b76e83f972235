//! `verify-deployment` handler.

use std::sync::Arc;
use std::time::Duration;

use onboarding_client::{
    AttemptRecord, ClientConfig, ClientResult, DeploymentPoller, FabricServices, PollOutcome,
    PollPolicy, PollState, PropertyCheck, Sleeper,
};

use crate::output;

/// Poll the broker health endpoint until the property converges or the
/// attempt budget runs out.
pub async fn handle_verify(
    config: &ClientConfig,
    sleeper: Arc<dyn Sleeper>,
) -> ClientResult<PollOutcome> {
    let fabric = FabricServices::from_endpoints(&config.services)?;
    let policy = PollPolicy::from(config.poll);
    let health_url = fabric.broker.health_url();
    let poller = DeploymentPoller::new(fabric.broker, config.timeouts.health(), policy, sleeper);

    output::header("Verifying property reference fix in health check endpoint");
    output::label("Profile", &config.profile);
    output::label("Health URL", health_url);
    output::blank();

    let outcome = poller
        .run_with(|record| render_attempt(record, policy.interval))
        .await;

    output::blank();
    match &outcome {
        PollOutcome::Converged { attempts, value } => output::success(format!(
            "Property reference fix verified after {attempts} attempt(s): orchestrationEnabled = {value}"
        )),
        PollOutcome::Exhausted { attempts, last } => {
            output::failure(format!(
                "Deployment verification timed out after {attempts} attempt(s)"
            ));
            output::label("Last result", last);
        }
    }
    Ok(outcome)
}

fn render_attempt(record: &AttemptRecord, interval: Duration) {
    output::progress(format!("Attempt {}/{}", record.attempt, record.max_attempts));

    if let Some(body) = &record.body {
        output::status_icon(true, "Health endpoint is accessible");
        output::json(body);
    }

    match &record.check {
        PropertyCheck::CorrectBoolean(_) => output::status_icon(true, &record.check),
        PropertyCheck::OtherString(_) | PropertyCheck::OtherType(_) => {
            output::warning(format!("  {}", record.check))
        }
        _ => output::status_icon(false, &record.check),
    }

    if record.next == PollState::Retry {
        output::progress(format!("Waiting {}s before next attempt...", interval.as_secs()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use onboarding_client::RecordingSleeper;

    #[tokio::test]
    async fn test_unreachable_broker_uses_configured_budget() {
        let mut config = ClientConfig::for_base_url("http://127.0.0.1:19999");
        config.timeouts.health_ms = 500;
        config.poll.max_attempts = 2;
        config.poll.interval_secs = 7;

        let sleeper = RecordingSleeper::new();
        let outcome = handle_verify(&config, Arc::new(sleeper.clone()))
            .await
            .unwrap();

        assert!(!outcome.is_success());
        assert_eq!(outcome.attempts(), 2);
        assert_eq!(sleeper.calls(), vec![Duration::from_secs(7)]);
    }
}
