//! Integration tests for the deployment verification poller against a mock
//! broker `/health` endpoint.

mod common;

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::mount_health;
use onboarding_client::{
    DeploymentPoller, McpServiceClient, PollOutcome, PollPolicy, PollState, PropertyCheck,
    RecordingSleeper,
};

const PLACEHOLDER: &str = "${agent.broker.orchestration.enabled}";

fn poller(server: &MockServer, sleeper: &RecordingSleeper, policy: PollPolicy) -> DeploymentPoller {
    let broker = McpServiceClient::new("Agent Broker", server.uri()).unwrap();
    DeploymentPoller::new(
        broker,
        Duration::from_secs(10),
        policy,
        Arc::new(sleeper.clone()),
    )
}

/// Responds `times` times with `status`/`body`, then falls through to the
/// next mock mounted.
async fn mount_health_n(server: &MockServer, times: u64, status: u16, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .up_to_n_times(times)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_boolean_on_first_attempt_converges_immediately() {
    let server = MockServer::start().await;
    mount_health(&server, 200, json!({"status": "UP", "orchestrationEnabled": true})).await;

    let sleeper = RecordingSleeper::new();
    let outcome = poller(&server, &sleeper, PollPolicy::default()).run().await;

    assert_eq!(
        outcome,
        PollOutcome::Converged {
            attempts: 1,
            value: true
        }
    );
    assert!(sleeper.calls().is_empty());
}

#[tokio::test]
async fn test_false_counts_as_converged() {
    let server = MockServer::start().await;
    mount_health(&server, 200, json!({"orchestrationEnabled": false})).await;

    let sleeper = RecordingSleeper::new();
    let outcome = poller(&server, &sleeper, PollPolicy::default()).run().await;

    assert_eq!(
        outcome,
        PollOutcome::Converged {
            attempts: 1,
            value: false
        }
    );
}

#[tokio::test]
async fn test_placeholder_twice_then_boolean() {
    let server = MockServer::start().await;
    mount_health_n(&server, 2, 200, json!({"orchestrationEnabled": PLACEHOLDER})).await;
    mount_health(&server, 200, json!({"orchestrationEnabled": true})).await;

    let sleeper = RecordingSleeper::new();
    let mut seen = Vec::new();
    let outcome = poller(&server, &sleeper, PollPolicy::default())
        .run_with(|record| seen.push((record.attempt, record.check.kind(), record.next)))
        .await;

    assert!(outcome.is_success());
    assert_eq!(outcome.attempts(), 3);
    assert_eq!(
        seen,
        vec![
            (1, "placeholder_string", PollState::Retry),
            (2, "placeholder_string", PollState::Retry),
            (3, "correct_boolean", PollState::Success),
        ]
    );
    assert_eq!(sleeper.calls(), vec![Duration::from_secs(30); 2]);
}

#[tokio::test]
async fn test_permanent_placeholder_exhausts_after_twenty_attempts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"orchestrationEnabled": PLACEHOLDER})),
        )
        .expect(20)
        .mount(&server)
        .await;

    let sleeper = RecordingSleeper::new();
    let outcome = poller(&server, &sleeper, PollPolicy::default()).run().await;

    assert_eq!(
        outcome,
        PollOutcome::Exhausted {
            attempts: 20,
            last: PropertyCheck::PlaceholderString(PLACEHOLDER.to_string()),
        }
    );
    // No sleep after the final attempt
    assert_eq!(sleeper.calls().len(), 19);
    assert_eq!(sleeper.total(), Duration::from_secs(19 * 30));
}

#[tokio::test]
async fn test_absent_and_other_strings_keep_polling() {
    let server = MockServer::start().await;
    mount_health_n(&server, 1, 200, json!({"status": "UP"})).await;
    mount_health_n(&server, 1, 200, json!({"orchestrationEnabled": "true"})).await;
    mount_health(&server, 200, json!({"orchestrationEnabled": true})).await;

    let sleeper = RecordingSleeper::new();
    let mut kinds = Vec::new();
    let outcome = poller(&server, &sleeper, PollPolicy::default())
        .run_with(|record| kinds.push(record.check.kind()))
        .await;

    assert!(outcome.is_success());
    assert_eq!(kinds, vec!["absent", "other_string", "correct_boolean"]);
}

#[tokio::test]
async fn test_http_error_then_boolean() {
    let server = MockServer::start().await;
    mount_health_n(&server, 1, 503, json!({"status": "DOWN"})).await;
    mount_health(&server, 200, json!({"orchestrationEnabled": true})).await;

    let sleeper = RecordingSleeper::new();
    let mut records = Vec::new();
    let outcome = poller(&server, &sleeper, PollPolicy::default())
        .run_with(|record| records.push(record.clone()))
        .await;

    assert_eq!(outcome.attempts(), 2);
    assert!(matches!(
        records[0].check,
        PropertyCheck::HttpError { status: 503, .. }
    ));
    assert_eq!(records[1].body, Some(json!({"orchestrationEnabled": true})));
    assert_eq!(sleeper.calls(), vec![Duration::from_secs(30)]);
}

#[tokio::test]
async fn test_custom_policy_is_honoured() {
    let server = MockServer::start().await;
    mount_health(&server, 200, json!({"orchestrationEnabled": 1})).await;

    let sleeper = RecordingSleeper::new();
    let policy = PollPolicy {
        max_attempts: 3,
        interval: Duration::from_secs(5),
    };
    let outcome = poller(&server, &sleeper, policy).run().await;

    assert!(matches!(
        outcome,
        PollOutcome::Exhausted {
            attempts: 3,
            last: PropertyCheck::OtherType(_)
        }
    ));
    assert_eq!(sleeper.calls(), vec![Duration::from_secs(5); 2]);
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}
