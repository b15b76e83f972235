//! `onboarding-test` handlers: health-only sweep and natural-language cases.

use std::time::Duration;

use onboarding_client::{
    CaseOutcome, CaseStage, HealthReport, OnboardingSuite, Sleeper, StatusCheck,
};

use crate::output;

/// Cases run when no `--request` is given.
pub const DEFAULT_CASES: [&str; 3] = [
    "I need to onboard Sarah Johnson as a Senior Software Engineer in the Engineering \
     department. Her email is sarah.johnson@techcorp.com and she starts on March 1st, 2024. \
     She'll need a MacBook Pro, 27-inch monitor, and wireless keyboard and mouse. Her manager \
     is Mike Chen at mike.chen@techcorp.com.",
    "Please set up onboarding for Alex Rodriguez, new Marketing Manager starting February \
     15th. Email: alex.rodriguez@company.com. Department: Marketing. He needs a laptop and \
     phone for his role.",
    "Onboard new employee: Emma Davis, Data Scientist, Analytics team, \
     emma.davis@datatech.com, starts next Monday. Requires high-spec laptop with GPU, dual \
     monitors, mechanical keyboard.",
];

const PREVIEW_CHARS: usize = 100;

/// Pass/fail tally for a run of cases.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub passed: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn record(&mut self, passed: bool) {
        if passed {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed
    }

    /// True when at least one case ran and none failed.
    pub fn all_passed(&self) -> bool {
        self.failed == 0 && self.passed > 0
    }
}

/// `--health-only`: sweep all four services and report.
pub async fn handle_health_only(suite: &OnboardingSuite) -> bool {
    output::header("Health checks");
    let report = suite.check_health().await;
    render_health(&report);
    output::blank();

    if report.all_healthy() {
        output::success("All services are healthy!");
        true
    } else {
        output::failure("Some services are not healthy");
        false
    }
}

/// Run each case in order, pausing `pause` between consecutive cases.
pub async fn handle_cases(
    suite: &OnboardingSuite,
    cases: &[&str],
    pause: Duration,
    sleeper: &dyn Sleeper,
) -> RunSummary {
    let mut summary = RunSummary::default();

    for (index, text) in cases.iter().enumerate() {
        if index > 0 {
            output::progress(format!("Waiting {}s before next case...", pause.as_secs()));
            sleeper.sleep(pause).await;
        }

        output::blank();
        output::header(format!("Test case {}: {}", index + 1, preview(text)));
        let outcome = suite.run_case(text).await;
        render_case(&outcome);
        summary.record(outcome.passed());
    }

    output::blank();
    if summary.all_passed() {
        output::success(format!("All {} test case(s) passed", summary.total()));
    } else {
        output::failure(format!(
            "{} of {} test case(s) failed",
            summary.failed,
            summary.total()
        ));
    }
    summary
}

fn preview(text: &str) -> String {
    if text.chars().count() <= PREVIEW_CHARS {
        text.to_string()
    } else {
        let head: String = text.chars().take(PREVIEW_CHARS).collect();
        format!("{head}...")
    }
}

fn render_health(report: &HealthReport) {
    for service in &report.services {
        let line = match &service.detail {
            Some(detail) => format!("{} ({})", service.name, detail),
            None => format!("{} ({} ms)", service.name, service.duration_ms),
        };
        output::status_icon(service.healthy, line);
    }
    output::label("Fabric", report.status());
}

fn render_case(outcome: &CaseOutcome) {
    if let Some(request) = &outcome.request {
        output::status_icon(true, format!("Parsed request for {}", request.full_name()));
        if let Ok(value) = serde_json::to_value(request) {
            output::json(&value);
        }
    }

    if let Some(health) = &outcome.health {
        render_health(health);
    }

    if let Some(services) = &outcome.services {
        for (key, passed) in services.iter() {
            let line = format!("{key} probe");
            if passed {
                output::status_icon(true, line);
            } else {
                output::warning(format!("  {line} failed"));
            }
        }
    }

    if let Some(report) = &outcome.orchestration {
        output::status_icon(true, "Orchestration completed");
        output::json(&report.result);
        match &report.status {
            StatusCheck::Retrieved(status) => {
                output::status_icon(true, "Status retrieved");
                output::json(status);
            }
            StatusCheck::Failed(e) => output::warning(format!("  Status check failed: {e}")),
            StatusCheck::Skipped => output::dim("  No employee id returned; status check skipped"),
        }
    }

    match (outcome.failed_at, &outcome.error) {
        (None, _) => output::success("Case passed"),
        (Some(stage), error) => {
            let stage = match stage {
                CaseStage::Parse => "parse",
                CaseStage::Health => "health check",
                CaseStage::Orchestration => "orchestration",
            };
            output::failure(format!(
                "Case failed at {stage}: {}",
                error.as_deref().unwrap_or("unknown error")
            ));
        }
    }
}
