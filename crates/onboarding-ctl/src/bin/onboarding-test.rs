//! Comprehensive NLP onboarding tester.
//!
//! Parses natural-language onboarding requests, checks fabric health, probes
//! each MCP server and runs full orchestration through the agent broker.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use onboarding_client::config::DEFAULT_PROFILE;
use onboarding_client::{OnboardingSuite, RequestParser, TokioSleeper};
use onboarding_ctl::cli_config::resolve_client_config;
use onboarding_ctl::commands::{handle_cases, handle_health_only, DEFAULT_CASES};
use onboarding_ctl::output::{self, clap_styles};

#[derive(Debug, Parser)]
#[command(name = "onboarding-test", version, styles = clap_styles())]
#[command(about = "Test the employee onboarding fabric with natural-language requests")]
struct Cli {
    /// Natural language onboarding request
    #[arg(short, long)]
    request: Option<String>,

    /// Only perform health checks
    #[arg(long)]
    health_only: bool,

    /// Environment profile (sandbox, development, staging, production, or one from the profile file)
    #[arg(long, env = "ONBOARDING_PROFILE", default_value = DEFAULT_PROFILE)]
    profile: String,

    /// Profile file to use instead of the discovered `.onboarding-cli.toml`
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    onboarding_ctl::init_tracing();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            output::error(format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<bool> {
    let config = resolve_client_config(&cli.profile, cli.config.as_deref())
        .context("Failed to resolve onboarding profile")?;
    let parser = RequestParser::from_config(&config.llm)?;
    let sleeper = Arc::new(TokioSleeper);
    let suite = OnboardingSuite::from_config(&config, parser, sleeper.clone())?;

    if cli.health_only {
        return Ok(handle_health_only(&suite).await);
    }

    let pause = config.pacing.between_cases();
    let summary = match cli.request.as_deref() {
        Some(request) => handle_cases(&suite, &[request], pause, sleeper.as_ref()).await,
        None => {
            tracing::info!("Running default NLP test cases");
            handle_cases(&suite, &DEFAULT_CASES, pause, sleeper.as_ref()).await
        }
    };
    Ok(summary.all_passed())
}
