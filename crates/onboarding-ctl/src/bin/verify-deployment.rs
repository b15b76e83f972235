//! Deployment verification poller.
//!
//! Waits for a broker redeploy to resolve its `orchestrationEnabled` property
//! placeholder, checking the health endpoint at a fixed interval.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use onboarding_client::config::DEFAULT_PROFILE;
use onboarding_client::TokioSleeper;
use onboarding_ctl::cli_config::{resolve_client_config, PollFlags};
use onboarding_ctl::commands::handle_verify;
use onboarding_ctl::output::{self, clap_styles};

#[derive(Debug, Parser)]
#[command(name = "verify-deployment", version, styles = clap_styles())]
#[command(about = "Wait for the agent broker to report orchestrationEnabled as a boolean")]
struct Cli {
    /// Environment profile whose broker is checked
    #[arg(long, env = "ONBOARDING_PROFILE", default_value = DEFAULT_PROFILE)]
    profile: String,

    /// Profile file to use instead of the discovered `.onboarding-cli.toml`
    #[arg(long)]
    config: Option<PathBuf>,

    /// Attempt budget (default 20)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    max_attempts: Option<u32>,

    /// Seconds between attempts (default 30)
    #[arg(long)]
    interval_secs: Option<u64>,
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
    let mut config = resolve_client_config(&cli.profile, cli.config.as_deref())
        .context("Failed to resolve onboarding profile")?;
    PollFlags {
        max_attempts: cli.max_attempts,
        interval_secs: cli.interval_secs,
    }
    .apply(&mut config);

    let outcome = handle_verify(&config, Arc::new(TokioSleeper)).await?;
    Ok(outcome.is_success())
}
