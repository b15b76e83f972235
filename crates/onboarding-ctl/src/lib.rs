//! # Onboarding Ctl
//!
//! Shared plumbing for the two verification binaries:
//!
//! - `onboarding-test`: natural-language parse, health sweep, per-service
//!   probes and full orchestration for one or more onboarding requests
//! - `verify-deployment`: polls the broker until `orchestrationEnabled` is a
//!   real boolean
//!
//! Human-facing results go to stdout through [`output`]; diagnostics go to
//! stderr through `tracing`.

pub mod cli_config;
pub mod commands;
pub mod output;

use tracing_subscriber::EnvFilter;

/// Log filter used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "onboarding_client=info,onboarding_ctl=info";

/// Install the stderr `tracing` subscriber.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
