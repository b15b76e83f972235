//! Client config resolution for the binaries.
//!
//! Ties the `--profile` / `--config` flags to
//! [`ClientConfig::resolve`](onboarding_client::ClientConfig::resolve) and
//! applies flag-level overrides on top.

pub mod loader;

use std::path::Path;

use onboarding_client::{ClientConfig, ClientResult};

pub use loader::load_profile_file;

/// Resolve the named profile against the discovered or explicit profile file.
pub fn resolve_client_config(profile: &str, explicit: Option<&Path>) -> ClientResult<ClientConfig> {
    let file = load_profile_file(explicit)?;
    let config = ClientConfig::resolve(profile, file.as_ref())?;
    tracing::debug!(
        profile = %config.profile,
        broker = %config.services.broker_url,
        "Using onboarding profile"
    );
    Ok(config)
}

/// Poll settings given on the command line; `None` keeps the profile value.
#[derive(Debug, Clone, Copy, Default)]
pub struct PollFlags {
    pub max_attempts: Option<u32>,
    pub interval_secs: Option<u64>,
}

impl PollFlags {
    pub fn apply(&self, config: &mut ClientConfig) {
        if let Some(max_attempts) = self.max_attempts {
            config.poll.max_attempts = max_attempts;
        }
        if let Some(interval_secs) = self.interval_secs {
            config.poll.interval_secs = interval_secs;
        }
    }
}
