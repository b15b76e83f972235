//! # Client Configuration
//!
//! Resolved connection settings for one onboarding environment ("profile").
//!
//! Resolution order for a profile named `name`:
//!
//! 1. Built-in defaults for `name` (`sandbox`, `development`, `staging`, `production`)
//! 2. `[profile.{name}]` from a profile file, overriding any subset of fields
//! 3. `ONBOARDING_*` environment variables
//!
//! A profile file may also define profiles that have no built-in counterpart;
//! those start from the `sandbox` defaults.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ClientError, ClientResult};

/// Name of the profile used when none is requested.
pub const DEFAULT_PROFILE: &str = "sandbox";

/// Built-in profile names, in display order.
pub const BUILTIN_PROFILES: [&str; 4] = ["sandbox", "development", "staging", "production"];

pub const ENV_BROKER_URL: &str = "ONBOARDING_BROKER_URL";
pub const ENV_EMPLOYEE_URL: &str = "ONBOARDING_EMPLOYEE_URL";
pub const ENV_ASSETS_URL: &str = "ONBOARDING_ASSETS_URL";
pub const ENV_NOTIFICATIONS_URL: &str = "ONBOARDING_NOTIFICATIONS_URL";
pub const ENV_LLM_BASE_URL: &str = "ONBOARDING_LLM_BASE_URL";

/// Base URLs of the four remote services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceEndpoints {
    pub broker_url: String,
    pub employee_url: String,
    pub assets_url: String,
    pub notifications_url: String,
}

impl ServiceEndpoints {
    fn sandbox() -> Self {
        Self {
            broker_url: "https://employee-onboarding-agent-broker.sandbox.anypoint.mulesoft.com"
                .to_string(),
            employee_url: "https://employee-onboarding-mcp-server.sandbox.anypoint.mulesoft.com"
                .to_string(),
            assets_url: "https://asset-allocation-mcp-server.sandbox.anypoint.mulesoft.com"
                .to_string(),
            notifications_url: "https://notification-mcp-server.sandbox.anypoint.mulesoft.com"
                .to_string(),
        }
    }

    fn development() -> Self {
        Self {
            broker_url: "http://localhost:8081".to_string(),
            employee_url: "http://localhost:8082".to_string(),
            assets_url: "http://localhost:8083".to_string(),
            notifications_url: "http://localhost:8084".to_string(),
        }
    }

    fn staging() -> Self {
        Self {
            broker_url: "http://agent-broker-mcp-server-staging.us-e1.cloudhub.io".to_string(),
            employee_url: "http://employee-onboarding-mcp-server-staging.us-e1.cloudhub.io"
                .to_string(),
            assets_url: "http://asset-allocation-mcp-server-staging.us-e1.cloudhub.io".to_string(),
            notifications_url: "http://employee-notification-service-staging.us-e1.cloudhub.io"
                .to_string(),
        }
    }

    fn production() -> Self {
        Self {
            broker_url: "http://agent-broker-mcp-server.us-e1.cloudhub.io".to_string(),
            employee_url: "http://employee-onboarding-mcp-server.us-e1.cloudhub.io".to_string(),
            assets_url: "http://asset-allocation-mcp-server.us-e1.cloudhub.io".to_string(),
            notifications_url: "http://employee-notification-service.us-e1.cloudhub.io".to_string(),
        }
    }

    /// Same URL for every service; handy when all services sit behind one mock.
    pub fn uniform(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            broker_url: base_url.clone(),
            employee_url: base_url.clone(),
            assets_url: base_url.clone(),
            notifications_url: base_url,
        }
    }
}

/// Per-call request timeouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeoutConfig {
    pub health_ms: u64,
    pub tool_ms: u64,
    pub orchestration_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            health_ms: 10_000,
            tool_ms: 30_000,
            orchestration_ms: 120_000,
        }
    }
}

impl TimeoutConfig {
    pub fn health(&self) -> Duration {
        Duration::from_millis(self.health_ms)
    }

    pub fn tool(&self) -> Duration {
        Duration::from_millis(self.tool_ms)
    }

    pub fn orchestration(&self) -> Duration {
        Duration::from_millis(self.orchestration_ms)
    }
}

/// Chat-completion settings for natural-language parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    /// OpenAI-compatible API root; `/chat/completions` is appended.
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Environment variable holding the API key.
    pub api_key_env: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.groq.com/openai/v1".to_string(),
            model: "llama3-8b-8192".to_string(),
            temperature: 0.1,
            max_tokens: 1000,
            api_key_env: "GROQ_API_KEY".to_string(),
        }
    }
}

impl LlmConfig {
    /// Read the API key from the configured environment variable.
    ///
    /// Empty values count as unset.
    pub fn api_key(&self) -> Option<SecretString> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .map(SecretString::from)
    }
}

/// Deployment poller budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollConfig {
    pub max_attempts: u32,
    pub interval_secs: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_attempts: 20,
            interval_secs: 30,
        }
    }
}

impl PollConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

/// Fixed pauses in the comprehensive test flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacingConfig {
    /// Pause after each built-in test case.
    pub between_cases_secs: u64,
    /// Pause between a successful orchestration and its status lookup.
    pub status_delay_secs: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            between_cases_secs: 5,
            status_delay_secs: 2,
        }
    }
}

impl PacingConfig {
    pub fn between_cases(&self) -> Duration {
        Duration::from_secs(self.between_cases_secs)
    }

    pub fn status_delay(&self) -> Duration {
        Duration::from_secs(self.status_delay_secs)
    }
}

/// Fully resolved configuration for one profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientConfig {
    pub profile: String,
    pub services: ServiceEndpoints,
    pub timeouts: TimeoutConfig,
    pub llm: LlmConfig,
    pub poll: PollConfig,
    pub pacing: PacingConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::with_services(DEFAULT_PROFILE, ServiceEndpoints::sandbox())
    }
}

// ---------------------------------------------------------------------------
// Profile file
// ---------------------------------------------------------------------------

/// Partial service URL overrides from a profile file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceOverrides {
    pub broker_url: Option<String>,
    pub employee_url: Option<String>,
    pub assets_url: Option<String>,
    pub notifications_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TimeoutOverrides {
    pub health_ms: Option<u64>,
    pub tool_ms: Option<u64>,
    pub orchestration_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LlmOverrides {
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub api_key_env: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PollOverrides {
    pub max_attempts: Option<u32>,
    pub interval_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PacingOverrides {
    pub between_cases_secs: Option<u64>,
    pub status_delay_secs: Option<u64>,
}

/// One `[profile.{name}]` table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileConfig {
    pub description: Option<String>,
    #[serde(default)]
    pub services: ServiceOverrides,
    #[serde(default)]
    pub timeouts: TimeoutOverrides,
    #[serde(default)]
    pub llm: LlmOverrides,
    #[serde(default)]
    pub poll: PollOverrides,
    #[serde(default)]
    pub pacing: PacingOverrides,
}

/// Top-level shape of a profile file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileConfigFile {
    #[serde(default)]
    pub profile: BTreeMap<String, ProfileConfig>,
}

impl ProfileConfigFile {
    /// Parse a profile file from TOML text.
    pub fn from_toml(contents: &str) -> ClientResult<Self> {
        toml::from_str(contents)
            .map_err(|e| ClientError::config_error(format!("Failed to parse profile file: {}", e)))
    }

    /// Read and parse a profile file from disk.
    pub fn load(path: &Path) -> ClientResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        debug!(path = %path.display(), "Loaded profile file");
        Self::from_toml(&contents)
    }
}

fn set<T>(target: &mut T, value: &Option<T>)
where
    T: Clone,
{
    if let Some(v) = value {
        *target = v.clone();
    }
}

impl ClientConfig {
    fn with_services(profile: &str, services: ServiceEndpoints) -> Self {
        Self {
            profile: profile.to_string(),
            services,
            timeouts: TimeoutConfig::default(),
            llm: LlmConfig::default(),
            poll: PollConfig::default(),
            pacing: PacingConfig::default(),
        }
    }

    /// Built-in defaults for a known environment name.
    pub fn builtin(profile: &str) -> Option<Self> {
        let services = match profile {
            "sandbox" => ServiceEndpoints::sandbox(),
            "development" => ServiceEndpoints::development(),
            "staging" => ServiceEndpoints::staging(),
            "production" => ServiceEndpoints::production(),
            _ => return None,
        };
        Some(Self::with_services(profile, services))
    }

    /// Config with every service at `base_url` and default timings.
    pub fn for_base_url(base_url: impl Into<String>) -> Self {
        Self::with_services("custom", ServiceEndpoints::uniform(base_url))
    }

    /// Resolve a profile: built-in defaults, then the file's table, then env.
    pub fn resolve(profile: &str, file: Option<&ProfileConfigFile>) -> ClientResult<Self> {
        let overrides = file.and_then(|f| f.profile.get(profile));

        let mut config = match (Self::builtin(profile), overrides) {
            (Some(config), _) => config,
            (None, Some(_)) => Self::with_services(profile, ServiceEndpoints::sandbox()),
            (None, None) => {
                let mut available: Vec<&str> = BUILTIN_PROFILES.to_vec();
                if let Some(f) = file {
                    available.extend(f.profile.keys().map(String::as_str));
                }
                return Err(ClientError::config_error(format!(
                    "Profile '{}' not found. Available profiles: {}",
                    profile,
                    available.join(", ")
                )));
            }
        };

        if let Some(overrides) = overrides {
            config.apply_profile(overrides);
        }
        config.apply_env_overrides();
        config.validate()?;

        debug!(profile = %config.profile, broker = %config.services.broker_url, "Resolved client config");
        Ok(config)
    }

    fn apply_profile(&mut self, p: &ProfileConfig) {
        set(&mut self.services.broker_url, &p.services.broker_url);
        set(&mut self.services.employee_url, &p.services.employee_url);
        set(&mut self.services.assets_url, &p.services.assets_url);
        set(&mut self.services.notifications_url, &p.services.notifications_url);

        set(&mut self.timeouts.health_ms, &p.timeouts.health_ms);
        set(&mut self.timeouts.tool_ms, &p.timeouts.tool_ms);
        set(&mut self.timeouts.orchestration_ms, &p.timeouts.orchestration_ms);

        set(&mut self.llm.base_url, &p.llm.base_url);
        set(&mut self.llm.model, &p.llm.model);
        set(&mut self.llm.temperature, &p.llm.temperature);
        set(&mut self.llm.max_tokens, &p.llm.max_tokens);
        set(&mut self.llm.api_key_env, &p.llm.api_key_env);

        set(&mut self.poll.max_attempts, &p.poll.max_attempts);
        set(&mut self.poll.interval_secs, &p.poll.interval_secs);

        set(&mut self.pacing.between_cases_secs, &p.pacing.between_cases_secs);
        set(&mut self.pacing.status_delay_secs, &p.pacing.status_delay_secs);
    }

    /// Apply `ONBOARDING_*` URL overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        let overrides = [
            (ENV_BROKER_URL, &mut self.services.broker_url),
            (ENV_EMPLOYEE_URL, &mut self.services.employee_url),
            (ENV_ASSETS_URL, &mut self.services.assets_url),
            (ENV_NOTIFICATIONS_URL, &mut self.services.notifications_url),
            (ENV_LLM_BASE_URL, &mut self.llm.base_url),
        ];
        for (var, target) in overrides {
            if let Ok(value) = std::env::var(var) {
                if !value.trim().is_empty() {
                    debug!(var, value = %value, "Applying environment override");
                    *target = value;
                }
            }
        }
    }

    fn validate(&self) -> ClientResult<()> {
        let urls = [
            ("services.broker_url", &self.services.broker_url),
            ("services.employee_url", &self.services.employee_url),
            ("services.assets_url", &self.services.assets_url),
            ("services.notifications_url", &self.services.notifications_url),
            ("llm.base_url", &self.llm.base_url),
        ];
        for (field, url) in urls {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ClientError::config_error(format!(
                    "{} must be an http(s) URL, got '{}'",
                    field, url
                )));
            }
        }
        if self.poll.max_attempts == 0 {
            return Err(ClientError::config_error(
                "poll.max_attempts must be at least 1",
            ));
        }
        Ok(())
    }
}
