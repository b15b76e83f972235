//! # Onboarding Client
//!
//! API clients and verification flows for the employee onboarding agent
//! fabric: an agent broker plus employee, asset allocation and notification
//! MCP servers.
//!
//! - [`health`]: `/health` sweep across all four services
//! - [`exerciser`]: one probe request per MCP tool server
//! - [`orchestration`]: full onboarding through the broker plus a status lookup
//! - [`nlp`]: natural-language to [`OnboardingRequest`] via a chat-completion model
//! - [`property`] and [`poller`]: verification that the broker's
//!   `orchestrationEnabled` flag is a real boolean after a deployment
//! - [`suite`]: the comprehensive per-case flow tying the above together

pub mod config;
pub mod error;
pub mod exerciser;
pub mod health;
pub mod models;
pub mod nlp;
pub mod orchestration;
pub mod poller;
pub mod property;
pub mod service;
pub mod sleeper;
pub mod suite;

pub use config::{ClientConfig, ProfileConfigFile};
pub use error::{ClientError, ClientResult};
pub use exerciser::{ServiceExerciser, ServiceKey, ServiceResults};
pub use health::{FabricHealthStatus, HealthChecker, HealthReport, ServiceHealth};
pub use models::{AssetRequest, OnboardingRequest};
pub use nlp::{CompletionClient, GroqCompletionClient, ParseError, RequestParser};
pub use orchestration::{OrchestrationDriver, OrchestrationReport, StatusCheck};
pub use poller::{AttemptRecord, DeploymentPoller, PollOutcome, PollPolicy, PollState};
pub use property::{classify_body, PropertyCheck};
pub use service::{FabricServices, McpServiceClient, ServiceResponse};
pub use sleeper::{RecordingSleeper, Sleeper, TokioSleeper};
pub use suite::{CaseOutcome, CaseStage, OnboardingSuite};
