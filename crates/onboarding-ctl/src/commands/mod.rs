//! Command handlers for the verification binaries.
//!
//! Each handler drives `onboarding-client` and renders through
//! [`crate::output`]; the binaries only parse flags and map the verdict to an
//! exit code.

pub mod onboarding;
pub mod verify;

pub use onboarding::{handle_cases, handle_health_only, RunSummary, DEFAULT_CASES};
pub use verify::handle_verify;
