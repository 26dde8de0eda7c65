//! Deployment status polling as a pure state machine.
//!
//! [`evaluate`] decides what to do after each status read from the elapsed
//! time and the provider's latest `readyState`. The async loop in
//! [`crate::vercel`] only fetches, calls `evaluate`, and sleeps.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Interval and overall ceiling for status polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            timeout: Duration::from_secs(60),
        }
    }
}

/// Provider-reported deployment state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReadyState {
    Queued,
    Initializing,
    Building,
    Ready,
    Error,
    Canceled,
    #[serde(other)]
    Unknown,
}

impl ReadyState {
    pub fn as_str(self) -> &'static str {
        match self {
            ReadyState::Queued => "QUEUED",
            ReadyState::Initializing => "INITIALIZING",
            ReadyState::Building => "BUILDING",
            ReadyState::Ready => "READY",
            ReadyState::Error => "ERROR",
            ReadyState::Canceled => "CANCELED",
            ReadyState::Unknown => "UNKNOWN",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ReadyState::Ready | ReadyState::Error | ReadyState::Canceled
        )
    }
}

impl std::fmt::Display for ReadyState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the poll loop should do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// The deployment is live.
    Ready,
    /// The provider reports a failed or canceled deployment.
    Failed(ReadyState),
    /// The ceiling has been reached without a terminal state.
    TimedOut,
    /// Sleep for the interval and read the status again.
    Wait,
}

/// Decide the next step after a status read taken at `elapsed`.
///
/// A terminal state always wins over the ceiling, so a deployment that
/// turns ready on the last read is reported as ready.
pub fn evaluate(elapsed: Duration, state: ReadyState, config: &PollConfig) -> PollOutcome {
    match state {
        ReadyState::Ready => PollOutcome::Ready,
        ReadyState::Error | ReadyState::Canceled => PollOutcome::Failed(state),
        _ if elapsed >= config.timeout => PollOutcome::TimedOut,
        _ => PollOutcome::Wait,
    }
}
