//! Long-running-operation poller.
//!
//! ## State machine
//!
//! ```text
//!            GET status URL
//! Running ──────────────────► HTTP 200                      ─► Succeeded
//!    ▲                        non-200, Status NotStarted|Running ─► sleep, Running
//!    │                        non-200, any other Status     ─► Unrecognized
//!    └──── sleep(interval) ◄──┘
//! ```
//!
//! A missing or unparseable `Status` counts as `"Unknown"`. `Unrecognized`
//! is terminal but is not a success: it is handed back to the caller, which
//! decides whether a failed-looking status aborts the run.
//!
//! Polling stops with [`GitError::PollTimeout`] once `max_attempts` requests
//! have been made or the next wait would exceed `timeout`.

use std::time::{Duration, Instant};

use serde::Deserialize;

use wsops_core::{ApiClient, PollConfig};

use crate::error::GitError;

/// Blocking delay between polls; swapped out in tests.
pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

/// Sleeps the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollSettings {
    /// Grace period before the first poll of a freshly accepted operation.
    pub initial_delay: Duration,
    pub interval: Duration,
    pub timeout: Duration,
    pub max_attempts: Option<u32>,
}

impl Default for PollSettings {
    fn default() -> Self {
        PollConfig::default().into()
    }
}

impl From<PollConfig> for PollSettings {
    fn from(config: PollConfig) -> Self {
        Self {
            initial_delay: config.initial_delay(),
            interval: config.interval(),
            timeout: config.timeout(),
            max_attempts: config.max_attempts,
        }
    }
}

/// Terminal result of a poll loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LroOutcome {
    /// The status URL answered HTTP 200.
    Succeeded,
    /// The operation left the running states with a status other than a
    /// 200, e.g. `"Failed"`. Whether that is fatal is the caller's call.
    Unrecognized { status: String, http_status: u16 },
}

impl LroOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, LroOutcome::Succeeded)
    }
}

#[derive(Debug, Default, Deserialize)]
struct OperationState {
    #[serde(rename = "Status", alias = "status", default)]
    status: Option<String>,
}

fn operation_status(body: &str) -> String {
    serde_json::from_str::<OperationState>(body)
        .ok()
        .and_then(|state| state.status)
        .unwrap_or_else(|| "Unknown".to_string())
}

fn is_running(status: &str) -> bool {
    matches!(status, "NotStarted" | "Running")
}

/// Poll `url` until the operation is terminal.
///
/// The first request is sent immediately; any initial grace period is the
/// caller's responsibility.
pub fn poll(
    client: &ApiClient,
    url: &str,
    settings: &PollSettings,
    sleeper: &dyn Sleeper,
) -> Result<LroOutcome, GitError> {
    let started = Instant::now();
    let mut waited = Duration::ZERO;
    let mut attempts: u32 = 0;

    loop {
        attempts += 1;
        let response = client.get(url)?;
        if response.status == 200 {
            tracing::info!(attempts, "git sync completed");
            return Ok(LroOutcome::Succeeded);
        }

        let status = operation_status(&response.body);
        if !is_running(&status) {
            tracing::warn!(
                %status,
                http_status = response.status,
                "operation ended without a success response"
            );
            return Ok(LroOutcome::Unrecognized {
                status,
                http_status: response.status,
            });
        }

        let elapsed = started.elapsed().max(waited);
        let out_of_attempts = settings.max_attempts.is_some_and(|max| attempts >= max);
        if out_of_attempts || elapsed + settings.interval > settings.timeout {
            return Err(GitError::PollTimeout {
                url: url.to_string(),
                attempts,
                elapsed,
            });
        }

        tracing::info!(%status, "git sync operation is still in progress");
        sleeper.sleep(settings.interval);
        waited += settings.interval;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(r#"{"Status":"Running"}"#, "Running")]
    #[case(r#"{"status":"NotStarted"}"#, "NotStarted")]
    #[case(r#"{"Status":"Failed","error":{}}"#, "Failed")]
    #[case(r#"{"percentComplete":40}"#, "Unknown")]
    #[case("<html>gateway</html>", "Unknown")]
    #[case("", "Unknown")]
    fn status_field_extraction(#[case] body: &str, #[case] expected: &str) {
        assert_eq!(operation_status(body), expected);
    }

    #[test]
    fn only_not_started_and_running_keep_polling() {
        assert!(is_running("NotStarted"));
        assert!(is_running("Running"));
        assert!(!is_running("Succeeded"));
        assert!(!is_running("Failed"));
        assert!(!is_running("Unknown"));
    }

    #[test]
    fn default_settings_match_service_cadence() {
        let settings = PollSettings::default();
        assert_eq!(settings.initial_delay, Duration::from_secs(20));
        assert_eq!(settings.interval, Duration::from_secs(10));
        assert_eq!(settings.max_attempts, None);
    }
}
