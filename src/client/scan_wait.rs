//! Bounded polling for synchronous scan completion
//!
//! After a scan is triggered, the status endpoint is polled at a fixed
//! interval until a terminal status appears or the deadline elapses. Exceeding
//! the deadline is a structured outcome, not an error, so callers can report
//! the last observed status.

use std::future::Future;

use log::debug;
use serde_json::Value;
use tokio::time::{sleep, Duration, Instant};

use super::lookup::lookup_str;
use crate::error::Result;

/// Statuses after which no further transition is expected. Observed from the
/// current API generation; adjust here if an upstream version renames them.
pub const TERMINAL_STATUSES: &[&str] = &["DONE", "FAILED", "PARTIAL", "NOT_SUPPORTED"];

/// The only terminal status that counts as success.
pub const SUCCESS_STATUS: &str = "DONE";

/// Candidate locations of the scan status across response envelopes. Some
/// server versions nest it under `overall`, others under `summary`.
const STATUS_KEYS: &[&str] = &[
    "overall.status",
    "overall.scan_status",
    "summary.status",
    "summary.scan_status",
    "status",
];

/// Result of a wait: what we last saw and whether the deadline cut us off.
#[derive(Debug)]
pub struct WaitOutcome {
    /// Last observed status, terminal or not. `None` if no response carried a
    /// recognizable status.
    pub final_status: Option<String>,
    /// Last status response, kept for diagnostics.
    pub last_response: Option<Value>,
    pub timed_out: bool,
}

impl WaitOutcome {
    /// True only for a terminal `DONE` observed within the deadline.
    pub fn succeeded(&self) -> bool {
        !self.timed_out && self.final_status.as_deref() == Some(SUCCESS_STATUS)
    }
}

/// Extract the scan status from whichever envelope the server used.
pub fn scan_status(response: &Value) -> Option<String> {
    lookup_str(response, STATUS_KEYS).map(str::to_owned)
}

/// Poll `fetch` every `poll` until a terminal status or until `timeout` has
/// elapsed. The fetch itself can still fail (network, HTTP error); those
/// propagate as errors and end the wait immediately.
pub async fn wait_for_terminal<F, Fut>(
    poll: Duration,
    timeout: Duration,
    mut fetch: F,
) -> Result<WaitOutcome>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Value>>,
{
    let deadline = Instant::now() + timeout;
    let mut final_status = None;
    let mut last_response = None;

    while Instant::now() < deadline {
        let response = fetch().await?;
        final_status = scan_status(&response);
        debug!("scan status: {:?}", final_status);

        let terminal = final_status
            .as_deref()
            .is_some_and(|status| TERMINAL_STATUSES.contains(&status));
        last_response = Some(response);

        if terminal {
            return Ok(WaitOutcome {
                final_status,
                last_response,
                timed_out: false,
            });
        }

        sleep(poll).await;
    }

    Ok(WaitOutcome {
        final_status,
        last_response,
        timed_out: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::VecDeque;

    fn status_response(status: &str) -> Value {
        json!({"overall": {"status": status}})
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_reaches_done_after_three_polls() {
        let mut responses = VecDeque::from(vec![
            status_response("RUNNING"),
            status_response("RUNNING"),
            status_response("DONE"),
        ]);
        let mut polls = 0;

        let outcome = wait_for_terminal(Duration::from_secs(1), Duration::from_secs(10), || {
            polls += 1;
            let response = responses.pop_front().unwrap();
            async move { Ok(response) }
        })
        .await
        .unwrap();

        assert_eq!(polls, 3);
        assert!(outcome.succeeded());
        assert_eq!(outcome.final_status.as_deref(), Some("DONE"));
        assert!(!outcome.timed_out);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_times_out_keeping_last_status() {
        let outcome = wait_for_terminal(Duration::from_secs(1), Duration::from_secs(3), || async {
            Ok(status_response("SCANNING"))
        })
        .await
        .unwrap();

        assert!(outcome.timed_out);
        assert!(!outcome.succeeded());
        assert_eq!(outcome.final_status.as_deref(), Some("SCANNING"));
        assert!(outcome.last_response.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_failed_status_is_terminal_but_not_success() {
        let outcome = wait_for_terminal(Duration::from_secs(1), Duration::from_secs(10), || async {
            Ok(status_response("FAILED"))
        })
        .await
        .unwrap();

        assert!(!outcome.timed_out);
        assert!(!outcome.succeeded());
        assert_eq!(outcome.final_status.as_deref(), Some("FAILED"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_without_recognizable_status_times_out() {
        let outcome = wait_for_terminal(Duration::from_secs(1), Duration::from_secs(2), || async {
            Ok(json!({"progress": 40}))
        })
        .await
        .unwrap();

        assert!(outcome.timed_out);
        assert_eq!(outcome.final_status, None);
    }

    #[test]
    fn test_scan_status_envelope_tolerance() {
        assert_eq!(
            scan_status(&json!({"overall": {"status": "DONE"}})).as_deref(),
            Some("DONE")
        );
        assert_eq!(
            scan_status(&json!({"overall": {"scan_status": "PARTIAL"}})).as_deref(),
            Some("PARTIAL")
        );
        assert_eq!(
            scan_status(&json!({"summary": {"status": "DONE"}})).as_deref(),
            Some("DONE")
        );
        assert_eq!(
            scan_status(&json!({"summary": {"scan_status": "FAILED"}})).as_deref(),
            Some("FAILED")
        );
        assert_eq!(
            scan_status(&json!({"status": "NOT_SUPPORTED"})).as_deref(),
            Some("NOT_SUPPORTED")
        );
        assert_eq!(scan_status(&json!({"other": 1})), None);
    }
}
