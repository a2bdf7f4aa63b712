//! Scan trigger and wait commands

use clap::Args;
use serde_json::json;
use tokio::time::Duration;

use crate::cli::CommandContext;
use crate::client::wait_for_terminal;
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::output;

/// Arguments for `scan artifact`
#[derive(Args, Debug, Clone)]
pub struct ScanArtifactArgs {
    /// Xray component identifier of the artifact to scan
    #[arg(long)]
    pub component_id: String,

    /// Poll the status endpoint until the scan reaches a terminal state
    #[arg(long)]
    pub wait: bool,

    /// Repository key (required with --wait; the status API is keyed by repo/path)
    #[arg(long)]
    pub repo: Option<String>,

    /// Artifact path within the repository (required with --wait)
    #[arg(long)]
    pub path: Option<String>,

    /// Seconds between status polls
    #[arg(long, default_value_t = 5)]
    pub poll_seconds: u64,

    /// Overall wait deadline in seconds
    #[arg(long, default_value_t = 300)]
    pub timeout_seconds: u64,
}

/// Run the scan artifact command.
///
/// The trigger request is issued exactly once. With `--wait`, the status
/// endpoint is then polled until a terminal status or the deadline; hitting
/// the deadline is reported as an `ok: false` result, not an error.
pub async fn artifact(settings: &Settings, args: &ScanArtifactArgs) -> Result<()> {
    if args.component_id.trim().is_empty() {
        return Err(Error::Validation(
            "--component-id must not be empty".to_string(),
        ));
    }
    if args.poll_seconds < 1 {
        return Err(Error::Validation("--poll-seconds must be >= 1".to_string()));
    }
    if args.timeout_seconds < 1 {
        return Err(Error::Validation(
            "--timeout-seconds must be >= 1".to_string(),
        ));
    }

    // Wait prerequisites are checked before anything touches the network.
    let wait_target = if args.wait {
        match (args.repo.as_deref(), args.path.as_deref()) {
            (Some(repo), Some(path)) => Some((repo, path)),
            _ => {
                return Err(Error::Validation(
                    "--wait requires --repo and --path (the status API is keyed by repo/path, \
                     not component id)"
                        .to_string(),
                ));
            }
        }
    } else {
        None
    };

    let ctx = CommandContext::new(settings)?;
    let started = ctx.client.scan_artifact(&args.component_id).await?;

    let Some((repo, path)) = wait_target else {
        return output::print(
            &json!({
                "ok": true,
                "type": "artifact",
                "component_id": args.component_id,
                "started": started,
            }),
            ctx.format,
        );
    };

    let outcome = wait_for_terminal(
        Duration::from_secs(args.poll_seconds),
        Duration::from_secs(args.timeout_seconds),
        || ctx.client.artifact_status(repo, path),
    )
    .await?;

    let mut payload = json!({
        "ok": outcome.succeeded(),
        "type": "artifact",
        "component_id": args.component_id,
        "artifact": {
            "repo": repo,
            "path": path,
            "project": settings.project,
        },
        "started": started,
        "final_status": outcome.final_status,
        "status": outcome.last_response,
    });
    if outcome.timed_out {
        payload["error"] = json!(format!(
            "timed out after {}s waiting for artifact scan to complete",
            args.timeout_seconds
        ));
    }

    output::print(&payload, ctx.format)
}
