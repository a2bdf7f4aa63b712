//! System commands

use serde_json::json;

use crate::cli::CommandContext;
use crate::config::Settings;
use crate::error::Result;
use crate::output;

/// Run the ping command
pub async fn ping(settings: &Settings) -> Result<()> {
    let ctx = CommandContext::new(settings)?;
    let response = ctx.client.ping().await?;
    output::print(&json!({"ok": true, "response": response}), ctx.format)
}
