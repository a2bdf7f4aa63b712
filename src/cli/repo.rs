//! Repository commands

use log::debug;
use serde_json::json;

use crate::cli::CommandContext;
use crate::client::fetch_all_offset;
use crate::config::Settings;
use crate::error::Result;
use crate::output;

/// Run the repo list command, walking every page of the listing.
pub async fn list(settings: &Settings, search: Option<&str>, page_size: u32) -> Result<()> {
    let ctx = CommandContext::new(settings)?;

    let repos = fetch_all_offset(page_size, |offset| {
        ctx.client.list_repos(offset, page_size, search)
    })
    .await?;

    debug!("fetched {} repositories", repos.len());

    output::print(
        &json!({"ok": true, "total": repos.len(), "repos": repos}),
        ctx.format,
    )
}
