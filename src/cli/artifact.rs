//! Artifact commands

use std::path::PathBuf;

use clap::Args;
use log::debug;
use regex::Regex;
use serde_json::json;

use crate::cli::CommandContext;
use crate::client::fetch_all_offset;
use crate::client::inventory::{column_union, flatten, inventory_rows, select_repos, write_csv};
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::output;

/// Arguments for `artifact inventory`
#[derive(Args, Debug, Clone)]
pub struct InventoryArgs {
    /// Output file; must end with .csv
    #[arg(long)]
    pub out: PathBuf,

    /// Only include repositories whose name matches this regex
    #[arg(long)]
    pub repo_regex: Option<String>,

    /// Copy repository metadata into each row under repo_-prefixed columns
    #[arg(long)]
    pub include_repo_metadata: bool,

    /// Artifacts fetched per page
    #[arg(long, default_value_t = 200)]
    pub page_size: u32,

    /// Repositories fetched per page
    #[arg(long, default_value_t = 200)]
    pub repo_page_size: u32,
}

/// Run the artifact list command for one repository.
pub async fn list(settings: &Settings, repo: &str, page_size: u32) -> Result<()> {
    let ctx = CommandContext::new(settings)?;

    let artifacts = fetch_all_offset(page_size, |offset| {
        ctx.client.list_artifacts(repo, offset, page_size)
    })
    .await?;

    debug!("fetched {} artifacts from {}", artifacts.len(), repo);

    output::print(
        &json!({
            "ok": true,
            "repo": repo,
            "total": artifacts.len(),
            "artifacts": artifacts,
        }),
        ctx.format,
    )
}

/// Run the artifact inventory command: walk every matching repository, join
/// each artifact with its repository, and export the table as CSV.
pub async fn inventory(settings: &Settings, args: &InventoryArgs) -> Result<()> {
    if args.out.extension().and_then(|e| e.to_str()) != Some("csv") {
        return Err(Error::Validation("--out must end with .csv".to_string()));
    }
    if args.page_size < 1 {
        return Err(Error::Validation("--page-size must be >= 1".to_string()));
    }
    if args.repo_page_size < 1 {
        return Err(Error::Validation(
            "--repo-page-size must be >= 1".to_string(),
        ));
    }
    let pattern = args
        .repo_regex
        .as_deref()
        .map(Regex::new)
        .transpose()
        .map_err(|e| Error::Validation(format!("--repo-regex is not a valid regex: {e}")))?;

    let ctx = CommandContext::new(settings)?;

    let repos = fetch_all_offset(args.repo_page_size, |offset| {
        ctx.client.list_repos(offset, args.repo_page_size, None)
    })
    .await?;
    let entries = select_repos(&repos, pattern.as_ref());
    debug!("walking {} of {} repositories", entries.len(), repos.len());

    let mut rows = Vec::new();
    for entry in &entries {
        let artifacts = fetch_all_offset(args.page_size, |offset| {
            ctx.client.list_artifacts(&entry.name, offset, args.page_size)
        })
        .await?;
        debug!("fetched {} artifacts from {}", artifacts.len(), entry.name);
        rows.extend(inventory_rows(artifacts, entry, args.include_repo_metadata));
    }

    let flat: Vec<_> = rows.iter().map(flatten).collect();
    let columns = column_union(&flat);

    let file = std::fs::File::create(&args.out)?;
    write_csv(file, &columns, &flat)?;

    output::print(
        &json!({
            "ok": true,
            "repos_total": repos.len(),
            "repos_included": entries.len(),
            "artifacts_total": flat.len(),
            "out": args.out.display().to_string(),
            "columns": columns,
        }),
        ctx.format,
    )
}
