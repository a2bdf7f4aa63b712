//! Ignore-rule commands

use clap::Args;
use serde_json::json;

use crate::cli::{CommandContext, RuleFilterArgs, SortDir};
use crate::client::{build_create_payload, fetch_all_pages, ListRulesParams};
use crate::config::Settings;
use crate::error::Result;
use crate::output;

/// Arguments for `ignore-rules create`
#[derive(Args, Debug, Clone)]
pub struct CreateArgs {
    /// Notes explaining why the findings are ignored
    #[arg(long)]
    pub note: String,

    /// Watch name (repeatable)
    #[arg(long = "watch")]
    pub watches: Vec<String>,

    /// CVE id (repeatable), e.g. CVE-2024-1234
    #[arg(long = "cve")]
    pub cves: Vec<String>,

    /// Xray vulnerability id (repeatable)
    #[arg(long = "vuln")]
    pub vulns: Vec<String>,

    /// License name or 'any' (repeatable)
    #[arg(long = "license")]
    pub licenses: Vec<String>,

    /// Expiry as an ISO-8601 UTC timestamp, e.g. 2026-01-01T00:00:00Z
    #[arg(long)]
    pub expires_at: Option<String>,

    /// Print the validated request body without creating the rule
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for `ignore-rules list`
#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    #[command(flatten)]
    pub filters: RuleFilterArgs,

    /// Page number (1-indexed)
    #[arg(long, default_value_t = 1)]
    pub page: u32,

    /// Rows per page
    #[arg(long, default_value_t = 50)]
    pub rows: u32,

    /// Field to order results by
    #[arg(long)]
    pub order_by: Option<String>,

    /// Sort direction (asc, desc)
    #[arg(long, value_enum)]
    pub direction: Option<SortDir>,

    /// Fetch every page, not just the requested one
    #[arg(long)]
    pub all: bool,
}

impl ListArgs {
    fn to_params(&self) -> ListRulesParams {
        ListRulesParams {
            watch: self.filters.watch.clone(),
            policy: self.filters.policy.clone(),
            vulnerability: self.filters.vulnerability.clone(),
            cve: self.filters.cve.clone(),
            license: self.filters.license.clone(),
            component_name: self.filters.component_name.clone(),
            component_version: self.filters.component_version.clone(),
            page: self.page,
            rows: self.rows,
            order_by: self.order_by.clone(),
            direction: self.direction.map(|d| d.as_str().to_string()),
            expires_before: self.filters.expires_before.clone(),
            expires_after: self.filters.expires_after.clone(),
        }
    }
}

/// Run the ignore-rules create command.
pub async fn create(settings: &Settings, args: &CreateArgs) -> Result<()> {
    let payload = build_create_payload(
        &args.note,
        &args.watches,
        &args.cves,
        &args.vulns,
        &args.licenses,
        args.expires_at.as_deref(),
    )?;

    if args.dry_run {
        return output::print(&json!({"ok": true, "request": payload}), settings.format);
    }

    let ctx = CommandContext::new(settings)?;
    let response = ctx.client.create_ignore_rule(&payload).await?;
    output::print(
        &json!({"ok": true, "request": payload, "response": response}),
        ctx.format,
    )
}

/// Run the ignore-rules list command, auto-paginating with `--all`.
pub async fn list(settings: &Settings, args: &ListArgs) -> Result<()> {
    let params = args.to_params();
    params.validate()?;

    let ctx = CommandContext::new(settings)?;

    if !args.all {
        let response = ctx.client.list_ignore_rules(&params.to_query()).await?;
        return output::print(
            &json!({"ok": true, "params": params.to_value(), "response": response}),
            ctx.format,
        );
    }

    let client = &ctx.client;
    let (rules, total) = fetch_all_pages(params.page, |page| {
        let query = params.query_for_page(page);
        async move { client.list_ignore_rules(&query).await }
    })
    .await?;

    let total = total.unwrap_or(rules.len() as u64);
    output::print(
        &json!({
            "ok": true,
            "params": params.to_value(),
            "response": {"data": rules, "total_count": total},
        }),
        ctx.format,
    )
}

/// Run the ignore-rules get command.
pub async fn get(settings: &Settings, rule_id: &str) -> Result<()> {
    let ctx = CommandContext::new(settings)?;
    let response = ctx.client.get_ignore_rule(rule_id).await?;
    output::print(&json!({"ok": true, "response": response}), ctx.format)
}
