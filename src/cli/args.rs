//! Shared CLI argument types

use std::path::PathBuf;

use clap::Args;

use crate::config::Overrides;
use crate::output::OutputFormat;

/// Global connection/output flags, available on every subcommand.
///
/// Each flag is one layer of the settings merge; unset flags fall through to
/// the `XRAY_*` environment variables and the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Path to the config file (default: <user config dir>/xrayctl/config.yaml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// JFrog platform base URL, e.g. https://jfrog.example.com
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// JFrog access token
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Xray project key to scope requests to
    #[arg(long, global = true)]
    pub project: Option<String>,

    /// HTTP timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Output format (json, yaml)
    #[arg(long, global = true, value_enum)]
    pub format: Option<OutputFormat>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

impl GlobalArgs {
    pub fn to_overrides(&self) -> Overrides {
        Overrides {
            url: self.url.clone(),
            token: self.token.clone(),
            project: self.project.clone(),
            timeout: self.timeout,
            format: self.format,
            config: self.config.clone(),
        }
    }
}

/// Sort direction for list commands
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SortDir {
    /// Ascending order
    Asc,
    /// Descending order
    Desc,
}

impl SortDir {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDir::Asc => "asc",
            SortDir::Desc => "desc",
        }
    }
}

/// Ignore-rule list filters for narrowing down results
#[derive(Args, Debug, Clone, Default)]
pub struct RuleFilterArgs {
    /// Filter by watch name
    #[arg(long)]
    pub watch: Option<String>,

    /// Filter by policy name
    #[arg(long)]
    pub policy: Option<String>,

    /// Filter by Xray vulnerability id
    #[arg(long)]
    pub vulnerability: Option<String>,

    /// Filter by CVE id, e.g. CVE-2024-1234
    #[arg(long)]
    pub cve: Option<String>,

    /// Filter by license name
    #[arg(long)]
    pub license: Option<String>,

    /// Filter by component name
    #[arg(long)]
    pub component_name: Option<String>,

    /// Filter by component version
    #[arg(long)]
    pub component_version: Option<String>,

    /// Only rules expiring before this ISO-8601 timestamp
    #[arg(long)]
    pub expires_before: Option<String>,

    /// Only rules expiring after this ISO-8601 timestamp
    #[arg(long)]
    pub expires_after: Option<String>,
}
