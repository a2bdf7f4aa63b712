//! CLI command definitions and handlers

use clap::{Parser, Subcommand};

pub mod args;
pub mod artifact;
pub mod config;
pub mod context;
pub mod ignore;
pub mod repo;
pub mod scan;
pub mod system;

pub use args::{GlobalArgs, RuleFilterArgs, SortDir};
pub use context::CommandContext;

/// xrayctl - CLI companion for JFrog Xray
#[derive(Parser, Debug)]
#[command(name = "xrayctl")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check connectivity and authentication against Xray
    Ping,

    /// Manage xrayctl configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Repository operations
    #[command(subcommand)]
    Repo(RepoCommands),

    /// Artifact operations
    #[command(subcommand)]
    Artifact(ArtifactCommands),

    /// Trigger and wait on scans
    #[command(subcommand)]
    Scan(ScanCommands),

    /// Ignore rules operations
    #[command(name = "ignore-rules", subcommand)]
    IgnoreRules(IgnoreRuleCommands),
}

/// Configuration management subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Write a default config file
    Init,

    /// Show the effective configuration (merged, token redacted)
    View,

    /// Set one config value
    Set {
        /// Config key to set
        #[arg(value_enum)]
        key: config::ConfigKey,
        /// New value
        value: String,
    },

    /// Save the provided global flags into the config file
    Save,
}

/// Repository subcommands
#[derive(Subcommand, Debug)]
pub enum RepoCommands {
    /// List all repositories known to Xray
    List {
        /// Search string to filter repository names
        #[arg(long)]
        search: Option<String>,

        /// Repositories fetched per page
        #[arg(long, default_value_t = 200)]
        page_size: u32,
    },
}

/// Artifact subcommands
#[derive(Subcommand, Debug)]
pub enum ArtifactCommands {
    /// List all artifacts in a repository
    List {
        /// Repository key
        #[arg(long)]
        repo: String,

        /// Artifacts fetched per page
        #[arg(long, default_value_t = 200)]
        page_size: u32,
    },

    /// Export a joined repository/artifact inventory to CSV
    Inventory(artifact::InventoryArgs),
}

/// Scan subcommands
#[derive(Subcommand, Debug)]
pub enum ScanCommands {
    /// Trigger an on-demand artifact scan, optionally waiting for completion
    Artifact(scan::ScanArtifactArgs),
}

/// Ignore-rule subcommands
#[derive(Subcommand, Debug)]
pub enum IgnoreRuleCommands {
    /// Create an ignore rule
    Create(ignore::CreateArgs),

    /// List ignore rules
    List(ignore::ListArgs),

    /// Fetch one ignore rule by id
    Get {
        /// Ignore rule id
        rule_id: String,
    },
}
