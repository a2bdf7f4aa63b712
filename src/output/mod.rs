//! Output formatting for CLI results
//!
//! Every command result and every reported error goes through [`print`], so
//! scripts get one consistent envelope regardless of outcome.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// Output format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Indented JSON, key order preserved (default)
    #[default]
    Json,
    /// Line-oriented YAML
    Yaml,
}

impl std::str::FromStr for OutputFormat {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "json" => Ok(OutputFormat::Json),
            "yaml" => Ok(OutputFormat::Yaml),
            other => Err(crate::error::Error::Validation(format!(
                "unsupported output format {other:?} (expected json or yaml)"
            ))),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Yaml => write!(f, "yaml"),
        }
    }
}

/// Render a dynamic value in the requested format.
pub fn render(value: &Value, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
    }
}

/// Render and print to stdout.
pub fn print(value: &Value, format: OutputFormat) -> Result<()> {
    println!("{}", render(value, format)?);
    Ok(())
}
