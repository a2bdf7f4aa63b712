//! Configuration management for xrayctl
//!
//! Effective settings are merged from four layers with fixed precedence:
//! explicit flag > `XRAY_*` environment variable > config file > default.
//! Resolution is a pure function of its inputs; the process environment is
//! read once at the edge and passed in.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::{Error, Result};
use crate::output::OutputFormat;

/// Default HTTP timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Fixed marker substituted for the token in any printed summary
pub const TOKEN_PLACEHOLDER: &str = "***";

/// Effective settings for one command invocation. Immutable once resolved.
#[derive(Debug, Clone)]
pub struct Settings {
    pub url: Option<String>,
    pub token: Option<String>,
    pub project: Option<String>,
    pub timeout: u64,
    pub format: OutputFormat,
}

/// Values supplied explicitly via CLI flags. `None` means "not given".
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub url: Option<String>,
    pub token: Option<String>,
    pub project: Option<String>,
    pub timeout: Option<u64>,
    pub format: Option<OutputFormat>,
    pub config: Option<PathBuf>,
}

/// Raw `XRAY_*` environment variable values.
#[derive(Debug, Clone, Default)]
pub struct EnvValues {
    pub url: Option<String>,
    pub token: Option<String>,
    pub project: Option<String>,
    pub timeout: Option<String>,
    pub format: Option<String>,
}

impl EnvValues {
    /// Snapshot the relevant variables from the process environment.
    pub fn from_process() -> Self {
        Self {
            url: std::env::var("XRAY_URL").ok(),
            token: std::env::var("XRAY_TOKEN").ok(),
            project: std::env::var("XRAY_PROJECT").ok(),
            timeout: std::env::var("XRAY_TIMEOUT").ok(),
            format: std::env::var("XRAY_FORMAT").ok(),
        }
    }
}

/// On-disk configuration document (YAML).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileConfig {
    pub url: Option<String>,
    pub token: Option<String>,
    pub project: Option<String>,
    pub timeout: Option<u64>,
    pub format: Option<OutputFormat>,
}

impl FileConfig {
    /// The document written by `config init`.
    pub fn initial() -> Self {
        Self {
            timeout: Some(DEFAULT_TIMEOUT_SECS),
            format: Some(OutputFormat::Json),
            ..Self::default()
        }
    }

    /// Read the config file; a missing file is an empty document.
    pub fn read(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&contents)?)
    }

    /// Persist the document, creating parent directories as needed.
    ///
    /// When a token is present the file mode is tightened to 0600,
    /// best-effort: chmod failure does not fail the write.
    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = serde_yaml::to_string(self)?;
        std::fs::write(path, contents)?;

        #[cfg(unix)]
        if self.token.is_some() {
            use std::os::unix::fs::PermissionsExt;
            let _ = std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600));
        }

        Ok(())
    }

    /// Overlay the `Some` fields of `patch` onto `self`.
    pub fn apply(&mut self, patch: &FileConfig) {
        if patch.url.is_some() {
            self.url = patch.url.clone();
        }
        if patch.token.is_some() {
            self.token = patch.token.clone();
        }
        if patch.project.is_some() {
            self.project = patch.project.clone();
        }
        if patch.timeout.is_some() {
            self.timeout = patch.timeout;
        }
        if patch.format.is_some() {
            self.format = patch.format;
        }
    }

    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        *self == FileConfig::default()
    }

    /// Summary of the `Some` fields with the token redacted. This is the only
    /// representation of a patch that ever reaches stdout.
    pub fn redacted(&self) -> Value {
        let mut out = Map::new();
        if let Some(ref url) = self.url {
            out.insert("url".to_string(), json!(url));
        }
        if self.token.is_some() {
            out.insert("token".to_string(), json!(TOKEN_PLACEHOLDER));
        }
        if let Some(ref project) = self.project {
            out.insert("project".to_string(), json!(project));
        }
        if let Some(timeout) = self.timeout {
            out.insert("timeout".to_string(), json!(timeout));
        }
        if let Some(format) = self.format {
            out.insert("format".to_string(), json!(format.to_string()));
        }
        Value::Object(out)
    }
}

/// Read-modify-write: overlay `patch` onto the existing file (missing file is
/// treated as empty) and persist the merged document.
pub fn update_config(path: &Path, patch: &FileConfig) -> Result<FileConfig> {
    let mut current = FileConfig::read(path)?;
    current.apply(patch);
    current.write(path)?;
    Ok(current)
}

/// Default config location: `<user config dir>/xrayctl/config.yaml`.
pub fn default_config_path() -> Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| {
        Error::Validation("could not determine the user config directory".to_string())
    })?;
    Ok(base.join("xrayctl").join("config.yaml"))
}

/// Resolve the config path, honoring a `--config` override.
pub fn resolve_config_path(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => default_config_path(),
    }
}

/// Merge the three input layers into effective settings.
///
/// Missing url/token are not an error here; commands that need them fail with
/// a descriptive message at the point of first use.
pub fn resolve(overrides: &Overrides, env: &EnvValues, file: &FileConfig) -> Result<Settings> {
    let timeout = match overrides.timeout {
        Some(t) => t,
        None => match env.timeout {
            Some(ref raw) => raw.parse().map_err(|_| {
                Error::Validation(format!("XRAY_TIMEOUT must be an integer, got {raw:?}"))
            })?,
            None => file.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS),
        },
    };

    let format = match overrides.format {
        Some(f) => f,
        None => match env.format {
            Some(ref raw) => raw.parse()?,
            None => file.format.unwrap_or_default(),
        },
    };

    Ok(Settings {
        url: overrides
            .url
            .clone()
            .or_else(|| env.url.clone())
            .or_else(|| file.url.clone()),
        token: overrides
            .token
            .clone()
            .or_else(|| env.token.clone())
            .or_else(|| file.token.clone()),
        project: overrides
            .project
            .clone()
            .or_else(|| env.project.clone())
            .or_else(|| file.project.clone()),
        timeout,
        format,
    })
}

impl Settings {
    /// Resolve settings for this invocation from flags, the process
    /// environment, and the config file.
    pub fn load(overrides: &Overrides) -> Result<Self> {
        let path = resolve_config_path(overrides.config.as_deref())?;
        let file = FileConfig::read(&path)?;
        resolve(overrides, &EnvValues::from_process(), &file)
    }

    pub fn require_url(&self) -> Result<&str> {
        self.url.as_deref().ok_or_else(|| {
            Error::Validation(
                "missing required setting: url (set --url, XRAY_URL, or the config file)"
                    .to_string(),
            )
        })
    }

    pub fn require_token(&self) -> Result<&str> {
        self.token.as_deref().ok_or_else(|| {
            Error::Validation(
                "missing required setting: token (set --token, XRAY_TOKEN, or the config file)"
                    .to_string(),
            )
        })
    }

    /// The merged view printed by `config view`; the token is never echoed.
    pub fn effective(&self) -> Value {
        json!({
            "url": self.url,
            "token": self.token.as_ref().map(|_| TOKEN_PLACEHOLDER),
            "project": self.project,
            "timeout": self.timeout,
            "format": self.format.to_string(),
        })
    }
}
