//! Configuration management commands

use serde_json::json;

use crate::config::{update_config, FileConfig, Overrides, Settings};
use crate::error::{Error, Result};
use crate::output;

/// Keys accepted by `config set`
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ConfigKey {
    Url,
    Token,
    Project,
    Timeout,
    Format,
}

/// Run `config init`: write the default document.
pub fn init(settings: &Settings, overrides: &Overrides) -> Result<()> {
    let path = crate::config::resolve_config_path(overrides.config.as_deref())?;
    FileConfig::initial().write(&path)?;
    output::print(
        &json!({"ok": true, "path": path.display().to_string()}),
        settings.format,
    )
}

/// Run `config view`: print the merged effective settings, token redacted.
pub fn view(settings: &Settings) -> Result<()> {
    output::print(
        &json!({"ok": true, "effective": settings.effective()}),
        settings.format,
    )
}

/// Run `config set`: coerce, validate, and persist a single key.
pub fn set(
    settings: &Settings,
    overrides: &Overrides,
    key: ConfigKey,
    value: &str,
) -> Result<()> {
    let mut patch = FileConfig::default();
    match key {
        ConfigKey::Url => patch.url = Some(value.to_string()),
        ConfigKey::Token => patch.token = Some(value.to_string()),
        ConfigKey::Project => patch.project = Some(value.to_string()),
        ConfigKey::Timeout => {
            patch.timeout = Some(value.parse().map_err(|_| {
                Error::Validation(format!("timeout must be an integer, got {value:?}"))
            })?);
        }
        ConfigKey::Format => patch.format = Some(value.parse()?),
    }

    let path = crate::config::resolve_config_path(overrides.config.as_deref())?;
    update_config(&path, &patch)?;

    output::print(
        &json!({
            "ok": true,
            "path": path.display().to_string(),
            "updated": patch.redacted(),
        }),
        settings.format,
    )
}

/// Run `config save`: persist exactly the global flags that were provided.
pub fn save(settings: &Settings, overrides: &Overrides) -> Result<()> {
    let patch = FileConfig {
        url: overrides.url.clone(),
        token: overrides.token.clone(),
        project: overrides.project.clone(),
        timeout: overrides.timeout,
        format: overrides.format,
    };

    if patch.is_empty() {
        return Err(Error::Validation(
            "no flags provided to save; pass --url/--token/--project/--timeout/--format"
                .to_string(),
        ));
    }

    let path = crate::config::resolve_config_path(overrides.config.as_deref())?;
    update_config(&path, &patch)?;

    output::print(
        &json!({
            "ok": true,
            "path": path.display().to_string(),
            "saved": patch.redacted(),
        }),
        settings.format,
    )
}
