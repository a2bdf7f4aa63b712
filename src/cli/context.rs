//! Command execution context
//!
//! Bundles the pieces every API-facing command needs: a constructed client
//! and the output format. Commands that only touch the config file skip this
//! and never require url/token.

use crate::client::XrayClient;
use crate::config::Settings;
use crate::error::Result;
use crate::output::OutputFormat;

/// Per-command context. Built after settings resolution; this is the point
/// where missing url/token surface as errors.
pub struct CommandContext {
    pub client: XrayClient,
    pub format: OutputFormat,
}

impl CommandContext {
    pub fn new(settings: &Settings) -> Result<Self> {
        let url = settings.require_url()?;
        let token = settings.require_token()?;
        let client = XrayClient::new(url, token, settings.timeout, settings.project.clone())?;

        Ok(Self {
            client,
            format: settings.format,
        })
    }
}
