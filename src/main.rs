//! xrayctl - CLI companion for JFrog Xray

use std::process::ExitCode;

use clap::Parser;

mod cli;
mod client;
mod config;
mod error;
mod output;

use cli::{
    ArtifactCommands, Cli, Commands, ConfigCommands, IgnoreRuleCommands, RepoCommands, ScanCommands,
};
use config::Settings;
use error::{Error, Result};
use output::OutputFormat;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.global.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let overrides = cli.global.to_overrides();

    // Settings resolution itself can fail (unreadable file, bad env value);
    // at that point only the flag-level format is available for rendering.
    let settings = match Settings::load(&overrides) {
        Ok(settings) => settings,
        Err(err) => return report(&err, cli.global.format.unwrap_or_default()),
    };

    match run(cli.command, &settings, &overrides).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report(&err, settings.format),
    }
}

async fn run(
    command: Commands,
    settings: &Settings,
    overrides: &config::Overrides,
) -> Result<()> {
    match command {
        Commands::Ping => cli::system::ping(settings).await,
        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::Init => cli::config::init(settings, overrides),
            ConfigCommands::View => cli::config::view(settings),
            ConfigCommands::Set { key, value } => {
                cli::config::set(settings, overrides, key, &value)
            }
            ConfigCommands::Save => cli::config::save(settings, overrides),
        },
        Commands::Repo(repo_cmd) => match repo_cmd {
            RepoCommands::List { search, page_size } => {
                cli::repo::list(settings, search.as_deref(), page_size).await
            }
        },
        Commands::Artifact(artifact_cmd) => match artifact_cmd {
            ArtifactCommands::List { repo, page_size } => {
                cli::artifact::list(settings, &repo, page_size).await
            }
            ArtifactCommands::Inventory(args) => cli::artifact::inventory(settings, &args).await,
        },
        Commands::Scan(scan_cmd) => match scan_cmd {
            ScanCommands::Artifact(args) => cli::scan::artifact(settings, &args).await,
        },
        Commands::IgnoreRules(rule_cmd) => match rule_cmd {
            IgnoreRuleCommands::Create(args) => cli::ignore::create(settings, &args).await,
            IgnoreRuleCommands::List(args) => cli::ignore::list(settings, &args).await,
            IgnoreRuleCommands::Get { rule_id } => cli::ignore::get(settings, &rule_id).await,
        },
    }
}

/// Render a failure through the regular output formatter and map it to the
/// process exit code (2 for upstream HTTP errors, 1 otherwise).
fn report(err: &Error, format: OutputFormat) -> ExitCode {
    match output::render(&err.to_payload(), format) {
        Ok(text) => println!("{text}"),
        Err(render_err) => eprintln!("Error: {err} (render failed: {render_err})"),
    }
    ExitCode::from(err.exit_code())
}
