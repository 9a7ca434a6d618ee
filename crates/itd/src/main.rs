use clap::Parser;
use std::process::ExitCode;

use notes_api_rs::NotesClient;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod dispatch;
mod filter_store;
mod output;

use cli::Cli;
use commands::config::load_config;
use commands::{CommandContext, CommandError};
use dispatch::{AuthCommand, AuthDispatch, NoAuthCommand, NoAuthDispatch};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                let error_json = serde_json::json!({
                    "error": {
                        "code": error_code(&e),
                        "message": e.to_string(),
                    }
                });
                eprintln!("{}", serde_json::to_string_pretty(&error_json).unwrap());
            } else {
                eprintln!("Error: {e}");
            }
            error_exit_code(&e)
        }
    }
}

/// Routes library warnings to stderr. `ITD_LOG` overrides the level
/// derived from --verbose/--quiet.
fn init_tracing(cli: &Cli) {
    let fallback = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_env("ITD_LOG").unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: &Cli) -> commands::Result<()> {
    let ctx = CommandContext::from_cli(cli);

    // Try no-auth commands first (config, completions, help)
    if let Some(dispatch) = NoAuthDispatch::try_from_cli(cli) {
        // Special case: config edit spawns the editor on the async runtime
        if matches!(
            &cli.command,
            Some(cli::Commands::Config {
                command: Some(cli::ConfigCommands::Edit)
            })
        ) {
            return commands::config::execute_edit(&ctx).await;
        }
        return dispatch.execute(&ctx);
    }

    // Build the API client for authenticated commands
    let token = resolve_token(cli)?;
    let client = match resolve_api_url(cli) {
        Some(url) => NotesClient::with_base_url(token, url),
        None => NotesClient::new(token),
    };

    // Dispatch authenticated commands
    if let Some(dispatch) = AuthDispatch::from_cli(cli) {
        return dispatch.execute(&ctx, &client).await;
    }

    // Fallback for any unhandled commands
    if cli.json {
        println!(
            "{}",
            serde_json::json!({
                "status": "not_implemented",
                "command": format!("{:?}", cli.command)
            })
        );
    } else if !cli.quiet {
        println!("Command not yet implemented: {:?}", cli.command);
    }
    Ok(())
}

/// Returns the error code string for JSON output.
fn error_code(e: &CommandError) -> &'static str {
    match e {
        CommandError::Api(_) => "API_ERROR",
        CommandError::Filter(_) => "FILTER_ERROR",
        CommandError::Store(_) => "STORE_ERROR",
        CommandError::Config(_) => "CONFIG_ERROR",
        CommandError::NotFound(_) => "NOT_FOUND",
        CommandError::Ambiguous { .. } => "AMBIGUOUS",
        CommandError::Io(_) => "IO_ERROR",
        CommandError::Json(_) => "JSON_ERROR",
    }
}

/// Returns the exit code for an error.
fn error_exit_code(e: &CommandError) -> ExitCode {
    match e {
        CommandError::Api(e) => ExitCode::from(e.exit_code()),
        CommandError::Config(_) => ExitCode::from(2),
        CommandError::Filter(_) => ExitCode::from(1),
        CommandError::Store(_) => ExitCode::from(5),
        CommandError::NotFound(_) => ExitCode::from(5),
        CommandError::Ambiguous { .. } => ExitCode::from(1),
        CommandError::Io(_) => ExitCode::from(3),
        CommandError::Json(_) => ExitCode::from(1),
    }
}

/// Resolves the API token with priority: flag > env > config.
///
/// The resolution order is:
/// 1. `--token` command line flag (highest priority)
/// 2. `ITD_TOKEN` environment variable (clap fills the same field)
/// 3. Token from config file (`~/.config/itd/config.toml`)
fn resolve_token_optional(cli: &Cli) -> Option<String> {
    // When cli.token is Some, it's either from --token flag OR from ITD_TOKEN env
    if let Some(token) = &cli.token {
        return Some(token.clone());
    }

    load_config().ok().and_then(|config| config.token)
}

/// Resolves the API token or explains how to configure one.
fn resolve_token(cli: &Cli) -> commands::Result<String> {
    resolve_token_optional(cli).ok_or_else(|| {
        CommandError::Config(
            "no API token configured; pass --token, set ITD_TOKEN, or run 'itd config set token <token>'"
                .into(),
        )
    })
}

/// Resolves the notes host base URL: flag/env first, then config. The
/// client falls back to its default host when neither is set.
fn resolve_api_url(cli: &Cli) -> Option<String> {
    if let Some(url) = &cli.api_url {
        return Some(url.clone());
    }

    load_config().ok().and_then(|config| config.api_url)
}
