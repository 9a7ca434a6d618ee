//! Command dispatch module for routing CLI commands to their handlers.
//!
//! This module provides trait-based dispatch for CLI commands, replacing
//! the large match statement in main.rs with a more maintainable structure.

use notes_api_rs::NotesClient;

use crate::cli::{Cli, Commands, ConfigCommands, FiltersCommands, SpecArgs};
use crate::commands::{self, CommandContext, CommandError, Result};

/// Trait for commands that can be executed without authentication.
pub trait NoAuthCommand {
    /// Execute the command without requiring an API token.
    fn execute(&self, ctx: &CommandContext) -> Result<()>;
}

/// Trait for commands that require authentication.
#[allow(async_fn_in_trait)]
pub trait AuthCommand {
    /// Execute the command against the notes host.
    async fn execute(&self, ctx: &CommandContext, client: &NotesClient) -> Result<()>;
}

/// Commands that don't require authentication.
pub enum NoAuthDispatch<'a> {
    Config(&'a Option<ConfigCommands>),
    Completions(&'a crate::cli::Shell),
    Help,
}

impl<'a> NoAuthDispatch<'a> {
    /// Try to create a no-auth dispatch from the CLI command.
    /// Returns None if the command requires authentication.
    pub fn try_from_cli(cli: &'a Cli) -> Option<Self> {
        match &cli.command {
            Some(Commands::Config { command }) => Some(Self::Config(command)),
            Some(Commands::Completions { shell }) => Some(Self::Completions(shell)),
            None => Some(Self::Help),
            _ => None,
        }
    }
}

impl NoAuthCommand for NoAuthDispatch<'_> {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        match self {
            Self::Config(command) => dispatch_config(ctx, command),
            Self::Completions(shell) => {
                commands::completions::execute(shell).map_err(CommandError::Io)
            }
            Self::Help => {
                if !ctx.quiet {
                    println!("itd - inline todos for your notes");
                    println!("Use --help for usage information");
                }
                Ok(())
            }
        }
    }
}

/// Dispatch config subcommands.
fn dispatch_config(ctx: &CommandContext, command: &Option<ConfigCommands>) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::execute_show(ctx),
        Some(ConfigCommands::Set { key, value }) => {
            let opts = commands::config::ConfigSetOptions {
                key: key.clone(),
                value: value.clone(),
            };
            commands::config::execute_set(ctx, &opts)
        }
        Some(ConfigCommands::Path) => commands::config::execute_path(ctx),
        Some(ConfigCommands::Edit) => {
            // Edit spawns an editor and is handled on the async path in main
            Err(CommandError::Config("edit requires async context".into()))
        }
    }
}

/// Commands that require authentication.
pub enum AuthDispatch<'a> {
    Scan,
    List {
        saved: &'a Option<String>,
        limit: u32,
        all: bool,
        spec: &'a SpecArgs,
    },
    Done {
        query: &'a str,
        note: &'a Option<String>,
        category: &'a Option<String>,
        reopen: bool,
        all: bool,
    },
    Filters(&'a Option<FiltersCommands>),
}

impl<'a> AuthDispatch<'a> {
    /// Create an auth dispatch from the CLI command.
    /// Returns None if the command doesn't require authentication (use NoAuthDispatch first).
    pub fn from_cli(cli: &'a Cli) -> Option<Self> {
        match &cli.command {
            Some(Commands::Scan) => Some(Self::Scan),
            Some(Commands::List {
                saved,
                limit,
                all,
                spec,
            }) => Some(Self::List {
                saved,
                limit: *limit,
                all: *all,
                spec,
            }),
            Some(Commands::Done {
                query,
                note,
                category,
                reopen,
                all,
            }) => Some(Self::Done {
                query,
                note,
                category,
                reopen: *reopen,
                all: *all,
            }),
            Some(Commands::Filters { command }) => Some(Self::Filters(command)),
            // Already handled by NoAuthDispatch
            Some(Commands::Config { .. }) | Some(Commands::Completions { .. }) | None => None,
        }
    }
}

impl AuthCommand for AuthDispatch<'_> {
    async fn execute(&self, ctx: &CommandContext, client: &NotesClient) -> Result<()> {
        match self {
            Self::Scan => commands::scan::execute(ctx, client).await,

            Self::List {
                saved,
                limit,
                all,
                spec,
            } => {
                let opts = commands::list::ListOptions {
                    saved: (*saved).clone(),
                    limit: *limit,
                    all: *all,
                    spec: (*spec).clone(),
                };
                commands::list::execute(ctx, &opts, client).await
            }

            Self::Done {
                query,
                note,
                category,
                reopen,
                all,
            } => {
                let opts = commands::done::DoneOptions {
                    query: (*query).to_string(),
                    note: (*note).clone(),
                    category: (*category).clone(),
                    reopen: *reopen,
                    all: *all,
                };
                commands::done::execute(ctx, &opts, client).await
            }

            Self::Filters(command) => dispatch_filters(ctx, command, client).await,
        }
    }
}

async fn dispatch_filters(
    ctx: &CommandContext,
    command: &Option<FiltersCommands>,
    client: &NotesClient,
) -> Result<()> {
    match command {
        Some(FiltersCommands::List) | None => commands::filters::execute(ctx, client).await,
        Some(FiltersCommands::Save { name, spec }) => {
            let opts = commands::filters::FiltersSaveOptions {
                name: name.clone(),
                spec: spec.clone(),
            };
            commands::filters::execute_save(ctx, &opts)
        }
        Some(FiltersCommands::Show { name }) => {
            let opts = commands::filters::FiltersShowOptions { name: name.clone() };
            commands::filters::execute_show(ctx, &opts)
        }
        Some(FiltersCommands::Use { name }) => {
            let opts = commands::filters::FiltersUseOptions { name: name.clone() };
            commands::filters::execute_use(ctx, &opts)
        }
        Some(FiltersCommands::Rename { from, to }) => {
            let opts = commands::filters::FiltersRenameOptions {
                from: from.clone(),
                to: to.clone(),
            };
            commands::filters::execute_rename(ctx, &opts)
        }
        Some(FiltersCommands::Delete { name }) => {
            let opts = commands::filters::FiltersDeleteOptions { name: name.clone() };
            commands::filters::execute_delete(ctx, &opts)
        }
        Some(FiltersCommands::Clear) => commands::filters::execute_clear(ctx),
    }
}
