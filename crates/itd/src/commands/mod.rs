//! Command implementations for the itd CLI.
//!
//! This module contains the actual command handlers that are invoked by the CLI.

pub mod completions;
pub mod config;
pub mod done;
pub mod filters;
pub mod list;
pub mod scan;

use notes_api_rs::NotesClient;
use todo_summary_rs::filter::FilterSpec;
use todo_summary_rs::scanner::SummaryBuilder;
use todo_summary_rs::style;

use crate::cli::{Cli, SpecArgs};
use crate::filter_store::StoreError;

/// Error type for command execution.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Notes API error.
    #[error("API error: {0}")]
    Api(#[from] notes_api_rs::Error),

    /// Filter parsing error.
    #[error("filter error: {0}")]
    Filter(#[from] todo_summary_rs::filter::FilterError),

    /// Filter store error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Nothing matched a lookup.
    #[error("{0} not found")]
    NotFound(String),

    /// A lookup matched more than one todo.
    #[error("'{query}' matches {count} todos; rerun with --all or narrow with --note/--category")]
    Ambiguous { query: String, count: usize },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for command execution.
pub type Result<T> = std::result::Result<T, CommandError>;

/// Context for command execution, containing common dependencies.
pub struct CommandContext {
    /// Whether to output JSON.
    pub json_output: bool,
    /// Whether to use colors.
    pub use_colors: bool,
    /// Whether to be quiet (errors only).
    pub quiet: bool,
    /// Whether to be verbose.
    pub verbose: bool,
}

impl CommandContext {
    /// Creates a new command context from CLI arguments.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            json_output: cli.json,
            use_colors: !cli.no_color,
            quiet: cli.quiet,
            verbose: cli.verbose,
        }
    }
}

/// Builds a summary builder from the configured dialect and scan pacing.
///
/// # Errors
///
/// Returns `CommandError::Config` when the configured dialect is unknown.
pub fn summary_builder(client: &NotesClient) -> Result<SummaryBuilder> {
    let settings = config::load_config()?.settings();
    let style = style::dialect(&settings.dialect).ok_or_else(|| {
        let valid: Vec<&str> = style::dialects().iter().map(|d| d.id()).collect();
        CommandError::Config(format!(
            "unknown dialect '{}'. Valid values: {}",
            settings.dialect,
            valid.join(", ")
        ))
    })?;
    Ok(SummaryBuilder::new(
        client.clone(),
        style,
        settings.scan_options(),
    ))
}

/// Overlays command-line filter dimensions onto a spec.
///
/// Only dimensions given on the command line are touched, so flags can
/// refine a saved filter without clearing its other fields.
///
/// # Errors
///
/// Returns `CommandError::Filter` when a window label does not parse.
pub fn apply_spec_args(spec: &mut FilterSpec, args: &SpecArgs) -> Result<()> {
    if !args.category.is_empty() {
        spec.categories = args.category.clone();
    }
    if !args.tag.is_empty() {
        spec.tags = args.tag.clone();
    }
    if !args.note.is_empty() {
        spec.note_titles = args.note.clone();
    }
    if !args.note_id.is_empty() {
        spec.note_ids = args.note_id.clone();
    }
    if !args.notebook.is_empty() {
        spec.notebook_titles = args.notebook.clone();
    }
    if !args.notebook_id.is_empty() {
        spec.notebook_ids = args.notebook_id.clone();
    }
    if let Some(due) = &args.due {
        spec.date = due.parse()?;
    }
    if let Some(date_override) = &args.date_override {
        spec.date_override = date_override.parse()?;
    }
    if let Some(completed) = &args.completed {
        spec.completed = completed.parse()?;
    }
    Ok(())
}
