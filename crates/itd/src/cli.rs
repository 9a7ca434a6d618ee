//! CLI argument parsing using clap derive macros.
//!
//! This module defines the command-line interface for the itd CLI.

use clap::{Args, Parser, Subcommand, ValueEnum};

/// itd - inline todos from your notes, on the command line
#[derive(Parser, Debug)]
#[command(name = "itd")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbose output (show debug information)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Force JSON output
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Override API token (default: from config)
    #[arg(long, global = true, env = "ITD_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Override the notes API base URL (default: from config)
    #[arg(long, global = true, env = "ITD_API_URL")]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan all notes and summarize the todos found
    Scan,

    /// List todos matching a filter
    #[command(alias = "l")]
    List {
        /// Start from a saved filter instead of the active one
        #[arg(long, value_name = "NAME")]
        saved: Option<String>,

        /// Limit results (default: 50)
        #[arg(long, default_value = "50")]
        limit: u32,

        /// Show all matches (no limit)
        #[arg(long)]
        all: bool,

        #[command(flatten)]
        spec: SpecArgs,
    },

    /// Complete todos whose message matches a query
    #[command(alias = "d")]
    Done {
        /// Substring of the todo message (case-insensitive)
        query: String,

        /// Only match todos in this note (title or ID)
        #[arg(long)]
        note: Option<String>,

        /// Only match todos in this category
        #[arg(long)]
        category: Option<String>,

        /// Reopen matching completed todos instead
        #[arg(long)]
        reopen: bool,

        /// Update every match instead of failing on ambiguity
        #[arg(long)]
        all: bool,
    },

    /// List and manage saved filters
    #[command(alias = "f")]
    Filters {
        #[command(subcommand)]
        command: Option<FiltersCommands>,
    },

    /// View and edit configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Filter dimensions shared by `list` and `filters save`.
///
/// Repeatable flags collect into a set; within a set any value may
/// match. Window flags take the labels the filter library persists
/// ("Today", "End of Week", "2 weeks", "All Time").
#[derive(Args, Clone, Debug, Default)]
pub struct SpecArgs {
    /// Filter by category (repeatable)
    #[arg(short, long, action = clap::ArgAction::Append)]
    pub category: Vec<String>,

    /// Filter by tag (repeatable)
    #[arg(short, long, action = clap::ArgAction::Append)]
    pub tag: Vec<String>,

    /// Filter by note title (repeatable)
    #[arg(long, action = clap::ArgAction::Append)]
    pub note: Vec<String>,

    /// Filter by note ID (repeatable)
    #[arg(long, action = clap::ArgAction::Append)]
    pub note_id: Vec<String>,

    /// Filter by notebook title (repeatable)
    #[arg(long, action = clap::ArgAction::Append)]
    pub notebook: Vec<String>,

    /// Filter by notebook ID (repeatable)
    #[arg(long, action = clap::ArgAction::Append)]
    pub notebook_id: Vec<String>,

    /// Due-date window (e.g. "Today", "End of Week", "2 weeks")
    #[arg(long, value_name = "WINDOW")]
    pub due: Option<String>,

    /// Second due window unioned back in after the other filters narrow
    #[arg(long = "override", value_name = "WINDOW")]
    pub date_override: Option<String>,

    /// Completed-item window (e.g. "None", "Today", "All Time")
    #[arg(long, value_name = "WINDOW")]
    pub completed: Option<String>,
}

impl SpecArgs {
    /// True when any filter dimension was given on the command line.
    pub fn is_empty(&self) -> bool {
        self.category.is_empty()
            && self.tag.is_empty()
            && self.note.is_empty()
            && self.note_id.is_empty()
            && self.notebook.is_empty()
            && self.notebook_id.is_empty()
            && self.due.is_none()
            && self.date_override.is_none()
            && self.completed.is_none()
    }
}

/// Shell types for completions
#[derive(ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

/// Filter subcommands
#[derive(Subcommand, Debug)]
pub enum FiltersCommands {
    /// List saved filters with their open counts (default)
    List,

    /// Name the active filter and save it
    Save {
        /// Filter name
        name: String,

        #[command(flatten)]
        spec: SpecArgs,
    },

    /// Show a saved filter (or the active one)
    Show {
        /// Filter name (default: the active filter)
        name: Option<String>,
    },

    /// Load a saved filter as the active filter
    Use {
        /// Filter name
        name: String,
    },

    /// Rename a saved filter
    Rename {
        /// Current name
        from: String,

        /// New name
        to: String,
    },

    /// Delete a saved filter
    Delete {
        /// Filter name
        name: String,
    },

    /// Reset the active filter to the default
    Clear,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Open config in $EDITOR
    Edit,

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,

        /// Configuration value
        value: String,
    },

    /// Print config file path
    Path,
}
