//! List command implementation.
//!
//! Scans the collection and prints the todos matching a filter. The
//! filter comes from the stored active filter, a saved filter picked
//! by name, or dimension flags given on the command line.

use notes_api_rs::NotesClient;
use todo_summary_rs::filter::{
    sync_checked, FilterContext, FilterEvaluator, FilterLibrary, FilterSpec,
};
use todo_summary_rs::Todo;

use super::{apply_spec_args, summary_builder, CommandContext, CommandError, Result};
use crate::cli::SpecArgs;
use crate::filter_store::{JsonFilterStore, DEFAULT_VIEW};
use crate::output::{format_todos_json, format_todos_table};

/// Options for the list command.
#[derive(Debug)]
pub struct ListOptions {
    /// Saved filter to start from.
    pub saved: Option<String>,
    /// Limit results.
    pub limit: u32,
    /// Show all matches (no limit).
    pub all: bool,
    /// Filter dimensions given on the command line.
    pub spec: SpecArgs,
}

/// Executes the list command.
///
/// # Errors
///
/// Returns an error when the named saved filter does not exist or a
/// window label on the command line does not parse.
pub async fn execute(ctx: &CommandContext, opts: &ListOptions, client: &NotesClient) -> Result<()> {
    let mut builder = summary_builder(client)?;

    if ctx.verbose {
        eprintln!("Scanning notes...");
    }
    builder.full_scan().await;

    let store = JsonFilterStore::new()?;
    let mut library = store.library(DEFAULT_VIEW)?;

    let mut spec = base_spec(&library, opts)?;
    apply_spec_args(&mut spec, &opts.spec)?;

    let todos: Vec<Todo> = builder.summary().todos().cloned().collect();

    // Drop ledger entries for todos that reverted to open outside this
    // tool, so they are not still counted as checked off. The cleaned
    // library is not written back; list leaves the store untouched.
    sync_checked(&mut library, &todos);

    let context = FilterContext::local_today();
    let evaluator = FilterEvaluator::new(&context, &library.checked);
    let mut filtered = evaluator.evaluate(&todos, &spec);

    // Limit trims the rows shown; open_count and total_count keep
    // describing the whole result set.
    filtered.todos = apply_limit(filtered.todos, opts);

    if ctx.json_output {
        let output = format_todos_json(&filtered)?;
        println!("{output}");
    } else if !ctx.quiet {
        let output = format_todos_table(&filtered, ctx.use_colors);
        print!("{output}");
    }

    Ok(())
}

/// Picks the spec the command-line flags refine: a saved filter by
/// name, a blank spec when any dimension flag was given, otherwise the
/// stored active filter.
fn base_spec(library: &FilterLibrary, opts: &ListOptions) -> Result<FilterSpec> {
    if let Some(name) = &opts.saved {
        return library
            .saved
            .iter()
            .find(|s| s.name == *name)
            .cloned()
            .ok_or_else(|| CommandError::NotFound(format!("saved filter '{name}'")));
    }
    if !opts.spec.is_empty() {
        return Ok(FilterSpec::default());
    }
    Ok(library.active.clone())
}

/// Applies the limit to the matched todos.
fn apply_limit(todos: Vec<Todo>, opts: &ListOptions) -> Vec<Todo> {
    if opts.all {
        todos
    } else {
        todos.into_iter().take(opts.limit as usize).collect()
    }
}
