//! Filters command implementation.
//!
//! Manages the saved filter library: listing with live open counts,
//! saving the active filter under a name, switching, renaming,
//! deleting, and clearing the active filter back to defaults.

use notes_api_rs::NotesClient;
use todo_summary_rs::filter::{
    evaluate_library, reduce, sync_checked, FilterAction, FilterContext, FilterLibrary, FilterSpec,
};
use todo_summary_rs::Todo;

use super::{apply_spec_args, summary_builder, CommandContext, CommandError, Result};
use crate::cli::SpecArgs;
use crate::filter_store::{JsonFilterStore, DEFAULT_VIEW};
use crate::output::{
    format_filter_list_json, format_filter_list_table, format_filter_spec_json,
    format_filter_spec_table,
};

/// Executes the filters list command.
///
/// Scans the collection so every saved filter shows its current open
/// count, the way the panel badges would.
///
/// # Errors
///
/// Returns an error if the filter store cannot be read.
pub async fn execute(ctx: &CommandContext, client: &NotesClient) -> Result<()> {
    let mut builder = summary_builder(client)?;

    if ctx.verbose {
        eprintln!("Scanning notes...");
    }
    builder.full_scan().await;

    let store = JsonFilterStore::new()?;
    let mut library = store.library(DEFAULT_VIEW)?;

    let todos: Vec<Todo> = builder.summary().todos().cloned().collect();
    sync_checked(&mut library, &todos);

    let context = FilterContext::local_today();
    let result = evaluate_library(&todos, &library, &context);

    if ctx.json_output {
        let output = format_filter_list_json(&library.active.name, &result)?;
        println!("{output}");
    } else if !ctx.quiet {
        let output = format_filter_list_table(&library.active.name, &result, ctx.use_colors);
        print!("{output}");
    }

    Ok(())
}

// ============================================================================
// Filters Save Command
// ============================================================================

/// Options for the filters save command.
#[derive(Debug)]
pub struct FiltersSaveOptions {
    /// Name to save under.
    pub name: String,
    /// Filter dimensions given on the command line.
    pub spec: SpecArgs,
}

/// Executes the filters save command.
///
/// With dimension flags the saved filter is built from them; without,
/// the current active filter is saved as-is. Saving over an existing
/// name replaces it.
///
/// # Errors
///
/// Returns an error when a window label does not parse or the store
/// cannot be written.
pub fn execute_save(ctx: &CommandContext, opts: &FiltersSaveOptions) -> Result<()> {
    let store = JsonFilterStore::new()?;
    let mut library = store.library(DEFAULT_VIEW)?;

    if !opts.spec.is_empty() {
        let mut spec = FilterSpec::default();
        apply_spec_args(&mut spec, &opts.spec)?;
        library.active = spec;
    }

    reduce(
        &mut library,
        FilterAction::SaveActive {
            name: opts.name.clone(),
        },
    );
    store.store_library(DEFAULT_VIEW, &library)?;

    if ctx.json_output {
        let output = serde_json::json!({
            "status": "saved",
            "name": opts.name,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        println!("Saved filter '{}'.", opts.name);
    }

    Ok(())
}

// ============================================================================
// Filters Show Command
// ============================================================================

/// Options for the filters show command.
#[derive(Debug, Default)]
pub struct FiltersShowOptions {
    /// Saved filter to show; the active filter when absent.
    pub name: Option<String>,
}

/// Executes the filters show command.
///
/// # Errors
///
/// Returns an error when the named saved filter does not exist.
pub fn execute_show(ctx: &CommandContext, opts: &FiltersShowOptions) -> Result<()> {
    let store = JsonFilterStore::new()?;
    let library = store.library(DEFAULT_VIEW)?;

    let spec = match &opts.name {
        Some(name) => find_saved(&library, name)?,
        None => &library.active,
    };

    if ctx.json_output {
        println!("{}", format_filter_spec_json(spec)?);
    } else if !ctx.quiet {
        print!("{}", format_filter_spec_table(spec, ctx.use_colors));
    }

    Ok(())
}

// ============================================================================
// Filters Use Command
// ============================================================================

/// Options for the filters use command.
#[derive(Debug)]
pub struct FiltersUseOptions {
    /// Saved filter to make active.
    pub name: String,
}

/// Executes the filters use command.
///
/// # Errors
///
/// Returns an error when the named saved filter does not exist.
pub fn execute_use(ctx: &CommandContext, opts: &FiltersUseOptions) -> Result<()> {
    let store = JsonFilterStore::new()?;
    let mut library = store.library(DEFAULT_VIEW)?;

    let spec = find_saved(&library, &opts.name)?.clone();
    reduce(&mut library, FilterAction::SwitchToSaved(spec));
    store.store_library(DEFAULT_VIEW, &library)?;

    if ctx.json_output {
        let output = serde_json::json!({
            "status": "active",
            "name": opts.name,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        println!("Switched to filter '{}'.", opts.name);
    }

    Ok(())
}

// ============================================================================
// Filters Rename Command
// ============================================================================

/// Options for the filters rename command.
#[derive(Debug)]
pub struct FiltersRenameOptions {
    /// Current name.
    pub from: String,
    /// New name.
    pub to: String,
}

/// Executes the filters rename command.
///
/// # Errors
///
/// Returns an error when the named saved filter does not exist.
pub fn execute_rename(ctx: &CommandContext, opts: &FiltersRenameOptions) -> Result<()> {
    let store = JsonFilterStore::new()?;
    let mut library = store.library(DEFAULT_VIEW)?;

    find_saved(&library, &opts.from)?;
    reduce(
        &mut library,
        FilterAction::RenameSaved {
            from: opts.from.clone(),
            to: opts.to.clone(),
        },
    );
    store.store_library(DEFAULT_VIEW, &library)?;

    if ctx.json_output {
        let output = serde_json::json!({
            "status": "renamed",
            "from": opts.from,
            "to": opts.to,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        println!("Renamed filter '{}' to '{}'.", opts.from, opts.to);
    }

    Ok(())
}

// ============================================================================
// Filters Delete Command
// ============================================================================

/// Options for the filters delete command.
#[derive(Debug)]
pub struct FiltersDeleteOptions {
    /// Saved filter to delete.
    pub name: String,
}

/// Executes the filters delete command.
///
/// # Errors
///
/// Returns an error when the named saved filter does not exist.
pub fn execute_delete(ctx: &CommandContext, opts: &FiltersDeleteOptions) -> Result<()> {
    let store = JsonFilterStore::new()?;
    let mut library = store.library(DEFAULT_VIEW)?;

    find_saved(&library, &opts.name)?;
    reduce(
        &mut library,
        FilterAction::DeleteSaved {
            name: opts.name.clone(),
        },
    );
    store.store_library(DEFAULT_VIEW, &library)?;

    if ctx.json_output {
        let output = serde_json::json!({
            "status": "deleted",
            "name": opts.name,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        println!("Deleted filter '{}'.", opts.name);
    }

    Ok(())
}

// ============================================================================
// Filters Clear Command
// ============================================================================

/// Executes the filters clear command, resetting the active filter to
/// defaults.
///
/// # Errors
///
/// Returns an error if the filter store cannot be written.
pub fn execute_clear(ctx: &CommandContext) -> Result<()> {
    let store = JsonFilterStore::new()?;
    let mut library = store.library(DEFAULT_VIEW)?;

    reduce(&mut library, FilterAction::ClearActive);
    store.store_library(DEFAULT_VIEW, &library)?;

    if ctx.json_output {
        let output = serde_json::json!({
            "status": "cleared",
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        println!("Cleared the active filter.");
    }

    Ok(())
}

/// Finds a saved filter by exact name.
fn find_saved<'a>(library: &'a FilterLibrary, name: &str) -> Result<&'a FilterSpec> {
    library
        .saved
        .iter()
        .find(|s| s.name == name)
        .ok_or_else(|| CommandError::NotFound(format!("saved filter '{name}'")))
}
