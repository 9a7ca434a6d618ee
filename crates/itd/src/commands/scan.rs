//! Scan command implementation.
//!
//! Walks the whole note collection with the configured dialect and
//! reports what was found, grouped by notebook.

use std::collections::BTreeMap;

use notes_api_rs::NotesClient;
use serde::Serialize;

use super::{summary_builder, CommandContext, Result};

/// JSON output structure for the scan command.
#[derive(Serialize)]
struct ScanOutput<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    refreshed_at: Option<String>,
    notes: usize,
    todos: usize,
    notebooks: Vec<NotebookOutput<'a>>,
}

/// JSON output structure for one notebook's counts.
#[derive(Serialize)]
struct NotebookOutput<'a> {
    title: &'a str,
    todos: usize,
    open: usize,
}

/// Executes the scan command.
///
/// # Errors
///
/// Returns an error when the configured dialect is unknown. Scan
/// failures on individual notes are logged and skipped.
pub async fn execute(ctx: &CommandContext, client: &NotesClient) -> Result<()> {
    let mut builder = summary_builder(client)?;

    if ctx.verbose {
        eprintln!("Scanning notes with the {} dialect...", builder.style().id());
    }

    let summary = builder.full_scan().await;

    // Per-notebook counts in title order
    let mut notebooks: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for todo in summary.todos() {
        let entry = notebooks.entry(&todo.notebook_title).or_insert((0, 0));
        entry.0 += 1;
        if !todo.completed {
            entry.1 += 1;
        }
    }

    if ctx.json_output {
        let output = ScanOutput {
            refreshed_at: summary.refreshed_at.map(|t| t.to_rfc3339()),
            notes: summary.by_note.len(),
            todos: summary.len(),
            notebooks: notebooks
                .iter()
                .map(|(title, &(todos, open))| NotebookOutput { title, todos, open })
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        println!(
            "Scanned {} todos across {} notes.",
            summary.len(),
            summary.by_note.len()
        );

        if !notebooks.is_empty() {
            use owo_colors::OwoColorize;

            println!();
            let header = format!("{:<25} {:<6} {}", "Notebook", "Todos", "Open");
            if ctx.use_colors {
                println!("{}", header.dimmed());
            } else {
                println!("{header}");
            }

            for (title, (todos, open)) in &notebooks {
                println!("{:<25} {:<6} {}", title, todos, open);
            }
        }
    }

    Ok(())
}
