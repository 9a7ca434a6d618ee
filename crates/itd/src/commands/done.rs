//! Done command implementation.
//!
//! Toggles todo checkboxes in their source notes. Matching is by
//! message substring against the freshly scanned summary; an ambiguous
//! match is refused unless --all is given or the query is narrowed
//! with --note or --category.

use chrono::Local;
use notes_api_rs::NotesClient;
use todo_summary_rs::filter::{reduce, sync_checked, FilterAction};
use todo_summary_rs::mark::set_completion;
use todo_summary_rs::Todo;

use super::{summary_builder, CommandContext, CommandError, Result};
use crate::filter_store::{JsonFilterStore, DEFAULT_VIEW};

/// Options for the done command.
#[derive(Debug)]
pub struct DoneOptions {
    /// Message substring to match.
    pub query: String,
    /// Restrict matches to one note (id or exact title).
    pub note: Option<String>,
    /// Restrict matches to one category.
    pub category: Option<String>,
    /// Reopen instead of complete.
    pub reopen: bool,
    /// Toggle every match instead of refusing an ambiguous query.
    pub all: bool,
}

/// Result of toggling a single todo.
#[derive(Debug)]
pub struct DoneResult {
    /// The todo's identity key, as recorded in the checked ledger.
    pub key: String,
    /// The todo message.
    pub message: String,
    /// Title of the note it lives in.
    pub note_title: String,
    /// Whether the note body was updated.
    pub success: bool,
}

/// Executes the done command.
///
/// # Errors
///
/// Returns an error when nothing matches the query, when the query is
/// ambiguous without --all, or when every matched todo failed to
/// update.
pub async fn execute(ctx: &CommandContext, opts: &DoneOptions, client: &NotesClient) -> Result<()> {
    let mut builder = summary_builder(client)?;

    if ctx.verbose {
        eprintln!("Scanning notes...");
    }
    builder.full_scan().await;

    let candidates: Vec<Todo> = builder
        .summary()
        .todos()
        .filter(|t| matches_query(t, opts))
        .cloned()
        .collect();

    if candidates.is_empty() {
        let kind = if opts.reopen {
            "completed todo"
        } else {
            "open todo"
        };
        return Err(CommandError::NotFound(format!(
            "{kind} matching '{}'",
            opts.query
        )));
    }

    if candidates.len() > 1 && !opts.all {
        if !ctx.json_output && !ctx.quiet {
            eprintln!("'{}' matches {} todos:", opts.query, candidates.len());
            for todo in &candidates {
                eprintln!("  {} ({})", todo.message, todo.note_title);
            }
        }
        return Err(CommandError::Ambiguous {
            query: opts.query.clone(),
            count: candidates.len(),
        });
    }

    // Toggle each checkbox at the source
    let style = builder.style();
    let completed = !opts.reopen;

    let mut results: Vec<DoneResult> = Vec::new();
    let mut touched_notes: Vec<String> = Vec::new();
    let mut success_count = 0;
    let mut error_count = 0;

    for todo in &candidates {
        let success = set_completion(client, todo, completed, style).await;
        if success {
            success_count += 1;
            if !touched_notes.contains(&todo.note_id) {
                touched_notes.push(todo.note_id.clone());
            }
        } else {
            error_count += 1;
        }
        results.push(DoneResult {
            key: todo.key.clone(),
            message: todo.message.clone(),
            note_title: todo.note_title.clone(),
            success,
        });
    }

    if success_count > 0 {
        // Rescan the touched notes so the ledger is reconciled against
        // what the host actually stored
        for note_id in &touched_notes {
            builder.scan_note(note_id).await;
        }

        let store = JsonFilterStore::new()?;
        let mut library = store.library(DEFAULT_VIEW)?;

        if !opts.reopen {
            let today = Local::now().date_naive();
            for result in results.iter().filter(|r| r.success) {
                reduce(
                    &mut library,
                    FilterAction::Check {
                        key: result.key.clone(),
                        on: today,
                    },
                );
            }
        }

        // A reopened todo comes back open from the rescan, which drops
        // its ledger entry here
        let fresh: Vec<Todo> = builder.summary().todos().cloned().collect();
        sync_checked(&mut library, &fresh);
        store.store_library(DEFAULT_VIEW, &library)?;
    }

    // Output results
    if ctx.json_output {
        let output = format_done_results_json(&results, opts.reopen)?;
        println!("{output}");
    } else if !ctx.quiet {
        let verb = if opts.reopen { "Reopened" } else { "Completed" };
        for result in &results {
            if result.success {
                println!("{}: {} ({})", verb, result.message, result.note_title);
            } else {
                eprintln!(
                    "Failed to update {} ({})",
                    result.message, result.note_title
                );
            }
        }

        if ctx.verbose && results.len() > 1 {
            println!("\n{} updated, {} failed", success_count, error_count);
        }
    }

    // Return error if every todo failed
    if error_count > 0 && success_count == 0 {
        return Err(CommandError::Config(format!(
            "Failed to update {} todo(s)",
            error_count
        )));
    }

    Ok(())
}

/// Whether a todo is a candidate for the given options.
fn matches_query(todo: &Todo, opts: &DoneOptions) -> bool {
    // Completing targets open todos, reopening targets completed ones
    if todo.completed != opts.reopen {
        return false;
    }
    if !todo
        .message
        .to_lowercase()
        .contains(&opts.query.to_lowercase())
    {
        return false;
    }
    if let Some(ref note) = opts.note {
        if todo.note_id != *note && !todo.note_title.eq_ignore_ascii_case(note) {
            return false;
        }
    }
    if let Some(ref category) = opts.category {
        if !todo.category.eq_ignore_ascii_case(category) {
            return false;
        }
    }
    true
}

/// Formats done results as JSON.
fn format_done_results_json(results: &[DoneResult], reopen: bool) -> Result<String> {
    use serde::Serialize;

    #[derive(Serialize)]
    struct DoneOutput<'a> {
        action: &'static str,
        updated: Vec<UpdatedTodoOutput<'a>>,
        failed: Vec<FailedTodoOutput<'a>>,
        total_updated: usize,
        total_failed: usize,
    }

    #[derive(Serialize)]
    struct UpdatedTodoOutput<'a> {
        key: &'a str,
        message: &'a str,
        note_title: &'a str,
    }

    #[derive(Serialize)]
    struct FailedTodoOutput<'a> {
        key: &'a str,
        message: &'a str,
        note_title: &'a str,
    }

    let updated: Vec<UpdatedTodoOutput> = results
        .iter()
        .filter(|r| r.success)
        .map(|r| UpdatedTodoOutput {
            key: &r.key,
            message: &r.message,
            note_title: &r.note_title,
        })
        .collect();

    let failed: Vec<FailedTodoOutput> = results
        .iter()
        .filter(|r| !r.success)
        .map(|r| FailedTodoOutput {
            key: &r.key,
            message: &r.message,
            note_title: &r.note_title,
        })
        .collect();

    let output = DoneOutput {
        action: if reopen { "reopen" } else { "complete" },
        total_updated: updated.len(),
        total_failed: failed.len(),
        updated,
        failed,
    };

    serde_json::to_string_pretty(&output).map_err(CommandError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_todo(message: &str) -> Todo {
        Todo {
            message: message.to_string(),
            note_id: "note-1".to_string(),
            note_title: "Groceries".to_string(),
            category: "errand".to_string(),
            key: format!("note-1-{message}"),
            ..Todo::default()
        }
    }

    fn opts(query: &str) -> DoneOptions {
        DoneOptions {
            query: query.to_string(),
            note: None,
            category: None,
            reopen: false,
            all: false,
        }
    }

    #[test]
    fn test_matches_query_case_insensitive() {
        let todo = make_todo("Buy Milk");
        assert!(matches_query(&todo, &opts("buy")));
        assert!(matches_query(&todo, &opts("MILK")));
        assert!(!matches_query(&todo, &opts("bread")));
    }

    #[test]
    fn test_matches_skips_completed() {
        let mut todo = make_todo("buy milk");
        todo.completed = true;
        assert!(!matches_query(&todo, &opts("milk")));
    }

    #[test]
    fn test_matches_reopen_targets_completed() {
        let mut todo = make_todo("buy milk");
        todo.completed = true;

        let mut reopen = opts("milk");
        reopen.reopen = true;
        assert!(matches_query(&todo, &reopen));

        todo.completed = false;
        assert!(!matches_query(&todo, &reopen));
    }

    #[test]
    fn test_matches_note_narrowing() {
        let todo = make_todo("buy milk");

        let mut by_id = opts("milk");
        by_id.note = Some("note-1".to_string());
        assert!(matches_query(&todo, &by_id));

        let mut by_title = opts("milk");
        by_title.note = Some("groceries".to_string());
        assert!(matches_query(&todo, &by_title));

        let mut other = opts("milk");
        other.note = Some("note-2".to_string());
        assert!(!matches_query(&todo, &other));
    }

    #[test]
    fn test_matches_category_narrowing() {
        let todo = make_todo("buy milk");

        let mut by_category = opts("milk");
        by_category.category = Some("Errand".to_string());
        assert!(matches_query(&todo, &by_category));

        let mut other = opts("milk");
        other.category = Some("work".to_string());
        assert!(!matches_query(&todo, &other));
    }

    #[test]
    fn test_format_done_results_json() {
        let results = vec![
            DoneResult {
                key: "note-1-0".to_string(),
                message: "buy milk".to_string(),
                note_title: "Groceries".to_string(),
                success: true,
            },
            DoneResult {
                key: "note-2-0".to_string(),
                message: "call dentist".to_string(),
                note_title: "Health".to_string(),
                success: false,
            },
        ];

        let json = format_done_results_json(&results, false).unwrap();
        assert!(json.contains("\"action\": \"complete\""));
        assert!(json.contains("\"total_updated\": 1"));
        assert!(json.contains("\"total_failed\": 1"));
        assert!(json.contains("buy milk"));
        assert!(json.contains("call dentist"));
    }

    #[test]
    fn test_format_done_results_json_reopen() {
        let results = vec![DoneResult {
            key: "note-1-0".to_string(),
            message: "buy milk".to_string(),
            note_title: "Groceries".to_string(),
            success: true,
        }];

        let json = format_done_results_json(&results, true).unwrap();
        assert!(json.contains("\"action\": \"reopen\""));
    }
}
