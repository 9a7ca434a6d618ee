//! Filter output formatting.

use owo_colors::OwoColorize;
use serde::Serialize;
use todo_summary_rs::filter::{FilterSpec, FilteredLibrary};

use super::helpers::truncate_str;

/// JSON output structure for the filters list command.
#[derive(Serialize)]
pub struct FiltersListOutput<'a> {
    pub active: ActiveFilterOutput<'a>,
    pub saved: Vec<SavedFilterOutput<'a>>,
}

/// JSON output structure for the active filter counts.
#[derive(Serialize)]
pub struct ActiveFilterOutput<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
    pub open_count: usize,
    pub total_count: usize,
}

/// JSON output structure for a saved filter entry.
#[derive(Serialize)]
pub struct SavedFilterOutput<'a> {
    pub name: &'a str,
    pub open_count: usize,
}

/// Formats the filter library counts as JSON.
pub fn format_filter_list_json(
    active_name: &str,
    result: &FilteredLibrary,
) -> Result<String, serde_json::Error> {
    let saved: Vec<SavedFilterOutput> = result
        .saved
        .iter()
        .map(|entry| SavedFilterOutput {
            name: &entry.name,
            open_count: entry.open_count,
        })
        .collect();

    let output = FiltersListOutput {
        active: ActiveFilterOutput {
            name: (!active_name.is_empty()).then_some(active_name),
            open_count: result.active.open_count,
            total_count: result.active.total_count,
        },
        saved,
    };

    serde_json::to_string_pretty(&output)
}

/// Formats the filter library counts as a table.
pub fn format_filter_list_table(
    active_name: &str,
    result: &FilteredLibrary,
    use_colors: bool,
) -> String {
    let mut output = String::new();

    if result.saved.is_empty() {
        output.push_str("No saved filters.\n");
    } else {
        // Header
        let header = format!("{:<3} {:<25} {}", "", "Name", "Open");
        if use_colors {
            output.push_str(&format!("{}\n", header.dimmed()));
        } else {
            output.push_str(&header);
            output.push('\n');
        }

        // Saved filters, the active one starred
        for entry in &result.saved {
            let star = if !active_name.is_empty() && entry.name == active_name {
                if use_colors {
                    "★".yellow().to_string()
                } else {
                    "★".to_string()
                }
            } else {
                " ".to_string()
            };
            let name = truncate_str(&entry.name, 25);

            let line = format!("{:<3} {:<25} {}", star, name, entry.open_count);
            output.push_str(&line);
            output.push('\n');
        }
    }

    let active_label = if active_name.is_empty() {
        "(unnamed)"
    } else {
        active_name
    };
    output.push('\n');
    output.push_str(&format!(
        "Active: {} ({} open, {} total)\n",
        active_label, result.active.open_count, result.active.total_count
    ));

    output
}

/// Formats a filter spec as JSON (filters show command).
pub fn format_filter_spec_json(spec: &FilterSpec) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(spec)
}

/// Formats a filter spec as a human-readable listing (filters show command).
pub fn format_filter_spec_table(spec: &FilterSpec, use_colors: bool) -> String {
    let mut output = String::new();

    // Filter header
    let name_label = if use_colors {
        "Filter:".bold().to_string()
    } else {
        "Filter:".to_string()
    };
    let name = if spec.name.is_empty() {
        "(active)"
    } else {
        &spec.name
    };
    output.push_str(&format!("{} {}\n", name_label, name));

    // Date windows are always present
    output.push_str(&format!("Due: {}\n", spec.date));
    output.push_str(&format!("Override: {}\n", spec.date_override));
    output.push_str(&format!("Completed: {}\n", spec.completed));

    // Set dimensions only when they restrict anything
    if !spec.categories.is_empty() {
        output.push_str(&format!("Categories: {}\n", spec.categories.join(", ")));
    }
    if !spec.tags.is_empty() {
        output.push_str(&format!("Tags: {}\n", spec.tags.join(", ")));
    }
    if !spec.note_titles.is_empty() {
        output.push_str(&format!("Notes: {}\n", spec.note_titles.join(", ")));
    }
    if !spec.note_ids.is_empty() {
        output.push_str(&format!("Note ids: {}\n", spec.note_ids.join(", ")));
    }
    if !spec.notebook_titles.is_empty() {
        output.push_str(&format!("Notebooks: {}\n", spec.notebook_titles.join(", ")));
    }
    if !spec.notebook_ids.is_empty() {
        output.push_str(&format!("Notebook ids: {}\n", spec.notebook_ids.join(", ")));
    }
    if !spec.messages.is_empty() {
        output.push_str(&format!("Messages: {}\n", spec.messages.join(", ")));
    }

    output
}
