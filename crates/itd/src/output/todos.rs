//! Todo output formatting.

use owo_colors::OwoColorize;
use serde::Serialize;
use todo_summary_rs::filter::Filtered;

use super::helpers::{checkbox, format_date, format_tags, truncate_str};

/// JSON output structure for the list command.
#[derive(Serialize)]
pub struct ListOutput<'a> {
    pub todos: Vec<TodoOutput<'a>>,
    pub open_count: usize,
    pub total_count: usize,
}

/// JSON output structure for a single todo.
#[derive(Serialize)]
pub struct TodoOutput<'a> {
    pub key: &'a str,
    pub message: &'a str,
    pub note_id: &'a str,
    pub note_title: &'a str,
    pub notebook_id: &'a str,
    pub notebook_title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<&'a str>,
    pub tags: &'a [String],
    pub completed: bool,
}

/// Formats a filter result as JSON.
pub fn format_todos_json(filtered: &Filtered) -> Result<String, serde_json::Error> {
    let todos: Vec<TodoOutput> = filtered
        .todos
        .iter()
        .map(|todo| TodoOutput {
            key: &todo.key,
            message: &todo.message,
            note_id: &todo.note_id,
            note_title: &todo.note_title,
            notebook_id: &todo.notebook_id,
            notebook_title: &todo.notebook_title,
            category: (!todo.category.is_empty()).then_some(todo.category.as_str()),
            date: (!todo.date.is_empty()).then_some(todo.date.as_str()),
            tags: &todo.tags,
            completed: todo.completed,
        })
        .collect();

    let output = ListOutput {
        todos,
        open_count: filtered.open_count,
        total_count: filtered.total_count,
    };

    serde_json::to_string_pretty(&output)
}

/// Formats a filter result as a table.
pub fn format_todos_table(filtered: &Filtered, use_colors: bool) -> String {
    if filtered.todos.is_empty() {
        return "No todos matched.\n".to_string();
    }

    let mut output = String::new();

    // Header
    let header = format!(
        "{:<3} {:<12} {:<15} {:<15} {:<20} {}",
        "", "Due", "Category", "Notebook", "Tags", "Todo"
    );
    if use_colors {
        output.push_str(&format!("{}\n", header.dimmed()));
    } else {
        output.push_str(&header);
        output.push('\n');
    }

    // Todos
    for todo in &filtered.todos {
        let done = checkbox(todo.completed);
        let due = format_date(&todo.date, use_colors);
        let category = truncate_str(&todo.category, 15);
        let notebook = truncate_str(&todo.notebook_title, 15);
        let tags = format_tags(&todo.tags, 20);
        let message = &todo.message;

        let line = format!(
            "{:<3} {:<12} {:<15} {:<15} {:<20} {}",
            done, due, category, notebook, tags, message
        );
        output.push_str(&line);
        output.push('\n');
    }

    output.push('\n');
    output.push_str(&format!(
        "{} open, {} total\n",
        filtered.open_count, filtered.total_count
    ));

    output
}
