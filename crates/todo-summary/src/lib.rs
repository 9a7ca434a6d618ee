//! Inline todo extraction and summary state.
//!
//! This crate turns note bodies into canonical [`Todo`] records using a
//! pluggable markup style, accumulates them per note in a [`Summary`],
//! and evaluates panel filters against the result. The scanner drives a
//! notes-api client through paginated searches to keep a summary fresh;
//! the panel bridge answers view messages against that state.
//!
//! # Example
//!
//! ```
//! use todo_summary_rs::extract::extract;
//! use todo_summary_rs::style::dialect;
//!
//! let style = dialect("metalist").unwrap();
//! let fields = extract("- [ ] Buy groceries @personal //2024-01-15 +urgent", style);
//!
//! assert_eq!(fields[0].message, "Buy groceries");
//! assert_eq!(fields[0].category, "personal");
//! assert_eq!(fields[0].date, "2024-01-15");
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod extract;
pub mod filter;
pub mod mark;
pub mod panel;
pub mod scanner;
pub mod style;
pub mod todo;

pub use todo::{ScrollAnchor, Todo, TodoFields};

/// All extracted todos, grouped by the note they were found in.
///
/// Grouping by note id makes incremental updates cheap: rescanning one
/// note replaces exactly one entry. Notes with no todos have no entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// UTC timestamp of the last completed full scan.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refreshed_at: Option<DateTime<Utc>>,

    /// Extracted todos keyed by note id.
    #[serde(default)]
    pub by_note: BTreeMap<String, Vec<Todo>>,
}

impl Default for Summary {
    fn default() -> Self {
        Self::new()
    }
}

impl Summary {
    /// Creates an empty summary that has never been refreshed.
    pub fn new() -> Self {
        Self {
            refreshed_at: None,
            by_note: BTreeMap::new(),
        }
    }

    /// Drops all entries. The refresh timestamp is left alone; it is
    /// stamped when the next full scan completes.
    pub fn clear(&mut self) {
        self.by_note.clear();
    }

    /// Replaces the todos for one note, removing the entry when the new
    /// list is empty. Returns true when the stored state changed.
    pub fn replace(&mut self, note_id: &str, todos: Vec<Todo>) -> bool {
        if todos.is_empty() {
            return self.remove(note_id);
        }
        match self.by_note.get(note_id) {
            Some(existing) if *existing == todos => false,
            _ => {
                self.by_note.insert(note_id.to_string(), todos);
                true
            }
        }
    }

    /// Removes the entry for a note. Returns true when one was present.
    pub fn remove(&mut self, note_id: &str) -> bool {
        self.by_note.remove(note_id).is_some()
    }

    /// All todos in note-id order.
    pub fn todos(&self) -> impl Iterator<Item = &Todo> {
        self.by_note.values().flatten()
    }

    /// Total number of todos across all notes.
    pub fn len(&self) -> usize {
        self.by_note.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_note.is_empty()
    }
}
