//! Canonical todo records extracted from note bodies.

use serde::{Deserialize, Serialize};

/// A single inline todo, detached from the markup it was written in.
///
/// Records are comparable across styles: two records with the same
/// [`identity key`](Todo::key) refer to the same line of work even when
/// one copy was produced by an earlier scan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Todo {
    /// Id of the note the todo was found in.
    pub note_id: String,
    /// Title of that note at scan time.
    #[serde(default)]
    pub note_title: String,
    /// Id of the notebook containing the note.
    #[serde(default)]
    pub notebook_id: String,
    /// Resolved notebook title, or the unknown-folder sentinel.
    #[serde(default)]
    pub notebook_title: String,
    /// Human text of the todo with style metadata stripped.
    pub message: String,
    /// Category token, or a style-specific fallback when absent.
    #[serde(default)]
    pub category: String,
    /// Raw date token as written. Not validated at extraction time.
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub description: String,
    /// In-note anchor for jumping the editor to the source line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scroll_anchor: Option<ScrollAnchor>,
    /// Identity key, see [`identity_key`].
    pub key: String,
}

/// Locator for scrolling an editor to the extracted line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrollAnchor {
    /// Text to search for in the rendered note.
    pub text: String,
    /// Element kind the text is expected to live in.
    pub element: String,
}

/// Fields produced by a style before note context is attached.
#[derive(Debug, Clone, PartialEq)]
pub struct TodoFields {
    pub message: String,
    pub category: String,
    pub date: String,
    pub tags: Vec<String>,
    pub completed: bool,
    pub description: String,
    pub scroll_anchor: Option<ScrollAnchor>,
}

/// Concatenates the fields that identify a todo across scans.
///
/// Completion state is deliberately excluded so that checking a box off
/// does not orphan ledger entries recorded against the open form.
pub fn identity_key(
    message: &str,
    category: &str,
    tags: &[String],
    note_id: &str,
    notebook_id: &str,
    date: &str,
) -> String {
    format!(
        "{}{}{}{}{}{}",
        message,
        category,
        tags.join(","),
        note_id,
        notebook_id,
        date
    )
}

impl Todo {
    /// Attaches note context to extracted fields and derives the identity key.
    pub fn from_fields(
        fields: TodoFields,
        note_id: &str,
        note_title: &str,
        notebook_id: &str,
        notebook_title: &str,
    ) -> Self {
        let key = identity_key(
            &fields.message,
            &fields.category,
            &fields.tags,
            note_id,
            notebook_id,
            &fields.date,
        );
        Todo {
            note_id: note_id.to_string(),
            note_title: note_title.to_string(),
            notebook_id: notebook_id.to_string(),
            notebook_title: notebook_title.to_string(),
            message: fields.message,
            category: fields.category,
            date: fields.date,
            tags: fields.tags,
            completed: fields.completed,
            description: fields.description,
            scroll_anchor: fields.scroll_anchor,
            key,
        }
    }
}
