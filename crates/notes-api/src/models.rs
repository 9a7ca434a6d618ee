//! Data types returned by the notes API.

use serde::{Deserialize, Deserializer, Serialize};

/// A note, with the fields this workspace requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    /// Id of the folder (notebook) containing the note.
    #[serde(default)]
    pub parent_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    /// The API reports conflict copies with a 0/1 integer flag.
    #[serde(default, deserialize_with = "flag")]
    pub is_conflict: bool,
}

/// A folder (notebook).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchPage {
    pub items: Vec<Note>,
    #[serde(default)]
    pub has_more: bool,
}

/// Accepts the API's integer flags as well as plain booleans.
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Int(n) => n != 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_deserializes_integer_conflict_flag() {
        let json = r#"{
            "id": "note-1",
            "parent_id": "folder-1",
            "title": "Groceries",
            "body": "- [ ] Buy milk @home",
            "is_conflict": 1
        }"#;

        let note: Note = serde_json::from_str(json).unwrap();
        assert_eq!(note.id, "note-1");
        assert_eq!(note.parent_id, "folder-1");
        assert!(note.is_conflict);
    }

    #[test]
    fn test_note_deserializes_boolean_conflict_flag() {
        let json = r#"{"id": "note-2", "is_conflict": false}"#;

        let note: Note = serde_json::from_str(json).unwrap();
        assert!(!note.is_conflict);
        assert_eq!(note.title, "");
        assert_eq!(note.body, "");
    }

    #[test]
    fn test_note_missing_conflict_flag_defaults_false() {
        let json = r#"{"id": "note-3", "title": "Plain"}"#;

        let note: Note = serde_json::from_str(json).unwrap();
        assert!(!note.is_conflict);
    }

    #[test]
    fn test_note_round_trips_through_json() {
        let note = Note {
            id: "note-4".to_string(),
            parent_id: "folder-2".to_string(),
            title: "Tasks".to_string(),
            body: "- [ ] Something @work".to_string(),
            is_conflict: false,
        };

        let json = serde_json::to_string(&note).unwrap();
        let back: Note = serde_json::from_str(&json).unwrap();
        assert_eq!(back, note);
    }

    #[test]
    fn test_search_page_missing_has_more_defaults_false() {
        let json = r#"{"items": []}"#;

        let page: SearchPage = serde_json::from_str(json).unwrap();
        assert!(page.items.is_empty());
        assert!(!page.has_more);
    }

    #[test]
    fn test_folder_deserializes() {
        let json = r#"{"id": "folder-9", "title": "Projects"}"#;

        let folder: Folder = serde_json::from_str(json).unwrap();
        assert_eq!(folder.title, "Projects");
    }
}
