//! Completion toggling against the source note.
//!
//! The panel and the CLI both flip todos by rewriting the marker on the
//! original line, so the note body stays the single source of truth.

use notes_api_rs::NotesClient;
use tracing::warn;

use crate::style::Dialect;
use crate::todo::Todo;

/// Rewrites the completion marker on the line `todo` came from.
///
/// The line is found by re-extracting each line and comparing message,
/// date, category and tags; completion state and ids are ignored so a
/// record from a stale scan still finds its line after the marker was
/// flipped elsewhere. Only the first matching line is rewritten. Two
/// textually identical lines cannot be told apart, so the first one
/// takes the toggle.
///
/// Returns `None` when no line matches, which means the note changed
/// since the todo was extracted.
pub fn set_in_body(
    body: &str,
    todo: &Todo,
    completed: bool,
    style: &dyn Dialect,
) -> Option<String> {
    let lines: Vec<&str> = body.split('\n').collect();
    for (index, line) in lines.iter().enumerate() {
        if !line_matches(line, todo, style) {
            continue;
        }
        let (from, to) = if completed {
            (style.open_token(), style.closed_token())
        } else {
            (style.closed_token(), style.open_token())
        };
        let toggled = line.replacen(from, to, 1);
        let body = lines
            .iter()
            .enumerate()
            .map(|(i, l)| if i == index { toggled.as_str() } else { *l })
            .collect::<Vec<_>>()
            .join("\n");
        return Some(body);
    }
    None
}

fn line_matches(line: &str, todo: &Todo, style: &dyn Dialect) -> bool {
    let Some(ctx) = style.matches(line).into_iter().next() else {
        return false;
    };
    let Some(message) = style.message(&ctx) else {
        return false;
    };
    message == todo.message
        && style.date(&ctx) == todo.date
        && style.category(&ctx) == todo.category
        && style.tags(&ctx) == todo.tags
}

/// Fetches the origin note, toggles the todo's line, and writes the
/// note back. Returns true when the note was updated.
///
/// Failures are logged rather than propagated: a missed toggle leaves
/// the note untouched and the next scan shows the true state.
pub async fn set_completion(
    client: &NotesClient,
    todo: &Todo,
    completed: bool,
    style: &dyn Dialect,
) -> bool {
    let note = match client.note(&todo.note_id).await {
        Ok(note) => note,
        Err(err) => {
            warn!("failed to fetch note {} to toggle todo: {err}", todo.note_id);
            return false;
        }
    };

    let Some(body) = set_in_body(&note.body, todo, completed, style) else {
        warn!(
            "no line in note {} matches todo {:?} anymore",
            todo.note_id, todo.message
        );
        return false;
    };

    if let Err(err) = client.update_note_body(&todo.note_id, &body).await {
        warn!("failed to write toggled note {}: {err}", todo.note_id);
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract;
    use crate::style::{dialect, Metalist};
    use crate::todo::Todo;

    fn first_todo(body: &str, style: &dyn Dialect) -> Todo {
        let fields = extract(body, style);
        Todo::from_fields(fields[0].clone(), "note-1", "Note", "folder-1", "Folder")
    }

    #[test]
    fn test_set_in_body_marks_done() {
        let body = "prose line\n- [ ] Buy milk @shopping\nmore prose";
        let todo = first_todo(body, &Metalist);

        let updated = set_in_body(body, &todo, true, &Metalist).unwrap();
        assert_eq!(updated, "prose line\n- [x] Buy milk @shopping\nmore prose");
    }

    #[test]
    fn test_set_in_body_marks_open_again() {
        let body = "- [x] Buy milk @shopping";
        let todo = first_todo(body, &Metalist);
        assert!(todo.completed);

        let updated = set_in_body(body, &todo, false, &Metalist).unwrap();
        assert_eq!(updated, "- [ ] Buy milk @shopping");
    }

    #[test]
    fn test_set_in_body_only_first_matching_line() {
        let body = "- [ ] Same task @work\n- [ ] Same task @work";
        let todo = first_todo(body, &Metalist);

        let updated = set_in_body(body, &todo, true, &Metalist).unwrap();
        assert_eq!(updated, "- [x] Same task @work\n- [ ] Same task @work");
    }

    #[test]
    fn test_set_in_body_matches_on_fields_not_completion() {
        // The stored record says open, the line was already completed
        // elsewhere. The line still matches and toggles back to open.
        let body = "- [x] Buy milk @shopping";
        let open_record = Todo {
            completed: false,
            ..first_todo(body, &Metalist)
        };

        let updated = set_in_body(body, &open_record, false, &Metalist).unwrap();
        assert_eq!(updated, "- [ ] Buy milk @shopping");
    }

    #[test]
    fn test_set_in_body_distinguishes_dates() {
        let body = "- [ ] Pay rent @home //2024-01-01\n- [ ] Pay rent @home //2024-02-01";
        let todos = extract(body, &Metalist);
        let second = Todo::from_fields(todos[1].clone(), "note-1", "Note", "folder-1", "Folder");

        let updated = set_in_body(body, &second, true, &Metalist).unwrap();
        assert_eq!(
            updated,
            "- [ ] Pay rent @home //2024-01-01\n- [x] Pay rent @home //2024-02-01"
        );
    }

    #[test]
    fn test_set_in_body_none_when_line_gone() {
        let body = "- [ ] Buy milk @shopping";
        let todo = first_todo(body, &Metalist);

        assert!(set_in_body("- [ ] Something else @work", &todo, true, &Metalist).is_none());
        assert!(set_in_body("", &todo, true, &Metalist).is_none());
    }

    #[test]
    fn test_set_in_body_preserves_trailing_newline() {
        let body = "- [ ] Buy milk @shopping\n";
        let todo = first_todo(body, &Metalist);

        let updated = set_in_body(body, &todo, true, &Metalist).unwrap();
        assert_eq!(updated, "- [x] Buy milk @shopping\n");
    }

    #[test]
    fn test_set_in_body_uppercase_marker_left_alone() {
        // An uppercase marker matches the style but not the lowercase
        // closed token, so unchecking rewrites nothing.
        let body = "- [X] Shouting task @work";
        let todo = first_todo(body, &Metalist);
        assert!(todo.completed);

        let updated = set_in_body(body, &todo, false, &Metalist).unwrap();
        assert_eq!(updated, body);
    }

    #[test]
    fn test_set_in_body_link_style() {
        let style = dialect("link").unwrap();
        let body = "See [TODO](2024-05-01) write the report";
        let todo = first_todo(body, style);

        let updated = set_in_body(body, &todo, true, style).unwrap();
        assert_eq!(updated, "See [DONE](2024-05-01) write the report");
    }
}
