//! Reducer-style mutations for the filter library.
//!
//! Every change to panel filter state goes through [`reduce`] so that
//! callers (the panel bridge, the CLI) share one set of transition
//! rules and dispatches show up in the logs.

use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::debug;

use super::spec::{CompletedFilter, DateFilter, FilterLibrary, FilterSpec};
use crate::todo::Todo;

/// A single editable field of the active filter.
///
/// Updating any field through [`FilterAction::UpdateField`] clears the
/// active filter's name, since the edited filter no longer matches the
/// saved one it came from.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate {
    NoteIds(Vec<String>),
    NotebookIds(Vec<String>),
    Messages(Vec<String>),
    Categories(Vec<String>),
    NoteTitles(Vec<String>),
    NotebookTitles(Vec<String>),
    Tags(Vec<String>),
    Date(DateFilter),
    DateOverride(DateFilter),
    Completed(CompletedFilter),
}

/// State transitions accepted by the store.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterAction {
    /// Replaces the whole library, used when hydrating persisted state.
    ReplaceAll(FilterLibrary),
    /// Resets the active filter to the default empty filter.
    ClearActive,
    /// Names the active filter and upserts it into the saved list.
    SaveActive { name: String },
    /// Loads a saved filter into the active slot.
    SwitchToSaved(FilterSpec),
    /// Records that a todo was checked off on the given date.
    Check { key: String, on: NaiveDate },
    /// Edits one field of the active filter.
    UpdateField(FieldUpdate),
    RenameSaved { from: String, to: String },
    DeleteSaved { name: String },
}

/// Applies one action to the library.
pub fn reduce(library: &mut FilterLibrary, action: FilterAction) {
    debug!("filter dispatch: {:?}", action);
    match action {
        FilterAction::ReplaceAll(new) => *library = new,
        FilterAction::ClearActive => library.active = FilterSpec::default(),
        FilterAction::SaveActive { name } => {
            let mut spec = library.active.clone();
            spec.name = name;
            // Saving under an existing name overwrites that entry.
            library.saved.retain(|f| f.name != spec.name);
            library.saved.push(spec.clone());
            library.active = spec;
        }
        FilterAction::SwitchToSaved(spec) => library.active = spec,
        FilterAction::Check { key, on } => {
            library.checked.insert(key, on);
        }
        FilterAction::UpdateField(update) => {
            library.active.name.clear();
            apply_field(&mut library.active, update);
        }
        FilterAction::RenameSaved { from, to } => {
            for spec in &mut library.saved {
                if spec.name == from {
                    spec.name = to.clone();
                }
            }
        }
        FilterAction::DeleteSaved { name } => {
            library.saved.retain(|f| f.name != name);
        }
    }
}

fn apply_field(active: &mut FilterSpec, update: FieldUpdate) {
    match update {
        FieldUpdate::NoteIds(v) => active.note_ids = v,
        FieldUpdate::NotebookIds(v) => active.notebook_ids = v,
        FieldUpdate::Messages(v) => active.messages = v,
        FieldUpdate::Categories(v) => active.categories = v,
        FieldUpdate::NoteTitles(v) => active.note_titles = v,
        FieldUpdate::NotebookTitles(v) => active.notebook_titles = v,
        FieldUpdate::Tags(v) => active.tags = v,
        FieldUpdate::Date(v) => active.date = v,
        FieldUpdate::DateOverride(v) => active.date_override = v,
        FieldUpdate::Completed(v) => active.completed = v,
    }
}

/// Drops ledger entries for todos that are currently open.
///
/// The ledger can go stale when a source line is unchecked outside this
/// tool. Run this against a fresh summary before evaluating, so a todo
/// that reverted to open is not still counted as checked off.
pub fn sync_checked(library: &mut FilterLibrary, todos: &[Todo]) {
    let open: HashSet<&str> = todos
        .iter()
        .filter(|t| !t.completed)
        .map(|t| t.key.as_str())
        .collect();
    library.checked.retain(|key, _| !open.contains(key.as_str()));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn library_with_saved(names: &[&str]) -> FilterLibrary {
        let mut library = FilterLibrary::default();
        for name in names {
            library.saved.push(FilterSpec {
                name: (*name).to_string(),
                ..FilterSpec::default()
            });
        }
        library
    }

    #[test]
    fn test_save_active_names_and_upserts() {
        let mut library = FilterLibrary::default();
        library.active.tags = vec!["urgent".to_string()];

        reduce(&mut library, FilterAction::SaveActive { name: "mine".to_string() });

        assert_eq!(library.active.name, "mine");
        assert_eq!(library.saved.len(), 1);
        assert_eq!(library.saved[0].name, "mine");
        assert_eq!(library.saved[0].tags, vec!["urgent".to_string()]);
    }

    #[test]
    fn test_save_active_overwrites_same_name_and_moves_to_end() {
        let mut library = library_with_saved(&["a", "b"]);
        library.active.categories = vec!["work".to_string()];

        reduce(&mut library, FilterAction::SaveActive { name: "a".to_string() });

        let names: Vec<&str> = library.saved.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(library.saved[1].categories, vec!["work".to_string()]);
    }

    #[test]
    fn test_update_field_clears_active_name() {
        let mut library = FilterLibrary::default();
        library.active.name = "saved one".to_string();

        reduce(
            &mut library,
            FilterAction::UpdateField(FieldUpdate::Tags(vec!["home".to_string()])),
        );

        assert_eq!(library.active.name, "");
        assert_eq!(library.active.tags, vec!["home".to_string()]);
    }

    #[test]
    fn test_update_field_sets_date_filters() {
        let mut library = FilterLibrary::default();

        reduce(
            &mut library,
            FilterAction::UpdateField(FieldUpdate::Date(DateFilter::Weeks(2))),
        );
        reduce(
            &mut library,
            FilterAction::UpdateField(FieldUpdate::DateOverride(DateFilter::Overdue)),
        );
        reduce(
            &mut library,
            FilterAction::UpdateField(FieldUpdate::Completed(CompletedFilter::AllTime)),
        );

        assert_eq!(library.active.date, DateFilter::Weeks(2));
        assert_eq!(library.active.date_override, DateFilter::Overdue);
        assert_eq!(library.active.completed, CompletedFilter::AllTime);
    }

    #[test]
    fn test_clear_active_restores_defaults() {
        let mut library = FilterLibrary::default();
        library.active.name = "x".to_string();
        library.active.date = DateFilter::Tomorrow;

        reduce(&mut library, FilterAction::ClearActive);

        assert_eq!(library.active, FilterSpec::default());
    }

    #[test]
    fn test_switch_to_saved_replaces_active() {
        let mut library = library_with_saved(&["a"]);
        let target = library.saved[0].clone();

        reduce(&mut library, FilterAction::SwitchToSaved(target.clone()));

        assert_eq!(library.active, target);
    }

    #[test]
    fn test_check_stamps_date() {
        let mut library = FilterLibrary::default();

        reduce(
            &mut library,
            FilterAction::Check { key: "k1".to_string(), on: day(2024, 6, 15) },
        );

        assert_eq!(library.checked.get("k1"), Some(&day(2024, 6, 15)));
    }

    #[test]
    fn test_check_restamps_existing_key() {
        let mut library = FilterLibrary::default();
        library.checked.insert("k1".to_string(), day(2024, 6, 1));

        reduce(
            &mut library,
            FilterAction::Check { key: "k1".to_string(), on: day(2024, 6, 15) },
        );

        assert_eq!(library.checked.get("k1"), Some(&day(2024, 6, 15)));
    }

    #[test]
    fn test_rename_saved() {
        let mut library = library_with_saved(&["old", "other"]);

        reduce(
            &mut library,
            FilterAction::RenameSaved { from: "old".to_string(), to: "new".to_string() },
        );

        let names: Vec<&str> = library.saved.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["new", "other"]);
    }

    #[test]
    fn test_delete_saved() {
        let mut library = library_with_saved(&["a", "b"]);

        reduce(&mut library, FilterAction::DeleteSaved { name: "a".to_string() });

        let names: Vec<&str> = library.saved.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["b"]);
    }

    #[test]
    fn test_replace_all() {
        let mut library = library_with_saved(&["a"]);
        let mut incoming = FilterLibrary::default();
        incoming.checked.insert("k".to_string(), day(2024, 1, 1));

        reduce(&mut library, FilterAction::ReplaceAll(incoming.clone()));

        assert_eq!(library, incoming);
    }

    #[test]
    fn test_sync_checked_drops_open_entries() {
        let mut library = FilterLibrary::default();
        library.checked.insert("open".to_string(), day(2024, 6, 1));
        library.checked.insert("done".to_string(), day(2024, 6, 1));
        library.checked.insert("gone".to_string(), day(2024, 6, 1));

        let todos = vec![
            Todo { key: "open".to_string(), completed: false, ..Todo::default() },
            Todo { key: "done".to_string(), completed: true, ..Todo::default() },
        ];

        sync_checked(&mut library, &todos);

        // Entries survive when their todo is completed or no longer present.
        assert!(!library.checked.contains_key("open"));
        assert!(library.checked.contains_key("done"));
        assert!(library.checked.contains_key("gone"));
    }
}
