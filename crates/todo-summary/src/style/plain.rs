//! Bare checkbox list items, with optional metadata tokens.

use std::sync::LazyLock;

use regex::Regex;

use super::{
    all_tags, checkbox_completed, find_all, first_category, first_date, list_scroll_anchor,
    strip_metadata, Dialect, MatchContext,
};
use crate::todo::ScrollAnchor;

static PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(?P<indent>[ \t]*)- \[(?P<check>[xX ])\] (?P<body>.*)$").unwrap());

/// Fallback category for checkboxes that carry no `@` token.
const UNASSIGNED: &str = "Unassigned";

/// The plain style: any markdown checkbox counts as a todo.
pub struct Plain;

impl Dialect for Plain {
    fn id(&self) -> &'static str {
        "plain"
    }

    fn title(&self) -> &'static str {
        "List Style"
    }

    fn matches<'t>(&self, text: &'t str) -> Vec<MatchContext<'t>> {
        find_all(&PATTERN, text)
    }

    fn message(&self, ctx: &MatchContext<'_>) -> Option<String> {
        ctx.group("body").map(strip_metadata)
    }

    fn category(&self, ctx: &MatchContext<'_>) -> String {
        ctx.group("body")
            .and_then(first_category)
            .unwrap_or_else(|| UNASSIGNED.to_string())
    }

    fn date(&self, ctx: &MatchContext<'_>) -> String {
        ctx.group("body").map(first_date).unwrap_or_default()
    }

    fn tags(&self, ctx: &MatchContext<'_>) -> Vec<String> {
        ctx.group("body").map(all_tags).unwrap_or_default()
    }

    fn completed(&self, ctx: &MatchContext<'_>) -> bool {
        checkbox_completed(ctx)
    }

    fn scroll_anchor(&self, ctx: &MatchContext<'_>) -> Option<ScrollAnchor> {
        list_scroll_anchor(ctx)
    }

    fn open_token(&self) -> &'static str {
        "- [ ]"
    }

    fn closed_token(&self) -> &'static str {
        "- [x]"
    }

    fn open_query(&self) -> &'static str {
        "/\"- [ ]\""
    }

    fn completed_query(&self) -> &'static str {
        "/\"- [x]\""
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style() -> &'static dyn Dialect {
        &Plain
    }

    #[test]
    fn test_matches_simple_checkbox() {
        let matches = style().matches("- [ ] Simple task");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].matched(), "- [ ] Simple task");
        assert_eq!(style().message(&matches[0]), Some("Simple task".to_string()));
        assert_eq!(style().category(&matches[0]), "Unassigned");
        assert_eq!(style().date(&matches[0]), "");
        assert!(style().tags(&matches[0]).is_empty());
        assert!(!style().completed(&matches[0]));
    }

    #[test]
    fn test_matches_completed_checkbox() {
        let matches = style().matches("- [x] Completed task");
        assert_eq!(matches.len(), 1);
        assert!(style().completed(&matches[0]));

        let matches = style().matches("- [X] Completed task");
        assert!(style().completed(&matches[0]));
    }

    #[test]
    fn test_matches_indented_checkbox() {
        let matches = style().matches("  - [ ] Indented task");
        assert_eq!(matches.len(), 1);
        assert_eq!(style().message(&matches[0]), Some("Indented task".to_string()));
    }

    #[test]
    fn test_sub_items_are_not_todos() {
        let text = "- [ ] Task with description\n    - Sub-item 1\n    * Sub-item 2\n    + Sub-item 3";
        let matches = style().matches(text);
        assert_eq!(matches.len(), 1);
        assert_eq!(
            style().message(&matches[0]),
            Some("Task with description".to_string())
        );
    }

    #[test]
    fn test_nested_checkboxes_match_independently() {
        let text = "- [ ] Parent task\n    - [ ] This is its own todo";
        assert_eq!(style().matches(text).len(), 2);
    }

    #[test]
    fn test_matches_multiple_tasks() {
        let text = "- [ ] First task\n- [x] Second task\n- [ ] Third task";
        assert_eq!(style().matches(text).len(), 3);
    }

    #[test]
    fn test_metadata_honored_when_present() {
        let matches = style().matches("- [ ] Task @work");
        assert_eq!(style().category(&matches[0]), "work");
        assert_eq!(style().message(&matches[0]), Some("Task".to_string()));

        let matches = style().matches("- [ ] Task //2024-01-15");
        assert_eq!(style().date(&matches[0]), "2024-01-15");
        assert_eq!(style().message(&matches[0]), Some("Task".to_string()));

        let matches = style().matches("- [ ] Task +urgent +important");
        assert_eq!(style().tags(&matches[0]), vec!["urgent", "important"]);
        assert_eq!(style().message(&matches[0]), Some("Task".to_string()));
    }

    #[test]
    fn test_scroll_anchor_strips_bullet() {
        let matches = style().matches("- [ ] Task text");
        assert_eq!(
            style().scroll_anchor(&matches[0]),
            Some(ScrollAnchor {
                text: "[ ] Task text".to_string(),
                element: "ul".to_string(),
            })
        );
    }

    #[test]
    fn test_deeply_nested_todos() {
        let text = "- [ ] Level 1\n  - [ ] Level 2\n    - [ ] Level 3";
        let matches = style().matches(text);
        assert_eq!(matches.len(), 3);
        assert_eq!(style().message(&matches[2]), Some("Level 3".to_string()));
    }
}
