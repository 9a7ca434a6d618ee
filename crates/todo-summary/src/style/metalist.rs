//! Checkbox list items that carry at least one metadata token.

use std::sync::LazyLock;

use regex::Regex;

use super::{
    all_tags, checkbox_completed, find_all, first_category, first_date, list_scroll_anchor,
    strip_metadata, Dialect, MatchContext,
};
use crate::todo::ScrollAnchor;

// A line only qualifies when the body contains a category, date or tag
// token. Plain checkboxes without metadata belong to the plain style.
static PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^(?P<indent>[ \t]*)- \[(?P<check>[xX ])\] (?P<body>.*(?:@\S+|//\S+|\+\S+).*)$")
        .unwrap()
});

/// The metalist style: `- [ ] message @category //date +tag`.
pub struct Metalist;

impl Dialect for Metalist {
    fn id(&self) -> &'static str {
        "metalist"
    }

    fn title(&self) -> &'static str {
        "Metalist Style"
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
            .unwrap_or_default()
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
