//! Markdown-link todos: `[TODO](context) message`.

use std::sync::LazyLock;

use regex::Regex;

use super::{find_all, Dialect, MatchContext};

static PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\[(?P<marker>TODO|DONE)\]\((?P<paren>[^)\n]*)\)(?P<rest>[^\n]*)").unwrap()
});

/// The link style. The marker doubles as the category and the
/// parenthesized text is read as the date, so there is no way to
/// express tags. Jump targets are not supported because the rendered
/// link text does not contain the source line.
pub struct Link;

impl Dialect for Link {
    fn id(&self) -> &'static str {
        "link"
    }

    fn title(&self) -> &'static str {
        "Link Style"
    }

    fn matches<'t>(&self, text: &'t str) -> Vec<MatchContext<'t>> {
        find_all(&PATTERN, text)
    }

    // The leading space survives on purpose. Trimming here would break
    // the identity match against lines rewritten by the toggle.
    fn message(&self, ctx: &MatchContext<'_>) -> Option<String> {
        ctx.group("rest").map(str::to_string)
    }

    fn category(&self, ctx: &MatchContext<'_>) -> String {
        ctx.group("marker").unwrap_or_default().to_string()
    }

    fn date(&self, ctx: &MatchContext<'_>) -> String {
        ctx.group("paren").unwrap_or_default().to_string()
    }

    fn tags(&self, _ctx: &MatchContext<'_>) -> Vec<String> {
        Vec::new()
    }

    fn completed(&self, ctx: &MatchContext<'_>) -> bool {
        ctx.group("marker")
            .is_some_and(|m| m.eq_ignore_ascii_case("DONE"))
    }

    fn open_token(&self) -> &'static str {
        "[TODO]"
    }

    fn closed_token(&self) -> &'static str {
        "[DONE]"
    }

    // The opening parenthesis keeps the host search from returning
    // notes whose bare markers the pattern would reject anyway.
    fn open_query(&self) -> &'static str {
        "/\"[TODO](\""
    }

    fn completed_query(&self) -> &'static str {
        "/\"[DONE](\""
    }
}
