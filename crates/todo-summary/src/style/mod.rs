//! Todo styles: the markup conventions a collection can write todos in.
//!
//! Each style knows how to find todo lines in a note body, how to pull
//! the canonical fields out of a match, and how to rewrite the
//! completion marker in place. Styles are registered under a stable id
//! that configuration refers to.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::todo::ScrollAnchor;

mod link;
mod metalist;
mod plain;

pub use link::Link;
pub use metalist::Metalist;
pub use plain::Plain;

/// One pattern match inside a note body.
///
/// Wraps the capture groups so style extractors can be called in any
/// order against the same match.
pub struct MatchContext<'t> {
    caps: Captures<'t>,
}

impl<'t> MatchContext<'t> {
    fn new(caps: Captures<'t>) -> Self {
        Self { caps }
    }

    /// The entire matched text. One source line for the list styles.
    pub fn matched(&self) -> &'t str {
        self.caps.get(0).map(|m| m.as_str()).unwrap_or("")
    }

    /// A named capture group, if it participated in the match.
    pub fn group(&self, name: &str) -> Option<&'t str> {
        self.caps.name(name).map(|m| m.as_str())
    }
}

/// A todo markup convention.
///
/// `message` is the only extractor allowed to reject a match; every
/// other field falls back to an empty or sentinel value.
pub trait Dialect: Send + Sync {
    /// Stable id used in configuration.
    fn id(&self) -> &'static str;

    /// Human-readable name for settings surfaces.
    fn title(&self) -> &'static str;

    /// Every non-overlapping match in `text`, in document order.
    fn matches<'t>(&self, text: &'t str) -> Vec<MatchContext<'t>>;

    /// The todo text with style metadata stripped, or `None` when the
    /// match carries no usable message.
    fn message(&self, ctx: &MatchContext<'_>) -> Option<String>;

    /// Category token, or the style's fallback when absent.
    fn category(&self, ctx: &MatchContext<'_>) -> String;

    /// Raw date token as written, or empty.
    fn date(&self, ctx: &MatchContext<'_>) -> String;

    fn tags(&self, ctx: &MatchContext<'_>) -> Vec<String>;

    fn completed(&self, ctx: &MatchContext<'_>) -> bool;

    fn description(&self, _ctx: &MatchContext<'_>) -> String {
        String::new()
    }

    /// Anchor for scrolling an editor to the matched line.
    fn scroll_anchor(&self, _ctx: &MatchContext<'_>) -> Option<ScrollAnchor> {
        None
    }

    /// Marker text rewritten when toggling completion off.
    fn open_token(&self) -> &'static str;

    /// Marker text rewritten when toggling completion on.
    fn closed_token(&self) -> &'static str;

    /// Host search query matching open todos in this style.
    fn open_query(&self) -> &'static str;

    /// Host search query matching completed todos in this style.
    fn completed_query(&self) -> &'static str;
}

static DIALECTS: &[&dyn Dialect] = &[&Metalist, &Link, &Plain];

/// All registered styles, in presentation order.
pub fn dialects() -> &'static [&'static dyn Dialect] {
    DIALECTS
}

/// Looks up a style by its configuration id.
pub fn dialect(id: &str) -> Option<&'static dyn Dialect> {
    DIALECTS.iter().copied().find(|d| d.id() == id)
}

pub(crate) fn find_all<'t>(pattern: &Regex, text: &'t str) -> Vec<MatchContext<'t>> {
    pattern.captures_iter(text).map(MatchContext::new).collect()
}

// Shared extractors for the checkbox list styles. Metadata tokens are
// `@category`, `//date` and `+tag`, each a single whitespace-free run.

static CATEGORY_TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"@(\S+)").unwrap());
static DATE_TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"//(\S+)").unwrap());
static TAG_TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\+(\S+)").unwrap());
static META_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^|\s)(@\S+|//\S+|\+\S+)").unwrap());

pub(crate) fn strip_metadata(body: &str) -> String {
    META_TOKEN.replace_all(body, "").trim().to_string()
}

pub(crate) fn first_category(body: &str) -> Option<String> {
    CATEGORY_TOKEN.captures(body).map(|c| c[1].to_string())
}

pub(crate) fn first_date(body: &str) -> String {
    DATE_TOKEN
        .captures(body)
        .map(|c| c[1].to_string())
        .unwrap_or_default()
}

pub(crate) fn all_tags(body: &str) -> Vec<String> {
    TAG_TOKEN
        .captures_iter(body)
        .map(|c| c[1].to_string())
        .collect()
}

pub(crate) fn checkbox_completed(ctx: &MatchContext<'_>) -> bool {
    matches!(ctx.group("check"), Some("x") | Some("X"))
}

/// Anchor text is the matched line minus indentation and the list
/// bullet, which is how the line appears in rendered markdown.
pub(crate) fn list_scroll_anchor(ctx: &MatchContext<'_>) -> Option<ScrollAnchor> {
    let line = ctx.matched().trim_start_matches([' ', '\t']);
    let text = line.strip_prefix("- ").unwrap_or(line);
    Some(ScrollAnchor {
        text: text.to_string(),
        element: "ul".to_string(),
    })
}
