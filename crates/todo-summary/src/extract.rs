//! Applies a style to document text, yielding canonical field sets.

use crate::style::Dialect;
use crate::todo::TodoFields;

/// Extracts every todo in `text` according to `style`.
///
/// Matching is pure: no shared cursor, no wall clock. Running twice on
/// the same text yields identical results. A field set is emitted only
/// when the style resolves a message for the match; the other fields
/// always resolve, falling back to empty or sentinel values.
pub fn extract(text: &str, style: &dyn Dialect) -> Vec<TodoFields> {
    style
        .matches(text)
        .iter()
        .filter_map(|ctx| {
            let message = style.message(ctx)?;
            Some(TodoFields {
                message,
                category: style.category(ctx),
                date: style.date(ctx),
                tags: style.tags(ctx),
                completed: style.completed(ctx),
                description: style.description(ctx),
                scroll_anchor: style.scroll_anchor(ctx),
            })
        })
        .collect()
}
