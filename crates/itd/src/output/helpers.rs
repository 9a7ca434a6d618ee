//! Common helper functions for output formatting.

use chrono::{Local, NaiveDate};
use owo_colors::OwoColorize;

/// Truncates a string to a maximum length in characters.
///
/// Counts characters rather than bytes so multi-byte titles never
/// split mid-character.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else {
        s.to_string()
    }
}

/// Formats a todo checkbox for display.
pub fn checkbox(completed: bool) -> &'static str {
    if completed {
        "[x]"
    } else {
        "[ ]"
    }
}

/// Formats a due date for display.
///
/// Dates the dialect could not normalize to `YYYY-MM-DD` pass through
/// unchanged.
pub fn format_date(date: &str, use_colors: bool) -> String {
    if date.is_empty() {
        return String::new();
    }

    let Ok(parsed) = NaiveDate::parse_from_str(date, "%Y-%m-%d") else {
        return date.to_string();
    };

    let today = Local::now().date_naive();
    let tomorrow = today + chrono::Duration::days(1);
    let yesterday = today - chrono::Duration::days(1);

    let display = if parsed == today {
        "Today".to_string()
    } else if parsed == tomorrow {
        "Tomorrow".to_string()
    } else if parsed == yesterday {
        "Yesterday".to_string()
    } else if parsed < today {
        // Format as relative days overdue
        let days = (today - parsed).num_days();
        if days == 1 {
            "1 day ago".to_string()
        } else {
            format!("{days} days ago")
        }
    } else {
        // Format as date
        parsed.format("%b %d").to_string()
    };

    if use_colors {
        if parsed < today {
            display.red().to_string()
        } else if parsed == today {
            display.yellow().to_string()
        } else {
            display
        }
    } else {
        display
    }
}

/// Formats tags for display.
pub fn format_tags(tags: &[String], max_len: usize) -> String {
    if tags.is_empty() {
        return String::new();
    }

    let formatted: Vec<String> = tags.iter().map(|t| format!("+{t}")).collect();
    let joined = formatted.join(" ");

    truncate_str(&joined, max_len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("short", 10), "short");
        assert_eq!(truncate_str("this is long", 10), "this is...");
    }

    #[test]
    fn test_truncate_str_multibyte() {
        assert_eq!(truncate_str("проект", 10), "проект");
        assert_eq!(truncate_str("длинное название", 10), "длинное...");
    }

    #[test]
    fn test_checkbox() {
        assert_eq!(checkbox(false), "[ ]");
        assert_eq!(checkbox(true), "[x]");
    }

    #[test]
    fn test_format_date_empty() {
        assert_eq!(format_date("", false), "");
    }

    #[test]
    fn test_format_date_passthrough() {
        assert_eq!(format_date("soonish", false), "soonish");
    }

    #[test]
    fn test_format_date_far_future() {
        assert_eq!(format_date("2099-12-31", false), "Dec 31");
    }

    #[test]
    fn test_format_date_far_past() {
        assert!(format_date("2001-01-01", false).ends_with("days ago"));
    }

    #[test]
    fn test_format_tags() {
        assert_eq!(format_tags(&[], 15), "");
        assert_eq!(format_tags(&["urgent".to_string()], 15), "+urgent");
        assert_eq!(
            format_tags(&["a".to_string(), "b".to_string()], 15),
            "+a +b"
        );
    }
}
