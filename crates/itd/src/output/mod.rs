//! Output formatting utilities for the itd CLI.
//!
//! This module provides functions for formatting data as tables or JSON.
//! It is organized into submodules by entity type:
//!
//! - [`todos`] - Todo output formatting (list command)
//! - [`filters`] - Filter output formatting (filters list, filters show)
//! - [`helpers`] - Common formatting utilities (truncation, due dates, tags)

mod filters;
pub mod helpers;
mod todos;

// Re-export all public functions from submodules

// Todos
pub use todos::{format_todos_json, format_todos_table};

// Filters
pub use filters::{
    format_filter_list_json, format_filter_list_table, format_filter_spec_json,
    format_filter_spec_table,
};
