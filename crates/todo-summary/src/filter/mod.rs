//! Filter model and evaluation for the todo panel.
//!
//! A [`FilterSpec`] narrows a scanned summary along several dimensions
//! at once; a [`FilterLibrary`] bundles the saved filters, the active
//! filter and the completion ledger that panel state persists between
//! sessions.
//!
//! # Filter dimensions
//!
//! - Set matching on category, tags, note and notebook titles, and
//!   note and notebook ids. Empty lists match everything; within a
//!   list any value may match.
//! - A cumulative [`DateFilter`] window: `Tomorrow` admits everything
//!   dated up to and including tomorrow, not just tomorrow itself.
//! - A [`CompletedFilter`] shortcut that readmits completed items
//!   checked off recently enough, based on the completion ledger.
//! - A date override that unions a second date window back in after
//!   the other dimensions have narrowed the set.
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//!
//! use chrono::NaiveDate;
//! use todo_summary_rs::filter::{DateFilter, FilterContext, FilterEvaluator, FilterSpec};
//!
//! let spec = FilterSpec {
//!     tags: vec!["urgent".to_string()],
//!     date: DateFilter::Weeks(1),
//!     ..FilterSpec::default()
//! };
//!
//! let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
//! let context = FilterContext::new(today);
//! let checked = HashMap::new();
//! let evaluator = FilterEvaluator::new(&context, &checked);
//!
//! let result = evaluator.evaluate(&[], &spec);
//! assert_eq!(result.total_count, 0);
//! ```

mod error;
mod evaluator;
mod spec;
mod store;

pub use error::FilterError;
pub use evaluator::{
    evaluate_library, sort_todos, Filtered, FilteredLibrary, FilterContext, FilterEvaluator,
    SavedCount,
};
pub use spec::{CheckedMap, CompletedFilter, DateFilter, FilterLibrary, FilterSpec};
pub use store::{reduce, sync_checked, FieldUpdate, FilterAction};
