use thiserror::Error;

/// Errors raised when filter labels do not match the known vocabulary.
///
/// These indicate a persisted filter or a configuration table that is
/// out of sync with the engine, so they are surfaced loudly instead of
/// being treated as "matches nothing".
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    #[error("unknown date filter: '{label}'")]
    UnknownDateFilter { label: String },

    #[error("unknown completion filter: '{label}'")]
    UnknownCompletedFilter { label: String },
}

impl FilterError {
    pub fn unknown_date(label: impl Into<String>) -> Self {
        FilterError::UnknownDateFilter {
            label: label.into(),
        }
    }

    pub fn unknown_completed(label: impl Into<String>) -> Self {
        FilterError::UnknownCompletedFilter {
            label: label.into(),
        }
    }
}
