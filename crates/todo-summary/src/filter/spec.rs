//! Filter vocabulary: specifications, the saved library, and the
//! completion ledger.
//!
//! Filter values serialize as the human-readable labels the selection
//! UI shows ("End of Week", "2 weeks", "All Time"), so persisted
//! libraries stay legible and editable by hand.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use super::error::FilterError;

/// When a record was marked complete by this system, keyed by record
/// identity. Not derived from document state.
pub type CheckedMap = HashMap<String, NaiveDate>;

/// A date-window selection.
///
/// Every window except `All` and `None` is cumulative: it admits all
/// parseable dates up to the window's end, not just dates inside the
/// current period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFilter {
    All,
    None,
    Overdue,
    Today,
    Tomorrow,
    EndOfWeek,
    EndOfMonth,
    EndOfYear,
    Weeks(u32),
    Months(u32),
}

impl Default for DateFilter {
    fn default() -> Self {
        DateFilter::All
    }
}

impl fmt::Display for DateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateFilter::All => f.write_str("All"),
            DateFilter::None => f.write_str("None"),
            DateFilter::Overdue => f.write_str("Overdue"),
            DateFilter::Today => f.write_str("Today"),
            DateFilter::Tomorrow => f.write_str("Tomorrow"),
            DateFilter::EndOfWeek => f.write_str("End of Week"),
            DateFilter::EndOfMonth => f.write_str("End of Month"),
            DateFilter::EndOfYear => f.write_str("End of Year"),
            DateFilter::Weeks(1) => f.write_str("1 week"),
            DateFilter::Weeks(n) => write!(f, "{n} weeks"),
            DateFilter::Months(1) => f.write_str("1 month"),
            DateFilter::Months(n) => write!(f, "{n} months"),
        }
    }
}

impl FromStr for DateFilter {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let filter = match s {
            "All" => DateFilter::All,
            "None" => DateFilter::None,
            "Overdue" => DateFilter::Overdue,
            "Today" => DateFilter::Today,
            "Tomorrow" => DateFilter::Tomorrow,
            "End of Week" => DateFilter::EndOfWeek,
            "End of Month" => DateFilter::EndOfMonth,
            "End of Year" => DateFilter::EndOfYear,
            spanned => return parse_spanned(spanned),
        };
        Ok(filter)
    }
}

// "1 week", "2 weeks", "1 month", "N months". Singular and plural both
// parse so hand-edited libraries are forgiving.
fn parse_spanned(label: &str) -> Result<DateFilter, FilterError> {
    let (count, unit) = label
        .split_once(' ')
        .ok_or_else(|| FilterError::unknown_date(label))?;
    let count: u32 = count
        .parse()
        .map_err(|_| FilterError::unknown_date(label))?;
    match unit {
        "week" | "weeks" => Ok(DateFilter::Weeks(count)),
        "month" | "months" => Ok(DateFilter::Months(count)),
        _ => Err(FilterError::unknown_date(label)),
    }
}

impl Serialize for DateFilter {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DateFilter {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let label = String::deserialize(deserializer)?;
        label.parse().map_err(de::Error::custom)
    }
}

/// Which completed records remain visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletedFilter {
    None,
    AllTime,
    Today,
    ThisWeek,
    ThisMonth,
    ThisYear,
}

impl Default for CompletedFilter {
    fn default() -> Self {
        CompletedFilter::None
    }
}

impl fmt::Display for CompletedFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CompletedFilter::None => "None",
            CompletedFilter::AllTime => "All Time",
            CompletedFilter::Today => "Today",
            CompletedFilter::ThisWeek => "This Week",
            CompletedFilter::ThisMonth => "This Month",
            CompletedFilter::ThisYear => "This Year",
        };
        f.write_str(label)
    }
}

impl FromStr for CompletedFilter {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "None" => Ok(CompletedFilter::None),
            "All Time" => Ok(CompletedFilter::AllTime),
            "Today" => Ok(CompletedFilter::Today),
            "This Week" => Ok(CompletedFilter::ThisWeek),
            "This Month" => Ok(CompletedFilter::ThisMonth),
            "This Year" => Ok(CompletedFilter::ThisYear),
            other => Err(FilterError::unknown_completed(other)),
        }
    }
}

impl Serialize for CompletedFilter {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CompletedFilter {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let label = String::deserialize(deserializer)?;
        label.parse().map_err(de::Error::custom)
    }
}

/// One filter, either the active one or a saved entry.
///
/// Empty array fields impose no constraint on their dimension. The
/// `messages` field is carried for saved-filter fidelity but is not
/// evaluated yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub note_ids: Vec<String>,
    #[serde(default)]
    pub notebook_ids: Vec<String>,
    #[serde(default)]
    pub messages: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub note_titles: Vec<String>,
    #[serde(default)]
    pub notebook_titles: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub date: DateFilter,
    #[serde(default = "override_default")]
    pub date_override: DateFilter,
    #[serde(default)]
    pub completed: CompletedFilter,
}

fn override_default() -> DateFilter {
    DateFilter::None
}

impl Default for FilterSpec {
    /// The empty filter the panel opens with: everything visible by
    /// date, no overrides, completed items only if checked today.
    fn default() -> Self {
        FilterSpec {
            name: String::new(),
            note_ids: Vec::new(),
            notebook_ids: Vec::new(),
            messages: Vec::new(),
            categories: Vec::new(),
            note_titles: Vec::new(),
            notebook_titles: Vec::new(),
            tags: Vec::new(),
            date: DateFilter::All,
            date_override: DateFilter::None,
            completed: CompletedFilter::Today,
        }
    }
}

/// Saved filters, the active filter and the completion ledger,
/// persisted together per consuming view.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FilterLibrary {
    #[serde(default)]
    pub saved: Vec<FilterSpec>,
    #[serde(default)]
    pub active: FilterSpec,
    #[serde(default)]
    pub history: Vec<FilterSpec>,
    #[serde(default)]
    pub checked: CheckedMap,
}
