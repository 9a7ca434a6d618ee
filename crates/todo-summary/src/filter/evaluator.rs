//! Filter evaluation against extracted todos.
//!
//! The evaluator is pure and synchronous: it reads the todo slice, the
//! filter specification and the completion ledger, and produces a new
//! result set. It performs no I/O and never consults the wall clock,
//! so it is safe to re-run on every filter edit.

use std::cmp::Ordering;
use std::iter::Peekable;
use std::str::Chars;

use chrono::{Datelike, Days, Local, Months, NaiveDate, Weekday};

use super::spec::{CheckedMap, CompletedFilter, DateFilter, FilterLibrary, FilterSpec};
use crate::todo::Todo;

/// Calendar context for date-window evaluation.
///
/// `today` is injected rather than read from the clock so results are
/// reproducible; `week_start` controls which day locale weeks begin on.
#[derive(Debug, Clone, Copy)]
pub struct FilterContext {
    today: NaiveDate,
    week_start: Weekday,
}

impl FilterContext {
    /// Creates a context with Monday-based weeks.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            week_start: Weekday::Mon,
        }
    }

    /// Creates a context for the local calendar date.
    pub fn local_today() -> Self {
        Self::new(Local::now().date_naive())
    }

    pub fn with_week_start(mut self, week_start: Weekday) -> Self {
        self.week_start = week_start;
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    fn same_week(&self, a: NaiveDate, b: NaiveDate) -> bool {
        a.week(self.week_start).first_day() == b.week(self.week_start).first_day()
    }

    /// Last date admitted by a bounded window. `All` and `None` have no
    /// bound; a window that overflows the calendar admits nothing.
    fn window_end(&self, filter: DateFilter) -> Option<NaiveDate> {
        match filter {
            DateFilter::All | DateFilter::None => None,
            DateFilter::Overdue => self.today.pred_opt(),
            DateFilter::Today => Some(self.today),
            DateFilter::Tomorrow => self.today.succ_opt(),
            DateFilter::EndOfWeek => Some(self.today.week(self.week_start).last_day()),
            DateFilter::EndOfMonth => end_of_month(self.today),
            DateFilter::EndOfYear => NaiveDate::from_ymd_opt(self.today.year(), 12, 31),
            DateFilter::Weeks(n) => self.today.checked_add_days(Days::new(u64::from(n) * 7)),
            DateFilter::Months(n) => self.today.checked_add_months(Months::new(n)),
        }
    }
}

fn end_of_month(date: NaiveDate) -> Option<NaiveDate> {
    let next_month = if date.month() == 12 {
        NaiveDate::from_ymd_opt(date.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(date.year(), date.month() + 1, 1)
    };
    next_month.and_then(|d| d.pred_opt())
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// The active filter's result set.
#[derive(Debug, Clone, PartialEq)]
pub struct Filtered {
    /// Matching todos in display order.
    pub todos: Vec<Todo>,
    /// Items in `todos` that are neither completed nor checked off.
    pub open_count: usize,
    /// Size of the input set before any filtering.
    pub total_count: usize,
}

/// Open-item count for one saved filter.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedCount {
    pub name: String,
    pub open_count: usize,
}

/// Results for a whole library: badge counts for each saved filter
/// plus the fully evaluated active filter.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredLibrary {
    pub saved: Vec<SavedCount>,
    pub active: Filtered,
}

/// Evaluates filter specifications against a todo slice.
pub struct FilterEvaluator<'a> {
    context: &'a FilterContext,
    checked: &'a CheckedMap,
}

impl<'a> FilterEvaluator<'a> {
    pub fn new(context: &'a FilterContext, checked: &'a CheckedMap) -> Self {
        Self { context, checked }
    }

    /// Runs the full pipeline and sorts the result for display.
    pub fn evaluate(&self, todos: &[Todo], spec: &FilterSpec) -> Filtered {
        let total_count = todos.len();
        let kept = self.matching_indices(todos, spec);
        let mut items: Vec<Todo> = kept.iter().map(|&i| todos[i].clone()).collect();
        sort_todos(&mut items);
        let open_count = items.iter().filter(|t| self.is_open(t)).count();
        Filtered {
            todos: items,
            open_count,
            total_count,
        }
    }

    /// Open-item count for a spec without materializing the result set.
    pub fn open_count(&self, todos: &[Todo], spec: &FilterSpec) -> usize {
        self.matching_indices(todos, spec)
            .into_iter()
            .filter(|&i| self.is_open(&todos[i]))
            .count()
    }

    fn is_open(&self, todo: &Todo) -> bool {
        !todo.completed && !self.checked.contains_key(&todo.key)
    }

    // The pipeline works over indices into the input slice, so the
    // final dedup compares positions in the index rather than field
    // values. Two textually identical records extracted from different
    // lines stay distinct.
    fn matching_indices(&self, todos: &[Todo], spec: &FilterSpec) -> Vec<usize> {
        let mut working: Vec<usize> = (0..todos.len())
            .filter(|&i| self.passes_completed(&todos[i], spec.completed))
            .collect();

        // The override set is carved out before narrowing so it can
        // reinstate records the other dimensions would drop.
        let overrides = self.filter_date(todos, &working, spec.date_override);

        retain_matching(todos, &mut working, &spec.categories, |t| &t.category);
        if !spec.tags.is_empty() {
            working.retain(|&i| todos[i].tags.iter().any(|tag| spec.tags.contains(tag)));
        }
        retain_matching(todos, &mut working, &spec.note_titles, |t| &t.note_title);
        retain_matching(todos, &mut working, &spec.notebook_titles, |t| &t.notebook_title);
        retain_matching(todos, &mut working, &spec.note_ids, |t| &t.note_id);
        retain_matching(todos, &mut working, &spec.notebook_ids, |t| &t.notebook_id);
        let narrowed = self.filter_date(todos, &working, spec.date);

        let mut seen = vec![false; todos.len()];
        let mut result = Vec::with_capacity(overrides.len() + narrowed.len());
        for index in overrides.into_iter().chain(narrowed) {
            if !seen[index] {
                seen[index] = true;
                result.push(index);
            }
        }
        result
    }

    fn checked_on(&self, todo: &Todo) -> Option<NaiveDate> {
        self.checked.get(&todo.key).copied()
    }

    fn passes_completed(&self, todo: &Todo, filter: CompletedFilter) -> bool {
        if !todo.completed {
            return true;
        }
        let today = self.context.today;
        match filter {
            CompletedFilter::None => false,
            CompletedFilter::AllTime => true,
            CompletedFilter::Today => self.checked_on(todo).is_some_and(|d| d == today),
            CompletedFilter::ThisWeek => self
                .checked_on(todo)
                .is_some_and(|d| self.context.same_week(d, today)),
            CompletedFilter::ThisMonth => self
                .checked_on(todo)
                .is_some_and(|d| (d.year(), d.month()) == (today.year(), today.month())),
            CompletedFilter::ThisYear => {
                self.checked_on(todo).is_some_and(|d| d.year() == today.year())
            }
        }
    }

    fn filter_date(&self, todos: &[Todo], working: &[usize], filter: DateFilter) -> Vec<usize> {
        match filter {
            DateFilter::All => working.to_vec(),
            DateFilter::None => Vec::new(),
            bounded => {
                let Some(end) = self.context.window_end(bounded) else {
                    return Vec::new();
                };
                working
                    .iter()
                    .copied()
                    .filter(|&i| parse_date(&todos[i].date).is_some_and(|d| d <= end))
                    .collect()
            }
        }
    }
}

fn retain_matching<F>(todos: &[Todo], working: &mut Vec<usize>, allowed: &[String], field: F)
where
    F: Fn(&Todo) -> &str,
{
    if allowed.is_empty() {
        return;
    }
    working.retain(|&i| allowed.iter().any(|a| a == field(&todos[i])));
}

/// Evaluates every saved filter for its badge count, then the active
/// filter in full, all against the library's own completion ledger.
pub fn evaluate_library(
    todos: &[Todo],
    library: &FilterLibrary,
    context: &FilterContext,
) -> FilteredLibrary {
    let evaluator = FilterEvaluator::new(context, &library.checked);
    let saved = library
        .saved
        .iter()
        .map(|spec| SavedCount {
            name: spec.name.clone(),
            open_count: evaluator.open_count(todos, spec),
        })
        .collect();
    let active = evaluator.evaluate(todos, &library.active);
    FilteredLibrary { saved, active }
}

/// Sorts for display: dated items first in ascending date order, then
/// by category and notebook title using a case-insensitive,
/// numeric-aware comparison.
pub fn sort_todos(todos: &mut [Todo]) {
    todos.sort_by(display_order);
}

fn display_order(a: &Todo, b: &Todo) -> Ordering {
    match (a.date.is_empty(), b.date.is_empty()) {
        (false, true) => return Ordering::Less,
        (true, false) => return Ordering::Greater,
        _ => {}
    }
    if !a.date.is_empty() && a.date != b.date {
        // Unparseable dates are not ordered against anything.
        return match (parse_date(&a.date), parse_date(&b.date)) {
            (Some(da), Some(db)) => da.cmp(&db),
            _ => Ordering::Equal,
        };
    }
    if a.category != b.category {
        return natural_cmp(&a.category, &b.category);
    }
    natural_cmp(&a.notebook_title, &b.notebook_title)
}

fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();
    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                match numeric_run(&mut left).cmp(&numeric_run(&mut right)) {
                    Ordering::Equal => {}
                    unequal => return unequal,
                }
            }
            (Some(x), Some(y)) => match x.to_lowercase().cmp(y.to_lowercase()) {
                Ordering::Equal => {
                    left.next();
                    right.next();
                }
                unequal => return unequal,
            },
        }
    }
}

// Runs compare by numeric value: leading zeros are insignificant, and
// value ties fall back to comparing the rest of the string.
fn numeric_run(chars: &mut Peekable<Chars<'_>>) -> (usize, String) {
    let mut digits = String::new();
    while let Some(&c) = chars.peek() {
        if !c.is_ascii_digit() {
            break;
        }
        digits.push(c);
        chars.next();
    }
    let significant = digits.trim_start_matches('0');
    (significant.len(), significant.to_string())
}
