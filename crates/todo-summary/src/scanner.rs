//! Scan orchestration: drives the notes API to build a [`Summary`].
//!
//! The builder pages through host search results for the active style's
//! queries, extracts todos from each returned note, and merges them
//! into its summary. Single-request failures are logged and substituted
//! rather than propagated, so a scan always runs to completion.
//!
//! # Example
//!
//! ```no_run
//! use notes_api_rs::NotesClient;
//! use todo_summary_rs::scanner::{Settings, SummaryBuilder};
//! use todo_summary_rs::style::dialect;
//!
//! # async fn run() {
//! let settings = Settings::default();
//! let style = dialect(&settings.dialect).unwrap();
//! let client = NotesClient::new("api-token");
//!
//! let mut builder = SummaryBuilder::new(client, style, settings.scan_options());
//! let summary = builder.full_scan().await;
//! println!("found {} todos", summary.len());
//! # }
//! ```

use std::collections::HashMap;
use std::time::Duration;

use chrono::Utc;
use notes_api_rs::{Note, NotesClient};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::extract::extract;
use crate::style::Dialect;
use crate::todo::Todo;
use crate::Summary;

/// Notebook name used when a folder lookup fails or times out.
pub const UNKNOWN_FOLDER: &str = "Unknown Folder";

/// User-facing scan configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Id of the active todo style.
    pub dialect: String,
    /// Search requests to issue before taking a rest.
    pub burst_requests: u32,
    /// Seconds to rest between request bursts.
    pub burst_rest_secs: u64,
    /// Also scan for completed todos.
    pub include_completed: bool,
    /// Ask the host to synchronize after a note update. Only embedders
    /// own a sync trigger, so the core carries this through
    /// `GetSettings` without acting on it.
    pub force_sync: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dialect: "metalist".to_string(),
            burst_requests: 960,
            burst_rest_secs: 11,
            include_completed: false,
            force_sync: true,
        }
    }
}

impl Settings {
    /// Derives builder tuning from the user-facing configuration.
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            // The pager takes the page counter modulo this value.
            burst_requests: self.burst_requests.max(1),
            burst_rest: Duration::from_secs(self.burst_rest_secs),
            include_completed: self.include_completed,
            ..ScanOptions::default()
        }
    }
}

/// Tuning for one builder instance.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanOptions {
    /// Search requests to issue before resting.
    pub burst_requests: u32,
    /// How long to rest between bursts.
    pub burst_rest: Duration,
    /// Also run the completed-items query.
    pub include_completed: bool,
    /// How long to wait on a notebook title lookup before falling back
    /// to [`UNKNOWN_FOLDER`].
    pub lookup_timeout: Duration,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            burst_requests: 960,
            burst_rest: Duration::from_secs(11),
            include_completed: false,
            lookup_timeout: Duration::from_secs(5),
        }
    }
}

/// Builds and maintains a [`Summary`] by scanning notes for todos.
///
/// A full scan pages through the style's open-todo search query (and
/// the completed query when configured), extracting each returned note.
/// Notebook titles are resolved through a memoized lookup that is never
/// invalidated within one builder; stale names last at most a session.
///
/// # Concurrency
///
/// All scan methods take `&mut self`, so one builder has one writer.
/// Two builders over the same collection can still race a full scan
/// against an incremental one; the last writer wins, and the effect is
/// bounded to stale summary entries until the next scan. Callers who
/// need stronger ordering route every scan through a single owned
/// builder, which single-task usage does naturally.
pub struct SummaryBuilder {
    client: NotesClient,
    style: &'static dyn Dialect,
    options: ScanOptions,
    summary: Summary,
    folder_titles: HashMap<String, String>,
}

impl SummaryBuilder {
    pub fn new(client: NotesClient, style: &'static dyn Dialect, options: ScanOptions) -> Self {
        Self {
            client,
            style,
            options,
            summary: Summary::new(),
            folder_titles: HashMap::new(),
        }
    }

    /// The current summary state.
    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    /// The style this builder extracts with.
    pub fn style(&self) -> &'static dyn Dialect {
        self.style
    }

    /// The underlying API client.
    pub fn client(&self) -> &NotesClient {
        &self.client
    }

    /// Rebuilds the summary from scratch.
    ///
    /// The summary is cleared first: a scan that fails entirely yields
    /// an empty summary rather than a stale one. The refresh timestamp
    /// is stamped when the scan completes.
    pub async fn full_scan(&mut self) -> &Summary {
        self.summary.clear();
        self.scan_query(self.style.open_query()).await;
        if self.options.include_completed {
            self.scan_query(self.style.completed_query()).await;
        }
        self.summary.refreshed_at = Some(Utc::now());
        &self.summary
    }

    /// Rescans a single note and updates its summary entry in place.
    /// Returns true when the summary changed.
    pub async fn scan_note(&mut self, note_id: &str) -> bool {
        let note = match self.client.note(note_id).await {
            Ok(note) => note,
            Err(err) => {
                warn!("failed to fetch note {note_id} for rescan: {err}");
                return false;
            }
        };
        self.merge_note(&note).await
    }

    async fn scan_query(&mut self, query: &str) {
        let mut page = 1;
        loop {
            let result = match self.client.search_page(query, page).await {
                Ok(result) => result,
                Err(err) => {
                    // Treated as an empty final page; the notes already
                    // merged stay in the summary.
                    warn!("search page {page} failed: {err}");
                    break;
                }
            };
            for note in &result.items {
                self.merge_note(note).await;
            }
            if !result.has_more {
                break;
            }
            if page % self.options.burst_requests == 0 {
                debug!("resting {:?} after {page} search pages", self.options.burst_rest);
                tokio::time::sleep(self.options.burst_rest).await;
            }
            page += 1;
        }
    }

    /// Extracts one note into the summary. Conflict copies are dropped
    /// along with any entry recorded for that note id.
    async fn merge_note(&mut self, note: &Note) -> bool {
        if note.is_conflict {
            debug!("dropping conflict copy of note {}", note.id);
            return self.summary.remove(&note.id);
        }

        // The body was fetched when the search page was served; by the
        // time the folder lookup resolves it can be stale. The next
        // scan repairs any such entry, so nothing is lost.
        let folder = self.notebook_title(&note.parent_id).await;
        let todos: Vec<Todo> = extract(&note.body, self.style)
            .into_iter()
            .map(|fields| {
                Todo::from_fields(fields, &note.id, &note.title, &note.parent_id, &folder)
            })
            .collect();
        self.summary.replace(&note.id, todos)
    }

    /// Resolves a notebook title through the memo, racing fresh lookups
    /// against the configured timeout. Failures memoize the sentinel so
    /// an unreachable folder is asked about once per scan session.
    async fn notebook_title(&mut self, id: &str) -> String {
        if let Some(title) = self.folder_titles.get(id) {
            return title.clone();
        }
        let lookup = tokio::time::timeout(self.options.lookup_timeout, self.client.folder(id));
        let title = match lookup.await {
            Ok(Ok(folder)) => folder.title,
            Ok(Err(err)) => {
                warn!("folder {id} lookup failed: {err}");
                UNKNOWN_FOLDER.to_string()
            }
            Err(_) => {
                warn!("folder {id} lookup timed out");
                UNKNOWN_FOLDER.to_string()
            }
        };
        self.folder_titles.insert(id.to_string(), title.clone());
        title
    }
}
