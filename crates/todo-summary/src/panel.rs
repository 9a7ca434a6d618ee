//! Message bridge between an embedding view and the scan/filter core.
//!
//! Embedders speak a small `{type, value}` vocabulary: every request and
//! reply is one variant of [`PanelRequest`] or [`PanelReply`], so an
//! unrecognized message fails at decode time instead of falling through
//! a dispatcher. Filter persistence is delegated to the embedder through
//! the [`FilterStorage`] capability, keyed by the consuming view's id.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::filter::FilterLibrary;
use crate::mark::set_completion;
use crate::scanner::{Settings, SummaryBuilder};
use crate::todo::{ScrollAnchor, Todo};
use crate::Summary;

/// Requests a consuming view sends to the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum PanelRequest {
    /// Ask for the active scan configuration.
    GetSettings,
    /// Run a full scan and return the fresh summary.
    GetSummary,
    /// Toggle the record's completion marker in its origin note.
    MarkDone(Todo),
    /// Ask where to scroll for this record.
    JumpTo(Todo),
    /// Load the filter library saved for this view.
    GetFilters,
    /// Persist the filter library for this view.
    SetFilters(FilterLibrary),
}

/// Replies the core sends back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum PanelReply {
    Settings(Settings),
    Summary(Summary),
    /// A summary refreshed as a side effect of another request.
    UpdateSummary(Summary),
    ScrollTo(ScrollTarget),
    Filters(Option<FilterLibrary>),
    Ack,
}

/// Where the embedder should move its editor after a jump request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrollTarget {
    pub note_id: String,
    /// Absent for styles that cannot anchor a line, in which case the
    /// embedder can still open the note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<ScrollAnchor>,
}

/// Persistence for filter libraries, keyed by consuming view.
pub trait FilterStorage {
    fn load(&self, view_id: &str) -> Option<FilterLibrary>;
    fn save(&mut self, view_id: &str, library: &FilterLibrary);
}

/// In-memory storage for tests and ephemeral views.
impl FilterStorage for HashMap<String, FilterLibrary> {
    fn load(&self, view_id: &str) -> Option<FilterLibrary> {
        self.get(view_id).cloned()
    }

    fn save(&mut self, view_id: &str, library: &FilterLibrary) {
        self.insert(view_id.to_string(), library.clone());
    }
}

/// Serves one view's requests against a builder and a filter store.
pub struct Panel<S> {
    builder: SummaryBuilder,
    settings: Settings,
    storage: S,
    view_id: String,
}

impl<S: FilterStorage> Panel<S> {
    pub fn new(
        builder: SummaryBuilder,
        settings: Settings,
        storage: S,
        view_id: impl Into<String>,
    ) -> Self {
        Self {
            builder,
            settings,
            storage,
            view_id: view_id.into(),
        }
    }

    /// The builder backing this panel.
    pub fn builder(&self) -> &SummaryBuilder {
        &self.builder
    }

    /// The filter store backing this panel.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Dispatches one request and produces its reply.
    ///
    /// `MarkDone` replies with the summary as refreshed after rescanning
    /// the record's note, whether or not the toggle itself landed; the
    /// reply therefore always reflects the note's current state.
    pub async fn handle(&mut self, request: PanelRequest) -> PanelReply {
        debug!("panel request: {:?}", request);
        match request {
            PanelRequest::GetSettings => PanelReply::Settings(self.settings.clone()),
            PanelRequest::GetSummary => {
                let summary = self.builder.full_scan().await.clone();
                PanelReply::Summary(summary)
            }
            PanelRequest::MarkDone(todo) => {
                let completed = !todo.completed;
                set_completion(self.builder.client(), &todo, completed, self.builder.style())
                    .await;
                self.builder.scan_note(&todo.note_id).await;
                PanelReply::UpdateSummary(self.builder.summary().clone())
            }
            PanelRequest::JumpTo(todo) => PanelReply::ScrollTo(ScrollTarget {
                note_id: todo.note_id,
                anchor: todo.scroll_anchor,
            }),
            PanelRequest::GetFilters => PanelReply::Filters(self.storage.load(&self.view_id)),
            PanelRequest::SetFilters(library) => {
                self.storage.save(&self.view_id, &library);
                PanelReply::Ack
            }
        }
    }
}
