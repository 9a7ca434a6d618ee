//! Integration tests for the scan orchestrator and panel bridge.
//!
//! These tests use wiremock to mock the notes data API.

use std::collections::HashMap;
use std::time::Duration;

use notes_api_rs::NotesClient;
use todo_summary_rs::filter::FilterLibrary;
use todo_summary_rs::panel::{Panel, PanelReply, PanelRequest};
use todo_summary_rs::scanner::{ScanOptions, Settings, SummaryBuilder, UNKNOWN_FOLDER};
use todo_summary_rs::style::dialect;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const OPEN_QUERY: &str = "/\"- [ ]\"";
const DONE_QUERY: &str = "/\"- [x]\"";

fn note_json(id: &str, parent_id: &str, title: &str, body: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "parent_id": parent_id,
        "title": title,
        "body": body,
        "is_conflict": 0
    })
}

fn page_json(items: Vec<serde_json::Value>, has_more: bool) -> serde_json::Value {
    serde_json::json!({ "items": items, "has_more": has_more })
}

async fn mount_search(server: &MockServer, query: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("query", query))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_folder(server: &MockServer, id: &str, title: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/folders/{id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": id,
            "title": title
        })))
        .mount(server)
        .await;
}

fn builder(server: &MockServer) -> SummaryBuilder {
    builder_with(server, ScanOptions::default())
}

fn builder_with(server: &MockServer, options: ScanOptions) -> SummaryBuilder {
    let client = NotesClient::with_base_url("test-token", server.uri());
    let style = dialect("metalist").unwrap();
    SummaryBuilder::new(client, style, options)
}

// ==================== Full Scans ====================

/// Test: a full scan extracts todos grouped by note with resolved folders
#[tokio::test]
async fn test_full_scan_builds_summary_from_search() {
    let server = MockServer::start().await;
    let items = vec![
        note_json("n1", "f1", "Groceries", "- [ ] Buy milk @home\n- [ ] Buy eggs @home"),
        note_json("n2", "f2", "Work Log", "- [ ] Ship release @work //2024-06-20"),
    ];
    mount_search(&server, OPEN_QUERY, page_json(items, false)).await;
    mount_folder(&server, "f1", "Personal").await;
    mount_folder(&server, "f2", "Office").await;

    let mut builder = builder(&server);
    let summary = builder.full_scan().await;

    assert_eq!(summary.len(), 3);
    assert!(summary.refreshed_at.is_some());
    assert_eq!(summary.by_note["n1"].len(), 2);
    assert_eq!(summary.by_note["n1"][0].message, "Buy milk");
    assert_eq!(summary.by_note["n1"][0].notebook_title, "Personal");
    assert_eq!(summary.by_note["n2"][0].date, "2024-06-20");
    assert_eq!(summary.by_note["n2"][0].notebook_title, "Office");
}

/// Test: the scan follows has_more across pages, resting between bursts
#[tokio::test]
async fn test_full_scan_follows_pagination() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(
            vec![note_json("n1", "f1", "First", "- [ ] Task one @work")],
            true,
        )))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(
            vec![note_json("n2", "f1", "Second", "- [ ] Task two @work")],
            false,
        )))
        .expect(1)
        .mount(&server)
        .await;
    mount_folder(&server, "f1", "Projects").await;

    // Burst size one forces the rest branch after every page.
    let options = ScanOptions {
        burst_requests: 1,
        burst_rest: Duration::from_millis(1),
        ..ScanOptions::default()
    };
    let mut builder = builder_with(&server, options);
    let summary = builder.full_scan().await;

    assert_eq!(summary.len(), 2);
    assert!(summary.by_note.contains_key("n1"));
    assert!(summary.by_note.contains_key("n2"));
}

/// Test: conflict copies in search results are not extracted
#[tokio::test]
async fn test_full_scan_skips_conflict_copies() {
    let server = MockServer::start().await;
    let conflict = serde_json::json!({
        "id": "n1",
        "parent_id": "f1",
        "title": "Groceries (conflict)",
        "body": "- [ ] Buy milk @home",
        "is_conflict": 1
    });
    let items = vec![conflict, note_json("n2", "f1", "Chores", "- [ ] Mow lawn @home")];
    mount_search(&server, OPEN_QUERY, page_json(items, false)).await;
    mount_folder(&server, "f1", "Personal").await;

    let mut builder = builder(&server);
    let summary = builder.full_scan().await;

    assert_eq!(summary.len(), 1);
    assert!(!summary.by_note.contains_key("n1"));
}

/// Test: notebook titles are looked up once per folder per builder
#[tokio::test]
async fn test_folder_titles_memoized_across_notes() {
    let server = MockServer::start().await;
    let items = vec![
        note_json("n1", "f1", "First", "- [ ] Task one @work"),
        note_json("n2", "f1", "Second", "- [ ] Task two @work"),
    ];
    mount_search(&server, OPEN_QUERY, page_json(items, false)).await;

    Mock::given(method("GET"))
        .and(path("/folders/f1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "f1",
            "title": "Projects"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut builder = builder(&server);
    let summary = builder.full_scan().await;

    assert_eq!(summary.by_note["n1"][0].notebook_title, "Projects");
    assert_eq!(summary.by_note["n2"][0].notebook_title, "Projects");
}

/// Test: an unreachable folder maps to the sentinel name, asked once
#[tokio::test]
async fn test_unreachable_folder_uses_sentinel() {
    let server = MockServer::start().await;
    let items = vec![
        note_json("n1", "gone", "First", "- [ ] Task one @work"),
        note_json("n2", "gone", "Second", "- [ ] Task two @work"),
    ];
    mount_search(&server, OPEN_QUERY, page_json(items, false)).await;

    Mock::given(method("GET"))
        .and(path("/folders/gone"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let mut builder = builder(&server);
    let summary = builder.full_scan().await;

    assert_eq!(summary.by_note["n1"][0].notebook_title, UNKNOWN_FOLDER);
    assert_eq!(summary.by_note["n2"][0].notebook_title, UNKNOWN_FOLDER);
}

/// Test: a folder lookup slower than the timeout falls back to the sentinel
#[tokio::test]
async fn test_slow_folder_lookup_falls_back() {
    let server = MockServer::start().await;
    let items = vec![note_json("n1", "f1", "First", "- [ ] Task one @work")];
    mount_search(&server, OPEN_QUERY, page_json(items, false)).await;

    Mock::given(method("GET"))
        .and(path("/folders/f1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "id": "f1", "title": "Projects" }))
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&server)
        .await;

    let options = ScanOptions {
        lookup_timeout: Duration::from_millis(50),
        ..ScanOptions::default()
    };
    let mut builder = builder_with(&server, options);
    let summary = builder.full_scan().await;

    assert_eq!(summary.by_note["n1"][0].notebook_title, UNKNOWN_FOLDER);
}

/// Test: a failing search endpoint still yields a completed, empty scan
#[tokio::test]
async fn test_failed_search_still_completes_scan() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut builder = builder(&server);
    let summary = builder.full_scan().await;

    assert!(summary.is_empty());
    assert!(summary.refreshed_at.is_some());
}

/// Test: the completed-items query runs as a second pass when configured
#[tokio::test]
async fn test_completed_pass_runs_when_configured() {
    let server = MockServer::start().await;
    mount_search(
        &server,
        OPEN_QUERY,
        page_json(vec![note_json("n1", "f1", "Open", "- [ ] Water plants @home")], false),
    )
    .await;
    mount_search(
        &server,
        DONE_QUERY,
        page_json(vec![note_json("n2", "f1", "Done", "- [x] Wash car @home")], false),
    )
    .await;
    mount_folder(&server, "f1", "Personal").await;

    let options = ScanOptions {
        include_completed: true,
        ..ScanOptions::default()
    };
    let mut builder = builder_with(&server, options);
    let summary = builder.full_scan().await;

    assert_eq!(summary.len(), 2);
    assert!(!summary.by_note["n1"][0].completed);
    assert!(summary.by_note["n2"][0].completed);
}

// ==================== Incremental Scans ====================

/// Test: rescanning a note replaces its entry without restamping the scan time
#[tokio::test]
async fn test_scan_note_replaces_entry_without_restamping() {
    let server = MockServer::start().await;
    mount_search(
        &server,
        OPEN_QUERY,
        page_json(vec![note_json("n1", "f1", "List", "- [ ] Old task @work")], false),
    )
    .await;
    mount_folder(&server, "f1", "Projects").await;
    Mock::given(method("GET"))
        .and(path("/notes/n1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(note_json(
            "n1",
            "f1",
            "List",
            "- [ ] New task @work",
        )))
        .mount(&server)
        .await;

    let mut builder = builder(&server);
    builder.full_scan().await;
    let stamped = builder.summary().refreshed_at;
    assert_eq!(builder.summary().by_note["n1"][0].message, "Old task");

    let changed = builder.scan_note("n1").await;

    assert!(changed);
    assert_eq!(builder.summary().by_note["n1"][0].message, "New task");
    assert_eq!(builder.summary().refreshed_at, stamped);
}

/// Test: a note whose todos disappeared loses its summary entry
#[tokio::test]
async fn test_scan_note_removes_emptied_entry() {
    let server = MockServer::start().await;
    mount_search(
        &server,
        OPEN_QUERY,
        page_json(vec![note_json("n1", "f1", "List", "- [ ] Only task @work")], false),
    )
    .await;
    mount_folder(&server, "f1", "Projects").await;
    Mock::given(method("GET"))
        .and(path("/notes/n1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(note_json(
            "n1",
            "f1",
            "List",
            "Nothing to do here anymore.",
        )))
        .mount(&server)
        .await;

    let mut builder = builder(&server);
    builder.full_scan().await;
    assert_eq!(builder.summary().len(), 1);

    assert!(builder.scan_note("n1").await);
    assert!(builder.summary().is_empty());

    // Rescanning an absent entry with the same empty body changes nothing.
    assert!(!builder.scan_note("n1").await);
}

/// Test: a note that turned into a conflict copy is dropped from the summary
#[tokio::test]
async fn test_scan_note_drops_conflicted_entry() {
    let server = MockServer::start().await;
    mount_search(
        &server,
        OPEN_QUERY,
        page_json(vec![note_json("n1", "f1", "List", "- [ ] Only task @work")], false),
    )
    .await;
    mount_folder(&server, "f1", "Projects").await;
    Mock::given(method("GET"))
        .and(path("/notes/n1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "n1",
            "parent_id": "f1",
            "title": "List",
            "body": "- [ ] Only task @work",
            "is_conflict": 1
        })))
        .mount(&server)
        .await;

    let mut builder = builder(&server);
    builder.full_scan().await;
    assert_eq!(builder.summary().len(), 1);

    assert!(builder.scan_note("n1").await);
    assert!(builder.summary().is_empty());
}

/// Test: a failed note fetch leaves the summary untouched
#[tokio::test]
async fn test_scan_note_fetch_failure_leaves_summary() {
    let server = MockServer::start().await;
    mount_search(
        &server,
        OPEN_QUERY,
        page_json(vec![note_json("n1", "f1", "List", "- [ ] Only task @work")], false),
    )
    .await;
    mount_folder(&server, "f1", "Projects").await;
    Mock::given(method("GET"))
        .and(path("/notes/n1"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let mut builder = builder(&server);
    builder.full_scan().await;

    assert!(!builder.scan_note("n1").await);
    assert_eq!(builder.summary().len(), 1);
}

// ==================== Panel Bridge ====================

fn panel(server: &MockServer) -> Panel<HashMap<String, FilterLibrary>> {
    Panel::new(
        builder(server),
        Settings::default(),
        HashMap::new(),
        "summary-view",
    )
}

/// Test: getSummary runs a fresh scan and replies with it
#[tokio::test]
async fn test_panel_get_summary_runs_scan() {
    let server = MockServer::start().await;
    mount_search(
        &server,
        OPEN_QUERY,
        page_json(vec![note_json("n1", "f1", "List", "- [ ] Buy milk @home")], false),
    )
    .await;
    mount_folder(&server, "f1", "Personal").await;

    let mut panel = panel(&server);
    let reply = panel.handle(PanelRequest::GetSummary).await;

    let PanelReply::Summary(summary) = reply else {
        panic!("expected a summary reply");
    };
    assert_eq!(summary.len(), 1);
    assert_eq!(summary.by_note["n1"][0].message, "Buy milk");
    assert!(summary.refreshed_at.is_some());
}

/// Test: markDone rewrites the origin line and replies with a rescan
#[tokio::test]
async fn test_panel_mark_done_toggles_and_refreshes() {
    let server = MockServer::start().await;
    mount_search(
        &server,
        OPEN_QUERY,
        page_json(vec![note_json("n1", "f1", "List", "- [ ] Buy milk @home")], false),
    )
    .await;
    mount_folder(&server, "f1", "Personal").await;

    // First fetch serves the still-open body to the toggle; the rescan
    // after the PUT sees the updated note.
    Mock::given(method("GET"))
        .and(path("/notes/n1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(note_json(
            "n1",
            "f1",
            "List",
            "- [ ] Buy milk @home",
        )))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/notes/n1"))
        .and(body_json(serde_json::json!({ "body": "- [x] Buy milk @home" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "n1",
            "body": "- [x] Buy milk @home"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/notes/n1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(note_json(
            "n1",
            "f1",
            "List",
            "- [x] Buy milk @home",
        )))
        .mount(&server)
        .await;

    let mut panel = panel(&server);
    let PanelReply::Summary(summary) = panel.handle(PanelRequest::GetSummary).await else {
        panic!("expected a summary reply");
    };
    let todo = summary.by_note["n1"][0].clone();
    assert!(!todo.completed);

    let reply = panel.handle(PanelRequest::MarkDone(todo)).await;

    let PanelReply::UpdateSummary(updated) = reply else {
        panic!("expected an updated summary");
    };
    assert!(updated.by_note["n1"][0].completed);
}
