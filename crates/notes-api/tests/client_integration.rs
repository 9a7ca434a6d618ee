//! Integration tests for the notes API client.
//!
//! These tests use wiremock to mock the data API service.

use notes_api_rs::client::NotesClient;
use notes_api_rs::error::{ApiError, Error};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Test: search sends query, fields, page and token parameters
#[tokio::test]
async fn test_search_page_sends_expected_parameters() {
    let mock_server = MockServer::start().await;

    let response_json = serde_json::json!({
        "items": [
            {
                "id": "note-1",
                "parent_id": "folder-1",
                "title": "Groceries",
                "body": "- [ ] Buy milk @home",
                "is_conflict": 0
            },
            {
                "id": "note-2",
                "parent_id": "folder-1",
                "title": "Chores",
                "body": "- [x] Mow lawn @home",
                "is_conflict": 1
            }
        ],
        "has_more": true
    });

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("query", "/\"- [ ]\""))
        .and(query_param("fields", "id,parent_id,title,body,is_conflict"))
        .and(query_param("page", "3"))
        .and(query_param("token", "test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(response_json))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = NotesClient::with_base_url("test-token", mock_server.uri());
    let page = client.search_page("/\"- [ ]\"", 3).await.unwrap();

    assert!(page.has_more);
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].title, "Groceries");
    assert!(!page.items[0].is_conflict);
    assert!(page.items[1].is_conflict);
}

/// Test: a page without has_more deserializes as the last page
#[tokio::test]
async fn test_search_page_missing_has_more_is_last_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "items": [] })),
        )
        .mount(&mock_server)
        .await;

    let client = NotesClient::with_base_url("test-token", mock_server.uri());
    let page = client.search_page("anything", 1).await.unwrap();

    assert!(page.items.is_empty());
    assert!(!page.has_more);
}

/// Test: folder lookup returns the folder title
#[tokio::test]
async fn test_folder_lookup() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/folders/folder-42"))
        .and(query_param("fields", "id,title"))
        .and(query_param("token", "test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "folder-42",
            "title": "Projects"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = NotesClient::with_base_url("test-token", mock_server.uri());
    let folder = client.folder("folder-42").await.unwrap();

    assert_eq!(folder.title, "Projects");
}

/// Test: a missing folder maps to NotFound with the requested id
#[tokio::test]
async fn test_folder_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/folders/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let client = NotesClient::with_base_url("test-token", mock_server.uri());
    let err = client.folder("missing").await.unwrap_err();

    match err {
        Error::Api(ApiError::NotFound { resource, id }) => {
            assert_eq!(resource, "folder");
            assert_eq!(id, "missing");
        }
        other => panic!("expected NotFound, got {:?}", other),
    }
}

/// Test: 401 with a JSON error body maps to Auth with that message
#[tokio::test]
async fn test_auth_error_extracts_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(serde_json::json!({ "error": "Invalid token" })),
        )
        .mount(&mock_server)
        .await;

    let client = NotesClient::with_base_url("bad-token", mock_server.uri());
    let err = client.search_page("q", 1).await.unwrap_err();

    match err {
        Error::Api(ApiError::Auth { message }) => assert_eq!(message, "Invalid token"),
        other => panic!("expected Auth, got {:?}", other),
    }
}

/// Test: 429 with a retry-after header maps to RateLimit
#[tokio::test]
async fn test_rate_limit_reads_retry_after() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "17"))
        .mount(&mock_server)
        .await;

    let client = NotesClient::with_base_url("test-token", mock_server.uri());
    let err = client.search_page("q", 1).await.unwrap_err();

    match err {
        Error::Api(ApiError::RateLimit { retry_after }) => assert_eq!(retry_after, Some(17)),
        other => panic!("expected RateLimit, got {:?}", other),
    }
    assert!(matches!(
        client.search_page("q", 1).await.unwrap_err(),
        Error::Api(ref api) if api.is_retryable()
    ));
}

/// Test: updating a note body sends a PUT with the body as JSON
#[tokio::test]
async fn test_update_note_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/notes/note-7"))
        .and(query_param("token", "test-token"))
        .and(body_json(serde_json::json!({ "body": "- [x] Done @work" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "note-7",
            "body": "- [x] Done @work"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = NotesClient::with_base_url("test-token", mock_server.uri());
    client
        .update_note_body("note-7", "- [x] Done @work")
        .await
        .unwrap();
}

/// Test: updating a missing note maps to NotFound for that note
#[tokio::test]
async fn test_update_note_body_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/notes/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let client = NotesClient::with_base_url("test-token", mock_server.uri());
    let err = client.update_note_body("gone", "body").await.unwrap_err();

    match err {
        Error::Api(ApiError::NotFound { resource, id }) => {
            assert_eq!(resource, "note");
            assert_eq!(id, "gone");
        }
        other => panic!("expected NotFound, got {:?}", other),
    }
}

/// Test: fetching a single note requests the standard field set
#[tokio::test]
async fn test_note_fetch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/notes/note-3"))
        .and(query_param("fields", "id,parent_id,title,body,is_conflict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "note-3",
            "parent_id": "folder-1",
            "title": "Ideas",
            "body": "- [ ] Sketch the plan @work",
            "is_conflict": 0
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = NotesClient::with_base_url("test-token", mock_server.uri());
    let note = client.note("note-3").await.unwrap();

    assert_eq!(note.title, "Ideas");
    assert_eq!(note.parent_id, "folder-1");
}

/// Test: ping returns the service banner
#[tokio::test]
async fn test_ping() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(ResponseTemplate::new(200).set_body_string("NotesDataService"))
        .mount(&mock_server)
        .await;

    let client = NotesClient::with_base_url("test-token", mock_server.uri());
    let banner = client.ping().await.unwrap();

    assert_eq!(banner, "NotesDataService");
}
