//! HTTP client for the notes data API.

use std::fmt;

use serde::de::DeserializeOwned;

use crate::error::{ApiError, Error, Result};
use crate::models::{Folder, Note, SearchPage};

/// Default address of the local data API service.
const BASE_URL: &str = "http://127.0.0.1:41184";

/// Note fields requested from every note-returning endpoint.
const NOTE_FIELDS: &str = "id,parent_id,title,body,is_conflict";

/// Client for the notes data API.
///
/// The API authorizes every request with a token query parameter; the token
/// is configured once on the client.
#[derive(Clone)]
pub struct NotesClient {
    token: String,
    http_client: reqwest::Client,
    base_url: String,
}

impl NotesClient {
    /// Creates a client against the default local service address.
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_base_url(token, BASE_URL)
    }

    /// Creates a client against a custom base URL (non-default port, tests).
    pub fn with_base_url(token: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            http_client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Returns the API token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches one page of full-text search results over notes.
    ///
    /// Pages are 1-based; `has_more` on the returned page signals whether a
    /// further page exists.
    ///
    /// # Errors
    /// Returns an error if the request fails or the service rejects it.
    pub async fn search_page(&self, query: &str, page: u32) -> Result<SearchPage> {
        let page = page.to_string();
        self.get_json(
            "/search",
            &[("query", query), ("fields", NOTE_FIELDS), ("page", &page)],
        )
        .await
    }

    /// Fetches a single note.
    ///
    /// # Errors
    /// Returns `ApiError::NotFound` if the note does not exist.
    pub async fn note(&self, id: &str) -> Result<Note> {
        self.get_json(&format!("/notes/{}", id), &[("fields", NOTE_FIELDS)])
            .await
            .map_err(|err| not_found_as(err, "note", id))
    }

    /// Fetches a single folder (notebook).
    ///
    /// # Errors
    /// Returns `ApiError::NotFound` if the folder does not exist.
    pub async fn folder(&self, id: &str) -> Result<Folder> {
        self.get_json(&format!("/folders/{}", id), &[("fields", "id,title")])
            .await
            .map_err(|err| not_found_as(err, "folder", id))
    }

    /// Replaces the body of a note.
    ///
    /// # Errors
    /// Returns `ApiError::NotFound` if the note does not exist.
    pub async fn update_note_body(&self, id: &str, body: &str) -> Result<()> {
        let url = format!("{}/notes/{}", self.base_url, id);

        let response = self
            .http_client
            .put(&url)
            .query(&[("token", self.token.as_str())])
            .json(&serde_json::json!({ "body": body }))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        Err(not_found_as(
            self.parse_error_response(response).await,
            "note",
            id,
        ))
    }

    /// Checks that the service is reachable, returning its banner string.
    pub async fn ping(&self) -> Result<String> {
        let url = format!("{}/ping", self.base_url);

        let response = self.http_client.get(&url).send().await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response.text().await?);
        }

        Err(self.parse_error_response(response).await)
    }

    /// Performs a GET request and deserializes the JSON response.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .http_client
            .get(&url)
            .query(params)
            .query(&[("token", self.token.as_str())])
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Handles the HTTP response, converting it to our error types.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if status.is_success() {
            let body = response.json::<T>().await?;
            return Ok(body);
        }

        Err(self.parse_error_response(response).await)
    }

    /// Parses an error response into our error types.
    async fn parse_error_response(&self, response: reqwest::Response) -> Error {
        let status = response.status();
        let status_code = status.as_u16();

        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());

        // The service wraps error text as {"error": "..."}
        let body = response.text().await.unwrap_or_default();
        let message = error_message(&body).unwrap_or_else(|| {
            if body.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string()
            } else {
                body
            }
        });

        let api_error = match status_code {
            401 | 403 => ApiError::Auth { message },
            404 => ApiError::NotFound {
                resource: "resource".to_string(),
                id: "unknown".to_string(),
            },
            429 => ApiError::RateLimit { retry_after },
            _ => ApiError::Http {
                status: status_code,
                message,
            },
        };

        Error::Api(api_error)
    }
}

impl fmt::Debug for NotesClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotesClient")
            .field("token", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Rewrites a generic not-found error with the resource actually requested.
fn not_found_as(err: Error, resource: &str, id: &str) -> Error {
    match err {
        Error::Api(ApiError::NotFound { .. }) => Error::Api(ApiError::NotFound {
            resource: resource.to_string(),
            id: id.to_string(),
        }),
        other => other,
    }
}

/// Extracts the message from an {"error": "..."} body, if that is its shape.
fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value.get("error")?.as_str().map(|s| s.to_string())
}
