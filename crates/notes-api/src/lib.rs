//! Client library for the local notes data API.
//!
//! The data API is the HTTP service a notes application exposes on
//! localhost. It offers paginated full-text search over notes, folder
//! lookup, and note updates, all authorized by a token passed as a query
//! parameter.
//!
//! This crate provides an async client built on `reqwest`, typed models for
//! the subset of the API this workspace needs, and an error taxonomy that
//! distinguishes transport failures from API-level failures.
//!
//! # Example
//!
//! ```no_run
//! use notes_api_rs::client::NotesClient;
//!
//! # async fn run() -> Result<(), notes_api_rs::error::Error> {
//! let client = NotesClient::new("my-token");
//! let page = client.search_page("/\"- [ ]\"", 1).await?;
//! for note in &page.items {
//!     println!("{}: {}", note.id, note.title);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod models;

pub use client::NotesClient;
pub use error::{ApiError, Error, Result};
pub use models::{Folder, Note, SearchPage};
