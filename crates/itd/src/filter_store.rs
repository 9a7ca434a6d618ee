//! Filter library storage with XDG path support.
//!
//! Saved filters, the active filter and the completion ledger persist
//! as JSON at `~/.local/share/itd/filters.json`, keyed by view so the
//! CLI and any embedded panel can keep separate state in one file.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use directories::ProjectDirs;
use thiserror::Error;
use tracing::warn;

use todo_summary_rs::filter::FilterLibrary;
use todo_summary_rs::panel::FilterStorage;

/// Default store filename.
const STORE_FILENAME: &str = "filters.json";

/// Application qualifier (for XDG paths).
const QUALIFIER: &str = "";

/// Application organization (for XDG paths).
const ORGANIZATION: &str = "";

/// Application name (for XDG paths).
const APPLICATION: &str = "itd";

/// View id the CLI stores its own library under.
pub const DEFAULT_VIEW: &str = "cli";

/// Errors that can occur during filter store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to determine the XDG data directory.
    #[error("failed to determine data directory: no valid home directory found")]
    NoDataDir,

    /// I/O error during file read.
    #[error("failed to read filter store '{path}': {source}")]
    ReadError {
        /// The path that failed to read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// I/O error during file write.
    #[error("failed to write filter store '{path}': {source}")]
    WriteError {
        /// The path that failed to write.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// I/O error during directory creation.
    #[error("failed to create data directory '{path}': {source}")]
    CreateDirError {
        /// The directory path that failed to create.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for filter store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Persistent storage for filter libraries.
///
/// One JSON file holds the libraries of every view. The CLI uses the
/// [`DEFAULT_VIEW`] entry; the [`FilterStorage`] impl lets a panel
/// bridge share the same file under its own view id.
///
/// File operations are not atomic across views: two processes saving
/// different views at once can lose one write. In typical CLI usage a
/// single invocation owns the store for its lifetime.
#[derive(Debug, Clone)]
pub struct JsonFilterStore {
    /// Path to the store file.
    path: PathBuf,
}

impl JsonFilterStore {
    /// Creates a store at the default XDG data path.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NoDataDir` if the home directory cannot be
    /// determined.
    pub fn new() -> Result<Self> {
        let path = Self::default_path()?;
        Ok(Self { path })
    }

    /// Creates a store with a custom path.
    ///
    /// This is primarily useful for testing.
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Returns the default XDG data path for the store file.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NoDataDir` if the home directory cannot be
    /// determined.
    pub fn default_path() -> Result<PathBuf> {
        let project_dirs =
            ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION).ok_or(StoreError::NoDataDir)?;
        Ok(project_dirs.data_dir().join(STORE_FILENAME))
    }

    /// Returns the path to the store file.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Loads every view's library from disk.
    ///
    /// # Errors
    ///
    /// - Returns `StoreError::ReadError` if the file cannot be read,
    ///   including `ErrorKind::NotFound` when it does not exist yet.
    /// - Returns `StoreError::Json` if the file contains invalid JSON.
    pub fn load_all(&self) -> Result<HashMap<String, FilterLibrary>> {
        let contents = fs::read_to_string(&self.path).map_err(|e| StoreError::ReadError {
            path: self.path.clone(),
            source: e,
        })?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Loads every view's library, returning an empty map when the file
    /// does not exist yet.
    ///
    /// # Errors
    ///
    /// - Returns `StoreError::ReadError` for I/O errors other than "file
    ///   not found".
    /// - Returns `StoreError::Json` if the file contains invalid JSON.
    pub fn load_all_or_default(&self) -> Result<HashMap<String, FilterLibrary>> {
        match self.load_all() {
            Ok(libraries) => Ok(libraries),
            Err(StoreError::ReadError { ref source, .. })
                if source.kind() == io::ErrorKind::NotFound =>
            {
                Ok(HashMap::new())
            }
            Err(e) => Err(e),
        }
    }

    /// Saves every view's library to disk atomically.
    ///
    /// Creates the parent directory if it doesn't exist. Uses atomic
    /// write (tempfile + rename) to prevent corruption if the process
    /// crashes mid-write.
    ///
    /// # Errors
    ///
    /// - Returns `StoreError::CreateDirError` if the directory cannot be
    ///   created.
    /// - Returns `StoreError::WriteError` if the file cannot be written.
    /// - Returns `StoreError::Json` if serialization fails.
    pub fn save_all(&self, libraries: &HashMap<String, FilterLibrary>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::CreateDirError {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let json = serde_json::to_string_pretty(libraries)?;

        let temp_path = self.path.with_extension("tmp");
        fs::write(&temp_path, &json).map_err(|e| StoreError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;
        fs::rename(&temp_path, &self.path).map_err(|e| StoreError::WriteError {
            path: self.path.clone(),
            source: e,
        })?;

        Ok(())
    }

    /// Loads one view's library, defaulting when the view has none yet.
    ///
    /// # Errors
    ///
    /// Same as [`load_all_or_default`](Self::load_all_or_default).
    pub fn library(&self, view_id: &str) -> Result<FilterLibrary> {
        let mut libraries = self.load_all_or_default()?;
        Ok(libraries.remove(view_id).unwrap_or_default())
    }

    /// Replaces one view's library and saves the whole store.
    ///
    /// # Errors
    ///
    /// Same as [`load_all_or_default`](Self::load_all_or_default) and
    /// [`save_all`](Self::save_all).
    pub fn store_library(&self, view_id: &str, library: &FilterLibrary) -> Result<()> {
        let mut libraries = self.load_all_or_default()?;
        libraries.insert(view_id.to_string(), library.clone());
        self.save_all(&libraries)
    }

    /// Returns true if the store file exists on disk.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

/// Panel-facing storage. Load distinguishes "no state yet" from an
/// existing library; save degrades to a warning since the panel cannot
/// surface a persistence failure mid-message.
impl FilterStorage for JsonFilterStore {
    fn load(&self, view_id: &str) -> Option<FilterLibrary> {
        match self.load_all_or_default() {
            Ok(mut libraries) => libraries.remove(view_id),
            Err(err) => {
                warn!("failed to load filters for view {view_id}: {err}");
                None
            }
        }
    }

    fn save(&mut self, view_id: &str, library: &FilterLibrary) {
        if let Err(err) = self.store_library(view_id, library) {
            warn!("failed to persist filters for view {view_id}: {err}");
        }
    }
}
