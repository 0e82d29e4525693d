//! The persistent JSON store.
//!
//! The store is one JSON object on disk mapping a timestamp key to the flat
//! field mapping of a submission:
//!
//! ```text
//! {
//!   "2024-05-01 12:30:45.123456": { "email": "a@b.com", "name": "Alice" }
//! }
//! ```
//!
//! Every merge reads the whole document, inserts one entry and rewrites the
//! whole document. The rewrite goes through a sibling temporary file and a
//! rename, so readers never observe a partially written store.
//!
//! `FormStore` is deliberately not `Clone`: the ingest server takes it by
//! value and is its only writer.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tokio::io::AsyncWriteExt;

use crate::observability::metrics;
use crate::store::form::Submission;

/// Format of merge keys: local time with microsecond resolution.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Document held by the store.
pub type StoreRecord = Map<String, Value>;

/// Error type for store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read store {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write store {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("store {path} is not valid JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("store {0} does not hold a JSON object")]
    NotAnObject(PathBuf),
}

/// Owner of the on-disk store document.
#[derive(Debug)]
pub struct FormStore {
    path: PathBuf,
}

impl FormStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the store as an empty object if it does not exist yet.
    ///
    /// Returns `true` when a new file was written.
    pub async fn init(&self) -> Result<bool, StoreError> {
        let exists = tokio::fs::try_exists(&self.path)
            .await
            .map_err(|source| self.read_error(source))?;
        if exists {
            return Ok(false);
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| self.write_error(source))?;
        }

        self.save(&StoreRecord::new()).await?;
        tracing::info!(path = %self.path.display(), "Created empty store");
        Ok(true)
    }

    /// Read and parse the whole document.
    pub async fn load(&self) -> Result<StoreRecord, StoreError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|source| self.read_error(source))?;

        let value: Value = serde_json::from_slice(&bytes).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;

        match value {
            Value::Object(record) => Ok(record),
            _ => Err(StoreError::NotAnObject(self.path.clone())),
        }
    }

    /// Replace the document on disk with `record`.
    pub async fn save(&self, record: &StoreRecord) -> Result<(), StoreError> {
        // serde_json leaves non-ASCII text unescaped.
        let bytes = serde_json::to_vec_pretty(record).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;

        let temp_path = self.temp_path();
        let mut file = tokio::fs::File::create(&temp_path)
            .await
            .map_err(|source| self.write_error(source))?;
        file.write_all(&bytes)
            .await
            .map_err(|source| self.write_error(source))?;
        file.sync_all()
            .await
            .map_err(|source| self.write_error(source))?;
        drop(file);

        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|source| self.write_error(source))
    }

    /// Insert `submission` under a fresh timestamp key.
    ///
    /// Two merges within the same microsecond share a key and the later one
    /// replaces the earlier. On any error the document is left untouched.
    pub async fn merge(&mut self, submission: &Submission) -> Result<String, StoreError> {
        let key = timestamp_key();
        let fields: Map<String, Value> = submission
            .fields()
            .into_iter()
            .map(|(k, v)| (k, Value::String(v)))
            .collect();

        let mut record = self.load().await?;
        if record.insert(key.clone(), Value::Object(fields)).is_some() {
            tracing::warn!(key = %key, "Store key collision, previous entry replaced");
        }
        self.save(&record).await?;

        metrics::set_store_entries(record.len());
        Ok(key)
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn read_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Read {
            path: self.path.clone(),
            source,
        }
    }

    fn write_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Write {
            path: self.path.clone(),
            source,
        }
    }
}

/// Key for an entry merged right now.
pub fn timestamp_key() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}
