//! Blob sink contract and non-database implementations.
//!
//! # Responsibility
//! - Define the `read / write` contract the coordinator depends on.
//! - Provide in-memory and single-file sinks.
//!
//! # Invariants
//! - `read` returns `Ok(None)` for a blob that was never written.
//! - `FileBlobSink::write` replaces the file via rename, so readers never
//!   observe a half-written blob.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub type SinkResult<T> = Result<T, SinkError>;

/// Blob sink transport failure.
#[derive(Debug)]
pub enum SinkError {
    Io(std::io::Error),
    Db(DbError),
    /// Sink refused the operation (e.g. simulated outage).
    Unavailable(String),
}

impl Display for SinkError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "blob io failed: {err}"),
            Self::Db(err) => write!(f, "blob db failed: {err}"),
            Self::Unavailable(message) => write!(f, "blob sink unavailable: {message}"),
        }
    }
}

impl Error for SinkError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Unavailable(_) => None,
        }
    }
}

impl From<std::io::Error> for SinkError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<DbError> for SinkError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for SinkError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Durable storage for one serialized note collection.
pub trait BlobSink {
    /// Reads the stored blob, `None` when nothing was stored yet.
    fn read(&self) -> SinkResult<Option<String>>;
    /// Replaces the stored blob.
    fn write(&self, blob: &str) -> SinkResult<()>;
}

impl<S: BlobSink + ?Sized> BlobSink for Box<S> {
    fn read(&self) -> SinkResult<Option<String>> {
        (**self).read()
    }

    fn write(&self, blob: &str) -> SinkResult<()> {
        (**self).write(blob)
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    blob: Option<String>,
    writes: Vec<String>,
    fail_reads: bool,
    fail_writes: bool,
}

/// In-process sink. Clones share the same storage, so a test can keep a
/// handle while the coordinator owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobSink {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryBlobSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink pre-loaded with an arbitrary blob (valid or not).
    pub fn with_blob(blob: impl Into<String>) -> Self {
        let sink = Self::new();
        sink.lock().blob = Some(blob.into());
        sink
    }

    /// Currently stored blob.
    pub fn current_blob(&self) -> Option<String> {
        self.lock().blob.clone()
    }

    /// Every successful write, oldest first.
    pub fn writes(&self) -> Vec<String> {
        self.lock().writes.clone()
    }

    pub fn write_count(&self) -> usize {
        self.lock().writes.len()
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.lock().fail_reads = fail;
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        // State stays consistent even if a holder panicked mid-test.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl BlobSink for MemoryBlobSink {
    fn read(&self) -> SinkResult<Option<String>> {
        let state = self.lock();
        if state.fail_reads {
            return Err(SinkError::Unavailable("reads disabled".to_string()));
        }
        Ok(state.blob.clone())
    }

    fn write(&self, blob: &str) -> SinkResult<()> {
        let mut state = self.lock();
        if state.fail_writes {
            return Err(SinkError::Unavailable("writes disabled".to_string()));
        }
        state.blob = Some(blob.to_string());
        state.writes.push(blob.to_string());
        Ok(())
    }
}

/// Sink storing the blob in one file.
#[derive(Debug, Clone)]
pub struct FileBlobSink {
    path: PathBuf,
}

impl FileBlobSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Sink at `<dir>/<storage_key>.json`.
    pub fn in_dir(dir: impl AsRef<Path>, storage_key: &str) -> Self {
        Self::new(dir.as_ref().join(format!("{storage_key}.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|value| value.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl BlobSink for FileBlobSink {
    fn read(&self) -> SinkResult<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(blob) => Ok(Some(blob)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write(&self, blob: &str) -> SinkResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let temp = self.temp_path();
        fs::write(&temp, blob)?;
        fs::rename(&temp, &self.path)?;
        Ok(())
    }
}
