//! Core domain logic for Ocean Notes.
//! This crate owns the note collection, its invariants and autosave policy.

pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod persist;
pub mod service;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, NotesConfig, DEFAULT_STORAGE_KEY};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::note::{Note, NoteId, NotePatch, DEFAULT_TITLE};
pub use persist::codec::{decode_notes, encode_notes, CodecError};
pub use persist::coordinator::{
    PersistStats, PersistenceCoordinator, WriteOutcome, DEFAULT_DEBOUNCE,
};
pub use persist::scheduler::{ClockScheduler, Scheduler};
pub use persist::sink::{BlobSink, FileBlobSink, MemoryBlobSink, SinkError, SinkResult};
pub use persist::sqlite_sink::SqliteBlobSink;
pub use service::note_session::{NoteRow, NoteSession};
pub use store::note_store::{NoteStore, NotesSnapshot};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
