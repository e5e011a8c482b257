//! Debounced persistence of the note collection.
//!
//! # Responsibility
//! - Load the persisted collection once at startup, degrading to empty.
//! - Coalesce edit notifications into one trailing write per quiet period.
//! - Write immediately on explicit flush.
//!
//! # Invariants
//! - At most one scheduled write exists; every `notify_mutated` restarts it.
//! - `flush_now` leaves nothing pending.
//! - Neither load nor write failures escape to the caller; they are logged
//!   and reported through `WriteOutcome`/`PersistStats`.

use crate::model::note::Note;
use crate::persist::codec::{decode_notes, encode_notes};
use crate::persist::scheduler::Scheduler;
use crate::persist::sink::BlobSink;
use log::{debug, info, warn};
use std::time::Duration;

/// Default quiet period before a debounced write fires.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Why a write ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriteTrigger {
    Debounced,
    Flush,
}

impl WriteTrigger {
    fn as_str(self) -> &'static str {
        match self {
            Self::Debounced => "debounced",
            Self::Flush => "flush",
        }
    }
}

/// Result of one best-effort write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written { note_count: usize, bytes: usize },
    EncodeFailed,
    SinkFailed,
}

impl WriteOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, Self::Written { .. })
    }
}

/// Running write counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PersistStats {
    pub writes_ok: u64,
    pub writes_failed: u64,
}

/// Bridges the note store to a blob sink with a trailing debounce.
pub struct PersistenceCoordinator<S: BlobSink, T: Scheduler> {
    sink: S,
    scheduler: T,
    debounce: Duration,
    stats: PersistStats,
}

impl<S: BlobSink, T: Scheduler> PersistenceCoordinator<S, T> {
    pub fn new(sink: S, scheduler: T, debounce: Duration) -> Self {
        Self {
            sink,
            scheduler,
            debounce,
            stats: PersistStats::default(),
        }
    }

    /// Reads and decodes the persisted collection.
    ///
    /// Absent, blank, unreadable or malformed blobs all yield an empty list.
    pub fn load_initial(&self) -> Vec<Note> {
        let blob = match self.sink.read() {
            Ok(Some(blob)) if !blob.trim().is_empty() => blob,
            Ok(_) => {
                info!("event=notes_load module=persist status=ok source=absent count=0");
                return Vec::new();
            }
            Err(err) => {
                warn!(
                    "event=notes_load module=persist status=error error_code=sink_read_failed error={}",
                    err
                );
                return Vec::new();
            }
        };

        match decode_notes(&blob) {
            Ok(notes) => {
                info!(
                    "event=notes_load module=persist status=ok source=blob count={}",
                    notes.len()
                );
                notes
            }
            Err(err) => {
                warn!(
                    "event=notes_load module=persist status=error error_code=blob_decode_failed bytes={} error={}",
                    blob.len(),
                    err
                );
                Vec::new()
            }
        }
    }

    /// Restarts the debounce window after an edit.
    pub fn notify_mutated(&mut self) {
        let restarted = self.scheduler.is_pending();
        self.scheduler.schedule(self.debounce);
        debug!(
            "event=write_schedule module=persist status=ok restarted={} debounce_ms={}",
            restarted,
            self.debounce.as_millis()
        );
    }

    /// Writes `notes` now and drops any scheduled write.
    pub fn flush_now(&mut self, notes: &[Note]) -> WriteOutcome {
        self.scheduler.cancel();
        self.write(notes, WriteTrigger::Flush)
    }

    /// Fires the scheduled write if its window has elapsed.
    ///
    /// `notes` must be the current collection; since every edit restarts the
    /// window, it is the state as of the last `notify_mutated`.
    pub fn poll(&mut self, notes: &[Note]) -> Option<WriteOutcome> {
        if self.scheduler.take_due() {
            Some(self.write(notes, WriteTrigger::Debounced))
        } else {
            None
        }
    }

    /// Drops a scheduled write without performing it.
    pub fn cancel_pending(&mut self) -> bool {
        let cancelled = self.scheduler.cancel();
        if cancelled {
            debug!("event=write_cancel module=persist status=ok");
        }
        cancelled
    }

    pub fn is_pending(&self) -> bool {
        self.scheduler.is_pending()
    }

    pub fn time_until_due(&self) -> Option<Duration> {
        self.scheduler.remaining()
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    pub fn stats(&self) -> PersistStats {
        self.stats
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    fn write(&mut self, notes: &[Note], trigger: WriteTrigger) -> WriteOutcome {
        let blob = match encode_notes(notes) {
            Ok(blob) => blob,
            Err(err) => {
                self.stats.writes_failed += 1;
                warn!(
                    "event=notes_write module=persist status=error trigger={} error_code=encode_failed error={}",
                    trigger.as_str(),
                    err
                );
                return WriteOutcome::EncodeFailed;
            }
        };

        match self.sink.write(&blob) {
            Ok(()) => {
                self.stats.writes_ok += 1;
                debug!(
                    "event=notes_write module=persist status=ok trigger={} count={} bytes={}",
                    trigger.as_str(),
                    notes.len(),
                    blob.len()
                );
                WriteOutcome::Written {
                    note_count: notes.len(),
                    bytes: blob.len(),
                }
            }
            Err(err) => {
                self.stats.writes_failed += 1;
                warn!(
                    "event=notes_write module=persist status=error trigger={} error_code=sink_write_failed error={}",
                    trigger.as_str(),
                    err
                );
                WriteOutcome::SinkFailed
            }
        }
    }
}
