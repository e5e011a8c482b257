//! Note session use-case service.
//!
//! # Responsibility
//! - Combine the note store with the persistence coordinator.
//! - Apply the write policy per command: create/delete flush immediately,
//!   title/content edits go through the debounce window.
//! - Expose the read-only view state consumed by the presentation layer.
//!
//! # Invariants
//! - `select`/`set_query` never trigger writes.
//! - Tolerated no-ops (unknown ids, edits without selection) never trigger
//!   writes.
//! - Closing or dropping a session writes only when a mutation has not
//!   reached the sink yet; read-only sessions leave the stored blob alone.

use crate::clock::{Clock, SystemClock};
use crate::config::NotesConfig;
use crate::model::note::{Note, NoteId, NotePatch};
use crate::persist::coordinator::{PersistenceCoordinator, WriteOutcome};
use crate::persist::scheduler::{ClockScheduler, Scheduler};
use crate::persist::sink::BlobSink;
use crate::store::note_store::{NoteStore, NotesSnapshot};
use log::{info, warn};
use std::time::Duration;

/// One list row as the sidebar renders it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteRow {
    pub id: NoteId,
    pub title: String,
    pub preview: String,
    pub selected: bool,
}

/// Interactive note session: authoritative state plus autosave.
pub struct NoteSession<C: Clock, S: BlobSink, T: Scheduler> {
    store: NoteStore<C>,
    persistence: PersistenceCoordinator<S, T>,
    config: NotesConfig,
    // Set by mutations, cleared once a write lands.
    unsaved: bool,
}

impl<S: BlobSink> NoteSession<SystemClock, S, ClockScheduler<SystemClock>> {
    /// Opens a session on the wall clock.
    pub fn open(sink: S, config: NotesConfig) -> Self {
        Self::open_with(SystemClock, sink, ClockScheduler::new(SystemClock), config)
    }
}

impl<C: Clock, S: BlobSink, T: Scheduler> NoteSession<C, S, T> {
    /// Opens a session with explicit time source and scheduler.
    ///
    /// Loads the persisted collection once; the recency head starts selected.
    pub fn open_with(clock: C, sink: S, scheduler: T, config: NotesConfig) -> Self {
        let persistence = PersistenceCoordinator::new(sink, scheduler, config.debounce());
        let store = NoteStore::with_notes(clock, persistence.load_initial());
        info!(
            "event=session_open module=service status=ok count={} debounce_ms={}",
            store.note_count(),
            config.debounce_ms
        );
        Self {
            store,
            persistence,
            config,
            unsaved: false,
        }
    }

    /// Creates and selects a new note, then writes eagerly.
    pub fn create_note(&mut self) -> Note {
        let note = self.store.create();
        self.unsaved = true;
        self.flush();
        note
    }

    /// Deletes a note; writes eagerly when something was removed.
    ///
    /// Confirmation is expected to happen in the view before calling this.
    pub fn delete_note(&mut self, id: &NoteId) -> bool {
        let removed = self.store.delete(id);
        if removed {
            self.unsaved = true;
            self.flush();
        }
        removed
    }

    /// Deletes the selected note, if any.
    pub fn delete_selected(&mut self) -> bool {
        match self.store.selected_note() {
            Some(note) => self.delete_note(&note.id),
            None => false,
        }
    }

    /// Edits a note and restarts the autosave window.
    pub fn update_note(&mut self, id: &NoteId, patch: NotePatch) -> Option<Note> {
        let updated = self.store.update(id, patch)?;
        self.unsaved = true;
        self.persistence.notify_mutated();
        Some(updated)
    }

    /// Replaces the selected note's title. No-op without a selection.
    pub fn edit_selected_title(&mut self, title: impl Into<String>) -> Option<Note> {
        let id = self.store.selected_note()?.id;
        self.update_note(&id, NotePatch::title(title))
    }

    /// Replaces the selected note's content. No-op without a selection.
    pub fn edit_selected_content(&mut self, content: impl Into<String>) -> Option<Note> {
        let id = self.store.selected_note()?.id;
        self.update_note(&id, NotePatch::content(content))
    }

    pub fn select(&mut self, id: Option<NoteId>) {
        self.store.select(id);
    }

    pub fn select_next(&mut self) -> Option<Note> {
        self.store.select_next()
    }

    pub fn select_previous(&mut self) -> Option<Note> {
        self.store.select_previous()
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.store.set_query(query);
    }

    pub fn query(&self) -> &str {
        self.store.query()
    }

    pub fn filtered_notes(&self) -> Vec<Note> {
        self.store.filtered_notes()
    }

    pub fn selected_note(&self) -> Option<Note> {
        self.store.selected_note()
    }

    /// True when the editor should show its placeholder.
    pub fn is_empty_state(&self) -> bool {
        self.store.is_empty_state()
    }

    pub fn can_delete(&self) -> bool {
        !self.store.is_empty_state()
    }

    pub fn note_count(&self) -> usize {
        self.store.note_count()
    }

    /// Number of notes visible under the active query.
    pub fn filtered_count(&self) -> usize {
        self.store.filtered_notes().len()
    }

    /// Header badge text, e.g. `1 note` / `3 notes`.
    pub fn count_label(&self) -> String {
        let count = self.filtered_count();
        let suffix = if count == 1 { "" } else { "s" };
        format!("{count} note{suffix}")
    }

    /// Sidebar rows for the filtered list.
    pub fn rows(&self) -> Vec<NoteRow> {
        let selected = self.store.selected_id();
        self.store
            .filtered_notes()
            .into_iter()
            .map(|note| NoteRow {
                selected: selected == Some(&note.id),
                title: note.title_preview(self.config.title_preview_chars),
                preview: note.preview(self.config.preview_chars),
                id: note.id,
            })
            .collect()
    }

    pub fn snapshot(&self) -> NotesSnapshot {
        self.store.snapshot()
    }

    /// Explicit save command.
    pub fn save(&mut self) -> WriteOutcome {
        self.flush()
    }

    /// Runs a due debounced write. Call from the host event loop.
    pub fn tick(&mut self) -> Option<WriteOutcome> {
        if !self.persistence.is_pending() {
            return None;
        }
        let notes = self.store.recency_ordered();
        let outcome = self.persistence.poll(&notes)?;
        self.unsaved = !outcome.is_written();
        Some(outcome)
    }

    /// How long the host may wait before the next `tick` matters.
    pub fn time_until_due(&self) -> Option<Duration> {
        self.persistence.time_until_due()
    }

    pub fn has_pending_write(&self) -> bool {
        self.persistence.is_pending()
    }

    /// True while a mutation has not been written to the sink.
    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved
    }

    /// Tears the session down, flushing unsaved changes.
    ///
    /// Returns `None` when there was nothing to write.
    pub fn close(mut self) -> Option<WriteOutcome> {
        if !self.unsaved {
            self.persistence.cancel_pending();
            info!(
                "event=session_close module=service status=ok count={} written=skip",
                self.store.note_count()
            );
            return None;
        }
        let outcome = self.flush();
        info!(
            "event=session_close module=service status=ok count={} written={}",
            self.store.note_count(),
            outcome.is_written()
        );
        Some(outcome)
    }

    pub fn store(&self) -> &NoteStore<C> {
        &self.store
    }

    pub fn persistence(&self) -> &PersistenceCoordinator<S, T> {
        &self.persistence
    }

    pub fn config(&self) -> &NotesConfig {
        &self.config
    }

    fn flush(&mut self) -> WriteOutcome {
        let notes = self.store.recency_ordered();
        let outcome = self.persistence.flush_now(&notes);
        self.unsaved = !outcome.is_written();
        outcome
    }
}

impl<C: Clock, S: BlobSink, T: Scheduler> Drop for NoteSession<C, S, T> {
    fn drop(&mut self) {
        if self.unsaved {
            let outcome = self.flush();
            if !outcome.is_written() {
                warn!(
                    "event=session_drop module=service status=error error_code=final_flush_failed"
                );
            }
        }
    }
}
