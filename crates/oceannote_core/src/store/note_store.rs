//! Authoritative in-memory note collection and session view state.
//!
//! # Responsibility
//! - Own every `Note` value and apply create/update/delete commands.
//! - Track the selection pointer and active search query.
//! - Answer derived view queries (`filtered_notes`, `selected_note`,
//!   `is_empty_state`).
//!
//! # Invariants
//! - Ids are unique across the collection at all times.
//! - Edits stamp the clock's `now`; `Note::apply` keeps `updated_at` from
//!   decreasing for any note.
//! - Creation stamps never go below the newest `updated_at` already in the
//!   collection, so a created note is always the recency head.
//! - Unknown ids on update/delete are tolerated as no-ops.
//! - Callers only ever see clones or `NotesSnapshot`s; held snapshots are not
//!   affected by later mutations.

use crate::clock::Clock;
use crate::model::note::{Note, NoteId, NotePatch};
use crate::store::query::{filter_notes, recency_order};
use log::{debug, warn};
use std::collections::HashSet;
use std::ops::Deref;
use std::sync::Arc;

/// Immutable view of the collection at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotesSnapshot(Arc<Vec<Note>>);

impl NotesSnapshot {
    /// Notes in recency order.
    pub fn recency_ordered(&self) -> Vec<Note> {
        recency_order(&self.0)
    }
}

impl Deref for NotesSnapshot {
    type Target = [Note];

    fn deref(&self) -> &Self::Target {
        self.0.as_slice()
    }
}

/// Note collection plus selection/search state.
pub struct NoteStore<C: Clock> {
    clock: C,
    // Collection order: newest creations first, edits keep their slot.
    notes: Arc<Vec<Note>>,
    selected_id: Option<NoteId>,
    query: String,
}

impl<C: Clock> NoteStore<C> {
    /// Creates an empty store.
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            notes: Arc::new(Vec::new()),
            selected_id: None,
            query: String::new(),
        }
    }

    /// Creates a store seeded with previously persisted notes.
    ///
    /// Duplicate ids keep their first occurrence. The recency head becomes
    /// the selected note.
    pub fn with_notes(clock: C, notes: Vec<Note>) -> Self {
        let loaded = notes.len();
        let mut seen = HashSet::with_capacity(loaded);
        let unique: Vec<Note> = notes
            .into_iter()
            .filter(|note| seen.insert(note.id.clone()))
            .collect();
        if unique.len() != loaded {
            warn!(
                "event=store_seed module=store status=dedup loaded={} kept={}",
                loaded,
                unique.len()
            );
        }

        let mut store = Self::new(clock);
        store.notes = Arc::new(unique);
        store.selected_id = store.head_id();
        store
    }

    /// Creates a note, makes it the recency head and selects it.
    pub fn create(&mut self) -> Note {
        let stamp = self.creation_stamp();
        let mut id = NoteId::generate(stamp);
        while self.position(&id).is_some() {
            id = NoteId::generate(stamp);
        }

        let note = Note::new(id, stamp);
        Arc::make_mut(&mut self.notes).insert(0, note.clone());
        self.selected_id = Some(note.id.clone());
        debug!(
            "event=note_create module=store status=ok note_id={} count={}",
            note.id,
            self.notes.len()
        );
        note
    }

    /// Removes a note. Returns `false` when `id` is unknown.
    ///
    /// Deleting the selected note moves selection to the new recency head,
    /// or clears it when the collection becomes empty.
    pub fn delete(&mut self, id: &NoteId) -> bool {
        let Some(index) = self.position(id) else {
            debug!("event=note_delete module=store status=skip reason=unknown_id note_id={id}");
            return false;
        };

        Arc::make_mut(&mut self.notes).remove(index);
        if self.selected_id.as_ref() == Some(id) {
            self.selected_id = self.head_id();
        }
        debug!(
            "event=note_delete module=store status=ok note_id={} count={}",
            id,
            self.notes.len()
        );
        true
    }

    /// Applies a partial edit and refreshes `updated_at`.
    ///
    /// Returns the updated note, or `None` (collection untouched) when `id`
    /// is unknown. Stale ids from the view layer are expected here.
    pub fn update(&mut self, id: &NoteId, patch: NotePatch) -> Option<Note> {
        let Some(index) = self.position(id) else {
            debug!("event=note_update module=store status=skip reason=unknown_id note_id={id}");
            return None;
        };

        let stamp = self.clock.now_millis();
        let notes = Arc::make_mut(&mut self.notes);
        let note = &mut notes[index];
        note.apply(patch, stamp);
        debug!(
            "event=note_update module=store status=ok note_id={} updated_at={}",
            note.id, note.updated_at
        );
        Some(note.clone())
    }

    /// Sets the selection pointer. Unknown ids are kept but resolve to no note.
    pub fn select(&mut self, id: Option<NoteId>) {
        self.selected_id = id;
    }

    /// Moves selection one entry down `filtered_notes`, clamped at the end.
    pub fn select_next(&mut self) -> Option<Note> {
        self.step_selection(1)
    }

    /// Moves selection one entry up `filtered_notes`, clamped at the start.
    pub fn select_previous(&mut self) -> Option<Note> {
        self.step_selection(-1)
    }

    /// Sets the active search string.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn query(&self) -> &str {
        self.query.as_str()
    }

    pub fn selected_id(&self) -> Option<&NoteId> {
        self.selected_id.as_ref()
    }

    /// Notes matching the active query, most recently updated first.
    pub fn filtered_notes(&self) -> Vec<Note> {
        filter_notes(&self.notes, &self.query)
    }

    /// Note designated by the selection pointer, if it still exists.
    pub fn selected_note(&self) -> Option<Note> {
        let id = self.selected_id.as_ref()?;
        self.get(id)
    }

    /// True when no note resolves from the selection pointer.
    pub fn is_empty_state(&self) -> bool {
        self.selected_note().is_none()
    }

    pub fn get(&self, id: &NoteId) -> Option<Note> {
        self.position(id).map(|index| self.notes[index].clone())
    }

    pub fn note_count(&self) -> usize {
        self.notes.len()
    }

    /// Whole collection in recency order, the shape that gets persisted.
    pub fn recency_ordered(&self) -> Vec<Note> {
        recency_order(&self.notes)
    }

    /// Cheap immutable view of the current collection.
    pub fn snapshot(&self) -> NotesSnapshot {
        NotesSnapshot(Arc::clone(&self.notes))
    }

    fn position(&self, id: &NoteId) -> Option<usize> {
        self.notes.iter().position(|note| &note.id == id)
    }

    fn head_id(&self) -> Option<NoteId> {
        self.notes
            .iter()
            .enumerate()
            // max_by_key keeps the last max; reverse index so the earliest slot wins ties.
            .max_by_key(|(index, note)| (note.updated_at, std::cmp::Reverse(*index)))
            .map(|(_, note)| note.id.clone())
    }

    fn creation_stamp(&self) -> i64 {
        let newest = self
            .notes
            .iter()
            .map(|note| note.updated_at)
            .max()
            .unwrap_or(i64::MIN);
        self.clock.now_millis().max(newest)
    }

    fn step_selection(&mut self, delta: isize) -> Option<Note> {
        let visible = self.filtered_notes();
        if visible.is_empty() {
            return None;
        }

        let current = self
            .selected_id
            .as_ref()
            .and_then(|id| visible.iter().position(|note| &note.id == id));
        let target = match current {
            Some(index) => index
                .saturating_add_signed(delta)
                .min(visible.len() - 1),
            None => 0,
        };

        let note = visible[target].clone();
        self.selected_id = Some(note.id.clone());
        Some(note)
    }
}
