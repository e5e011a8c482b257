//! Derived views over the note collection.
//!
//! Pure functions only: nothing here stores an ordering.

use crate::model::note::Note;

/// Returns notes ordered by `updated_at` descending.
///
/// `sort_by` is stable, so equal timestamps keep their collection order.
pub fn recency_order(notes: &[Note]) -> Vec<Note> {
    let mut ordered = notes.to_vec();
    ordered.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    ordered
}

/// Recency-ordered notes whose title or content contains `query`,
/// ignoring case. An empty query keeps every note.
pub fn filter_notes(notes: &[Note], query: &str) -> Vec<Note> {
    let ordered = recency_order(notes);
    if query.is_empty() {
        return ordered;
    }
    let needle = query.to_lowercase();
    ordered
        .into_iter()
        .filter(|note| note.matches(&needle))
        .collect()
}
