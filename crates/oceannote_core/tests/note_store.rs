use oceannote_core::{ManualClock, Note, NoteId, NotePatch, NoteStore};
use std::collections::HashSet;

fn empty_store(start: i64) -> (NoteStore<ManualClock>, ManualClock) {
    let clock = ManualClock::new(start);
    (NoteStore::new(clock.clone()), clock)
}

fn ids(notes: &[Note]) -> Vec<NoteId> {
    notes.iter().map(|note| note.id.clone()).collect()
}

#[test]
fn empty_store_has_no_selection_and_shows_empty_state() {
    let (store, _) = empty_store(0);
    assert_eq!(store.note_count(), 0);
    assert!(store.filtered_notes().is_empty());
    assert!(store.selected_note().is_none());
    assert!(store.is_empty_state());
}

#[test]
fn create_selects_new_note_and_puts_it_first() {
    let (mut store, clock) = empty_store(1_000);
    let a = store.create();
    clock.advance(10);
    let b = store.create();

    assert_eq!(store.selected_note().unwrap().id, b.id);
    assert_eq!(ids(&store.filtered_notes()), vec![b.id.clone(), a.id.clone()]);
    assert_eq!(b.title, "Untitled note");
    assert!(b.content.is_empty());
    assert_eq!(b.updated_at, 1_010);
}

#[test]
fn create_on_frozen_clock_still_puts_new_note_first() {
    let (mut store, _) = empty_store(500);
    let a = store.create();
    let b = store.create();
    let c = store.create();

    assert_eq!(a.updated_at, b.updated_at);
    assert_eq!(ids(&store.filtered_notes()), vec![c.id, b.id, a.id]);
}

#[test]
fn query_filters_by_title_only_match() {
    let (mut store, clock) = empty_store(0);
    let a = store.create();
    store.update(&a.id, NotePatch::title("Grocery list"));
    clock.advance(1);
    let b = store.create();
    store.update(&b.id, NotePatch::title("Meeting notes").with_content("agenda"));

    store.set_query("GROC");
    assert_eq!(ids(&store.filtered_notes()), vec![a.id.clone()]);

    store.set_query("agenda");
    assert_eq!(ids(&store.filtered_notes()), vec![b.id.clone()]);

    store.set_query("");
    assert_eq!(store.filtered_notes().len(), 2);
}

#[test]
fn filtered_notes_preserve_recency_order() {
    let (mut store, clock) = empty_store(0);
    let mut created = Vec::new();
    for idx in 0..5 {
        clock.advance(1);
        let note = store.create();
        let content = if idx % 2 == 0 { "match me" } else { "skip" };
        store.update(&note.id, NotePatch::content(content));
        created.push(note.id);
    }

    // Touch the oldest matching note so it jumps to the head.
    clock.advance(1);
    store.update(&created[0], NotePatch::title("bumped"));

    let all = store.filtered_notes();
    store.set_query("MATCH");
    let filtered = store.filtered_notes();

    let expected: Vec<NoteId> = all
        .iter()
        .filter(|note| note.content.contains("match"))
        .map(|note| note.id.clone())
        .collect();
    assert_eq!(ids(&filtered), expected);
    assert_eq!(filtered[0].id, created[0]);
}

#[test]
fn update_refreshes_updated_at_and_resorts() {
    let (mut store, clock) = empty_store(100);
    let a = store.create();
    clock.advance(5);
    let b = store.create();
    clock.advance(5);

    let updated = store
        .update(&a.id, NotePatch::content("hello"))
        .expect("note exists");
    assert_eq!(updated.updated_at, 110);
    assert_eq!(updated.title, "Untitled note");
    assert_eq!(ids(&store.filtered_notes()), vec![a.id, b.id]);
}

#[test]
fn update_of_unknown_id_leaves_collection_unchanged() {
    let (mut store, clock) = empty_store(0);
    store.create();
    clock.advance(1);
    store.create();

    let before = store.snapshot();
    clock.advance(1);
    let result = store.update(&NoteId::from("stale"), NotePatch::title("x"));
    assert!(result.is_none());
    assert_eq!(store.snapshot(), before);
    assert_eq!(store.recency_ordered(), before.recency_ordered());
}

#[test]
fn updated_at_never_decreases_when_clock_goes_backwards() {
    let (mut store, clock) = empty_store(10_000);
    let note = store.create();
    clock.set(5_000);
    let updated = store.update(&note.id, NotePatch::title("later")).unwrap();
    assert!(updated.updated_at >= note.updated_at);
}

#[test]
fn deleting_selected_note_selects_new_head() {
    let (mut store, clock) = empty_store(0);
    let a = store.create();
    clock.advance(1);
    let b = store.create();
    clock.advance(1);
    let c = store.create();

    assert!(store.delete(&c.id));
    assert_eq!(store.selected_id(), Some(&b.id));

    assert!(store.delete(&b.id));
    assert_eq!(store.selected_id(), Some(&a.id));

    assert!(store.delete(&a.id));
    assert_eq!(store.selected_id(), None);
    assert!(store.is_empty_state());
}

#[test]
fn deleting_other_note_keeps_selection() {
    let (mut store, clock) = empty_store(0);
    let a = store.create();
    clock.advance(1);
    let b = store.create();

    assert!(store.delete(&a.id));
    assert_eq!(store.selected_id(), Some(&b.id));
}

#[test]
fn deleting_unknown_id_is_a_no_op() {
    let (mut store, _) = empty_store(0);
    let a = store.create();
    let before = store.snapshot();
    assert!(!store.delete(&NoteId::from("missing")));
    assert_eq!(store.snapshot(), before);
    assert_eq!(store.selected_id(), Some(&a.id));
}

#[test]
fn selecting_unknown_id_resolves_to_no_note() {
    let (mut store, _) = empty_store(0);
    store.create();
    store.select(Some(NoteId::from("ghost")));
    assert_eq!(store.selected_id(), Some(&NoteId::from("ghost")));
    assert!(store.selected_note().is_none());
    assert!(store.is_empty_state());

    store.select(None);
    assert!(store.is_empty_state());
}

#[test]
fn ids_stay_unique_across_mixed_operations() {
    let (mut store, clock) = empty_store(0);
    let mut live = Vec::new();
    for step in 0..200_u32 {
        match step % 5 {
            0 | 1 | 2 => live.push(store.create().id),
            3 => {
                if let Some(id) = live.first().cloned() {
                    store.update(&id, NotePatch::content(format!("step {step}")));
                }
            }
            _ => {
                if let Some(id) = live.pop() {
                    store.delete(&id);
                }
            }
        }
        if step % 7 == 0 {
            clock.advance(1);
        }

        let all = store.filtered_notes();
        let unique: HashSet<_> = all.iter().map(|note| note.id.clone()).collect();
        assert_eq!(unique.len(), all.len());
        assert_eq!(all.len(), live.len());
    }
}

#[test]
fn empty_query_view_is_sorted_descending() {
    let (mut store, clock) = empty_store(0);
    for offset in [5, -3, 7, 0, 2] {
        clock.advance(offset);
        let note = store.create();
        store.update(&note.id, NotePatch::content("x"));
    }
    let stamps: Vec<i64> = store
        .filtered_notes()
        .iter()
        .map(|note| note.updated_at)
        .collect();
    let mut sorted = stamps.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(stamps, sorted);
}
