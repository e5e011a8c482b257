use oceannote_core::{
    decode_notes, encode_notes, ClockScheduler, FileBlobSink, ManualClock, MemoryBlobSink, Note,
    NoteId, NotePatch, NoteSession, NotesConfig, SqliteBlobSink, WriteOutcome,
};
use std::time::Duration;

type MemorySession = NoteSession<ManualClock, MemoryBlobSink, ClockScheduler<ManualClock>>;

fn open_memory(sink: &MemoryBlobSink, clock: &ManualClock) -> MemorySession {
    NoteSession::open_with(
        clock.clone(),
        sink.clone(),
        ClockScheduler::new(clock.clone()),
        NotesConfig::default(),
    )
}

fn persisted(sink: &MemoryBlobSink) -> Vec<Note> {
    decode_notes(&sink.current_blob().expect("blob written")).unwrap()
}

#[test]
fn first_load_from_empty_sink_is_empty() {
    let clock = ManualClock::new(0);
    let sink = MemoryBlobSink::new();
    let session = open_memory(&sink, &clock);

    assert_eq!(session.note_count(), 0);
    assert!(session.selected_note().is_none());
    assert!(session.is_empty_state());
    assert!(!session.can_delete());
    assert_eq!(sink.write_count(), 0);
}

#[test]
fn corrupt_blob_loads_as_empty_and_is_replaced_on_next_write() {
    let clock = ManualClock::new(0);
    let sink = MemoryBlobSink::with_blob(r#"{"notes": "not a list"}"#);
    let mut session = open_memory(&sink, &clock);
    assert_eq!(session.note_count(), 0);

    session.create_note();
    assert_eq!(persisted(&sink).len(), 1);
}

#[test]
fn read_only_session_leaves_undecodable_blob_untouched() {
    let clock = ManualClock::new(0);
    let blob = r#"[{"id":"a","content":"precious"}]"#;
    let sink = MemoryBlobSink::with_blob(blob);
    let mut session = open_memory(&sink, &clock);
    assert_eq!(session.note_count(), 0);

    session.set_query("precious");
    session.select(None);
    assert!(!session.has_unsaved_changes());
    assert!(session.close().is_none());

    assert_eq!(sink.write_count(), 0);
    assert_eq!(sink.current_blob().as_deref(), Some(blob));

    drop(open_memory(&sink, &clock));
    assert_eq!(sink.current_blob().as_deref(), Some(blob));
}

#[test]
fn null_title_record_loads_instead_of_emptying_collection() {
    let clock = ManualClock::new(0);
    let sink =
        MemoryBlobSink::with_blob(r#"[{"id":"a","title":null,"content":"precious","updatedAt":1}]"#);
    let session = open_memory(&sink, &clock);

    let note = session.selected_note().expect("record kept");
    assert_eq!(note.content, "precious");
    assert_eq!(note.display_title(), "Untitled note");
    assert!(session.close().is_none());
    assert_eq!(sink.write_count(), 0);
}

#[test]
fn create_and_delete_write_immediately() {
    let clock = ManualClock::new(0);
    let sink = MemoryBlobSink::new();
    let mut session = open_memory(&sink, &clock);

    let note = session.create_note();
    assert_eq!(sink.write_count(), 1);
    assert!(!session.has_pending_write());
    assert_eq!(persisted(&sink)[0].id, note.id);

    assert!(session.delete_note(&note.id));
    assert_eq!(sink.write_count(), 2);
    assert!(persisted(&sink).is_empty());

    assert!(!session.delete_note(&note.id));
    assert_eq!(sink.write_count(), 2);
}

#[test]
fn edits_are_debounced_and_coalesced() {
    let clock = ManualClock::new(0);
    let sink = MemoryBlobSink::new();
    let mut session = open_memory(&sink, &clock);
    session.create_note();
    let writes_after_create = sink.write_count();

    for len in 1..=10 {
        session.edit_selected_content("x".repeat(len));
        clock.advance(50);
        assert_eq!(session.tick(), None);
    }
    assert_eq!(sink.write_count(), writes_after_create);
    assert_eq!(session.time_until_due(), Some(Duration::from_millis(450)));

    clock.advance(449);
    assert_eq!(session.tick(), None);
    clock.advance(1);
    assert!(matches!(
        session.tick(),
        Some(WriteOutcome::Written { note_count: 1, .. })
    ));

    assert_eq!(sink.write_count(), writes_after_create + 1);
    assert_eq!(persisted(&sink)[0].content, "x".repeat(10));
    assert!(!session.has_pending_write());
    assert_eq!(session.tick(), None);
}

#[test]
fn save_flushes_pending_edit_and_cancels_timer() {
    let clock = ManualClock::new(0);
    let sink = MemoryBlobSink::new();
    let mut session = open_memory(&sink, &clock);
    session.create_note();
    session.edit_selected_title("draft");
    assert!(session.has_pending_write());

    assert!(session.save().is_written());
    assert!(!session.has_pending_write());
    assert_eq!(persisted(&sink)[0].title, "draft");

    let writes = sink.write_count();
    clock.advance(10_000);
    assert_eq!(session.tick(), None);
    assert_eq!(sink.write_count(), writes);
}

#[test]
fn select_and_query_do_not_write() {
    let clock = ManualClock::new(0);
    let sink = MemoryBlobSink::new();
    let mut session = open_memory(&sink, &clock);
    let note = session.create_note();
    let writes = sink.write_count();

    session.select(None);
    session.set_query("anything");
    session.select(Some(note.id));
    clock.advance(1_000);
    assert_eq!(session.tick(), None);
    assert_eq!(sink.write_count(), writes);
}

#[test]
fn edits_without_selection_or_on_unknown_ids_are_ignored() {
    let clock = ManualClock::new(0);
    let sink = MemoryBlobSink::new();
    let mut session = open_memory(&sink, &clock);
    session.create_note();
    session.select(None);

    assert!(session.edit_selected_title("nope").is_none());
    assert!(session
        .update_note(&NoteId::from("stale"), NotePatch::content("nope"))
        .is_none());
    assert!(!session.has_pending_write());
    assert!(!session.delete_selected());
}

#[test]
fn failed_write_is_swallowed_and_caught_up_later() {
    let clock = ManualClock::new(0);
    let sink = MemoryBlobSink::new();
    sink.set_fail_writes(true);
    let mut session = open_memory(&sink, &clock);

    let note = session.create_note();
    assert_eq!(session.note_count(), 1);
    assert_eq!(session.persistence().stats().writes_failed, 1);

    sink.set_fail_writes(false);
    session.edit_selected_content("recovered");
    clock.advance(500);
    assert!(session.tick().unwrap().is_written());

    let stored = persisted(&sink);
    assert_eq!(stored[0].id, note.id);
    assert_eq!(stored[0].content, "recovered");
}

#[test]
fn reopen_restores_collection_and_selects_head() {
    let clock = ManualClock::new(0);
    let sink = MemoryBlobSink::new();
    let (older, newer) = {
        let mut session = open_memory(&sink, &clock);
        let older = session.create_note();
        session.edit_selected_title("older");
        clock.advance(10);
        let newer = session.create_note();
        session.edit_selected_title("newer");
        session.close();
        (older, newer)
    };

    let session = open_memory(&sink, &clock);
    assert_eq!(session.note_count(), 2);
    assert_eq!(session.selected_note().unwrap().id, newer.id);
    let ids: Vec<_> = session.filtered_notes().into_iter().map(|n| n.id).collect();
    assert_eq!(ids, vec![newer.id, older.id]);
}

#[test]
fn delete_selected_falls_back_to_next_note() {
    let clock = ManualClock::new(0);
    let sink = MemoryBlobSink::new();
    let mut session = open_memory(&sink, &clock);
    let a = session.create_note();
    clock.advance(1);
    session.create_note();

    assert!(session.delete_selected());
    assert_eq!(session.selected_note().unwrap().id, a.id);
    assert!(session.delete_selected());
    assert!(session.is_empty_state());
    assert_eq!(session.count_label(), "0 notes");
}

#[test]
fn keyboard_navigation_follows_filtered_list() {
    let clock = ManualClock::new(0);
    let sink = MemoryBlobSink::new();
    let mut session = open_memory(&sink, &clock);
    let a = session.create_note();
    session.edit_selected_title("alpha");
    clock.advance(1);
    let b = session.create_note();
    session.edit_selected_title("beta");
    clock.advance(1);
    let c = session.create_note();
    session.edit_selected_title("alphabet");

    session.set_query("alpha");
    assert_eq!(session.filtered_count(), 2);
    assert_eq!(session.select_next().unwrap().id, a.id);
    assert_eq!(session.select_previous().unwrap().id, c.id);
    assert_ne!(session.selected_note().unwrap().id, b.id);
}

#[test]
fn round_trip_through_file_sink() {
    let dir = tempfile::tempdir().unwrap();
    let config = NotesConfig::default();
    let clock = ManualClock::new(1_700_000_000_000);

    let written = {
        let sink = FileBlobSink::in_dir(dir.path(), &config.storage_key);
        let mut session = NoteSession::open_with(
            clock.clone(),
            sink,
            ClockScheduler::new(clock.clone()),
            config.clone(),
        );
        session.create_note();
        session.edit_selected_content("first body");
        clock.advance(3);
        session.create_note();
        session.edit_selected_title("second");
        let snapshot = session.snapshot().recency_ordered();
        session.close();
        snapshot
    };

    let sink = FileBlobSink::in_dir(dir.path(), &config.storage_key);
    let session = NoteSession::open_with(
        clock.clone(),
        sink,
        ClockScheduler::new(clock.clone()),
        config,
    );
    let mut reloaded = session.snapshot().to_vec();
    let mut expected = written;
    reloaded.sort_by(|a, b| a.id.cmp(&b.id));
    expected.sort_by(|a, b| a.id.cmp(&b.id));
    assert_eq!(reloaded, expected);
}

#[test]
fn round_trip_through_sqlite_sink() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.sqlite3");
    let clock = ManualClock::new(42);

    let note = {
        let sink = SqliteBlobSink::open(&path, "notes_v1").unwrap();
        let mut session = NoteSession::open_with(
            clock.clone(),
            sink,
            ClockScheduler::new(clock.clone()),
            NotesConfig::default(),
        );
        session.create_note();
        let note = session.edit_selected_content("stored in sqlite").unwrap();
        session.close();
        note
    };

    let sink = SqliteBlobSink::open(&path, "notes_v1").unwrap();
    let session = NoteSession::open_with(
        clock.clone(),
        sink,
        ClockScheduler::new(clock),
        NotesConfig::default(),
    );
    assert_eq!(session.selected_note(), Some(note));
}

#[test]
fn blob_shape_matches_external_contract() {
    let notes = vec![Note {
        id: NoteId::from("note_1_a"),
        title: "T".to_string(),
        content: "C".to_string(),
        updated_at: 7,
    }];
    let blob = encode_notes(&notes).unwrap();
    let value: serde_json::Value = serde_json::from_str(&blob).unwrap();
    assert_eq!(
        value,
        serde_json::json!([{ "id": "note_1_a", "title": "T", "content": "C", "updatedAt": 7 }])
    );
}
