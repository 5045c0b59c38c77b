use core_buffer::{Buffer, BufferError, BufferFlags, ChangeKind, Timestamp};
use core_coords::{BufferCoord, LineCount};

fn buf(content: &str) -> Buffer {
    Buffer::new("scratch", BufferFlags::SCRATCH, content)
}

#[test]
fn empty_buffer_is_a_single_newline_line() {
    let b = buf("");
    assert_eq!(b.to_string(), "\n");
    assert_eq!(b.line_count(), LineCount(1));
}

#[test]
fn construction_appends_a_missing_trailing_newline() {
    let b = buf("hello");
    assert_eq!(b.to_string(), "hello\n");
}

#[test]
fn basic_insert_and_undo() {
    let mut b = buf("hello\n");
    let at = BufferCoord::new(0usize, 5usize);
    b.insert(at, " world").unwrap();
    assert_eq!(b.to_string(), "hello world\n");
    assert!(b.undo());
    assert_eq!(b.to_string(), "hello\n");
    assert!(!b.undo(), "undo at the root must report no movement");
    assert!(b.redo());
    assert_eq!(b.to_string(), "hello world\n");
    assert!(!b.redo(), "redo at a leaf must report no movement");
}

#[test]
fn insert_at_buffer_end_without_newline_gets_one_appended() {
    let mut b = buf("a\n");
    let end = BufferCoord::new(0usize, 2usize);
    b.insert(end, "b").unwrap();
    assert_eq!(b.to_string(), "a\nb\n");
}

#[test]
fn erase_crossing_final_newline_reinserts_one_atomically() {
    let mut b = buf("hello\n");
    let begin = BufferCoord::new(0usize, 3usize);
    let end = BufferCoord::new(0usize, 6usize);
    b.erase(begin, end).unwrap();
    assert_eq!(b.to_string(), "hel\n");
    assert!(b.undo());
    assert_eq!(b.to_string(), "hello\n", "undo must restore the erased text, not leave a stray newline");
    assert!(!b.undo());
}

#[test]
fn undo_tree_branching_follows_most_recent_child() {
    let mut b = buf("\n");
    b.insert(BufferCoord::new(0usize, 0usize), "A").unwrap();
    assert_eq!(b.to_string(), "A\n");
    assert!(b.undo());
    assert_eq!(b.to_string(), "\n");

    b.insert(BufferCoord::new(0usize, 0usize), "C").unwrap();
    assert_eq!(b.to_string(), "C\n");

    assert!(b.undo());
    assert_eq!(b.to_string(), "\n");
    assert!(!b.undo());

    assert!(b.redo());
    assert_eq!(b.to_string(), "C\n", "redo must follow C, the most recently created branch, not abandoned A");
    assert!(!b.redo());
}

#[test]
fn grouped_edits_undo_as_one_step() {
    let mut b = buf("\n");
    b.begin_undo_group();
    b.insert(BufferCoord::new(0usize, 0usize), "a").unwrap();
    b.insert(BufferCoord::new(0usize, 1usize), "b").unwrap();
    b.end_undo_group();
    assert_eq!(b.to_string(), "ab\n");
    assert!(b.undo());
    assert_eq!(b.to_string(), "\n");
    assert!(!b.undo());
}

#[test]
fn changes_since_reports_only_later_changes() {
    let mut b = buf("abc\n");
    let t0 = b.timestamp();
    b.insert(BufferCoord::new(0usize, 3usize), "d").unwrap();
    let changes = b.changes_since(t0);
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].kind, ChangeKind::Insert);
    assert!(b.changes_since(b.timestamp()).is_empty());
}

#[test]
fn substring_reads_a_char_range() {
    let b = buf("hello world\n");
    let s = b
        .substring(BufferCoord::new(0usize, 6usize), BufferCoord::new(0usize, 11usize))
        .unwrap();
    assert_eq!(s, "world");
}

#[test]
fn out_of_range_coordinate_is_rejected() {
    let b = buf("hi\n");
    let bad = BufferCoord::new(5usize, 0usize);
    assert!(matches!(b.validate_coord(bad), Err(BufferError::CoordOutOfRange(_))));
}

#[test]
fn listener_watermark_gates_change_log_compaction() {
    let mut b = buf("a\n");
    let handle = b.register_listener();
    b.insert(BufferCoord::new(0usize, 1usize), "b").unwrap();
    b.insert(BufferCoord::new(0usize, 2usize), "c").unwrap();
    b.compact_change_log();
    assert_eq!(b.changes_since(Timestamp::ZERO).len(), 2, "listener still at the old watermark keeps the log");
    b.update_listener(handle, b.timestamp());
    b.compact_change_log();
    assert!(b.changes_since(Timestamp::ZERO).is_empty());
}
