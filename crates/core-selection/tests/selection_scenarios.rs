use core_buffer::{Buffer, BufferFlags, Timestamp};
use core_coords::BufferCoord;
use core_selection::{ApplyMode, Selection, SelectionError, SelectionList};

fn sel(line: usize, begin: usize, end: usize) -> Selection {
    Selection::new(BufferCoord::new(line, begin), BufferCoord::new(line, end))
}

#[test]
fn empty_selection_covers_one_codepoint() {
    let s = Selection::at(BufferCoord::new(0usize, 2usize));
    assert!(s.is_empty());
    assert_eq!(s.min(), s.max());
}

#[test]
fn update_remaps_selections_across_an_erase_of_the_space() {
    let mut buffer = Buffer::new("scratch", BufferFlags::SCRATCH, "hello world\n");
    let ts0 = buffer.timestamp();
    let mut list = SelectionList::new(Selection::at(BufferCoord::ZERO), ts0);
    list.apply_multi(|_| vec![sel(0, 0, 4), sel(0, 6, 10)]).unwrap();

    buffer
        .erase(BufferCoord::new(0usize, 5usize), BufferCoord::new(0usize, 6usize))
        .unwrap();
    list.update(&buffer);

    assert_eq!(list.selections()[0].min(), BufferCoord::new(0usize, 0usize));
    assert_eq!(list.selections()[0].max(), BufferCoord::new(0usize, 4usize));
    assert_eq!(list.selections()[1].min(), BufferCoord::new(0usize, 5usize));
    assert_eq!(list.selections()[1].max(), BufferCoord::new(0usize, 9usize));
}

#[test]
fn update_remaps_selections_across_an_insert() {
    let mut buffer = Buffer::new("scratch", BufferFlags::SCRATCH, "abc\n");
    let ts0 = buffer.timestamp();
    let mut list = SelectionList::new(Selection::at(BufferCoord::new(0usize, 0usize)), ts0);
    buffer.insert(BufferCoord::new(0usize, 0usize), "X").unwrap();
    list.update(&buffer);
    assert_eq!(list.main().min(), BufferCoord::new(0usize, 1usize));
}

#[test]
fn extend_mode_unions_with_the_motion_result() {
    let ts0 = Timestamp::default();
    let mut list = SelectionList::new(sel(0, 2, 2), ts0);
    list.apply(ApplyMode::Extend, |s| {
        s.with_cursor(BufferCoord::new(0usize, 5usize))
    });
    assert_eq!(list.main().min(), BufferCoord::new(0usize, 2usize));
    assert_eq!(list.main().max(), BufferCoord::new(0usize, 5usize));
}

#[test]
fn touching_selections_stay_disjoint_but_overlapping_ones_merge() {
    let ts0 = Timestamp::default();

    let mut touching = SelectionList::new(Selection::at(BufferCoord::ZERO), ts0);
    touching.apply_multi(|_| vec![sel(0, 0, 2), sel(0, 3, 5)]).unwrap();
    assert_eq!(touching.len(), 2, "adjacent selections must not merge");

    let mut overlapping = SelectionList::new(Selection::at(BufferCoord::ZERO), ts0);
    overlapping.apply_multi(|_| vec![sel(0, 0, 2), sel(0, 2, 5)]).unwrap();
    assert_eq!(overlapping.len(), 1, "overlapping selections must merge");
    assert_eq!(overlapping.selections()[0].min(), BufferCoord::new(0usize, 0usize));
    assert_eq!(overlapping.selections()[0].max(), BufferCoord::new(0usize, 5usize));
}

#[test]
fn keep_if_rejects_emptying_the_set() {
    let ts0 = Timestamp::default();
    let mut list = SelectionList::new(sel(0, 0, 2), ts0);
    let result = list.keep_if(|_| false);
    assert!(matches!(result, Err(SelectionError::EmptySelectionSet)));
}

#[test]
fn rotate_main_wraps_modulo_len() {
    let ts0 = Timestamp::default();
    let mut list = SelectionList::new(sel(0, 0, 0), ts0);
    list.apply_multi(|s| vec![s.clone(), sel(0, 2, 2), sel(0, 4, 4)]).unwrap();
    list.rotate_main(-1);
    assert_eq!(list.main_index(), 2);
    list.rotate_main(1);
    assert_eq!(list.main_index(), 0);
}

#[test]
fn insert_before_shifts_the_selection_to_follow_inserted_text() {
    let mut buffer = Buffer::new("scratch", BufferFlags::SCRATCH, "bc\n");
    let ts0 = buffer.timestamp();
    let mut list = SelectionList::new(Selection::at(BufferCoord::new(0usize, 0usize)), ts0);
    list.insert_before(&mut buffer, "a").unwrap();
    assert_eq!(buffer.to_string(), "abc\n");
    assert_eq!(list.main().min(), BufferCoord::new(0usize, 1usize));
}

#[test]
fn erase_leaves_a_single_codepoint_at_the_join_point() {
    let mut buffer = Buffer::new("scratch", BufferFlags::SCRATCH, "hello\n");
    let ts0 = buffer.timestamp();
    let mut list = SelectionList::new(sel(0, 1, 3), ts0); // "ell"
    list.erase(&mut buffer).unwrap();
    assert_eq!(buffer.to_string(), "ho\n");
    assert!(list.main().is_empty());
    assert_eq!(list.main().min(), BufferCoord::new(0usize, 1usize));
}
