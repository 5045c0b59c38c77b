//! Ordered, disjoint selection sets that drive every edit.
//!
//! Grounded on Kakoune's `selection.hh`/`selection.cc` for the
//! anchor/cursor-pair shape and `ranges.cc::merge_overlapping` for the
//! sort-and-merge step on update, adapted onto `core-buffer`'s `Change` log
//! instead of Kakoune's in-place buffer back-pointers.

mod error;

pub use error::SelectionError;

use core_buffer::{Buffer, Change, ChangeKind, Timestamp};
use core_coords::BufferCoord;

/// An inclusive `(anchor, cursor)` pair. `anchor == cursor` is an empty
/// selection covering the single codepoint at that coordinate -- not a
/// zero-width gap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    anchor: BufferCoord,
    cursor: BufferCoord,
    captures: Option<Vec<String>>,
}

impl Selection {
    pub fn new(anchor: BufferCoord, cursor: BufferCoord) -> Self {
        Selection {
            anchor,
            cursor,
            captures: None,
        }
    }

    /// A single-codepoint selection at `coord`.
    pub fn at(coord: BufferCoord) -> Self {
        Selection::new(coord, coord)
    }

    pub fn with_captures(mut self, captures: Vec<String>) -> Self {
        self.captures = Some(captures);
        self
    }

    pub fn anchor(&self) -> BufferCoord {
        self.anchor
    }

    pub fn cursor(&self) -> BufferCoord {
        self.cursor
    }

    pub fn captures(&self) -> Option<&[String]> {
        self.captures.as_deref()
    }

    pub fn min(&self) -> BufferCoord {
        self.anchor.min(self.cursor)
    }

    pub fn max(&self) -> BufferCoord {
        self.anchor.max(self.cursor)
    }

    pub fn is_forward(&self) -> bool {
        self.anchor <= self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.anchor == self.cursor
    }

    /// Re-anchors the selection to `cursor`, keeping direction and captures.
    pub fn with_cursor(&self, cursor: BufferCoord) -> Self {
        Selection {
            anchor: self.anchor,
            cursor,
            captures: self.captures.clone(),
        }
    }

    /// Union with another selection: min of mins, max of maxes, cursor taken
    /// from `other` (the motion's own cursor) -- used when extending.
    pub fn union(&self, other: &Selection) -> Self {
        let min = self.min().min(other.min());
        let max = self.max().max(other.max());
        let (anchor, cursor) = if other.cursor() >= other.anchor() {
            (min, max)
        } else {
            (max, min)
        };
        Selection {
            anchor,
            cursor,
            captures: other.captures.clone(),
        }
    }

    fn translate_insert(&self, begin: BufferCoord, end: BufferCoord) -> Self {
        Selection {
            anchor: translate_insert_coord(self.anchor, begin, end),
            cursor: translate_insert_coord(self.cursor, begin, end),
            captures: self.captures.clone(),
        }
    }

    fn translate_erase(&self, begin: BufferCoord, end: BufferCoord) -> Self {
        Selection {
            anchor: translate_erase_coord(self.anchor, begin, end),
            cursor: translate_erase_coord(self.cursor, begin, end),
            captures: self.captures.clone(),
        }
    }
}

fn translate_insert_coord(p: BufferCoord, begin: BufferCoord, end: BufferCoord) -> BufferCoord {
    if p < begin {
        return p;
    }
    if p.line > begin.line {
        let line = p.line + (end.line - begin.line);
        return BufferCoord::new(line, p.byte);
    }
    // p.line == begin.line and p.byte >= begin.byte
    if end.line.get() > begin.line.get() {
        BufferCoord::new(end.line, end.byte + (p.byte - begin.byte))
    } else {
        BufferCoord::new(begin.line, p.byte + (end.byte - begin.byte))
    }
}

fn translate_erase_coord(p: BufferCoord, begin: BufferCoord, end: BufferCoord) -> BufferCoord {
    if p < begin {
        return p;
    }
    if p < end {
        return begin;
    }
    if p.line > end.line {
        let line = p.line - (end.line - begin.line);
        return BufferCoord::new(line, p.byte);
    }
    // p.line == end.line and p.byte >= end.byte
    BufferCoord::new(begin.line, begin.byte + (p.byte - end.byte))
}

/// How a motion's result is combined with the selection that produced it,
/// mirroring the external motion interface's `SelectionList::apply` modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyMode {
    /// Each selection becomes the motion's result.
    Replace,
    /// Each selection grows to the union of itself and the motion's result.
    Extend,
    /// The motion runs once against the main selection and its result is
    /// added as a new selection (which becomes main); existing selections
    /// are left untouched.
    Append,
    /// The motion runs only against the main selection, replacing it
    /// in place; other selections are left untouched.
    ReplaceMain,
}

/// Sorted, disjoint set of selections with a distinguished "main" one.
#[derive(Debug, Clone)]
pub struct SelectionList {
    selections: Vec<Selection>,
    main_index: usize,
    timestamp: Timestamp,
}

impl SelectionList {
    pub fn new(initial: Selection, timestamp: Timestamp) -> Self {
        SelectionList {
            selections: vec![initial],
            main_index: 0,
            timestamp,
        }
    }

    pub fn selections(&self) -> &[Selection] {
        &self.selections
    }

    pub fn len(&self) -> usize {
        self.selections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    pub fn main_index(&self) -> usize {
        self.main_index
    }

    pub fn main(&self) -> &Selection {
        &self.selections[self.main_index]
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn set_main_index(&mut self, index: usize) -> Result<(), SelectionError> {
        if index >= self.selections.len() {
            return Err(SelectionError::MainIndexOutOfRange(index));
        }
        self.main_index = index;
        Ok(())
    }

    pub fn rotate_main(&mut self, n: isize) {
        let len = self.selections.len() as isize;
        let idx = (self.main_index as isize + n).rem_euclid(len);
        self.main_index = idx as usize;
    }

    /// Remaps every stored coordinate across changes applied since this
    /// list's timestamp, then re-sorts and merges.
    pub fn update(&mut self, buffer: &Buffer) {
        if self.timestamp == buffer.timestamp() {
            return;
        }
        let changes = buffer.changes_since(self.timestamp);
        for change in &changes {
            for selection in &mut self.selections {
                *selection = apply_change(selection, change);
            }
        }
        self.timestamp = buffer.timestamp();
        self.sort_and_merge();
        tracing::trace!(applied = changes.len(), "selection list remapped");
    }

    pub fn insert_before(&mut self, buffer: &mut Buffer, text: &str) -> Result<(), core_buffer::BufferError> {
        for i in (0..self.selections.len()).rev() {
            let at = self.selections[i].min();
            let new_end = buffer.insert(at, text)?;
            self.selections[i] = self.selections[i].translate_insert(at, new_end);
        }
        self.timestamp = buffer.timestamp();
        self.sort_and_merge();
        Ok(())
    }

    pub fn insert_after(&mut self, buffer: &mut Buffer, text: &str) -> Result<(), core_buffer::BufferError> {
        for i in (0..self.selections.len()).rev() {
            let at = buffer.next(self.selections[i].max());
            buffer.insert(at, text)?;
        }
        self.timestamp = buffer.timestamp();
        self.sort_and_merge();
        Ok(())
    }

    pub fn replace(&mut self, buffer: &mut Buffer, text: &str) -> Result<(), core_buffer::BufferError> {
        for i in (0..self.selections.len()).rev() {
            let begin = self.selections[i].min();
            let end = buffer.next(self.selections[i].max());
            buffer.erase(begin, end)?;
            let new_end = buffer.insert(begin, text)?;
            self.selections[i] = if new_end == begin {
                Selection::at(begin)
            } else {
                Selection::new(begin, buffer.prev(new_end))
            };
        }
        self.timestamp = buffer.timestamp();
        self.sort_and_merge();
        Ok(())
    }

    pub fn erase(&mut self, buffer: &mut Buffer) -> Result<(), core_buffer::BufferError> {
        for i in (0..self.selections.len()).rev() {
            let begin = self.selections[i].min();
            let end = buffer.next(self.selections[i].max());
            buffer.erase(begin, end)?;
            let joined = if buffer.is_end_of_buffer(begin) && begin != BufferCoord::ZERO {
                buffer.prev(begin)
            } else {
                begin
            };
            self.selections[i] = Selection::at(joined);
        }
        self.timestamp = buffer.timestamp();
        self.sort_and_merge();
        Ok(())
    }

    /// Maps `motion` over every selection (pure, no buffer mutation),
    /// combining each motion's result with the existing selection per
    /// `mode`.
    pub fn apply(&mut self, mode: ApplyMode, motion: impl Fn(&Selection) -> Selection) {
        match mode {
            ApplyMode::Replace => {
                for selection in &mut self.selections {
                    *selection = motion(selection);
                }
            }
            ApplyMode::Extend => {
                for selection in &mut self.selections {
                    *selection = selection.union(&motion(selection));
                }
            }
            ApplyMode::Append => {
                let result = motion(&self.selections[self.main_index]);
                self.selections.push(result);
                self.main_index = self.selections.len() - 1;
            }
            ApplyMode::ReplaceMain => {
                let main = self.main_index;
                self.selections[main] = motion(&self.selections[main]);
            }
        }
        self.sort_and_merge();
    }

    /// Maps `motion` over every selection, flattening results. Fails with
    /// `NothingSelected` if the flattened result would be empty.
    pub fn apply_multi(
        &mut self,
        motion: impl Fn(&Selection) -> Vec<Selection>,
    ) -> Result<(), SelectionError> {
        let mut expanded = Vec::new();
        let mut new_main = 0usize;
        for (i, selection) in self.selections.iter().enumerate() {
            let start = expanded.len();
            expanded.extend(motion(selection));
            if i == self.main_index && expanded.len() > start {
                new_main = start;
            }
        }
        if expanded.is_empty() {
            return Err(SelectionError::NothingSelected);
        }
        self.selections = expanded;
        self.main_index = new_main.min(self.selections.len() - 1);
        self.sort_and_merge();
        Ok(())
    }

    pub fn keep_if(&mut self, pred: impl Fn(&Selection) -> bool) -> Result<(), SelectionError> {
        self.filter_selections(pred)
    }

    pub fn remove_if(&mut self, pred: impl Fn(&Selection) -> bool) -> Result<(), SelectionError> {
        self.filter_selections(|s| !pred(s))
    }

    fn filter_selections(&mut self, pred: impl Fn(&Selection) -> bool) -> Result<(), SelectionError> {
        let main_coord = self.selections[self.main_index].clone();
        let kept: Vec<Selection> = self
            .selections
            .iter()
            .filter(|s| pred(s))
            .cloned()
            .collect();
        if kept.is_empty() {
            return Err(SelectionError::EmptySelectionSet);
        }
        let new_main = kept
            .iter()
            .position(|s| *s == main_coord)
            .unwrap_or(0);
        self.selections = kept;
        self.main_index = new_main;
        self.sort_and_merge();
        Ok(())
    }

    /// Sorts by `min()` and merges entries sharing a codepoint. Adjacency at
    /// a boundary (touching but not sharing a codepoint) is not a merge.
    fn sort_and_merge(&mut self) {
        let main_ptr = self.main_index;
        let mut indexed: Vec<(usize, Selection)> = self
            .selections
            .drain(..)
            .enumerate()
            .collect();
        indexed.sort_by_key(|(_, s)| s.min());

        let mut merged: Vec<Selection> = Vec::with_capacity(indexed.len());
        let mut origin_of_merged: Vec<Vec<usize>> = Vec::with_capacity(indexed.len());
        for (orig_idx, selection) in indexed {
            if let Some(last) = merged.last_mut() {
                if selection.min() <= last.max() {
                    let merged_sel = last.union(&selection);
                    *last = merged_sel;
                    origin_of_merged.last_mut().unwrap().push(orig_idx);
                    continue;
                }
            }
            merged.push(selection);
            origin_of_merged.push(vec![orig_idx]);
        }

        let new_main = origin_of_merged
            .iter()
            .position(|origins| origins.contains(&main_ptr))
            .unwrap_or(0);

        self.selections = merged;
        self.main_index = new_main;
    }
}

fn apply_change(selection: &Selection, change: &Change) -> Selection {
    match change.kind {
        ChangeKind::Insert => selection.translate_insert(change.begin, change.end),
        ChangeKind::Erase => selection.translate_erase(change.begin, change.end),
    }
}
