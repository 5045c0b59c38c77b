//! The buffer table: a generation-checked slab of `(Buffer, SelectionList)`
//! pairs, plus the change-listener dispatch spec §6.1 asks for.
//!
//! Grounded on `core-buffer`'s own `ListenerHandle`/`ListenerTable`
//! index+generation slot pattern, reused here for `BufferId` itself (a bare
//! `Vec` index would alias a reused slot across a close) and again for
//! `ListenerId`. `core-buffer`'s `ListenerTable` only tracks a compaction
//! watermark, not callbacks -- dispatching `on_insert`/`on_erase` to
//! subscribers is this crate's job, not `core-buffer`'s.

use core_buffer::{Buffer, BufferError, Change, ChangeKind};
use core_coords::BufferCoord;
use core_selection::{Selection, SelectionList};

/// Handle to a buffer owned by a `Context`. Stale handles (from a closed
/// buffer, or a reused slot) are rejected rather than silently aliasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferId {
    index: usize,
    generation: u64,
}

/// Handle returned by `Context::subscribe`, passed back to `unsubscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Receives a buffer's edits after they are applied (spec §6.1's
/// `subscribe`/`on_insert`/`on_erase` contract).
pub trait ChangeListener {
    fn on_insert(&mut self, begin: BufferCoord, end: BufferCoord);
    fn on_erase(&mut self, begin: BufferCoord, end: BufferCoord);
}

pub(crate) struct BufferEntry {
    pub buffer: Buffer,
    pub selections: SelectionList,
    listeners: Vec<(ListenerId, Box<dyn ChangeListener>)>,
    next_listener: u64,
}

impl BufferEntry {
    fn new(buffer: Buffer) -> Self {
        let timestamp = buffer.timestamp();
        let selections = SelectionList::new(Selection::at(BufferCoord::ZERO), timestamp);
        BufferEntry {
            buffer,
            selections,
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn ChangeListener>) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, listener));
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) {
        self.listeners.retain(|(existing, _)| *existing != id);
    }

    fn notify(&mut self, change: Change) {
        for (_, listener) in &mut self.listeners {
            match change.kind {
                ChangeKind::Insert => listener.on_insert(change.begin, change.end),
                ChangeKind::Erase => listener.on_erase(change.begin, change.end),
            }
        }
    }

    /// Runs `f` against the buffer and its selections, then dispatches
    /// every change it produced to subscribed listeners. The single choke
    /// point every buffer-mutating `Context` method goes through, so
    /// `subscribe`rs see edits regardless of which higher-level operation
    /// (a raw `insert`, a selection-driven `replace`, typing in insert
    /// mode, ...) produced them.
    pub fn record_and_notify<T>(
        &mut self,
        f: impl FnOnce(&mut Buffer, &mut SelectionList) -> Result<T, BufferError>,
    ) -> Result<T, BufferError> {
        let before = self.buffer.timestamp();
        let result = f(&mut self.buffer, &mut self.selections)?;
        for change in self.buffer.changes_since(before) {
            self.notify(change);
        }
        Ok(result)
    }
}

struct Slot {
    generation: u64,
    entry: Option<BufferEntry>,
}

#[derive(Default)]
pub(crate) struct BufferTable {
    slots: Vec<Slot>,
    free: Vec<usize>,
}

impl BufferTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, buffer: Buffer) -> BufferId {
        let entry = BufferEntry::new(buffer);
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index];
            slot.generation += 1;
            slot.entry = Some(entry);
            BufferId { index, generation: slot.generation }
        } else {
            let index = self.slots.len();
            self.slots.push(Slot { generation: 0, entry: Some(entry) });
            BufferId { index, generation: 0 }
        }
    }

    pub fn close(&mut self, id: BufferId) -> bool {
        match self.slots.get_mut(id.index) {
            Some(slot) if slot.generation == id.generation && slot.entry.is_some() => {
                slot.entry = None;
                self.free.push(id.index);
                true
            }
            _ => false,
        }
    }

    pub fn get(&self, id: BufferId) -> Option<&BufferEntry> {
        self.slots
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.entry.as_ref())
    }

    pub fn get_mut(&mut self, id: BufferId) -> Option<&mut BufferEntry> {
        self.slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.entry.as_mut())
    }

    pub fn ids(&self) -> impl Iterator<Item = BufferId> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.entry.as_ref().map(|_| BufferId { index, generation: slot.generation })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_buffer::BufferFlags;

    fn buf() -> Buffer {
        Buffer::new("scratch", BufferFlags::SCRATCH, "abc\n")
    }

    #[test]
    fn closed_handle_is_rejected_even_after_the_slot_is_reused() {
        let mut table = BufferTable::new();
        let a = table.insert(buf());
        assert!(table.close(a));
        let b = table.insert(buf());
        assert_eq!(b.index, a.index, "the freed slot is reused");
        assert!(table.get(a).is_none(), "the stale handle must not alias the new buffer");
        assert!(table.get(b).is_some());
    }

    #[test]
    fn notify_reaches_every_subscriber_after_record_and_notify() {
        struct Forwarding(std::rc::Rc<std::cell::RefCell<Vec<(BufferCoord, BufferCoord)>>>);
        impl ChangeListener for Forwarding {
            fn on_insert(&mut self, begin: BufferCoord, end: BufferCoord) {
                self.0.borrow_mut().push((begin, end));
            }
            fn on_erase(&mut self, _begin: BufferCoord, _end: BufferCoord) {}
        }

        let mut entry = BufferEntry::new(buf());
        let log = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        entry.subscribe(Box::new(Forwarding(log.clone())));

        entry
            .record_and_notify(|buffer, _| buffer.insert(BufferCoord::new(0usize, 0usize), "X"))
            .unwrap();

        assert_eq!(log.borrow().len(), 1);
    }
}
