//! Replacement for Kakoune's `BufferChangeListener` callback interface.
//!
//! Kakoune buffers hold raw back-pointers to every interested `SelectionList`
//! and friends, pushing each change to them synchronously. That shape needs
//! either unsafe back-edges or `Rc`/`Weak` cycles in Rust for no real benefit
//! here, since every consumer in this workspace only wants to know "what's
//! the oldest timestamp still in use" so the change log can be trimmed. A
//! slab of registered timestamps gives the same retention behavior without
//! a single callback.

use crate::change::Timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerHandle {
    index: usize,
    generation: u64,
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u64,
    live: bool,
    observed: Timestamp,
}

#[derive(Debug, Default)]
pub struct ListenerTable {
    slots: Vec<Slot>,
    free: Vec<usize>,
}

impl ListenerTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new observer starting at `at`, the timestamp of the
    /// buffer state it currently holds coordinates against.
    pub fn register(&mut self, at: Timestamp) -> ListenerHandle {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index];
            slot.live = true;
            slot.observed = at;
            ListenerHandle {
                index,
                generation: slot.generation,
            }
        } else {
            let index = self.slots.len();
            self.slots.push(Slot {
                generation: 0,
                live: true,
                observed: at,
            });
            ListenerHandle {
                index,
                generation: 0,
            }
        }
    }

    pub fn unregister(&mut self, handle: ListenerHandle) {
        if let Some(slot) = self.slots.get_mut(handle.index) {
            if slot.live && slot.generation == handle.generation {
                slot.live = false;
                slot.generation += 1;
                self.free.push(handle.index);
            }
        }
    }

    /// Advances an observer's watermark, normally called once it has
    /// remapped its own coordinates past the given timestamp.
    pub fn update(&mut self, handle: ListenerHandle, at: Timestamp) {
        if let Some(slot) = self.slots.get_mut(handle.index) {
            if slot.live && slot.generation == handle.generation {
                slot.observed = at;
            }
        }
    }

    /// The oldest timestamp any live observer still depends on, or `None`
    /// if nothing is registered (the log can then be dropped entirely).
    pub fn min_observed(&self) -> Option<Timestamp> {
        self.slots
            .iter()
            .filter(|s| s.live)
            .map(|s| s.observed)
            .min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn min_observed_tracks_the_oldest_live_watermark() {
        let mut table = ListenerTable::new();
        let a = table.register(Timestamp(1));
        let b = table.register(Timestamp(5));
        assert_eq!(table.min_observed(), Some(Timestamp(1)));
        table.update(a, Timestamp(10));
        assert_eq!(table.min_observed(), Some(Timestamp(5)));
        table.unregister(b);
        assert_eq!(table.min_observed(), Some(Timestamp(10)));
    }

    #[test]
    fn unregistered_slot_is_reused_with_a_new_generation() {
        let mut table = ListenerTable::new();
        let a = table.register(Timestamp(0));
        table.unregister(a);
        let b = table.register(Timestamp(3));
        assert_eq!(b.index, a.index);
        // Stale handle must not affect the reused slot.
        table.update(a, Timestamp(99));
        assert_eq!(table.min_observed(), Some(Timestamp(3)));
    }

    #[test]
    fn empty_table_has_no_watermark() {
        let table = ListenerTable::new();
        assert_eq!(table.min_observed(), None);
    }
}
