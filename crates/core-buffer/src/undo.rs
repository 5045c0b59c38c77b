//! Branching undo history, grounded on Kakoune's `buffer.hh` undo-group list
//! but turned into a real tree (per the redesign note in the buffer crate's
//! design doc): `redo` must be able to follow the most recently created
//! child rather than a single linear "next" slot, so a later edit made after
//! undoing doesn't destroy the branch it came from.

use crate::change::Modification;

pub type NodeId = usize;

#[derive(Debug, Clone)]
struct UndoNode {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    group: Vec<Modification>,
}

#[derive(Debug)]
pub struct UndoTree {
    nodes: Vec<UndoNode>,
    current: NodeId,
    group_depth: usize,
    pending: Vec<Modification>,
}

impl Default for UndoTree {
    fn default() -> Self {
        Self::new()
    }
}

impl UndoTree {
    pub fn new() -> Self {
        UndoTree {
            nodes: vec![UndoNode {
                parent: None,
                children: Vec::new(),
                group: Vec::new(),
            }],
            current: 0,
            group_depth: 0,
            pending: Vec::new(),
        }
    }

    pub fn begin_group(&mut self) {
        self.group_depth += 1;
    }

    /// Commits the accumulated modifications as a new child of `current` once
    /// the outermost `begin_group`/`end_group` pair closes.
    pub fn end_group(&mut self) {
        debug_assert!(self.group_depth > 0, "end_group without begin_group");
        self.group_depth = self.group_depth.saturating_sub(1);
        if self.group_depth == 0 {
            self.commit_pending();
        }
    }

    /// Records one modification. Outside any explicit group this commits
    /// immediately as its own singleton group.
    pub fn record(&mut self, modification: Modification) {
        self.pending.push(modification);
        if self.group_depth == 0 {
            self.commit_pending();
        }
    }

    fn commit_pending(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let group = std::mem::take(&mut self.pending);
        let id = self.nodes.len();
        self.nodes.push(UndoNode {
            parent: Some(self.current),
            children: Vec::new(),
            group,
        });
        self.nodes[self.current].children.push(id);
        self.current = id;
        tracing::trace!(node = id, "committed undo group");
    }

    /// Modifications of the current node, oldest first (caller applies
    /// inverses in reverse to undo, or forward to redo into this node).
    pub fn current_group(&self) -> &[Modification] {
        &self.nodes[self.current].group
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.nodes[self.current].parent
    }

    pub fn most_recent_child(&self) -> Option<NodeId> {
        self.nodes[self.current].children.last().copied()
    }

    pub fn move_to(&mut self, node: NodeId) {
        self.current = node;
    }

    pub fn group_of(&self, node: NodeId) -> &[Modification] {
        &self.nodes[node].group
    }

    pub fn depth(&self) -> usize {
        let mut d = 0;
        let mut n = self.current;
        while let Some(p) = self.nodes[n].parent {
            n = p;
            d += 1;
        }
        d
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_coords::BufferCoord;

    fn ins(at: usize) -> Modification {
        Modification::Insert {
            at: BufferCoord::new(0usize, at),
            text: "x".to_string(),
        }
    }

    #[test]
    fn ungrouped_records_become_singleton_nodes() {
        let mut tree = UndoTree::new();
        tree.record(ins(0));
        assert_eq!(tree.depth(), 1);
        tree.record(ins(1));
        assert_eq!(tree.depth(), 2);
    }

    #[test]
    fn grouped_records_commit_once_on_outer_end() {
        let mut tree = UndoTree::new();
        tree.begin_group();
        tree.begin_group();
        tree.record(ins(0));
        tree.record(ins(1));
        tree.end_group();
        assert_eq!(tree.depth(), 0, "nested end_group must not commit yet");
        tree.end_group();
        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.current_group().len(), 2);
    }

    #[test]
    fn redo_follows_most_recently_created_child() {
        let mut tree = UndoTree::new();
        tree.record(ins(0)); // node A (id 1), child of root
        let root = tree.parent().unwrap();
        assert_eq!(root, 0);
        tree.move_to(root);
        tree.record(ins(1)); // node B (id 2), second child of root
        let node_b = 2;
        assert_eq!(tree.most_recent_child(), None, "B is a fresh leaf");
        tree.move_to(root);
        assert_eq!(tree.most_recent_child(), Some(node_b), "B was created after A");
    }
}
