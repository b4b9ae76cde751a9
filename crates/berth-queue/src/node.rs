//! Queue nodes and the slab that stores them.
//!
//! Nodes are addressed by [`NodeIndex`] rather than by pointer. The slab
//! reuses vacated slots through a free list, so a long-running queue
//! keeps at most as many slots as its peak length.

use std::alloc::Layout;

use berth_arena::Block;

/// Handle to a slot in a [`NodeSlab`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct NodeIndex(usize);

/// One link of the queue chain.
#[derive(Debug)]
pub(crate) struct Node<T> {
    pub(crate) value: T,
    /// Successor in FIFO order; `None` for the tail.
    pub(crate) next: Option<NodeIndex>,
    /// The arena block reserved for this node.
    pub(crate) block: Block,
}

/// Size and alignment reserved in the allocator for every node of `T`.
///
/// Never zero-sized: a node always carries its `Block`.
pub(crate) fn node_layout<T>() -> Layout {
    Layout::new::<Node<T>>()
}

/// Slot storage for nodes.
#[derive(Debug)]
pub(crate) struct NodeSlab<T> {
    slots: Vec<Option<Node<T>>>,
    /// Indices of vacant slots available for reuse.
    free_list: Vec<usize>,
}

impl<T> NodeSlab<T> {
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
        }
    }

    /// Store a node, reusing a vacant slot when there is one.
    pub(crate) fn insert(&mut self, node: Node<T>) -> NodeIndex {
        if let Some(idx) = self.free_list.pop() {
            self.slots[idx] = Some(node);
            NodeIndex(idx)
        } else {
            self.slots.push(Some(node));
            NodeIndex(self.slots.len() - 1)
        }
    }

    /// Take the node out of its slot, leaving the slot vacant.
    pub(crate) fn remove(&mut self, idx: NodeIndex) -> Option<Node<T>> {
        let node = self.slots.get_mut(idx.0)?.take()?;
        self.free_list.push(idx.0);
        Some(node)
    }

    pub(crate) fn get(&self, idx: NodeIndex) -> Option<&Node<T>> {
        self.slots.get(idx.0)?.as_ref()
    }

    pub(crate) fn get_mut(&mut self, idx: NodeIndex) -> Option<&mut Node<T>> {
        self.slots.get_mut(idx.0)?.as_mut()
    }

    /// Number of occupied slots.
    #[cfg(test)]
    pub(crate) fn occupied(&self) -> usize {
        self.slots.len() - self.free_list.len()
    }

    /// Total slots (occupied + vacant).
    #[cfg(test)]
    pub(crate) fn total_slots(&self) -> usize {
        self.slots.len()
    }
}
