//! The arena-backed FIFO queue.

use std::convert::Infallible;
use std::fmt;

use berth_arena::{Allocator, ArenaError, FixedArena};

use crate::error::EnqueueError;
use crate::guard::{release_block, BlockGuard};
use crate::iter::Iter;
use crate::node::{node_layout, Node, NodeIndex, NodeSlab};

/// A singly-linked FIFO queue whose every node is reserved in an
/// [`Allocator`].
///
/// The queue borrows its allocator for `'a` and never owns it; several
/// queues may share one arena. Each enqueue reserves one node-sized block
/// before the value is placed, and each removal releases that block after
/// the value is gone. Dropping the queue releases every remaining block.
///
/// ```
/// use berth_arena::FixedArena;
/// use berth_queue::ArenaQueue;
///
/// let arena = FixedArena::default();
/// let mut queue = ArenaQueue::new(&arena);
/// queue.enqueue("first").unwrap();
/// queue.enqueue("second").unwrap();
/// assert_eq!(queue.front(), Some(&"first"));
/// assert_eq!(queue.dequeue(), Some("first"));
/// assert_eq!(queue.len(), 1);
/// ```
pub struct ArenaQueue<'a, T, A: Allocator + ?Sized = FixedArena> {
    alloc: &'a A,
    nodes: NodeSlab<T>,
    head: Option<NodeIndex>,
    tail: Option<NodeIndex>,
    len: usize,
}

impl<'a, T, A: Allocator + ?Sized> ArenaQueue<'a, T, A> {
    /// Create an empty queue that allocates its nodes from `alloc`.
    pub fn new(alloc: &'a A) -> Self {
        Self {
            alloc,
            nodes: NodeSlab::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    /// The allocator this queue reserves its nodes in.
    pub fn allocator(&self) -> &'a A {
        self.alloc
    }

    /// Append `value` at the back, taking ownership of it.
    ///
    /// If no node block can be reserved the error is returned, `value` is
    /// dropped and the queue is unchanged.
    pub fn enqueue(&mut self, value: T) -> Result<(), ArenaError> {
        self.enqueue_with(|| value)
    }

    /// Append a clone of `value` at the back.
    ///
    /// The node block is reserved before cloning; if `clone` panics the
    /// block is released during unwinding.
    pub fn enqueue_cloned(&mut self, value: &T) -> Result<(), ArenaError>
    where
        T: Clone,
    {
        self.enqueue_with(|| value.clone())
    }

    /// Reserve a node block, then build the value in it with `make`.
    pub fn enqueue_with<F>(&mut self, make: F) -> Result<(), ArenaError>
    where
        F: FnOnce() -> T,
    {
        match self.try_enqueue_with(|| Ok::<T, Infallible>(make())) {
            Ok(()) => Ok(()),
            Err(EnqueueError::Alloc(err)) => Err(err),
            Err(EnqueueError::Construct(never)) => match never {},
        }
    }

    /// Reserve a node block, then build the value with a fallible `make`.
    ///
    /// If `make` returns an error or panics, the block is released before
    /// the failure reaches the caller and the queue's length, front and
    /// back are unchanged.
    pub fn try_enqueue_with<E, F>(&mut self, make: F) -> Result<(), EnqueueError<E>>
    where
        F: FnOnce() -> Result<T, E>,
    {
        let layout = node_layout::<T>();
        let alloc = self.alloc;
        let block = alloc
            .allocate(layout.size(), layout.align())
            .map_err(EnqueueError::Alloc)?;
        let guard = BlockGuard::new(alloc, block, layout);

        let value = make().map_err(EnqueueError::Construct)?;

        let idx = self.nodes.insert(Node {
            value,
            next: None,
            block: guard.block(),
        });
        guard.disarm();

        match self.tail.and_then(|tail| self.nodes.get_mut(tail)) {
            Some(tail) => tail.next = Some(idx),
            None => self.head = Some(idx),
        }
        self.tail = Some(idx);
        self.len += 1;
        Ok(())
    }

    /// Enqueue every value of `values` in order.
    ///
    /// Stops at the first allocation failure; values enqueued before it
    /// stay in the queue.
    pub fn try_extend<I>(&mut self, values: I) -> Result<(), ArenaError>
    where
        I: IntoIterator<Item = T>,
    {
        for value in values {
            self.enqueue(value)?;
        }
        Ok(())
    }

    /// Detach the front node, fixing up head, tail and length.
    fn detach_front(&mut self) -> Option<Node<T>> {
        let head = self.head?;
        let node = self.nodes.remove(head)?;
        self.head = node.next;
        if self.head.is_none() {
            self.tail = None;
        }
        self.len -= 1;
        Some(node)
    }

    /// Remove the front value and hand it back. `None` when empty.
    pub fn dequeue(&mut self) -> Option<T> {
        let node = self.detach_front()?;
        release_block(self.alloc, node.block, node_layout::<T>());
        Some(node.value)
    }

    /// Remove and drop the front value. Does nothing when empty.
    ///
    /// The value is dropped before its block is released; the block is
    /// released even if that drop panics.
    pub fn remove_front(&mut self) {
        if let Some(node) = self.detach_front() {
            let _release = BlockGuard::new(self.alloc, node.block, node_layout::<T>());
            drop(node.value);
        }
    }

    /// Remove every value, releasing every node block. Safe on an empty queue.
    #[doc(alias = "purge")]
    pub fn clear(&mut self) {
        while self.head.is_some() {
            self.remove_front();
        }
    }

    /// The value at the front, or `None` when empty.
    pub fn front(&self) -> Option<&T> {
        self.nodes.get(self.head?).map(|n| &n.value)
    }

    /// Mutable access to the value at the front.
    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.nodes.get_mut(self.head?).map(|n| &mut n.value)
    }

    /// The value at the back, or `None` when empty.
    pub fn back(&self) -> Option<&T> {
        self.nodes.get(self.tail?).map(|n| &n.value)
    }

    /// Mutable access to the value at the back.
    pub fn back_mut(&mut self) -> Option<&mut T> {
        self.nodes.get_mut(self.tail?).map(|n| &mut n.value)
    }

    /// Number of values in the queue.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the queue holds no values.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterate front to back.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(&self.nodes, self.head, self.len)
    }

    /// Walk the chain and check the structural invariants.
    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        assert_eq!(self.len == 0, self.head.is_none());
        assert_eq!(self.head.is_none(), self.tail.is_none());
        assert_eq!(self.nodes.occupied(), self.len);
        let mut steps = 0;
        let mut cursor = self.head;
        let mut last = None;
        while let Some(idx) = cursor {
            let node = self.nodes.get(idx).expect("chain points at a vacant slot");
            last = Some(idx);
            cursor = node.next;
            steps += 1;
            assert!(steps <= self.len, "chain longer than len");
        }
        assert_eq!(steps, self.len);
        assert_eq!(last, self.tail);
    }
}

impl<T, A: Allocator + ?Sized> Drop for ArenaQueue<'_, T, A> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<'q, T, A: Allocator + ?Sized> IntoIterator for &'q ArenaQueue<'_, T, A> {
    type Item = &'q T;
    type IntoIter = Iter<'q, T>;

    fn into_iter(self) -> Iter<'q, T> {
        self.iter()
    }
}

impl<T: fmt::Debug, A: Allocator + ?Sized> fmt::Debug for ArenaQueue<'_, T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
