//! Borrowing iteration over an [`ArenaQueue`](crate::ArenaQueue).

use std::iter::FusedIterator;

use crate::node::{NodeIndex, NodeSlab};

/// Front-to-back iterator over the values of a queue.
///
/// Created by [`ArenaQueue::iter`](crate::ArenaQueue::iter). The queue is
/// borrowed for the iterator's lifetime, so it cannot be mutated while an
/// iterator is alive. Call `iter()` again to restart from the front.
#[derive(Debug)]
pub struct Iter<'q, T> {
    nodes: &'q NodeSlab<T>,
    next: Option<NodeIndex>,
    remaining: usize,
}

impl<'q, T> Iter<'q, T> {
    pub(crate) fn new(nodes: &'q NodeSlab<T>, head: Option<NodeIndex>, len: usize) -> Self {
        Self {
            nodes,
            next: head,
            remaining: len,
        }
    }
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes,
            next: self.next,
            remaining: self.remaining,
        }
    }
}

impl<'q, T> Iterator for Iter<'q, T> {
    type Item = &'q T;

    fn next(&mut self) -> Option<&'q T> {
        let node = self.nodes.get(self.next?)?;
        self.next = node.next;
        self.remaining -= 1;
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}
