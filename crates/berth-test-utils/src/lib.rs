//! Test utilities and fixtures for Berth development.
//!
//! Provides a [`Person`] record to fill queues with, a
//! [`CountingAllocator`] wrapper that records every call it forwards,
//! and [`CloneBomb`], a value whose clone panics after a set budget.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::cell::Cell;

use berth_arena::{Allocator, ArenaError, ArenaId, Block};

pub use fixtures::{roster, CloneBomb, Person};

/// Allocator wrapper that counts calls and can refuse allocations.
///
/// Forwards to the wrapped allocator and keeps running totals so tests
/// can check that every block handed out came back exactly once. Set a
/// budget with [`fail_after`](CountingAllocator::fail_after) to make the
/// n-th and later allocations fail with `OutOfMemory`.
pub struct CountingAllocator<A> {
    inner: A,
    allocations: Cell<usize>,
    deallocations: Cell<usize>,
    failed_deallocations: Cell<usize>,
    outstanding_bytes: Cell<usize>,
    budget: Cell<Option<usize>>,
}

impl<A: Allocator> CountingAllocator<A> {
    pub fn new(inner: A) -> Self {
        Self {
            inner,
            allocations: Cell::new(0),
            deallocations: Cell::new(0),
            failed_deallocations: Cell::new(0),
            outstanding_bytes: Cell::new(0),
            budget: Cell::new(None),
        }
    }

    /// Allow `n` more successful allocations, then refuse the rest.
    pub fn fail_after(&self, n: usize) {
        self.budget.set(Some(n));
    }

    /// Remove the allocation budget.
    pub fn unlimited(&self) {
        self.budget.set(None);
    }

    pub fn allocations(&self) -> usize {
        self.allocations.get()
    }

    pub fn deallocations(&self) -> usize {
        self.deallocations.get()
    }

    pub fn failed_deallocations(&self) -> usize {
        self.failed_deallocations.get()
    }

    /// Blocks handed out and not yet returned.
    pub fn outstanding(&self) -> usize {
        self.allocations() - self.deallocations()
    }

    pub fn outstanding_bytes(&self) -> usize {
        self.outstanding_bytes.get()
    }

    pub fn inner(&self) -> &A {
        &self.inner
    }
}

impl<A: Allocator> Allocator for CountingAllocator<A> {
    fn allocate(&self, size: usize, alignment: usize) -> Result<Block, ArenaError> {
        if let Some(left) = self.budget.get() {
            if left == 0 {
                return Err(ArenaError::OutOfMemory {
                    requested: size,
                    alignment,
                    capacity: 0,
                });
            }
            self.budget.set(Some(left - 1));
        }
        let block = self.inner.allocate(size, alignment)?;
        self.allocations.set(self.allocations.get() + 1);
        self.outstanding_bytes.set(self.outstanding_bytes.get() + size);
        Ok(block)
    }

    fn deallocate(&self, block: Block, size: usize, alignment: usize) -> Result<(), ArenaError> {
        match self.inner.deallocate(block, size, alignment) {
            Ok(()) => {
                self.deallocations.set(self.deallocations.get() + 1);
                self.outstanding_bytes.set(self.outstanding_bytes.get() - size);
                Ok(())
            }
            Err(err) => {
                self.failed_deallocations
                    .set(self.failed_deallocations.get() + 1);
                Err(err)
            }
        }
    }

    fn id(&self) -> ArenaId {
        self.inner.id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use berth_arena::FixedArena;

    #[test]
    fn counts_forwarded_calls() {
        let alloc = CountingAllocator::new(FixedArena::default());
        let b = alloc.allocate(16, 8).unwrap();
        assert_eq!(alloc.allocations(), 1);
        assert_eq!(alloc.outstanding_bytes(), 16);
        alloc.deallocate(b, 16, 8).unwrap();
        assert_eq!(alloc.deallocations(), 1);
        assert_eq!(alloc.outstanding(), 0);
        assert!(alloc.deallocate(b, 16, 8).is_err());
        assert_eq!(alloc.failed_deallocations(), 1);
    }

    #[test]
    fn budget_refuses_allocations() {
        let alloc = CountingAllocator::new(FixedArena::default());
        alloc.fail_after(1);
        assert!(alloc.allocate(8, 8).is_ok());
        assert!(alloc.allocate(8, 8).is_err());
        alloc.unlimited();
        assert!(alloc.allocate(8, 8).is_ok());
        assert_eq!(alloc.inner().live_count(), 2);
    }

    #[test]
    fn identity_is_the_inner_arena() {
        let alloc = CountingAllocator::new(FixedArena::default());
        assert_eq!(alloc.id(), alloc.inner().id());
    }
}
