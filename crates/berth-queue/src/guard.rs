//! Scope guard that returns a node block to its allocator.
//!
//! [`BlockGuard`] holds a freshly allocated block while the node value
//! is being constructed. If construction returns an error or unwinds,
//! the guard's drop releases the block, so a failed enqueue never leaks
//! arena space. Once the node is linked the guard is disarmed.

use std::alloc::Layout;

use berth_arena::{Allocator, Block};

/// Releases `block` on drop unless [`disarm`](BlockGuard::disarm)ed.
pub(crate) struct BlockGuard<'g, A: Allocator + ?Sized> {
    alloc: &'g A,
    block: Block,
    layout: Layout,
    armed: bool,
}

impl<'g, A: Allocator + ?Sized> BlockGuard<'g, A> {
    pub(crate) fn new(alloc: &'g A, block: Block, layout: Layout) -> Self {
        Self {
            alloc,
            block,
            layout,
            armed: true,
        }
    }

    pub(crate) fn block(&self) -> Block {
        self.block
    }

    /// Keep the block; the caller now owns its release.
    pub(crate) fn disarm(mut self) {
        self.armed = false;
    }
}

impl<A: Allocator + ?Sized> Drop for BlockGuard<'_, A> {
    fn drop(&mut self) {
        if self.armed {
            release_block(self.alloc, self.block, self.layout);
        }
    }
}

/// Return a queue-owned block to the allocator.
///
/// The queue only ever releases blocks it allocated and still holds, so
/// a rejection means the allocator's bookkeeping and the queue disagree.
/// That cannot be propagated from `Drop`; it is logged and trips a debug
/// assertion instead.
pub(crate) fn release_block<A: Allocator + ?Sized>(alloc: &A, block: Block, layout: Layout) {
    if let Err(err) = alloc.deallocate(block, layout.size(), layout.align()) {
        tracing::error!(error = %err, %block, "allocator rejected a queue node block");
        debug_assert!(false, "allocator rejected queue node block {block}: {err}");
    }
}
