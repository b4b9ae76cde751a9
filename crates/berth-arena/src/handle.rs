//! Arena identities and block handles.
//!
//! A [`Block`] is the "address" an arena hands out: the byte range it
//! reserved plus the [`ArenaId`] of the arena that reserved it. Blocks
//! are plain values; they do not keep the arena alive and do not free
//! anything on drop.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique [`ArenaId`] allocation.
static ARENA_INSTANCE_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique per-instance identifier for an arena.
///
/// Allocated from a monotonic atomic counter via [`ArenaId::next`]. Two
/// distinct arenas always have different IDs, even if they have the same
/// capacity and the same live regions. Equality of allocators is identity
/// equality, so this is what gets compared.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArenaId(u64);

impl ArenaId {
    /// Allocate a fresh, unique instance ID.
    pub fn next() -> Self {
        Self(ARENA_INSTANCE_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw counter value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ArenaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "arena#{}", self.0)
    }
}

/// A byte range reserved in an arena.
///
/// Returned by [`Allocator::allocate`](crate::Allocator::allocate) and
/// passed back to [`Allocator::deallocate`](crate::Allocator::deallocate).
/// Copying a block does not duplicate the reservation: releasing any copy
/// releases the range, and releasing a second copy is a double free.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[must_use]
pub struct Block {
    pub(crate) arena: ArenaId,
    pub(crate) offset: usize,
    pub(crate) len: usize,
}

impl Block {
    /// Create a block handle. Only arenas mint blocks.
    pub(crate) fn new(arena: ArenaId, offset: usize, len: usize) -> Self {
        Self { arena, offset, len }
    }

    /// The arena this block was reserved in.
    pub fn arena(&self) -> ArenaId {
        self.arena
    }

    /// Byte offset of the block within the arena's backing storage.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Length of the block in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the block is zero-length. Arenas never hand these out.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// One past the last byte of the block.
    pub fn end(&self) -> usize {
        self.offset + self.len
    }

    /// Whether two blocks share at least one byte of the same arena.
    pub fn overlaps(&self, other: &Block) -> bool {
        self.arena == other.arena && self.offset < other.end() && other.offset < self.end()
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Block({}, off={}, len={})",
            self.arena, self.offset, self.len
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arena_ids_are_unique() {
        let a = ArenaId::next();
        let b = ArenaId::next();
        assert_ne!(a, b);
        assert!(b.get() > a.get());
    }

    #[test]
    fn block_accessors() {
        let id = ArenaId::next();
        let b = Block::new(id, 16, 32);
        assert_eq!(b.arena(), id);
        assert_eq!(b.offset(), 16);
        assert_eq!(b.len(), 32);
        assert_eq!(b.end(), 48);
        assert!(!b.is_empty());
    }

    #[test]
    fn adjacent_blocks_do_not_overlap() {
        let id = ArenaId::next();
        let a = Block::new(id, 0, 8);
        let b = Block::new(id, 8, 8);
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn blocks_in_different_arenas_never_overlap() {
        let a = Block::new(ArenaId::next(), 0, 8);
        let b = Block::new(ArenaId::next(), 0, 8);
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn nested_blocks_overlap() {
        let id = ArenaId::next();
        let outer = Block::new(id, 0, 64);
        let inner = Block::new(id, 8, 4);
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }
}
