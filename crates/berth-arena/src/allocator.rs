//! The allocation capability consumed by arena clients.

use crate::error::ArenaError;
use crate::handle::{ArenaId, Block};

/// Something that hands out and takes back byte blocks.
///
/// Clients such as `berth-queue` depend on this trait rather than on a
/// concrete arena, and receive it by reference at construction. Methods
/// take `&self`: implementations are single-threaded and keep their
/// bookkeeping behind interior mutability, so several clients can share
/// one allocator.
pub trait Allocator {
    /// Reserve `size` bytes aligned to `alignment`.
    ///
    /// `size` must be non-zero and `alignment` a power of two. Fails with
    /// [`ArenaError::OutOfMemory`] when no suitable gap exists; the
    /// allocator is unchanged in that case.
    fn allocate(&self, size: usize, alignment: usize) -> Result<Block, ArenaError>;

    /// Release a block previously returned by [`allocate`](Self::allocate)
    /// on this same allocator.
    ///
    /// `size` and `alignment` must be the values used to allocate it.
    /// Releasing a block twice, or one from another allocator, fails with
    /// [`ArenaError::InvalidDeallocation`].
    fn deallocate(&self, block: Block, size: usize, alignment: usize) -> Result<(), ArenaError>;

    /// Identity of the allocator instance.
    fn id(&self) -> ArenaId;

    /// Whether `other` is the very same allocator instance.
    fn is_same(&self, other: &dyn Allocator) -> bool {
        self.id() == other.id()
    }
}

impl<A: Allocator + ?Sized> Allocator for &A {
    fn allocate(&self, size: usize, alignment: usize) -> Result<Block, ArenaError> {
        (**self).allocate(size, alignment)
    }

    fn deallocate(&self, block: Block, size: usize, alignment: usize) -> Result<(), ArenaError> {
        (**self).deallocate(block, size, alignment)
    }

    fn id(&self) -> ArenaId {
        (**self).id()
    }
}
