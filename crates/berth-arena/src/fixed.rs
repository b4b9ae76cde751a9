//! The fixed-capacity arena.
//!
//! [`FixedArena`] owns a zero-initialised byte buffer of exactly
//! `capacity` bytes and a region map of the ranges currently handed
//! out. Allocation is first-fit by address over the gaps between live
//! regions; deallocation just forgets the region. There is no growth,
//! no coalescing pass and no compaction.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;

use crate::allocator::Allocator;
use crate::config::ArenaConfig;
use crate::error::ArenaError;
use crate::handle::{ArenaId, Block};
use crate::region::RegionMap;

/// A bounded arena with reuse of freed gaps.
///
/// Single-threaded: bookkeeping lives in `RefCell`s, so the arena is
/// `!Sync` and can be shared by reference between several clients on
/// one thread.
///
/// Repeated allocation and release of varying sizes can fail with
/// [`ArenaError::OutOfMemory`] even when [`free_bytes`](Self::free_bytes)
/// exceeds the request, because free space is only usable where it is
/// contiguous.
pub struct FixedArena {
    id: ArenaId,
    config: ArenaConfig,
    /// Backing storage. Allocated to full capacity at creation.
    storage: RefCell<Box<[u8]>>,
    regions: RefCell<RegionMap>,
}

impl FixedArena {
    /// Create an arena from a validated config.
    pub fn new(config: ArenaConfig) -> Result<Self, ArenaError> {
        config.validate()?;
        Ok(Self::from_valid(config))
    }

    /// Create an arena of `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Result<Self, ArenaError> {
        Self::new(ArenaConfig::new(capacity))
    }

    fn from_valid(config: ArenaConfig) -> Self {
        let storage = vec![0u8; config.capacity].into_boxed_slice();
        Self {
            id: ArenaId::next(),
            config,
            storage: RefCell::new(storage),
            regions: RefCell::new(RegionMap::new()),
        }
    }

    /// Reserve `size` bytes aligned to `alignment`.
    ///
    /// Returns the lowest-offset placement found by the gap scan. The
    /// bytes of the returned block are zeroed. On failure nothing changes.
    ///
    /// Fails with [`ArenaError::StorageBorrowed`] while a
    /// [`read`](Self::read) or [`write`](Self::write) guard is held.
    pub fn allocate(&self, size: usize, alignment: usize) -> Result<Block, ArenaError> {
        check_layout(size, alignment)?;
        let capacity = self.config.capacity;
        let out_of_memory = || ArenaError::OutOfMemory {
            requested: size,
            alignment,
            capacity,
        };

        // Neither can ever fit, whatever the live set looks like.
        if size > capacity || alignment > capacity {
            tracing::debug!(arena = %self.id, size, alignment, capacity, "request can never fit");
            return Err(out_of_memory());
        }

        // Taken before the region map is touched so a refusal leaves no trace.
        let Ok(mut storage) = self.storage.try_borrow_mut() else {
            tracing::warn!(arena = %self.id, size, alignment, "allocation while storage is borrowed");
            return Err(ArenaError::StorageBorrowed);
        };
        let mut regions = self.regions.borrow_mut();
        let Some(offset) = regions.find_fit(size, alignment, capacity) else {
            tracing::debug!(
                arena = %self.id,
                size,
                alignment,
                live = regions.len(),
                live_bytes = regions.live_bytes(),
                "no gap fits request"
            );
            return Err(out_of_memory());
        };
        storage[offset..offset + size].fill(0);
        regions.insert(offset, size);
        tracing::debug!(arena = %self.id, offset, size, alignment, "allocated block");
        Ok(Block::new(self.id, offset, size))
    }

    /// Release a block so its range can be reused by later allocations.
    ///
    /// The live region starting at the block's offset is forgotten. If
    /// there is none, or the block belongs to another arena, the call
    /// fails with [`ArenaError::InvalidDeallocation`] and nothing changes.
    /// `size` and `alignment` must match the original request; only the
    /// size is checked, and only in debug builds.
    pub fn deallocate(&self, block: Block, size: usize, alignment: usize) -> Result<(), ArenaError> {
        debug_assert!(alignment.is_power_of_two(), "alignment {alignment} is not a power of two");

        let invalid = ArenaError::InvalidDeallocation {
            offset: block.offset,
        };
        if block.arena != self.id {
            tracing::warn!(
                arena = %self.id,
                owner = %block.arena,
                offset = block.offset,
                "deallocation of a block from another arena"
            );
            return Err(invalid);
        }

        match self.regions.borrow_mut().remove(block.offset) {
            Some(len) => {
                debug_assert_eq!(size, len, "deallocate size differs from the live region's");
                tracing::debug!(arena = %self.id, offset = block.offset, len, "released block");
                Ok(())
            }
            None => {
                tracing::warn!(
                    arena = %self.id,
                    offset = block.offset,
                    "deallocation of a block that is not live"
                );
                Err(invalid)
            }
        }
    }

    /// Borrow the bytes of a live block.
    pub fn read(&self, block: Block) -> Result<Ref<'_, [u8]>, ArenaError> {
        self.check_live(block)?;
        Ok(Ref::map(self.storage.borrow(), |s| &s[block.offset..block.end()]))
    }

    /// Mutably borrow the bytes of a live block.
    ///
    /// # Panics
    ///
    /// Panics if another [`read`](Self::read) or `write` guard is held.
    pub fn write(&self, block: Block) -> Result<RefMut<'_, [u8]>, ArenaError> {
        self.check_live(block)?;
        Ok(RefMut::map(self.storage.borrow_mut(), |s| {
            &mut s[block.offset..block.end()]
        }))
    }

    fn check_live(&self, block: Block) -> Result<(), ArenaError> {
        let live = block.arena == self.id && self.regions.borrow().get(block.offset) == Some(block.len);
        if live {
            Ok(())
        } else {
            Err(ArenaError::UnknownBlock {
                offset: block.offset,
            })
        }
    }

    /// Whether `block` is currently allocated in this arena.
    pub fn is_live(&self, block: Block) -> bool {
        self.check_live(block).is_ok()
    }

    /// Identity of this arena.
    pub fn id(&self) -> ArenaId {
        self.id
    }

    /// The configuration this arena was built from.
    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    /// Total size of the backing buffer in bytes.
    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    /// Number of live blocks.
    pub fn live_count(&self) -> usize {
        self.regions.borrow().len()
    }

    /// Bytes covered by live blocks. Alignment padding is not counted.
    pub fn live_bytes(&self) -> usize {
        self.regions.borrow().live_bytes()
    }

    /// Bytes not covered by any live block, contiguous or not.
    pub fn free_bytes(&self) -> usize {
        self.config.capacity - self.live_bytes()
    }

    /// Snapshot of the live regions as `(offset, len)`, ascending by offset.
    pub fn regions(&self) -> Vec<(usize, usize)> {
        self.regions.borrow().iter().collect()
    }
}

fn check_layout(size: usize, alignment: usize) -> Result<(), ArenaError> {
    if size == 0 || !alignment.is_power_of_two() {
        return Err(ArenaError::InvalidLayout { size, alignment });
    }
    Ok(())
}

impl Default for FixedArena {
    fn default() -> Self {
        Self::from_valid(ArenaConfig::default())
    }
}

impl PartialEq for FixedArena {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for FixedArena {}

impl fmt::Debug for FixedArena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FixedArena")
            .field("id", &self.id)
            .field("capacity", &self.config.capacity)
            .field("live_count", &self.live_count())
            .field("live_bytes", &self.live_bytes())
            .finish()
    }
}

impl Allocator for FixedArena {
    fn allocate(&self, size: usize, alignment: usize) -> Result<Block, ArenaError> {
        FixedArena::allocate(self, size, alignment)
    }

    fn deallocate(&self, block: Block, size: usize, alignment: usize) -> Result<(), ArenaError> {
        FixedArena::deallocate(self, block, size, alignment)
    }

    fn id(&self) -> ArenaId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arena(capacity: usize) -> FixedArena {
        FixedArena::with_capacity(capacity).unwrap()
    }

    #[test]
    fn first_allocation_lands_at_zero() {
        let a = arena(64);
        let b = a.allocate(16, 8).unwrap();
        assert_eq!(b.offset(), 0);
        assert_eq!(b.len(), 16);
        assert_eq!(b.arena(), a.id());
    }

    #[test]
    fn sequential_allocations_are_packed() {
        let a = arena(64);
        let b1 = a.allocate(3, 1).unwrap();
        let b2 = a.allocate(5, 1).unwrap();
        assert_eq!(b1.offset(), 0);
        assert_eq!(b2.offset(), 3);
        assert_eq!(a.live_bytes(), 8);
    }

    #[test]
    fn alignment_pads_between_blocks() {
        let a = arena(64);
        let _ = a.allocate(3, 1).unwrap();
        let b = a.allocate(8, 8).unwrap();
        assert_eq!(b.offset(), 8);
        assert_eq!(a.live_bytes(), 11);
        assert_eq!(a.free_bytes(), 53);
    }

    #[test]
    fn request_larger_than_capacity_fails() {
        let a = arena(32);
        let result = a.allocate(33, 1);
        assert_eq!(
            result,
            Err(ArenaError::OutOfMemory {
                requested: 33,
                alignment: 1,
                capacity: 32,
            })
        );
        assert_eq!(a.live_count(), 0);
    }

    #[test]
    fn alignment_larger_than_capacity_fails() {
        let a = arena(32);
        let result = a.allocate(1, 64);
        assert!(matches!(result, Err(ArenaError::OutOfMemory { .. })));
    }

    #[test]
    fn exactly_remaining_tail_succeeds() {
        let a = arena(32);
        let _ = a.allocate(20, 1).unwrap();
        let tail = a.allocate(12, 1).unwrap();
        assert_eq!(tail.offset(), 20);
        assert_eq!(a.free_bytes(), 0);
        assert!(a.allocate(1, 1).is_err());
    }

    #[test]
    fn whole_capacity_in_one_block() {
        let a = arena(128);
        assert!(a.allocate(128, 128).is_ok());
    }

    #[test]
    fn zero_size_is_invalid_layout() {
        let a = arena(32);
        assert_eq!(
            a.allocate(0, 1),
            Err(ArenaError::InvalidLayout {
                size: 0,
                alignment: 1,
            })
        );
    }

    #[test]
    fn non_power_of_two_alignment_is_invalid_layout() {
        let a = arena(32);
        assert!(matches!(
            a.allocate(4, 3),
            Err(ArenaError::InvalidLayout { .. })
        ));
        assert!(matches!(
            a.allocate(4, 0),
            Err(ArenaError::InvalidLayout { .. })
        ));
    }

    #[test]
    fn freed_gap_is_reused_first() {
        let a = arena(64);
        let b1 = a.allocate(16, 1).unwrap();
        let _b2 = a.allocate(16, 1).unwrap();
        a.deallocate(b1, 16, 1).unwrap();
        let b3 = a.allocate(8, 1).unwrap();
        assert_eq!(b3.offset(), 0);
    }

    #[test]
    fn adjacent_freed_gaps_are_usable_together() {
        let a = arena(48);
        let b1 = a.allocate(16, 1).unwrap();
        let b2 = a.allocate(16, 1).unwrap();
        let _b3 = a.allocate(16, 1).unwrap();
        a.deallocate(b1, 16, 1).unwrap();
        a.deallocate(b2, 16, 1).unwrap();
        // No region remains before offset 32, so the scan sees one 32-byte gap.
        let big = a.allocate(32, 1).unwrap();
        assert_eq!(big.offset(), 0);
    }

    #[test]
    fn fragmentation_fails_despite_enough_free_bytes() {
        let a = arena(48);
        let b1 = a.allocate(16, 1).unwrap();
        let _b2 = a.allocate(16, 1).unwrap();
        let b3 = a.allocate(16, 1).unwrap();
        a.deallocate(b1, 16, 1).unwrap();
        a.deallocate(b3, 16, 1).unwrap();
        assert_eq!(a.free_bytes(), 32);
        assert!(matches!(
            a.allocate(32, 1),
            Err(ArenaError::OutOfMemory { .. })
        ));
    }

    #[test]
    fn double_free_is_invalid_deallocation() {
        let a = arena(64);
        let b = a.allocate(8, 8).unwrap();
        a.deallocate(b, 8, 8).unwrap();
        assert_eq!(
            a.deallocate(b, 8, 8),
            Err(ArenaError::InvalidDeallocation { offset: 0 })
        );
    }

    #[test]
    fn double_free_with_wrong_size_is_invalid_deallocation() {
        let a = arena(64);
        let b = a.allocate(8, 8).unwrap();
        a.deallocate(b, 8, 8).unwrap();
        assert_eq!(
            a.deallocate(b, 24, 8),
            Err(ArenaError::InvalidDeallocation { offset: 0 })
        );
    }

    #[test]
    fn allocation_refused_while_read_guard_held() {
        let a = arena(64);
        let b = a.allocate(8, 1).unwrap();
        {
            let _guard = a.read(b).unwrap();
            assert_eq!(a.allocate(8, 1), Err(ArenaError::StorageBorrowed));
            assert_eq!(a.live_count(), 1);
            assert_eq!(a.live_bytes(), 8);
        }
        let next = a.allocate(8, 1).unwrap();
        assert_eq!(next.offset(), 8);
        assert_eq!(a.live_count(), 2);
    }

    #[test]
    fn allocation_refused_while_write_guard_held() {
        let a = arena(64);
        let b = a.allocate(8, 1).unwrap();
        let mut guard = a.write(b).unwrap();
        guard.fill(0x5A);
        assert_eq!(a.allocate(4, 1), Err(ArenaError::StorageBorrowed));
        drop(guard);
        assert_eq!(a.live_count(), 1);
        assert_eq!(&*a.read(b).unwrap(), &[0x5A; 8]);
    }

    #[test]
    fn foreign_block_is_invalid_deallocation() {
        let a = arena(64);
        let other = arena(64);
        let _mine = a.allocate(8, 8).unwrap();
        let theirs = other.allocate(8, 8).unwrap();
        // Same offset, but minted by another arena.
        assert!(matches!(
            a.deallocate(theirs, 8, 8),
            Err(ArenaError::InvalidDeallocation { .. })
        ));
        assert_eq!(a.live_count(), 1);
        assert_eq!(other.live_count(), 1);
    }

    #[test]
    fn fresh_block_is_zeroed() {
        let a = arena(16);
        let b = a.allocate(8, 1).unwrap();
        a.write(b).unwrap().fill(0xAB);
        a.deallocate(b, 8, 1).unwrap();
        let again = a.allocate(8, 1).unwrap();
        assert_eq!(again.offset(), 0);
        assert!(a.read(again).unwrap().iter().all(|&byte| byte == 0));
    }

    #[test]
    fn write_then_read_roundtrip() {
        let a = arena(16);
        let b = a.allocate(4, 4).unwrap();
        a.write(b).unwrap().copy_from_slice(&[1, 2, 3, 4]);
        assert_eq!(&*a.read(b).unwrap(), &[1, 2, 3, 4]);
    }

    #[test]
    fn access_to_released_block_is_unknown_block() {
        let a = arena(16);
        let b = a.allocate(4, 4).unwrap();
        a.deallocate(b, 4, 4).unwrap();
        assert!(!a.is_live(b));
        assert!(matches!(a.read(b), Err(ArenaError::UnknownBlock { offset: 0 })));
    }

    #[test]
    fn arenas_compare_by_identity() {
        let a = arena(16);
        let b = arena(16);
        assert_eq!(a, a);
        assert_ne!(a, b);
        assert!(Allocator::is_same(&a, &a));
        assert!(!Allocator::is_same(&a, &b));
    }

    #[test]
    fn regions_snapshot_is_sorted() {
        let a = arena(64);
        let b1 = a.allocate(8, 1).unwrap();
        let _b2 = a.allocate(8, 1).unwrap();
        a.deallocate(b1, 8, 1).unwrap();
        let _b3 = a.allocate(4, 1).unwrap();
        assert_eq!(a.regions(), vec![(0, 4), (8, 8)]);
    }

    #[test]
    fn default_arena_has_default_capacity() {
        let a = FixedArena::default();
        assert_eq!(a.capacity(), ArenaConfig::DEFAULT_CAPACITY);
    }

    #[test]
    fn zero_capacity_arena_is_rejected() {
        assert!(matches!(
            FixedArena::with_capacity(0),
            Err(ArenaError::InvalidConfig { .. })
        ));
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn live_blocks_never_overlap(
                ops in proptest::collection::vec((1usize..96, 0u32..6, any::<bool>()), 1..80),
            ) {
                let a = FixedArena::with_capacity(1024).unwrap();
                let mut live: Vec<(Block, usize)> = Vec::new();
                for (size, align_pow, release) in ops {
                    let alignment = 1usize << align_pow;
                    if release && !live.is_empty() {
                        let (block, align) = live.swap_remove(size % live.len());
                        prop_assert!(a.deallocate(block, block.len(), align).is_ok());
                    }
                    if let Ok(block) = a.allocate(size, alignment) {
                        prop_assert_eq!(block.offset() % alignment, 0);
                        prop_assert!(block.end() <= a.capacity());
                        for (other, _) in &live {
                            prop_assert!(!block.overlaps(other));
                        }
                        live.push((block, alignment));
                    }
                }
                prop_assert_eq!(a.live_count(), live.len());
            }

            #[test]
            fn oversized_requests_always_fail(
                extra in 1usize..4096,
                align_pow in 0u32..12,
            ) {
                let a = FixedArena::with_capacity(256).unwrap();
                let result = a.allocate(256 + extra, 1usize << align_pow);
                let is_oom = matches!(result, Err(ArenaError::OutOfMemory { .. }));
                prop_assert!(is_oom);
            }

            #[test]
            fn every_live_block_frees_exactly_once(
                sizes in proptest::collection::vec(1usize..32, 1..30),
            ) {
                let a = FixedArena::with_capacity(512).unwrap();
                let blocks: Vec<Block> = sizes
                    .iter()
                    .filter_map(|&s| a.allocate(s, 1).ok())
                    .collect();
                for b in &blocks {
                    prop_assert!(a.deallocate(*b, b.len(), 1).is_ok());
                }
                for b in &blocks {
                    let is_invalid = matches!(
                        a.deallocate(*b, b.len(), 1),
                        Err(ArenaError::InvalidDeallocation { .. })
                    );
                    prop_assert!(is_invalid);
                }
                prop_assert_eq!(a.live_count(), 0);
            }
        }
    }
}
