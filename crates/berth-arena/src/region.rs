//! Live region bookkeeping and first-fit placement.
//!
//! [`RegionMap`] records every reserved `[offset, offset + len)` range,
//! keyed by offset so the placement scan walks regions in address order
//! without re-sorting. Freed ranges are simply removed; neighbouring gaps
//! are never merged, the scan just walks past whatever is no longer there.

use std::collections::BTreeMap;

/// Round `value` up to the next multiple of `alignment`.
///
/// `alignment` must be a power of two. Returns `None` on overflow.
pub(crate) fn align_up(value: usize, alignment: usize) -> Option<usize> {
    debug_assert!(alignment.is_power_of_two());
    let mask = alignment - 1;
    value.checked_add(mask).map(|v| v & !mask)
}

/// The set of live regions of one arena.
#[derive(Clone, Debug, Default)]
pub(crate) struct RegionMap {
    /// offset -> length. Regions never overlap.
    regions: BTreeMap<usize, usize>,
    /// Sum of all region lengths.
    live_bytes: usize,
}

impl RegionMap {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Find the lowest offset where `size` bytes aligned to `alignment`
    /// fit within `capacity` without touching a live region.
    ///
    /// Walks regions in ascending offset with a cursor starting at zero.
    /// At each region the cursor is aligned; if the request fits before
    /// the region starts the search stops, otherwise the cursor jumps to
    /// the region's end. Past the last region the cursor is aligned once
    /// more and checked against `capacity`.
    pub(crate) fn find_fit(&self, size: usize, alignment: usize, capacity: usize) -> Option<usize> {
        let mut cursor = 0usize;
        for (&start, &len) in &self.regions {
            let aligned = align_up(cursor, alignment)?;
            if aligned.checked_add(size)? <= start {
                break;
            }
            cursor = start + len;
        }
        let candidate = align_up(cursor, alignment)?;
        if candidate.checked_add(size)? > capacity {
            return None;
        }
        Some(candidate)
    }

    /// Record a new live region. The caller guarantees it is free.
    pub(crate) fn insert(&mut self, offset: usize, len: usize) {
        debug_assert!(!self.overlaps(offset, len), "region {offset}+{len} overlaps");
        self.regions.insert(offset, len);
        self.live_bytes += len;
    }

    /// Forget the region starting at `offset`, returning its length.
    pub(crate) fn remove(&mut self, offset: usize) -> Option<usize> {
        let len = self.regions.remove(&offset)?;
        self.live_bytes -= len;
        Some(len)
    }

    /// Length of the region starting exactly at `offset`, if live.
    pub(crate) fn get(&self, offset: usize) -> Option<usize> {
        self.regions.get(&offset).copied()
    }

    pub(crate) fn len(&self) -> usize {
        self.regions.len()
    }

    pub(crate) fn live_bytes(&self) -> usize {
        self.live_bytes
    }

    /// Live regions as `(offset, len)` in ascending offset order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.regions.iter().map(|(&off, &len)| (off, len))
    }

    fn overlaps(&self, offset: usize, len: usize) -> bool {
        let end = offset + len;
        // Only the nearest region at or before `offset` and those starting
        // inside `[offset, end)` can intersect.
        if let Some((&start, &l)) = self.regions.range(..=offset).next_back() {
            if start + l > offset {
                return true;
            }
        }
        self.regions.range(offset..end).next().is_some()
    }
}
