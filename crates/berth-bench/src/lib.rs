//! Benchmark workloads for Berth.
//!
//! Provides deterministic allocate/free churn sequences for exercising
//! the arena's gap scan:
//!
//! - [`churn_workload`]: seeded mix of allocations and releases
//! - [`run_churn`]: replay a workload against any [`Allocator`]

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use berth_arena::{Allocator, Block};
use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// One step of a churn workload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChurnOp {
    /// Request `size` bytes at `alignment`.
    Alloc { size: usize, alignment: usize },
    /// Release the live block at `pick % live_count`, if any.
    Free { pick: usize },
}

/// Outcome counters from [`run_churn`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChurnStats {
    pub allocated: usize,
    pub refused: usize,
    pub freed: usize,
}

/// Build a seeded workload of `len` steps.
///
/// Roughly 60% of steps allocate between 1 and `max_size` bytes at an
/// alignment from 1 to 16; the rest free a pseudo-randomly chosen block.
pub fn churn_workload(seed: u64, len: usize, max_size: usize) -> Vec<ChurnOp> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..len)
        .map(|_| {
            let roll = rng.next_u64();
            if roll % 10 < 6 {
                let size = 1 + (rng.next_u64() as usize) % max_size.max(1);
                let alignment = 1usize << (rng.next_u64() % 5);
                ChurnOp::Alloc { size, alignment }
            } else {
                ChurnOp::Free {
                    pick: rng.next_u64() as usize,
                }
            }
        })
        .collect()
}

/// Replay `ops` against `alloc`, then release whatever is still live.
///
/// Every block handed out is released exactly once.
pub fn run_churn<A: Allocator + ?Sized>(alloc: &A, ops: &[ChurnOp]) -> ChurnStats {
    let mut live: Vec<(Block, usize)> = Vec::new();
    let mut stats = ChurnStats::default();
    for op in ops {
        match *op {
            ChurnOp::Alloc { size, alignment } => match alloc.allocate(size, alignment) {
                Ok(block) => {
                    live.push((block, alignment));
                    stats.allocated += 1;
                }
                Err(_) => stats.refused += 1,
            },
            ChurnOp::Free { pick } => {
                if !live.is_empty() {
                    let (block, alignment) = live.swap_remove(pick % live.len());
                    if alloc.deallocate(block, block.len(), alignment).is_ok() {
                        stats.freed += 1;
                    }
                }
            }
        }
    }
    for (block, alignment) in live.drain(..) {
        if alloc.deallocate(block, block.len(), alignment).is_ok() {
            stats.freed += 1;
        }
    }
    stats
}
