//! Berth: a fixed-capacity arena allocator and an arena-backed FIFO queue.
//!
//! This is the top-level facade crate that re-exports the public API of
//! the Berth sub-crates. For most users, adding `berth` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use berth::prelude::*;
//!
//! let arena = FixedArena::new(ArenaConfig::new(1024)).unwrap();
//! let mut queue = ArenaQueue::new(&arena);
//! queue.enqueue(1u32).unwrap();
//! queue.enqueue(2).unwrap();
//! queue.enqueue(3).unwrap();
//!
//! assert_eq!(queue.len(), 3);
//! assert_eq!(queue.front(), Some(&1));
//! assert_eq!(queue.back(), Some(&3));
//! assert_eq!(queue.iter().copied().collect::<Vec<_>>(), [1, 2, 3]);
//!
//! // Every node occupies one live block until it is removed.
//! assert_eq!(arena.live_count(), 3);
//! queue.clear();
//! assert_eq!(arena.live_count(), 0);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`arena`] | `berth-arena` | `FixedArena`, `Allocator`, `Block`, `ArenaConfig`, `ArenaError` |
//! | [`queue`] | `berth-queue` | `ArenaQueue`, `Iter`, `EnqueueError` |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Fixed-capacity arena allocation (`berth-arena`).
pub mod arena {
    pub use berth_arena::*;
}

/// Arena-backed FIFO queue (`berth-queue`).
pub mod queue {
    pub use berth_queue::*;
}

/// The types most programs need.
pub mod prelude {
    pub use berth_arena::{Allocator, ArenaConfig, ArenaError, Block, FixedArena};
    pub use berth_queue::{ArenaQueue, EnqueueError};
}
