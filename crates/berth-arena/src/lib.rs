//! Fixed-capacity arena allocation for Berth.
//!
//! A [`FixedArena`] owns one byte buffer whose size is fixed at
//! construction. Blocks are carved out first-fit by address: the
//! allocator walks the live regions in offset order and takes the first
//! gap that can hold the request at the requested alignment. Released
//! blocks leave a gap that later scans may fill; gaps are never merged
//! or compacted, so fragmentation is possible and is reported as
//! [`ArenaError::OutOfMemory`].
//!
//! # Architecture
//!
//! ```text
//! FixedArena
//! ├── ArenaConfig (capacity, validated once)
//! ├── Box<[u8]> backing storage (zeroed, never resized)
//! └── RegionMap (offset → len, ordered; the placement scan)
//! ```
//!
//! Clients depend on the [`Allocator`] trait and receive the arena by
//! reference. Everything an allocation returns is a [`Block`] handle
//! (arena id, offset, length), never a raw pointer.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod allocator;
pub mod config;
pub mod error;
pub mod fixed;
pub mod handle;
mod region;

// Public re-exports for the primary API surface.
pub use allocator::Allocator;
pub use config::ArenaConfig;
pub use error::ArenaError;
pub use fixed::FixedArena;
pub use handle::{ArenaId, Block};
