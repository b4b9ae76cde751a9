//! Arena-specific error types.

use std::error::Error;
use std::fmt;

/// Errors that can occur during arena operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// No gap of sufficient size and alignment exists within capacity.
    ///
    /// Always recoverable: freeing other blocks may make room.
    OutOfMemory {
        /// Number of bytes requested.
        requested: usize,
        /// Alignment requested, in bytes.
        alignment: usize,
        /// Total capacity of the arena in bytes.
        capacity: usize,
    },
    /// The block is not among the arena's live regions (double free or
    /// a block handed out by a different arena).
    ///
    /// This is a contract violation by the caller, not an expected
    /// runtime condition.
    InvalidDeallocation {
        /// Offset the caller tried to release.
        offset: usize,
    },
    /// A zero-sized request or a non-power-of-two alignment.
    InvalidLayout {
        /// Requested size in bytes.
        size: usize,
        /// Requested alignment in bytes.
        alignment: usize,
    },
    /// The arena configuration was rejected at construction.
    InvalidConfig {
        /// Why the configuration is invalid.
        reason: String,
    },
    /// Byte access through a block that is not currently live.
    UnknownBlock {
        /// Offset of the block that was accessed.
        offset: usize,
    },
    /// Allocation needs to zero the new block, but a `read` or `write`
    /// guard on the backing storage is still held.
    StorageBorrowed,
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfMemory {
                requested,
                alignment,
                capacity,
            } => {
                write!(
                    f,
                    "arena out of memory: requested {requested} bytes (align {alignment}), capacity {capacity} bytes"
                )
            }
            Self::InvalidDeallocation { offset } => {
                write!(f, "invalid deallocation at offset {offset}")
            }
            Self::InvalidLayout { size, alignment } => {
                write!(f, "invalid layout: size {size}, alignment {alignment}")
            }
            Self::InvalidConfig { reason } => {
                write!(f, "invalid arena config: {reason}")
            }
            Self::UnknownBlock { offset } => {
                write!(f, "no live block at offset {offset}")
            }
            Self::StorageBorrowed => {
                write!(f, "arena storage is borrowed by an outstanding byte guard")
            }
        }
    }
}

impl Error for ArenaError {}
