//! A singly-linked FIFO queue whose nodes are reserved in a Berth arena.
//!
//! [`ArenaQueue`] is a client of the [`Allocator`](berth_arena::Allocator)
//! trait: every node it creates first reserves a node-sized block, and
//! every node it discards gives that block back. The allocator is passed
//! in by reference and outlives the queue.
//!
//! Nodes are held in a slab and linked by integer index; the chain from
//! head to tail owns them and head/tail are lookup-only handles. There
//! are no raw pointers, so a node can be neither freed twice nor used
//! after it is gone.
//!
//! # Failure model
//!
//! - Allocation failures surface as [`ArenaError`](berth_arena::ArenaError)
//!   and leave the queue unchanged.
//! - Constructor failures (an `Err` from
//!   [`try_enqueue_with`](ArenaQueue::try_enqueue_with) or a panic while
//!   building the value) release the reserved block before surfacing.
//! - Peeking an empty queue returns `None`.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
mod guard;
pub mod iter;
mod node;
pub mod queue;

pub use error::EnqueueError;
pub use iter::Iter;
pub use queue::ArenaQueue;
