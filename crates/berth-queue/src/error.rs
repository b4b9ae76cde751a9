//! Queue error types.

use std::error::Error;
use std::fmt;

use berth_arena::ArenaError;

/// Why a constructing enqueue did not add a node.
///
/// In both cases the queue and its allocator are exactly as they were
/// before the call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EnqueueError<E> {
    /// The allocator could not provide a node block.
    Alloc(ArenaError),
    /// The value constructor failed; its node block was released.
    Construct(E),
}

impl<E: fmt::Display> fmt::Display for EnqueueError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Alloc(err) => write!(f, "node allocation failed: {err}"),
            Self::Construct(err) => write!(f, "value construction failed: {err}"),
        }
    }
}

impl<E: Error + 'static> Error for EnqueueError<E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Alloc(err) => Some(err),
            Self::Construct(err) => Some(err),
        }
    }
}

impl<E> From<ArenaError> for EnqueueError<E> {
    fn from(err: ArenaError) -> Self {
        Self::Alloc(err)
    }
}
