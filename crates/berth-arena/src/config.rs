//! Arena configuration parameters.

use crate::error::ArenaError;

/// Configuration for a [`FixedArena`](crate::FixedArena).
///
/// Validated at construction; the arena keeps its own copy, so changing
/// a config after the arena exists has no effect.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArenaConfig {
    /// Size of the backing buffer in bytes.
    ///
    /// Default: 1024. Must be non-zero.
    pub capacity: usize,
}

impl ArenaConfig {
    /// Default backing buffer size in bytes.
    pub const DEFAULT_CAPACITY: usize = 1024;

    /// Create a config for an arena of `capacity` bytes.
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Check that the configuration describes a usable arena.
    pub fn validate(&self) -> Result<(), ArenaError> {
        if self.capacity == 0 {
            return Err(ArenaError::InvalidConfig {
                reason: "capacity must be non-zero".into(),
            });
        }
        // Offsets are handed out as usize and must leave room for `offset + len`.
        if self.capacity > isize::MAX as usize {
            return Err(ArenaError::InvalidConfig {
                reason: format!("capacity {} exceeds isize::MAX", self.capacity),
            });
        }
        Ok(())
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_capacity_is_1k() {
        assert_eq!(ArenaConfig::default().capacity, 1024);
    }

    #[test]
    fn zero_capacity_rejected() {
        let result = ArenaConfig::new(0).validate();
        assert!(matches!(result, Err(ArenaError::InvalidConfig { .. })));
    }

    #[test]
    fn oversized_capacity_rejected() {
        let result = ArenaConfig::new(usize::MAX).validate();
        assert!(matches!(result, Err(ArenaError::InvalidConfig { .. })));
    }

    #[test]
    fn small_capacity_accepted() {
        assert!(ArenaConfig::new(1).validate().is_ok());
    }
}
