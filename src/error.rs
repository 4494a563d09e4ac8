//! Error type shared by every component of the crate.
//!
//! Nothing here is transient. Contract violations, uninitialized use and seed
//! exhaustion are reported to the caller and never retried internally.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrngError {
    /// A construction parameter is out of range (pool count, interval, capacity).
    InvalidArgument(&'static str),
    /// A generator was read before its first reseed.
    NotInitialized,
    /// A generator produced zero bytes where at least one was required.
    NoRandomData,
    /// A reseed was given key material of the wrong size.
    InvalidSeedLength { expected: usize, actual: usize },
    /// A parent source returned a short seed during a chain reseed.
    SeedUnavailable { needed: usize, received: usize },
}

impl fmt::Display for PrngError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrngError::InvalidArgument(what) => write!(f, "Invalid argument: {}", what),
            PrngError::NotInitialized => write!(f, "Generator not initialized"),
            PrngError::NoRandomData => write!(f, "No random data available"),
            PrngError::InvalidSeedLength { expected, actual } => {
                write!(f, "Invalid seed length: expected {} bytes, got {}", expected, actual)
            }
            PrngError::SeedUnavailable { needed, received } => {
                write!(f, "Unable to obtain seed: needed {} bytes, received {}", needed, received)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PrngError {}

impl PrngError {
    /// Stable numeric code, used when the error crosses into `rand_core`.
    pub fn code(&self) -> u32 {
        match self {
            PrngError::InvalidArgument(_) => 1,
            PrngError::NotInitialized => 2,
            PrngError::NoRandomData => 3,
            PrngError::InvalidSeedLength { .. } => 4,
            PrngError::SeedUnavailable { .. } => 5,
        }
    }
}
