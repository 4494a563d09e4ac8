//! Entropy pools.
//!
//! An extractor accumulates injected entropy and, when read, emits a short
//! digest of everything it has absorbed. Every read mixes a read counter into
//! the pool first, so the same accumulated entropy never yields the same
//! output twice, and ends with an irreversible rekey, so later exposure of
//! the pool state does not reveal earlier outputs.
//!
//! # Backends
//! - `sponge`: Keccak sponge at 256-bit security, 64-byte digest.
//! - `sha_double`: classic Fortuna SHA-d256 pool, 32-byte digest.
//! - `blake`: keyed BLAKE3 pool, 32-byte digest.
//!
//! Extractors are not internally synchronized; the accumulator holds each one
//! behind its own pool lock.

pub mod blake;
pub mod sha_double;
pub mod sponge;

pub use blake::{Blake3Extractor, Blake3ExtractorFactory};
pub use sha_double::{ShaDouble256, ShaDoubleExtractor, ShaDoubleExtractorFactory};
pub use sponge::{SpongeExtractor, SpongeExtractorFactory};

use alloc::boxed::Box;

/// Bytes a pool must absorb after a reset before it may be stirred.
pub const AVAILABLE_THRESHOLD: u64 = 64;

pub trait EntropyExtractor: Send {
    /// Largest digest a single `read` can emit.
    fn byte_capacity(&self) -> usize;

    /// Bytes absorbed since the last reset.
    fn bytes_written(&self) -> u64;

    /// Number of reads since the last reset.
    fn read_count(&self) -> u64;

    /// Discards all accumulated entropy and rekeys the pool from `key` (may be empty).
    fn reset(&mut self, key: &[u8]);

    /// Absorbs `data`. Empty input is a no-op.
    fn add_entropy(&mut self, data: &[u8]);

    /// Emits up to `byte_capacity()` bytes into `dest`, returning the count.
    fn read(&mut self, dest: &mut [u8]) -> usize;

    /// Whether enough entropy has been absorbed for the pool to be stirred.
    fn is_available(&self) -> bool {
        self.bytes_written() >= AVAILABLE_THRESHOLD
    }
}

/// Builds keyed extractors so the accumulator can populate its pools
/// without knowing the concrete backend.
pub trait ExtractorFactory {
    fn create(&self, key: &[u8]) -> Box<dyn EntropyExtractor>;
}
