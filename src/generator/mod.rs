//! Deterministic generators and the shared seed-source capability.
//!
//! A [`Generator`] is any keyed primitive that can be read and rekeyed. It is
//! owned by exactly one consumer. A [`SeedSource`] is a generator that can be
//! shared between threads; chains borrow one as their parent.
//!
//! # Backends
//! - `chacha`: ChaCha20 keystream, the fast chain child and the scheduler RNG.
//! - `sponge`: Keccak sponge squeezed directly, the slow chain child.
//! - `fortuna_aes`: AES-256 counter mode with SHA-d256 rekeying (classic Fortuna).

pub mod chacha;
pub mod fortuna_aes;
pub mod sponge;

pub use chacha::ChaCha20Generator;
pub use fortuna_aes::FortunaAesGenerator;
pub use sponge::SpongeGenerator;

use crate::error::PrngError;
use crate::sync::Lock;

pub trait Generator: Send {
    /// Bytes this generator wants per reseed for a full-entropy rekey.
    fn natural_seed_length(&self) -> usize;

    /// Fills `dest` and returns the number of bytes written.
    ///
    /// A count below `dest.len()` means the generator is exhausted until its
    /// next reseed.
    ///
    /// # Errors
    /// `PrngError::NotInitialized` before the first reseed.
    fn read(&mut self, dest: &mut [u8]) -> Result<usize, PrngError>;

    /// Rekeys the generator from `seed`.
    fn reseed(&mut self, seed: &[u8]) -> Result<(), PrngError>;
}

impl<G: Generator + ?Sized> Generator for alloc::boxed::Box<G> {
    fn natural_seed_length(&self) -> usize {
        (**self).natural_seed_length()
    }

    fn read(&mut self, dest: &mut [u8]) -> Result<usize, PrngError> {
        (**self).read(dest)
    }

    fn reseed(&mut self, seed: &[u8]) -> Result<(), PrngError> {
        (**self).reseed(seed)
    }
}

/// A thread-safe parent for generator chains.
pub trait SeedSource: Send + Sync {
    /// Fills `dest` with fresh key material and returns the number of bytes written.
    fn read_seed(&self, dest: &mut [u8]) -> Result<usize, PrngError>;
}

impl<G: Generator> SeedSource for Lock<G> {
    fn read_seed(&self, dest: &mut [u8]) -> Result<usize, PrngError> {
        self.lock().read(dest)
    }
}
