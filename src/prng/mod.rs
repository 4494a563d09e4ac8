//! Reseeding generator chains.
//!
//! A [`Prng`] owns a child generator and borrows a parent [`SeedSource`].
//! After every `reseed_interval` bytes of output the child is rekeyed with
//! exactly `natural_seed_length` fresh bytes from the parent. Chains nest: a
//! `Prng` is itself a [`Generator`], so wrapping it in a [`Lock`] makes it the
//! parent of the next level.
//!
//! # Security
//! - The transient seed buffer is wiped after every reseed attempt, including
//!   failed ones.
//! - A short seed from the parent fails the reseed instead of keying the child
//!   with less entropy than it was designed for.
//!
//! [`Lock`]: crate::sync::Lock

pub mod chains;

pub use chains::SeedSourceExt;

use alloc::vec;
use alloc::vec::Vec;
use core::num::NonZeroU32;
use rand_core::{CryptoRng, RngCore};
use zeroize::{Zeroize, Zeroizing};

use crate::error::PrngError;
use crate::generator::{Generator, SeedSource};

pub struct Prng<'p, G: Generator> {
    generator: G,
    parent: &'p dyn SeedSource,
    reseed_interval: usize,
    remaining: usize,
    seed: Zeroizing<Vec<u8>>,
}

impl<'p, G: Generator> Prng<'p, G> {
    /// Wraps `generator`. The child is keyed lazily on the first read unless
    /// [`Prng::reseed`] is called first.
    ///
    /// # Errors
    /// `PrngError::InvalidArgument` for a zero interval or a child that takes no seed.
    pub fn new(generator: G, parent: &'p dyn SeedSource, reseed_interval: usize) -> Result<Self, PrngError> {
        if reseed_interval == 0 {
            return Err(PrngError::InvalidArgument("reseed interval"));
        }
        let seed_length = generator.natural_seed_length();
        if seed_length == 0 {
            return Err(PrngError::InvalidArgument("natural seed length"));
        }

        Ok(Self {
            generator,
            parent,
            reseed_interval,
            remaining: 0,
            seed: Zeroizing::new(vec![0u8; seed_length]),
        })
    }

    pub fn reseed_interval(&self) -> usize {
        self.reseed_interval
    }

    /// Bytes left before the next reseed.
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Fills `dest`, reseeding from the parent whenever the budget runs out.
    ///
    /// Returns fewer bytes than requested only when the child generator is
    /// exhausted.
    pub fn read(&mut self, dest: &mut [u8]) -> Result<usize, PrngError> {
        let mut offset = 0;

        while offset < dest.len() {
            if self.remaining == 0 {
                self.reseed()?;
                continue;
            }

            let length = (dest.len() - offset).min(self.remaining);
            let read = self.generator.read(&mut dest[offset..offset + length])?;
            if read == 0 {
                break;
            }

            offset += read;
            self.remaining -= read;
        }

        Ok(offset)
    }

    /// Rekeys the child from the parent and restores the full budget.
    ///
    /// # Errors
    /// `PrngError::SeedUnavailable` if the parent delivers a short seed, or
    /// whatever the parent or the child reports.
    pub fn reseed(&mut self) -> Result<(), PrngError> {
        let result = self.pull_seed();
        self.seed.as_mut_slice().zeroize();

        match result {
            Ok(()) => {
                self.remaining = self.reseed_interval;
                log::debug!("Chain reseeded with {} bytes", self.seed.len());
                Ok(())
            }
            Err(e) => {
                log::warn!("Chain reseed failed: {}", e);
                Err(e)
            }
        }
    }

    fn pull_seed(&mut self) -> Result<(), PrngError> {
        let needed = self.seed.len();
        let received = self.parent.read_seed(&mut self.seed[..])?;
        if received < needed {
            return Err(PrngError::SeedUnavailable { needed, received });
        }
        self.generator.reseed(&self.seed[..])
    }

    fn fill(&mut self, dest: &mut [u8]) -> Result<(), PrngError> {
        if self.read(dest)? < dest.len() {
            return Err(PrngError::NoRandomData);
        }
        Ok(())
    }
}

impl<'p, G: Generator> Generator for Prng<'p, G> {
    fn natural_seed_length(&self) -> usize {
        self.generator.natural_seed_length()
    }

    fn read(&mut self, dest: &mut [u8]) -> Result<usize, PrngError> {
        Prng::read(self, dest)
    }

    /// Rekeys the child directly from `seed`, bypassing the parent.
    fn reseed(&mut self, seed: &[u8]) -> Result<(), PrngError> {
        self.generator.reseed(seed)?;
        self.remaining = self.reseed_interval;
        Ok(())
    }
}

fn rng_error(err: PrngError) -> rand_core::Error {
    let code = NonZeroU32::new(rand_core::Error::CUSTOM_START + err.code()).unwrap_or(NonZeroU32::MIN);
    rand_core::Error::from(code)
}

impl<'p, G: Generator> RngCore for Prng<'p, G> {
    fn next_u32(&mut self) -> u32 {
        rand_core::impls::next_u32_via_fill(self)
    }

    fn next_u64(&mut self) -> u64 {
        rand_core::impls::next_u64_via_fill(self)
    }

    /// # Panics
    /// If the chain cannot be reseeded. Use `try_fill_bytes` to handle that.
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        if let Err(e) = self.fill(dest) {
            panic!("Generator chain failed: {}", e);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.fill(dest).map_err(rng_error)
    }
}

impl<'p, G: Generator> CryptoRng for Prng<'p, G> {}
