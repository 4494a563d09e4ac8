//! Standard chain shapes.
//!
//! `fast_prng` puts a ChaCha20 child under a large interval for bulk output;
//! `slow_prng` puts a sponge child under a small interval for consumers that
//! want a wider reseed margin. [`FAST_RESEED_INTERVAL`] and
//! [`SLOW_RESEED_INTERVAL`] are the usual intervals.
//!
//! [`FAST_RESEED_INTERVAL`]: crate::config::FAST_RESEED_INTERVAL
//! [`SLOW_RESEED_INTERVAL`]: crate::config::SLOW_RESEED_INTERVAL

use super::Prng;
use crate::error::PrngError;
use crate::generator::{ChaCha20Generator, SeedSource, SpongeGenerator};
use crate::sponge::BitCapacity;

pub trait SeedSourceExt: SeedSource {
    /// ChaCha20 chain, keyed from `self` before it is returned.
    fn fast_prng(&self, reseed_interval: usize) -> Result<Prng<'_, ChaCha20Generator>, PrngError>
    where
        Self: Sized,
    {
        let mut prng = Prng::new(ChaCha20Generator::new(), self, reseed_interval)?;
        prng.reseed()?;
        Ok(prng)
    }

    /// Sponge chain of the given capacity, keyed from `self` before it is returned.
    fn slow_prng(
        &self,
        capacity: BitCapacity,
        reseed_interval: usize,
    ) -> Result<Prng<'_, SpongeGenerator>, PrngError>
    where
        Self: Sized,
    {
        let mut prng = Prng::new(SpongeGenerator::new(capacity), self, reseed_interval)?;
        prng.reseed()?;
        Ok(prng)
    }
}

impl<S: SeedSource + ?Sized> SeedSourceExt for S {}
