//! Independent uniform pool choice.
//!
//! A random byte is accepted only if it is already a valid pool index, so
//! every pool is equally likely and no reduction is needed.

use alloc::boxed::Box;

use super::{check_pool_count, PoolScheduler, ScheduleRng};
use crate::error::PrngError;
use crate::generator::Generator;

pub struct RandomScheduler {
    rng: ScheduleRng,
    pools: usize,
}

impl RandomScheduler {
    pub fn new(rng: Box<dyn Generator>, pools: usize) -> Result<Self, PrngError> {
        check_pool_count(pools)?;
        Ok(Self { rng: ScheduleRng::new(rng), pools })
    }
}

impl PoolScheduler for RandomScheduler {
    fn pool_count(&self) -> usize {
        self.pools
    }

    fn next_pool(&mut self) -> Result<usize, PrngError> {
        loop {
            let byte = self.rng.next_byte()?;
            if usize::from(byte) < self.pools {
                return Ok(usize::from(byte));
            }
        }
    }

    fn need_reseed(&self) -> bool {
        self.rng.need_reseed()
    }

    fn natural_seed_length(&self) -> usize {
        self.rng.natural_seed_length()
    }

    fn reseed(&mut self, seed: &[u8]) -> Result<(), PrngError> {
        self.rng.reseed(seed)
    }
}
