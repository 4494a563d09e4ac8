use super::{check_pool_count, PoolScheduler};
use crate::error::PrngError;

/// Cycles `0, 1, .., n-1`. Carries no randomness and never needs a reseed.
#[derive(Debug, Clone)]
pub struct RoundRobinScheduler {
    pools: usize,
    next: usize,
}

impl RoundRobinScheduler {
    pub fn new(pools: usize) -> Result<Self, PrngError> {
        check_pool_count(pools)?;
        Ok(Self { pools, next: 0 })
    }
}

impl PoolScheduler for RoundRobinScheduler {
    fn pool_count(&self) -> usize {
        self.pools
    }

    fn next_pool(&mut self) -> Result<usize, PrngError> {
        let pool = self.next;
        self.next = (self.next + 1) % self.pools;
        Ok(pool)
    }

    fn need_reseed(&self) -> bool {
        false
    }

    fn natural_seed_length(&self) -> usize {
        0
    }

    fn reseed(&mut self, _seed: &[u8]) -> Result<(), PrngError> {
        Ok(())
    }
}
