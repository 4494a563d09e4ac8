//! Shuffled rounds.
//!
//! At the start of each round the pool order is reshuffled with Fisher-Yates
//! and then handed out one index per call. Over any complete round every pool
//! is chosen exactly once.
//!
//! Swap targets come from masked random bytes. The mask starts at the smallest
//! `2^k - 1` covering the pool count and is halved once the shrinking index
//! fits under it, which keeps the rejection rate low without modular bias.

use alloc::boxed::Box;
use alloc::vec::Vec;

use super::{check_pool_count, PoolScheduler, ScheduleRng};
use crate::error::PrngError;
use crate::generator::Generator;

pub struct PermutationScheduler {
    rng: ScheduleRng,
    order: Vec<u8>,
    position: usize,
    mask0: u8,
}

impl PermutationScheduler {
    pub fn new(rng: Box<dyn Generator>, pools: usize) -> Result<Self, PrngError> {
        check_pool_count(pools)?;

        let mut mask0: usize = 0;
        while mask0 < pools {
            mask0 = (mask0 << 1) | 1;
        }

        Ok(Self {
            rng: ScheduleRng::new(rng),
            // `check_pool_count` bounds pools below 256.
            order: (0..pools).map(|p| p as u8).collect(),
            position: 0,
            mask0: mask0 as u8,
        })
    }

    fn shuffle(&mut self) -> Result<(), PrngError> {
        let mut mask = self.mask0;

        for i in (1..self.order.len()).rev() {
            let j = loop {
                let mut b = usize::from(self.rng.next_byte()? & mask);
                if b <= i {
                    break b;
                }
                if usize::from(mask >> 1) < i {
                    continue;
                }
                mask >>= 1;
                b &= usize::from(mask);
                if b <= i {
                    break b;
                }
            };
            self.order.swap(i, j);
        }

        Ok(())
    }
}

impl PoolScheduler for PermutationScheduler {
    fn pool_count(&self) -> usize {
        self.order.len()
    }

    fn next_pool(&mut self) -> Result<usize, PrngError> {
        if self.position == 0 {
            self.shuffle()?;
        }

        let pool = usize::from(self.order[self.position]);
        self.position = (self.position + 1) % self.order.len();
        Ok(pool)
    }

    fn need_reseed(&self) -> bool {
        self.rng.need_reseed()
    }

    fn natural_seed_length(&self) -> usize {
        self.rng.natural_seed_length()
    }

    fn reseed(&mut self, seed: &[u8]) -> Result<(), PrngError> {
        // The round in progress keeps its order.
        self.rng.reseed(seed)
    }
}
