//! Pool selection.
//!
//! A scheduler decides which pool receives each `add_entropy` call. The
//! sequence is infinite and survives reseeds: a reseed only changes the
//! randomness used for future choices, never the position in the current round.
//!
//! # Strategies
//! - **Round robin**: fixed order, no randomness. Predictable to an attacker
//!   who can time injections, so it is a fallback.
//! - **Random**: uniform choice per call, by rejection sampling bytes.
//! - **Permutation** (default): a Fisher-Yates shuffle per round, so every
//!   pool receives exactly one injection per round of `pool_count` calls.
//!
//! The random strategies pull bytes from an internal generator in blocks and
//! ask for a reseed once `SCHEDULER_RESEED_BYTES` have been drawn. Until the
//! owner reseeds, they keep working on the stale key.

pub mod permutation;
pub mod random;
pub mod round_robin;

pub use permutation::PermutationScheduler;
pub use random::RandomScheduler;
pub use round_robin::RoundRobinScheduler;

use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;
use zeroize::{Zeroize, Zeroizing};

use crate::config::{ScheduleStrategy, MAX_POOLS, SCHEDULER_BLOCK, SCHEDULER_RESEED_BYTES};
use crate::error::PrngError;
use crate::generator::{ChaCha20Generator, Generator};

pub trait PoolScheduler: Send {
    fn pool_count(&self) -> usize;

    /// Next pool index in `[0, pool_count)`.
    ///
    /// # Errors
    /// `PrngError::NotInitialized` if a random strategy was never reseeded.
    fn next_pool(&mut self) -> Result<usize, PrngError>;

    /// Whether the internal generator has exhausted its byte budget.
    fn need_reseed(&self) -> bool;

    /// Seed length the internal generator wants. Zero for strategies without one.
    fn natural_seed_length(&self) -> usize;

    fn reseed(&mut self, seed: &[u8]) -> Result<(), PrngError>;
}

/// Builds the scheduler for `strategy`. Random strategies are driven by ChaCha20.
pub fn build(strategy: ScheduleStrategy, pools: usize) -> Result<Box<dyn PoolScheduler>, PrngError> {
    Ok(match strategy {
        ScheduleStrategy::RoundRobin => Box::new(RoundRobinScheduler::new(pools)?),
        ScheduleStrategy::Random => {
            Box::new(RandomScheduler::new(Box::new(ChaCha20Generator::new()), pools)?)
        }
        ScheduleStrategy::Permutation => {
            Box::new(PermutationScheduler::new(Box::new(ChaCha20Generator::new()), pools)?)
        }
    })
}

pub(crate) fn check_pool_count(pools: usize) -> Result<(), PrngError> {
    if pools == 0 || pools > MAX_POOLS {
        return Err(PrngError::InvalidArgument("pool count"));
    }
    Ok(())
}

/// Buffered byte stream over a scheduler's internal generator, with the
/// reseed budget.
pub struct ScheduleRng {
    rng: Box<dyn Generator>,
    buffer: Zeroizing<Vec<u8>>,
    index: usize,
    length: usize,
    bytes_left: usize,
}

impl ScheduleRng {
    pub fn new(rng: Box<dyn Generator>) -> Self {
        Self {
            rng,
            buffer: Zeroizing::new(Vec::new()),
            index: 0,
            length: 0,
            bytes_left: 0,
        }
    }

    pub fn need_reseed(&self) -> bool {
        self.bytes_left == 0
    }

    pub fn natural_seed_length(&self) -> usize {
        self.rng.natural_seed_length()
    }

    /// Bytes that may still be drawn before a reseed is requested.
    pub fn bytes_left(&self) -> usize {
        self.bytes_left
    }

    pub fn reseed(&mut self, seed: &[u8]) -> Result<(), PrngError> {
        if self.buffer.is_empty() {
            self.buffer = Zeroizing::new(vec![0u8; SCHEDULER_BLOCK]);
        }
        self.rng.reseed(seed)?;

        // Drop bytes buffered under the old key.
        self.buffer.as_mut_slice().zeroize();
        self.index = 0;
        self.length = 0;
        self.bytes_left = SCHEDULER_RESEED_BYTES;

        log::debug!("Scheduler generator reseeded with {} bytes", seed.len());
        Ok(())
    }

    pub fn next_byte(&mut self) -> Result<u8, PrngError> {
        if self.buffer.is_empty() {
            return Err(PrngError::NotInitialized);
        }

        if self.index >= self.length {
            self.length = self.rng.read(&mut self.buffer)?;
            self.index = 0;

            if self.length == 0 {
                return Err(PrngError::NoRandomData);
            }

            let was_exhausted = self.bytes_left == 0;
            self.bytes_left = self.bytes_left.saturating_sub(self.length);
            if self.bytes_left == 0 && !was_exhausted {
                log::warn!("Scheduler randomness budget exhausted; continuing until reseed");
            }
        }

        let byte = self.buffer[self.index];
        self.index += 1;
        Ok(byte)
    }
}
