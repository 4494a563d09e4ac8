//! Construction-time configuration.
//!
//! Everything is an explicit parameter chosen by the host application; the
//! crate never reads the environment or configuration files.

/// Bytes a scheduler may draw from its internal generator before it asks for a reseed.
pub const SCHEDULER_RESEED_BYTES: usize = 16 * 1024 * 1024;

/// Block size in which schedulers pull randomness from their generator.
pub const SCHEDULER_BLOCK: usize = 512;

/// Default reseed interval of a ChaCha20-backed chain.
pub const FAST_RESEED_INTERVAL: usize = 4 * 1024 * 1024;

/// Default reseed interval of a sponge-backed chain.
pub const SLOW_RESEED_INTERVAL: usize = 32 * 1024;

/// Default number of pools in an accumulator.
pub const DEFAULT_POOLS: usize = 32;

/// Upper bound on the pool count. Schedules draw pool indices from single bytes.
pub const MAX_POOLS: usize = 254;

/// Order in which injected entropy is spread across the pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScheduleStrategy {
    /// `0, 1, .., n-1, 0, 1, ..`. Needs no randomness.
    RoundRobin,
    /// Independent uniform choice per injection.
    Random,
    /// A fresh random permutation of all pools per round.
    #[default]
    Permutation,
}

/// Settings for [`crate::accumulator::Accumulator`].
#[derive(Debug, Clone)]
pub struct AccumulatorConfig {
    /// Number of entropy pools, `1..=MAX_POOLS`.
    pub pools: usize,

    /// Stir a decoy pool in place of pools that have not yet collected enough
    /// entropy, so pool availability does not show up in the stir timing.
    pub constant_time_stir: bool,

    /// Pool selection strategy for `add_entropy`.
    pub schedule: ScheduleStrategy,
}

impl Default for AccumulatorConfig {
    fn default() -> Self {
        Self {
            pools: DEFAULT_POOLS,
            constant_time_stir: false,
            schedule: ScheduleStrategy::default(),
        }
    }
}

impl AccumulatorConfig {
    pub fn with_pools(mut self, pools: usize) -> Self {
        self.pools = pools;
        self
    }

    pub fn with_schedule(mut self, schedule: ScheduleStrategy) -> Self {
        self.schedule = schedule;
        self
    }

    pub fn with_constant_time_stir(mut self, enabled: bool) -> Self {
        self.constant_time_stir = enabled;
        self
    }
}
