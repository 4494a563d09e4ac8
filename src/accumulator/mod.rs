//! Fortuna-style entropy accumulator.
//!
//! Producers inject entropy with [`Accumulator::add_entropy`]; the scheduler
//! spreads consecutive injections over the pools. Every
//! [`Accumulator::get_entropy`] first stirs a prefix of the pools into the
//! mixing core and then emits from it.
//!
//! # Stir rule
//! The stir counter `n` increments on every request. Pool `i` is stirred iff
//! `2^i` divides `n`, so pool 0 contributes every time, pool 1 every second
//! time and pool `k` every `2^k`-th time. Higher pools are drained rarely and
//! therefore hold enough entropy to recover from a state compromise even if an
//! attacker controls most inputs.
//!
//! Pools that have not collected [`AVAILABLE_THRESHOLD`] bytes since their
//! last reset are skipped. With `constant_time_stir` a decoy pool is read in
//! their place instead.
//!
//! # Locking
//! Core, then schedule, then one pool at a time. `add_entropy` never touches
//! the core, so producers are not blocked by a running stir for longer than
//! the single pool read that may be in progress on their target.
//!
//! [`AVAILABLE_THRESHOLD`]: crate::extractor::AVAILABLE_THRESHOLD

pub mod mixing;

pub use mixing::{AesCore, MixingCore, SpongeCore};

use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;
use zeroize::{Zeroize, Zeroizing};

use crate::config::AccumulatorConfig;
use crate::error::PrngError;
use crate::extractor::{EntropyExtractor, ExtractorFactory, ShaDoubleExtractorFactory, SpongeExtractorFactory};
use crate::generator::{Generator, SeedSource};
use crate::scheduler::{self, PoolScheduler};
use crate::sync::Lock;

/// Most pools a single stir can reach: the stir counter is 64 bits wide.
const MAX_STIR_DEPTH: usize = 64;

struct CoreState {
    core: Box<dyn MixingCore>,
    stir_count: u64,
    scratch: Zeroizing<Vec<u8>>,
}

pub struct Accumulator {
    core: Lock<CoreState>,
    schedule: Lock<Box<dyn PoolScheduler>>,
    pools: Vec<Lock<Box<dyn EntropyExtractor>>>,
    decoy: Option<Lock<Box<dyn EntropyExtractor>>>,
    byte_capacity: usize,
}

impl Accumulator {
    /// Builds an accumulator over `core` with pools from `factory`.
    ///
    /// A non-empty `key` keys the core, and each pool receives its own key
    /// derived from the keyed core. With an empty key the pools start unkeyed.
    ///
    /// # Errors
    /// `PrngError::InvalidArgument` for a pool count outside `1..=MAX_POOLS`.
    pub fn new(
        key: &[u8],
        config: &AccumulatorConfig,
        factory: &dyn ExtractorFactory,
        mut core: Box<dyn MixingCore>,
    ) -> Result<Self, PrngError> {
        let mut schedule = scheduler::build(config.schedule, config.pools)?;
        let byte_capacity = core.byte_capacity();

        core.absorb_key(key)?;

        let total = config.pools + usize::from(config.constant_time_stir);
        let mut extractors = Vec::with_capacity(total);
        let mut pool_key = Zeroizing::new(vec![0u8; byte_capacity]);
        for _ in 0..total {
            if key.is_empty() {
                extractors.push(factory.create(&[]));
            } else {
                core.derive(&mut pool_key[..])?;
                extractors.push(factory.create(&pool_key[..]));
            }
        }
        pool_key.zeroize();

        let decoy = if config.constant_time_stir {
            extractors.pop().map(Lock::new)
        } else {
            None
        };

        core.seal();

        let seed_length = schedule.natural_seed_length();
        if seed_length > 0 {
            let mut seed = Zeroizing::new(vec![0u8; seed_length]);
            core.derive(&mut seed[..])?;
            schedule.reseed(&seed[..])?;
        }

        let scratch_len = config.pools.min(MAX_STIR_DEPTH) * byte_capacity;

        log::info!(
            "Accumulator ready: {} pools, {:?} schedule, constant-time stir {}",
            config.pools,
            config.schedule,
            if config.constant_time_stir { "on" } else { "off" }
        );

        Ok(Self {
            core: Lock::new(CoreState {
                core,
                stir_count: 0,
                scratch: Zeroizing::new(vec![0u8; scratch_len]),
            }),
            schedule: Lock::new(schedule),
            pools: extractors.into_iter().map(Lock::new).collect(),
            decoy,
            byte_capacity,
        })
    }

    /// Sponge accumulator: Keccak core at 512-bit security with sponge pools.
    pub fn sponge(key: &[u8], config: &AccumulatorConfig) -> Result<Self, PrngError> {
        Self::new(key, config, &SpongeExtractorFactory, Box::new(SpongeCore::new()))
    }

    /// Classic Fortuna: AES-256 counter-mode core with SHA-d256 pools.
    pub fn fortuna(key: &[u8], config: &AccumulatorConfig) -> Result<Self, PrngError> {
        Self::new(key, config, &ShaDoubleExtractorFactory, Box::new(AesCore::new()))
    }

    pub fn pool_count(&self) -> usize {
        self.pools.len()
    }

    /// Number of stirs performed so far, one per non-empty `get_entropy`.
    pub fn stir_count(&self) -> u64 {
        self.core.lock().stir_count
    }

    /// Feeds `data` into the next scheduled pool. Empty input is ignored and
    /// does not advance the schedule.
    pub fn add_entropy(&self, data: &[u8]) -> Result<(), PrngError> {
        if data.is_empty() {
            return Ok(());
        }

        let index = self.schedule.lock().next_pool()?;
        self.pools[index].lock().add_entropy(data);
        Ok(())
    }

    /// Stirs and then fills `dest`, returning the number of bytes written.
    ///
    /// Requests are clamped to the core's `max_request`; the caller asks
    /// again for the rest.
    pub fn get_entropy(&self, dest: &mut [u8]) -> Result<usize, PrngError> {
        if dest.is_empty() {
            return Ok(0);
        }

        let mut state = self.core.lock();
        let length = dest.len().min(state.core.max_request());

        self.stir(&mut state)?;
        state.core.emit(&mut dest[..length])
    }

    fn stir(&self, state: &mut CoreState) -> Result<(), PrngError> {
        state.stir_count = state.stir_count.wrapping_add(1);
        let n = state.stir_count;
        let depth = (n.trailing_zeros() as usize).min(MAX_STIR_DEPTH - 1).min(self.pools.len() - 1);
        let capacity = state.core.byte_capacity();

        let mut length = 0;
        for pool in &self.pools[..=depth] {
            let mut extractor = pool.lock();
            if extractor.is_available() {
                let take = extractor.byte_capacity().min(capacity);
                length += extractor.read(&mut state.scratch[length..length + take]);
            } else if let Some(decoy) = &self.decoy {
                drop(extractor);
                let mut decoy = decoy.lock();
                let take = decoy.byte_capacity().min(capacity);
                length += decoy.read(&mut state.scratch[length..length + take]);
            }
        }

        let stirred = state.core.stir(&state.scratch[..length]);
        state.scratch[..length].zeroize();
        stirred?;

        log::trace!("Stir {}: depth {}, {} bytes", n, depth, length);

        let mut schedule = self.schedule.lock();
        if schedule.need_reseed() {
            let mut seed = Zeroizing::new(vec![0u8; schedule.natural_seed_length()]);
            state.core.derive(&mut seed[..])?;
            schedule.reseed(&seed[..])?;
        }

        Ok(())
    }
}

impl SeedSource for Accumulator {
    fn read_seed(&self, dest: &mut [u8]) -> Result<usize, PrngError> {
        self.get_entropy(dest)
    }
}

impl Generator for Accumulator {
    fn natural_seed_length(&self) -> usize {
        self.byte_capacity / 2
    }

    fn read(&mut self, dest: &mut [u8]) -> Result<usize, PrngError> {
        self.get_entropy(dest)
    }

    fn reseed(&mut self, seed: &[u8]) -> Result<(), PrngError> {
        self.add_entropy(seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ScheduleStrategy, MAX_POOLS};
    use alloc::sync::Arc;
    use core::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

    /// Pool that counts its reads and reports a fixed availability.
    struct CountingExtractor {
        id: u8,
        available: bool,
        reads: Arc<Vec<AtomicU64>>,
    }

    impl EntropyExtractor for CountingExtractor {
        fn byte_capacity(&self) -> usize {
            32
        }

        fn bytes_written(&self) -> u64 {
            if self.available { 64 } else { 0 }
        }

        fn read_count(&self) -> u64 {
            self.reads[usize::from(self.id)].load(Ordering::SeqCst)
        }

        fn reset(&mut self, _key: &[u8]) {}

        fn add_entropy(&mut self, _data: &[u8]) {}

        fn read(&mut self, dest: &mut [u8]) -> usize {
            self.reads[usize::from(self.id)].fetch_add(1, Ordering::SeqCst);
            let length = dest.len().min(32);
            dest[..length].fill(self.id);
            length
        }
    }

    struct CountingFactory {
        next: AtomicUsize,
        available: usize,
        reads: Arc<Vec<AtomicU64>>,
    }

    impl CountingFactory {
        /// `pools` counters plus one for a decoy. Pools below `available` report available.
        fn new(pools: usize, available: usize) -> Self {
            Self {
                next: AtomicUsize::new(0),
                available,
                reads: Arc::new((0..=pools).map(|_| AtomicU64::new(0)).collect()),
            }
        }

        fn reads(&self) -> Vec<u64> {
            self.reads.iter().map(|c| c.load(Ordering::SeqCst)).collect()
        }
    }

    impl ExtractorFactory for CountingFactory {
        fn create(&self, _key: &[u8]) -> Box<dyn EntropyExtractor> {
            let id = self.next.fetch_add(1, Ordering::SeqCst);
            Box::new(CountingExtractor {
                id: id as u8,
                available: id < self.available,
                reads: Arc::clone(&self.reads),
            })
        }
    }

    fn counting(pools: usize, available: usize, constant_time: bool) -> (Accumulator, CountingFactory) {
        let factory = CountingFactory::new(pools, available);
        let config = AccumulatorConfig::default()
            .with_pools(pools)
            .with_schedule(ScheduleStrategy::RoundRobin)
            .with_constant_time_stir(constant_time);
        let acc = Accumulator::new(b"key", &config, &factory, Box::new(SpongeCore::new())).unwrap();
        (acc, factory)
    }

    #[test]
    fn test_stir_cadence() {
        let (acc, factory) = counting(8, 8, false);
        let mut out = [0u8; 16];
        for _ in 0..64 {
            acc.get_entropy(&mut out).unwrap();
        }
        assert_eq!(acc.stir_count(), 64);
        assert_eq!(factory.reads()[..8], [64, 32, 16, 8, 4, 2, 1, 0]);
    }

    #[test]
    fn test_depth_capped_by_pool_count() {
        let (acc, factory) = counting(2, 2, false);
        let mut out = [0u8; 16];
        for _ in 0..16 {
            acc.get_entropy(&mut out).unwrap();
        }
        // Pool 1 is the last pool and joins every even stir.
        assert_eq!(factory.reads()[..2], [16, 8]);
    }

    #[test]
    fn test_unavailable_pools_are_skipped() {
        let (acc, factory) = counting(4, 1, false);
        let mut out = [0u8; 16];
        for _ in 0..8 {
            acc.get_entropy(&mut out).unwrap();
        }
        assert_eq!(factory.reads(), [8, 0, 0, 0, 0]);
    }

    #[test]
    fn test_constant_time_reads_decoy() {
        let (acc, factory) = counting(4, 1, true);
        assert_eq!(acc.pool_count(), 4);
        let mut out = [0u8; 16];
        for _ in 0..8 {
            acc.get_entropy(&mut out).unwrap();
        }
        // Stirs 1..=8 reach 0, 1, 0, 2, 0, 1, 0, 3 unavailable pools.
        assert_eq!(factory.reads(), [8, 0, 0, 0, 7]);
    }

    #[test]
    fn test_empty_request() {
        let (acc, factory) = counting(4, 4, false);
        assert_eq!(acc.get_entropy(&mut []), Ok(0));
        assert_eq!(acc.stir_count(), 0);
        assert_eq!(factory.reads()[0], 0);
    }

    #[test]
    fn test_deterministic_for_same_inputs() {
        let config = AccumulatorConfig::default().with_pools(8);
        let a = Accumulator::sponge(b"seed", &config).unwrap();
        let b = Accumulator::sponge(b"seed", &config).unwrap();
        for i in 0..40u64 {
            a.add_entropy(&i.to_le_bytes()).unwrap();
            b.add_entropy(&i.to_le_bytes()).unwrap();
        }

        let mut out_a = [0u8; 64];
        let mut out_b = [0u8; 64];
        a.get_entropy(&mut out_a).unwrap();
        b.get_entropy(&mut out_b).unwrap();
        assert_eq!(out_a, out_b);
    }

    #[test]
    fn test_key_separates_instances() {
        let config = AccumulatorConfig::default().with_pools(4);
        let a = Accumulator::sponge(b"one", &config).unwrap();
        let b = Accumulator::sponge(b"two", &config).unwrap();
        let mut out_a = [0u8; 32];
        let mut out_b = [0u8; 32];
        a.get_entropy(&mut out_a).unwrap();
        b.get_entropy(&mut out_b).unwrap();
        assert_ne!(out_a, out_b);
    }

    #[test]
    fn test_no_replay() {
        let acc = Accumulator::sponge(&[], &AccumulatorConfig::default()).unwrap();
        let mut first = [0u8; 64];
        let mut second = [0u8; 64];
        acc.get_entropy(&mut first).unwrap();
        acc.get_entropy(&mut second).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_end_to_end_round_robin() {
        let config = AccumulatorConfig::default()
            .with_pools(4)
            .with_schedule(ScheduleStrategy::RoundRobin);
        let acc = Accumulator::sponge(&[], &config).unwrap();
        for counter in 0..100u64 {
            acc.add_entropy(&counter.to_le_bytes()).unwrap();
        }

        let mut first = [0u8; 64];
        let mut second = [0u8; 64];
        assert_eq!(acc.get_entropy(&mut first), Ok(64));
        assert_eq!(acc.get_entropy(&mut second), Ok(64));
        assert_ne!(first, second);
        assert!(first.iter().any(|&b| b != 0));
    }

    #[test]
    fn test_request_is_clamped() {
        let acc = Accumulator::sponge(b"k", &AccumulatorConfig::default()).unwrap();
        let mut big = vec![0u8; 1000];
        assert_eq!(acc.get_entropy(&mut big), Ok(256));
        assert!(big[256..].iter().all(|&b| b == 0));

        let fortuna = Accumulator::fortuna(b"k", &AccumulatorConfig::default()).unwrap();
        let mut huge = vec![0u8; (1 << 20) + 100];
        assert_eq!(fortuna.get_entropy(&mut huge), Ok(1 << 20));
    }

    #[test]
    fn test_fortuna_flavour() {
        let config = AccumulatorConfig::default().with_pools(16);
        let acc = Accumulator::fortuna(b"fortuna key", &config).unwrap();
        for i in 0..200u32 {
            acc.add_entropy(&i.to_be_bytes()).unwrap();
        }
        let mut a = [0u8; 48];
        let mut b = [0u8; 48];
        assert_eq!(acc.get_entropy(&mut a), Ok(48));
        assert_eq!(acc.get_entropy(&mut b), Ok(48));
        assert_ne!(a, b);
    }

    #[test]
    fn test_empty_injection_is_ignored() {
        let config = AccumulatorConfig::default()
            .with_pools(2)
            .with_schedule(ScheduleStrategy::RoundRobin);
        let a = Accumulator::sponge(b"k", &config).unwrap();
        let b = Accumulator::sponge(b"k", &config).unwrap();

        // Had the empty call advanced the schedule, `a` would fill pool 1 instead.
        a.add_entropy(&[]).unwrap();
        a.add_entropy(&[1u8; 64]).unwrap();
        b.add_entropy(&[1u8; 64]).unwrap();

        let mut out_a = [0u8; 32];
        let mut out_b = [0u8; 32];
        a.get_entropy(&mut out_a).unwrap();
        b.get_entropy(&mut out_b).unwrap();
        assert_eq!(out_a, out_b);
    }

    #[test]
    fn test_invalid_pool_counts() {
        for pools in [0, MAX_POOLS + 1] {
            let config = AccumulatorConfig::default().with_pools(pools);
            assert!(matches!(
                Accumulator::sponge(b"k", &config),
                Err(PrngError::InvalidArgument(_))
            ));
        }
        let config = AccumulatorConfig::default().with_pools(MAX_POOLS);
        assert_eq!(Accumulator::sponge(b"k", &config).unwrap().pool_count(), MAX_POOLS);
    }

    /// Scheduler that asks for a reseed until it gets one.
    struct FlaggingScheduler {
        seeds: Arc<Vec<AtomicU64>>,
    }

    impl PoolScheduler for FlaggingScheduler {
        fn pool_count(&self) -> usize {
            1
        }

        fn next_pool(&mut self) -> Result<usize, PrngError> {
            Ok(0)
        }

        fn need_reseed(&self) -> bool {
            self.seeds[0].load(Ordering::SeqCst) == 0
        }

        fn natural_seed_length(&self) -> usize {
            32
        }

        fn reseed(&mut self, seed: &[u8]) -> Result<(), PrngError> {
            self.seeds[0].fetch_add(1, Ordering::SeqCst);
            self.seeds[1].store(seed.len() as u64, Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn test_scheduler_reseeds_from_core() {
        let config = AccumulatorConfig::default().with_pools(1);
        let acc = Accumulator::sponge(b"k", &config).unwrap();
        let seeds = Arc::new(alloc::vec![AtomicU64::new(0), AtomicU64::new(0)]);
        *acc.schedule.lock() = Box::new(FlaggingScheduler { seeds: Arc::clone(&seeds) });

        let mut out = [0u8; 8];
        acc.get_entropy(&mut out).unwrap();
        assert_eq!(seeds[0].load(Ordering::SeqCst), 1);
        assert_eq!(seeds[1].load(Ordering::SeqCst), 32);

        acc.get_entropy(&mut out).unwrap();
        assert_eq!(seeds[0].load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_generator_facade() {
        let mut acc = Accumulator::sponge(b"k", &AccumulatorConfig::default().with_pools(4)).unwrap();
        assert_eq!(Generator::natural_seed_length(&acc), 64);
        Generator::reseed(&mut acc, b"more entropy").unwrap();
        let mut out = [0u8; 32];
        assert_eq!(Generator::read(&mut acc, &mut out), Ok(32));
        assert_eq!(acc.stir_count(), 1);
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_concurrent_producers_and_consumers() {
        let acc = Accumulator::sponge(b"threads", &AccumulatorConfig::default().with_pools(8)).unwrap();

        std::thread::scope(|s| {
            for t in 0..4u8 {
                let acc = &acc;
                s.spawn(move || {
                    for i in 0..500u16 {
                        let mut sample = [t; 6];
                        sample[..2].copy_from_slice(&i.to_le_bytes());
                        acc.add_entropy(&sample).unwrap();
                    }
                });
            }
            for _ in 0..2 {
                let acc = &acc;
                s.spawn(move || {
                    let mut out = [0u8; 64];
                    for _ in 0..100 {
                        assert_eq!(acc.get_entropy(&mut out), Ok(64));
                    }
                });
            }
        });

        assert_eq!(acc.stir_count(), 200);
    }
}
