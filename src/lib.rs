//! Fortuna-style entropy accumulator over Keccak sponges.
//!
//! Entropy from any number of producers is spread over a set of pools by a
//! [`scheduler`]; consumers draw from an [`Accumulator`], which stirs pools
//! into its mixing core on the Fortuna schedule. [`Prng`] chains put cheap
//! reseeding generators on top of it.
//!
//! ```ignore
//! use sponge_fortuna::{Accumulator, AccumulatorConfig, SeedSourceExt, FAST_RESEED_INTERVAL};
//!
//! let acc = Accumulator::sponge(b"boot key", &AccumulatorConfig::default())?;
//! acc.add_entropy(&timer_jitter)?;
//!
//! let mut rng = acc.fast_prng(FAST_RESEED_INTERVAL)?;
//! let mut key = [0u8; 32];
//! rng.read(&mut key)?;
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod accumulator;
pub mod config;
pub mod error;
pub mod extractor;
pub mod generator;
pub mod prng;
pub mod scheduler;
pub mod sponge;
pub mod sync;

pub use accumulator::Accumulator;
pub use config::{AccumulatorConfig, ScheduleStrategy, FAST_RESEED_INTERVAL, SLOW_RESEED_INTERVAL};
pub use error::PrngError;
pub use generator::{Generator, SeedSource};
pub use prng::{Prng, SeedSourceExt};
pub use sponge::BitCapacity;
