//! Sponge generator: output is squeezed straight from a Keccak sponge.
//!
//! Slower than ChaCha20 but every read ends with an irreversible reabsorb, and
//! the capacity, hence the security margin, is configurable.

use alloc::vec;
use alloc::vec::Vec;
use zeroize::Zeroizing;

use super::Generator;
use crate::error::PrngError;
use crate::sponge::{BitCapacity, Keccak1600Sponge, Sponge};

pub struct SpongeGenerator {
    sponge: Keccak1600Sponge,
    scratch: Zeroizing<Vec<u8>>,
    seeded: bool,
}

impl SpongeGenerator {
    pub fn new(capacity: BitCapacity) -> Self {
        Self {
            sponge: Keccak1600Sponge::new(capacity),
            scratch: Zeroizing::new(vec![0u8; capacity.bytes()]),
            seeded: false,
        }
    }

    pub fn with_bit_capacity(bits: usize) -> Result<Self, PrngError> {
        let sponge = Keccak1600Sponge::with_bit_capacity(bits)?;
        Ok(Self {
            sponge,
            scratch: Zeroizing::new(vec![0u8; bits / 8]),
            seeded: false,
        })
    }
}

impl Generator for SpongeGenerator {
    fn natural_seed_length(&self) -> usize {
        self.scratch.len()
    }

    fn read(&mut self, dest: &mut [u8]) -> Result<usize, PrngError> {
        if !self.seeded {
            return Err(PrngError::NotInitialized);
        }
        if dest.is_empty() {
            return Ok(0);
        }

        self.sponge.squeeze(dest);
        self.sponge.irreversible_reabsorb(&mut self.scratch);

        Ok(dest.len())
    }

    fn reseed(&mut self, seed: &[u8]) -> Result<(), PrngError> {
        self.sponge.reabsorb();
        self.sponge.absorb(seed);
        self.seeded = true;
        Ok(())
    }
}
