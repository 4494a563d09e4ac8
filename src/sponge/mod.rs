//! Cryptographic sponge capability.
//!
//! The accumulator, the sponge extractor and the sponge generator only need
//! three operations from the underlying permutation state: absorb, squeeze and
//! reabsorb. `irreversible_reabsorb` builds forward secrecy on top of them.
//!
//! # Design
//! - **Reabsorb**: returns a squeezing sponge to absorbing mode without external input.
//! - **Irreversible Reabsorb**: squeeze a block of secret state, reabsorb, absorb it
//!   back and wipe the scratch copy. An attacker who later learns the state cannot
//!   run the permutation backwards past this point.

pub mod keccak;

pub use keccak::Keccak1600Sponge;

use zeroize::Zeroize;

/// Width of the Keccak-f[1600] state in bits.
pub const KECCAK_WIDTH_BITS: usize = 1600;

/// Standard capacities, each twice the targeted security level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitCapacity {
    Security224,
    Security256,
    Security384,
    Security512,
}

impl BitCapacity {
    /// Capacity in bits.
    pub const fn bits(self) -> usize {
        match self {
            BitCapacity::Security224 => 2 * 224,
            BitCapacity::Security256 => 2 * 256,
            BitCapacity::Security384 => 2 * 384,
            BitCapacity::Security512 => 2 * 512,
        }
    }

    /// Capacity in bytes.
    pub const fn bytes(self) -> usize {
        self.bits() / 8
    }
}

pub trait Sponge {
    /// Capacity of the sponge in bits.
    fn bit_capacity(&self) -> usize;

    /// Mixes `data` into the state. Absorbing after a squeeze reabsorbs first.
    fn absorb(&mut self, data: &[u8]);

    /// Fills `out` with output derived from the state.
    fn squeeze(&mut self, out: &mut [u8]);

    /// Leaves squeezing mode, permuting any partially consumed block.
    fn reabsorb(&mut self);

    /// Squeeze into `scratch`, reabsorb, absorb `scratch`, then zero `scratch`.
    fn irreversible_reabsorb(&mut self, scratch: &mut [u8]) {
        self.squeeze(scratch);
        self.reabsorb();
        self.absorb(scratch);
        scratch.zeroize();
    }
}
