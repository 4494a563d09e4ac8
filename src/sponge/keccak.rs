//! Keccak-f[1600] sponge.
//!
//! Byte-oriented sponge over the `keccak` crate permutation with Keccak
//! pad10*1 (delimiter `0x01`). Lanes are little-endian, so a fresh sponge at
//! 512-bit capacity squeezes exactly Keccak-256.

use zeroize::{Zeroize, ZeroizeOnDrop};

use super::{Sponge, BitCapacity, KECCAK_WIDTH_BITS};
use crate::error::PrngError;

const LANES: usize = 25;
const WIDTH_BYTES: usize = KECCAK_WIDTH_BITS / 8;

/// Keccak padding delimiter, as used before the SHA-3 domain bits.
const DELIMITER: u8 = 0x01;

#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Keccak1600Sponge {
    state: [u64; LANES],
    rate: usize,
    byte_io_index: usize,
    squeezing: bool,
}

impl Keccak1600Sponge {
    pub fn new(capacity: BitCapacity) -> Self {
        Self {
            state: [0; LANES],
            rate: WIDTH_BYTES - capacity.bytes(),
            byte_io_index: 0,
            squeezing: false,
        }
    }

    /// Creates a sponge with an arbitrary byte-aligned capacity in `(0, 1600)` bits.
    pub fn with_bit_capacity(bits: usize) -> Result<Self, PrngError> {
        let rate = rate_for(bits)?;
        Ok(Self {
            state: [0; LANES],
            rate,
            byte_io_index: 0,
            squeezing: false,
        })
    }

    /// Wipes the state and starts over with the given capacity.
    pub fn reinitialize(&mut self, bits: usize) -> Result<(), PrngError> {
        let rate = rate_for(bits)?;
        self.state.zeroize();
        self.rate = rate;
        self.byte_io_index = 0;
        self.squeezing = false;
        Ok(())
    }

    /// Rate in bytes.
    pub fn rate(&self) -> usize {
        self.rate
    }

    #[inline]
    fn xor_byte(&mut self, position: usize, byte: u8) {
        self.state[position / 8] ^= (byte as u64) << (8 * (position % 8));
    }

    #[inline]
    fn byte_at(&self, position: usize) -> u8 {
        (self.state[position / 8] >> (8 * (position % 8))) as u8
    }

    fn permute(&mut self) {
        keccak::f1600(&mut self.state);
    }

    // Pad the pending block and switch to squeezing.
    fn pad(&mut self) {
        self.xor_byte(self.byte_io_index, DELIMITER);
        self.xor_byte(self.rate - 1, 0x80);
        self.permute();
        self.byte_io_index = 0;
        self.squeezing = true;
    }
}

fn rate_for(bits: usize) -> Result<usize, PrngError> {
    if bits == 0 || bits >= KECCAK_WIDTH_BITS || bits % 8 != 0 {
        return Err(PrngError::InvalidArgument("bit capacity"));
    }
    Ok(WIDTH_BYTES - bits / 8)
}

impl Sponge for Keccak1600Sponge {
    fn bit_capacity(&self) -> usize {
        KECCAK_WIDTH_BITS - 8 * self.rate
    }

    fn absorb(&mut self, data: &[u8]) {
        if data.is_empty() {
            return;
        }
        if self.squeezing {
            self.reabsorb();
        }
        for &byte in data {
            self.xor_byte(self.byte_io_index, byte);
            self.byte_io_index += 1;
            if self.byte_io_index == self.rate {
                self.permute();
                self.byte_io_index = 0;
            }
        }
    }

    fn squeeze(&mut self, out: &mut [u8]) {
        if out.is_empty() {
            return;
        }
        if !self.squeezing {
            self.pad();
        }
        for byte in out.iter_mut() {
            if self.byte_io_index == self.rate {
                self.permute();
                self.byte_io_index = 0;
            }
            *byte = self.byte_at(self.byte_io_index);
            self.byte_io_index += 1;
        }
    }

    fn reabsorb(&mut self) {
        if !self.squeezing {
            return;
        }
        if self.byte_io_index != 0 {
            self.permute();
        }
        self.byte_io_index = 0;
        self.squeezing = false;
    }
}
