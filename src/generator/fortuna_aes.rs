//! Fortuna generator: AES-256 in counter mode.
//!
//! # Design
//! - **Counter**: 128-bit little-endian block counter. Zero means "never seeded".
//! - **Reseed**: `key = SHA-d256(key || seed)`, then the counter is incremented.
//! - **Rekey**: after every read two further blocks become the next key, so the
//!   key that produced an output is gone once the read returns.
//! - **Limit**: at most 1 MiB per read.

use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockEncrypt, KeyInit};
use aes::Aes256;
use zeroize::{Zeroize, Zeroizing};

use super::Generator;
use crate::error::PrngError;
use crate::extractor::ShaDouble256;

const BLOCK_LEN: usize = 16;
const KEY_LEN: usize = 32;

/// Largest single request, as in Fortuna.
pub const MAX_REQUEST: usize = 1 << 20;

pub struct FortunaAesGenerator {
    key: Zeroizing<[u8; KEY_LEN]>,
    counter: [u8; BLOCK_LEN],
}

impl FortunaAesGenerator {
    pub fn new() -> Self {
        Self {
            key: Zeroizing::new([0u8; KEY_LEN]),
            counter: [0u8; BLOCK_LEN],
        }
    }

    fn is_seeded(&self) -> bool {
        self.counter.iter().any(|&b| b != 0)
    }

    fn increment_counter(&mut self) {
        // Walk the whole counter regardless of where the carry stops.
        let mut carry = 1u16;
        for byte in self.counter.iter_mut() {
            let sum = *byte as u16 + carry;
            *byte = sum as u8;
            carry = sum >> 8;
        }
    }

    fn generate_block(&mut self, cipher: &Aes256, out: &mut [u8; BLOCK_LEN]) {
        out.copy_from_slice(&self.counter);
        cipher.encrypt_block(GenericArray::from_mut_slice(out));
        self.increment_counter();
    }
}

impl Default for FortunaAesGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator for FortunaAesGenerator {
    fn natural_seed_length(&self) -> usize {
        KEY_LEN
    }

    fn read(&mut self, dest: &mut [u8]) -> Result<usize, PrngError> {
        if !self.is_seeded() {
            return Err(PrngError::NotInitialized);
        }
        let length = dest.len().min(MAX_REQUEST);
        if length == 0 {
            return Ok(0);
        }

        let cipher = Aes256::new(GenericArray::from_slice(&self.key[..]));
        let mut block = Zeroizing::new([0u8; BLOCK_LEN]);

        for chunk in dest[..length].chunks_mut(BLOCK_LEN) {
            self.generate_block(&cipher, &mut block);
            chunk.copy_from_slice(&block[..chunk.len()]);
        }

        let mut next_key = Zeroizing::new([0u8; KEY_LEN]);
        self.generate_block(&cipher, &mut block);
        next_key[..BLOCK_LEN].copy_from_slice(&block[..]);
        self.generate_block(&cipher, &mut block);
        next_key[BLOCK_LEN..].copy_from_slice(&block[..]);
        block.zeroize();

        self.key.copy_from_slice(&next_key[..]);

        Ok(length)
    }

    fn reseed(&mut self, seed: &[u8]) -> Result<(), PrngError> {
        let mut hash = ShaDouble256::new();
        hash.update(&self.key[..]);
        hash.update(seed);
        let digest = hash.finalize();
        self.key.copy_from_slice(&digest[..]);

        self.increment_counter();
        Ok(())
    }
}
