//! ChaCha20 keystream generator.
//!
//! Each reseed installs a new 256-bit key with an all-zero nonce, so the
//! keystream restarts from block zero under a fresh key.

use chacha20::cipher::{KeyIvInit, StreamCipher};
use chacha20::ChaCha20;

use super::Generator;
use crate::error::PrngError;

const KEY_LEN: usize = 32;
const NONCE: [u8; 12] = [0u8; 12];

pub struct ChaCha20Generator {
    cipher: Option<ChaCha20>,
}

impl ChaCha20Generator {
    /// Creates an unkeyed generator. It must be reseeded before the first read.
    pub fn new() -> Self {
        Self { cipher: None }
    }
}

impl Default for ChaCha20Generator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator for ChaCha20Generator {
    fn natural_seed_length(&self) -> usize {
        KEY_LEN
    }

    fn read(&mut self, dest: &mut [u8]) -> Result<usize, PrngError> {
        let cipher = self.cipher.as_mut().ok_or(PrngError::NotInitialized)?;

        dest.fill(0);
        match cipher.try_apply_keystream(dest) {
            Ok(()) => Ok(dest.len()),
            // Keystream exhausted under this key.
            Err(_) => Ok(0),
        }
    }

    fn reseed(&mut self, seed: &[u8]) -> Result<(), PrngError> {
        if seed.len() != KEY_LEN {
            return Err(PrngError::InvalidSeedLength { expected: KEY_LEN, actual: seed.len() });
        }
        let cipher = ChaCha20::new_from_slices(seed, &NONCE)
            .map_err(|_| PrngError::InvalidSeedLength { expected: KEY_LEN, actual: seed.len() })?;
        self.cipher = Some(cipher);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_before_reseed_fails() {
        let mut gen = ChaCha20Generator::new();
        let mut buf = [0u8; 16];
        assert_eq!(gen.read(&mut buf), Err(PrngError::NotInitialized));
    }

    #[test]
    fn test_rejects_short_key() {
        let mut gen = ChaCha20Generator::new();
        assert_eq!(
            gen.reseed(&[0u8; 16]),
            Err(PrngError::InvalidSeedLength { expected: 32, actual: 16 })
        );
    }

    #[test]
    fn test_rfc8439_zero_key_block() {
        // RFC 8439 A.1 test vector #1: all-zero key and nonce, block counter 0.
        let mut gen = ChaCha20Generator::new();
        gen.reseed(&[0u8; 32]).unwrap();
        let mut buf = [0u8; 16];
        gen.read(&mut buf).unwrap();
        assert_eq!(
            buf,
            [0x76, 0xb8, 0xe0, 0xad, 0xa0, 0xf1, 0x3d, 0x90, 0x40, 0x5d, 0x6a, 0xe5, 0x53, 0x86, 0xbd, 0x28]
        );
    }

    #[test]
    fn test_stream_continues_across_reads() {
        let mut a = ChaCha20Generator::new();
        let mut b = ChaCha20Generator::new();
        a.reseed(&[3u8; 32]).unwrap();
        b.reseed(&[3u8; 32]).unwrap();

        let mut whole = [0u8; 100];
        a.read(&mut whole).unwrap();

        let mut parts = [0u8; 100];
        b.read(&mut parts[..33]).unwrap();
        b.read(&mut parts[33..]).unwrap();
        assert_eq!(whole, parts);
    }

    #[test]
    fn test_reseed_restarts_with_new_key() {
        let mut gen = ChaCha20Generator::new();
        gen.reseed(&[1u8; 32]).unwrap();
        let mut first = [0u8; 32];
        gen.read(&mut first).unwrap();

        gen.reseed(&[2u8; 32]).unwrap();
        let mut second = [0u8; 32];
        gen.read(&mut second).unwrap();
        assert_ne!(first, second);
    }
}
