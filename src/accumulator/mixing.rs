//! Generator state behind the accumulator.
//!
//! A mixing core is the long-lived secret the pools are stirred into and
//! output is squeezed from. The sponge core follows the sponge accumulator
//! design; the AES core is classic Fortuna.

use zeroize::Zeroizing;

use crate::error::PrngError;
use crate::generator::fortuna_aes::{FortunaAesGenerator, MAX_REQUEST};
use crate::generator::Generator;
use crate::sponge::{BitCapacity, Keccak1600Sponge, Sponge};

pub trait MixingCore: Send {
    /// Secret state size in bytes. Bounds the per-pool contribution.
    fn byte_capacity(&self) -> usize;

    /// Largest output of a single `emit`.
    fn max_request(&self) -> usize {
        2 * self.byte_capacity()
    }

    /// Mixes the construction key into the fresh core.
    fn absorb_key(&mut self, key: &[u8]) -> Result<(), PrngError>;

    /// Fills `dest` with internal key material during setup and scheduler reseeds.
    fn derive(&mut self, dest: &mut [u8]) -> Result<(), PrngError>;

    /// Ends setup, so derived material cannot be recomputed from later state.
    fn seal(&mut self);

    /// Folds the concatenated pool contributions of one stir into the state.
    fn stir(&mut self, contribution: &[u8]) -> Result<(), PrngError>;

    /// Writes output and irreversibly advances the state.
    fn emit(&mut self, dest: &mut [u8]) -> Result<usize, PrngError>;
}

const SPONGE_CAPACITY: BitCapacity = BitCapacity::Security512;
const SPONGE_BYTES: usize = SPONGE_CAPACITY.bytes();

/// Keccak sponge at 512-bit security.
pub struct SpongeCore {
    sponge: Keccak1600Sponge,
    scratch: Zeroizing<[u8; SPONGE_BYTES]>,
}

impl SpongeCore {
    pub fn new() -> Self {
        Self {
            sponge: Keccak1600Sponge::new(SPONGE_CAPACITY),
            scratch: Zeroizing::new([0u8; SPONGE_BYTES]),
        }
    }
}

impl Default for SpongeCore {
    fn default() -> Self {
        Self::new()
    }
}

impl MixingCore for SpongeCore {
    fn byte_capacity(&self) -> usize {
        SPONGE_BYTES
    }

    fn absorb_key(&mut self, key: &[u8]) -> Result<(), PrngError> {
        self.sponge.absorb(key);
        Ok(())
    }

    fn derive(&mut self, dest: &mut [u8]) -> Result<(), PrngError> {
        self.sponge.squeeze(dest);
        Ok(())
    }

    fn seal(&mut self) {
        self.sponge.irreversible_reabsorb(&mut self.scratch[..]);
    }

    fn stir(&mut self, contribution: &[u8]) -> Result<(), PrngError> {
        self.sponge.absorb(contribution);
        Ok(())
    }

    fn emit(&mut self, dest: &mut [u8]) -> Result<usize, PrngError> {
        self.sponge.squeeze(dest);
        self.sponge.irreversible_reabsorb(&mut self.scratch[..]);
        Ok(dest.len())
    }
}

/// Fortuna generator: every stir is one reseed with all contributions.
pub struct AesCore {
    generator: FortunaAesGenerator,
}

impl AesCore {
    pub fn new() -> Self {
        Self { generator: FortunaAesGenerator::new() }
    }
}

impl Default for AesCore {
    fn default() -> Self {
        Self::new()
    }
}

impl MixingCore for AesCore {
    fn byte_capacity(&self) -> usize {
        self.generator.natural_seed_length()
    }

    fn max_request(&self) -> usize {
        MAX_REQUEST
    }

    fn absorb_key(&mut self, key: &[u8]) -> Result<(), PrngError> {
        self.generator.reseed(key)
    }

    fn derive(&mut self, dest: &mut [u8]) -> Result<(), PrngError> {
        let written = self.generator.read(dest)?;
        if written < dest.len() {
            return Err(PrngError::NoRandomData);
        }
        Ok(())
    }

    // Every AES read already rekeys.
    fn seal(&mut self) {}

    fn stir(&mut self, contribution: &[u8]) -> Result<(), PrngError> {
        self.generator.reseed(contribution)
    }

    fn emit(&mut self, dest: &mut [u8]) -> Result<usize, PrngError> {
        self.generator.read(dest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::boxed::Box;

    #[test]
    fn test_sponge_core_limits() {
        let core = SpongeCore::new();
        assert_eq!(core.byte_capacity(), 128);
        assert_eq!(core.max_request(), 256);
    }

    #[test]
    fn test_aes_core_limits() {
        let core = AesCore::new();
        assert_eq!(core.byte_capacity(), 32);
        assert_eq!(core.max_request(), 1 << 20);
    }

    #[test]
    fn test_emit_is_forward_secure() {
        let mut a = SpongeCore::new();
        let mut b = SpongeCore::new();
        a.absorb_key(b"key").unwrap();
        b.absorb_key(b"key").unwrap();

        // Emitting twice must not be the same as one long squeeze.
        let mut first = [0u8; 32];
        let mut second = [0u8; 32];
        a.emit(&mut first).unwrap();
        a.emit(&mut second).unwrap();

        let mut long = [0u8; 64];
        b.emit(&mut long).unwrap();
        assert_eq!(first[..], long[..32]);
        assert_ne!(second[..], long[32..]);
        assert_eq!(*a.scratch, [0u8; SPONGE_BYTES]);
    }

    #[test]
    fn test_stir_changes_output() {
        fn sponge() -> Box<dyn MixingCore> {
            Box::new(SpongeCore::new())
        }
        fn aes() -> Box<dyn MixingCore> {
            Box::new(AesCore::new())
        }
        let makers: [fn() -> Box<dyn MixingCore>; 2] = [sponge, aes];
        for make in makers {
            let mut a = make();
            let mut b = make();
            a.absorb_key(b"key").unwrap();
            b.absorb_key(b"key").unwrap();
            a.stir(b"pool output").unwrap();
            b.stir(b"other output").unwrap();

            let mut out_a = [0u8; 32];
            let mut out_b = [0u8; 32];
            a.emit(&mut out_a).unwrap();
            b.emit(&mut out_b).unwrap();
            assert_ne!(out_a, out_b);
        }
    }

    #[test]
    fn test_aes_core_unkeyed_emit_fails() {
        let mut core = AesCore::new();
        let mut out = [0u8; 16];
        assert_eq!(core.emit(&mut out), Err(PrngError::NotInitialized));
        core.absorb_key(&[]).unwrap();
        assert_eq!(core.emit(&mut out), Ok(16));
    }
}
