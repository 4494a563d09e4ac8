//! Keyed BLAKE3 pool.
//!
//! The pool is a keyed hasher. A read appends the read counter, expands the
//! hash through the XOF and splits it: the first half is emitted, the second
//! half keys the hasher that replaces the pool.

use alloc::boxed::Box;
use ::blake3::Hasher;
use zeroize::Zeroizing;

use super::{EntropyExtractor, ExtractorFactory};

pub const DIGEST_LEN: usize = 32;

const RESET_CONTEXT: &str = "sponge-fortuna 2026-01-01 blake3 pool reset";

pub struct Blake3Extractor {
    hasher: Hasher,
    bytes_written: u64,
    read_count: u64,
}

impl Blake3Extractor {
    pub fn new(key: &[u8]) -> Self {
        let mut extractor = Self {
            hasher: Hasher::new(),
            bytes_written: 0,
            read_count: 0,
        };
        extractor.reset(key);
        extractor
    }
}

impl EntropyExtractor for Blake3Extractor {
    fn byte_capacity(&self) -> usize {
        DIGEST_LEN
    }

    fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    fn read_count(&self) -> u64 {
        self.read_count
    }

    fn reset(&mut self, key: &[u8]) {
        let pool_key = Zeroizing::new(::blake3::derive_key(RESET_CONTEXT, key));
        self.hasher = Hasher::new_keyed(&pool_key);
        self.bytes_written = 0;
        self.read_count = 0;
    }

    fn add_entropy(&mut self, data: &[u8]) {
        if data.is_empty() {
            return;
        }
        self.bytes_written = self.bytes_written.saturating_add(data.len() as u64);
        self.hasher.update(data);
    }

    fn read(&mut self, dest: &mut [u8]) -> usize {
        self.read_count += 1;
        self.hasher.update(&self.read_count.to_le_bytes());

        let mut expanded = Zeroizing::new([0u8; 2 * DIGEST_LEN]);
        self.hasher.finalize_xof().fill(&mut expanded[..]);

        let mut next_key = Zeroizing::new([0u8; DIGEST_LEN]);
        next_key.copy_from_slice(&expanded[DIGEST_LEN..]);
        self.hasher = Hasher::new_keyed(&next_key);

        let length = dest.len().min(DIGEST_LEN);
        dest[..length].copy_from_slice(&expanded[..length]);
        length
    }
}

pub struct Blake3ExtractorFactory;

impl ExtractorFactory for Blake3ExtractorFactory {
    fn create(&self, key: &[u8]) -> Box<dyn EntropyExtractor> {
        Box::new(Blake3Extractor::new(key))
    }
}
