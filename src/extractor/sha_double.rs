//! Fortuna SHA-d256 pool.
//!
//! `SHA-d256(m) = SHA256(SHA256(0^512 || m))`. The leading zero block
//! defeats length extension on the inner hash.

use alloc::boxed::Box;
use sha2::{Digest, Sha256};
use zeroize::{Zeroize, Zeroizing};

use super::{EntropyExtractor, ExtractorFactory};

pub const DIGEST_LEN: usize = 32;

const ZERO_BLOCK: [u8; 64] = [0u8; 64];

/// Chaining label that separates the next pool key from the emitted digest.
const CHAIN_LABEL: &[u8] = b"pool chain";

/// Incremental SHA-d256.
#[derive(Clone)]
pub struct ShaDouble256 {
    inner: Sha256,
}

impl ShaDouble256 {
    pub fn new() -> Self {
        let mut inner = Sha256::new();
        inner.update(ZERO_BLOCK);
        Self { inner }
    }

    pub fn update(&mut self, data: &[u8]) {
        self.inner.update(data);
    }

    pub fn finalize(self) -> Zeroizing<[u8; DIGEST_LEN]> {
        let mut inner = Zeroizing::new([0u8; DIGEST_LEN]);
        inner.copy_from_slice(&self.inner.finalize());
        outer(&inner, &[])
    }

    /// Finalizes into `(digest, chain)`. Both derive from the inner hash, but
    /// the chain value cannot be computed from the digest.
    pub fn finalize_chained(self) -> (Zeroizing<[u8; DIGEST_LEN]>, Zeroizing<[u8; DIGEST_LEN]>) {
        let mut inner = Zeroizing::new([0u8; DIGEST_LEN]);
        inner.copy_from_slice(&self.inner.finalize());
        (outer(&inner, &[]), outer(&inner, CHAIN_LABEL))
    }
}

impl Default for ShaDouble256 {
    fn default() -> Self {
        Self::new()
    }
}

fn outer(inner: &[u8; DIGEST_LEN], label: &[u8]) -> Zeroizing<[u8; DIGEST_LEN]> {
    let mut hasher = Sha256::new();
    hasher.update(inner);
    hasher.update(label);
    let mut out = Zeroizing::new([0u8; DIGEST_LEN]);
    out.copy_from_slice(&hasher.finalize());
    out
}

pub struct ShaDoubleExtractor {
    hash: ShaDouble256,
    bytes_written: u64,
    read_count: u64,
}

impl ShaDoubleExtractor {
    pub fn new(key: &[u8]) -> Self {
        let mut extractor = Self {
            hash: ShaDouble256::new(),
            bytes_written: 0,
            read_count: 0,
        };
        extractor.reset(key);
        extractor
    }
}

impl EntropyExtractor for ShaDoubleExtractor {
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
        self.hash = ShaDouble256::new();
        self.hash.update(key);
        self.bytes_written = 0;
        self.read_count = 0;
    }

    fn add_entropy(&mut self, data: &[u8]) {
        if data.is_empty() {
            return;
        }
        self.bytes_written = self.bytes_written.saturating_add(data.len() as u64);
        self.hash.update(data);
    }

    fn read(&mut self, dest: &mut [u8]) -> usize {
        self.read_count += 1;
        self.hash.update(&self.read_count.to_le_bytes());

        let pool = core::mem::replace(&mut self.hash, ShaDouble256::new());
        let (digest, mut chain) = pool.finalize_chained();
        self.hash.update(&chain[..]);
        chain.zeroize();

        let length = dest.len().min(DIGEST_LEN);
        dest[..length].copy_from_slice(&digest[..length]);
        length
    }
}

pub struct ShaDoubleExtractorFactory;

impl ExtractorFactory for ShaDoubleExtractorFactory {
    fn create(&self, key: &[u8]) -> Box<dyn EntropyExtractor> {
        Box::new(ShaDoubleExtractor::new(key))
    }
}
