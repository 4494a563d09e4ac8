//! Keccak sponge pool.

use alloc::boxed::Box;
use zeroize::Zeroizing;

use super::{EntropyExtractor, ExtractorFactory};
use crate::sponge::{BitCapacity, Keccak1600Sponge, Sponge};

const CAPACITY: BitCapacity = BitCapacity::Security256;
const BYTE_CAPACITY: usize = CAPACITY.bytes();

pub struct SpongeExtractor {
    sponge: Keccak1600Sponge,
    state: Zeroizing<[u8; BYTE_CAPACITY]>,
    bytes_written: u64,
    read_count: u64,
}

impl SpongeExtractor {
    pub fn new(key: &[u8]) -> Self {
        let mut extractor = Self {
            sponge: Keccak1600Sponge::new(CAPACITY),
            state: Zeroizing::new([0u8; BYTE_CAPACITY]),
            bytes_written: 0,
            read_count: 0,
        };
        extractor.reset(key);
        extractor
    }

    // Bind the read counter into the pool before squeezing.
    fn stir(&mut self) {
        self.sponge.reabsorb();
        self.sponge.absorb(&self.read_count.to_le_bytes());
    }
}

impl EntropyExtractor for SpongeExtractor {
    fn byte_capacity(&self) -> usize {
        BYTE_CAPACITY
    }

    fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    fn read_count(&self) -> u64 {
        self.read_count
    }

    fn reset(&mut self, key: &[u8]) {
        self.sponge = Keccak1600Sponge::new(CAPACITY);
        self.sponge.absorb(key);
        self.sponge.irreversible_reabsorb(&mut self.state[..]);

        self.bytes_written = 0;
        self.read_count = 0;
    }

    fn add_entropy(&mut self, data: &[u8]) {
        if data.is_empty() {
            return;
        }
        self.bytes_written = self.bytes_written.saturating_add(data.len() as u64);
        self.sponge.absorb(data);
    }

    fn read(&mut self, dest: &mut [u8]) -> usize {
        self.read_count += 1;
        self.stir();

        let length = dest.len().min(BYTE_CAPACITY);
        self.sponge.squeeze(&mut dest[..length]);
        self.sponge.irreversible_reabsorb(&mut self.state[..]);

        length
    }
}

pub struct SpongeExtractorFactory;

impl ExtractorFactory for SpongeExtractorFactory {
    fn create(&self, key: &[u8]) -> Box<dyn EntropyExtractor> {
        Box::new(SpongeExtractor::new(key))
    }
}
