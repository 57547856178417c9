//! Nullable entropy: deterministic bytes for mnemonic generation.

use rand::{CryptoRng, Error, RngCore};

/// A byte source that cycles through a fixed pattern.
///
/// Marked [`CryptoRng`] so it can stand in for the OS generator in tests.
/// Never use it outside tests.
pub struct NullEntropy {
    pattern: Vec<u8>,
    position: usize,
}

impl NullEntropy {
    /// Cycle through `pattern`. An empty pattern yields zero bytes.
    pub fn new(pattern: Vec<u8>) -> Self {
        Self {
            pattern,
            position: 0,
        }
    }

    /// Always produce `byte`.
    pub fn constant(byte: u8) -> Self {
        Self::new(vec![byte])
    }

    fn next_byte(&mut self) -> u8 {
        if self.pattern.is_empty() {
            return 0;
        }
        let byte = self.pattern[self.position % self.pattern.len()];
        self.position += 1;
        byte
    }
}

impl RngCore for NullEntropy {
    fn next_u32(&mut self) -> u32 {
        let mut bytes = [0u8; 4];
        self.fill_bytes(&mut bytes);
        u32::from_le_bytes(bytes)
    }

    fn next_u64(&mut self) -> u64 {
        let mut bytes = [0u8; 8];
        self.fill_bytes(&mut bytes);
        u64::from_le_bytes(bytes)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for byte in dest.iter_mut() {
            *byte = self.next_byte();
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl CryptoRng for NullEntropy {}
