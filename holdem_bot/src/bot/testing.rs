//! Deterministic randomness for unit tests.

use rand::RngCore;

/// Yields the same word forever: `low()` makes every uniform draw 0.0,
/// `high()` makes every draw just under 1.0.
#[derive(Debug, Clone, Copy)]
pub struct FixedRng(pub u64);

impl FixedRng {
    pub fn low() -> Self {
        Self(0)
    }

    pub fn high() -> Self {
        Self(u64::MAX)
    }
}

impl RngCore for FixedRng {
    fn next_u32(&mut self) -> u32 {
        (self.0 >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.0
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        dst.fill(self.0 as u8);
    }
}
