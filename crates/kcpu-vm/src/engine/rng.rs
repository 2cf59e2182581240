//! Deterministic SplitMix64 stream behind the `$` operator.

/// Seed used when the builder is not given one.
pub const DEFAULT_SEED: u64 = 0x6B63_7075_5EED_0001;

const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// A reproducible pseudo-random stream. Equal seeds give equal sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rng {
    state: u64,
}

impl Rng {
    pub const fn new(seed: u64) -> Self {
        // SplitMix64 wants a non-zero state
        let state = if seed == 0 { GOLDEN_GAMMA } else { seed };
        Self { state }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(GOLDEN_GAMMA);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform value in `[0, 1)` from the upper 53 bits.
    pub fn unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Uniform value between `a` and `b`, in either order.
    ///
    /// Equal bounds return the bound itself.
    pub fn between(&mut self, a: f64, b: f64) -> f64 {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        low + self.unit() * (high - low)
    }
}

impl Default for Rng {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}
