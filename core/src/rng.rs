//! Deterministic random number generation for sample send logs.
//!
//! RULE: Sample generation never touches a platform RNG.
//! All randomness flows through SampleRng streams derived from one seed.
//!
//! Each concern gets its own stream, seeded from (seed XOR slot mix), so:
//!   - Drawing more timing values never shifts status outcomes.
//!   - Each stream is reproducible in isolation.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

/// A named, deterministic RNG stream.
pub struct SampleRng {
    pub name: &'static str,
    inner: Pcg64Mcg,
}

impl SampleRng {
    /// Derive a stream from the seed and a stable slot index.
    pub fn new(seed: u64, slot_index: u64) -> Self {
        let derived_seed = seed ^ (slot_index.wrapping_mul(0x9e37_79b9_7f4a_7c15));
        Self {
            name: "unnamed",
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Roll a u64 in [0, n). `n == 0` yields 0.
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        if n == 0 {
            return 0;
        }
        self.inner.next_u64() % n
    }

    /// Roll an i64 in [lo, hi]. Returns `lo` when the range is empty.
    pub fn range_inclusive(&mut self, lo: i64, hi: i64) -> i64 {
        if hi <= lo {
            return lo;
        }
        let span = (hi - lo) as u64 + 1;
        lo + self.next_u64_below(span) as i64
    }

    /// Bernoulli trial: returns true with probability p.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

/// Every stream for one generated sample.
pub struct SampleRngBank {
    seed: u64,
}

impl SampleRngBank {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn stream(&self, slot: SampleSlot) -> SampleRng {
        SampleRng::new(self.seed, slot as u64).with_name(slot.name())
    }
}

/// Stable stream slot assignments.
/// NEVER reorder or remove entries. Only append.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum SampleSlot {
    Campaign = 0,
    Status = 1,
    Timing = 2,
    Engagement = 3,
}

impl SampleSlot {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Campaign   => "campaign",
            Self::Status     => "status",
            Self::Timing     => "timing",
            Self::Engagement => "engagement",
        }
    }
}
