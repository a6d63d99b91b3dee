//! Seeded jitter streams for trends, alert ids and the sample book.
//!
//! The engine draws trend noise and alert UUIDs from here and nowhere
//! else, so a ComputeContext's seed pins every random figure in the
//! output. Streams are keyed by JitterSlot; a slot's seed is
//! `seed ^ index * 0x9e3779b97f4a7c15`, so appending a slot leaves the
//! existing figures untouched.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;
use uuid::Uuid;

/// A named, deterministic RNG for a single consumer.
pub struct JitterRng {
    pub name: &'static str,
    inner: Pcg64Mcg,
}

impl JitterRng {
    /// Create a stream from the seed and a stable slot index.
    /// The index must never change once assigned.
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

    /// Draw a raw u64 (full range).
    pub fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    /// Roll a u64 in [0, n).
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        assert!(n > 0, "n must be > 0");
        self.inner.next_u64() % n
    }

    /// Symmetric jitter in [-width/2, width/2).
    pub fn jitter(&mut self, width: f64) -> f64 {
        (self.next_f64() - 0.5) * width
    }

    /// Sample from a simplified Pareto distribution.
    /// x_min: minimum value, alpha: shape parameter (higher = less skewed).
    pub fn pareto(&mut self, x_min: f64, alpha: f64) -> f64 {
        let u = self.next_f64().max(1e-10);
        x_min * u.powf(-1.0 / alpha)
    }

    /// A version-4 shaped UUID drawn from this stream.
    pub fn uuid(&mut self) -> Uuid {
        let mut bytes = [0u8; 16];
        self.inner.fill_bytes(&mut bytes);
        uuid::Builder::from_random_bytes(bytes).into_uuid()
    }
}

/// All jitter streams for one computation, indexed by stable slot.
pub struct JitterBank {
    seed: u64,
}

impl JitterBank {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn for_slot(&self, slot: JitterSlot) -> JitterRng {
        JitterRng::new(self.seed, slot as u64).with_name(slot.name())
    }
}

/// Stable stream assignments.
/// NEVER reorder or remove entries. Append only.
/// Reordering changes every stream's seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum JitterSlot {
    AumTrend = 0,
    RevenueTrend = 1,
    SegmentTrend = 2,
    AlertIds = 3,
    SampleBook = 4,
    // Add new streams here - append only.
}

impl JitterSlot {
    pub fn name(&self) -> &'static str {
        match self {
            Self::AumTrend => "aum_trend",
            Self::RevenueTrend => "revenue_trend",
            Self::SegmentTrend => "segment_trend",
            Self::AlertIds => "alert_ids",
            Self::SampleBook => "sample_book",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let bank = JitterBank::new(12345);
        let mut a = bank.for_slot(JitterSlot::AumTrend);
        let mut b = JitterBank::new(12345).for_slot(JitterSlot::AumTrend);
        for _ in 0..32 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn slots_are_independent_streams() {
        let bank = JitterBank::new(7);
        let mut aum = bank.for_slot(JitterSlot::AumTrend);
        let mut rev = bank.for_slot(JitterSlot::RevenueTrend);
        let a: Vec<u64> = (0..8).map(|_| aum.next_u64()).collect();
        let r: Vec<u64> = (0..8).map(|_| rev.next_u64()).collect();
        assert_ne!(a, r, "distinct slots must not share a stream");
    }

    #[test]
    fn bank_streams_carry_their_slot_name() {
        let bank = JitterBank::new(4);
        assert_eq!(bank.for_slot(JitterSlot::RevenueTrend).name, "revenue_trend");
        assert_eq!(bank.for_slot(JitterSlot::SampleBook).name, "sample_book");
    }

    #[test]
    fn jitter_stays_within_width() {
        let mut rng = JitterBank::new(99).for_slot(JitterSlot::SegmentTrend);
        for _ in 0..1_000 {
            let j = rng.jitter(0.2);
            assert!((-0.1..0.1).contains(&j), "jitter {j} outside ±0.1");
        }
    }

    #[test]
    fn uuids_are_deterministic_and_v4_shaped() {
        let mut a = JitterBank::new(1).for_slot(JitterSlot::AlertIds);
        let mut b = JitterBank::new(1).for_slot(JitterSlot::AlertIds);
        let id = a.uuid();
        assert_eq!(id, b.uuid());
        assert_eq!(id.get_version_num(), 4);
    }
}
