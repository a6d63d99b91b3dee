//! Computation context - everything an aggregation call needs besides
//! the records themselves.
//!
//! The engine never reads the system clock or a platform RNG. Both the
//! jitter seed and the as-of instant are supplied here, so two calls
//! with the same records and the same context produce identical output.

use crate::{rng::JitterBank, types::Timestamp};
use chrono::Utc;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ComputeContext {
    pub seed:  u64,
    pub as_of: Timestamp,
}

impl ComputeContext {
    pub fn new(seed: u64, as_of: Timestamp) -> Self {
        Self { seed, as_of }
    }

    /// Context pinned to the current wall-clock instant.
    /// Only display collaborators should call this; tests pin `as_of`.
    pub fn now(seed: u64) -> Self {
        Self::new(seed, Utc::now())
    }

    pub fn jitter_bank(&self) -> JitterBank {
        JitterBank::new(self.seed)
    }
}
