//! Shared primitive types used across the desk core.

use chrono::{DateTime, Utc};

/// A stable, unique identifier for any record the desk consumes.
pub type EntityId = String;

/// Wall-clock instant. Always UTC; the display layer localizes.
pub type Timestamp = DateTime<Utc>;

/// Label used for customers whose segment is absent.
pub const UNCLASSIFIED_SEGMENT: &str = "Unclassified";
