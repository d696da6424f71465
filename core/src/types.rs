//! Shared primitive types used across the entire dashboard.

/// A stable, unique identifier for an influencer (UUID v4 text form).
pub type InfluencerId = String;

/// Monotonic counter bumped every time a new dataset is published.
pub type Generation = u64;

/// Calendar date of a post or a tracked order.
pub type Day = chrono::NaiveDate;
