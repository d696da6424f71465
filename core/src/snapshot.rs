//! Snapshot: the complete dataset produced by one generation pass.
//!
//! A snapshot is immutable once built. Regeneration builds a new one
//! and publishes it through the SnapshotStore; nothing mutates the
//! tables of a published snapshot.

use crate::{
    model::{Influencer, PayoutEntry, Post, TrackingEntry},
    types::Generation,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub generation: Generation,
    pub influencers: Vec<Influencer>,
    pub posts: Vec<Post>,
    pub tracking: Vec<TrackingEntry>,
    pub payouts: Vec<PayoutEntry>,
}

impl Snapshot {
    pub fn influencer(&self, id: &str) -> Option<&Influencer> {
        self.influencers.iter().find(|i| i.id == id)
    }

    pub fn row_counts(&self) -> RowCounts {
        RowCounts {
            influencers: self.influencers.len(),
            posts: self.posts.len(),
            tracking: self.tracking.len(),
            payouts: self.payouts.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowCounts {
    pub influencers: usize,
    pub posts: usize,
    pub tracking: usize,
    pub payouts: usize,
}
