//! Filter engine: narrows the tracking and payout tables to one
//! brand/product/category/platform selection.
//!
//! Brand, product and platform are direct predicates on tracking rows.
//! Category goes through the influencer table: the ids of influencers in
//! that category gate which tracking rows survive. Payouts are then kept
//! for every influencer with at least one surviving tracking row, whichever
//! post the payout came from. Posts and influencers are never filtered.

use crate::{
    error::DashResult,
    model::{Brand, Category, PayoutEntry, Platform, Product, TrackingEntry},
    snapshot::Snapshot,
};
use serde::{Serialize, Serializer};
use std::{
    collections::{BTreeSet, HashSet},
    fmt,
    str::FromStr,
};

/// Wildcard label accepted by every filter.
pub const ALL: &str = "All";

/// One filter slot: either the wildcard or a concrete catalog value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection<T> {
    All,
    Only(T),
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Selection::All
    }
}

impl<T: PartialEq> Selection<T> {
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(wanted) => wanted == value,
        }
    }
}

impl<T: FromStr> Selection<T> {
    /// `"All"` is the wildcard; anything else must parse as `T`.
    pub fn parse(raw: &str) -> Result<Self, T::Err> {
        if raw == ALL {
            Ok(Selection::All)
        } else {
            raw.parse().map(Selection::Only)
        }
    }
}

impl<T: fmt::Display> fmt::Display for Selection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => f.write_str(ALL),
            Selection::Only(v) => v.fmt(f),
        }
    }
}

impl<T: fmt::Display> Serialize for Selection<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FilterSelection {
    pub brand: Selection<Brand>,
    pub product: Selection<Product>,
    pub category: Selection<Category>,
    pub platform: Selection<Platform>,
}

impl FilterSelection {
    /// Parse the four dropdown values. Unknown values are InvalidParameter.
    pub fn parse(brand: &str, product: &str, category: &str, platform: &str) -> DashResult<Self> {
        Ok(Self {
            brand: Selection::parse(brand)?,
            product: Selection::parse(product)?,
            category: Selection::parse(category)?,
            platform: Selection::parse(platform)?,
        })
    }

    pub fn is_unfiltered(&self) -> bool {
        *self == Self::default()
    }
}

/// The tracking and payout rows that survive one selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilteredTables {
    pub tracking: Vec<TrackingEntry>,
    pub payouts: Vec<PayoutEntry>,
}

impl FilteredTables {
    pub fn is_empty(&self) -> bool {
        self.tracking.is_empty() && self.payouts.is_empty()
    }
}

pub fn apply_filters(snapshot: &Snapshot, selection: &FilterSelection) -> FilteredTables {
    let category_ids: Option<HashSet<&str>> = match selection.category {
        Selection::All => None,
        Selection::Only(category) => Some(
            snapshot
                .influencers
                .iter()
                .filter(|i| i.category == category)
                .map(|i| i.id.as_str())
                .collect(),
        ),
    };

    let tracking: Vec<TrackingEntry> = snapshot
        .tracking
        .iter()
        .filter(|t| selection.brand.matches(&t.brand))
        .filter(|t| selection.product.matches(&t.product))
        .filter(|t| selection.platform.matches(&t.source))
        .filter(|t| {
            category_ids
                .as_ref()
                .map_or(true, |ids| ids.contains(t.influencer_id.as_str()))
        })
        .cloned()
        .collect();

    let visible: HashSet<&str> = tracking.iter().map(|t| t.influencer_id.as_str()).collect();
    let payouts: Vec<PayoutEntry> = snapshot
        .payouts
        .iter()
        .filter(|p| visible.contains(p.influencer_id.as_str()))
        .cloned()
        .collect();

    log::debug!(
        "generation {}: filters {:?} kept {}/{} tracking rows, {}/{} payouts",
        snapshot.generation,
        selection,
        tracking.len(),
        snapshot.tracking.len(),
        payouts.len(),
        snapshot.payouts.len()
    );

    FilteredTables { tracking, payouts }
}

/// Dropdown choices for the current data, each list led by "All".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub brands: Vec<String>,
    pub products: Vec<String>,
    pub categories: Vec<String>,
    pub platforms: Vec<String>,
}

impl FilterOptions {
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        Self {
            brands: with_wildcard(snapshot.tracking.iter().map(|t| t.brand.label())),
            products: with_wildcard(snapshot.tracking.iter().map(|t| t.product.label())),
            categories: with_wildcard(snapshot.influencers.iter().map(|i| i.category.label())),
            platforms: with_wildcard(snapshot.tracking.iter().map(|t| t.source.label())),
        }
    }
}

fn with_wildcard<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let distinct: BTreeSet<&str> = values.collect();
    std::iter::once(ALL)
        .chain(distinct)
        .map(str::to_string)
        .collect()
}
