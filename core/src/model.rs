//! Typed records for the four dashboard tables, plus the fixed catalogs
//! their categorical fields draw from.
//!
//! Every table is an ordered `Vec` of one record type. Foreign keys are
//! influencer ids; nothing links a tracking row or a payout back to the post
//! that produced it.

use crate::{
    error::{DashError, DashResult},
    types::{Day, InfluencerId},
};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Declares a closed catalog enum whose wire/display form is a fixed label.
macro_rules! catalog {
    ($(#[$meta:meta])* $name:ident, $param:literal { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $label)] $variant,)+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = DashError;

            fn from_str(s: &str) -> DashResult<Self> {
                match s {
                    $($label => Ok($name::$variant),)+
                    other => Err(DashError::invalid(
                        $param,
                        format!("unknown value '{other}'"),
                    )),
                }
            }
        }
    };
}

catalog!(
    /// Influencer persona; the grouping key of the category rollup.
    Category, "category" {
        Fitness => "Fitness",
        Beauty => "Beauty",
        Nutrition => "Nutrition",
        Lifestyle => "Lifestyle",
        Gaming => "Gaming",
    }
);

catalog!(Gender, "gender" {
    Male => "Male",
    Female => "Female",
    Other => "Other",
});

catalog!(Platform, "platform" {
    Instagram => "Instagram",
    YouTube => "YouTube",
    Twitter => "Twitter",
});

catalog!(Brand, "brand" {
    MuscleBlaze => "MuscleBlaze",
    HkVitals => "HKVitals",
    Gritzo => "Gritzo",
    TrueBasics => "TrueBasics",
});

catalog!(Product, "product" {
    ProteinPowder => "Protein Powder",
    Multivitamin => "Multivitamin",
    KidsNutrition => "Kids Nutrition",
    Omega3 => "Omega-3",
    Creatine => "Creatine",
    HairGummies => "Hair Gummies",
});

catalog!(
    /// How a payout is computed: flat per post, or per attributed order.
    PayoutBasis, "basis" {
        PerPost => "post",
        PerOrder => "order",
    }
);

/// A table of the exported dataset: its file stem and column order.
pub trait Record: Serialize + for<'de> Deserialize<'de> {
    const TABLE: &'static str;
    const COLUMNS: &'static [&'static str];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Influencer {
    pub id: InfluencerId,
    pub name: String,
    pub category: Category,
    pub gender: Gender,
    pub follower_count: u64,
    /// Primary platform.
    pub platform: Platform,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub influencer_id: InfluencerId,
    pub platform: Platform,
    pub date: Day,
    pub url: String,
    pub caption: String,
    pub reach: u64,
    pub likes: u64,
    pub comments: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingEntry {
    pub source: Platform,
    pub campaign: String,
    pub influencer_id: InfluencerId,
    pub user_id: String,
    pub product: Product,
    pub brand: Brand,
    pub date: Day,
    pub orders: u64,
    pub revenue: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoutEntry {
    pub influencer_id: InfluencerId,
    pub basis: PayoutBasis,
    pub rate: f64,
    /// Orders attributed to the post this payout was generated for.
    pub orders: u64,
    pub total_payout: f64,
}

impl PayoutEntry {
    /// Build a payout with `total_payout` derived from basis, rate and orders.
    pub fn new(influencer_id: InfluencerId, basis: PayoutBasis, rate: f64, orders: u64) -> Self {
        let total_payout = match basis {
            PayoutBasis::PerPost => rate,
            PayoutBasis::PerOrder => orders as f64 * rate,
        };
        Self { influencer_id, basis, rate, orders, total_payout }
    }
}

impl Record for TrackingEntry {
    const TABLE: &'static str = "tracking_data";
    const COLUMNS: &'static [&'static str] = &[
        "source", "campaign", "influencer_id", "user_id", "product",
        "brand", "date", "orders", "revenue",
    ];
}

impl Record for PayoutEntry {
    const TABLE: &'static str = "payouts";
    const COLUMNS: &'static [&'static str] =
        &["influencer_id", "basis", "rate", "orders", "total_payout"];
}

impl Record for Influencer {
    const TABLE: &'static str = "influencers";
    const COLUMNS: &'static [&'static str] =
        &["id", "name", "category", "gender", "follower_count", "platform"];
}

impl Record for Post {
    const TABLE: &'static str = "posts";
    const COLUMNS: &'static [&'static str] = &[
        "influencer_id", "platform", "date", "url", "caption",
        "reach", "likes", "comments",
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_labels_round_trip_through_from_str() {
        for p in Product::ALL {
            assert_eq!(p.label().parse::<Product>().unwrap(), *p);
        }
        assert_eq!("HKVitals".parse::<Brand>().unwrap(), Brand::HkVitals);
    }

    #[test]
    fn unknown_label_is_invalid_parameter() {
        let err = "Snapchat".parse::<Platform>().unwrap_err();
        assert!(matches!(err, DashError::InvalidParameter { ref name, .. } if name == "platform"));
    }

    #[test]
    fn payout_total_follows_basis() {
        let flat = PayoutEntry::new("a".into(), PayoutBasis::PerPost, 1_200.0, 40);
        assert_eq!(flat.total_payout, 1_200.0);

        let per_order = PayoutEntry::new("a".into(), PayoutBasis::PerOrder, 2.5, 40);
        assert_eq!(per_order.total_payout, 100.0);
    }
}
