//! Hand-built fixtures shared by the integration tests.
#![allow(dead_code)]

use chrono::NaiveDate;
use influencer_core::{
    model::{
        Brand, Category, Gender, Influencer, PayoutBasis, PayoutEntry, Platform, Post, Product,
        TrackingEntry,
    },
    snapshot::Snapshot,
};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
}

pub fn influencer(id: &str, category: Category) -> Influencer {
    Influencer {
        id: id.into(),
        name: format!("Influencer {id}"),
        category,
        gender: Gender::Other,
        follower_count: 100_000,
        platform: Platform::Instagram,
    }
}

pub fn post(influencer_id: &str, reach: u64, likes: u64, comments: u64) -> Post {
    Post {
        influencer_id: influencer_id.into(),
        platform: Platform::Instagram,
        date: day(1),
        url: format!("https://instagram.com/post/{influencer_id}"),
        caption: "Check out this amazing Creatine from MuscleBlaze! #ad #healthkart".into(),
        reach,
        likes,
        comments,
    }
}

pub fn tracking(influencer_id: &str, brand: Brand, revenue: u64) -> TrackingEntry {
    TrackingEntry {
        source: Platform::Instagram,
        campaign: "Campaign-1".into(),
        influencer_id: influencer_id.into(),
        user_id: format!("user-{influencer_id}-{revenue}"),
        product: Product::Creatine,
        brand,
        date: day(2),
        orders: 1,
        revenue,
    }
}

pub fn flat_payout(influencer_id: &str, amount: f64) -> PayoutEntry {
    PayoutEntry::new(influencer_id.into(), PayoutBasis::PerPost, amount, 0)
}

/// Three influencers; only "a" sells (100 + 200) and is paid 100.
/// "b" is paid but sells nothing, so its payout is never visible.
pub fn three_influencer_snapshot() -> Snapshot {
    Snapshot {
        generation: 1,
        influencers: vec![
            influencer("a", Category::Fitness),
            influencer("b", Category::Beauty),
            influencer("c", Category::Gaming),
        ],
        posts: vec![post("a", 5_000, 300, 20), post("b", 8_000, 400, 10)],
        tracking: vec![
            tracking("a", Brand::MuscleBlaze, 100),
            tracking("a", Brand::MuscleBlaze, 200),
        ],
        payouts: vec![flat_payout("a", 100.0), flat_payout("b", 500.0)],
    }
}
