//! Mock data generator: synthesizes one complete, internally consistent
//! dataset per call.
//!
//! For each influencer, each of its posts, and each tracking row under a
//! post, values are drawn from fixed catalogs and ranges:
//!   - followers:  10,000 ..= 1,000,000
//!   - reach:      20–80% of followers
//!   - likes:      1–10% of reach
//!   - comments:   1–10% of likes
//!   - basis:      50/50 per-post (rate 500–5000) or per-order (rate 0.5–10)
//!   - orders:     1 ..= 50 per tracking row, at 200 ..= 1500 per order
//!
//! The funnel (comments <= likes <= reach <= followers) holds by
//! construction because every fraction is < 1 and values are floored.
//! One payout is emitted per post, carrying the orders accumulated by that
//! post's tracking rows.

use crate::{
    config::GeneratorConfig,
    error::DashResult,
    model::{
        Brand, Category, Gender, Influencer, PayoutBasis, PayoutEntry, Platform, Post, Product,
        TrackingEntry,
    },
    rng::{RngBank, StageSlot, StreamRng},
    snapshot::Snapshot,
    types::{Day, Generation},
};
use chrono::Duration;

pub const FOLLOWERS_MIN: u64 = 10_000;
pub const FOLLOWERS_MAX: u64 = 1_000_000;
pub const REACH_SHARE: (f64, f64) = (0.2, 0.8);
pub const ENGAGEMENT_SHARE: (f64, f64) = (0.01, 0.1);
pub const PER_POST_RATE: (f64, f64) = (500.0, 5000.0);
pub const PER_ORDER_RATE: (f64, f64) = (0.5, 10.0);
pub const ORDERS_PER_ENTRY: (u64, u64) = (1, 50);
pub const PRICE_PER_ORDER: (u64, u64) = (200, 1500);

/// One stream per stage, all derived from the same (seed, generation).
struct Streams {
    influencer: StreamRng,
    post: StreamRng,
    payout: StreamRng,
    tracking: StreamRng,
    identity: StreamRng,
}

impl Streams {
    fn new(bank: &RngBank, generation: Generation) -> Self {
        Self {
            influencer: bank.for_stage(StageSlot::Influencer, generation),
            post: bank.for_stage(StageSlot::Post, generation),
            payout: bank.for_stage(StageSlot::Payout, generation),
            tracking: bank.for_stage(StageSlot::Tracking, generation),
            identity: bank.for_stage(StageSlot::Identity, generation),
        }
    }
}

pub struct MockDataGenerator<'a> {
    config: &'a GeneratorConfig,
}

impl<'a> MockDataGenerator<'a> {
    pub fn new(config: &'a GeneratorConfig) -> Self {
        Self { config }
    }

    /// Build generation `generation` of the dataset.
    /// Invalid counts are rejected before anything is drawn.
    pub fn generate(&self, bank: &RngBank, generation: Generation) -> DashResult<Snapshot> {
        self.config.validate()?;
        let cfg = self.config;
        let mut rng = Streams::new(bank, generation);

        let n_posts = cfg.num_influencers * cfg.posts_per_influencer;
        let mut snapshot = Snapshot {
            generation,
            influencers: Vec::with_capacity(cfg.num_influencers),
            posts: Vec::with_capacity(n_posts),
            tracking: Vec::with_capacity(n_posts * cfg.tracking_entries_per_post),
            payouts: Vec::with_capacity(n_posts),
        };

        for i in 0..cfg.num_influencers {
            let influencer = self.influencer(i, &mut rng);

            for _ in 0..cfg.posts_per_influencer {
                let post = self.post(&influencer, &mut rng);
                let basis = if rng.payout.chance(0.5) {
                    PayoutBasis::PerPost
                } else {
                    PayoutBasis::PerOrder
                };
                let rate = match basis {
                    PayoutBasis::PerPost => rng.payout.uniform(PER_POST_RATE.0, PER_POST_RATE.1),
                    PayoutBasis::PerOrder => {
                        rng.payout.uniform(PER_ORDER_RATE.0, PER_ORDER_RATE.1)
                    }
                };

                let mut post_orders = 0u64;
                for _ in 0..cfg.tracking_entries_per_post {
                    let entry = self.tracking_entry(&influencer, &post, &mut rng);
                    post_orders += entry.orders;
                    snapshot.tracking.push(entry);
                }

                snapshot.payouts.push(PayoutEntry::new(
                    influencer.id.clone(),
                    basis,
                    rate,
                    post_orders,
                ));
                snapshot.posts.push(post);
            }
            snapshot.influencers.push(influencer);
        }

        log::info!(
            "generation {generation}: {} influencers, {} posts, {} tracking rows, {} payouts",
            snapshot.influencers.len(),
            snapshot.posts.len(),
            snapshot.tracking.len(),
            snapshot.payouts.len()
        );
        Ok(snapshot)
    }

    fn influencer(&self, index: usize, rng: &mut Streams) -> Influencer {
        let r = &mut rng.influencer;
        Influencer {
            id: rng.identity.uuid().to_string(),
            name: format!("Influencer {}", index + 1),
            category: r.pick(Category::ALL),
            gender: r.pick(Gender::ALL),
            follower_count: r.range_inclusive(FOLLOWERS_MIN, FOLLOWERS_MAX),
            platform: r.pick(Platform::ALL),
        }
    }

    fn post(&self, influencer: &Influencer, rng: &mut Streams) -> Post {
        let r = &mut rng.post;
        let platform = r.pick(Platform::ALL);
        let date = self.config.window_start
            + Duration::days(r.next_u64_below(self.config.window_days()) as i64);

        let reach = share_of(influencer.follower_count, r.uniform(REACH_SHARE.0, REACH_SHARE.1));
        let likes = share_of(reach, r.uniform(ENGAGEMENT_SHARE.0, ENGAGEMENT_SHARE.1));
        let comments = share_of(likes, r.uniform(ENGAGEMENT_SHARE.0, ENGAGEMENT_SHARE.1));

        let product = r.pick(Product::ALL);
        let brand = r.pick(Brand::ALL);

        Post {
            influencer_id: influencer.id.clone(),
            platform,
            date,
            url: format!(
                "https://{}.com/post/{}",
                platform.label().to_lowercase(),
                rng.identity.uuid()
            ),
            caption: format!("Check out this amazing {product} from {brand}! #ad #healthkart"),
            reach,
            likes,
            comments,
        }
    }

    fn tracking_entry(&self, influencer: &Influencer, post: &Post, rng: &mut Streams) -> TrackingEntry {
        let r = &mut rng.tracking;
        let offset = r.next_u64_below(u64::from(self.config.attribution_window_days));
        let date: Day = post.date + Duration::days(offset as i64);
        let campaign = format!(
            "Campaign-{}",
            r.range_inclusive(1, u64::from(self.config.campaign_count))
        );
        let orders = r.range_inclusive(ORDERS_PER_ENTRY.0, ORDERS_PER_ENTRY.1);
        let price = r.range_inclusive(PRICE_PER_ORDER.0, PRICE_PER_ORDER.1);

        TrackingEntry {
            source: post.platform,
            campaign,
            influencer_id: influencer.id.clone(),
            user_id: rng.identity.uuid().to_string(),
            product: r.pick(Product::ALL),
            brand: r.pick(Brand::ALL),
            date,
            orders,
            revenue: orders * price,
        }
    }
}

/// Floor of `value * fraction`; never exceeds `value` for fraction < 1.
fn share_of(value: u64, fraction: f64) -> u64 {
    ((value as f64 * fraction).floor() as u64).min(value)
}
