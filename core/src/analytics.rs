//! Aggregation pipeline: turns one filtered view of the dataset into
//! the KPIs, rollups, rankings and chart series the dashboard shows.
//!
//! Stages, in order:
//!   1. Global KPIs from the filtered tracking and payout tables
//!   2. Per-influencer rollup: tracking sums, left-joined with payout sums,
//!      unfiltered post sums, and influencer attributes
//!   3. Per-category rollup over the per-influencer rows
//!   4. Ranked views (top revenue, top ROAS, poor ROI)
//!   5. Revenue chart series (by date, platform, campaign)
//!
//! Post sums deliberately ignore the filters; only tracking and payouts are
//! narrowed. Every ratio is a `Ratio`, so an empty selection degrades to
//! zero totals and undefined ratios rather than an error.

use crate::{
    config::AnalyticsConfig,
    error::{DashError, DashResult},
    filter::FilteredTables,
    model::{Category, Influencer, PayoutEntry, Platform, Post, Record, TrackingEntry},
    ratio::Ratio,
    types::{Day, InfluencerId},
};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

// ── Public types ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Kpis {
    pub total_revenue: u64,
    pub total_orders: u64,
    pub total_payout: f64,
    pub roas: Ratio,
    pub incremental_roas: Ratio,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfluencerPerformance {
    pub influencer_id: InfluencerId,
    pub name: String,
    pub category: Category,
    pub platform: Platform,
    pub follower_count: u64,
    pub total_revenue: u64,
    pub total_orders: u64,
    pub total_payout: f64,
    pub total_reach: u64,
    pub total_likes: u64,
    pub total_comments: u64,
    pub roas: Ratio,
    pub incremental_roas: Ratio,
}

/// Persona performance: one row per influencer category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryPerformance {
    pub category: Category,
    /// Mean over influencers with ROAS > 0 only.
    pub avg_roas: Ratio,
    pub total_revenue: u64,
    pub total_payout: f64,
    pub influencer_count: usize,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Rankings {
    pub top_by_revenue: Vec<InfluencerPerformance>,
    pub top_by_roas: Vec<InfluencerPerformance>,
    /// ROAS below 1 with a non-zero payout, worst first.
    pub poor_roi: Vec<InfluencerPerformance>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint<X> {
    pub x: X,
    pub y: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RevenueCharts {
    pub over_time: Vec<SeriesPoint<Day>>,
    pub by_platform: Vec<SeriesPoint<String>>,
    pub by_campaign: Vec<SeriesPoint<String>>,
}

/// Everything one refresh hands to the presentation layer.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AnalyticsReport {
    pub kpis: Kpis,
    pub charts: RevenueCharts,
    pub influencers: Vec<InfluencerPerformance>,
    pub personas: Vec<CategoryPerformance>,
    pub rankings: Rankings,
    pub payouts: Vec<PayoutEntry>,
}

// ── Pipeline ─────────────────────────────────────────────────────────────────

/// Run every stage over one filtered view.
pub fn analyze(
    filtered: &FilteredTables,
    influencers: &[Influencer],
    posts: &[Post],
    config: &AnalyticsConfig,
) -> DashResult<AnalyticsReport> {
    config.validate()?;
    let kpis = compute_kpis(filtered, config);
    let rows = influencer_rollup(filtered, influencers, posts, config)?;
    let personas = category_rollup(&rows);
    let rankings = rank(&rows, config.top_n);
    let charts = revenue_charts(&filtered.tracking);

    Ok(AnalyticsReport {
        kpis,
        charts,
        influencers: rows,
        personas,
        rankings,
        payouts: filtered.payouts.clone(),
    })
}

pub fn compute_kpis(filtered: &FilteredTables, config: &AnalyticsConfig) -> Kpis {
    let total_revenue: u64 = filtered.tracking.iter().map(|t| t.revenue).sum();
    let total_orders: u64 = filtered.tracking.iter().map(|t| t.orders).sum();
    let total_payout: f64 = filtered.payouts.iter().map(|p| p.total_payout).sum();
    let (roas, incremental_roas) = roas_pair(total_revenue, total_payout, config);
    Kpis {
        total_revenue,
        total_orders,
        total_payout,
        roas,
        incremental_roas,
    }
}

/// One row per influencer with at least one filtered tracking row,
/// ordered by influencer id.
pub fn influencer_rollup(
    filtered: &FilteredTables,
    influencers: &[Influencer],
    posts: &[Post],
    config: &AnalyticsConfig,
) -> DashResult<Vec<InfluencerPerformance>> {
    let by_id: HashMap<&str, &Influencer> =
        influencers.iter().map(|i| (i.id.as_str(), i)).collect();

    let mut sales: BTreeMap<&str, (u64, u64)> = BTreeMap::new();
    for t in &filtered.tracking {
        let entry = sales.entry(t.influencer_id.as_str()).or_default();
        entry.0 += t.revenue;
        entry.1 += t.orders;
    }

    let mut payout_sums: HashMap<&str, f64> = HashMap::new();
    for p in &filtered.payouts {
        if !by_id.contains_key(p.influencer_id.as_str()) {
            return Err(unknown_influencer::<PayoutEntry>(&p.influencer_id));
        }
        *payout_sums.entry(p.influencer_id.as_str()).or_default() += p.total_payout;
    }

    let mut engagement: HashMap<&str, (u64, u64, u64)> = HashMap::new();
    for post in posts {
        let entry = engagement.entry(post.influencer_id.as_str()).or_default();
        entry.0 += post.reach;
        entry.1 += post.likes;
        entry.2 += post.comments;
    }

    let mut rows = Vec::with_capacity(sales.len());
    for (id, (total_revenue, total_orders)) in sales {
        let influencer = by_id
            .get(id)
            .ok_or_else(|| unknown_influencer::<TrackingEntry>(id))?;
        let total_payout = payout_sums.get(id).copied().unwrap_or(0.0);
        let (total_reach, total_likes, total_comments) =
            engagement.get(id).copied().unwrap_or_default();
        let (roas, incremental_roas) = roas_pair(total_revenue, total_payout, config);

        rows.push(InfluencerPerformance {
            influencer_id: influencer.id.clone(),
            name: influencer.name.clone(),
            category: influencer.category,
            platform: influencer.platform,
            follower_count: influencer.follower_count,
            total_revenue,
            total_orders,
            total_payout,
            total_reach,
            total_likes,
            total_comments,
            roas,
            incremental_roas,
        });
    }
    Ok(rows)
}

/// Group per-influencer rows by category, best average ROAS first.
pub fn category_rollup(rows: &[InfluencerPerformance]) -> Vec<CategoryPerformance> {
    let mut groups: BTreeMap<&str, Vec<&InfluencerPerformance>> = BTreeMap::new();
    for row in rows {
        groups.entry(row.category.label()).or_default().push(row);
    }

    let mut personas: Vec<CategoryPerformance> = groups
        .into_values()
        .map(|members| CategoryPerformance {
            category: members[0].category,
            avg_roas: Ratio::mean_of_positive(members.iter().map(|r| r.roas)),
            total_revenue: members.iter().map(|r| r.total_revenue).sum(),
            total_payout: members.iter().map(|r| r.total_payout).sum(),
            influencer_count: members.len(),
        })
        .collect();
    personas.sort_by(|a, b| a.avg_roas.cmp_desc_undefined_last(&b.avg_roas));
    personas
}

/// Ranked views. Sorting is stable, so ties keep rollup order.
pub fn rank(rows: &[InfluencerPerformance], top_n: usize) -> Rankings {
    let mut by_revenue: Vec<&InfluencerPerformance> = rows.iter().collect();
    by_revenue.sort_by(|a, b| b.total_revenue.cmp(&a.total_revenue));

    let mut by_roas: Vec<&InfluencerPerformance> =
        rows.iter().filter(|r| r.roas.is_positive()).collect();
    by_roas.sort_by(|a, b| a.roas.cmp_desc_undefined_last(&b.roas));

    let mut poor: Vec<&InfluencerPerformance> = rows
        .iter()
        .filter(|r| r.total_payout > 0.0 && r.roas.value().is_some_and(|v| v < 1.0))
        .collect();
    poor.sort_by(|a, b| a.roas.cmp_undefined_last(&b.roas));

    let take = |v: Vec<&InfluencerPerformance>| -> Vec<InfluencerPerformance> {
        v.into_iter().take(top_n).cloned().collect()
    };
    Rankings {
        top_by_revenue: take(by_revenue),
        top_by_roas: take(by_roas),
        poor_roi: take(poor),
    }
}

pub fn revenue_charts(tracking: &[TrackingEntry]) -> RevenueCharts {
    let mut over_time: BTreeMap<Day, u64> = BTreeMap::new();
    let mut by_platform: BTreeMap<&str, u64> = BTreeMap::new();
    let mut by_campaign: BTreeMap<&str, u64> = BTreeMap::new();
    for t in tracking {
        *over_time.entry(t.date).or_default() += t.revenue;
        *by_platform.entry(t.source.label()).or_default() += t.revenue;
        *by_campaign.entry(t.campaign.as_str()).or_default() += t.revenue;
    }

    RevenueCharts {
        over_time: over_time.into_iter().map(|(x, y)| SeriesPoint { x, y }).collect(),
        by_platform: labelled(by_platform),
        by_campaign: labelled(by_campaign),
    }
}

fn labelled(sums: BTreeMap<&str, u64>) -> Vec<SeriesPoint<String>> {
    sums.into_iter()
        .map(|(x, y)| SeriesPoint { x: x.to_string(), y })
        .collect()
}

fn roas_pair(revenue: u64, payout: f64, config: &AnalyticsConfig) -> (Ratio, Ratio) {
    let revenue = revenue as f64;
    (
        Ratio::of(revenue, payout),
        Ratio::of(revenue * config.incremental_factor, payout),
    )
}

fn unknown_influencer<R: Record>(id: &str) -> DashError {
    DashError::malformed(R::TABLE, format!("influencer_id '{id}' has no influencer record"))
}
