use crate::{
    error::{DashError, DashResult},
    types::Day,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Counts and date window for one mock-data generation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub num_influencers: usize,
    pub posts_per_influencer: usize,
    pub tracking_entries_per_post: usize,
    /// First day a post may fall on.
    pub window_start: Day,
    /// Post dates fall strictly before this day.
    pub window_end: Day,
    /// Tracking rows land within this many days after their post.
    pub attribution_window_days: u32,
    /// Campaign labels run `Campaign-1` ..= `Campaign-{campaign_count}`.
    pub campaign_count: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            num_influencers: 20,
            posts_per_influencer: 5,
            tracking_entries_per_post: 3,
            window_start: ymd(2024, 1, 1),
            window_end: ymd(2024, 12, 31),
            attribution_window_days: 30,
            campaign_count: 4,
        }
    }
}

impl GeneratorConfig {
    /// Reject anything that would make generation meaningless.
    /// Runs before a single value is drawn.
    pub fn validate(&self) -> DashResult<()> {
        let counts = [
            ("num_influencers", self.num_influencers),
            ("posts_per_influencer", self.posts_per_influencer),
            ("tracking_entries_per_post", self.tracking_entries_per_post),
        ];
        for (name, value) in counts {
            if value == 0 {
                return Err(DashError::invalid(name, "must be positive"));
            }
        }
        if self.window_end <= self.window_start {
            return Err(DashError::invalid(
                "window_end",
                format!("{} is not after {}", self.window_end, self.window_start),
            ));
        }
        if self.attribution_window_days == 0 {
            return Err(DashError::invalid("attribution_window_days", "must be positive"));
        }
        if self.campaign_count == 0 {
            return Err(DashError::invalid("campaign_count", "must be positive"));
        }
        Ok(())
    }

    /// Number of distinct days a post date can take.
    pub fn window_days(&self) -> u64 {
        (self.window_end - self.window_start).num_days().max(0) as u64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Share of raw revenue treated as incremental (not organic).
    pub incremental_factor: f64,
    /// Rows kept in each ranked table.
    pub top_n: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            incremental_factor: 0.7,
            top_n: 5,
        }
    }
}

impl AnalyticsConfig {
    pub fn validate(&self) -> DashResult<()> {
        if !self.incremental_factor.is_finite() || self.incremental_factor < 0.0 {
            return Err(DashError::invalid(
                "incremental_factor",
                format!("{} is not a finite non-negative number", self.incremental_factor),
            ));
        }
        if self.top_n == 0 {
            return Err(DashError::invalid("top_n", "must be positive"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub generator: GeneratorConfig,
    pub analytics: AnalyticsConfig,
}

impl DashboardConfig {
    /// Load from a JSON file. Absent fields keep their defaults.
    /// In tests, use DashboardConfig::default_test().
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: DashboardConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> DashResult<()> {
        self.generator.validate()?;
        self.analytics.validate()
    }

    /// A small dataset that still exercises every catalog value often enough.
    pub fn default_test() -> Self {
        Self {
            generator: GeneratorConfig {
                num_influencers: 8,
                posts_per_influencer: 3,
                tracking_entries_per_post: 2,
                ..GeneratorConfig::default()
            },
            analytics: AnalyticsConfig::default(),
        }
    }
}

fn ymd(y: i32, m: u32, d: u32) -> Day {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN)
}
