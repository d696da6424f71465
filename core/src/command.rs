use serde::{Deserialize, Serialize};

use crate::filter::ALL;

/// All user-issued triggers, as received from the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum DashboardCommand {
    /// Replace the dataset with a fresh generation at the configured counts.
    Regenerate,

    /// Select filters and recompute the dashboard. Omitted fields mean "All".
    ApplyFilters {
        #[serde(default = "wildcard")]
        brand: String,
        #[serde(default = "wildcard")]
        product: String,
        #[serde(default = "wildcard")]
        category: String,
        #[serde(default = "wildcard")]
        platform: String,
    },

    /// Recompute with the current filters.
    Refresh,

    /// Write the currently filtered tables to a zip archive.
    Export { path: String },

    /// Distinct filter values for the current dataset.
    GetOptions,
}

impl DashboardCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Regenerate => "regenerate",
            Self::ApplyFilters { .. } => "apply_filters",
            Self::Refresh => "refresh",
            Self::Export { .. } => "export",
            Self::GetOptions => "get_options",
        }
    }
}

fn wildcard() -> String {
    ALL.to_string()
}
