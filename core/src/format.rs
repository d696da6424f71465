//! Display strings for KPI cards and table cells.

use crate::{analytics::Kpis, ratio::Ratio};
use serde::Serialize;

/// Shown instead of a table when a selection leaves no rows.
pub const NO_DATA: &str = "No data available for this selection.";

/// `1234567` -> `"1,234,567"`.
pub fn count(value: u64) -> String {
    group_thousands(&value.to_string())
}

/// `1234.5` -> `"$1,234.50"`.
pub fn currency(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}${}.{cents}", group_thousands(whole))
}

pub fn ratio(value: Ratio) -> String {
    value.to_string()
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KpiStrings {
    pub total_revenue: String,
    pub total_orders: String,
    pub total_payout: String,
    pub roas: String,
    pub incremental_roas: String,
}

impl From<&Kpis> for KpiStrings {
    fn from(k: &Kpis) -> Self {
        Self {
            total_revenue: currency(k.total_revenue as f64),
            total_orders: count(k.total_orders),
            total_payout: currency(k.total_payout),
            roas: ratio(k.roas),
            incremental_roas: ratio(k.incremental_roas),
        }
    }
}
