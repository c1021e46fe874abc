use serde::{Deserialize, Serialize};

use super::Level;
use crate::lenient;

/// Figures the user supplies about current performance. All optional; an
/// empty set tells the analysis stage to project from the strategy alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PerformanceMetrics {
    pub monthly_traffic: Option<u64>,
    /// Percentage, e.g. `2.5` for 2.5 %.
    pub conversion_rate: Option<f64>,
    pub average_order_value: Option<f64>,
    pub monthly_leads: Option<u64>,
    pub monthly_ad_spend: Option<f64>,
    pub ranking_keywords: Vec<String>,
    pub top_pages: Vec<String>,
    pub notes: Option<String>,
}

impl PerformanceMetrics {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Projection {
    #[serde(deserialize_with = "lenient::small_int")]
    pub month: u32,
    #[serde(deserialize_with = "lenient::count")]
    pub traffic: u64,
    #[serde(deserialize_with = "lenient::count")]
    pub leads: u64,
    #[serde(deserialize_with = "lenient::float")]
    pub revenue: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Kpi {
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(deserialize_with = "lenient::text")]
    pub current: String,
    #[serde(deserialize_with = "lenient::text")]
    pub target: String,
    #[serde(deserialize_with = "lenient::text")]
    pub timeframe: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PerformanceAnalysis {
    #[serde(deserialize_with = "lenient::text")]
    pub summary: String,
    pub projections: Vec<Projection>,
    pub kpis: Vec<Kpi>,
    #[serde(deserialize_with = "lenient::string_list")]
    pub strengths: Vec<String>,
    #[serde(deserialize_with = "lenient::string_list")]
    pub gaps: Vec<String>,
    #[serde(deserialize_with = "lenient::string_list")]
    pub recommendations: Vec<String>,
}

impl PerformanceAnalysis {
    /// Projections sorted by month.
    #[must_use]
    pub fn timeline(&self) -> Vec<&Projection> {
        let mut sorted: Vec<&Projection> = self.projections.iter().collect();
        sorted.sort_by_key(|p| p.month);
        sorted
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SalesInsight {
    #[serde(deserialize_with = "lenient::text")]
    pub title: String,
    #[serde(deserialize_with = "lenient::text")]
    pub insight: String,
    #[serde(deserialize_with = "lenient::text")]
    pub action: String,
    #[serde(deserialize_with = "lenient::text")]
    pub expected_impact: String,
    pub priority: Level,
    #[serde(deserialize_with = "lenient::text")]
    pub channel: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChannelShare {
    #[serde(deserialize_with = "lenient::text")]
    pub channel: String,
    /// Share of projected traffic in percent.
    #[serde(deserialize_with = "lenient::score")]
    pub share_percent: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RoiEstimate {
    #[serde(deserialize_with = "lenient::float")]
    pub investment: f64,
    #[serde(deserialize_with = "lenient::float")]
    pub projected_revenue: f64,
    #[serde(deserialize_with = "lenient::float")]
    pub roi_percent: f64,
    #[serde(deserialize_with = "lenient::text")]
    pub payback_period: String,
}

impl RoiEstimate {
    /// ROI recomputed from investment and revenue; `None` without investment.
    #[must_use]
    pub fn computed_roi_percent(&self) -> Option<f64> {
        if self.investment <= 0.0 {
            return None;
        }
        Some((self.projected_revenue - self.investment) / self.investment * 100.0)
    }
}

/// Cross-stage analytics derived from the full strategy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyticsReport {
    #[serde(deserialize_with = "lenient::text")]
    pub summary: String,
    pub traffic_forecast: Vec<Projection>,
    pub channel_mix: Vec<ChannelShare>,
    pub roi: RoiEstimate,
    pub kpi_dashboard: Vec<Kpi>,
    #[serde(deserialize_with = "lenient::string_list")]
    pub risk_factors: Vec<String>,
}

impl AnalyticsReport {
    /// Sum of channel shares; a well-formed mix totals 100.
    #[must_use]
    pub fn channel_share_total(&self) -> u32 {
        self.channel_mix
            .iter()
            .map(|c| u32::from(c.share_percent))
            .sum()
    }
}
