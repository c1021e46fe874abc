//! Records produced by the generation stages.
//!
//! Every record deserializes leniently: missing fields default, numeric drift
//! is absorbed, and enum values are matched case-insensitively.

mod audit;
mod content;
mod foundation;
mod keywords;
mod performance;
mod plans;
mod publishing;

pub use audit::{AuditIssue, CompetitorAnalysis, Recommendation, SeoAudit};
pub use content::{
    BlogPost, ContentCalendarEntry, ContentPlan, EmailCampaign, LandingPage, Platform, SocialPost,
    SocialPosts,
};
pub use foundation::{BrandFoundation, FoundationEdit};
pub use keywords::{KeywordCategory, KeywordStrategy, MISSING_METRIC};
pub use performance::{
    AnalyticsReport, ChannelShare, Kpi, PerformanceAnalysis, PerformanceMetrics, Projection,
    RoiEstimate, SalesInsight,
};
pub use plans::{
    AbTest, ConversionPlan, CtaRecommendation, FunnelStage, LeadMagnet, SchemaMarkup,
    TechnicalSeoPlan, TechnicalTask,
};
pub use publishing::{CalendarEvent, EventType, ExpertAdvice, PublishingPlan};

use serde::{Deserialize, Serialize};

/// Three-level rating used for severity, priority and engagement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(from = "String")]
pub enum Level {
    High,
    #[default]
    Medium,
    Low,
}

impl From<String> for Level {
    fn from(raw: String) -> Self {
        let lower = raw.trim().to_lowercase();
        if lower.starts_with("high") || lower == "critical" || lower == "urgent" {
            Level::High
        } else if lower.starts_with("low") {
            Level::Low
        } else {
            Level::Medium
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Level::High => write!(f, "High"),
            Level::Medium => write!(f, "Medium"),
            Level::Low => write!(f, "Low"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(from = "String")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl From<String> for Difficulty {
    fn from(raw: String) -> Self {
        let lower = raw.trim().to_lowercase();
        if lower.starts_with("easy") || lower.starts_with("low") {
            Difficulty::Easy
        } else if lower.starts_with("hard") || lower.starts_with("high") {
            Difficulty::Hard
        } else {
            Difficulty::Medium
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "Easy"),
            Difficulty::Medium => write!(f, "Medium"),
            Difficulty::Hard => write!(f, "Hard"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_parses_case_insensitively() {
        let parsed: Vec<Level> =
            serde_json::from_str(r#"["HIGH", "low", "Medium", "critical", "whatever"]"#).unwrap();
        assert_eq!(
            parsed,
            vec![
                Level::High,
                Level::Low,
                Level::Medium,
                Level::High,
                Level::Medium
            ]
        );
    }

    #[test]
    fn level_serializes_capitalized() {
        assert_eq!(serde_json::to_string(&Level::High).unwrap(), "\"High\"");
    }

    #[test]
    fn difficulty_accepts_synonyms() {
        let parsed: Vec<Difficulty> =
            serde_json::from_str(r#"["easy", "Low", "HARD", "moderate"]"#).unwrap();
        assert_eq!(
            parsed,
            vec![
                Difficulty::Easy,
                Difficulty::Easy,
                Difficulty::Hard,
                Difficulty::Medium
            ]
        );
    }
}
