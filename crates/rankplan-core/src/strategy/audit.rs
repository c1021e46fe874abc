use serde::{Deserialize, Serialize};

use super::Level;
use crate::lenient;

/// Baseline SEO snapshot produced alongside the brand foundation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SeoAudit {
    #[serde(deserialize_with = "lenient::score")]
    pub overall_score: u8,
    #[serde(deserialize_with = "lenient::score")]
    pub technical_score: u8,
    #[serde(deserialize_with = "lenient::score")]
    pub content_score: u8,
    #[serde(deserialize_with = "lenient::score")]
    pub backlink_score: u8,
    #[serde(deserialize_with = "lenient::score")]
    pub ux_score: u8,
    #[serde(deserialize_with = "lenient::score")]
    pub local_score: u8,
    pub issues: Vec<AuditIssue>,
    #[serde(deserialize_with = "lenient::string_list")]
    pub opportunities: Vec<String>,
    pub recommendations: Vec<Recommendation>,
    pub competitor_analysis: Vec<CompetitorAnalysis>,
}

impl SeoAudit {
    /// Subscores with their display names, overall first.
    #[must_use]
    pub fn scores(&self) -> [(&'static str, u8); 6] {
        [
            ("Overall", self.overall_score),
            ("Technical", self.technical_score),
            ("Content", self.content_score),
            ("Backlinks", self.backlink_score),
            ("User experience", self.ux_score),
            ("Local", self.local_score),
        ]
    }

    /// Recommendations ordered by priority rank (1 first). Unranked entries
    /// (rank 0) sort last; ties keep their original order.
    #[must_use]
    pub fn ranked_recommendations(&self) -> Vec<&Recommendation> {
        let mut ranked: Vec<&Recommendation> = self.recommendations.iter().collect();
        ranked.sort_by_key(|r| if r.priority == 0 { u32::MAX } else { r.priority });
        ranked
    }

    /// Issues at the given severity.
    pub fn issues_with(&self, severity: Level) -> impl Iterator<Item = &AuditIssue> {
        self.issues.iter().filter(move |i| i.severity == severity)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuditIssue {
    #[serde(deserialize_with = "lenient::text")]
    pub category: String,
    pub severity: Level,
    #[serde(deserialize_with = "lenient::text")]
    pub description: String,
    #[serde(deserialize_with = "lenient::text")]
    pub impact: String,
    #[serde(deserialize_with = "lenient::text")]
    pub solution: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Recommendation {
    /// 1 is the most urgent.
    #[serde(deserialize_with = "lenient::small_int")]
    pub priority: u32,
    #[serde(deserialize_with = "lenient::text")]
    pub title: String,
    #[serde(deserialize_with = "lenient::text")]
    pub description: String,
    #[serde(deserialize_with = "lenient::text")]
    pub expected_impact: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompetitorAnalysis {
    #[serde(deserialize_with = "lenient::text")]
    pub competitor: String,
    #[serde(deserialize_with = "lenient::text")]
    pub domain: String,
    #[serde(deserialize_with = "lenient::string_list")]
    pub strengths: Vec<String>,
    #[serde(deserialize_with = "lenient::string_list")]
    pub weaknesses: Vec<String>,
    #[serde(deserialize_with = "lenient::string_list")]
    pub opportunities: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scores_are_clamped_on_ingest() {
        let audit: SeoAudit = serde_json::from_value(json!({
            "overallScore": 140,
            "technicalScore": "55",
            "contentScore": -10,
            "backlinkScore": 30.4,
            "uxScore": null
        }))
        .unwrap();
        assert_eq!(audit.overall_score, 100);
        assert_eq!(audit.technical_score, 55);
        assert_eq!(audit.content_score, 0);
        assert_eq!(audit.backlink_score, 30);
        assert_eq!(audit.ux_score, 0);
        assert_eq!(audit.local_score, 0);
        assert!(audit.issues.is_empty());
    }

    #[test]
    fn recommendations_rank_by_priority_with_unranked_last() {
        let audit: SeoAudit = serde_json::from_value(json!({
            "recommendations": [
                {"priority": 0, "title": "unranked"},
                {"priority": 3, "title": "third"},
                {"priority": 1, "title": "first"},
                {"priority": "2", "title": "second"}
            ]
        }))
        .unwrap();
        let titles: Vec<&str> = audit
            .ranked_recommendations()
            .iter()
            .map(|r| r.title.as_str())
            .collect();
        assert_eq!(titles, vec!["first", "second", "third", "unranked"]);
    }

    #[test]
    fn issues_filter_by_severity() {
        let audit: SeoAudit = serde_json::from_value(json!({
            "issues": [
                {"category": "Technical", "severity": "High", "impact": "slow", "solution": "cache"},
                {"category": "Content", "severity": "low", "impact": "thin", "solution": "write"}
            ]
        }))
        .unwrap();
        assert_eq!(audit.issues_with(Level::High).count(), 1);
        assert_eq!(audit.issues_with(Level::Low).count(), 1);
        assert_eq!(audit.issues_with(Level::Medium).count(), 0);
    }
}
