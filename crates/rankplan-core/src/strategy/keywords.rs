use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::lenient;

/// Rendered in place of a missing search-volume or difficulty entry.
pub const MISSING_METRIC: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordCategory {
    Primary,
    Urgent,
    Service,
    Problem,
    LongTail,
    Location,
    Competitor,
    Opportunity,
    Seasonal,
    VoiceSearch,
    BuyerIntent,
}

impl KeywordCategory {
    pub const ALL: [KeywordCategory; 11] = [
        KeywordCategory::Primary,
        KeywordCategory::Urgent,
        KeywordCategory::Service,
        KeywordCategory::Problem,
        KeywordCategory::LongTail,
        KeywordCategory::Location,
        KeywordCategory::Competitor,
        KeywordCategory::Opportunity,
        KeywordCategory::Seasonal,
        KeywordCategory::VoiceSearch,
        KeywordCategory::BuyerIntent,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            KeywordCategory::Primary => "Primary",
            KeywordCategory::Urgent => "Urgent",
            KeywordCategory::Service => "Service",
            KeywordCategory::Problem => "Problem",
            KeywordCategory::LongTail => "Long-tail",
            KeywordCategory::Location => "Location",
            KeywordCategory::Competitor => "Competitor",
            KeywordCategory::Opportunity => "Opportunity",
            KeywordCategory::Seasonal => "Seasonal",
            KeywordCategory::VoiceSearch => "Voice search",
            KeywordCategory::BuyerIntent => "Buyer intent",
        }
    }

    /// JSON field that holds this category's list.
    #[must_use]
    pub fn field_name(self) -> &'static str {
        match self {
            KeywordCategory::Primary => "primaryKeywords",
            KeywordCategory::Urgent => "urgentKeywords",
            KeywordCategory::Service => "serviceKeywords",
            KeywordCategory::Problem => "problemKeywords",
            KeywordCategory::LongTail => "longTailKeywords",
            KeywordCategory::Location => "locationKeywords",
            KeywordCategory::Competitor => "competitorKeywords",
            KeywordCategory::Opportunity => "opportunityKeywords",
            KeywordCategory::Seasonal => "seasonalKeywords",
            KeywordCategory::VoiceSearch => "voiceSearchKeywords",
            KeywordCategory::BuyerIntent => "buyerIntentKeywords",
        }
    }
}

/// Categorized keyword lists plus per-keyword metrics.
///
/// Every listed keyword should have an entry in both metric maps, but partial
/// maps are accepted; lookups for missing entries render as `N/A`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KeywordStrategy {
    #[serde(deserialize_with = "lenient::string_list")]
    pub primary_keywords: Vec<String>,
    #[serde(deserialize_with = "lenient::string_list")]
    pub urgent_keywords: Vec<String>,
    #[serde(deserialize_with = "lenient::string_list")]
    pub service_keywords: Vec<String>,
    #[serde(deserialize_with = "lenient::string_list")]
    pub problem_keywords: Vec<String>,
    #[serde(deserialize_with = "lenient::string_list")]
    pub long_tail_keywords: Vec<String>,
    #[serde(deserialize_with = "lenient::string_list")]
    pub location_keywords: Vec<String>,
    #[serde(deserialize_with = "lenient::string_list")]
    pub competitor_keywords: Vec<String>,
    #[serde(deserialize_with = "lenient::string_list")]
    pub opportunity_keywords: Vec<String>,
    #[serde(deserialize_with = "lenient::string_list")]
    pub seasonal_keywords: Vec<String>,
    #[serde(deserialize_with = "lenient::string_list")]
    pub voice_search_keywords: Vec<String>,
    #[serde(deserialize_with = "lenient::string_list")]
    pub buyer_intent_keywords: Vec<String>,
    #[serde(deserialize_with = "lenient::int_map")]
    pub search_volume: BTreeMap<String, i64>,
    #[serde(deserialize_with = "lenient::percent_map")]
    pub keyword_difficulty: BTreeMap<String, i64>,
}

impl KeywordStrategy {
    #[must_use]
    pub fn category(&self, category: KeywordCategory) -> &[String] {
        match category {
            KeywordCategory::Primary => &self.primary_keywords,
            KeywordCategory::Urgent => &self.urgent_keywords,
            KeywordCategory::Service => &self.service_keywords,
            KeywordCategory::Problem => &self.problem_keywords,
            KeywordCategory::LongTail => &self.long_tail_keywords,
            KeywordCategory::Location => &self.location_keywords,
            KeywordCategory::Competitor => &self.competitor_keywords,
            KeywordCategory::Opportunity => &self.opportunity_keywords,
            KeywordCategory::Seasonal => &self.seasonal_keywords,
            KeywordCategory::VoiceSearch => &self.voice_search_keywords,
            KeywordCategory::BuyerIntent => &self.buyer_intent_keywords,
        }
    }

    /// Non-empty categories in display order.
    pub fn categories(&self) -> impl Iterator<Item = (KeywordCategory, &[String])> {
        KeywordCategory::ALL
            .into_iter()
            .map(move |c| (c, self.category(c)))
            .filter(|(_, list)| !list.is_empty())
    }

    /// Every distinct keyword across all categories, sorted.
    #[must_use]
    pub fn all_keywords(&self) -> BTreeSet<&str> {
        KeywordCategory::ALL
            .into_iter()
            .flat_map(|c| self.category(c).iter().map(String::as_str))
            .collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        KeywordCategory::ALL
            .into_iter()
            .all(|c| self.category(c).is_empty())
    }

    /// Keywords lacking a volume or difficulty entry.
    #[must_use]
    pub fn missing_metrics(&self) -> Vec<&str> {
        self.all_keywords()
            .into_iter()
            .filter(|k| {
                !self.search_volume.contains_key(*k) || !self.keyword_difficulty.contains_key(*k)
            })
            .collect()
    }

    #[must_use]
    pub fn volume_label(&self, keyword: &str) -> String {
        self.search_volume
            .get(keyword)
            .map_or_else(|| MISSING_METRIC.to_string(), ToString::to_string)
    }

    #[must_use]
    pub fn difficulty_label(&self, keyword: &str) -> String {
        self.keyword_difficulty
            .get(keyword)
            .map_or_else(|| MISSING_METRIC.to_string(), ToString::to_string)
    }

    /// The `limit` highest-volume keywords, for prompts that cannot embed the
    /// full strategy.
    #[must_use]
    pub fn top_by_volume(&self, limit: usize) -> Vec<&str> {
        let mut ranked: Vec<(&str, i64)> = self
            .all_keywords()
            .into_iter()
            .map(|k| (k, self.search_volume.get(k).copied().unwrap_or(-1)))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.into_iter().take(limit).map(|(k, _)| k).collect()
    }
}
