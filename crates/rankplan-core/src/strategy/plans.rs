use serde::{Deserialize, Serialize};

use super::Level;
use crate::lenient;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TechnicalTask {
    #[serde(deserialize_with = "lenient::text")]
    pub task: String,
    pub priority: Level,
    #[serde(deserialize_with = "lenient::text")]
    pub impact: String,
    #[serde(deserialize_with = "lenient::text")]
    pub implementation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SchemaMarkup {
    /// schema.org type, e.g. `MedicalClinic`.
    #[serde(deserialize_with = "lenient::text")]
    pub schema_type: String,
    #[serde(deserialize_with = "lenient::text")]
    pub page: String,
    #[serde(deserialize_with = "lenient::text")]
    pub purpose: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TechnicalSeoPlan {
    pub site_speed: Vec<TechnicalTask>,
    pub mobile_optimization: Vec<TechnicalTask>,
    pub crawlability: Vec<TechnicalTask>,
    pub local_seo: Vec<TechnicalTask>,
    pub schema_markup: Vec<SchemaMarkup>,
    #[serde(deserialize_with = "lenient::string_list")]
    pub priority_actions: Vec<String>,
}

impl TechnicalSeoPlan {
    /// All tasks with their section names, in section order.
    pub fn tasks(&self) -> impl Iterator<Item = (&'static str, &TechnicalTask)> {
        [
            ("Site speed", &self.site_speed),
            ("Mobile optimization", &self.mobile_optimization),
            ("Crawlability", &self.crawlability),
            ("Local SEO", &self.local_seo),
        ]
        .into_iter()
        .flat_map(|(section, tasks)| tasks.iter().map(move |t| (section, t)))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FunnelStage {
    #[serde(deserialize_with = "lenient::text")]
    pub stage: String,
    #[serde(deserialize_with = "lenient::text")]
    pub goal: String,
    #[serde(deserialize_with = "lenient::string_list")]
    pub tactics: Vec<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub metric: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CtaRecommendation {
    #[serde(deserialize_with = "lenient::text")]
    pub placement: String,
    #[serde(deserialize_with = "lenient::text")]
    pub text: String,
    #[serde(deserialize_with = "lenient::text")]
    pub rationale: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LeadMagnet {
    #[serde(deserialize_with = "lenient::text")]
    pub title: String,
    #[serde(deserialize_with = "lenient::text")]
    pub format: String,
    #[serde(deserialize_with = "lenient::text")]
    pub audience: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AbTest {
    #[serde(deserialize_with = "lenient::text")]
    pub element: String,
    #[serde(deserialize_with = "lenient::text")]
    pub variant_a: String,
    #[serde(deserialize_with = "lenient::text")]
    pub variant_b: String,
    #[serde(deserialize_with = "lenient::text")]
    pub hypothesis: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConversionPlan {
    pub funnel_stages: Vec<FunnelStage>,
    pub cta_recommendations: Vec<CtaRecommendation>,
    pub lead_magnets: Vec<LeadMagnet>,
    pub ab_tests: Vec<AbTest>,
    #[serde(deserialize_with = "lenient::string_list")]
    pub trust_signals: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn technical_tasks_flatten_in_section_order() {
        let plan: TechnicalSeoPlan = serde_json::from_value(json!({
            "localSeo": [{"task": "Claim GBP listing", "priority": "High"}],
            "siteSpeed": [{"task": "Compress images"}]
        }))
        .unwrap();
        let tasks: Vec<(&str, &str)> = plan.tasks().map(|(s, t)| (s, t.task.as_str())).collect();
        assert_eq!(
            tasks,
            vec![
                ("Site speed", "Compress images"),
                ("Local SEO", "Claim GBP listing")
            ]
        );
    }

    #[test]
    fn conversion_plan_defaults_missing_sections() {
        let plan: ConversionPlan =
            serde_json::from_value(json!({"trustSignals": ["NABH accredited"]})).unwrap();
        assert!(plan.funnel_stages.is_empty());
        assert_eq!(plan.trust_signals, vec!["NABH accredited".to_string()]);
    }
}
