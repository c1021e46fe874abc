use serde::{Deserialize, Serialize};

/// One generation step of a pipeline run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Foundation,
    Keywords,
    ContentSocial,
    PublishingCalendar,
    TechnicalSeo,
    ConversionPlan,
    PerformanceAnalysis,
    SalesInsights,
    Analytics,
}

impl Stage {
    pub const ALL: [Stage; 9] = [
        Stage::Foundation,
        Stage::Keywords,
        Stage::ContentSocial,
        Stage::PublishingCalendar,
        Stage::TechnicalSeo,
        Stage::ConversionPlan,
        Stage::PerformanceAnalysis,
        Stage::SalesInsights,
        Stage::Analytics,
    ];

    /// 1-based position in the run.
    #[must_use]
    pub fn number(self) -> usize {
        Self::ALL
            .iter()
            .position(|s| *s == self)
            .map_or(0, |i| i + 1)
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Stage::Foundation => "brand foundation and SEO audit",
            Stage::Keywords => "keyword strategy",
            Stage::ContentSocial => "content plan and social posts",
            Stage::PublishingCalendar => "publishing calendar",
            Stage::TechnicalSeo => "technical SEO plan",
            Stage::ConversionPlan => "conversion plan",
            Stage::PerformanceAnalysis => "performance analysis",
            Stage::SalesInsights => "sales insights",
            Stage::Analytics => "derived analytics",
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Foundation => "foundation",
            Stage::Keywords => "keywords",
            Stage::ContentSocial => "content_social",
            Stage::PublishingCalendar => "publishing_calendar",
            Stage::TechnicalSeo => "technical_seo",
            Stage::ConversionPlan => "conversion_plan",
            Stage::PerformanceAnalysis => "performance_analysis",
            Stage::SalesInsights => "sales_insights",
            Stage::Analytics => "analytics",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse failure category shown to the user alongside the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Missing or malformed credential; fixable by the user.
    Configuration,
    /// Network failure, timeout or non-success response.
    Transport,
    /// Response was not valid JSON for the declared schema.
    Schema,
    /// A stage was asked to run before its inputs existed.
    Prerequisite,
    /// Operation not allowed in the current run state.
    State,
    /// Snapshot could not be saved or loaded.
    Storage,
}

impl FailureKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FailureKind::Configuration => "configuration",
            FailureKind::Transport => "transport",
            FailureKind::Schema => "schema",
            FailureKind::Prerequisite => "prerequisite",
            FailureKind::State => "state",
            FailureKind::Storage => "storage",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
