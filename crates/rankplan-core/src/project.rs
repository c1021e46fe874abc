use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::profile::BusinessProfile;
use crate::stage::{FailureKind, Stage};
use crate::strategy::{
    AnalyticsReport, BrandFoundation, ContentPlan, ConversionPlan, KeywordStrategy,
    PerformanceAnalysis, PerformanceMetrics, PublishingPlan, SalesInsight, SeoAudit, SocialPosts,
    TechnicalSeoPlan,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    #[default]
    Active,
    Completed,
    Archived,
}

impl ProjectStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ProjectStatus::Active => "active",
            ProjectStatus::Completed => "completed",
            ProjectStatus::Archived => "archived",
        }
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProjectStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(ProjectStatus::Active),
            "completed" => Ok(ProjectStatus::Completed),
            "archived" => Ok(ProjectStatus::Archived),
            other => Err(format!("unknown project status '{other}'")),
        }
    }
}

/// Where a project's pipeline run currently stands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RunState {
    #[default]
    NotStarted,
    FoundationGenerated,
    FoundationConfirmed,
    StrategyGenerating,
    StrategyComplete,
    Failed {
        stage: Stage,
        kind: FailureKind,
        message: String,
    },
}

impl RunState {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            RunState::NotStarted => "not_started",
            RunState::FoundationGenerated => "foundation_generated",
            RunState::FoundationConfirmed => "foundation_confirmed",
            RunState::StrategyGenerating => "strategy_generating",
            RunState::StrategyComplete => "strategy_complete",
            RunState::Failed { .. } => "failed",
        }
    }
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunState::Failed {
                stage,
                kind,
                message,
            } => write!(f, "failed at {stage} ({kind}): {message}"),
            other => f.write_str(other.name()),
        }
    }
}

/// Every stage output, each `None` until its stage has run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AllData {
    pub profile: Option<BusinessProfile>,
    pub foundation: Option<BrandFoundation>,
    pub audit: Option<SeoAudit>,
    pub keywords: Option<KeywordStrategy>,
    pub content_plan: Option<ContentPlan>,
    pub social_posts: Option<SocialPosts>,
    pub publishing_plan: Option<PublishingPlan>,
    pub technical_seo: Option<TechnicalSeoPlan>,
    pub conversion_plan: Option<ConversionPlan>,
    pub performance_metrics: Option<PerformanceMetrics>,
    pub performance_analysis: Option<PerformanceAnalysis>,
    pub sales_insights: Option<Vec<SalesInsight>>,
    pub analytics: Option<AnalyticsReport>,
}

impl AllData {
    /// Whether the output of `stage` is already present.
    #[must_use]
    pub fn has_stage(&self, stage: Stage) -> bool {
        match stage {
            Stage::Foundation => self.foundation.is_some() && self.audit.is_some(),
            Stage::Keywords => self.keywords.is_some(),
            Stage::ContentSocial => self.content_plan.is_some() && self.social_posts.is_some(),
            Stage::PublishingCalendar => self.publishing_plan.is_some(),
            Stage::TechnicalSeo => self.technical_seo.is_some(),
            Stage::ConversionPlan => self.conversion_plan.is_some(),
            Stage::PerformanceAnalysis => self.performance_analysis.is_some(),
            Stage::SalesInsights => self.sales_insights.is_some(),
            Stage::Analytics => self.analytics.is_some(),
        }
    }

    #[must_use]
    pub fn completed_stages(&self) -> Vec<Stage> {
        Stage::ALL
            .into_iter()
            .filter(|s| self.has_stage(*s))
            .collect()
    }

    /// Drop every output downstream of the foundation, used when the
    /// foundation is regenerated or edited.
    pub fn clear_strategy(&mut self) {
        self.keywords = None;
        self.content_plan = None;
        self.social_posts = None;
        self.publishing_plan = None;
        self.technical_seo = None;
        self.conversion_plan = None;
        self.performance_analysis = None;
        self.sales_insights = None;
        self.analytics = None;
    }
}

/// Persisted snapshot of one user's strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub owner_id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub run_state: RunState,
    #[serde(default)]
    pub data: AllData,
}

impl Project {
    #[must_use]
    pub fn new(owner_id: &str, name: &str, profile: BusinessProfile, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id: owner_id.to_string(),
            name: name.to_string(),
            created_at: now,
            updated_at: now,
            status: ProjectStatus::Active,
            run_state: RunState::NotStarted,
            data: AllData {
                profile: Some(profile),
                ..AllData::default()
            },
        }
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}
