use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use rankplan_core::{
    BusinessProfile, ContentPlan, EventType, FailureKind, FoundationEdit, KeywordStrategy,
    LocationScope, PerformanceMetrics, ProjectStatus, RunState, Schema, Stage,
};
use rankplan_gemini::{CachedGenerator, GeneratorError, StructuredGenerator};
use rankplan_pipeline::{FixedClock, Pipeline, PipelineError};
use rankplan_store::{MemoryProjectStore, ProjectStore};
use serde_json::{json, Value};

/// Answers each stage with canned JSON, picked by a property only that
/// stage's schema declares. Records every call in order.
#[derive(Default)]
struct ScriptedGenerator {
    calls: Mutex<Vec<(Stage, String)>>,
    fail_at: Mutex<Option<Stage>>,
    replies: Mutex<Vec<(Stage, Value)>>,
}

impl ScriptedGenerator {
    fn stages(&self) -> Vec<Stage> {
        self.calls.lock().unwrap().iter().map(|(s, _)| *s).collect()
    }

    fn count(&self, stage: Stage) -> usize {
        self.stages().into_iter().filter(|s| *s == stage).count()
    }

    fn last_prompt(&self, stage: Stage) -> String {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(s, _)| *s == stage)
            .map(|(_, p)| p.clone())
            .unwrap()
    }

    fn fail_at(&self, stage: Option<Stage>) {
        *self.fail_at.lock().unwrap() = stage;
    }

    /// Answer `stage` with `reply` instead of the canned response.
    fn reply_with(&self, stage: Stage, reply: Value) {
        let mut replies = self.replies.lock().unwrap();
        replies.retain(|(s, _)| *s != stage);
        replies.push((stage, reply));
    }

    fn clear_replies(&self) {
        self.replies.lock().unwrap().clear();
    }

    fn reply_for(&self, stage: Stage) -> Option<Value> {
        self.replies
            .lock()
            .unwrap()
            .iter()
            .find(|(s, _)| *s == stage)
            .map(|(_, v)| v.clone())
    }
}

fn stage_for(schema: &Schema) -> Stage {
    let names = schema.property_names();
    let markers = [
        ("description", Stage::Foundation),
        ("primaryKeywords", Stage::Keywords),
        ("contentPlan", Stage::ContentSocial),
        ("expertAdvice", Stage::PublishingCalendar),
        ("siteSpeed", Stage::TechnicalSeo),
        ("funnelStages", Stage::ConversionPlan),
        ("projections", Stage::PerformanceAnalysis),
        ("salesInsights", Stage::SalesInsights),
        ("trafficForecast", Stage::Analytics),
    ];
    markers
        .into_iter()
        .find(|(marker, _)| names.contains(marker))
        .map(|(_, stage)| stage)
        .unwrap()
}

/// City named on the prompt's "Target locations:" line.
fn target_city(prompt: &str) -> String {
    prompt
        .lines()
        .find_map(|l| l.strip_prefix("Target locations: "))
        .and_then(|rest| rest.split(" (").next())
        .unwrap()
        .to_string()
}

fn response(stage: Stage, prompt: &str) -> Value {
    match stage {
        Stage::Foundation => json!({
            "description": "Multi-specialty clinic with same-day consultations.",
            "targetCustomer": "Working families",
            "keyServices": "General medicine, diagnostics",
            "audit": {
                "overallScore": 42,
                "localScore": 30,
                "issues": [{"category": "Local SEO", "severity": "High", "description": "No map listing"}],
                "opportunities": ["Neighbourhood pages"]
            }
        }),
        Stage::Keywords => {
            let city = target_city(prompt);
            let primary = format!("clinic in {city}");
            let local = format!("doctor near me {city}");
            let mut reply = empty_keywords();
            reply["primaryKeywords"] = json!([primary]);
            reply["locationKeywords"] = json!([local]);
            reply["buyerIntentKeywords"] = json!(["book doctor appointment"]);
            reply["searchVolume"] = json!({primary.clone(): 1900, local: 720});
            reply["keywordDifficulty"] = json!({primary: 54});
            reply
        }
        Stage::ContentSocial => json!({
            "contentPlan": {
                "blogPosts": [
                    {"title": "When to See a Doctor for a Fever", "targetKeywords": ["fever doctor"], "estimatedTraffic": 300}
                ],
                "landingPages": [{"title": "Clinic in the city", "urlSlug": "clinic"}]
            },
            "socialPosts": {
                "linkedin": [{"content": "Same-day consultations.", "hashtags": ["#health"]}]
            }
        }),
        Stage::PublishingCalendar => json!({
            "expertAdvice": {"cadence": "Two posts a week", "tips": ["Reuse blog content"]},
            "events": [
                {"day": 40, "type": "Blog Post", "platform": "Blog", "title": "Late post"},
                {"day": 3, "type": "Social Post", "platform": "LinkedIn", "title": "Teaser"},
                {"day": 1, "type": "Blog Post", "platform": "Blog", "title": "Fever guide"}
            ]
        }),
        Stage::TechnicalSeo => json!({
            "siteSpeed": [{"task": "Compress images", "priority": "High"}],
            "mobileOptimization": [],
            "crawlability": [],
            "localSeo": [{"task": "Claim map listing", "priority": "High"}],
            "schemaMarkup": [{"schemaType": "MedicalClinic", "page": "/", "purpose": "Rich results"}],
            "priorityActions": ["Compress images", "Claim map listing"]
        }),
        Stage::ConversionPlan => json!({
            "funnelStages": [{"stage": "Awareness", "goal": "Reach", "metric": "Visits"}],
            "ctaRecommendations": [],
            "leadMagnets": [],
            "abTests": [],
            "trustSignals": ["Accredited doctors"]
        }),
        Stage::PerformanceAnalysis => json!({
            "summary": "Steady growth",
            "projections": [{"month": 3, "traffic": 2000, "leads": 40, "revenue": 120000}],
            "kpis": [],
            "strengths": ["Strong reviews"],
            "gaps": [],
            "recommendations": []
        }),
        Stage::SalesInsights => json!({
            "salesInsights": [
                {"title": "Weekend slots", "action": "Open Saturdays", "priority": "High", "channel": "Organic"}
            ]
        }),
        Stage::Analytics => json!({
            "summary": "ROI positive by month six",
            "trafficForecast": [{"month": 6, "traffic": 3500, "leads": 70, "revenue": 210000}],
            "channelMix": [{"channel": "Organic", "sharePercent": 60}, {"channel": "Social", "sharePercent": 40}],
            "roi": {"investment": 100000, "projectedRevenue": 250000},
            "kpiDashboard": [],
            "riskFactors": []
        }),
    }
}

/// Keyword response with every category present and empty.
fn empty_keywords() -> Value {
    let mut reply = json!({ "searchVolume": {}, "keywordDifficulty": {} });
    for name in rankplan_pipeline::prompts::keywords_schema().property_names() {
        if name.ends_with("Keywords") {
            reply[name] = json!([]);
        }
    }
    reply
}

#[async_trait]
impl StructuredGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str, schema: &Schema) -> Result<Value, GeneratorError> {
        let stage = stage_for(schema);
        self.calls
            .lock()
            .unwrap()
            .push((stage, prompt.to_string()));
        if *self.fail_at.lock().unwrap() == Some(stage) {
            return Err(GeneratorError::Api {
                status: 503,
                message: "UNAVAILABLE: overloaded".to_string(),
            });
        }
        Ok(self
            .reply_for(stage)
            .unwrap_or_else(|| response(stage, prompt)))
    }

    fn model(&self) -> &str {
        "scripted"
    }
}

fn healthplus() -> BusinessProfile {
    let mut profile = BusinessProfile::new("HealthPlus Clinic", "Healthcare");
    profile.service_model = "Walk-in clinic".to_string();
    profile.location_scope = LocationScope::SpecificCities;
    profile.selected_cities.insert("Mumbai".to_string());
    profile
}

fn clock() -> FixedClock {
    FixedClock(Utc.with_ymd_and_hms(2026, 3, 10, 9, 30, 0).unwrap())
}

type TestPipeline = Pipeline<Arc<ScriptedGenerator>, MemoryProjectStore>;

fn pipeline() -> (TestPipeline, Arc<ScriptedGenerator>) {
    let generator = Arc::new(ScriptedGenerator::default());
    let pipeline = Pipeline::new(Arc::clone(&generator), MemoryProjectStore::new(), clock());
    (pipeline, generator)
}

async fn confirmed_project(pipeline: &TestPipeline) -> uuid::Uuid {
    let project = pipeline
        .create_project("owner-1", "HealthPlus SEO", healthplus())
        .await
        .unwrap();
    pipeline.generate_foundation(project.id).await.unwrap();
    pipeline.confirm_foundation(project.id).await.unwrap();
    project.id
}

#[tokio::test]
async fn healthplus_mumbai_runs_all_nine_stages() {
    let (pipeline, generator) = pipeline();
    let id = confirmed_project(&pipeline).await;

    let project = pipeline.generate_strategy(id, None).await.unwrap();

    assert_eq!(project.run_state, RunState::StrategyComplete);
    assert_eq!(project.status, ProjectStatus::Completed);
    assert_eq!(project.data.completed_stages(), Stage::ALL.to_vec());
    assert_eq!(generator.stages(), Stage::ALL.to_vec());

    let keywords = project.data.keywords.as_ref().unwrap();
    assert!(keywords
        .location_keywords
        .iter()
        .any(|k| k.contains("Mumbai")));
    assert_eq!(keywords.search_volume.get("clinic in Mumbai"), Some(&1900));
    assert_eq!(
        keywords.missing_metrics(),
        vec!["book doctor appointment", "doctor near me Mumbai"]
    );

    let stored = pipeline.load(id).await.unwrap();
    assert_eq!(stored, project);
}

#[tokio::test]
async fn each_prompt_embeds_upstream_output() {
    let (pipeline, generator) = pipeline();
    let id = confirmed_project(&pipeline).await;
    pipeline.generate_strategy(id, None).await.unwrap();

    assert!(generator
        .last_prompt(Stage::Keywords)
        .contains("Multi-specialty clinic with same-day consultations."));
    assert!(generator
        .last_prompt(Stage::ContentSocial)
        .contains("clinic in Mumbai"));
    assert!(generator
        .last_prompt(Stage::PublishingCalendar)
        .contains("When to See a Doctor for a Fever"));
    assert!(generator
        .last_prompt(Stage::TechnicalSeo)
        .contains("Overall: 42/100"));
    assert!(generator
        .last_prompt(Stage::Analytics)
        .contains("Weekend slots"));
}

#[tokio::test]
async fn strategy_waits_for_confirmed_foundation() {
    let (pipeline, generator) = pipeline();
    let project = pipeline
        .create_project("owner-1", "HealthPlus SEO", healthplus())
        .await
        .unwrap();

    let err = pipeline.generate_strategy(project.id, None).await.unwrap_err();
    assert!(matches!(err, PipelineError::InvalidState { .. }));

    let err = pipeline.confirm_foundation(project.id).await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::State);

    pipeline.generate_foundation(project.id).await.unwrap();
    let err = pipeline.generate_strategy(project.id, None).await.unwrap_err();
    assert!(matches!(err, PipelineError::InvalidState { .. }));

    assert_eq!(generator.stages(), vec![Stage::Foundation]);
}

#[tokio::test]
async fn confirmed_foundation_is_frozen() {
    let (pipeline, _generator) = pipeline();
    let id = confirmed_project(&pipeline).await;

    let edit = FoundationEdit {
        key_services: Some("Dermatology".to_string()),
        ..FoundationEdit::default()
    };
    let err = pipeline.update_foundation(id, edit).await.unwrap_err();
    assert!(matches!(err, PipelineError::InvalidState { .. }));

    let err = pipeline.generate_foundation(id).await.unwrap_err();
    assert!(matches!(err, PipelineError::InvalidState { .. }));
}

#[tokio::test]
async fn invalid_profile_is_rejected_before_saving() {
    let (pipeline, _generator) = pipeline();
    let mut profile = healthplus();
    profile.selected_cities.clear();

    let err = pipeline
        .create_project("owner-1", "Broken", profile)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), FailureKind::Configuration);
    assert!(pipeline.store().is_empty().await);
}

#[tokio::test]
async fn failure_keeps_completed_stages_and_resume_continues() {
    let (pipeline, generator) = pipeline();
    let id = confirmed_project(&pipeline).await;

    generator.fail_at(Some(Stage::TechnicalSeo));
    let err = pipeline.generate_strategy(id, None).await.unwrap_err();
    assert_eq!(err.stage(), Some(Stage::TechnicalSeo));
    assert_eq!(err.kind(), FailureKind::Transport);

    let failed = pipeline.load(id).await.unwrap();
    match &failed.run_state {
        RunState::Failed { stage, kind, message } => {
            assert_eq!(*stage, Stage::TechnicalSeo);
            assert_eq!(*kind, FailureKind::Transport);
            assert!(message.contains("overloaded"));
        }
        other => panic!("expected failed state, got {other:?}"),
    }
    assert!(failed.data.has_stage(Stage::Keywords));
    assert!(failed.data.has_stage(Stage::ContentSocial));
    assert!(failed.data.has_stage(Stage::PublishingCalendar));
    assert!(!failed.data.has_stage(Stage::TechnicalSeo));
    assert!(!failed.data.has_stage(Stage::ConversionPlan));

    generator.fail_at(None);
    let resumed = pipeline.generate_strategy(id, None).await.unwrap();
    assert_eq!(resumed.run_state, RunState::StrategyComplete);
    assert_eq!(resumed.data.keywords, failed.data.keywords);
    assert_eq!(generator.count(Stage::Keywords), 1);
    assert_eq!(generator.count(Stage::TechnicalSeo), 2);
    assert_eq!(generator.count(Stage::Analytics), 1);
}

#[tokio::test]
async fn failed_foundation_can_be_regenerated() {
    let (pipeline, generator) = pipeline();
    let project = pipeline
        .create_project("owner-1", "HealthPlus SEO", healthplus())
        .await
        .unwrap();

    generator.fail_at(Some(Stage::Foundation));
    pipeline.generate_foundation(project.id).await.unwrap_err();
    let failed = pipeline.load(project.id).await.unwrap();
    assert!(matches!(
        failed.run_state,
        RunState::Failed {
            stage: Stage::Foundation,
            ..
        }
    ));
    let err = pipeline.generate_strategy(project.id, None).await.unwrap_err();
    assert!(matches!(err, PipelineError::InvalidState { .. }));

    generator.fail_at(None);
    let project = pipeline.generate_foundation(project.id).await.unwrap();
    assert_eq!(project.run_state, RunState::FoundationGenerated);
    assert_eq!(project.data.audit.as_ref().unwrap().overall_score, 42);
}

#[tokio::test]
async fn calendar_dates_are_anchored_on_generation_day() {
    let (pipeline, _generator) = pipeline();
    let id = confirmed_project(&pipeline).await;
    let project = pipeline.generate_strategy(id, None).await.unwrap();

    let plan = project.data.publishing_plan.unwrap();
    let days: Vec<u32> = plan.events.iter().map(|e| e.day).collect();
    assert_eq!(days, vec![1, 3, 28]);

    let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
    let dates: Vec<_> = plan.events.iter().map(|e| e.scheduled_date).collect();
    assert_eq!(
        dates,
        vec![
            Some(date(2026, 3, 10)),
            Some(date(2026, 3, 12)),
            Some(date(2026, 4, 6)),
        ]
    );
    assert_eq!(plan.events_of(EventType::SocialPost).count(), 1);
}

#[tokio::test]
async fn new_metrics_rerun_only_analysis_stages() {
    let (pipeline, generator) = pipeline();
    let id = confirmed_project(&pipeline).await;
    pipeline.generate_strategy(id, None).await.unwrap();
    assert!(generator
        .last_prompt(Stage::PerformanceAnalysis)
        .contains("No current metrics were supplied"));

    let metrics = PerformanceMetrics {
        monthly_traffic: Some(1200),
        ..PerformanceMetrics::default()
    };
    let project = pipeline
        .generate_strategy(id, Some(metrics.clone()))
        .await
        .unwrap();

    assert_eq!(project.run_state, RunState::StrategyComplete);
    assert_eq!(project.data.performance_metrics, Some(metrics.clone()));
    assert!(generator
        .last_prompt(Stage::PerformanceAnalysis)
        .contains("Monthly organic traffic: 1200"));
    assert_eq!(generator.count(Stage::Keywords), 1);
    assert_eq!(generator.count(Stage::PerformanceAnalysis), 2);
    assert_eq!(generator.count(Stage::SalesInsights), 2);
    assert_eq!(generator.count(Stage::Analytics), 2);

    pipeline.generate_strategy(id, Some(metrics)).await.unwrap();
    assert_eq!(generator.count(Stage::PerformanceAnalysis), 2);
}

#[tokio::test]
async fn edited_foundation_clears_strategy_and_feeds_next_prompt() {
    let (pipeline, generator) = pipeline();
    let project = pipeline
        .create_project("owner-1", "HealthPlus SEO", healthplus())
        .await
        .unwrap();
    pipeline.generate_foundation(project.id).await.unwrap();

    let mut profile = healthplus();
    profile.selected_cities.insert("Pune".to_string());
    let edit = FoundationEdit {
        key_services: Some("Dermatology, paediatrics".to_string()),
        profile: Some(profile),
        ..FoundationEdit::default()
    };
    let edited = pipeline.update_foundation(project.id, edit).await.unwrap();
    let foundation = edited.data.foundation.as_ref().unwrap();
    assert_eq!(foundation.key_services, "Dermatology, paediatrics");
    assert!(edited
        .data
        .profile
        .as_ref()
        .unwrap()
        .selected_cities
        .contains("Pune"));

    pipeline.confirm_foundation(project.id).await.unwrap();
    pipeline.generate_strategy(project.id, None).await.unwrap();
    let prompt = generator.last_prompt(Stage::Keywords);
    assert!(prompt.contains("Key services: Dermatology, paediatrics"));
    assert!(prompt.contains("Target locations: Mumbai, Pune"));
}

#[tokio::test]
async fn cached_generator_reuses_identical_foundation_prompt() {
    let generator = Arc::new(ScriptedGenerator::default());
    let pipeline = Pipeline::new(
        CachedGenerator::new(Arc::clone(&generator)),
        MemoryProjectStore::new(),
        clock(),
    );
    let project = pipeline
        .create_project("owner-1", "HealthPlus SEO", healthplus())
        .await
        .unwrap();

    pipeline.generate_foundation(project.id).await.unwrap();
    pipeline.generate_foundation(project.id).await.unwrap();
    assert_eq!(generator.count(Stage::Foundation), 1);

    let other = pipeline
        .create_project(
            "owner-1",
            "Wellness SEO",
            BusinessProfile::new("Wellness Hub", "Healthcare"),
        )
        .await
        .unwrap();
    pipeline.generate_foundation(other.id).await.unwrap();
    assert_eq!(generator.count(Stage::Foundation), 2);
    assert_eq!(pipeline.generator().cache().len(), 2);
}

#[tokio::test]
async fn archive_and_delete() {
    let (pipeline, _generator) = pipeline();
    let project = pipeline
        .create_project("owner-1", "HealthPlus SEO", healthplus())
        .await
        .unwrap();

    let archived = pipeline.archive(project.id).await.unwrap();
    assert_eq!(archived.status, ProjectStatus::Archived);
    assert_eq!(pipeline.list("owner-1").await.unwrap().len(), 1);
    assert!(pipeline.list("owner-2").await.unwrap().is_empty());

    pipeline.delete(project.id).await.unwrap();
    let err = pipeline.load(project.id).await.unwrap_err();
    assert!(matches!(err, PipelineError::NotFound(_)));
    let err = pipeline.delete(project.id).await.unwrap_err();
    assert!(matches!(err, PipelineError::NotFound(_)));
}

fn failed_at(run_state: &RunState) -> Option<(Stage, FailureKind)> {
    match run_state {
        RunState::Failed { stage, kind, .. } => Some((*stage, *kind)),
        _ => None,
    }
}

#[tokio::test]
async fn foundation_without_required_fields_is_not_saved() {
    let (pipeline, generator) = pipeline();
    let project = pipeline
        .create_project("owner-1", "HealthPlus SEO", healthplus())
        .await
        .unwrap();

    generator.reply_with(Stage::Foundation, json!({}));
    let err = pipeline.generate_foundation(project.id).await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::Schema);
    assert_eq!(err.stage(), Some(Stage::Foundation));

    let stored = pipeline.load(project.id).await.unwrap();
    assert_eq!(
        failed_at(&stored.run_state),
        Some((Stage::Foundation, FailureKind::Schema))
    );
    assert!(stored.data.foundation.is_none());
    assert!(stored.data.audit.is_none());

    generator.reply_with(Stage::Foundation, json!({"error": {"message": "quota"}}));
    let err = pipeline.generate_foundation(project.id).await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::Schema);
}

#[tokio::test]
async fn each_strategy_stage_rejects_response_without_required_fields() {
    for stage in Stage::ALL.into_iter().skip(1) {
        let (pipeline, generator) = pipeline();
        let id = confirmed_project(&pipeline).await;

        generator.reply_with(stage, json!({}));
        let err = pipeline.generate_strategy(id, None).await.unwrap_err();
        assert_eq!(err.stage(), Some(stage), "{stage}");
        assert_eq!(err.kind(), FailureKind::Schema, "{stage}");

        let stored = pipeline.load(id).await.unwrap();
        assert!(!stored.data.has_stage(stage), "{stage} was saved");
        assert_eq!(
            failed_at(&stored.run_state),
            Some((stage, FailureKind::Schema))
        );

        generator.clear_replies();
        let resumed = pipeline.generate_strategy(id, None).await.unwrap();
        assert_eq!(resumed.run_state, RunState::StrategyComplete, "{stage}");
        assert_eq!(generator.count(stage), 2, "{stage}");
    }
}

#[tokio::test]
async fn empty_keywords_never_reach_content_stage() {
    let (pipeline, generator) = pipeline();
    let id = confirmed_project(&pipeline).await;

    generator.reply_with(Stage::Keywords, empty_keywords());
    let err = pipeline.generate_strategy(id, None).await.unwrap_err();
    assert_eq!(err.stage(), Some(Stage::Keywords));
    assert!(err.to_string().contains("no keywords returned"));

    let err = pipeline.generate_strategy(id, None).await.unwrap_err();
    assert_eq!(err.stage(), Some(Stage::Keywords));
    assert_eq!(generator.count(Stage::Keywords), 2);
    assert_eq!(generator.count(Stage::ContentSocial), 0);
    assert!(pipeline.load(id).await.unwrap().data.keywords.is_none());

    generator.clear_replies();
    let project = pipeline.generate_strategy(id, None).await.unwrap();
    assert_eq!(project.run_state, RunState::StrategyComplete);
    assert_eq!(generator.count(Stage::Keywords), 3);
}

#[tokio::test]
async fn empty_content_is_retried_on_resume() {
    let empty_plan = json!({"contentPlan": {}, "socialPosts": {}});
    let no_social = json!({
        "contentPlan": {"blogPosts": [{"title": "Fever guide"}]},
        "socialPosts": {}
    });

    for reply in [empty_plan, no_social] {
        let (pipeline, generator) = pipeline();
        let id = confirmed_project(&pipeline).await;

        generator.reply_with(Stage::ContentSocial, reply);
        let err = pipeline.generate_strategy(id, None).await.unwrap_err();
        assert_eq!(err.stage(), Some(Stage::ContentSocial));

        let stored = pipeline.load(id).await.unwrap();
        assert!(!stored.data.has_stage(Stage::ContentSocial));
        assert_eq!(
            failed_at(&stored.run_state).map(|(stage, _)| stage),
            Some(Stage::ContentSocial)
        );
        assert_eq!(generator.count(Stage::PublishingCalendar), 0);

        generator.clear_replies();
        let project = pipeline.generate_strategy(id, None).await.unwrap();
        assert_eq!(project.run_state, RunState::StrategyComplete);
        assert_eq!(generator.count(Stage::ContentSocial), 2);
        assert_eq!(generator.count(Stage::PublishingCalendar), 1);
    }
}

#[tokio::test]
async fn empty_calendar_is_not_saved() {
    let (pipeline, generator) = pipeline();
    let id = confirmed_project(&pipeline).await;

    generator.reply_with(
        Stage::PublishingCalendar,
        json!({"expertAdvice": {"cadence": "Weekly"}, "events": []}),
    );
    let err = pipeline.generate_strategy(id, None).await.unwrap_err();
    assert_eq!(err.stage(), Some(Stage::PublishingCalendar));
    assert!(!pipeline
        .load(id)
        .await
        .unwrap()
        .data
        .has_stage(Stage::PublishingCalendar));
    assert_eq!(generator.count(Stage::TechnicalSeo), 0);
}

#[tokio::test]
async fn stored_empty_keywords_block_content_stage() {
    let (pipeline, generator) = pipeline();
    let id = confirmed_project(&pipeline).await;

    let mut project = pipeline.load(id).await.unwrap();
    project.data.keywords = Some(KeywordStrategy::default());
    pipeline.store().save(&project).await.unwrap();

    let err = pipeline.generate_strategy(id, None).await.unwrap_err();
    assert!(matches!(
        err,
        PipelineError::MissingPrerequisite {
            stage: Stage::ContentSocial,
            missing: "keyword strategy"
        }
    ));
    assert_eq!(generator.count(Stage::Keywords), 0);
    assert_eq!(generator.count(Stage::ContentSocial), 0);
    assert_eq!(
        failed_at(&pipeline.load(id).await.unwrap().run_state),
        Some((Stage::ContentSocial, FailureKind::Prerequisite))
    );
}

#[tokio::test]
async fn stored_empty_content_blocks_calendar_stage() {
    let (pipeline, generator) = pipeline();
    let id = confirmed_project(&pipeline).await;
    pipeline.generate_strategy(id, None).await.unwrap();

    let mut project = pipeline.load(id).await.unwrap();
    project.run_state = RunState::FoundationConfirmed;
    project.data.content_plan = Some(ContentPlan::default());
    project.data.publishing_plan = None;
    pipeline.store().save(&project).await.unwrap();

    let err = pipeline.generate_strategy(id, None).await.unwrap_err();
    assert!(matches!(
        err,
        PipelineError::MissingPrerequisite {
            stage: Stage::PublishingCalendar,
            missing: "content plan"
        }
    ));
    assert_eq!(generator.count(Stage::ContentSocial), 1);
    assert_eq!(generator.count(Stage::PublishingCalendar), 1);
}
