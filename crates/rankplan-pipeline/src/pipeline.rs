//! Strategy pipeline orchestration.
//!
//! Runs the nine stages in dependency order against one project snapshot:
//!
//! 1. Foundation + audit from the business profile (`generate_foundation`).
//! 2. The user may edit the foundation, then confirms it (the commit point).
//! 3. Stages 2-9 run as one batch (`generate_strategy`), each awaiting the
//!    previous one because its prompt embeds the earlier output.
//!
//! The snapshot is saved after every completed stage. The first failure stops
//! the run and is recorded as `RunState::Failed`; completed stages are kept,
//! and a later `generate_strategy` call resumes from the first missing stage.

use rankplan_core::{
    AllData, BrandFoundation, BusinessProfile, FoundationEdit, PerformanceMetrics, Project,
    ProjectStatus, PublishingPlan, RunState, Stage,
};
use rankplan_gemini::{generate_typed, GeneratorError, StructuredGenerator};
use rankplan_store::ProjectStore;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::clock::Clock;
use crate::error::PipelineError;
use crate::prompts::{
    build_analytics_prompt, build_content_social_prompt, build_conversion_prompt,
    build_foundation_prompt, build_keywords_prompt, build_performance_prompt,
    build_publishing_calendar_prompt, build_sales_insights_prompt, build_technical_seo_prompt,
    ContentSocialResponse, FoundationResponse, SalesInsightsResponse, StagePrompt,
    StrategySnapshot,
};

/// Orchestrates generation for projects held in `S` using generator `G`.
pub struct Pipeline<G, S> {
    generator: G,
    store: S,
    clock: Box<dyn Clock>,
}

// Snapshot bookkeeping and user edits; none of these call the generator.
impl<G, S> Pipeline<G, S>
where
    S: ProjectStore,
{
    pub fn new(generator: G, store: S, clock: impl Clock + 'static) -> Self {
        Self {
            generator,
            store,
            clock: Box::new(clock),
        }
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// # Errors
    ///
    /// [`PipelineError::NotFound`] if no project has this id.
    pub async fn load(&self, id: Uuid) -> Result<Project, PipelineError> {
        self.store
            .load(id)
            .await?
            .ok_or(PipelineError::NotFound(id))
    }

    /// # Errors
    ///
    /// Returns a store error if listing fails.
    pub async fn list(&self, owner_id: &str) -> Result<Vec<Project>, PipelineError> {
        Ok(self.store.list(owner_id).await?)
    }

    /// # Errors
    ///
    /// [`PipelineError::NotFound`] if nothing was deleted.
    pub async fn delete(&self, id: Uuid) -> Result<(), PipelineError> {
        if self.store.delete(id).await? {
            tracing::info!(project_id = %id, "project deleted");
            Ok(())
        } else {
            Err(PipelineError::NotFound(id))
        }
    }

    /// # Errors
    ///
    /// [`PipelineError::NotFound`] or a store error.
    pub async fn archive(&self, id: Uuid) -> Result<Project, PipelineError> {
        let mut project = self.load(id).await?;
        project.status = ProjectStatus::Archived;
        self.persist(&mut project).await?;
        Ok(project)
    }

    /// Validate the profile and save a new, not-yet-started project.
    ///
    /// # Errors
    ///
    /// [`PipelineError::InvalidProfile`] or a store error.
    pub async fn create_project(
        &self,
        owner_id: &str,
        name: &str,
        profile: BusinessProfile,
    ) -> Result<Project, PipelineError> {
        profile.validate().map_err(PipelineError::InvalidProfile)?;
        let project = Project::new(owner_id, name, profile, self.clock.now());
        self.store.save(&project).await?;
        tracing::info!(project_id = %project.id, owner_id, "project created");
        Ok(project)
    }

    /// Apply user edits to a generated, unconfirmed foundation.
    ///
    /// # Errors
    ///
    /// [`PipelineError::InvalidState`] unless the foundation is generated and
    /// not yet confirmed; [`PipelineError::InvalidProfile`] if an edited
    /// profile fails validation.
    pub async fn update_foundation(
        &self,
        id: Uuid,
        edit: FoundationEdit,
    ) -> Result<Project, PipelineError> {
        let mut project = self.load(id).await?;
        if project.run_state != RunState::FoundationGenerated || project.data.foundation.is_none()
        {
            return Err(PipelineError::InvalidState {
                action: "edit the foundation",
                actual: project.run_state.name().to_string(),
            });
        }
        if edit.is_empty() {
            return Ok(project);
        }
        if let Some(profile) = &edit.profile {
            profile.validate().map_err(PipelineError::InvalidProfile)?;
            project.data.profile = Some(profile.clone());
        }

        if let Some(foundation) = project.data.foundation.as_mut() {
            edit.apply(foundation);
        }
        project.data.clear_strategy();

        self.persist(&mut project).await?;
        tracing::info!(project_id = %id, "foundation edited");
        Ok(project)
    }

    /// The commit point: gates stages 2-9.
    ///
    /// # Errors
    ///
    /// [`PipelineError::InvalidState`] unless the foundation was generated and
    /// not yet confirmed.
    pub async fn confirm_foundation(&self, id: Uuid) -> Result<Project, PipelineError> {
        let mut project = self.load(id).await?;
        if project.run_state != RunState::FoundationGenerated {
            return Err(PipelineError::InvalidState {
                action: "confirm the foundation",
                actual: project.run_state.name().to_string(),
            });
        }
        if !project.data.has_stage(Stage::Foundation) {
            return Err(PipelineError::MissingPrerequisite {
                stage: Stage::Keywords,
                missing: "brand foundation",
            });
        }

        project.run_state = RunState::FoundationConfirmed;
        self.persist(&mut project).await?;
        tracing::info!(project_id = %id, "foundation confirmed");
        Ok(project)
    }

    async fn persist(&self, project: &mut Project) -> Result<(), PipelineError> {
        project.touch(self.clock.now());
        self.store.save(project).await?;
        Ok(())
    }
}

impl<G, S> Pipeline<G, S>
where
    G: StructuredGenerator,
    S: ProjectStore,
{
    /// Stage 1. Allowed before confirmation; regenerating discards every
    /// downstream output.
    ///
    /// # Errors
    ///
    /// [`PipelineError::InvalidState`] once the foundation is confirmed;
    /// generator failures are recorded on the project and returned.
    pub async fn generate_foundation(&self, id: Uuid) -> Result<Project, PipelineError> {
        let mut project = self.load(id).await?;
        match &project.run_state {
            RunState::NotStarted
            | RunState::FoundationGenerated
            | RunState::Failed {
                stage: Stage::Foundation,
                ..
            } => {}
            other => {
                return Err(PipelineError::InvalidState {
                    action: "generate the foundation",
                    actual: other.name().to_string(),
                })
            }
        }

        tracing::info!(project_id = %id, stage = %Stage::Foundation, "running stage");
        if let Err(err) = self.run_stage(&mut project.data, Stage::Foundation).await {
            return Err(self.fail(project, err).await);
        }

        project.data.clear_strategy();
        project.run_state = RunState::FoundationGenerated;
        project.status = ProjectStatus::Active;
        self.persist(&mut project).await?;
        Ok(project)
    }

    /// Stages 2-9. Stages whose output already exists are skipped, so calling
    /// this again after a failure resumes the run.
    ///
    /// New `metrics` replace any stored ones and invalidate the stages that
    /// read them; on a completed project only those stages run again.
    ///
    /// # Errors
    ///
    /// [`PipelineError::InvalidState`] before the foundation is confirmed;
    /// the first stage failure is recorded on the project and returned.
    pub async fn generate_strategy(
        &self,
        id: Uuid,
        metrics: Option<PerformanceMetrics>,
    ) -> Result<Project, PipelineError> {
        let mut project = self.load(id).await?;
        match &project.run_state {
            RunState::FoundationConfirmed
            | RunState::StrategyGenerating
            | RunState::StrategyComplete => {}
            RunState::Failed { stage, .. } if *stage != Stage::Foundation => {}
            other => {
                return Err(PipelineError::InvalidState {
                    action: "generate the strategy",
                    actual: other.name().to_string(),
                })
            }
        }

        if let Some(metrics) = metrics {
            if project.data.performance_metrics.as_ref() != Some(&metrics) {
                project.data.performance_metrics = Some(metrics);
                project.data.performance_analysis = None;
                project.data.sales_insights = None;
                project.data.analytics = None;
            }
        }

        project.run_state = RunState::StrategyGenerating;
        self.persist(&mut project).await?;

        for stage in Stage::ALL.into_iter().skip(1) {
            if project.data.has_stage(stage) {
                tracing::debug!(
                    project_id = %id,
                    stage = %stage,
                    "stage already complete, skipping"
                );
                continue;
            }

            tracing::info!(
                project_id = %id,
                stage = %stage,
                number = stage.number(),
                "running stage"
            );
            if let Err(err) = self.run_stage(&mut project.data, stage).await {
                return Err(self.fail(project, err).await);
            }
            self.persist(&mut project).await?;
        }

        project.run_state = RunState::StrategyComplete;
        project.status = ProjectStatus::Completed;
        self.persist(&mut project).await?;
        tracing::info!(project_id = %id, "strategy complete");
        Ok(project)
    }

    /// Build the stage prompt from `data`, call the generator, and store the
    /// result back into `data`. Nothing is written on failure.
    async fn run_stage(&self, data: &mut AllData, stage: Stage) -> Result<(), PipelineError> {
        match stage {
            Stage::Foundation => {
                let profile = require(&data.profile, stage, "business profile")?.clone();
                let response: FoundationResponse =
                    self.call(&build_foundation_prompt(&profile)).await?;
                data.foundation = Some(BrandFoundation {
                    profile,
                    description: response.description,
                    target_customer: response.target_customer,
                    key_services: response.key_services,
                });
                data.audit = Some(response.audit);
            }
            Stage::Keywords => {
                let prompt = build_keywords_prompt(
                    require(&data.foundation, stage, "brand foundation")?,
                    require(&data.audit, stage, "SEO audit")?,
                );
                let keywords: rankplan_core::KeywordStrategy = self.call(&prompt).await?;
                if keywords.is_empty() {
                    return Err(PipelineError::Generator {
                        stage,
                        source: GeneratorError::EmptyResponse("no keywords returned".to_string()),
                    });
                }
                for keyword in keywords.missing_metrics() {
                    tracing::debug!(keyword, "keyword has no search metrics");
                }
                data.keywords = Some(keywords);
            }
            Stage::ContentSocial => {
                let keywords = require(&data.keywords, stage, "keyword strategy")?;
                if keywords.is_empty() {
                    return Err(PipelineError::MissingPrerequisite {
                        stage,
                        missing: "keyword strategy",
                    });
                }
                let prompt = build_content_social_prompt(
                    require(&data.foundation, stage, "brand foundation")?,
                    keywords,
                );
                let response: ContentSocialResponse = self.call(&prompt).await?;
                if response.content_plan.is_empty() || response.social_posts.is_empty() {
                    return Err(PipelineError::Generator {
                        stage,
                        source: GeneratorError::EmptyResponse(
                            "no content plan or social posts returned".to_string(),
                        ),
                    });
                }
                let mut content_plan = response.content_plan;
                content_plan.normalize();
                data.content_plan = Some(content_plan);
                data.social_posts = Some(response.social_posts);
            }
            Stage::PublishingCalendar => {
                let content_plan = require(&data.content_plan, stage, "content plan")?;
                let social_posts = require(&data.social_posts, stage, "social posts")?;
                if content_plan.is_empty() {
                    return Err(PipelineError::MissingPrerequisite {
                        stage,
                        missing: "content plan",
                    });
                }
                if social_posts.is_empty() {
                    return Err(PipelineError::MissingPrerequisite {
                        stage,
                        missing: "social posts",
                    });
                }
                let prompt = build_publishing_calendar_prompt(
                    require(&data.foundation, stage, "brand foundation")?,
                    content_plan,
                    social_posts,
                );
                let mut plan: PublishingPlan = self.call(&prompt).await?;
                if plan.events.is_empty() {
                    return Err(PipelineError::Generator {
                        stage,
                        source: GeneratorError::EmptyResponse(
                            "no calendar events returned".to_string(),
                        ),
                    });
                }
                plan.normalize();
                plan.anchor(self.clock.today());
                data.publishing_plan = Some(plan);
            }
            Stage::TechnicalSeo => {
                let prompt = build_technical_seo_prompt(
                    require(&data.foundation, stage, "brand foundation")?,
                    require(&data.audit, stage, "SEO audit")?,
                );
                data.technical_seo = Some(self.call(&prompt).await?);
            }
            Stage::ConversionPlan => {
                let prompt = build_conversion_prompt(
                    require(&data.foundation, stage, "brand foundation")?,
                    require(&data.audit, stage, "SEO audit")?,
                );
                data.conversion_plan = Some(self.call(&prompt).await?);
            }
            Stage::PerformanceAnalysis => {
                let metrics = data.performance_metrics.clone().unwrap_or_default();
                let prompt = build_performance_prompt(&snapshot(data, stage)?, &metrics);
                data.performance_analysis = Some(self.call(&prompt).await?);
            }
            Stage::SalesInsights => {
                let prompt = build_sales_insights_prompt(
                    &snapshot(data, stage)?,
                    require(&data.performance_analysis, stage, "performance analysis")?,
                );
                let response: SalesInsightsResponse = self.call(&prompt).await?;
                data.sales_insights = Some(response.sales_insights);
            }
            Stage::Analytics => {
                let prompt = build_analytics_prompt(
                    &snapshot(data, stage)?,
                    require(&data.performance_analysis, stage, "performance analysis")?,
                    require(&data.sales_insights, stage, "sales insights")?,
                );
                data.analytics = Some(self.call(&prompt).await?);
            }
        }
        Ok(())
    }

    async fn call<T: DeserializeOwned>(&self, prompt: &StagePrompt) -> Result<T, PipelineError> {
        generate_typed(
            &self.generator,
            &prompt.text,
            &prompt.schema,
            prompt.stage.as_str(),
        )
        .await
        .map_err(|source| PipelineError::Generator {
            stage: prompt.stage,
            source,
        })
    }

    /// Record a stage failure on the project, keeping every completed stage.
    async fn fail(&self, mut project: Project, err: PipelineError) -> PipelineError {
        tracing::warn!(
            project_id = %project.id,
            stage = ?err.stage(),
            kind = %err.kind(),
            error = %err,
            "stage failed"
        );
        if let Some(stage) = err.stage() {
            project.run_state = RunState::Failed {
                stage,
                kind: err.kind(),
                message: err.to_string(),
            };
            if let Err(save_err) = self.persist(&mut project).await {
                tracing::warn!(
                    project_id = %project.id,
                    error = %save_err,
                    "could not record failed run state"
                );
            }
        }
        err
    }
}

fn require<'a, T>(
    slot: &'a Option<T>,
    stage: Stage,
    missing: &'static str,
) -> Result<&'a T, PipelineError> {
    slot.as_ref()
        .ok_or(PipelineError::MissingPrerequisite { stage, missing })
}

/// Borrow every stage 1-6 output, failing on the first one absent.
fn snapshot(data: &AllData, stage: Stage) -> Result<StrategySnapshot<'_>, PipelineError> {
    Ok(StrategySnapshot {
        foundation: require(&data.foundation, stage, "brand foundation")?,
        audit: require(&data.audit, stage, "SEO audit")?,
        keywords: require(&data.keywords, stage, "keyword strategy")?,
        content_plan: require(&data.content_plan, stage, "content plan")?,
        social_posts: require(&data.social_posts, stage, "social posts")?,
        publishing_plan: require(&data.publishing_plan, stage, "publishing calendar")?,
        technical_seo: require(&data.technical_seo, stage, "technical SEO plan")?,
        conversion_plan: require(&data.conversion_plan, stage, "conversion plan")?,
    })
}
