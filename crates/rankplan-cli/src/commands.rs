//! Command handlers. Each one opens the store (and the generator when the
//! command generates), runs one pipeline operation, and prints the result.

use std::path::Path;

use anyhow::Context;
use chrono::Utc;
use rankplan_core::{
    load_profile, AppConfig, ApiKey, FoundationEdit, PerformanceMetrics, Project, RunState,
    Stage,
};
use rankplan_export::ExportFormat;
use rankplan_gemini::GeminiClient;
use rankplan_pipeline::{Pipeline, PipelineError, SystemClock};
use rankplan_store::{connect_store, ProjectStore};
use uuid::Uuid;

type Store = Box<dyn ProjectStore>;

/// Each command sends every prompt once, so the process talks to the client
/// directly; `CachedGenerator` is for callers that keep a pipeline alive.
async fn generating_pipeline(
    config: &AppConfig,
) -> anyhow::Result<Pipeline<GeminiClient, Store>> {
    let client = GeminiClient::from_config(config).context(
        "GEMINI_API_KEY is missing or malformed; get a key from Google AI Studio and run `rankplan check-key`",
    )?;
    tracing::debug!(model = client.model(), "generator ready");
    let store = connect_store(config).await;
    Ok(Pipeline::new(client, store, SystemClock))
}

async fn store_pipeline(config: &AppConfig) -> Pipeline<(), Store> {
    Pipeline::new((), connect_store(config).await, SystemClock)
}

/// Wrap a pipeline failure with its user-facing remediation text.
fn alert(err: PipelineError) -> anyhow::Error {
    let message = err.user_message();
    anyhow::Error::new(err).context(message)
}

fn print_project(project: &Project) {
    println!("{} ({})", project.name, project.id);
    println!("Status: {}", project.status);
    println!("Run state: {}", project.run_state);
    println!(
        "Updated: {}",
        project.updated_at.format("%Y-%m-%d %H:%M UTC")
    );
    println!();
    for stage in Stage::ALL {
        let mark = if project.data.has_stage(stage) { "x" } else { " " };
        println!("[{mark}] {}. {}", stage.number(), stage.label());
    }
}

fn print_foundation(project: &Project) {
    if let Some(foundation) = &project.data.foundation {
        println!("{}", foundation.profile.business_name);
        println!("  {}", foundation.description);
        println!("  Target customer: {}", foundation.target_customer);
        println!("  Key services: {}", foundation.key_services);
    }
    if let Some(audit) = &project.data.audit {
        println!();
        for (name, score) in audit.scores() {
            println!("  {name:<18}{score:>3}/100");
        }
    }
}

/// Create a project and run stage 1.
///
/// # Errors
///
/// Returns an error if the profile is invalid, the key is missing, or
/// generation fails.
pub(crate) async fn run_foundation(
    config: &AppConfig,
    profile_path: &Path,
    name: Option<&str>,
) -> anyhow::Result<()> {
    let profile = load_profile(profile_path)?;
    let name = name.map_or_else(
        || format!("{} SEO strategy", profile.business_name),
        ToString::to_string,
    );

    let pipeline = generating_pipeline(config).await?;
    let project = pipeline
        .create_project(&config.user_id, &name, profile)
        .await
        .map_err(alert)?;
    println!("Created project {}", project.id);

    let project = pipeline
        .generate_foundation(project.id)
        .await
        .map_err(alert)?;
    print_foundation(&project);
    println!();
    println!(
        "Review the foundation, then run `rankplan confirm {}` (or `rankplan edit-foundation {}`).",
        project.id, project.id
    );
    Ok(())
}

/// # Errors
///
/// Returns an error if the project is confirmed already or generation fails.
pub(crate) async fn run_regenerate(config: &AppConfig, id: Uuid) -> anyhow::Result<()> {
    let pipeline = generating_pipeline(config).await?;
    let project = pipeline.generate_foundation(id).await.map_err(alert)?;
    print_foundation(&project);
    Ok(())
}

/// # Errors
///
/// Returns an error if there is nothing to change or the foundation is no
/// longer editable.
pub(crate) async fn run_edit_foundation(
    config: &AppConfig,
    id: Uuid,
    edit: FoundationEdit,
) -> anyhow::Result<()> {
    if edit.is_empty() {
        anyhow::bail!(
            "nothing to change; pass --description, --target-customer, --key-services or --profile"
        );
    }
    let pipeline = store_pipeline(config).await;
    let project = pipeline.update_foundation(id, edit).await.map_err(alert)?;
    print_foundation(&project);
    Ok(())
}

/// # Errors
///
/// Returns an error unless the project has a generated, unconfirmed
/// foundation.
pub(crate) async fn run_confirm(config: &AppConfig, id: Uuid) -> anyhow::Result<()> {
    let pipeline = store_pipeline(config).await;
    let project = pipeline.confirm_foundation(id).await.map_err(alert)?;
    println!(
        "Foundation confirmed. Run `rankplan strategy {}` to generate the strategy.",
        project.id
    );
    Ok(())
}

fn load_metrics(path: &Path) -> anyhow::Result<PerformanceMetrics> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read metrics file {}", path.display()))?;
    serde_yaml::from_str(&content)
        .with_context(|| format!("failed to parse metrics file {}", path.display()))
}

/// Run stages 2-9.
///
/// # Errors
///
/// Returns an error if the foundation is not confirmed or a stage fails.
/// Completed stages stay saved either way.
pub(crate) async fn run_strategy(
    config: &AppConfig,
    id: Uuid,
    metrics: Option<&Path>,
) -> anyhow::Result<()> {
    let metrics = metrics.map(load_metrics).transpose()?;
    let pipeline = generating_pipeline(config).await?;
    let project = pipeline
        .generate_strategy(id, metrics)
        .await
        .map_err(alert)?;

    print_project(&project);
    if project.run_state == RunState::StrategyComplete {
        println!();
        println!(
            "Export it with `rankplan export {} --format markdown`.",
            project.id
        );
    }
    Ok(())
}

/// # Errors
///
/// Returns an error if the project does not exist.
pub(crate) async fn run_show(config: &AppConfig, id: Uuid, json: bool) -> anyhow::Result<()> {
    let pipeline = store_pipeline(config).await;
    let project = pipeline.load(id).await.map_err(alert)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&project)?);
    } else {
        print_project(&project);
    }
    Ok(())
}

/// # Errors
///
/// Returns an error if the store cannot be read.
pub(crate) async fn run_list(config: &AppConfig) -> anyhow::Result<()> {
    let pipeline = store_pipeline(config).await;
    let projects = pipeline.list(&config.user_id).await.map_err(alert)?;

    if projects.is_empty() {
        println!("no projects yet; run `rankplan foundation --profile <file>` first");
        return Ok(());
    }

    println!(
        "{:<38}{:<11}{:<22}{:<8}NAME",
        "ID", "STATUS", "RUN STATE", "STAGES"
    );
    for project in &projects {
        println!(
            "{:<38}{:<11}{:<22}{:<8}{}",
            project.id,
            project.status.as_str(),
            project.run_state.name(),
            format!("{}/9", project.data.completed_stages().len()),
            project.name
        );
    }
    Ok(())
}

/// # Errors
///
/// Returns an error if the project does not exist.
pub(crate) async fn run_delete(config: &AppConfig, id: Uuid) -> anyhow::Result<()> {
    store_pipeline(config)
        .await
        .delete(id)
        .await
        .map_err(alert)?;
    println!("Deleted project {id}");
    Ok(())
}

/// # Errors
///
/// Returns an error if the project does not exist.
pub(crate) async fn run_archive(config: &AppConfig, id: Uuid) -> anyhow::Result<()> {
    let project = store_pipeline(config)
        .await
        .archive(id)
        .await
        .map_err(alert)?;
    println!("Archived project {}", project.id);
    Ok(())
}

/// # Errors
///
/// Returns an error if the project lacks the stage the format needs or the
/// output file cannot be written.
pub(crate) async fn run_export(
    config: &AppConfig,
    id: Uuid,
    format: ExportFormat,
    out: Option<&Path>,
) -> anyhow::Result<()> {
    let pipeline = store_pipeline(config).await;
    let project = pipeline.load(id).await.map_err(alert)?;
    let rendered = rankplan_export::export(&project, format, Utc::now())?;

    match out {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Wrote {format} export to {}", path.display());
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

/// Validate the configured key format offline.
///
/// # Errors
///
/// Returns an error describing why the key is missing or malformed.
pub(crate) fn run_check_key(config: &AppConfig) -> anyhow::Result<()> {
    ApiKey::from_config(config.gemini_api_key.as_deref())
        .context("set GEMINI_API_KEY to a key from Google AI Studio (it starts with AIza)")?;
    println!(
        "GEMINI_API_KEY looks valid; model {} at {}",
        config.gemini_model, config.gemini_base_url
    );
    Ok(())
}
