mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rankplan_core::FoundationEdit;
use rankplan_export::ExportFormat;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "rankplan")]
#[command(about = "Generate a nine-stage SEO strategy for a business")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Create a project from a business profile and generate its foundation and audit
    Foundation {
        /// YAML or JSON business profile
        #[arg(long)]
        profile: PathBuf,
        /// Project name (defaults to "<business name> SEO strategy")
        #[arg(long)]
        name: Option<String>,
    },
    /// Regenerate the foundation of a project that is not yet confirmed
    Regenerate { id: Uuid },
    /// Edit the generated foundation before confirming it
    EditFoundation {
        id: Uuid,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        target_customer: Option<String>,
        #[arg(long)]
        key_services: Option<String>,
        /// Replacement business profile
        #[arg(long)]
        profile: Option<PathBuf>,
    },
    /// Confirm the foundation so the strategy can be generated
    Confirm { id: Uuid },
    /// Generate stages 2-9, resuming after the last completed stage
    Strategy {
        id: Uuid,
        /// YAML or JSON file with current performance metrics
        #[arg(long)]
        metrics: Option<PathBuf>,
    },
    /// Show one project
    Show {
        id: Uuid,
        /// Print the full snapshot as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the current user's projects, most recent first
    List,
    /// Delete a project
    Delete { id: Uuid },
    /// Mark a project archived
    Archive { id: Uuid },
    /// Export a project as markdown, keywords-csv, calendar-csv or ics
    Export {
        id: Uuid,
        #[arg(long, default_value = "markdown")]
        format: ExportFormat,
        /// Write to this file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Check the configured GEMINI_API_KEY format without calling the API
    CheckKey,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = rankplan_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Foundation { profile, name }) => {
            commands::run_foundation(&config, &profile, name.as_deref()).await?;
        }
        Some(Commands::Regenerate { id }) => commands::run_regenerate(&config, id).await?,
        Some(Commands::EditFoundation {
            id,
            description,
            target_customer,
            key_services,
            profile,
        }) => {
            let profile = profile
                .as_deref()
                .map(rankplan_core::load_profile)
                .transpose()?;
            let edit = FoundationEdit {
                description,
                target_customer,
                key_services,
                profile,
            };
            commands::run_edit_foundation(&config, id, edit).await?;
        }
        Some(Commands::Confirm { id }) => commands::run_confirm(&config, id).await?,
        Some(Commands::Strategy { id, metrics }) => {
            commands::run_strategy(&config, id, metrics.as_deref()).await?;
        }
        Some(Commands::Show { id, json }) => commands::run_show(&config, id, json).await?,
        Some(Commands::List) => commands::run_list(&config).await?,
        Some(Commands::Delete { id }) => commands::run_delete(&config, id).await?,
        Some(Commands::Archive { id }) => commands::run_archive(&config, id).await?,
        Some(Commands::Export { id, format, out }) => {
            commands::run_export(&config, id, format, out.as_deref()).await?;
        }
        Some(Commands::CheckKey) => commands::run_check_key(&config)?,
        None => println!("rankplan ready; run `rankplan --help` for commands"),
    }

    Ok(())
}
