//! Domain model and configuration shared by every `rankplan` crate.
//!
//! Holds the business profile, the generated strategy records, the project
//! snapshot, the schema descriptor used to constrain generator output, and
//! environment-driven configuration.

pub mod app_config;
pub mod calendar;
pub mod config;
pub mod credentials;
pub mod profile;
pub mod project;
pub mod schema;
pub mod stage;
pub mod strategy;

mod lenient;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use calendar::{event_date, map_day_to_date, map_day_to_date_today, CALENDAR_WINDOW_DAYS};
pub use config::{build_app_config, load_app_config, load_app_config_from_env};
pub use credentials::{validate_api_key, ApiKey};
pub use profile::{load_profile, slugify, BusinessProfile, LocationScope, SocialHandles};
pub use project::{AllData, Project, ProjectStatus, RunState};
pub use schema::Schema;
pub use stage::{FailureKind, Stage};
pub use strategy::*;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error(
        "invalid Gemini API key: {reason}. Add a valid key from Google AI Studio to GEMINI_API_KEY"
    )]
    InvalidApiKey { reason: String },

    #[error("failed to read profile file {path}: {source}")]
    ProfileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse profile file: {0}")]
    ProfileParse(#[from] serde_yaml::Error),

    #[error("profile validation failed: {0}")]
    Validation(String),
}
