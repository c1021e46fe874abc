use rankplan_core::{ConfigError, FailureKind, Stage};
use rankplan_gemini::GeneratorError;
use rankplan_store::StoreError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("project {0} not found")]
    NotFound(Uuid),

    #[error("invalid business profile: {0}")]
    InvalidProfile(#[source] ConfigError),

    #[error("{stage} generation failed: {source}")]
    Generator {
        stage: Stage,
        #[source]
        source: GeneratorError,
    },

    #[error("{stage} cannot run before {missing} exists")]
    MissingPrerequisite { stage: Stage, missing: &'static str },

    #[error("cannot {action} while the project is {actual}")]
    InvalidState { action: &'static str, actual: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl PipelineError {
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            PipelineError::InvalidProfile(_) => FailureKind::Configuration,
            PipelineError::Generator { source, .. } if source.is_configuration() => {
                FailureKind::Configuration
            }
            PipelineError::Generator { source, .. } if source.is_schema() => FailureKind::Schema,
            PipelineError::Generator { .. } => FailureKind::Transport,
            PipelineError::MissingPrerequisite { .. } => FailureKind::Prerequisite,
            PipelineError::InvalidState { .. } | PipelineError::NotFound(_) => FailureKind::State,
            PipelineError::Store(_) => FailureKind::Storage,
        }
    }

    /// Stage the failure belongs to, when there is one.
    #[must_use]
    pub fn stage(&self) -> Option<Stage> {
        match self {
            PipelineError::Generator { stage, .. }
            | PipelineError::MissingPrerequisite { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// Alert text for the user: what failed, and what to do about it.
    #[must_use]
    pub fn user_message(&self) -> String {
        match (self.kind(), self) {
            (FailureKind::Configuration, PipelineError::Generator { source, .. }) => format!(
                "The AI service rejected the request: {source}. \
                 Add a valid key from Google AI Studio to GEMINI_API_KEY and run again."
            ),
            (FailureKind::Configuration, _) => format!("{self}. Fix the input and run again."),
            (FailureKind::Transport, PipelineError::Generator { stage, source }) => format!(
                "Could not generate the {}: {source}. \
                 Completed stages were saved; run the command again to resume.",
                stage.label()
            ),
            (FailureKind::Schema, PipelineError::Generator { stage, .. }) => format!(
                "The AI service returned an unexpected response for the {}. \
                 Completed stages were saved; run the command again to retry this stage.",
                stage.label()
            ),
            (FailureKind::Prerequisite, PipelineError::MissingPrerequisite { stage, missing }) => {
                format!(
                    "The {} needs the {missing} first. Run the earlier stages and try again.",
                    stage.label()
                )
            }
            (FailureKind::Storage, _) => format!("Could not save or load the project: {self}"),
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generator_errors_map_to_failure_kinds() {
        let transport = PipelineError::Generator {
            stage: Stage::Keywords,
            source: GeneratorError::Api {
                status: 503,
                message: "overloaded".to_string(),
            },
        };
        assert_eq!(transport.kind(), FailureKind::Transport);
        assert!(transport.user_message().contains("keyword strategy"));
        assert!(transport.user_message().contains("resume"));

        let schema = PipelineError::Generator {
            stage: Stage::Keywords,
            source: GeneratorError::InvalidResponse {
                context: "keywords".to_string(),
                source: serde_json::from_str::<serde_json::Value>("{").unwrap_err(),
            },
        };
        assert_eq!(schema.kind(), FailureKind::Schema);

        let config = PipelineError::Generator {
            stage: Stage::Foundation,
            source: GeneratorError::Api {
                status: 403,
                message: "PERMISSION_DENIED".to_string(),
            },
        };
        assert_eq!(config.kind(), FailureKind::Configuration);
        assert!(config.user_message().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn prerequisite_error_names_missing_input() {
        let err = PipelineError::MissingPrerequisite {
            stage: Stage::PublishingCalendar,
            missing: "social posts",
        };
        assert_eq!(err.kind(), FailureKind::Prerequisite);
        assert_eq!(err.stage(), Some(Stage::PublishingCalendar));
        assert_eq!(
            err.to_string(),
            "publishing_calendar cannot run before social posts exists"
        );
        assert!(err.user_message().contains("needs the social posts first"));
    }

    #[test]
    fn state_errors_have_no_stage() {
        let err = PipelineError::InvalidState {
            action: "confirm the foundation",
            actual: "not_started".to_string(),
        };
        assert_eq!(err.kind(), FailureKind::State);
        assert_eq!(err.stage(), None);
    }
}
