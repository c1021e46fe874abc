use rankplan_core::ConfigError;
use thiserror::Error;

/// Errors returned by a structured generator call.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// Missing or malformed credential, detected before any request.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("Gemini API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The API answered but produced no usable candidate (blocked prompt,
    /// safety stop, empty parts).
    #[error("empty response from generator: {0}")]
    EmptyResponse(String),

    /// The response text is not valid JSON, or does not fit the expected type.
    #[error("invalid structured response for {context}: {source}")]
    InvalidResponse {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// Valid JSON that leaves out properties the schema requires.
    #[error("structured response for {context} is missing required fields: {}", .fields.join(", "))]
    MissingFields {
        context: String,
        fields: Vec<String>,
    },
}

impl GeneratorError {
    /// True when the failure is fixed by changing configuration rather than
    /// by trying again: a locally rejected key, or the API refusing the key.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        match self {
            GeneratorError::Config(_) => true,
            GeneratorError::Api { status, message } => {
                matches!(status, 401 | 403)
                    || (*status == 400 && message.to_lowercase().contains("api key"))
            }
            _ => false,
        }
    }

    /// True for schema/parse failures as opposed to transport failures.
    #[must_use]
    pub fn is_schema(&self) -> bool {
        matches!(
            self,
            GeneratorError::InvalidResponse { .. } | GeneratorError::MissingFields { .. }
        )
    }
}
