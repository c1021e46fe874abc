//! HTTP client for the Gemini `generateContent` endpoint.
//!
//! Sends a prompt together with a declared `responseSchema`, requests a JSON
//! response, and returns the first candidate's text cleaned and parsed into a
//! [`serde_json::Value`]. The API key is checked locally on construction, so a
//! malformed key never reaches the network.

use std::time::{Duration, Instant};

use rankplan_core::{ApiKey, AppConfig, ConfigError, Schema};
use reqwest::{Client, Url};
use serde_json::Value;

use crate::error::GeneratorError;
use crate::response::{parse_structured, repair_keyword_maps};
use crate::types::{
    ApiErrorEnvelope, Content, GenerateRequest, GenerateResponse, GenerationConfig, Part,
};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/";
const DEFAULT_TEMPERATURE: f32 = 0.7;
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Client for one Gemini model.
///
/// Use [`GeminiClient::new`] for production or [`GeminiClient::with_base_url`]
/// to point at a mock server in tests.
pub struct GeminiClient {
    client: Client,
    api_key: ApiKey,
    model: String,
    endpoint: Url,
    temperature: f32,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("model", &self.model)
            .field("endpoint", &self.endpoint.as_str())
            .field("api_key", &self.api_key)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Creates a client pointed at the production Gemini API.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::Config`] if the key fails the local format
    /// check, or [`GeneratorError::Http`] if the `reqwest::Client` cannot be
    /// constructed.
    pub fn new(api_key: &str, model: &str, timeout_secs: u64) -> Result<Self, GeneratorError> {
        Self::with_base_url(api_key, model, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Same as [`GeminiClient::new`], plus [`GeneratorError::Config`] if
    /// `base_url` is not a valid URL.
    pub fn with_base_url(
        api_key: &str,
        model: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, GeneratorError> {
        let api_key = ApiKey::parse(api_key)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("rankplan/0.1 (seo-strategy)")
            .build()?;

        let endpoint = Self::endpoint_url(base_url, model)?;

        Ok(Self {
            client,
            api_key,
            model: model.to_owned(),
            endpoint,
            temperature: DEFAULT_TEMPERATURE,
        })
    }

    /// Builds a client from application config.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::Config`] with
    /// [`ConfigError::MissingEnvVar`] when no key is configured, or any error
    /// from [`GeminiClient::with_base_url`].
    pub fn from_config(config: &AppConfig) -> Result<Self, GeneratorError> {
        let key = ApiKey::from_config(config.gemini_api_key.as_deref())?;
        Self::with_base_url(
            key.expose(),
            &config.gemini_model,
            config.request_timeout_secs,
            &config.gemini_base_url,
        )
    }

    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Sends `prompt` with `schema` as the required response shape.
    ///
    /// The first candidate's text is stripped of code fences, parsed, and has
    /// its string-encoded keyword maps decoded.
    ///
    /// # Errors
    ///
    /// - [`GeneratorError::Http`] on network failure.
    /// - [`GeneratorError::Api`] on a non-2xx status.
    /// - [`GeneratorError::EmptyResponse`] when no candidate carries text.
    /// - [`GeneratorError::InvalidResponse`] when the text is not JSON.
    pub async fn generate_json(
        &self,
        prompt: &str,
        schema: &Schema,
    ) -> Result<Value, GeneratorError> {
        let request = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: schema.to_json(),
                temperature: self.temperature,
            },
        };

        let started = Instant::now();
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(API_KEY_HEADER, self.api_key.expose())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(Self::api_error(status.as_u16(), &body));
        }

        let envelope: GenerateResponse =
            serde_json::from_str(&body).map_err(|source| GeneratorError::InvalidResponse {
                context: format!("{} response envelope", self.model),
                source,
            })?;

        let Some(text) = envelope.first_text() else {
            return Err(GeneratorError::EmptyResponse(Self::empty_reason(&envelope)));
        };

        let mut value = parse_structured(&text, &self.model)?;
        repair_keyword_maps(&mut value);

        tracing::debug!(
            model = %self.model,
            prompt_chars = prompt.len(),
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "structured generation complete"
        );

        Ok(value)
    }

    fn endpoint_url(base_url: &str, model: &str) -> Result<Url, GeneratorError> {
        let invalid = |reason: String| {
            GeneratorError::Config(ConfigError::InvalidEnvVar {
                var: "RANKPLAN_GEMINI_BASE_URL".to_string(),
                reason,
            })
        };

        // Exactly one trailing slash so `join` appends instead of replacing
        // the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base = Url::parse(&normalised)
            .map_err(|e| invalid(format!("invalid base URL '{base_url}': {e}")))?;
        base.join(&format!("v1beta/models/{model}:generateContent"))
            .map_err(|e| invalid(format!("invalid model '{model}': {e}")))
    }

    /// Maps a non-2xx response to [`GeneratorError::Api`], preferring the
    /// message from Google's error envelope over the raw body.
    fn api_error(status: u16, body: &str) -> GeneratorError {
        let message = match serde_json::from_str::<ApiErrorEnvelope>(body) {
            Ok(envelope) => match envelope.error.status {
                Some(code) if !code.is_empty() => format!("{code}: {}", envelope.error.message),
                _ => envelope.error.message,
            },
            Err(_) if body.trim().is_empty() => "no response body".to_string(),
            Err(_) => body.trim().chars().take(200).collect(),
        };
        tracing::warn!(status, message = %message, "Gemini API returned an error");
        GeneratorError::Api { status, message }
    }

    fn empty_reason(envelope: &GenerateResponse) -> String {
        if let Some(reason) = envelope
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
        {
            return format!("prompt blocked ({reason})");
        }
        match envelope
            .candidates
            .first()
            .and_then(|c| c.finish_reason.as_deref())
        {
            Some(reason) => format!("no text in candidate (finish reason {reason})"),
            None => "no candidates returned".to_string(),
        }
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
