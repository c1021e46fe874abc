//! Offline format checks for the generator credential.
//!
//! A key that fails these checks is rejected before any request is built, so
//! obviously wrong values never cost a network round-trip.

use crate::ConfigError;

/// Shortest accepted key. Real Gemini keys are 39 characters.
pub const MIN_API_KEY_LEN: usize = 30;

/// Every Google AI Studio key starts with this prefix.
pub const API_KEY_PREFIX: &str = "AIza";

/// Substrings that mark a copied sample value rather than a real key.
/// Matched case-insensitively.
pub const BANNED_KEY_SUBSTRINGS: &[&str] = &[
    "placeholder",
    "dummy",
    "test",
    "example",
    "your_api_key",
    "your-api-key",
    "xxx",
];

/// Validate the format of a Gemini API key.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidApiKey`] naming the first failed check.
pub fn validate_api_key(key: &str) -> Result<(), ConfigError> {
    let key = key.trim();

    if key.is_empty() {
        return Err(invalid("key is empty"));
    }

    if key.len() < MIN_API_KEY_LEN {
        return Err(invalid(&format!(
            "key is {} characters, expected at least {MIN_API_KEY_LEN}",
            key.len()
        )));
    }

    if !key.starts_with(API_KEY_PREFIX) {
        return Err(invalid(&format!("key must start with '{API_KEY_PREFIX}'")));
    }

    if key.chars().any(char::is_whitespace) {
        return Err(invalid("key contains whitespace"));
    }

    let lowered = key.to_lowercase();
    if let Some(banned) = BANNED_KEY_SUBSTRINGS
        .iter()
        .find(|banned| lowered.contains(*banned))
    {
        return Err(invalid(&format!(
            "key contains '{banned}', which looks like a sample value"
        )));
    }

    Ok(())
}

fn invalid(reason: &str) -> ConfigError {
    ConfigError::InvalidApiKey {
        reason: reason.to_string(),
    }
}

/// A validated API key. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Validate and wrap a raw key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidApiKey`] if the format check fails.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        validate_api_key(raw)?;
        Ok(Self(raw.trim().to_string()))
    }

    /// Validate an optional configured key, reporting absence as a
    /// configuration error.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] when `raw` is `None`, or
    /// [`ConfigError::InvalidApiKey`] if the format check fails.
    pub fn from_config(raw: Option<&str>) -> Result<Self, ConfigError> {
        let raw = raw.ok_or_else(|| ConfigError::MissingEnvVar("GEMINI_API_KEY".to_string()))?;
        Self::parse(raw)
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey([redacted])")
    }
}
