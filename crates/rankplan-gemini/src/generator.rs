//! The structured-generation seam and its prompt cache.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use rankplan_core::Schema;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::client::GeminiClient;
use crate::error::GeneratorError;

/// Anything that turns a prompt plus output schema into parsed JSON.
#[async_trait]
pub trait StructuredGenerator: Send + Sync {
    /// Generate a response shaped like `schema`.
    async fn generate(&self, prompt: &str, schema: &Schema) -> Result<Value, GeneratorError>;

    /// Model identifier, used in logs.
    fn model(&self) -> &str;
}

#[async_trait]
impl StructuredGenerator for GeminiClient {
    async fn generate(&self, prompt: &str, schema: &Schema) -> Result<Value, GeneratorError> {
        self.generate_json(prompt, schema).await
    }

    fn model(&self) -> &str {
        GeminiClient::model(self)
    }
}

#[async_trait]
impl<G> StructuredGenerator for Arc<G>
where
    G: StructuredGenerator + ?Sized,
{
    async fn generate(&self, prompt: &str, schema: &Schema) -> Result<Value, GeneratorError> {
        (**self).generate(prompt, schema).await
    }

    fn model(&self) -> &str {
        (**self).model()
    }
}

/// Parsed responses keyed by exact prompt text.
///
/// Unbounded and never invalidated; it lives as long as the process. The lock
/// is only held for a lookup or insert, never across an await.
#[derive(Debug, Default)]
pub struct PromptCache {
    entries: Mutex<HashMap<String, Value>>,
}

impl PromptCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, prompt: &str) -> Option<Value> {
        self.lock().get(prompt).cloned()
    }

    pub fn insert(&self, prompt: &str, value: Value) {
        self.lock().insert(prompt.to_owned(), value);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Value>> {
        // A panic while holding the lock cannot leave the map half-written.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Wraps a generator so identical prompts hit the network once.
///
/// Only successful responses that carry every required property are cached;
/// anything else is requested again the next time the same prompt is sent.
#[derive(Debug)]
pub struct CachedGenerator<G> {
    inner: G,
    cache: PromptCache,
}

impl<G> CachedGenerator<G> {
    pub fn new(inner: G) -> Self {
        Self {
            inner,
            cache: PromptCache::new(),
        }
    }

    #[must_use]
    pub fn cache(&self) -> &PromptCache {
        &self.cache
    }

    pub fn inner(&self) -> &G {
        &self.inner
    }
}

#[async_trait]
impl<G> StructuredGenerator for CachedGenerator<G>
where
    G: StructuredGenerator,
{
    async fn generate(&self, prompt: &str, schema: &Schema) -> Result<Value, GeneratorError> {
        if let Some(hit) = self.cache.get(prompt) {
            tracing::debug!(model = self.inner.model(), "prompt cache hit");
            return Ok(hit);
        }

        let value = self.inner.generate(prompt, schema).await?;
        if schema.missing_required(&value).is_empty() {
            self.cache.insert(prompt, value.clone());
        }
        Ok(value)
    }

    fn model(&self) -> &str {
        self.inner.model()
    }
}

/// Generate and deserialize into `T`.
///
/// # Errors
///
/// Any error from the generator, [`GeneratorError::MissingFields`] when the
/// JSON leaves out a required property, or [`GeneratorError::InvalidResponse`]
/// when it does not fit `T`.
pub async fn generate_typed<T, G>(
    generator: &G,
    prompt: &str,
    schema: &Schema,
    context: &str,
) -> Result<T, GeneratorError>
where
    T: DeserializeOwned,
    G: StructuredGenerator + ?Sized,
{
    let value = generator.generate(prompt, schema).await?;
    let missing = schema.missing_required(&value);
    if !missing.is_empty() {
        return Err(GeneratorError::MissingFields {
            context: context.to_string(),
            fields: missing,
        });
    }
    serde_json::from_value(value).map_err(|source| GeneratorError::InvalidResponse {
        context: context.to_string(),
        source,
    })
}
