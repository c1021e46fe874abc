//! Schema-validated structured generation against the Gemini API.
//!
//! [`GeminiClient`] sends one prompt plus a declared output schema and returns
//! the cleaned, parsed JSON. [`CachedGenerator`] memoizes results by exact
//! prompt text. Both implement [`StructuredGenerator`], the seam the pipeline
//! depends on.

pub mod client;
pub mod error;
pub mod generator;
pub mod response;

mod types;

pub use client::GeminiClient;
pub use error::GeneratorError;
pub use generator::{generate_typed, CachedGenerator, PromptCache, StructuredGenerator};
pub use response::{parse_structured, repair_keyword_maps, strip_code_fences, KEYWORD_MAP_FIELDS};
