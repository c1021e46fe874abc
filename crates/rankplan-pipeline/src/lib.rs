//! Nine-stage SEO strategy pipeline: prompt builders plus the orchestrator
//! that runs them against a persisted project snapshot.

pub mod clock;
pub mod error;
pub mod pipeline;
pub mod prompts;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::PipelineError;
pub use pipeline::Pipeline;
pub use prompts::{StagePrompt, StrategySnapshot};
