//! Publish-time content checks for review text.
//!
//! `ModerationPipeline::moderate` runs every detector over the submitted text
//! and folds their findings into one `ModerationVerdict`. No I/O; the compiled
//! tables are immutable and shared across threads.

pub mod profanity;
pub mod normalize;
pub mod detectors;
pub mod pipeline;
pub mod gate;

pub use gate::ensure_publishable;
pub use normalize::{normalize, Normalized, Rewrite};
pub use pipeline::{moderate, ModerationPipeline};
pub use profanity::ProfanityIndex;
