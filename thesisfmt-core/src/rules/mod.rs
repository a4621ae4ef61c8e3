// Formatting rules module - delegates to semantic sub-modules:
// - patterns.rs: declarative text patterns (exact / contains / regex)
// - detection.rs: ContentDetector predicates built from DetectionConfig
// - formatter.rs: per-role paragraph formatting
// - engine.rs: FormattingPipeline driving state, classifier and formatter
// - validation.rs: read-only compliance check and scoring

pub mod detection;
pub mod engine;
pub mod formatter;
pub mod patterns;
pub mod validation;

pub use engine::*;
