// Thesisfmt Core Library
//
// Classifies the paragraphs of an academic manuscript (front matter, table of
// contents, headings, lists, body text) and applies role-specific formatting
// rules to them in a single forward pass.

pub mod types;
pub mod error;
pub mod config;
pub mod rules;
pub mod state;
pub mod classifier;
pub mod stats;
pub mod containers;
pub mod requirements;
pub mod processor;

// Re-export main types and functions for easy use
pub use types::*;
pub use error::{ConfigError, FormatError, FormatResult};
pub use config::{FormattingRules, RoleRule, StyleSpec, TextTransform};
pub use rules::engine::{run, FormattingPipeline, FormattingTrace};
pub use rules::validation::{ComplianceValidator, ValidationReport};
pub use containers::{DocumentContainer, JsonContainer};
pub use processor::DocumentProcessor;
pub use stats::StatisticsSnapshot;
