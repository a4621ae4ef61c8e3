//! Document containers
//!
//! Converts stored manuscripts to and from the in-memory paragraph model.
//!
//! ```text
//! File (JSON, ...)
//!     ↓
//! [Format-specific DocumentContainer::open]
//!     ↓
//! Document (paragraphs + runs)
//!     ↓
//! [FormattingPipeline]
//!     ↓
//! [DocumentContainer::save]
//! ```
//!
//! ## Available Containers
//!
//! - `JsonContainer` - the paragraph model serialized as JSON

pub mod container;
pub mod json;

pub use container::DocumentContainer;
pub use json::JsonContainer;
