//! AutoTag Domain Layer
//!
//! This crate contains the core domain model for AutoTag. It defines the
//! document representation, the metadata produced by the model service, and
//! the trait interface that the transport layer implements.
//!
//! ## Key Concepts
//!
//! - **Document**: A note with an optional YAML header block and a body
//! - **ModelResult**: Best-effort metadata (summary, tags, date) returned by the model
//! - **Tag normalization**: Coercing loosely typed tag values into a clean list
//! - **Date resolution**: Tiered fallback (AI → Filename → FileSystem)
//!
//! ## Architecture
//!
//! - No I/O: parsing and rendering work on strings only
//! - Infrastructure implementations (HTTP, filesystem, scheduling) live in other crates
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod date;
pub mod document;
pub mod metadata;
pub mod tags;
pub mod traits;

// Re-exports for convenience
pub use date::{resolve_date, DateResolution, DateSource, AI_CONFIDENCE_THRESHOLD};
pub use document::{Document, DocumentError, HEADER_DELIMITER};
pub use metadata::{ModelResult, MAX_SUMMARY_WORDS, MAX_TAGS};
pub use tags::normalize_tags;
