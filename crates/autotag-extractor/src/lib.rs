//! AutoTag Extractor
//!
//! Turns a document body into structured metadata by querying an LLM and
//! recovering a key/value object from whatever text comes back.
//!
//! # Architecture
//!
//! ```text
//! Body → PromptBuilder → LlmProvider → raw text → parser → ModelResult
//! ```
//!
//! # Key Features
//!
//! - **Balanced-brace extraction**: Finds the object inside chatty output
//! - **Layered parsing**: YAML, then strict JSON, then the whole response as YAML
//! - **Typed field extraction**: Every field has a default; no schema is assumed
//! - **Unicode repair**: Decodes literal `\uXXXX` escapes left by the model
//! - **Best effort**: Failures degrade into an empty result, never an error
//!
//! # Example Usage
//!
//! ```no_run
//! use autotag_extractor::{ExtractorConfig, MetadataExtractor};
//! use autotag_llm::MockProvider;
//!
//! # async fn example() {
//! let llm = MockProvider::new("{summary: 'Weekly sync notes', tags: [meetings]}");
//! let extractor = MetadataExtractor::new(llm, ExtractorConfig::default());
//!
//! let result = extractor.query("Notes from the weekly sync...").await;
//! println!("Summary: {}", result.summary);
//! println!("Tags: {:?}", result.tags);
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod extractor;
pub mod parser;
mod prompt;


pub use config::ExtractorConfig;
pub use error::ExtractorError;
pub use extractor::MetadataExtractor;
pub use parser::{extract_object, parse_response, unescape_literal_escapes};
pub use prompt::{PromptBuilder, SYSTEM_PROMPT};
