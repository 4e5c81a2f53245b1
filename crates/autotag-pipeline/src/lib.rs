//! AutoTag Pipeline
//!
//! Concurrent metadata extraction over a set of Markdown notes.
//!
//! # Overview
//!
//! Each document is handled by an independent job:
//! - **Read** the file and split the YAML header from the body
//! - **Skip** documents already marked with `autoAiTag` (unless forced)
//! - **Enrich** the header with title, word count, summary and tags
//! - **Resolve** one canonical date (AI → Filename → FileSystem)
//! - **Persist** atomically, or report what would change in a dry run
//!
//! # Architecture
//!
//! ```text
//!            ┌──────────── queue ────────────┐
//!            ▼               ▼               ▼
//!        worker 1        worker 2   ...  worker N      (N = worker_count)
//!            │               │               │
//!            └── job task ───┴── job task ───┘
//!                      │ LlmGate (M permits)
//!                      ▼
//!               MetadataExtractor ──► model service
//!                      │
//!                 mpsc channel
//!                      ▼
//!              ResultAggregator ──► RunReport
//! ```
//!
//! Worker count and the gate limit are independent: many documents can be
//! read and written while only M of them talk to the model.
//!
//! # Usage
//!
//! ```no_run
//! use autotag_extractor::{ExtractorConfig, MetadataExtractor};
//! use autotag_llm::OpenAiCompatProvider;
//! use autotag_pipeline::{JobConfig, RunSummary, Scheduler};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let llm = OpenAiCompatProvider::new(
//!     "http://localhost:1234/v1/chat/completions",
//!     "openai/gpt-oss-20b",
//! )?;
//! let extractor = MetadataExtractor::new(llm, ExtractorConfig::default());
//! let scheduler = Scheduler::new(JobConfig::default(), extractor, "notes")?;
//!
//! let documents = vec!["notes/meeting.md".into()];
//! let report = scheduler.run(documents).await;
//! println!("{}", RunSummary::from_report(&report, 1).summary());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod gate;
mod job;
mod metrics;
mod report;
mod worker;

pub use config::{JobConfig, DEFAULT_CHAR_LIMIT, DEFAULT_LLM_CONCURRENCY, DEFAULT_WORKER_COUNT};
pub use error::PipelineError;
pub use gate::{GatePermit, LlmGate};
pub use job::{creation_date, process_document, relative_path, write_atomic, JobContext};
pub use metrics::RunSummary;
pub use report::{
    DryRunRecord, ErrorKind, ErrorRecord, JobMessage, ProcessingOutcome, ResultAggregator,
    RunReport,
};
pub use worker::Scheduler;
