//! The per-document job

use crate::config::JobConfig;
use crate::gate::LlmGate;
use crate::report::{DryRunRecord, ProcessingOutcome};
use autotag_domain::traits::LlmProvider;
use autotag_domain::{resolve_date, Document, ModelResult};
use autotag_extractor::MetadataExtractor;
use chrono::{DateTime, Local};
use std::ffi::OsString;
use std::fmt::Display;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Everything a job needs, shared across the run
pub struct JobContext<L>
where
    L: LlmProvider,
{
    /// Run configuration
    pub config: Arc<JobConfig>,
    /// Model client
    pub extractor: Arc<MetadataExtractor<L>>,
    /// Gate around model calls
    pub gate: LlmGate,
    /// Processing root; outcome paths are relative to it
    pub root: Arc<PathBuf>,
}

impl<L: LlmProvider> Clone for JobContext<L> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            extractor: Arc::clone(&self.extractor),
            gate: self.gate.clone(),
            root: Arc::clone(&self.root),
        }
    }
}

/// Process a single document end to end
///
/// Never fails: every problem is reported through the returned outcome.
pub async fn process_document<L>(path: PathBuf, ctx: &JobContext<L>) -> ProcessingOutcome
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: Display,
{
    let rel = relative_path(&ctx.root, &path);
    let config = &ctx.config;

    let content = match tokio::fs::read_to_string(&path).await {
        Ok(content) => content,
        Err(e) => {
            error!("ERR reading {}: {}", rel, e);
            return ProcessingOutcome::ReadFailed {
                path: rel,
                error: e.to_string(),
            };
        }
    };

    let mut doc = Document::parse(&path, &content);

    if doc.is_processed() && !config.force_reprocess {
        if config.debug {
            info!("Skipping {} (already processed)", rel);
        } else {
            debug!("Skipping {} (already processed)", rel);
        }
        return ProcessingOutcome::Skipped { path: rel };
    }

    doc.ensure_title();
    doc.update_word_count();

    let result = if doc.body_chars() >= config.char_limit {
        let _permit = ctx.gate.acquire().await;
        debug!("Querying model for {}", rel);
        ctx.extractor.query(&doc.body).await
    } else {
        if config.debug {
            info!(
                "{} is below the character limit ({} < {}), not querying model",
                rel,
                doc.body_chars(),
                config.char_limit
            );
        } else {
            debug!(
                "{} is below the character limit ({} < {}), not querying model",
                rel,
                doc.body_chars(),
                config.char_limit
            );
        }
        ModelResult::empty()
    };

    doc.set_summary(&result.summary);
    doc.merge_tags(&result.tags);

    let fs_date = match creation_date(&path).await {
        Ok(date) => date,
        Err(e) => {
            error!("ERR reading metadata of {}: {}", rel, e);
            return ProcessingOutcome::ReadFailed {
                path: rel,
                error: e.to_string(),
            };
        }
    };
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let resolution = resolve_date(
        result.date.as_deref(),
        result.date_confidence,
        &filename,
        &fs_date,
    );
    doc.set_date(&resolution);
    doc.mark_processed();

    if !config.write_mode {
        return ProcessingOutcome::DryRun(DryRunRecord {
            path: rel,
            metadata: doc.header,
            date_source: resolution.source,
            ai_date: result.date,
            ai_confidence: result.date_confidence,
        });
    }

    let rendered = match doc.render() {
        Ok(rendered) => rendered,
        Err(e) => {
            error!("ERR writing {}: {}", rel, e);
            return ProcessingOutcome::WriteFailed {
                path: rel,
                error: e.to_string(),
            };
        }
    };

    match write_atomic(&path, &rendered).await {
        Ok(()) => {
            info!("Updated {}", rel);
            ProcessingOutcome::Written {
                path: rel,
                date_source: resolution.source,
            }
        }
        Err(e) => {
            error!("ERR writing {}: {}", rel, e);
            ProcessingOutcome::WriteFailed {
                path: rel,
                error: e.to_string(),
            }
        }
    }
}

/// Path relative to `root`, falling back to the full path
pub fn relative_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .into_owned()
}

/// File creation date as local `YYYY-MM-DD`
///
/// Uses the modification time on platforms that do not record creation.
pub async fn creation_date(path: &Path) -> io::Result<String> {
    let metadata = tokio::fs::metadata(path).await?;
    let time = metadata.created().or_else(|_| metadata.modified())?;
    let local: DateTime<Local> = time.into();
    Ok(local.format("%Y-%m-%d").to_string())
}

/// Sibling temp path used for atomic rewrites
pub fn temp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

/// Write to `<path>.tmp`, then rename over `path`
pub async fn write_atomic(path: &Path, content: &str) -> io::Result<()> {
    let tmp = temp_path(path);
    tokio::fs::write(&tmp, content).await?;
    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(e);
    }
    Ok(())
}
