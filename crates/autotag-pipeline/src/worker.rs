//! Worker pool driving a run

use crate::config::JobConfig;
use crate::error::PipelineError;
use crate::gate::LlmGate;
use crate::job::{process_document, relative_path, JobContext};
use crate::report::{JobMessage, ResultAggregator, RunReport};
use autotag_domain::traits::LlmProvider;
use autotag_extractor::MetadataExtractor;
use std::collections::VecDeque;
use std::fmt::Display;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::task::JoinSet;

type Queue = Arc<Mutex<VecDeque<PathBuf>>>;

/// Runs document jobs on a fixed pool of worker tasks
///
/// Workers pull paths from a shared queue. Each job runs in its own task, so
/// a panic only loses that document. Outcomes reach the aggregator over a
/// channel.
///
/// # Examples
///
/// ```no_run
/// use autotag_extractor::{ExtractorConfig, MetadataExtractor};
/// use autotag_llm::MockProvider;
/// use autotag_pipeline::{JobConfig, Scheduler};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let extractor = MetadataExtractor::new(MockProvider::default(), ExtractorConfig::default());
///     let scheduler = Scheduler::new(JobConfig::default(), extractor, "notes")?;
///
///     let report = scheduler.run(vec!["notes/today.md".into()]).await;
///     println!("{} outcomes", report.results.len());
///     Ok(())
/// }
/// ```
pub struct Scheduler<L>
where
    L: LlmProvider,
{
    ctx: JobContext<L>,
}

impl<L> Scheduler<L>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: Display,
{
    /// Create a scheduler for documents under `root`
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(
        config: JobConfig,
        extractor: MetadataExtractor<L>,
        root: impl Into<PathBuf>,
    ) -> Result<Self, PipelineError> {
        config.validate()?;
        let gate = LlmGate::new(config.llm_concurrency_limit);
        Ok(Self {
            ctx: JobContext {
                config: Arc::new(config),
                extractor: Arc::new(extractor),
                gate,
                root: Arc::new(root.into()),
            },
        })
    }

    /// Run configuration
    pub fn config(&self) -> &JobConfig {
        &self.ctx.config
    }

    /// The gate shared by this run's jobs
    pub fn gate(&self) -> &LlmGate {
        &self.ctx.gate
    }

    /// Process every document and collect the results
    pub async fn run(&self, documents: Vec<PathBuf>) -> RunReport {
        let start = Instant::now();
        let total = documents.len();
        let workers = self.ctx.config.worker_count.min(total.max(1));

        tracing::info!(
            "Processing {} documents ({} workers, LLM limit: {})",
            total,
            workers,
            self.ctx
                .gate
                .limit()
                .map_or_else(|| "unlimited".to_string(), |n| n.to_string())
        );

        let queue: Queue = Arc::new(Mutex::new(VecDeque::from(documents)));
        let (tx, mut rx) = mpsc::unbounded_channel();

        let mut pool = JoinSet::new();
        for worker_id in 0..workers {
            pool.spawn(worker_loop(
                worker_id,
                Arc::clone(&queue),
                tx.clone(),
                self.ctx.clone(),
            ));
        }
        drop(tx);

        let mut aggregator = ResultAggregator::new();
        while let Some(message) = rx.recv().await {
            aggregator.record(message);
            tracing::debug!("{}/{} documents done", aggregator.received(), total);
        }

        while let Some(joined) = pool.join_next().await {
            if let Err(e) = joined {
                tracing::error!("{}", PipelineError::Worker(e.to_string()));
            }
        }

        let report = aggregator.into_report(start.elapsed());
        tracing::info!(
            "Run finished in {:?}: {} outcomes, {} errors",
            report.elapsed,
            report.results.len(),
            report.errors.len()
        );
        report
    }
}

fn next_path(queue: &Mutex<VecDeque<PathBuf>>) -> Option<PathBuf> {
    match queue.lock() {
        Ok(mut guard) => guard.pop_front(),
        Err(poisoned) => poisoned.into_inner().pop_front(),
    }
}

async fn worker_loop<L>(
    worker_id: usize,
    queue: Queue,
    tx: mpsc::UnboundedSender<JobMessage>,
    ctx: JobContext<L>,
) where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: Display,
{
    while let Some(path) = next_path(&queue) {
        let rel = relative_path(&ctx.root, &path);
        let job_ctx = ctx.clone();
        let job = tokio::spawn(async move { process_document(path, &job_ctx).await });

        let message = match job.await {
            Ok(outcome) => JobMessage::Finished(outcome),
            Err(e) => {
                tracing::error!("ERR processing {}: {}", rel, e);
                JobMessage::Panicked {
                    path: rel,
                    error: e.to_string(),
                }
            }
        };

        if tx.send(message).is_err() {
            break;
        }
    }
    tracing::debug!("Worker {} finished", worker_id);
}
