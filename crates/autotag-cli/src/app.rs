//! Top-level run orchestration.

use crate::cli::Cli;
use crate::config::Config;
use crate::discover::discover;
use crate::output::{save_dry_run, save_error_log, Formatter};
use anyhow::Context;
use autotag_extractor::MetadataExtractor;
use autotag_pipeline::{RunSummary, Scheduler};
use tracing_subscriber::EnvFilter;

/// Install the stderr log subscriber
///
/// `RUST_LOG` takes precedence over the `--debug` default.
pub fn init_tracing(debug: bool) {
    let level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("{level},hyper=info,hyper_util=info,reqwest=info"))
    });

    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Run one full pass over the notes under `cli.root`
///
/// Per-document failures end up in the error log; only setup problems
/// (bad configuration, missing root, no notes) are returned as errors.
pub fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::from_cli(&cli).context("Failed to load configuration")?;
    init_tracing(config.run.debug);

    let formatter = Formatter::new(config.run.color);
    let root = cli.root;

    println!("{}", formatter.info("Scanning files..."));
    let documents = discover(&root)?;
    let total = documents.len();
    println!("{}", formatter.info(&format!("Found {} markdown files.", total)));

    let job_config = config.job_config();
    let llm = config.provider()?;
    let extractor = MetadataExtractor::new(llm, config.extractor_config());
    let scheduler = Scheduler::new(job_config, extractor, root.clone())?;

    println!(
        "{}",
        formatter.info(&format!(
            "Configuration: {} worker(s), max {} concurrent LLM request(s), {} mode",
            config.run.workers,
            match config.run.llm_concurrency {
                0 => "unlimited".to_string(),
                n => n.to_string(),
            },
            if config.run.write { "write" } else { "dry run" }
        ))
    );

    // The blocking HTTP client must be created and dropped outside the runtime.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    let report = runtime.block_on(scheduler.run(documents));
    drop(runtime);

    let summary = RunSummary::from_report(&report, total);

    if config.run.write {
        println!(
            "{}",
            formatter.success(&format!(
                "Write complete. Processed: {} files. Successfully updated: {}",
                summary.processed, summary.updated
            ))
        );
    } else {
        match save_dry_run(&root, &report) {
            Ok(path) => println!(
                "{}",
                formatter.success(&format!(
                    "Dry run complete. Metadata written to: {}",
                    path.display()
                ))
            ),
            Err(e) => eprintln!("{}", formatter.error(&format!("Saving dry run JSON failed: {}", e))),
        }
    }

    match save_error_log(&root, &report.errors) {
        Ok(Some(path)) => println!(
            "{}",
            formatter.warning(&format!(
                "{} error(s). Error log saved to: {}",
                report.errors.len(),
                path.display()
            ))
        ),
        Ok(None) => {}
        Err(e) => eprintln!("{}", formatter.error(&format!("Saving error log failed: {}", e))),
    }

    println!("{}", formatter.format_summary(&summary));
    Ok(())
}
