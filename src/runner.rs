// src/runner.rs
use futures::future;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::mpsc;
use tokio::time::{Instant, sleep};

use crate::banner;
use crate::config::{Cli, RunConfig};
use crate::errors::Result;
use crate::jobs::generate_job;
use crate::report::RunSummary;
use crate::stats::StatsProbe;
use crate::submitter::{SubmissionResult, Submitter};
use crate::transport::{JobTransport, ReqwestTransport};

/// Random source for one worker. Seeded runs give each worker its own
/// deterministic stream.
fn worker_rng(seed: Option<u64>, worker: usize) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(worker as u64)),
        None => StdRng::from_entropy(),
    }
}

pub fn print_header(config: &RunConfig, summary: &RunSummary) {
    println!("🚀 Submitting {} jobs to: {}", config.total_jobs, config.base_url);
    println!("📝 Job type: {}", config.job_kind);
    if !config.is_sequential() {
        println!("🔄 Workers: {}", config.concurrency);
    }
    log::info!("Run {} started at {}", summary.run_id, summary.started_at);
    println!();
}

/// Validates the arguments, then runs against the real service and prints
/// the report. Nothing is sent when validation fails.
pub async fn run_cli(cli: &Cli) -> Result<RunSummary> {
    let config = RunConfig::from_cli(cli)?;

    banner::print_banner();

    let client = ReqwestTransport::build_client(&config)?;
    let probe = config
        .probe_stats
        .then(|| StatsProbe::new(client.clone(), &config));
    let submitter = Submitter::new(ReqwestTransport::new(client, &config));

    let mut summary = RunSummary::new(config.total_jobs);
    print_header(&config, &summary);

    if let Some(probe) = &probe {
        probe.report("Pre-test").await;
    }

    run_into(&config, &submitter, &mut summary).await;

    println!();
    if let Some(probe) = &probe {
        probe.report("Post-test").await;
    }

    print!("{}", summary.render(&config));
    Ok(summary)
}

/// Runs every iteration of the load test and returns the finished summary.
///
/// With a concurrency of 1 this is a plain loop: generate, submit, record,
/// pause, with exactly one request in flight. Higher concurrency hands the
/// same per-iteration work to a pool of workers.
pub async fn run<T: JobTransport>(config: &RunConfig, submitter: &Submitter<T>) -> RunSummary {
    let mut summary = RunSummary::new(config.total_jobs);
    run_into(config, submitter, &mut summary).await;
    summary
}

/// Same as [`run`], filling a summary the caller already created.
pub async fn run_into<T: JobTransport>(
    config: &RunConfig,
    submitter: &Submitter<T>,
    summary: &mut RunSummary,
) {
    println!("🔍 Testing {} jobs...", config.job_kind);
    println!();

    let start = Instant::now();
    if config.is_sequential() {
        run_sequential(config, submitter, summary).await;
    } else {
        run_pool(config, submitter, summary).await;
    }
    summary.finish(start.elapsed());

    log::info!(
        "Run {} completed: {}/{} succeeded in {}ms",
        summary.run_id,
        summary.success_count(),
        summary.total_jobs,
        summary.elapsed_ms
    );
}

async fn run_sequential<T: JobTransport>(
    config: &RunConfig,
    submitter: &Submitter<T>,
    summary: &mut RunSummary,
) {
    let mut rng = worker_rng(config.seed, 0);

    for index in 1..=config.total_jobs {
        let job = generate_job(config.job_kind, index, &mut rng);
        let result = submitter.submit(index, &job).await;
        println!("{}", result.console_line());
        summary.record(result);

        sleep(config.delay).await;
    }
}

/// Workers pull 1-based indices from a shared counter until all jobs are
/// taken. Results flow through one channel into the summary.
async fn run_pool<T: JobTransport>(
    config: &RunConfig,
    submitter: &Submitter<T>,
    summary: &mut RunSummary,
) {
    let next_index = AtomicUsize::new(1);
    let (tx, mut rx) = mpsc::unbounded_channel::<SubmissionResult>();

    let workers: Vec<_> = (0..config.concurrency)
        .map(|worker| {
            let tx = tx.clone();
            let next_index = &next_index;
            let mut rng = worker_rng(config.seed, worker);
            async move {
                loop {
                    let index = next_index.fetch_add(1, Ordering::Relaxed);
                    if index > config.total_jobs {
                        break;
                    }

                    let job = generate_job(config.job_kind, index, &mut rng);
                    let result = submitter.submit(index, &job).await;
                    println!("{}", result.console_line());
                    if tx.send(result).is_err() {
                        break;
                    }

                    sleep(config.delay).await;
                }
                log::debug!("Worker {} finished", worker);
            }
        })
        .collect();
    // Only worker senders remain, so the channel closes when the last one exits.
    drop(tx);

    let collect = async {
        while let Some(result) = rx.recv().await {
            summary.record(result);
        }
    };

    tokio::join!(future::join_all(workers), collect);
}
