// src/config.rs
use clap::Parser;
use std::time::Duration;

use crate::errors::{LoadError, Result};
use crate::jobs::JobKind;

pub const DEFAULT_BASE_URL: &str = "http://kubs.local:50036";
pub const DEFAULT_JOB_TYPE: &str = "bcrypt";
pub const DEFAULT_TOTAL_JOBS: usize = 100;
pub const DEFAULT_DELAY_MS: u64 = 100;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Command-line arguments
#[derive(Parser, Debug, Clone)]
#[command(name = "kubs-loadtest")]
#[command(about = "Submit synthetic jobs to a job-submission service and report the results")]
#[command(version)]
pub struct Cli {
    /// Base URL of the job-submission service
    #[arg(default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Job type to submit: prime, bcrypt or sort
    #[arg(default_value = DEFAULT_JOB_TYPE)]
    pub job_type: String,

    /// Number of jobs to submit
    #[arg(long, short = 'n', default_value_t = DEFAULT_TOTAL_JOBS)]
    pub jobs: usize,

    /// Number of concurrent workers (1 keeps submissions strictly sequential)
    #[arg(long, short = 'c', default_value_t = 1)]
    pub concurrency: usize,

    /// Pause after each submission, in milliseconds
    #[arg(long, default_value_t = DEFAULT_DELAY_MS)]
    pub delay_ms: u64,

    /// Per-request timeout, in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Seed for payload generation, for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,

    /// Query /api/stats before and after the run
    #[arg(long)]
    pub stats: bool,
}

/// Immutable settings for one run, validated once at startup.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub base_url: String,
    pub job_kind: JobKind,
    pub total_jobs: usize,
    pub concurrency: usize,
    pub delay: Duration,
    pub timeout: Duration,
    pub seed: Option<u64>,
    pub probe_stats: bool,
}

impl RunConfig {
    /// A sequential run with the stock delay and timeout.
    pub fn new(base_url: &str, job_kind: JobKind, total_jobs: usize) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            job_kind,
            total_jobs,
            concurrency: 1,
            delay: Duration::from_millis(DEFAULT_DELAY_MS),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            seed: None,
            probe_stats: false,
        }
    }

    /// Validates the parsed arguments. The job type is checked here, before
    /// any client is built or request is sent.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let job_kind: JobKind = cli.job_type.parse()?;

        let base_url = cli.base_url.trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(LoadError::Config(format!(
                "Base URL must start with http:// or https://, got '{}'",
                cli.base_url
            )));
        }
        if cli.jobs == 0 {
            return Err(LoadError::Config("--jobs must be at least 1".to_string()));
        }
        if cli.concurrency == 0 {
            return Err(LoadError::Config("--concurrency must be at least 1".to_string()));
        }
        if cli.timeout_secs == 0 {
            return Err(LoadError::Config("--timeout-secs must be at least 1".to_string()));
        }

        Ok(Self {
            base_url,
            job_kind,
            total_jobs: cli.jobs,
            // More workers than jobs would only spawn idle tasks.
            concurrency: cli.concurrency.min(cli.jobs),
            delay: Duration::from_millis(cli.delay_ms),
            timeout: Duration::from_secs(cli.timeout_secs),
            seed: cli.seed,
            probe_stats: cli.stats,
        })
    }

    pub fn jobs_url(&self) -> String {
        format!("{}/api/jobs", self.base_url)
    }

    pub fn job_status_url(&self, job_id: &str) -> String {
        format!("{}/api/jobs/{}", self.base_url, job_id)
    }

    pub fn stats_url(&self) -> String {
        format!("{}/api/stats", self.base_url)
    }

    pub fn is_sequential(&self) -> bool {
        self.concurrency <= 1
    }
}
