// src/stats.rs
use reqwest::Client;
use serde::Deserialize;

use crate::config::RunConfig;
use crate::errors::{LoadError, Result};

/// The part of the service's `/api/stats` response this tool reads.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobStats {
    #[serde(default)]
    pub total_jobs_submitted: u64,
    #[serde(default)]
    pub total_jobs_completed: u64,
    #[serde(default)]
    pub total_jobs_failed: u64,
    #[serde(default)]
    pub total_jobs_processing: u64,
    #[serde(default)]
    pub total_jobs_queued: u64,
    #[serde(default)]
    pub queue_length: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    #[serde(default)]
    pub timestamp: Option<String>,
    pub job_stats: JobStats,
}

pub fn parse_stats(body: &str) -> Result<StatsResponse> {
    Ok(serde_json::from_str(body)?)
}

/// Best-effort reader for the target's stats endpoint.
pub struct StatsProbe {
    client: Client,
    url: String,
}

impl StatsProbe {
    pub fn new(client: Client, config: &RunConfig) -> Self {
        Self {
            client,
            url: config.stats_url(),
        }
    }

    pub async fn fetch(&self) -> Result<StatsResponse> {
        let resp = self.client.get(&self.url).send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(LoadError::SubmissionFailure {
                status: status.as_u16(),
                body,
            });
        }

        parse_stats(&body)
    }

    /// Prints the queue length, or a notice when stats cannot be read.
    /// Never fails the run.
    pub async fn report(&self, label: &str) {
        println!("📈 {} queue status:", label);
        match self.fetch().await {
            Ok(stats) => {
                let s = &stats.job_stats;
                println!("   Queue Length: {}", s.queue_length);
                println!(
                    "   Submitted: {}  Completed: {}  Failed: {}  Processing: {}",
                    s.total_jobs_submitted,
                    s.total_jobs_completed,
                    s.total_jobs_failed,
                    s.total_jobs_processing
                );
            }
            Err(e) => {
                log::warn!("Stats probe against {} failed: {}", self.url, e);
                println!("   Stats not available");
            }
        }
        println!();
    }
}
