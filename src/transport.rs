// src/transport.rs

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;

use crate::config::RunConfig;
use crate::errors::{LoadError, Result};
use crate::jobs::JobRequest;

pub const USER_AGENT: &str = concat!("kubs-loadtest/", env!("CARGO_PKG_VERSION"));

/// Status and raw body of a job-submission response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

/// Sends one job to the submission endpoint.
///
/// Any HTTP answer, whatever its status, is `Ok`. `Err` is reserved for the
/// cases where no answer arrived at all: connection failures, timeouts and
/// unreadable bodies. Tests swap in scripted implementations.
#[async_trait]
pub trait JobTransport: Send + Sync {
    async fn post_job(&self, job: &JobRequest) -> Result<TransportResponse>;
}

/// Production transport backed by a shared `reqwest::Client`.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
    jobs_url: String,
}

impl ReqwestTransport {
    pub fn new(client: Client, config: &RunConfig) -> Self {
        Self {
            client,
            jobs_url: config.jobs_url(),
        }
    }

    /// Builds the client every request of a run goes through, with the run's
    /// timeout applied.
    pub fn build_client(config: &RunConfig) -> Result<Client> {
        Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| LoadError::Config(format!("Failed to build HTTP client: {}", e)))
    }
}

/// Timeouts and connection failures mean no answer arrived; everything else
/// stays a plain request error.
fn classify_send_error(e: reqwest::Error) -> LoadError {
    if e.is_timeout() {
        LoadError::Transport(format!("request timed out: {}", e))
    } else if e.is_connect() {
        LoadError::Transport(format!("connection failed: {}", e))
    } else {
        LoadError::Request(e)
    }
}

#[async_trait]
impl JobTransport for ReqwestTransport {
    async fn post_job(&self, job: &JobRequest) -> Result<TransportResponse> {
        log::debug!("📡 POST {} ({})", self.jobs_url, job.kind());

        let resp = self
            .client
            .post(&self.jobs_url)
            .header(CONTENT_TYPE, "application/json")
            .json(job)
            .send()
            .await
            .map_err(classify_send_error)?;

        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(classify_send_error)?;

        log::debug!("📥 Response status: {} ({} bytes)", status, body.len());

        Ok(TransportResponse { status, body })
    }
}
