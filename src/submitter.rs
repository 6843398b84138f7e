// src/submitter.rs
use serde::Serialize;
use tokio::time::Instant;

use crate::jobs::JobRequest;
use crate::transport::JobTransport;

/// The only status the submission endpoint answers with on success.
pub const HTTP_CREATED: u16 = 201;

/// Shown in place of a job id when a 201 body carries none.
pub const UNKNOWN_JOB_ID: &str = "Unknown";

/// Outcome of one submission attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionResult {
    pub index: usize,
    pub success: bool,
    pub job_id: Option<String>,
    pub http_status: Option<u16>,
    pub latency_ms: u64,
    pub error_message: Option<String>,
}

impl SubmissionResult {
    /// The console line(s) printed for this attempt.
    pub fn console_line(&self) -> String {
        if self.success {
            return format!(
                "✓ Job {}: {} ({}ms)",
                self.index,
                self.job_id.as_deref().unwrap_or(UNKNOWN_JOB_ID),
                self.latency_ms
            );
        }

        let error = self.error_message.as_deref().unwrap_or_default();
        match self.http_status {
            Some(status) => format!(
                "✗ Job {}: Failed (HTTP {}, {}ms)\n   Response: {}",
                self.index, status, self.latency_ms, error
            ),
            None => format!(
                "✗ Job {}: Error - {} ({}ms)",
                self.index, error, self.latency_ms
            ),
        }
    }
}

/// Reads `jobId` out of a 201 body. A JSON body without a string `jobId`
/// yields `Unknown`; a body that is not JSON at all yields `None`.
fn parse_job_id(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    Some(
        value
            .get("jobId")
            .and_then(|id| id.as_str())
            .unwrap_or(UNKNOWN_JOB_ID)
            .to_string(),
    )
}

/// Performs exactly one POST per call and turns whatever happens into a
/// `SubmissionResult`. Never fails.
pub struct Submitter<T> {
    transport: T,
}

impl<T: JobTransport> Submitter<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn submit(&self, index: usize, job: &JobRequest) -> SubmissionResult {
        let start = Instant::now();
        let outcome = self.transport.post_job(job).await;
        let latency_ms = start.elapsed().as_millis() as u64;

        match outcome {
            Ok(resp) if resp.status == HTTP_CREATED => {
                let job_id = parse_job_id(&resp.body);
                if job_id.is_none() {
                    log::warn!("Job {}: 201 response is not JSON: {}", index, resp.body);
                }
                SubmissionResult {
                    index,
                    success: true,
                    job_id,
                    http_status: Some(resp.status),
                    latency_ms,
                    error_message: None,
                }
            }
            Ok(resp) => {
                log::debug!("Job {}: HTTP {}: {}", index, resp.status, resp.body);
                SubmissionResult {
                    index,
                    success: false,
                    job_id: None,
                    http_status: Some(resp.status),
                    latency_ms,
                    error_message: Some(resp.body),
                }
            }
            Err(e) => {
                log::debug!("Job {}: {}", index, e);
                SubmissionResult {
                    index,
                    success: false,
                    job_id: None,
                    http_status: None,
                    latency_ms,
                    error_message: Some(e.to_string()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{LoadError, Result};
    use crate::jobs::SortAlgorithm;
    use crate::transport::TransportResponse;
    use async_trait::async_trait;

    struct Fixed(fn() -> Result<TransportResponse>);

    #[async_trait]
    impl JobTransport for Fixed {
        async fn post_job(&self, _job: &JobRequest) -> Result<TransportResponse> {
            (self.0)()
        }
    }

    fn job() -> JobRequest {
        JobRequest::Sort { size: 100, algorithm: SortAlgorithm::Bubble }
    }

    #[tokio::test]
    async fn test_created_with_job_id() {
        let submitter = Submitter::new(Fixed(|| {
            Ok(TransportResponse {
                status: 201,
                body: r#"{"jobId":"abc","status":"queued"}"#.to_string(),
            })
        }));
        let result = submitter.submit(1, &job()).await;
        assert!(result.success);
        assert_eq!(result.job_id.as_deref(), Some("abc"));
        assert_eq!(result.http_status, Some(201));
        assert_eq!(result.error_message, None);
        assert!(result.console_line().starts_with("✓ Job 1: abc ("));
    }

    #[tokio::test]
    async fn test_created_with_unreadable_body_still_succeeds() {
        let submitter = Submitter::new(Fixed(|| {
            Ok(TransportResponse { status: 201, body: "not json".to_string() })
        }));
        let result = submitter.submit(4, &job()).await;
        assert!(result.success);
        assert_eq!(result.job_id, None);
        assert!(result.console_line().starts_with("✓ Job 4: Unknown ("));
    }

    #[tokio::test]
    async fn test_created_without_job_id_field_is_unknown() {
        let submitter = Submitter::new(Fixed(|| {
            Ok(TransportResponse { status: 201, body: r#"{"status":"queued"}"#.to_string() })
        }));
        let result = submitter.submit(5, &job()).await;
        assert!(result.success);
        assert_eq!(result.job_id.as_deref(), Some("Unknown"));
        assert!(result.console_line().starts_with("✓ Job 5: Unknown ("));
    }

    #[test]
    fn test_parse_job_id() {
        assert_eq!(parse_job_id(r#"{"jobId":"abc"}"#).as_deref(), Some("abc"));
        assert_eq!(parse_job_id(r#"{"jobId":42}"#).as_deref(), Some("Unknown"));
        assert_eq!(parse_job_id("{}").as_deref(), Some("Unknown"));
        assert_eq!(parse_job_id(""), None);
        assert_eq!(parse_job_id("<html>"), None);
    }

    #[tokio::test]
    async fn test_non_created_status_is_failure() {
        // 200 is not good enough, only 201 counts.
        let submitter = Submitter::new(Fixed(|| {
            Ok(TransportResponse { status: 200, body: r#"{"jobId":"x"}"#.to_string() })
        }));
        let result = submitter.submit(2, &job()).await;
        assert!(!result.success);
        assert_eq!(result.job_id, None);
        assert_eq!(result.http_status, Some(200));
        assert_eq!(result.error_message.as_deref(), Some(r#"{"jobId":"x"}"#));

        let line = result.console_line();
        assert!(line.starts_with("✗ Job 2: Failed (HTTP 200, "));
        assert!(line.ends_with(r#"   Response: {"jobId":"x"}"#));
    }

    #[tokio::test]
    async fn test_transport_error_has_no_status() {
        let submitter = Submitter::new(Fixed(|| {
            Err(LoadError::Transport("operation timed out".to_string()))
        }));
        let result = submitter.submit(3, &job()).await;
        assert!(!result.success);
        assert_eq!(result.job_id, None);
        assert_eq!(result.http_status, None);
        assert_eq!(
            result.error_message.as_deref(),
            Some("Transport error: operation timed out")
        );
        assert!(result.console_line().starts_with("✗ Job 3: Error - Transport error: operation timed out"));
    }
}
