// src/report.rs
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

use crate::config::RunConfig;
use crate::submitter::SubmissionResult;

/// Min / mean / max request latency over every attempt of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LatencyStats {
    pub min_ms: u64,
    pub mean_ms: u64,
    pub max_ms: u64,
}

/// Aggregate of all submission results of one run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: String,
    pub started_at: String,
    pub total_jobs: usize,
    pub results: Vec<SubmissionResult>,
    pub elapsed_ms: u64,
}

impl RunSummary {
    pub fn new(total_jobs: usize) -> Self {
        Self {
            run_id: Uuid::new_v4().to_string(),
            started_at: chrono::Utc::now().to_rfc3339(),
            total_jobs,
            results: Vec::with_capacity(total_jobs),
            elapsed_ms: 0,
        }
    }

    pub fn record(&mut self, result: SubmissionResult) {
        self.results.push(result);
    }

    /// Stamps the wall-clock time and puts results back in submission order.
    pub fn finish(&mut self, elapsed: Duration) {
        self.elapsed_ms = elapsed.as_millis() as u64;
        self.results.sort_by_key(|r| r.index);
    }

    pub fn success_count(&self) -> usize {
        self.results.iter().filter(|r| r.success).count()
    }

    pub fn failed_count(&self) -> usize {
        self.results.iter().filter(|r| !r.success).count()
    }

    pub fn is_complete(&self) -> bool {
        self.results.len() == self.total_jobs
    }

    pub fn all_succeeded(&self) -> bool {
        self.total_jobs > 0 && self.success_count() == self.total_jobs
    }

    /// `success * 100 / total`, rounded to the nearest percent with ties to even.
    pub fn success_rate(&self) -> u32 {
        if self.total_jobs == 0 {
            return 0;
        }
        (self.success_count() as f64 * 100.0 / self.total_jobs as f64).round_ties_even() as u32
    }

    /// Full-run average: elapsed time over jobs, pauses included. Truncated.
    pub fn average_ms_per_job(&self) -> u64 {
        if self.total_jobs == 0 {
            return 0;
        }
        self.elapsed_ms / self.total_jobs as u64
    }

    pub fn jobs_per_second(&self) -> f64 {
        if self.elapsed_ms == 0 {
            return 0.0;
        }
        self.total_jobs as f64 * 1000.0 / self.elapsed_ms as f64
    }

    /// Ids of successful jobs, in submission order.
    pub fn job_ids(&self) -> Vec<&str> {
        self.results
            .iter()
            .filter(|r| r.success)
            .filter_map(|r| r.job_id.as_deref())
            .collect()
    }

    pub fn latency_stats(&self) -> Option<LatencyStats> {
        let min_ms = self.results.iter().map(|r| r.latency_ms).min()?;
        let max_ms = self.results.iter().map(|r| r.latency_ms).max()?;
        let sum: u64 = self.results.iter().map(|r| r.latency_ms).sum();
        Some(LatencyStats {
            min_ms,
            mean_ms: sum / self.results.len() as u64,
            max_ms,
        })
    }

    /// Renders the end-of-run report.
    pub fn render(&self, config: &RunConfig) -> String {
        Report { summary: self, config }.to_string()
    }
}

struct Report<'a> {
    summary: &'a RunSummary,
    config: &'a RunConfig,
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.summary;

        writeln!(f, "📊 Results:")?;
        writeln!(f, "===========")?;
        writeln!(f, "Total Jobs: {}", s.total_jobs)?;
        writeln!(f, "Successful: {}", s.success_count())?;
        writeln!(f, "Failed: {}", s.failed_count())?;
        writeln!(f, "Success Rate: {}%", s.success_rate())?;
        writeln!(f, "Total Time: {:.2}s", s.elapsed_ms as f64 / 1000.0)?;
        writeln!(f, "Average Time per Job: {}ms", s.average_ms_per_job())?;
        if let Some(latency) = s.latency_stats() {
            writeln!(
                f,
                "Request Latency: min {}ms / mean {}ms / max {}ms",
                latency.min_ms, latency.mean_ms, latency.max_ms
            )?;
        }
        if !self.config.is_sequential() {
            writeln!(f, "Jobs per Second: {:.1}", s.jobs_per_second())?;
        }

        writeln!(f)?;
        if s.all_succeeded() {
            writeln!(f, "🎉 All {} jobs submitted successfully!", s.total_jobs)?;
        } else {
            writeln!(f, "⚠️  Some jobs failed. Check the service logs.")?;
        }

        writeln!(f)?;
        writeln!(f, "🔍 Check job status with:")?;
        if let Some(first) = s.job_ids().first() {
            writeln!(f, "   curl {}", self.config.job_status_url(first))?;
        }
        writeln!(f, "📊 Monitor with Grafana dashboard")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::JobKind;

    fn ok(index: usize, id: &str, latency_ms: u64) -> SubmissionResult {
        SubmissionResult {
            index,
            success: true,
            job_id: Some(id.to_string()),
            http_status: Some(201),
            latency_ms,
            error_message: None,
        }
    }

    fn failed(index: usize, latency_ms: u64) -> SubmissionResult {
        SubmissionResult {
            index,
            success: false,
            job_id: None,
            http_status: Some(500),
            latency_ms,
            error_message: Some("boom".to_string()),
        }
    }

    fn config() -> RunConfig {
        RunConfig::new("http://localhost:3000", JobKind::Bcrypt, 3)
    }

    #[test]
    fn test_success_rate_rounds() {
        let mut summary = RunSummary::new(3);
        summary.record(ok(1, "a", 10));
        summary.record(ok(2, "b", 10));
        summary.record(failed(3, 10));
        // 66.67 rounds up, not down
        assert_eq!(summary.success_rate(), 67);

        let mut summary = RunSummary::new(3);
        summary.record(ok(1, "a", 10));
        summary.record(failed(2, 10));
        summary.record(failed(3, 10));
        assert_eq!(summary.success_rate(), 33);
    }

    #[test]
    fn test_success_rate_ties_go_to_even() {
        let mut summary = RunSummary::new(200);
        summary.record(ok(1, "a", 1));
        for i in 2..=200 {
            summary.record(failed(i, 1));
        }
        // 0.5% rounds to 0, not 1
        assert_eq!(summary.success_rate(), 0);

        let mut summary = RunSummary::new(8);
        for i in 1..=3 {
            summary.record(ok(i, "a", 1));
        }
        for i in 4..=8 {
            summary.record(failed(i, 1));
        }
        // 37.5% rounds to 38
        assert_eq!(summary.success_rate(), 38);
    }

    #[test]
    fn test_average_truncates_and_includes_everything() {
        let mut summary = RunSummary::new(3);
        for i in 1..=3 {
            summary.record(ok(i, "x", 5));
        }
        summary.finish(Duration::from_millis(1000));
        assert_eq!(summary.average_ms_per_job(), 333);
    }

    #[test]
    fn test_finish_orders_by_index() {
        let mut summary = RunSummary::new(3);
        summary.record(ok(3, "c", 1));
        summary.record(ok(1, "a", 1));
        summary.record(failed(2, 1));
        summary.finish(Duration::from_millis(10));
        assert_eq!(summary.job_ids(), vec!["a", "c"]);
        assert!(summary.is_complete());
        assert_eq!(summary.success_count() + summary.failed_count(), summary.total_jobs);
    }

    #[test]
    fn test_latency_stats() {
        let mut summary = RunSummary::new(3);
        assert_eq!(summary.latency_stats(), None);
        summary.record(ok(1, "a", 10));
        summary.record(ok(2, "b", 20));
        summary.record(failed(3, 60));
        assert_eq!(
            summary.latency_stats(),
            Some(LatencyStats { min_ms: 10, mean_ms: 30, max_ms: 60 })
        );
    }

    #[test]
    fn test_render_all_succeeded() {
        let mut summary = RunSummary::new(3);
        summary.record(ok(1, "abc", 40));
        summary.record(ok(2, "def", 40));
        summary.record(ok(3, "ghi", 40));
        summary.finish(Duration::from_millis(1234));

        let text = summary.render(&config());
        assert!(text.contains("Total Jobs: 3\n"));
        assert!(text.contains("Successful: 3\n"));
        assert!(text.contains("Failed: 0\n"));
        assert!(text.contains("Success Rate: 100%\n"));
        assert!(text.contains("Total Time: 1.23s\n"));
        assert!(text.contains("Average Time per Job: 411ms\n"));
        assert!(text.contains("🎉 All 3 jobs submitted successfully!"));
        assert!(text.ends_with(
            "🔍 Check job status with:\n   curl http://localhost:3000/api/jobs/abc\n📊 Monitor with Grafana dashboard\n"
        ));
        assert!(!text.contains("Jobs per Second"));
    }

    #[test]
    fn test_render_with_no_successes_has_no_curl() {
        let mut summary = RunSummary::new(2);
        summary.record(failed(1, 5));
        summary.record(failed(2, 5));
        summary.finish(Duration::from_millis(300));

        let text = summary.render(&config());
        assert!(text.contains("Success Rate: 0%"));
        assert!(text.contains("⚠️  Some jobs failed. Check the service logs."));
        assert!(text.contains("🔍 Check job status with:\n📊 Monitor with Grafana dashboard\n"));
        assert!(!text.contains("curl"));
    }

    #[test]
    fn test_render_throughput_for_worker_pool() {
        let mut config = config();
        config.concurrency = 4;
        let mut summary = RunSummary::new(2);
        summary.record(ok(1, "a", 5));
        summary.record(ok(2, "b", 5));
        summary.finish(Duration::from_millis(500));

        let text = summary.render(&config);
        assert!(text.contains("Jobs per Second: 4.0\n"));
    }
}
