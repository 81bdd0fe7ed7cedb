//! Mock analysis services for health overlay tests.
//!
//! [`ScriptedAnalyzer`] answers by keyword and records what it was asked,
//! so tests can check request order and concurrency.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use weldlab_health::{AnalysisError, HealthAnalyzer, HealthReport};

type Response = Result<HealthReport, AnalysisError>;

// ---------------------------------------------------------------------------
// ScriptedAnalyzer
// ---------------------------------------------------------------------------

/// Canned responses picked by the first keyword found in the telemetry.
///
/// Records every request and the highest number of requests it saw in
/// flight at once.
pub struct ScriptedAnalyzer {
    rules: Vec<(String, Response, Duration)>,
    default: Response,
    latency: Duration,
    calls: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedAnalyzer {
    /// Scripted analyzer whose unmatched requests fail.
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            default: Err(AnalysisError::Unavailable("no scripted response".into())),
            latency: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// Respond with `response` when the telemetry contains `keyword`.
    #[must_use]
    pub fn on(mut self, keyword: impl Into<String>, response: Response) -> Self {
        let latency = self.latency;
        self.rules.push((keyword.into(), response, latency));
        self
    }

    /// Like [`ScriptedAnalyzer::on`] with its own latency.
    #[must_use]
    pub fn on_after(
        mut self,
        keyword: impl Into<String>,
        response: Response,
        latency: Duration,
    ) -> Self {
        self.rules.push((keyword.into(), response, latency));
        self
    }

    /// Response for telemetry no rule matches.
    #[must_use]
    pub fn otherwise(mut self, response: Response) -> Self {
        self.default = response;
        self
    }

    /// Latency applied to unmatched requests and rules added afterwards.
    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Every telemetry string received, in arrival order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Highest number of overlapping requests seen.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn respond(&self, telemetry: &str) -> (Response, Duration) {
        self.rules
            .iter()
            .find(|(keyword, _, _)| telemetry.contains(keyword.as_str()))
            .map_or_else(
                || (self.default.clone(), self.latency),
                |(_, response, latency)| (response.clone(), *latency),
            )
    }
}

impl Default for ScriptedAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HealthAnalyzer for ScriptedAnalyzer {
    async fn analyze_health(&self, telemetry: &str) -> Result<HealthReport, AnalysisError> {
        self.calls.lock().push(telemetry.to_string());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let (response, latency) = self.respond(telemetry);
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        response
    }

    async fn diagnose(&self, prompt: &str) -> Result<String, AnalysisError> {
        self.respond(prompt).0.map(|r| r.brief_analysis)
    }

    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "scripted"
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
