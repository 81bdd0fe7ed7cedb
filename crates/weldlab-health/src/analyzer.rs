//! The analysis service boundary and the stock analyzers.
//!
//! - **HealthAnalyzer**: trait implemented by service adapters
//! - **OfflineAnalyzer**: always fails, so every slot shows the fallback
//! - **FixedAnalyzer**: one constant report

use async_trait::async_trait;
use tracing::warn;

use crate::error::AnalysisError;
use crate::report::HealthReport;

/// Shown when a diagnostic query fails.
pub const DIAGNOSE_APOLOGY: &str =
    "Sorry, the diagnostics assistant is unavailable right now. Please try again later.";

/// External analysis service.
#[async_trait]
pub trait HealthAnalyzer: Send + Sync {
    /// Score one component from its telemetry description.
    async fn analyze_health(&self, telemetry: &str) -> Result<HealthReport, AnalysisError>;

    /// Free-text diagnostic query.
    async fn diagnose(&self, prompt: &str) -> Result<String, AnalysisError>;

    /// Analyzer name for logging.
    fn name(&self) -> &str;
}

/// Analyze, absorbing any failure into [`HealthReport::fallback`].
pub async fn analyze_or_fallback(analyzer: &dyn HealthAnalyzer, telemetry: &str) -> HealthReport {
    match analyzer.analyze_health(telemetry).await {
        Ok(report) => report,
        Err(err) => {
            warn!(analyzer = analyzer.name(), %err, "health analysis failed, using fallback");
            HealthReport::fallback()
        }
    }
}

/// Diagnose, absorbing any failure into [`DIAGNOSE_APOLOGY`].
pub async fn diagnose_or_apology(analyzer: &dyn HealthAnalyzer, prompt: &str) -> String {
    match analyzer.diagnose(prompt).await {
        Ok(text) => text,
        Err(err) => {
            warn!(analyzer = analyzer.name(), %err, "diagnosis failed");
            DIAGNOSE_APOLOGY.to_string()
        }
    }
}

// ---------------------------------------------------------------------------
// OfflineAnalyzer
// ---------------------------------------------------------------------------

/// No service configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineAnalyzer;

#[async_trait]
impl HealthAnalyzer for OfflineAnalyzer {
    async fn analyze_health(&self, _telemetry: &str) -> Result<HealthReport, AnalysisError> {
        Err(AnalysisError::Unavailable("no analysis service configured".into()))
    }

    async fn diagnose(&self, _prompt: &str) -> Result<String, AnalysisError> {
        Err(AnalysisError::Unavailable("no analysis service configured".into()))
    }

    fn name(&self) -> &str {
        "offline"
    }
}

// ---------------------------------------------------------------------------
// FixedAnalyzer
// ---------------------------------------------------------------------------

/// Answers every request with the same report.
#[derive(Debug, Clone)]
pub struct FixedAnalyzer {
    report: HealthReport,
}

impl FixedAnalyzer {
    pub const fn new(report: HealthReport) -> Self {
        Self { report }
    }
}

#[async_trait]
impl HealthAnalyzer for FixedAnalyzer {
    async fn analyze_health(&self, _telemetry: &str) -> Result<HealthReport, AnalysisError> {
        Ok(self.report.clone())
    }

    async fn diagnose(&self, _prompt: &str) -> Result<String, AnalysisError> {
        Ok(self.report.brief_analysis.clone())
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
