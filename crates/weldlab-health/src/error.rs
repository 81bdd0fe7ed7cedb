use thiserror::Error;

/// Failure of a call to the analysis service.
///
/// Never reaches the simulation: the overlay turns every variant into the
/// fallback record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("analysis service unavailable: {0}")]
    Unavailable(String),

    #[error("malformed analysis response: {0}")]
    Malformed(String),

    #[error("analysis request rejected: {0}")]
    Rejected(String),
}

impl From<serde_json::Error> for AnalysisError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed(err.to_string())
    }
}
