use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// Score shown when analysis failed.
pub const FALLBACK_SCORE: u8 = 50;
pub const FALLBACK_ANALYSIS: &str = "Analysis engine offline.";
pub const FALLBACK_CALIBRATION: &str = "Immediate";

// ---------------------------------------------------------------------------
// HealthState
// ---------------------------------------------------------------------------

/// Condition class reported for a component.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum HealthState {
    Nominal,
    Throttling,
    Degraded,
    Failed,
    #[default]
    Unknown,
}

impl HealthState {
    /// Parse a service label, ignoring case and surrounding whitespace.
    /// Anything unrecognised is [`HealthState::Unknown`].
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        [Self::Nominal, Self::Throttling, Self::Degraded, Self::Failed]
            .into_iter()
            .find(|s| s.label().eq_ignore_ascii_case(label))
            .unwrap_or(Self::Unknown)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Nominal => "Nominal",
            Self::Throttling => "Throttling",
            Self::Degraded => "Degraded",
            Self::Failed => "Failed",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for HealthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl<'de> Deserialize<'de> for HealthState {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(Self::from_label(&label))
    }
}

// ---------------------------------------------------------------------------
// HealthReport
// ---------------------------------------------------------------------------

/// Analysis result for one component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    /// `0..=100`.
    pub health_score: u8,
    pub state: HealthState,
    pub brief_analysis: String,
    pub next_calibration: String,
}

/// Wire shape; scores may arrive as any JSON number.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReport {
    #[serde(alias = "health_score")]
    health_score: f64,
    #[serde(default)]
    state: HealthState,
    #[serde(alias = "brief_analysis", default)]
    brief_analysis: String,
    #[serde(alias = "next_calibration", default)]
    next_calibration: String,
}

impl HealthReport {
    pub fn new(
        health_score: u8,
        state: HealthState,
        brief_analysis: impl Into<String>,
        next_calibration: impl Into<String>,
    ) -> Self {
        Self {
            health_score: health_score.min(100),
            state,
            brief_analysis: brief_analysis.into(),
            next_calibration: next_calibration.into(),
        }
    }

    /// The record displayed when analysis fails.
    pub fn fallback() -> Self {
        Self::new(
            FALLBACK_SCORE,
            HealthState::Unknown,
            FALLBACK_ANALYSIS,
            FALLBACK_CALIBRATION,
        )
    }

    /// Parse a service payload.
    ///
    /// Accepts camelCase or snake_case keys. The score is rounded and
    /// clamped into `0..=100`; an unknown state label becomes
    /// [`HealthState::Unknown`]. A missing score is an error.
    pub fn from_json(payload: &str) -> Result<Self, AnalysisError> {
        let raw: RawReport = serde_json::from_str(payload)?;
        Ok(Self {
            health_score: clamp_score(raw.health_score),
            state: raw.state,
            brief_analysis: raw.brief_analysis,
            next_calibration: raw.next_calibration,
        })
    }

    pub fn is_fallback(&self) -> bool {
        *self == Self::fallback()
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp_score(score: f64) -> u8 {
    if score.is_nan() {
        return 0;
    }
    score.round().clamp(0.0, 100.0) as u8
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_record() {
        let r = HealthReport::fallback();
        assert_eq!(r.health_score, 50);
        assert_eq!(r.state, HealthState::Unknown);
        assert_eq!(r.brief_analysis, "Analysis engine offline.");
        assert_eq!(r.next_calibration, "Immediate");
        assert!(r.is_fallback());
    }

    #[test]
    fn parses_service_payload() {
        let r = HealthReport::from_json(
            r#"{"healthScore": 87, "state": "Nominal",
                "briefAnalysis": "Bearings within tolerance.",
                "nextCalibration": "In 30 days"}"#,
        )
        .unwrap();
        assert_eq!(r.health_score, 87);
        assert_eq!(r.state, HealthState::Nominal);
        assert_eq!(r.brief_analysis, "Bearings within tolerance.");
        assert_eq!(r.next_calibration, "In 30 days");
    }

    #[test]
    fn accepts_snake_case_keys() {
        let r = HealthReport::from_json(r#"{"health_score": 12, "state": "failed"}"#).unwrap();
        assert_eq!(r.health_score, 12);
        assert_eq!(r.state, HealthState::Failed);
        assert!(r.brief_analysis.is_empty());
    }

    #[test]
    fn clamps_and_rounds_score() {
        let hi = HealthReport::from_json(r#"{"healthScore": 250}"#).unwrap();
        let lo = HealthReport::from_json(r#"{"healthScore": -3}"#).unwrap();
        let mid = HealthReport::from_json(r#"{"healthScore": 71.6}"#).unwrap();
        assert_eq!(hi.health_score, 100);
        assert_eq!(lo.health_score, 0);
        assert_eq!(mid.health_score, 72);
    }

    #[test]
    fn unknown_state_label_maps_to_unknown() {
        let r = HealthReport::from_json(r#"{"healthScore": 40, "state": "Overheating"}"#).unwrap();
        assert_eq!(r.state, HealthState::Unknown);
    }

    #[test]
    fn missing_score_is_malformed() {
        let err = HealthReport::from_json(r#"{"state": "Nominal"}"#).unwrap_err();
        assert!(matches!(err, AnalysisError::Malformed(_)));
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_string(&HealthReport::fallback()).unwrap();
        assert!(json.contains("\"healthScore\":50"));
        assert!(json.contains("\"state\":\"Unknown\""));
    }

    #[test]
    fn state_labels_case_insensitive() {
        assert_eq!(HealthState::from_label(" THROTTLING "), HealthState::Throttling);
        assert_eq!(HealthState::from_label("degraded"), HealthState::Degraded);
        assert_eq!(HealthState::from_label(""), HealthState::Unknown);
    }
}
