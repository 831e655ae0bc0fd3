//! Rule-based health classification of telemetry windows
//!
//! Two policies, unified behind one result type:
//!
//! - **Scenario-aware** (primary): uses the window's scenario tag to produce
//!   a richer verdict, including the `INTERFERENCE` category the amplitude
//!   policy cannot express.
//! - **Amplitude-threshold** (fallback): scenario-agnostic thresholds on the
//!   peak absolute sample, used when no scenario tag is available.
//!
//! Classification is a pure, total function. It never fails and holds no
//! state; every result corresponds to exactly one window evaluated at one
//! logical instant.

use crate::types::{ClassificationResult, Scenario, StatusCode, TelemetryWindow};
use statrs::statistics::Statistics;

/// Peak-amplitude threshold for a confirmed fault (level-2 warning), amperes
pub const AMPLITUDE_L2_THRESHOLD: f64 = 14.0;

/// Peak-amplitude threshold for a predicted risk (level-1 warning), amperes
pub const AMPLITUDE_L1_THRESHOLD: f64 = 12.0;

/// Std-dev threshold (mean-centered window) for flagging an early arc
pub const EARLY_ARC_STD_THRESHOLD: f64 = 0.4;

/// Classify a window using its scenario tag (primary policy).
pub fn classify(window: &TelemetryWindow) -> ClassificationResult {
    let result = match window.scenario {
        Scenario::SevereArc => ClassificationResult {
            status: StatusCode::WarningL2,
            confidence: 97.5,
            fault_type: Scenario::SevereArc.tag().to_string(),
        },
        Scenario::EarlyArc => {
            let spread = centered_std_dev(&window.samples);
            if spread > EARLY_ARC_STD_THRESHOLD {
                ClassificationResult {
                    status: StatusCode::WarningL1,
                    confidence: 85.0,
                    fault_type: Scenario::EarlyArc.tag().to_string(),
                }
            } else {
                ClassificationResult {
                    status: StatusCode::Normal,
                    confidence: 5.0,
                    fault_type: "normal".to_string(),
                }
            }
        }
        Scenario::MotorStart => ClassificationResult {
            status: StatusCode::Interference,
            confidence: 10.0,
            fault_type: Scenario::MotorStart.tag().to_string(),
        },
        Scenario::Normal => ClassificationResult {
            status: StatusCode::Normal,
            confidence: 2.0,
            fault_type: "normal".to_string(),
        },
    };

    tracing::debug!(
        scenario = %window.scenario,
        status = %result.status,
        confidence = result.confidence,
        "Classified telemetry window"
    );

    result
}

/// Classify raw samples by peak amplitude (fallback when no scenario tag
/// is available).
pub fn classify_amplitude(samples: &[f64]) -> ClassificationResult {
    let peak = samples.iter().fold(0.0_f64, |acc, s| acc.max(s.abs()));

    let (status, confidence) = if peak > AMPLITUDE_L2_THRESHOLD {
        (StatusCode::WarningL2, 97.5)
    } else if peak > AMPLITUDE_L1_THRESHOLD {
        (StatusCode::WarningL1, 75.0)
    } else {
        (StatusCode::Normal, 5.0)
    };

    let fault_type = if status == StatusCode::Normal {
        "normal".to_string()
    } else {
        "amplitude_exceedance".to_string()
    };

    ClassificationResult {
        status,
        confidence,
        fault_type,
    }
}

/// Standard deviation of the mean-centered samples.
///
/// Centering does not change the spread; it is kept explicit to match the
/// documented classifier contract. Returns 0.0 for windows with fewer than
/// two samples.
fn centered_std_dev(samples: &[f64]) -> f64 {
    if samples.len() < 2 {
        return 0.0;
    }
    let mean = samples.iter().mean();
    samples.iter().map(|s| s - mean).std_dev()
}
