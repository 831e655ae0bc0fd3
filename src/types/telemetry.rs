//! Core telemetry types: Scenario, TelemetryWindow, StatusCode, ClassificationResult

use serde::{Deserialize, Serialize};

// ============================================================================
// Scenario
// ============================================================================

/// Labeled synthetic operating condition driving both signal synthesis
/// and classification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    /// Healthy circuit - clean 50 Hz waveform
    #[default]
    Normal,
    /// Intermittent early-stage series arc (high-frequency bursts)
    EarlyArc,
    /// Sustained arc with broadband noise
    SevereArc,
    /// Motor inrush transient - non-fault interference
    MotorStart,
}

impl Scenario {
    /// Get display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            Scenario::Normal => "Normal Operation",
            Scenario::EarlyArc => "Early-Stage Arc",
            Scenario::SevereArc => "Severe Arc",
            Scenario::MotorStart => "Motor Start",
        }
    }

    /// Get the scenario tag used as `fault_type` in classification results
    pub fn tag(&self) -> &'static str {
        match self {
            Scenario::Normal => "normal",
            Scenario::EarlyArc => "early_arc",
            Scenario::SevereArc => "severe_arc",
            Scenario::MotorStart => "motor_start",
        }
    }

    /// Parse from string (for CLI/config)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "normal" | "healthy" => Some(Scenario::Normal),
            "early_arc" | "early" | "earlyarc" => Some(Scenario::EarlyArc),
            "severe_arc" | "severe" | "severearc" => Some(Scenario::SevereArc),
            "motor_start" | "motor" | "motorstart" => Some(Scenario::MotorStart),
            _ => None,
        }
    }
}

impl std::fmt::Display for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

// ============================================================================
// Telemetry window
// ============================================================================

/// One window of current samples over a single 50 Hz period.
///
/// Produced fresh per classification call by the signal source and owned
/// solely by the caller; never mutated after synthesis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryWindow {
    /// Time axis in milliseconds
    pub time_ms: Vec<f64>,
    /// Current samples in amperes
    pub samples: Vec<f64>,
    /// Scenario that produced this window
    pub scenario: Scenario,
}

impl TelemetryWindow {
    /// Number of samples in the window
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if the window is empty
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Peak absolute amplitude over the window (0.0 for an empty window)
    pub fn peak_amplitude(&self) -> f64 {
        self.samples.iter().fold(0.0_f64, |acc, s| acc.max(s.abs()))
    }
}

// ============================================================================
// Classification
// ============================================================================

/// Ordinal health status: NORMAL < INTERFERENCE < WARNING_L1 < WARNING_L2
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Default, Hash,
)]
pub enum StatusCode {
    /// Circuit healthy
    #[default]
    Normal,
    /// Non-fault disturbance (e.g. motor inrush) - no action required
    Interference,
    /// Level-1 warning: predicted early-stage arc risk
    WarningL1,
    /// Level-2 warning: fault confirmed
    WarningL2,
}

impl StatusCode {
    /// Canonical wire/config name
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusCode::Normal => "NORMAL",
            StatusCode::Interference => "INTERFERENCE",
            StatusCode::WarningL1 => "WARNING_L1",
            StatusCode::WarningL2 => "WARNING_L2",
        }
    }

    /// Operator-facing label shown next to the waveform
    pub fn display_name(&self) -> &'static str {
        match self {
            StatusCode::Normal => "Operating Normally (Safe)",
            StatusCode::Interference => "Interference (Non-Fault)",
            StatusCode::WarningL1 => "Level-1 Warning (Predicted Risk)",
            StatusCode::WarningL2 => "Level-2 Warning (Fault Confirmed)",
        }
    }

    /// Dashboard color for the (external) presentation layer
    pub fn severity_color(&self) -> &'static str {
        match self {
            StatusCode::Normal | StatusCode::Interference => "green",
            StatusCode::WarningL1 => "orange",
            StatusCode::WarningL2 => "red",
        }
    }

    /// True for the fault-confirmed level-2 warning
    pub fn is_level_two(&self) -> bool {
        matches!(self, StatusCode::WarningL2)
    }

    /// Parse from a severity string as echoed through tool arguments.
    ///
    /// Accepts the canonical names plus a few looser aliases the model
    /// tends to produce.
    pub fn parse_severity(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "NORMAL" => Some(StatusCode::Normal),
            "INTERFERENCE" => Some(StatusCode::Interference),
            "WARNING_L1" | "L1" | "LEVEL_1" | "WARNING-L1" => Some(StatusCode::WarningL1),
            "WARNING_L2" | "L2" | "LEVEL_2" | "WARNING-L2" => Some(StatusCode::WarningL2),
            _ => None,
        }
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Output of the classification stage.
///
/// Always corresponds to exactly one TelemetryWindow/Scenario pair evaluated
/// at the same logical instant; never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassificationResult {
    /// Discrete health status
    pub status: StatusCode,
    /// Confidence in percent, 0.0-100.0
    pub confidence: f64,
    /// Scenario tag for non-normal results, `"normal"` otherwise
    pub fault_type: String,
}

impl ClassificationResult {
    /// Compact status block rendered into the grounded prompt
    pub fn status_block(&self) -> String {
        format!(
            "STATUS: {} | CONFIDENCE: {:.1}% | FAULT_TYPE: {}",
            self.status, self.confidence, self.fault_type
        )
    }
}

impl std::fmt::Display for ClassificationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({:.1}%, {})",
            self.status.display_name(),
            self.confidence,
            self.fault_type
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_ordering() {
        assert!(StatusCode::Normal < StatusCode::Interference);
        assert!(StatusCode::Interference < StatusCode::WarningL1);
        assert!(StatusCode::WarningL1 < StatusCode::WarningL2);
    }

    #[test]
    fn test_parse_severity_aliases() {
        assert_eq!(
            StatusCode::parse_severity("WARNING_L2"),
            Some(StatusCode::WarningL2)
        );
        assert_eq!(
            StatusCode::parse_severity("warning_l1"),
            Some(StatusCode::WarningL1)
        );
        assert_eq!(StatusCode::parse_severity("L2"), Some(StatusCode::WarningL2));
        assert_eq!(StatusCode::parse_severity("bogus"), None);
    }

    #[test]
    fn test_severity_color() {
        assert_eq!(StatusCode::Normal.severity_color(), "green");
        assert_eq!(StatusCode::WarningL1.severity_color(), "orange");
        assert_eq!(StatusCode::WarningL2.severity_color(), "red");
    }

    #[test]
    fn test_peak_amplitude() {
        let window = TelemetryWindow {
            time_ms: vec![0.0, 1.0, 2.0],
            samples: vec![1.0, -14.5, 3.0],
            scenario: Scenario::Normal,
        };
        assert!((window.peak_amplitude() - 14.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_scenario_roundtrip() {
        for s in [
            Scenario::Normal,
            Scenario::EarlyArc,
            Scenario::SevereArc,
            Scenario::MotorStart,
        ] {
            assert_eq!(Scenario::from_str(s.tag()), Some(s));
        }
    }
}
