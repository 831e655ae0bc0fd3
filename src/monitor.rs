//! Monitor tick service
//!
//! One `sample` call synthesizes a fresh telemetry window for the active
//! scenario and classifies it in the same unit of work, so the result never
//! reflects a stale window from a previous scenario. The caller (an external
//! scheduler task, or a chat turn wanting the status at this instant) drives
//! the cadence; there is no refresh loop inside the core.

use crate::classifier;
use crate::signal::SignalSource;
use crate::types::{ClassificationResult, Scenario, TelemetryWindow};

/// Window plus the classification evaluated from it at the same instant.
#[derive(Debug, Clone)]
pub struct MonitorSnapshot {
    pub window: TelemetryWindow,
    pub result: ClassificationResult,
}

/// Telemetry sampler with an owned signal source.
pub struct MonitorService {
    source: SignalSource,
    /// Samples per synthesized window
    window_length: usize,
}

impl MonitorService {
    pub fn new(window_length: usize) -> Self {
        Self {
            source: SignalSource::new(),
            window_length,
        }
    }

    /// Deterministic service for reproducible tests
    pub fn with_seed(window_length: usize, seed: u64) -> Self {
        Self {
            source: SignalSource::with_seed(seed),
            window_length,
        }
    }

    /// One tick: synthesize and classify a fresh window.
    pub fn sample(&mut self, scenario: Scenario, prediction_mode: bool) -> MonitorSnapshot {
        let window = self
            .source
            .generate(self.window_length, scenario, prediction_mode);
        let result = classifier::classify(&window);

        tracing::debug!(
            scenario = %scenario,
            status = %result.status,
            confidence = result.confidence,
            peak = window.peak_amplitude(),
            "Monitor tick"
        );

        MonitorSnapshot { window, result }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StatusCode;

    #[test]
    fn test_sample_pairs_window_and_result() {
        let mut monitor = MonitorService::with_seed(2000, 1);
        let snap = monitor.sample(Scenario::SevereArc, false);
        assert_eq!(snap.window.scenario, Scenario::SevereArc);
        assert_eq!(snap.window.len(), 2000);
        assert_eq!(snap.result.status, StatusCode::WarningL2);
        // The result corresponds to this exact window
        assert_eq!(snap.result, crate::classifier::classify(&snap.window));
    }

    #[test]
    fn test_scenario_switch_never_reuses_stale_window() {
        let mut monitor = MonitorService::with_seed(2000, 1);
        let severe = monitor.sample(Scenario::SevereArc, false);
        let normal = monitor.sample(Scenario::Normal, false);
        assert_eq!(severe.result.status, StatusCode::WarningL2);
        assert_eq!(normal.result.status, StatusCode::Normal);
        assert_eq!(normal.window.scenario, Scenario::Normal);
    }

    #[test]
    fn test_motor_start_reports_interference() {
        let mut monitor = MonitorService::with_seed(2000, 4);
        let snap = monitor.sample(Scenario::MotorStart, false);
        assert_eq!(snap.result.status, StatusCode::Interference);
        assert_eq!(snap.result.fault_type, "motor_start");
    }
}
