//! The three shipboard diagnostic tools
//!
//! All three return synthesized confirmations - no real persistence or
//! dispatch happens here. Payload shapes are stable so downstream consumers
//! (the second model call, and eventually a real maintenance system) can
//! rely on them.

use super::{required_str, DiagnosticTool, ToolError};
use crate::types::StatusCode;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Fixed root-cause finding for arc faults on this vessel class.
///
/// Historical fleet data attributes most series-arc events in high-vibration
/// zones to aged, loosened cable fixtures raising joint impedance.
const ROOT_CAUSE: &str = "Aged and loosened cable fixtures in a high-vibration zone, \
     increasing joint impedance and producing intermittent discharge.";

/// Fixed maintenance advice, per classification-society rule XX-2023 §5.4.1:
/// electrical connection points in high-vibration zones require quarterly
/// preventive inspection.
const MAINTENANCE_ADVICE: &str = "Inspect load-side terminal temperatures on the affected \
     circuit, re-torque cable fixtures, and schedule the quarterly preventive check required \
     for high-vibration electrical connection points (rule XX-2023, clause 5.4.1).";

const ORDER_TOOLING: &str = "Insulated torque wrench set, IR thermometer, contact-resistance \
     meter, replacement cable cleats.";

const ORDER_SAFETY: &str = "Isolate and lock out the circuit before work; verify zero energy; \
     wear arc-rated PPE; second crew member on standby.";

/// True when a severity argument denotes the level-2 (fault confirmed) warning
fn severity_is_level_two(severity: &str) -> bool {
    StatusCode::parse_severity(severity).is_some_and(|s| s.is_level_two())
}

// ============================================================================
// generate_diagnostic_report
// ============================================================================

/// Structured diagnostic report payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiagnosticReport {
    pub report_id: String,
    pub generated_at: String,
    pub severity: String,
    pub fault_type: String,
    pub root_cause: String,
    pub maintenance_advice: String,
    /// `"high"` for level-2 severities, `"medium"` otherwise
    pub risk_level: String,
}

/// Generates a diagnostic report for a detected fault
pub struct ReportTool;

impl ReportTool {
    /// Build the report record; separated from `call` so a real persistence
    /// backend can reuse the same construction.
    pub fn build(fault_id: &str, severity: &str, fault_type: &str) -> DiagnosticReport {
        DiagnosticReport {
            report_id: format!("RPT-{fault_id}"),
            generated_at: Utc::now().to_rfc3339(),
            severity: severity.to_string(),
            fault_type: fault_type.to_string(),
            root_cause: ROOT_CAUSE.to_string(),
            maintenance_advice: MAINTENANCE_ADVICE.to_string(),
            risk_level: if severity_is_level_two(severity) {
                "high".to_string()
            } else {
                "medium".to_string()
            },
        }
    }
}

impl DiagnosticTool for ReportTool {
    fn name(&self) -> &'static str {
        "generate_diagnostic_report"
    }

    fn description(&self) -> &'static str {
        "Generate a structured diagnostic report for a detected electrical fault, \
         including root cause and maintenance advice"
    }

    fn arg_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "fault_id": {
                    "type": "string",
                    "description": "Identifier of the fault event being reported"
                },
                "severity": {
                    "type": "string",
                    "description": "Current warning level, e.g. WARNING_L1 or WARNING_L2"
                },
                "fault_type": {
                    "type": "string",
                    "description": "Fault category, e.g. early_arc or severe_arc"
                }
            },
            "required": ["fault_id", "severity", "fault_type"]
        })
    }

    fn call(&self, args: &Value) -> Result<Value, ToolError> {
        let fault_id = required_str(args, self.name(), "fault_id")?;
        let severity = required_str(args, self.name(), "severity")?;
        let fault_type = required_str(args, self.name(), "fault_type")?;

        let report = Self::build(&fault_id, &severity, &fault_type);
        tracing::info!(
            report_id = %report.report_id,
            risk_level = %report.risk_level,
            "Diagnostic report generated"
        );

        serde_json::to_value(report).map_err(|e| ToolError::InvalidArguments {
            tool: self.name().to_string(),
            detail: e.to_string(),
        })
    }
}

// ============================================================================
// check_system_stability
// ============================================================================

/// Fixed-shape snapshot of the shipboard edge unit's operational metrics.
///
/// Carries no timestamps or counters, so repeated calls are byte-identical.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StabilitySnapshot {
    /// Edge compute unit load in percent
    pub compute_load_percent: f64,
    /// Model inference latency in milliseconds
    pub inference_latency_ms: u32,
    /// Ship-to-shore link latency in milliseconds
    pub link_latency_ms: u32,
    pub overall_status: String,
}

impl StabilitySnapshot {
    /// The synthetic reference metrics: 38% load, 15 ms inference,
    /// sub-50 ms link, stable overall.
    pub fn current() -> Self {
        Self {
            compute_load_percent: 38.0,
            inference_latency_ms: 15,
            link_latency_ms: 48,
            overall_status: "stable".to_string(),
        }
    }
}

/// Reports edge-unit load and link health
pub struct StabilityTool;

impl DiagnosticTool for StabilityTool {
    fn name(&self) -> &'static str {
        "check_system_stability"
    }

    fn description(&self) -> &'static str {
        "Check the shipboard edge computing unit's load, inference latency, and \
         ship-to-shore link stability"
    }

    fn arg_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {},
            "required": []
        })
    }

    fn call(&self, _args: &Value) -> Result<Value, ToolError> {
        serde_json::to_value(StabilitySnapshot::current()).map_err(|e| {
            ToolError::InvalidArguments {
                tool: self.name().to_string(),
                detail: e.to_string(),
            }
        })
    }
}

// ============================================================================
// generate_maintenance_order
// ============================================================================

/// Structured maintenance work order payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MaintenanceOrder {
    pub order_id: String,
    pub circuit_id: String,
    pub fault_severity: String,
    pub maintenance_type: String,
    /// `"urgent"` for level-2 severities, `"high"` otherwise
    pub priority: String,
    pub required_tooling: String,
    pub safety_notes: String,
}

/// Generates a maintenance work order for the affected circuit
pub struct MaintenanceOrderTool;

impl MaintenanceOrderTool {
    /// Build the order record. The order id is derived from the current
    /// time, so this tool is the one registry member excluded from the
    /// byte-identical idempotence property.
    pub fn build(circuit_id: &str, fault_severity: &str, maintenance_type: &str) -> MaintenanceOrder {
        MaintenanceOrder {
            order_id: format!("MO-{}", Utc::now().timestamp()),
            circuit_id: circuit_id.to_string(),
            fault_severity: fault_severity.to_string(),
            maintenance_type: maintenance_type.to_string(),
            priority: if severity_is_level_two(fault_severity) {
                "urgent".to_string()
            } else {
                "high".to_string()
            },
            required_tooling: ORDER_TOOLING.to_string(),
            safety_notes: ORDER_SAFETY.to_string(),
        }
    }
}

impl DiagnosticTool for MaintenanceOrderTool {
    fn name(&self) -> &'static str {
        "generate_maintenance_order"
    }

    fn description(&self) -> &'static str {
        "Generate a maintenance work order for a circuit with a detected or \
         predicted arc fault"
    }

    fn arg_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "circuit_id": {
                    "type": "string",
                    "description": "Identifier of the affected circuit"
                },
                "fault_severity": {
                    "type": "string",
                    "description": "Current warning level, e.g. WARNING_L1 or WARNING_L2"
                },
                "maintenance_type": {
                    "type": "string",
                    "description": "Kind of maintenance requested, e.g. preventive or corrective"
                }
            },
            "required": ["circuit_id", "fault_severity", "maintenance_type"]
        })
    }

    fn call(&self, args: &Value) -> Result<Value, ToolError> {
        let circuit_id = required_str(args, self.name(), "circuit_id")?;
        let fault_severity = required_str(args, self.name(), "fault_severity")?;
        let maintenance_type = required_str(args, self.name(), "maintenance_type")?;

        let order = Self::build(&circuit_id, &fault_severity, &maintenance_type);
        tracing::info!(
            order_id = %order.order_id,
            circuit_id = %order.circuit_id,
            priority = %order.priority,
            "Maintenance order generated"
        );

        serde_json::to_value(order).map_err(|e| ToolError::InvalidArguments {
            tool: self.name().to_string(),
            detail: e.to_string(),
        })
    }
}
