//! Diagnostic tool registry
//!
//! A fixed set of deterministic local tools the dialogue orchestrator can
//! dispatch to between model calls. Tools are registered once at startup and
//! the registry is read-only afterwards. Lookup fails closed: an unknown
//! name yields `ToolError::NotFound` and never invokes anything.
//!
//! The reference tools synthesize their confirmations, but the trait is
//! shaped so a real implementation (one that actually persists a report or
//! files an order) can sit behind the same signature.

mod diagnostics;

pub use diagnostics::{
    DiagnosticReport, MaintenanceOrder, MaintenanceOrderTool, ReportTool, StabilitySnapshot,
    StabilityTool,
};

use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Error type for tool dispatch
#[derive(Debug, Error)]
pub enum ToolError {
    /// The requested tool name is not registered
    #[error("tool not found: {0}")]
    NotFound(String),
    /// A required argument is missing or has the wrong type
    #[error("invalid arguments for {tool}: {detail}")]
    InvalidArguments { tool: String, detail: String },
}

/// A deterministic local diagnostic tool.
///
/// Implementations must be idempotent and side-effect-free for a given input
/// and must never mutate shared state; the orchestrator calls them
/// synchronously between the two model passes.
pub trait DiagnosticTool: Send + Sync {
    /// Tool name advertised to the model gateway
    fn name(&self) -> &'static str;

    /// One-line description advertised to the model gateway
    fn description(&self) -> &'static str;

    /// JSON-schema object describing the tool's parameters
    fn arg_schema(&self) -> Value;

    /// Invoke the tool with a JSON object of arguments
    fn call(&self, args: &Value) -> Result<Value, ToolError>;
}

/// Specification of one tool as advertised to the model gateway
#[derive(Debug, Clone, serde::Serialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub arg_schema: Value,
}

/// Immutable registry of diagnostic tools, built once at process start.
pub struct ToolRegistry {
    tools: HashMap<&'static str, Arc<dyn DiagnosticTool>>,
}

impl ToolRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Create the standard registry with the three diagnostic tools
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(ReportTool);
        registry.register(StabilityTool);
        registry.register(MaintenanceOrderTool);

        tracing::info!(tool_count = registry.len(), "Built diagnostic tool registry");
        registry
    }

    /// Register a tool (startup only; the registry is read-only afterwards)
    pub fn register<T: DiagnosticTool + 'static>(&mut self, tool: T) {
        self.tools.insert(tool.name(), Arc::new(tool));
    }

    /// Check if a tool exists
    pub fn has(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Tool specifications to advertise on the first model call
    pub fn specs(&self) -> Vec<ToolSpec> {
        let mut specs: Vec<ToolSpec> = self
            .tools
            .values()
            .map(|t| ToolSpec {
                name: t.name().to_string(),
                description: t.description().to_string(),
                arg_schema: t.arg_schema(),
            })
            .collect();
        // Stable advertisement order across runs
        specs.sort_by(|a, b| a.name.cmp(&b.name));
        specs
    }

    /// Dispatch a tool call by name.
    ///
    /// Fails closed: an unrecognized name returns `ToolError::NotFound`
    /// without invoking anything. Never panics for well-formed JSON input.
    pub fn dispatch(&self, name: &str, args: &Value) -> Result<Value, ToolError> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;

        tracing::debug!(tool = name, "Dispatching diagnostic tool");
        tool.call(args)
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

/// Extract a required string argument from a JSON object.
///
/// Shared by the tool implementations; tolerates a missing object by
/// reporting the argument as missing.
pub(crate) fn required_str(args: &Value, tool: &str, key: &str) -> Result<String, ToolError> {
    args.get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ToolError::InvalidArguments {
            tool: tool.to_string(),
            detail: format!("missing or non-string argument '{key}'"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_standard_registry_contents() {
        let registry = ToolRegistry::standard();
        assert_eq!(registry.len(), 3);
        assert!(registry.has("generate_diagnostic_report"));
        assert!(registry.has("check_system_stability"));
        assert!(registry.has("generate_maintenance_order"));
    }

    #[test]
    fn test_lookup_fails_closed() {
        let registry = ToolRegistry::standard();
        for name in ["", "reboot_ship", "generate_report", "CHECK_SYSTEM_STABILITY"] {
            match registry.dispatch(name, &json!({})) {
                Err(ToolError::NotFound(n)) => assert_eq!(n, name),
                other => panic!("expected NotFound for {name:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_specs_are_sorted_and_complete() {
        let registry = ToolRegistry::standard();
        let specs = registry.specs();
        let names: Vec<&str> = specs.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "check_system_stability",
                "generate_diagnostic_report",
                "generate_maintenance_order"
            ]
        );
        for spec in &specs {
            assert!(!spec.description.is_empty());
            assert!(spec.arg_schema.is_object());
        }
    }

    #[test]
    fn test_required_str_errors() {
        let err = required_str(&json!({"a": 1}), "t", "a").unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { .. }));
        let err = required_str(&json!(null), "t", "a").unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { .. }));
        assert_eq!(required_str(&json!({"a": "x"}), "t", "a").unwrap(), "x");
    }
}
