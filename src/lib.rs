//! ArcWatch: marine arc-fault telemetry monitoring and diagnostic intelligence
//!
//! Pairs a rule-based classification stage over synthetic circuit telemetry
//! with a tool-augmented diagnostic assistant.
//!
//! ## Architecture
//!
//! - **SignalSource / Classifier**: synthesize one 50 Hz telemetry window per
//!   scenario and map it to a discrete health status with confidence
//! - **MonitorService**: tick/poll sampling driven by an external scheduler
//! - **DialogueOrchestrator**: grounds a model conversation in the current
//!   status plus a vessel fact sheet, dispatches local diagnostic tools, and
//!   merges tool output into the final answer
//! - **ConversationStore**: append-only transcript with a bounded grounding
//!   window

pub mod classifier;
pub mod config;
pub mod context;
pub mod conversation;
pub mod gateway;
pub mod monitor;
pub mod orchestrator;
pub mod signal;
pub mod tools;
pub mod types;

// Re-export commonly used types
pub use types::{
    ClassificationResult, ConversationTurn, Role, Scenario, StatusCode, TelemetryWindow,
};

pub use classifier::{classify, classify_amplitude};
pub use config::{ArcWatchConfig, ConfigError};
pub use context::{ContextAssembler, FactSheet, GroundedContext};
pub use conversation::{ConversationStore, DialogueSession, DEFAULT_RETENTION_WINDOW};
pub use gateway::{
    GatewayError, GatewayReply, HttpGateway, HttpGatewayConfig, ModelGateway, ToolCallRecord,
    ToolCallRequest,
};
pub use monitor::{MonitorService, MonitorSnapshot};
pub use orchestrator::{DialogueOrchestrator, OrchestratorStats};
pub use signal::SignalSource;
pub use tools::{DiagnosticTool, ToolError, ToolRegistry, ToolSpec};
