//! Shared data structures for the arc-fault telemetry and diagnostics pipeline
//!
//! - Telemetry: TelemetryWindow, Scenario, StatusCode, ClassificationResult
//! - Conversation: Role, ConversationTurn

mod conversation;
mod telemetry;

pub use conversation::*;
pub use telemetry::*;
