//! Model Gateway
//!
//! The single external collaborator of the dialogue orchestrator: a language
//! model endpoint that either answers in text or requests one or more tool
//! calls. The trait is async and injected at construction with an explicit
//! lifecycle (created once at startup, passed by reference), never a
//! lazily-memoized global.

mod http;

pub use http::{HttpGateway, HttpGatewayConfig};

use crate::tools::ToolSpec;
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Error type for gateway calls.
///
/// Every variant is recovered at the orchestrator boundary into a
/// user-facing answer; none of these are fatal to the process.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("gateway network error: {0}")]
    Network(String),
    #[error("gateway request timed out after {0}s")]
    Timeout(u64),
    #[error("gateway API error: {0}")]
    Api(String),
    #[error("gateway returned a malformed response: {0}")]
    MalformedResponse(String),
    #[error("gateway configuration error: {0}")]
    Configuration(String),
}

/// One tool call requested by the model
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCallRequest {
    pub name: String,
    pub args: Value,
}

/// Reply from the first model call: either a finished text answer or a
/// batch of tool-call requests in the order the model produced them.
#[derive(Debug, Clone)]
pub enum GatewayReply {
    Text(String),
    ToolCalls(Vec<ToolCallRequest>),
}

/// Record of one dispatched tool call, handed back to the model on the
/// second pass. `outcome` is either the tool's payload or the sentinel
/// produced for an unfulfillable call.
#[derive(Debug, Clone)]
pub struct ToolCallRecord {
    pub name: String,
    pub args: Value,
    pub outcome: Value,
}

/// Language-model endpoint consumed by the orchestrator.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// First pass: prompt + system instruction + advertised tools.
    async fn generate(
        &self,
        prompt: &str,
        system_instruction: &str,
        tools: &[ToolSpec],
    ) -> Result<GatewayReply, GatewayError>;

    /// Second pass: the original prompt plus the tool-call record, asking
    /// for a final natural-language answer explaining the tool outcome.
    async fn generate_with_tool_result(
        &self,
        prompt: &str,
        system_instruction: &str,
        record: &ToolCallRecord,
    ) -> Result<String, GatewayError>;

    /// Gateway name for logging
    fn gateway_name(&self) -> &'static str;
}
