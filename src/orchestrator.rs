//! Dialogue orchestrator - model-call / tool-dispatch / result-integration
//!
//! Drives one query through the state machine:
//!
//! ```text
//! BUILDING_CONTEXT -> MODEL_CALL_1 -> { NO_TOOL -> DONE }
//!                                   | { TOOL_DISPATCH -> MODEL_CALL_2 -> DONE }
//! ```
//!
//! DONE always yields exactly one final answer string. Gateway failures at
//! either call are recovered into a user-facing error answer and never
//! retried or propagated; an unknown tool name is recovered into a sentinel
//! outcome and the pass continues.
//!
//! Multi-tool turns: every requested call is processed in gateway order, but
//! only the last processed call's record grounds the second model call.
//!
//! Side effect: exactly one (user, assistant) turn pair is appended to the
//! session per invocation, user first, on every terminal path including the
//! error answer.

use crate::context::ContextAssembler;
use crate::conversation::DialogueSession;
use crate::gateway::{GatewayError, GatewayReply, ModelGateway, ToolCallRecord};
use crate::tools::ToolRegistry;
use crate::types::{ClassificationResult, ConversationTurn};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Statistics tracked across orchestrator invocations
#[derive(Debug, Default, Clone, Copy)]
pub struct OrchestratorStats {
    pub queries_handled: u64,
    pub tool_dispatches: u64,
    pub unknown_tool_requests: u64,
    pub gateway_failures: u64,
}

/// Tool-augmented dialogue orchestrator.
///
/// The gateway handle is injected at construction with an explicit
/// lifecycle; all conversation state lives in the `DialogueSession` value
/// passed into each call.
pub struct DialogueOrchestrator {
    assembler: ContextAssembler,
    registry: Arc<ToolRegistry>,
    gateway: Arc<dyn ModelGateway>,
    /// Retention bound applied to the grounding history window
    retention_window: usize,
    stats: OrchestratorStats,
}

impl DialogueOrchestrator {
    pub fn new(
        assembler: ContextAssembler,
        registry: Arc<ToolRegistry>,
        gateway: Arc<dyn ModelGateway>,
        retention_window: usize,
    ) -> Self {
        Self {
            assembler,
            registry,
            gateway,
            retention_window,
            stats: OrchestratorStats::default(),
        }
    }

    /// Handle one crew query to completion.
    ///
    /// `status` is the classification evaluated at this logical instant;
    /// the caller samples the monitor and queries within the same unit of
    /// work so the grounding never reflects a stale scenario.
    pub async fn handle_query(
        &mut self,
        session: &mut DialogueSession,
        status: &ClassificationResult,
        user_text: &str,
    ) -> String {
        self.stats.queries_handled += 1;

        // BUILDING_CONTEXT
        let history = session.store.recent_window(self.retention_window).to_vec();
        let ctx = self.assembler.assemble(status, &history, user_text);
        debug!(
            gateway = self.gateway.gateway_name(),
            history_turns = history.len(),
            "Context assembled, entering first model call"
        );

        // MODEL_CALL_1
        let answer = match self
            .gateway
            .generate(&ctx.prompt, &ctx.system_instruction, &self.registry.specs())
            .await
        {
            Ok(GatewayReply::Text(text)) => {
                debug!("Model answered directly, no tool dispatch");
                text
            }
            Ok(GatewayReply::ToolCalls(calls)) => {
                self.run_tool_pass(&ctx.prompt, &ctx.system_instruction, calls)
                    .await
            }
            Err(e) => self.recover_gateway_failure("first model call", &e),
        };

        // DONE: exactly one turn pair per invocation, user first
        session.store.append(ConversationTurn::user(user_text));
        session.store.append(ConversationTurn::assistant(answer.clone()));

        info!(
            turns = session.store.len(),
            answer_chars = answer.len(),
            "Query handled"
        );
        answer
    }

    /// TOOL_DISPATCH then MODEL_CALL_2.
    ///
    /// Processes every requested call in order; the last record grounds the
    /// second model call.
    async fn run_tool_pass(
        &mut self,
        prompt: &str,
        system_instruction: &str,
        calls: Vec<crate::gateway::ToolCallRequest>,
    ) -> String {
        let mut last_record: Option<ToolCallRecord> = None;

        for call in calls {
            let outcome = match self.registry.dispatch(&call.name, &call.args) {
                Ok(payload) => {
                    self.stats.tool_dispatches += 1;
                    payload
                }
                Err(e) => {
                    // Fail closed but keep going: the model asked for
                    // something we cannot fulfill
                    self.stats.unknown_tool_requests += 1;
                    warn!(tool = %call.name, error = %e, "Tool call could not be fulfilled");
                    json!({
                        "error": "could not fulfill tool call",
                        "tool": call.name,
                        "detail": e.to_string(),
                    })
                }
            };

            last_record = Some(ToolCallRecord {
                name: call.name,
                args: call.args,
                outcome,
            });
        }

        let Some(record) = last_record else {
            // A tool-call reply with zero calls; treat as an empty answer
            // rather than a crash
            warn!("Gateway returned an empty tool-call batch");
            return String::new();
        };

        debug!(tool = %record.name, "Grounding second model call on tool record");

        match self
            .gateway
            .generate_with_tool_result(prompt, system_instruction, &record)
            .await
        {
            Ok(text) => text,
            Err(e) => self.recover_gateway_failure("second model call", &e),
        }
    }

    /// Map a gateway failure to the fixed-shape user-facing error answer.
    fn recover_gateway_failure(&mut self, phase: &str, error: &GatewayError) -> String {
        self.stats.gateway_failures += 1;
        warn!(phase = phase, error = %error, "Gateway failure recovered into error answer");
        format!(
            "Sorry, the diagnostic assistant could not complete this request \
             ({error}). The monitor itself is unaffected; please ask again in a moment."
        )
    }

    /// Snapshot of orchestrator statistics
    pub fn stats(&self) -> OrchestratorStats {
        self.stats
    }
}

// ============================================================================
// Tests
// ============================================================================
