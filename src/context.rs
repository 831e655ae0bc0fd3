//! Grounded prompt assembly
//!
//! Builds the payload for the first model call: static domain facts, the
//! current classification rendered as a compact status block, the bounded
//! conversation window, and the raw user query. The system instruction is
//! produced separately, parameterized by the current status fields.
//!
//! The grounding facts are data (a swappable `FactSheet` value injected at
//! construction), not inline prompt literals.

use crate::types::{ClassificationResult, ConversationTurn};
use serde::{Deserialize, Serialize};

/// System instruction template. `{status}`, `{confidence}` and `{fault_type}`
/// are substituted from the current classification.
const SYSTEM_INSTRUCTION_TEMPLATE: &str = "You are the shipboard electrical-safety \
diagnostic assistant. The arc-fault monitor currently reports status {status} with \
{confidence}% confidence (fault type: {fault_type}). Answer crew questions about fault \
diagnosis, maintenance regulations, and system health. Ground every answer in the \
monitor status and the vessel fact sheet. Use the provided tools when the crew asks \
for a report, a maintenance order, or a system stability check. Never invent report \
or order identifiers - only cite identifiers returned by a tool.";

/// Static domain knowledge injected into the grounded prompt.
///
/// Swappable per vessel or fleet; the default sheet carries the reference
/// vessel's diagnostic and regulatory facts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactSheet {
    /// Short label for logs and prompt headers
    pub title: String,
    /// One fact per entry, rendered as a bulleted block
    pub facts: Vec<String>,
}

impl FactSheet {
    /// Reference fact sheet for the demonstration vessel
    pub fn reference() -> Self {
        Self {
            title: "Vessel electrical diagnostics fact sheet".to_string(),
            facts: vec![
                "Early-stage (level-1) series arc faults show intermittent irregular \
                 high-frequency oscillation; the Informer-based trend model treats a \
                 worsening oscillation as the onset signature."
                    .to_string(),
                "Historical fleet data attributes most series-arc events in high-vibration \
                 zones to aged, loosened cable fixtures that raise joint impedance and \
                 cause intermittent discharge."
                    .to_string(),
                "Classification-society rule XX-2023 clause 5.4.1 requires quarterly \
                 preventive inspection of electrical connection points in high-vibration \
                 zones."
                    .to_string(),
                "The shipboard edge computing unit nominally runs at about 38% load with \
                 model inference latency within 15 ms; the ship-to-shore link latency \
                 stays below 50 ms."
                    .to_string(),
                "On a confirmed (level-2) fault the crew isolates the circuit first, then \
                 requests a diagnostic report and a corrective maintenance order."
                    .to_string(),
            ],
        }
    }

    fn rendered(&self) -> String {
        let mut block = String::new();
        for fact in &self.facts {
            block.push_str("- ");
            block.push_str(fact);
            block.push('\n');
        }
        block
    }
}

/// Fully assembled grounding payload for one orchestrator invocation.
///
/// Built fresh per call and never persisted.
#[derive(Debug, Clone)]
pub struct GroundedContext {
    pub prompt: String,
    pub system_instruction: String,
}

/// Assembles grounded prompts from an injected fact sheet.
pub struct ContextAssembler {
    fact_sheet: FactSheet,
}

impl ContextAssembler {
    pub fn new(fact_sheet: FactSheet) -> Self {
        Self { fact_sheet }
    }

    /// Build the prompt payload and system instruction for one query.
    ///
    /// `history_window` is the already-bounded recent view from the
    /// conversation store, oldest first.
    pub fn assemble(
        &self,
        status: &ClassificationResult,
        history_window: &[ConversationTurn],
        user_query: &str,
    ) -> GroundedContext {
        let mut prompt = String::new();

        prompt.push_str("### ");
        prompt.push_str(&self.fact_sheet.title);
        prompt.push('\n');
        prompt.push_str(&self.fact_sheet.rendered());

        prompt.push_str("\n### CURRENT MONITOR STATUS\n");
        prompt.push_str(&status.status_block());
        prompt.push('\n');

        if !history_window.is_empty() {
            prompt.push_str("\n### RECENT CONVERSATION\n");
            for turn in history_window {
                prompt.push_str(turn.role.as_str());
                prompt.push_str(": ");
                prompt.push_str(&turn.text);
                prompt.push('\n');
            }
        }

        prompt.push_str("\n### CREW QUERY\n");
        prompt.push_str(user_query);

        let system_instruction = SYSTEM_INSTRUCTION_TEMPLATE
            .replace("{status}", status.status.as_str())
            .replace("{confidence}", &format!("{:.1}", status.confidence))
            .replace("{fault_type}", &status.fault_type);

        tracing::trace!(
            prompt_chars = prompt.len(),
            history_turns = history_window.len(),
            status = %status.status,
            "Assembled grounded context"
        );

        GroundedContext {
            prompt,
            system_instruction,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StatusCode;

    fn status_l1() -> ClassificationResult {
        ClassificationResult {
            status: StatusCode::WarningL1,
            confidence: 85.0,
            fault_type: "early_arc".to_string(),
        }
    }

    #[test]
    fn test_prompt_contains_all_sections() {
        let assembler = ContextAssembler::new(FactSheet::reference());
        let history = vec![
            ConversationTurn::user("is the waveform normal?"),
            ConversationTurn::assistant("it shows early oscillation"),
        ];
        let ctx = assembler.assemble(&status_l1(), &history, "what should we do next?");

        assert!(ctx.prompt.contains("fact sheet"));
        assert!(ctx.prompt.contains("CURRENT MONITOR STATUS"));
        assert!(ctx.prompt.contains("WARNING_L1"));
        assert!(ctx.prompt.contains("85.0"));
        assert!(ctx.prompt.contains("RECENT CONVERSATION"));
        assert!(ctx.prompt.contains("user: is the waveform normal?"));
        assert!(ctx.prompt.contains("assistant: it shows early oscillation"));
        assert!(ctx.prompt.contains("CREW QUERY\nwhat should we do next?"));
    }

    #[test]
    fn test_system_instruction_parameterized_by_status() {
        let assembler = ContextAssembler::new(FactSheet::reference());
        let ctx = assembler.assemble(&status_l1(), &[], "hello");
        assert!(ctx.system_instruction.contains("WARNING_L1"));
        assert!(ctx.system_instruction.contains("85.0"));
        assert!(ctx.system_instruction.contains("early_arc"));
        assert!(!ctx.system_instruction.contains("{status}"));
    }

    #[test]
    fn test_empty_history_omits_conversation_section() {
        let assembler = ContextAssembler::new(FactSheet::reference());
        let ctx = assembler.assemble(&status_l1(), &[], "q");
        assert!(!ctx.prompt.contains("RECENT CONVERSATION"));
    }

    #[test]
    fn test_custom_fact_sheet_is_data_not_literals() {
        let sheet = FactSheet {
            title: "Test sheet".to_string(),
            facts: vec!["fact alpha".to_string(), "fact beta".to_string()],
        };
        let assembler = ContextAssembler::new(sheet);
        let ctx = assembler.assemble(&status_l1(), &[], "q");
        assert!(ctx.prompt.contains("- fact alpha"));
        assert!(ctx.prompt.contains("- fact beta"));
        assert!(!ctx.prompt.contains("XX-2023"));
    }
}
