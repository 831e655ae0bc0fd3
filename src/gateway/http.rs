//! HTTP model gateway speaking the Anthropic messages API
//!
//! Uses native `tool_use` content blocks for tool calling. The request
//! carries an explicit timeout; a timeout surfaces as `GatewayError::Timeout`
//! and takes the same recovered path as any other gateway failure.

use super::{GatewayError, GatewayReply, ModelGateway, ToolCallRecord, ToolCallRequest};
use crate::tools::ToolSpec;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::{Duration, Instant};

/// Configuration for the HTTP gateway
#[derive(Debug, Clone)]
pub struct HttpGatewayConfig {
    /// API key; startup fails fast when missing
    pub api_key: String,
    /// API endpoint base, e.g. `https://api.anthropic.com`
    pub endpoint: String,
    /// Model identifier
    pub model: String,
    /// Maximum tokens per completion
    pub max_tokens: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for HttpGatewayConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: "https://api.anthropic.com".to_string(),
            model: "claude-3-5-haiku-20241022".to_string(),
            max_tokens: 1024,
            timeout_secs: 30,
        }
    }
}

/// Anthropic-messages HTTP implementation of `ModelGateway`
#[derive(Debug)]
pub struct HttpGateway {
    config: HttpGatewayConfig,
    client: Client,
}

impl HttpGateway {
    /// Create the gateway, validating configuration up front.
    ///
    /// A missing API key is a startup error, not something to discover on
    /// the first query.
    pub fn new(config: HttpGatewayConfig) -> Result<Self, GatewayError> {
        if config.api_key.is_empty() {
            return Err(GatewayError::Configuration(
                "API key not set (ARCWATCH_API_KEY)".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        Ok(Self { config, client })
    }

    async fn post_messages(&self, request: &MessagesRequest) -> Result<MessagesResponse, GatewayError> {
        let started = Instant::now();

        let response = self
            .client
            .post(format!("{}/v1/messages", self.config.endpoint))
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::Timeout(self.config.timeout_secs)
                } else {
                    GatewayError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(GatewayError::Api(format!("HTTP {status}: {error_text}")));
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::MalformedResponse(e.to_string()))?;

        tracing::debug!(
            model = %self.config.model,
            latency_ms = started.elapsed().as_millis() as u64,
            stop_reason = ?parsed.stop_reason,
            "Gateway call complete"
        );

        Ok(parsed)
    }

    fn convert_tools(tools: &[ToolSpec]) -> Vec<WireTool> {
        tools
            .iter()
            .map(|t| WireTool {
                name: t.name.clone(),
                description: t.description.clone(),
                input_schema: t.arg_schema.clone(),
            })
            .collect()
    }
}

#[async_trait]
impl ModelGateway for HttpGateway {
    async fn generate(
        &self,
        prompt: &str,
        system_instruction: &str,
        tools: &[ToolSpec],
    ) -> Result<GatewayReply, GatewayError> {
        let wire_tools = Self::convert_tools(tools);
        let request = MessagesRequest {
            model: self.config.model.clone(),
            max_tokens: self.config.max_tokens,
            system: Some(system_instruction.to_string()),
            messages: vec![WireMessage {
                role: "user".to_string(),
                content: json!(prompt),
            }],
            tools: if wire_tools.is_empty() {
                None
            } else {
                Some(wire_tools)
            },
        };

        let response = self.post_messages(&request).await?;

        let mut text = String::new();
        let mut tool_calls = Vec::new();
        for block in response.content {
            match block {
                ContentBlock::Text { text: t } => text.push_str(&t),
                ContentBlock::ToolUse { name, input, .. } => {
                    tool_calls.push(ToolCallRequest { name, args: input });
                }
            }
        }

        if tool_calls.is_empty() {
            Ok(GatewayReply::Text(text))
        } else {
            Ok(GatewayReply::ToolCalls(tool_calls))
        }
    }

    async fn generate_with_tool_result(
        &self,
        prompt: &str,
        system_instruction: &str,
        record: &ToolCallRecord,
    ) -> Result<String, GatewayError> {
        // Replay the exchange: original prompt, the model's tool_use turn,
        // then the tool result, and ask for the final answer.
        let call_id = format!("call-{}", record.name);
        let request = MessagesRequest {
            model: self.config.model.clone(),
            max_tokens: self.config.max_tokens,
            system: Some(system_instruction.to_string()),
            messages: vec![
                WireMessage {
                    role: "user".to_string(),
                    content: json!(prompt),
                },
                WireMessage {
                    role: "assistant".to_string(),
                    content: json!([{
                        "type": "tool_use",
                        "id": call_id,
                        "name": record.name,
                        "input": record.args,
                    }]),
                },
                WireMessage {
                    role: "user".to_string(),
                    content: json!([{
                        "type": "tool_result",
                        "tool_use_id": call_id,
                        "content": record.outcome.to_string(),
                    }]),
                },
            ],
            tools: None,
        };

        let response = self.post_messages(&request).await?;

        let mut text = String::new();
        for block in response.content {
            if let ContentBlock::Text { text: t } = block {
                text.push_str(&t);
            }
        }

        if text.is_empty() {
            return Err(GatewayError::MalformedResponse(
                "second pass returned no text content".to_string(),
            ));
        }

        Ok(text)
    }

    fn gateway_name(&self) -> &'static str {
        "anthropic-messages"
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<WireTool>>,
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: String,
    content: Value,
}

#[derive(Debug, Serialize)]
struct WireTool {
    name: String,
    description: String,
    input_schema: Value,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    #[serde(default)]
    stop_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text {
        text: String,
    },
    ToolUse {
        #[allow(dead_code)]
        id: String,
        name: String,
        input: Value,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_api_key_fails_fast() {
        let err = HttpGateway::new(HttpGatewayConfig::default()).unwrap_err();
        assert!(matches!(err, GatewayError::Configuration(_)));
    }

    #[test]
    fn test_request_serialization_skips_empty_tools() {
        let request = MessagesRequest {
            model: "m".to_string(),
            max_tokens: 64,
            system: Some("sys".to_string()),
            messages: vec![WireMessage {
                role: "user".to_string(),
                content: json!("hello"),
            }],
            tools: None,
        };
        let wire = serde_json::to_string(&request).unwrap();
        assert!(wire.contains("\"system\":\"sys\""));
        assert!(!wire.contains("tools"));
    }

    #[test]
    fn test_text_response_parsing() {
        let wire = r#"{
            "content": [{"type": "text", "text": "All clear."}],
            "stop_reason": "end_turn"
        }"#;
        let response: MessagesResponse = serde_json::from_str(wire).unwrap();
        assert_eq!(response.content.len(), 1);
        assert!(matches!(&response.content[0], ContentBlock::Text { text } if text == "All clear."));
    }

    #[test]
    fn test_tool_use_response_parsing() {
        let wire = r#"{
            "content": [
                {"type": "text", "text": "Checking."},
                {"type": "tool_use", "id": "t1", "name": "check_system_stability", "input": {}}
            ],
            "stop_reason": "tool_use"
        }"#;
        let response: MessagesResponse = serde_json::from_str(wire).unwrap();
        assert_eq!(response.content.len(), 2);
        assert!(matches!(
            &response.content[1],
            ContentBlock::ToolUse { name, .. } if name == "check_system_stability"
        ));
    }

    #[test]
    fn test_tool_spec_conversion() {
        let specs = crate::tools::ToolRegistry::standard().specs();
        let wire = HttpGateway::convert_tools(&specs);
        assert_eq!(wire.len(), 3);
        assert!(wire.iter().all(|t| t.input_schema.is_object()));
    }
}
