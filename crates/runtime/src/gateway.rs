//! Chat-completion gateway.
//!
//! [`Gateway`] is the seam between the orchestrator and the remote model.
//! Transport failures never cross it as errors: they come back as an
//! assistant turn whose text describes the failure, so the conversation
//! stays usable. The one condition the orchestrator must distinguish — a
//! response with no choices — is reported as `None`.

use crate::conversation::{AssistantTurn, ToolCallRequest, Turn};
use crate::registry::ToolSpec;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::future::Future;
use std::time::Duration;

const DEFAULT_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const DEFAULT_MODEL: &str = "llama3-8b-8192";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Trait for chat-completion providers.
///
/// `None` means the provider answered without any choices; everything else,
/// including degraded failure text, is `Some`.
pub trait Gateway: Send + Sync {
    fn complete(
        &self,
        turns: &[Turn],
        tools: &[ToolSpec],
    ) -> impl Future<Output = Option<AssistantTurn>> + Send;
}

// ─────────────────────────────────────────────────────────────────────────────
// API Wire Types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    messages: Vec<ApiMessage>,
    tools: Vec<ApiTool<'a>>,
    tool_choice: &'static str,
}

#[derive(Debug, Serialize)]
struct ApiMessage {
    role: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tool_calls: Vec<ApiToolCall>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

impl ApiMessage {
    fn text(role: &'static str, content: String) -> Self {
        Self {
            role,
            content: Some(content),
            tool_calls: Vec::new(),
            tool_call_id: None,
            name: None,
        }
    }
}

#[derive(Debug, Serialize)]
struct ApiToolCall {
    id: String,
    #[serde(rename = "type")]
    call_type: &'static str,
    function: ApiFunctionCall,
}

#[derive(Debug, Serialize)]
struct ApiFunctionCall {
    name: String,
    /// JSON-encoded argument object, per the chat-completions schema.
    arguments: String,
}

#[derive(Debug, Serialize)]
struct ApiTool<'a> {
    #[serde(rename = "type")]
    tool_type: &'static str,
    function: ApiFunction<'a>,
}

#[derive(Debug, Serialize)]
struct ApiFunction<'a> {
    name: &'a str,
    description: &'a str,
    parameters: &'a Value,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    choices: Vec<ApiChoice>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ApiResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Vec<ApiResponseToolCall>,
}

#[derive(Debug, Deserialize)]
struct ApiResponseToolCall {
    #[serde(default = "unknown_call_id")]
    id: String,
    function: ApiResponseFunction,
}

#[derive(Debug, Deserialize)]
struct ApiResponseFunction {
    name: String,
    #[serde(default)]
    arguments: String,
}

fn unknown_call_id() -> String {
    "unknown".to_string()
}

fn to_api_messages(turns: &[Turn]) -> Vec<ApiMessage> {
    turns
        .iter()
        .map(|turn| match turn {
            Turn::System { content } => ApiMessage::text("system", content.clone()),
            Turn::User { content } => ApiMessage::text("user", content.clone()),
            Turn::Assistant {
                content,
                tool_calls,
            } => ApiMessage {
                role: "assistant",
                // The schema wants null content on pure tool-call replies.
                content: if content.is_empty() && !tool_calls.is_empty() {
                    None
                } else {
                    Some(content.clone())
                },
                tool_calls: tool_calls
                    .iter()
                    .map(|call| ApiToolCall {
                        id: call.id.clone(),
                        call_type: "function",
                        function: ApiFunctionCall {
                            name: call.name.clone(),
                            arguments: serde_json::to_string(&call.arguments)
                                .unwrap_or_else(|_| "{}".to_string()),
                        },
                    })
                    .collect(),
                tool_call_id: None,
                name: None,
            },
            Turn::Tool {
                tool_call_id,
                name,
                content,
            } => ApiMessage {
                role: "tool",
                content: Some(content.clone()),
                tool_calls: Vec::new(),
                tool_call_id: Some(tool_call_id.clone()),
                name: Some(name.clone()),
            },
        })
        .collect()
}

fn to_assistant_turn(message: ApiResponseMessage) -> AssistantTurn {
    AssistantTurn {
        content: message.content.unwrap_or_default(),
        tool_calls: message
            .tool_calls
            .into_iter()
            .map(|call| ToolCallRequest {
                id: call.id,
                name: call.function.name,
                // Arguments arrive JSON-encoded; an unparsable payload is
                // kept verbatim so dispatch can report it.
                arguments: serde_json::from_str(&call.function.arguments)
                    .unwrap_or(Value::String(call.function.arguments)),
            })
            .collect(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// OpenAI-compatible implementation
// ─────────────────────────────────────────────────────────────────────────────

/// Gateway speaking the OpenAI chat-completions schema (Groq by default).
pub struct OpenAiGateway {
    http: reqwest::Client,
    api_url: String,
    model: String,
    api_key: Option<String>,
}

impl OpenAiGateway {
    /// Create a gateway against the default Groq endpoint and model.
    ///
    /// A missing key is not an error here: requests degrade to a
    /// "Missing API key." assistant turn instead of failing at startup.
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key,
        }
    }

    /// Override the endpoint URL.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Override the model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    async fn call(&self, turns: &[Turn], tools: &[ToolSpec]) -> Result<ApiResponse, String> {
        let Some(api_key) = &self.api_key else {
            return Err("Missing API key.".to_string());
        };

        let request = ApiRequest {
            model: &self.model,
            messages: to_api_messages(turns),
            tools: tools
                .iter()
                .map(|spec| ApiTool {
                    tool_type: "function",
                    function: ApiFunction {
                        name: &spec.name,
                        description: &spec.description,
                        parameters: &spec.parameters,
                    },
                })
                .collect(),
            tool_choice: "auto",
        };

        let response = self
            .http
            .post(&self.api_url)
            .timeout(REQUEST_TIMEOUT)
            .header("Authorization", format!("Bearer {api_key}"))
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| format!("LLM call failed: {e}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(format!("LLM call failed: {status}: {body}"));
        }

        response
            .json()
            .await
            .map_err(|e| format!("LLM call failed: {e}"))
    }
}

impl std::fmt::Display for OpenAiGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never includes the credential.
        write!(f, "openai({}, {})", self.api_url, self.model)
    }
}

impl Gateway for OpenAiGateway {
    async fn complete(&self, turns: &[Turn], tools: &[ToolSpec]) -> Option<AssistantTurn> {
        match self.call(turns, tools).await {
            Ok(response) => {
                let choice = response.choices.into_iter().next()?;
                Some(to_assistant_turn(choice.message))
            }
            Err(degraded) => Some(AssistantTurn::text(degraded)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wire_messages_carry_roles_and_tool_fields() {
        let turns = vec![
            Turn::System {
                content: "sys".into(),
            },
            Turn::User {
                content: "find thai food".into(),
            },
            Turn::Assistant {
                content: String::new(),
                tool_calls: vec![ToolCallRequest {
                    id: "call_1".into(),
                    name: "search_restaurants".into(),
                    arguments: json!({"cuisine": "Thai"}),
                }],
            },
            Turn::Tool {
                tool_call_id: "call_1".into(),
                name: "search_restaurants".into(),
                content: "[]".into(),
            },
        ];

        let wire = serde_json::to_value(to_api_messages(&turns)).unwrap();
        assert_eq!(wire[0]["role"], "system");
        assert_eq!(wire[1]["content"], "find thai food");
        // Pure tool-call assistant message has no content field.
        assert!(wire[2].get("content").is_none());
        assert_eq!(wire[2]["tool_calls"][0]["id"], "call_1");
        assert_eq!(wire[2]["tool_calls"][0]["type"], "function");
        assert_eq!(
            wire[2]["tool_calls"][0]["function"]["arguments"],
            "{\"cuisine\":\"Thai\"}"
        );
        assert_eq!(wire[3]["role"], "tool");
        assert_eq!(wire[3]["tool_call_id"], "call_1");
        assert_eq!(wire[3]["name"], "search_restaurants");
    }

    #[test]
    fn response_tool_call_arguments_are_parsed() {
        let message: ApiResponseMessage = serde_json::from_value(json!({
            "content": null,
            "tool_calls": [{
                "id": "call_7",
                "function": {
                    "name": "make_reservation",
                    "arguments": "{\"restaurant_id\": 2, \"num_guests\": 2}"
                }
            }]
        }))
        .unwrap();

        let turn = to_assistant_turn(message);
        assert_eq!(turn.content, "");
        assert_eq!(turn.tool_calls.len(), 1);
        assert_eq!(turn.tool_calls[0].id, "call_7");
        assert_eq!(turn.tool_calls[0].arguments["restaurant_id"], 2);
    }

    #[test]
    fn unparsable_arguments_survive_as_string() {
        let message: ApiResponseMessage = serde_json::from_value(json!({
            "tool_calls": [{
                "id": "call_1",
                "function": {"name": "search_restaurants", "arguments": "not json"}
            }]
        }))
        .unwrap();

        let turn = to_assistant_turn(message);
        assert_eq!(turn.tool_calls[0].arguments, json!("not json"));
    }

    #[test]
    fn empty_choice_list_deserializes() {
        let response: ApiResponse = serde_json::from_value(json!({})).unwrap();
        assert!(response.choices.is_empty());
    }

    #[tokio::test]
    async fn missing_api_key_degrades_to_text_turn() {
        let gateway = OpenAiGateway::new(None);
        let turn = gateway
            .complete(&[Turn::User { content: "hi".into() }], &[])
            .await
            .unwrap();
        assert_eq!(turn.content, "Missing API key.");
        assert!(turn.tool_calls.is_empty());
    }

    #[test]
    fn display_never_leaks_the_key() {
        let gateway = OpenAiGateway::new(Some("secret-key".into()));
        assert!(!gateway.to_string().contains("secret-key"));
    }
}
