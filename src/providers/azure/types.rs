//! Wire types for the Azure AI model inference chat completions route.
//!
//! The endpoint family speaks the OpenAI-compatible chat completions
//! format, both for single responses and for SSE stream updates.

use serde::{Deserialize, Serialize};

fn default_tool_type() -> String {
    "function".to_string()
}

/// Chat completion response body
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AzureChatCompletion {
    pub id: Option<String>,
    pub model: Option<String>,
    pub created: Option<u64>,
    pub choices: Vec<AzureChatChoice>,
    pub usage: Option<AzureUsage>,
}

/// A single choice in a chat completion response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AzureChatChoice {
    pub index: Option<u32>,
    pub message: AzureResponseMessage,
    pub finish_reason: Option<String>,
}

/// Assistant message within a response choice
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AzureResponseMessage {
    pub role: Option<String>,
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Option<Vec<AzureToolCall>>,
}

/// Tool call entry in a response or stream update
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AzureToolCall {
    pub id: String,
    #[serde(rename = "type", default = "default_tool_type")]
    pub call_type: String,
    pub function: Option<AzureFunctionCall>,
}

/// Function payload of a tool call
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AzureFunctionCall {
    pub name: String,
    pub arguments: String,
}

/// Usage block, shared between responses and stream updates
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AzureUsage {
    pub prompt_tokens: Option<u32>,
    pub completion_tokens: Option<u32>,
    pub total_tokens: Option<u32>,
}

/// SSE stream update
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AzureStreamEvent {
    pub id: Option<String>,
    pub model: Option<String>,
    pub created: Option<u64>,
    #[serde(default)]
    pub choices: Option<Vec<AzureStreamChoice>>,
    pub usage: Option<AzureUsage>,
}

/// A single choice in a stream update
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AzureStreamChoice {
    pub index: Option<u32>,
    pub delta: Option<AzureStreamDelta>,
    pub finish_reason: Option<String>,
}

/// Incremental message fragment in a stream update
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AzureStreamDelta {
    pub role: Option<String>,
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Option<Vec<AzureStreamToolCall>>,
}

/// Partial tool call in a stream update.
///
/// Only the first fragment of a call carries the id and function name;
/// later fragments append to `arguments` and are matched back by id (or
/// slot index when the service omits the id on continuations).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AzureStreamToolCall {
    pub index: Option<u32>,
    pub id: Option<String>,
    pub function: Option<AzureStreamFunctionCall>,
}

/// Partial function payload in a stream update
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AzureStreamFunctionCall {
    pub name: Option<String>,
    pub arguments: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_deserialization() {
        let json = serde_json::json!({
            "id": "chatcmpl-123",
            "created": 1700000000,
            "model": "model",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": "Hello" },
                "finish_reason": "stop"
            }],
            "usage": { "prompt_tokens": 9, "completion_tokens": 12, "total_tokens": 21 }
        });

        let response: AzureChatCompletion = serde_json::from_value(json).unwrap();
        assert_eq!(response.choices.len(), 1);
        assert_eq!(
            response.choices[0].message.content.as_deref(),
            Some("Hello")
        );
        assert_eq!(response.choices[0].finish_reason.as_deref(), Some("stop"));
        assert_eq!(response.usage.unwrap().total_tokens, Some(21));
    }

    #[test]
    fn test_tool_call_type_defaults_to_function() {
        let json = serde_json::json!({
            "id": "tool_call_id",
            "function": { "name": "some_function", "arguments": "{\"foo\": \"bar\"}" }
        });

        let call: AzureToolCall = serde_json::from_value(json).unwrap();
        assert_eq!(call.call_type, "function");
        assert_eq!(call.function.unwrap().name, "some_function");
    }

    #[test]
    fn test_stream_event_with_partial_tool_call() {
        let json = serde_json::json!({
            "id": "id",
            "choices": [{
                "index": 0,
                "delta": {
                    "tool_calls": [{
                        "index": 0,
                        "function": { "arguments": " \"bar\"}" }
                    }]
                },
                "finish_reason": null
            }]
        });

        let event: AzureStreamEvent = serde_json::from_value(json).unwrap();
        let choices = event.choices.unwrap();
        let calls = choices[0].delta.as_ref().unwrap().tool_calls.as_ref().unwrap();
        assert!(calls[0].id.is_none());
        assert_eq!(
            calls[0].function.as_ref().unwrap().arguments.as_deref(),
            Some(" \"bar\"}")
        );
    }
}
