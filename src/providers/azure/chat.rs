//! Request building and response mapping for chat completions.

use super::config::AzureAiConfig;
use super::thinking;
use super::types::{AzureChatCompletion, AzureUsage};
use crate::error::LlmError;
use crate::types::{
    ChatMessage, ChatResponse, ContentPart, FinishReason, FunctionCall, MessageContent,
    MessageRole, ModelFamily, Tool, ToolCall, Usage,
};

/// Build the JSON request body for the chat completions route.
pub(crate) fn build_request_body(
    config: &AzureAiConfig,
    messages: &[ChatMessage],
    tools: Option<&[Tool]>,
    stream: bool,
) -> Result<serde_json::Value, LlmError> {
    let wire_messages = messages
        .iter()
        .map(convert_message)
        .collect::<Result<Vec<_>, _>>()?;

    let mut body = serde_json::json!({
        "model": config.model,
        "messages": wire_messages,
        "stream": stream,
    });

    if let Some(tools) = tools {
        if !tools.is_empty() {
            body["tools"] = serde_json::Value::Array(
                tools.iter().map(convert_tool).collect::<Vec<_>>(),
            );
        }
    }

    let params = &config.common_params;
    if let Some(temperature) = params.temperature {
        body["temperature"] = serde_json::json!(temperature);
    }
    if let Some(max_tokens) = params.max_tokens {
        body["max_tokens"] = serde_json::json!(max_tokens);
    }
    if let Some(top_p) = params.top_p {
        body["top_p"] = serde_json::json!(top_p);
    }
    if let Some(stop) = &params.stop_sequences {
        body["stop"] = serde_json::json!(stop);
    }
    if let Some(seed) = params.seed {
        body["seed"] = serde_json::json!(seed);
    }

    Ok(body)
}

fn convert_message(message: &ChatMessage) -> Result<serde_json::Value, LlmError> {
    let role = match message.role {
        MessageRole::System => "system",
        MessageRole::User => "user",
        MessageRole::Assistant => "assistant",
        MessageRole::Tool => "tool",
    };

    let mut value = serde_json::json!({
        "role": role,
        "content": convert_message_content(&message.content),
    });

    if let Some(tool_calls) = &message.tool_calls {
        let wire_calls = tool_calls
            .iter()
            .map(|call| {
                serde_json::json!({
                    "id": call.id,
                    "type": call.r#type,
                    "function": call.function.as_ref().map(|f| {
                        serde_json::json!({ "name": f.name, "arguments": f.arguments })
                    }),
                })
            })
            .collect::<Vec<_>>();
        value["tool_calls"] = serde_json::Value::Array(wire_calls);
    }

    if let Some(tool_call_id) = &message.tool_call_id {
        value["tool_call_id"] = serde_json::json!(tool_call_id);
    }

    Ok(value)
}

fn convert_message_content(content: &MessageContent) -> serde_json::Value {
    match content {
        MessageContent::Text(text) => serde_json::Value::String(text.clone()),
        MessageContent::MultiModal(parts) => {
            let wire_parts = parts
                .iter()
                .map(|part| match part {
                    ContentPart::Text { text } => serde_json::json!({
                        "type": "text",
                        "text": text,
                    }),
                    ContentPart::Image { image_url, detail } => {
                        let mut image = serde_json::json!({
                            "type": "image_url",
                            "image_url": { "url": image_url },
                        });
                        if let Some(detail) = detail {
                            image["image_url"]["detail"] = serde_json::json!(detail);
                        }
                        image
                    }
                })
                .collect::<Vec<_>>();
            serde_json::Value::Array(wire_parts)
        }
    }
}

fn convert_tool(tool: &Tool) -> serde_json::Value {
    serde_json::json!({
        "type": tool.r#type,
        "function": {
            "name": tool.function.name,
            "description": tool.function.description,
            "parameters": tool.function.parameters,
        },
    })
}

/// Parse the wire finish reason into the normalized enum.
///
/// Some model hosts spell the tool-call reason `function_calls`; both
/// spellings normalize to `ToolCalls`.
pub(crate) fn parse_finish_reason(reason: Option<&str>) -> Option<FinishReason> {
    match reason {
        Some("stop") => Some(FinishReason::Stop),
        Some("length") => Some(FinishReason::Length),
        Some("tool_calls") | Some("function_calls") | Some("function_call") => {
            Some(FinishReason::ToolCalls)
        }
        Some("content_filter") => Some(FinishReason::ContentFilter),
        Some(other) => Some(FinishReason::Other(other.to_string())),
        None => None,
    }
}

pub(crate) fn map_usage(usage: &AzureUsage) -> Usage {
    Usage {
        prompt_tokens: usage.prompt_tokens.unwrap_or(0),
        completion_tokens: usage.completion_tokens.unwrap_or(0),
        total_tokens: usage.total_tokens.unwrap_or(0),
    }
}

/// Map a chat completion response into the normalized result.
pub(crate) fn parse_chat_response(
    response: AzureChatCompletion,
    family: &ModelFamily,
) -> Result<ChatResponse, LlmError> {
    let usage = response.usage.as_ref().map(map_usage);

    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::api_error(500, "No choices in response"))?;

    let text = choice.message.content.unwrap_or_default();
    let tool_calls: Vec<ToolCall> = choice
        .message
        .tool_calls
        .unwrap_or_default()
        .into_iter()
        .map(|call| ToolCall {
            id: call.id,
            r#type: call.call_type,
            function: call.function.map(|f| FunctionCall {
                name: f.name,
                arguments: f.arguments,
            }),
        })
        .collect();

    let (content, finish_reason, thinking) = if !tool_calls.is_empty() {
        // Free text alongside tool calls is surfaced as thinking.
        let thinking = (!text.is_empty()).then_some(text);
        (
            MessageContent::Text(String::new()),
            Some(FinishReason::ToolCalls),
            thinking,
        )
    } else if family.is_reasoning() && thinking::contains_thinking_tags(&text) {
        let thinking = thinking::extract_thinking_content(&text);
        let visible = thinking::filter_thinking_content(&text);
        (
            MessageContent::Text(visible),
            parse_finish_reason(choice.finish_reason.as_deref()),
            thinking,
        )
    } else {
        (
            MessageContent::Text(text),
            parse_finish_reason(choice.finish_reason.as_deref()),
            None,
        )
    };

    Ok(ChatResponse {
        id: response.id,
        content,
        model: response.model,
        usage,
        finish_reason,
        tool_calls: (!tool_calls.is_empty()).then_some(tool_calls),
        thinking,
    })
}
