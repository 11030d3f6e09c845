//! Streaming chat completions.
//!
//! Converts the SSE update stream into [`ChatStreamEvent`]s while merging
//! the deltas, so the terminal `StreamEnd` carries the full response: all
//! text fragments concatenated, tool-call argument fragments joined per
//! call id, the last finish reason and usage totals seen, and (for the R1
//! family) the accumulated `<think>` content.

use super::chat::{map_usage, parse_finish_reason};
use super::thinking::ThinkTagScanner;
use super::types::{AzureStreamEvent, AzureStreamToolCall};
use crate::error::LlmError;
use crate::stream::{ChatStream, ChatStreamEvent};
use crate::types::{
    ChatResponse, FinishReason, FunctionCall, MessageContent, ModelFamily, ResponseMetadata,
    ToolCall, Usage,
};
use crate::utils::streaming::{EventBuilder, SseEventConverter, StreamFactory};
use eventsource_stream::Event;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

/// Start a streaming chat completion request.
pub(crate) async fn create_chat_stream(
    request_builder: reqwest::RequestBuilder,
    converter: AzureEventConverter,
) -> Result<ChatStream, LlmError> {
    StreamFactory::create_eventsource_stream(request_builder, converter).await
}

/// Tool call under assembly from stream fragments
#[derive(Debug, Default)]
struct ToolCallBuilder {
    id: String,
    name: Option<String>,
    arguments: String,
}

/// Merge state accumulated while the stream is consumed
#[derive(Debug, Default)]
struct StreamState {
    started: bool,
    id: Option<String>,
    model: Option<String>,
    content: String,
    thinking: String,
    scanner: Option<ThinkTagScanner>,
    tool_calls: Vec<ToolCallBuilder>,
    finish_reason: Option<FinishReason>,
    usage: Option<Usage>,
}

/// Event converter for the Azure AI model inference SSE format
#[derive(Clone)]
pub(crate) struct AzureEventConverter {
    model: String,
    state: Arc<Mutex<StreamState>>,
}

impl AzureEventConverter {
    pub fn new(model: impl Into<String>, family: ModelFamily) -> Self {
        let state = StreamState {
            scanner: family.is_reasoning().then(ThinkTagScanner::new),
            ..Default::default()
        };
        Self {
            model: model.into(),
            state: Arc::new(Mutex::new(state)),
        }
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, StreamState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn convert(&self, event: AzureStreamEvent) -> Vec<Result<ChatStreamEvent, LlmError>> {
        let mut state = self.lock_state();
        let mut builder = EventBuilder::new();

        if !state.started {
            state.started = true;
            state.id = event.id.clone();
            state.model = event.model.clone().or_else(|| Some(self.model.clone()));
            builder = builder.add_stream_start(ResponseMetadata {
                id: event.id.clone(),
                model: state.model.clone(),
                created: event.created.and_then(|ts| {
                    chrono::DateTime::from_timestamp(ts as i64, 0)
                }),
                provider: "azure".to_string(),
            });
        }

        if let Some(choice) = event.choices.as_ref().and_then(|choices| choices.first()) {
            let index = choice.index.unwrap_or(0) as usize;

            if let Some(delta) = &choice.delta {
                if let Some(content) = &delta.content {
                    // Scanner is only present for the R1 family; everyone
                    // else streams content through untouched.
                    let taken_scanner = state.scanner.take();
                    match taken_scanner {
                        Some(mut scanner) => {
                            let scanned = scanner.push(content);
                            state.scanner = Some(scanner);
                            state.content.push_str(&scanned.visible);
                            state.thinking.push_str(&scanned.thinking);
                            builder = builder
                                .add_thinking_delta(scanned.thinking)
                                .add_content_delta(scanned.visible, Some(index));
                        }
                        None => {
                            state.content.push_str(content);
                            builder = builder.add_content_delta(content.clone(), Some(index));
                        }
                    }
                }

                if let Some(tool_calls) = &delta.tool_calls {
                    for fragment in tool_calls {
                        let (id, name, arguments) = merge_tool_call(&mut state, fragment);
                        builder = builder.add_tool_call_delta(id, name, arguments, Some(index));
                    }
                }
            }

            if let Some(reason) = choice.finish_reason.as_deref() {
                state.finish_reason = parse_finish_reason(Some(reason));
            }
        }

        if let Some(usage) = event.usage.as_ref() {
            let usage = map_usage(usage);
            state.usage = Some(usage.clone());
            builder = builder.add_usage_update(usage);
        }

        builder.build_results()
    }

    fn final_response(&self) -> ChatResponse {
        let mut state = self.lock_state();

        if let Some(mut scanner) = state.scanner.take() {
            let flushed = scanner.finish();
            state.content.push_str(&flushed.visible);
            state.thinking.push_str(&flushed.thinking);
            // Reasoning output arrives with marker padding around the
            // visible text; the merged result drops it.
            state.content = state.content.trim().to_string();
            state.thinking = state.thinking.trim().to_string();
        }

        let tool_calls: Vec<ToolCall> = state
            .tool_calls
            .drain(..)
            .map(|call| ToolCall {
                id: call.id,
                r#type: "function".to_string(),
                function: Some(FunctionCall {
                    name: call.name.unwrap_or_default(),
                    arguments: call.arguments,
                }),
            })
            .collect();

        let (content, finish_reason, thinking) = if !tool_calls.is_empty() {
            let thinking = if !state.content.is_empty() {
                Some(std::mem::take(&mut state.content))
            } else if !state.thinking.is_empty() {
                Some(std::mem::take(&mut state.thinking))
            } else {
                None
            };
            (
                MessageContent::Text(String::new()),
                Some(FinishReason::ToolCalls),
                thinking,
            )
        } else {
            let thinking =
                (!state.thinking.is_empty()).then(|| std::mem::take(&mut state.thinking));
            (
                MessageContent::Text(std::mem::take(&mut state.content)),
                Some(state.finish_reason.take().unwrap_or(FinishReason::Unknown)),
                thinking,
            )
        };

        tracing::debug!(
            model = state.model.as_deref().unwrap_or(&self.model),
            finish_reason = ?finish_reason,
            usage = ?state.usage,
            "chat completion stream finished"
        );

        ChatResponse {
            id: state.id.take(),
            content,
            model: state.model.take(),
            usage: state.usage.take(),
            finish_reason,
            tool_calls: (!tool_calls.is_empty()).then_some(tool_calls),
            thinking,
        }
    }
}

/// Merge a tool-call fragment into the assembly state, returning the delta
/// to surface (call id, new function name, new argument text).
fn merge_tool_call(
    state: &mut StreamState,
    fragment: &AzureStreamToolCall,
) -> (String, Option<String>, Option<String>) {
    let slot = match &fragment.id {
        Some(id) => match state.tool_calls.iter().position(|call| call.id == *id) {
            Some(slot) => slot,
            None => {
                state.tool_calls.push(ToolCallBuilder {
                    id: id.clone(),
                    ..Default::default()
                });
                state.tool_calls.len() - 1
            }
        },
        // Continuation fragments may omit the id; fall back to the slot
        // index, then to the most recent call.
        None => match fragment.index {
            Some(index) if (index as usize) < state.tool_calls.len() => index as usize,
            _ if !state.tool_calls.is_empty() => state.tool_calls.len() - 1,
            _ => {
                state.tool_calls.push(ToolCallBuilder::default());
                state.tool_calls.len() - 1
            }
        },
    };

    let call = &mut state.tool_calls[slot];
    let mut name_delta = None;
    let mut arguments_delta = None;

    if let Some(function) = &fragment.function {
        if let Some(name) = &function.name {
            if call.name.is_none() {
                call.name = Some(name.clone());
            }
            name_delta = Some(name.clone());
        }
        if let Some(arguments) = &function.arguments {
            call.arguments.push_str(arguments);
            arguments_delta = Some(arguments.clone());
        }
    }

    (call.id.clone(), name_delta, arguments_delta)
}

impl SseEventConverter for AzureEventConverter {
    fn convert_event(
        &self,
        event: Event,
    ) -> Pin<Box<dyn Future<Output = Vec<Result<ChatStreamEvent, LlmError>>> + Send + Sync + '_>>
    {
        Box::pin(async move {
            match serde_json::from_str::<AzureStreamEvent>(&event.data) {
                Ok(update) => self.convert(update),
                Err(e) => {
                    tracing::warn!("failed to parse stream event: {e}");
                    vec![Err(LlmError::ParseError(format!(
                        "Failed to parse stream event: {e}"
                    )))]
                }
            }
        })
    }

    fn handle_stream_end(&self) -> Option<Result<ChatStreamEvent, LlmError>> {
        Some(Ok(ChatStreamEvent::StreamEnd {
            response: self.final_response(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn converter(family: ModelFamily) -> AzureEventConverter {
        AzureEventConverter::new("model", family)
    }

    fn content_update(content: &str, finish: Option<&str>) -> AzureStreamEvent {
        serde_json::from_value(serde_json::json!({
            "id": "id",
            "model": "model",
            "choices": [{
                "index": 0,
                "delta": { "role": "assistant", "content": content },
                "finish_reason": finish
            }]
        }))
        .unwrap()
    }

    #[test]
    fn test_content_deltas_merge_into_final_response() {
        let converter = converter(ModelFamily::Unknown);

        for chunk in ["Hello", " Another Hello", " Yet Another Hello"] {
            let events = converter.convert(content_update(chunk, Some("stop")));
            assert!(events
                .iter()
                .any(|e| matches!(e, Ok(ChatStreamEvent::ContentDelta { delta, .. }) if delta == chunk)));
        }

        let response = converter.final_response();
        assert_eq!(
            response.content.text(),
            Some("Hello Another Hello Yet Another Hello")
        );
        assert_eq!(response.finish_reason, Some(FinishReason::Stop));
    }

    #[test]
    fn test_first_update_emits_stream_start() {
        let converter = converter(ModelFamily::Unknown);
        let events = converter.convert(content_update("Hello", None));
        assert!(matches!(
            events[0],
            Ok(ChatStreamEvent::StreamStart { .. })
        ));

        let events = converter.convert(content_update(" again", None));
        assert!(!events
            .iter()
            .any(|e| matches!(e, Ok(ChatStreamEvent::StreamStart { .. }))));
    }

    #[test]
    fn test_reasoning_stream_splits_thinking() {
        let converter = converter(ModelFamily::R1);

        converter.convert(content_update("<think>Thought</think> Hello", Some("stop")));
        converter.convert(content_update(" Another Hello", Some("stop")));
        converter.convert(content_update(" Yet Another Hello", Some("stop")));

        let response = converter.final_response();
        assert_eq!(
            response.content.text(),
            Some("Hello Another Hello Yet Another Hello")
        );
        assert_eq!(response.thinking.as_deref(), Some("Thought"));
    }

    #[test]
    fn test_tool_call_arguments_merge_by_id() {
        let converter = converter(ModelFamily::Unknown);

        let first: AzureStreamEvent = serde_json::from_value(serde_json::json!({
            "id": "id",
            "choices": [{
                "index": 0,
                "delta": {
                    "tool_calls": [{
                        "index": 0,
                        "id": "tool_call_id",
                        "function": { "name": "some_function", "arguments": "{\"foo\":" }
                    }]
                },
                "finish_reason": null
            }]
        }))
        .unwrap();
        let second: AzureStreamEvent = serde_json::from_value(serde_json::json!({
            "id": "id",
            "choices": [{
                "index": 0,
                "delta": {
                    "tool_calls": [{
                        "index": 0,
                        "function": { "arguments": " \"bar\"}" }
                    }]
                },
                "finish_reason": "tool_calls"
            }]
        }))
        .unwrap();

        converter.convert(first);
        converter.convert(second);

        let response = converter.final_response();
        assert_eq!(response.finish_reason, Some(FinishReason::ToolCalls));
        let calls = response.tool_calls.unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].id, "tool_call_id");
        let function = calls[0].function.as_ref().unwrap();
        assert_eq!(function.name, "some_function");
        assert_eq!(function.arguments, "{\"foo\": \"bar\"}");
    }

    #[test]
    fn test_text_before_tool_call_becomes_thinking() {
        let converter = converter(ModelFamily::Unknown);

        converter.convert(content_update(
            "Let me think about what function to call.",
            None,
        ));
        let tool_update: AzureStreamEvent = serde_json::from_value(serde_json::json!({
            "id": "id",
            "choices": [{
                "index": 0,
                "delta": {
                    "tool_calls": [{
                        "id": "tool_call_id",
                        "function": { "name": "some_function", "arguments": "{\"foo\": \"bar\"}" }
                    }]
                },
                "finish_reason": "function_calls"
            }],
            "usage": { "prompt_tokens": 8, "completion_tokens": 5, "total_tokens": 13 }
        }))
        .unwrap();
        converter.convert(tool_update);

        let response = converter.final_response();
        assert_eq!(response.finish_reason, Some(FinishReason::ToolCalls));
        assert_eq!(
            response.thinking.as_deref(),
            Some("Let me think about what function to call.")
        );
        assert_eq!(response.usage, Some(Usage::new(8, 5)));
    }

    #[test]
    fn test_stream_without_finish_reason_reports_unknown() {
        let converter = converter(ModelFamily::Unknown);
        converter.convert(content_update("partial", None));

        let response = converter.final_response();
        assert_eq!(response.finish_reason, Some(FinishReason::Unknown));
        assert_eq!(response.content.text(), Some("partial"));
    }
}
