//! Common streaming utilities
//!
//! SSE plumbing shared by streaming chat requests: sends the request,
//! parses server-sent events with `eventsource-stream` (which handles
//! UTF-8 boundaries and line buffering), and hands each event to a
//! provider-specific converter.

use crate::error::LlmError;
use crate::stream::{ChatStream, ChatStreamEvent};
use eventsource_stream::{Event, Eventsource};
use futures_util::StreamExt;
use std::future::Future;
use std::pin::Pin;

/// Type alias for SSE event conversion future - supports multiple events
type SseEventFuture<'a> =
    Pin<Box<dyn Future<Output = Vec<Result<ChatStreamEvent, LlmError>>> + Send + Sync + 'a>>;

/// Trait for converting provider-specific SSE events to ChatStreamEvent
///
/// A single provider event may produce multiple ChatStreamEvents
/// (e.g., StreamStart + ContentDelta).
pub trait SseEventConverter: Send + Sync {
    /// Convert an SSE event to zero or more ChatStreamEvents
    fn convert_event(&self, event: Event) -> SseEventFuture<'_>;

    /// Produce the terminal event once the remote stream ends.
    ///
    /// Called exactly once, on the `[DONE]` marker or on transport EOF.
    fn handle_stream_end(&self) -> Option<Result<ChatStreamEvent, LlmError>> {
        None
    }
}

/// Stream factory for creating provider-specific streams
pub struct StreamFactory;

impl StreamFactory {
    /// Create a chat stream from an SSE response.
    ///
    /// Sends the request, validates the response status, then converts
    /// each SSE event through the provider converter. The converter's
    /// terminal event is emitted on `[DONE]` or, failing that, when the
    /// transport stream ends.
    pub async fn create_eventsource_stream<C>(
        request_builder: reqwest::RequestBuilder,
        converter: C,
    ) -> Result<ChatStream, LlmError>
    where
        C: SseEventConverter + 'static,
    {
        let response = request_builder
            .send()
            .await
            .map_err(|e| LlmError::HttpError(format!("Failed to send request: {e}")))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response.text().await.unwrap_or_default();
            let details = serde_json::from_str(&error_text).ok();
            return Err(LlmError::ApiError {
                code: status,
                message: error_text,
                details,
            });
        }

        let byte_stream = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(|e| LlmError::HttpError(format!("Stream error: {e}"))));

        let chat_stream = async_stream::stream! {
            let mut events = Box::pin(byte_stream.eventsource());
            let mut ended = false;

            while let Some(event_result) = events.next().await {
                match event_result {
                    Ok(event) => {
                        if event.data.trim() == "[DONE]" {
                            if let Some(end_event) = converter.handle_stream_end() {
                                yield end_event;
                            }
                            ended = true;
                            break;
                        }
                        if event.data.trim().is_empty() {
                            continue;
                        }
                        for item in converter.convert_event(event).await {
                            yield item;
                        }
                    }
                    Err(e) => {
                        yield Err(LlmError::StreamError(format!("SSE parsing error: {e}")));
                    }
                }
            }

            // Streams that end without a [DONE] marker still get a
            // terminal merged event.
            if !ended {
                if let Some(end_event) = converter.handle_stream_end() {
                    yield end_event;
                }
            }
        };

        Ok(Box::pin(chat_stream))
    }
}

/// Helper for building the event list produced by one SSE event
pub struct EventBuilder {
    events: Vec<ChatStreamEvent>,
}

impl EventBuilder {
    /// Create a new event builder
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(2),
        }
    }

    /// Add a StreamStart event
    pub fn add_stream_start(mut self, metadata: crate::types::ResponseMetadata) -> Self {
        self.events.push(ChatStreamEvent::StreamStart { metadata });
        self
    }

    /// Add a ContentDelta event (only if delta is not empty)
    pub fn add_content_delta(mut self, delta: String, index: Option<usize>) -> Self {
        if !delta.is_empty() {
            self.events
                .push(ChatStreamEvent::ContentDelta { delta, index });
        }
        self
    }

    /// Add a ToolCallDelta event
    pub fn add_tool_call_delta(
        mut self,
        id: String,
        function_name: Option<String>,
        arguments_delta: Option<String>,
        index: Option<usize>,
    ) -> Self {
        self.events.push(ChatStreamEvent::ToolCallDelta {
            id,
            function_name,
            arguments_delta,
            index,
        });
        self
    }

    /// Add a ThinkingDelta event (only if delta is not empty)
    pub fn add_thinking_delta(mut self, delta: String) -> Self {
        if !delta.is_empty() {
            self.events.push(ChatStreamEvent::ThinkingDelta { delta });
        }
        self
    }

    /// Add a UsageUpdate event
    pub fn add_usage_update(mut self, usage: crate::types::Usage) -> Self {
        self.events.push(ChatStreamEvent::UsageUpdate { usage });
        self
    }

    /// Build the events vector wrapped in Results
    pub fn build_results(self) -> Vec<Result<ChatStreamEvent, LlmError>> {
        self.events.into_iter().map(Ok).collect()
    }
}

impl Default for EventBuilder {
    fn default() -> Self {
        Self::new()
    }
}
