//! Streaming event types for real-time responses

use crate::error::LlmError;
use crate::types::{ChatResponse, ResponseMetadata, Usage};
use futures::Stream;
use serde::{Deserialize, Serialize};
use std::pin::Pin;

/// Chat streaming event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ChatStreamEvent {
    /// Content delta (incremental text)
    ContentDelta {
        /// The incremental text content
        delta: String,
        /// Index of the choice (for multiple responses)
        index: Option<usize>,
    },
    /// Tool call delta
    ToolCallDelta {
        /// Tool call ID
        id: String,
        /// Function name (if this is the start of a tool call)
        function_name: Option<String>,
        /// Incremental arguments
        arguments_delta: Option<String>,
        /// Index of the choice
        index: Option<usize>,
    },
    /// Thinking/reasoning content delta, stripped from the visible content
    ThinkingDelta {
        /// The incremental thinking content
        delta: String,
    },
    /// Usage statistics update
    UsageUpdate {
        /// Token usage information
        usage: Usage,
    },
    /// Stream start event with metadata
    StreamStart {
        /// Response metadata
        metadata: ResponseMetadata,
    },
    /// Stream end event with the merged final response
    StreamEnd {
        /// Final response
        response: ChatResponse,
    },
    /// Error occurred during streaming
    Error {
        /// Error message
        error: String,
    },
}

/// Chat Stream - Main interface for streaming responses
///
/// This is a pinned, boxed stream that yields `ChatStreamEvent` items.
pub type ChatStream = Pin<Box<dyn Stream<Item = Result<ChatStreamEvent, LlmError>> + Send>>;

/// Chat stream with first-class cancellation handle
///
/// Wraps a [`ChatStream`] with a handle that can cancel it at any time;
/// a cancelled stream yields a terminal [`LlmError::Cancelled`].
pub struct ChatStreamHandle {
    /// The underlying chat stream
    pub stream: ChatStream,
    /// Handle to cancel the stream
    pub cancel: crate::utils::cancel::CancelHandle,
}
