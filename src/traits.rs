//! Chat capability traits
//!
//! [`ChatCapability`] is the seam between this client and code that works
//! against "some chat model": agent loops and orchestration layers depend
//! on the trait, concrete providers implement it.

use crate::error::LlmError;
use crate::stream::{ChatStream, ChatStreamHandle};
use crate::types::{ChatMessage, ChatResponse, Tool};
use async_trait::async_trait;

#[async_trait]
pub trait ChatCapability: Send + Sync {
    /// Send a chat request without tools.
    async fn chat(&self, messages: Vec<ChatMessage>) -> Result<ChatResponse, LlmError> {
        self.chat_with_tools(messages, None).await
    }

    /// Send a chat request, optionally exposing tools to the model.
    async fn chat_with_tools(
        &self,
        messages: Vec<ChatMessage>,
        tools: Option<Vec<Tool>>,
    ) -> Result<ChatResponse, LlmError>;

    /// Send a streaming chat request.
    ///
    /// The stream emits incremental events in arrival order and finishes
    /// with a single `StreamEnd` carrying the merged final response.
    async fn chat_stream(
        &self,
        messages: Vec<ChatMessage>,
        tools: Option<Vec<Tool>>,
    ) -> Result<ChatStream, LlmError>;

    /// Streaming variant that returns the stream together with a cancel
    /// handle created for it.
    async fn chat_stream_with_cancel(
        &self,
        messages: Vec<ChatMessage>,
        tools: Option<Vec<Tool>>,
    ) -> Result<ChatStreamHandle, LlmError> {
        let stream = self.chat_stream(messages, tools).await?;
        let (stream, cancel) = crate::utils::cancel::make_cancellable_stream(stream);
        Ok(ChatStreamHandle { stream, cancel })
    }
}
