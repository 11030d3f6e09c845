//! Core types shared across the crate.

pub mod chat;
pub mod common;
pub mod models;
pub mod tools;

pub use chat::{
    ChatMessage, ChatMessageBuilder, ChatResponse, ContentPart, MessageContent, MessageRole,
};
pub use common::{CommonParams, FinishReason, HttpConfig, ResponseMetadata, Usage};
pub use models::{ModelFamily, ModelInfo, ModelInfoBuilder};
pub use tools::{FunctionCall, Tool, ToolCall, ToolFunction};
