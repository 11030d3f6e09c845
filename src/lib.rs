//! # azure-ai-chat
//!
//! Chat completion client for the Azure AI model inference API (Azure AI
//! Foundry serverless endpoints and GitHub Models), normalizing responses
//! into a provider-agnostic result type.
//!
//! The client implements [`ChatCapability`](traits::ChatCapability), the
//! generic chat-model abstraction, and supports:
//!
//! - non-streaming and streaming (SSE) chat completion
//! - tool/function calling, with streamed argument fragments merged per
//!   call id
//! - multimodal (image) input, gated on the configured model capabilities
//! - `<think>` reasoning extraction for the R1 model family
//! - cooperative cancellation of in-flight requests and streams
//!
//! # Example
//!
//! ```rust,no_run
//! use azure_ai_chat::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), LlmError> {
//!     let client = AzureAiChatCompletionClient::builder()
//!         .endpoint(GITHUB_MODELS_ENDPOINT)
//!         .credential("api-key")
//!         .model("gpt-4o-mini")
//!         .model_info(
//!             ModelInfo::builder()
//!                 .function_calling(true)
//!                 .family(ModelFamily::Unknown)
//!                 .build()?,
//!         )
//!         .build()?;
//!
//!     let response = client.chat(vec![ChatMessage::user("Hello").build()]).await?;
//!     println!("{}", response.content_text().unwrap_or_default());
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod providers;
pub mod stream;
pub mod traits;
pub mod types;
pub mod utils;

pub use error::LlmError;
pub use providers::azure::{
    AzureAiChatCompletionClient, AzureAiChatCompletionClientBuilder, AzureAiConfig,
    GITHUB_MODELS_ENDPOINT, KeyCredential,
};
pub use stream::{ChatStream, ChatStreamEvent, ChatStreamHandle};
pub use traits::ChatCapability;

/// Common imports for working with the client
pub mod prelude {
    pub use crate::error::LlmError;
    pub use crate::providers::azure::{
        AzureAiChatCompletionClient, AzureAiChatCompletionClientBuilder, AzureAiConfig,
        GITHUB_MODELS_ENDPOINT, KeyCredential,
    };
    pub use crate::stream::{ChatStream, ChatStreamEvent, ChatStreamHandle};
    pub use crate::traits::ChatCapability;
    pub use crate::types::{
        ChatMessage, ChatResponse, CommonParams, ContentPart, FinishReason, FunctionCall,
        HttpConfig, MessageContent, MessageRole, ModelFamily, ModelInfo, Tool, ToolCall, Usage,
    };
    pub use crate::utils::cancel::{CancelHandle, new_cancel_handle};
}
