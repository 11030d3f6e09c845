//! Chat-related types and message handling

use super::common::{FinishReason, Usage};
use super::tools::ToolCall;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// Message role
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
    Tool,
}

/// Message content - supports multimodality
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum MessageContent {
    /// Plain text
    Text(String),
    /// Multimodal content
    MultiModal(Vec<ContentPart>),
}

impl MessageContent {
    /// Extract text content if available
    pub fn text(&self) -> Option<&str> {
        match self {
            MessageContent::Text(text) => Some(text),
            MessageContent::MultiModal(parts) => parts.iter().find_map(|part| {
                if let ContentPart::Text { text } = part {
                    Some(text.as_str())
                } else {
                    None
                }
            }),
        }
    }

    /// Extract all text content
    pub fn all_text(&self) -> String {
        match self {
            MessageContent::Text(text) => text.clone(),
            MessageContent::MultiModal(parts) => {
                let mut result = String::new();
                for part in parts {
                    if let ContentPart::Text { text } = part {
                        if !result.is_empty() {
                            result.push(' ');
                        }
                        result.push_str(text);
                    }
                }
                result
            }
        }
    }

    /// Whether the content carries at least one image part
    pub fn contains_image(&self) -> bool {
        match self {
            MessageContent::Text(_) => false,
            MessageContent::MultiModal(parts) => parts
                .iter()
                .any(|part| matches!(part, ContentPart::Image { .. })),
        }
    }
}

/// Content part
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum ContentPart {
    Text {
        text: String,
    },
    Image {
        /// Image location: an `https://` URL or a `data:` URL
        image_url: String,
        /// Optional detail hint ("low", "high", "auto")
        detail: Option<String>,
    },
}

/// Chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role
    pub role: MessageRole,
    /// Content
    pub content: MessageContent,
    /// Tool calls previously emitted by the assistant
    pub tool_calls: Option<Vec<ToolCall>>,
    /// Tool call ID (for tool result messages)
    pub tool_call_id: Option<String>,
}

impl ChatMessage {
    /// Creates a user message
    pub fn user<S: Into<String>>(content: S) -> ChatMessageBuilder {
        ChatMessageBuilder::new(MessageRole::User, content)
    }

    /// Creates a system message
    pub fn system<S: Into<String>>(content: S) -> ChatMessageBuilder {
        ChatMessageBuilder::new(MessageRole::System, content)
    }

    /// Creates an assistant message
    pub fn assistant<S: Into<String>>(content: S) -> ChatMessageBuilder {
        ChatMessageBuilder::new(MessageRole::Assistant, content)
    }

    /// Creates a tool result message
    pub fn tool<S: Into<String>>(content: S, tool_call_id: S) -> ChatMessageBuilder {
        let mut builder = ChatMessageBuilder::new(MessageRole::Tool, content);
        builder.tool_call_id = Some(tool_call_id.into());
        builder
    }

    /// Gets the text content of the message
    pub fn content_text(&self) -> Option<&str> {
        self.content.text()
    }
}

/// Chat message builder
#[derive(Debug, Clone)]
pub struct ChatMessageBuilder {
    role: MessageRole,
    content: MessageContent,
    tool_calls: Option<Vec<ToolCall>>,
    tool_call_id: Option<String>,
}

impl ChatMessageBuilder {
    fn new<S: Into<String>>(role: MessageRole, content: S) -> Self {
        Self {
            role,
            content: MessageContent::Text(content.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    /// Adds image content by URL
    pub fn with_image(mut self, image_url: impl Into<String>, detail: Option<String>) -> Self {
        let part = ContentPart::Image {
            image_url: image_url.into(),
            detail,
        };
        self.push_part(part);
        self
    }

    /// Adds image content from a base64-encoded payload, carried as a data URL
    pub fn with_image_base64(
        self,
        data: impl AsRef<str>,
        media_type: impl AsRef<str>,
    ) -> Self {
        let url = format!("data:{};base64,{}", media_type.as_ref(), data.as_ref());
        self.with_image(url, None)
    }

    /// Adds image content from raw bytes, base64-encoded into a data URL
    pub fn with_image_bytes(self, data: &[u8], media_type: impl AsRef<str>) -> Self {
        let encoded = base64::engine::general_purpose::STANDARD.encode(data);
        self.with_image_base64(encoded, media_type)
    }

    /// Adds tool calls
    pub fn with_tool_calls(mut self, tool_calls: Vec<ToolCall>) -> Self {
        self.tool_calls = Some(tool_calls);
        self
    }

    fn push_part(&mut self, part: ContentPart) {
        match &mut self.content {
            MessageContent::Text(text) => {
                let mut parts = Vec::with_capacity(2);
                if !text.is_empty() {
                    parts.push(ContentPart::Text { text: text.clone() });
                }
                parts.push(part);
                self.content = MessageContent::MultiModal(parts);
            }
            MessageContent::MultiModal(parts) => parts.push(part),
        }
    }

    /// Builds the message
    pub fn build(self) -> ChatMessage {
        ChatMessage {
            role: self.role,
            content: self.content,
            tool_calls: self.tool_calls,
            tool_call_id: self.tool_call_id,
        }
    }
}

/// Normalized chat completion result.
///
/// The finish reason distinguishes the two content cases: `Stop` carries
/// text in `content`, `ToolCalls` carries the calls in `tool_calls` with
/// any accompanying free text preserved in `thinking`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Response ID
    pub id: Option<String>,
    /// The response content
    pub content: MessageContent,
    /// Model used for the response
    pub model: Option<String>,
    /// Usage statistics
    pub usage: Option<Usage>,
    /// Finish reason
    pub finish_reason: Option<FinishReason>,
    /// Tool calls in the response
    pub tool_calls: Option<Vec<ToolCall>>,
    /// Thinking content: reasoning-region text for the R1 family, or free
    /// text that accompanied tool calls
    pub thinking: Option<String>,
}

impl ChatResponse {
    /// Get the text content of the response
    pub fn content_text(&self) -> Option<&str> {
        self.content.text()
    }

    /// Check if the response has tool calls
    pub fn has_tool_calls(&self) -> bool {
        self.tool_calls
            .as_ref()
            .is_some_and(|calls| !calls.is_empty())
    }

    /// Check if the response has thinking content
    pub fn has_thinking(&self) -> bool {
        self.thinking.as_ref().is_some_and(|t| !t.is_empty())
    }

    /// Get thinking content if available
    pub fn get_thinking(&self) -> Option<&str> {
        self.thinking.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_builder() {
        let msg = ChatMessage::user("Hello").build();
        assert_eq!(msg.role, MessageRole::User);
        assert_eq!(msg.content_text(), Some("Hello"));

        let msg = ChatMessage::system("You are helpful").build();
        assert_eq!(msg.role, MessageRole::System);
    }

    #[test]
    fn test_image_upgrades_content_to_multimodal() {
        let msg = ChatMessage::user("Look at this")
            .with_image("https://example.com/cat.png", Some("low".into()))
            .build();

        assert!(msg.content.contains_image());
        assert_eq!(msg.content.text(), Some("Look at this"));
    }

    #[test]
    fn test_image_base64_builds_data_url() {
        let msg = ChatMessage::user("")
            .with_image_base64("aGVsbG8=", "image/png")
            .build();

        match &msg.content {
            MessageContent::MultiModal(parts) => match &parts[0] {
                ContentPart::Image { image_url, .. } => {
                    assert_eq!(image_url, "data:image/png;base64,aGVsbG8=");
                }
                other => panic!("unexpected part: {other:?}"),
            },
            other => panic!("unexpected content: {other:?}"),
        }
    }

    #[test]
    fn test_text_content_has_no_image() {
        let msg = ChatMessage::user("just text").build();
        assert!(!msg.content.contains_image());
    }

    #[test]
    fn test_tool_message_carries_call_id() {
        let msg = ChatMessage::tool("42", "call_1").build();
        assert_eq!(msg.role, MessageRole::Tool);
        assert_eq!(msg.tool_call_id.as_deref(), Some("call_1"));
    }
}
