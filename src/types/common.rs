//! Common types and enums used across the library

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Common sampling parameters sent with a chat request.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CommonParams {
    /// Temperature parameter (must be non-negative)
    pub temperature: Option<f32>,

    /// Maximum output tokens
    pub max_tokens: Option<u32>,

    /// `top_p` parameter
    pub top_p: Option<f32>,

    /// Stop sequences
    pub stop_sequences: Option<Vec<String>>,

    /// Random seed
    pub seed: Option<u64>,
}

impl CommonParams {
    /// Validate common parameters
    pub fn validate_params(&self) -> Result<(), crate::error::LlmError> {
        if let Some(temp) = self.temperature {
            if temp < 0.0 {
                return Err(crate::error::LlmError::InvalidParameter(
                    "Temperature must be non-negative".to_string(),
                ));
            }
        }

        if let Some(top_p) = self.top_p {
            if !(0.0..=1.0).contains(&top_p) {
                return Err(crate::error::LlmError::InvalidParameter(
                    "top_p must be between 0.0 and 1.0".to_string(),
                ));
            }
        }

        Ok(())
    }
}

/// HTTP configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Request timeout
    pub timeout: Option<Duration>,
    /// Connection timeout
    pub connect_timeout: Option<Duration>,
    /// Custom headers
    pub headers: HashMap<String, String>,
    /// Proxy settings
    pub proxy: Option<String>,
    /// User agent
    pub user_agent: Option<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(60)),
            connect_timeout: Some(Duration::from_secs(10)),
            headers: HashMap::new(),
            proxy: None,
            user_agent: Some(concat!("azure-ai-chat/", env!("CARGO_PKG_VERSION")).to_string()),
        }
    }
}

/// Usage statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Input tokens used
    pub prompt_tokens: u32,
    /// Output tokens generated
    pub completion_tokens: u32,
    /// Total tokens used
    pub total_tokens: u32,
}

impl Usage {
    /// Create new usage statistics
    pub const fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

impl Default for Usage {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

/// Reason why the model stopped generating tokens.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Model generated a stop sequence or completed naturally.
    Stop,

    /// Model reached the maximum number of tokens (`max_tokens` parameter).
    Length,

    /// Model triggered tool/function calls. Execute the tools and continue
    /// the conversation with the results.
    ToolCalls,

    /// Content was filtered due to safety/policy violations.
    ContentFilter,

    /// Other provider-specific finish reason; carries the original string.
    Other(String),

    /// The service did not transmit a finish reason, or the stream ended
    /// without a proper completion event.
    Unknown,
}

/// Response metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseMetadata {
    /// Response ID
    pub id: Option<String>,
    /// Model name
    pub model: Option<String>,
    /// Creation time
    pub created: Option<chrono::DateTime<chrono::Utc>>,
    /// Provider name
    pub provider: String,
}
