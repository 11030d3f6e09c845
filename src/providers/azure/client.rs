//! Azure AI model inference chat completion client.

use super::chat::{build_request_body, parse_chat_response};
use super::config::{AzureAiConfig, KeyCredential};
use super::streaming::{AzureEventConverter, create_chat_stream};
use super::types::AzureChatCompletion;
use crate::error::LlmError;
use crate::stream::ChatStream;
use crate::traits::ChatCapability;
use crate::types::{ChatMessage, ChatResponse, CommonParams, HttpConfig, ModelInfo, Tool};
use crate::utils::cancel::{CancelHandle, wrap_cancellable};
use async_trait::async_trait;

/// Chat completion client for Azure AI model inference endpoints.
///
/// Validates requests against the configured [`ModelInfo`] before anything
/// goes over the network, and normalizes responses into [`ChatResponse`].
#[derive(Clone)]
pub struct AzureAiChatCompletionClient {
    config: AzureAiConfig,
    model_info: ModelInfo,
    http_client: reqwest::Client,
}

impl std::fmt::Debug for AzureAiChatCompletionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureAiChatCompletionClient")
            .field("endpoint", &self.config.endpoint)
            .field("model", &self.config.model)
            .field("model_info", &self.model_info)
            .finish_non_exhaustive()
    }
}

impl AzureAiChatCompletionClient {
    /// Create a new client, validating the configuration.
    pub fn new(config: AzureAiConfig) -> Result<Self, LlmError> {
        config.validate()?;
        let http_client = Self::build_http_client(&config)?;
        Self::with_http_client(config, http_client)
    }

    /// Create a new client with a custom HTTP client.
    pub fn with_http_client(
        config: AzureAiConfig,
        http_client: reqwest::Client,
    ) -> Result<Self, LlmError> {
        config.validate()?;
        let model_info = config.model_info.clone().ok_or_else(|| {
            LlmError::ConfigurationError("model_info is required".to_string())
        })?;

        Ok(Self {
            config,
            model_info,
            http_client,
        })
    }

    /// Create a builder for the client.
    pub fn builder() -> AzureAiChatCompletionClientBuilder {
        AzureAiChatCompletionClientBuilder::default()
    }

    /// Capability descriptor of the configured model.
    pub fn model_info(&self) -> &ModelInfo {
        &self.model_info
    }

    /// Model (deployment) name this client talks to.
    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn build_http_client(config: &AzureAiConfig) -> Result<reqwest::Client, LlmError> {
        let mut builder = reqwest::Client::builder();

        if let Some(timeout) = config.http_config.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(connect_timeout) = config.http_config.connect_timeout {
            builder = builder.connect_timeout(connect_timeout);
        }
        if let Some(proxy_url) = &config.http_config.proxy {
            let proxy = reqwest::Proxy::all(proxy_url)
                .map_err(|e| LlmError::ConfigurationError(format!("Invalid proxy URL: {e}")))?;
            builder = builder.proxy(proxy);
        }
        if let Some(user_agent) = &config.http_config.user_agent {
            builder = builder.user_agent(user_agent);
        }

        builder
            .build()
            .map_err(|e| LlmError::HttpError(format!("Failed to create HTTP client: {e}")))
    }

    fn build_headers(&self) -> Result<reqwest::header::HeaderMap, LlmError> {
        let mut headers = reqwest::header::HeaderMap::new();

        headers.insert(
            reqwest::header::CONTENT_TYPE,
            reqwest::header::HeaderValue::from_static("application/json"),
        );

        let credential = self.config.credential.as_ref().ok_or_else(|| {
            LlmError::ConfigurationError("credential is required".to_string())
        })?;

        // Serverless and GitHub Models deployments authenticate with
        // `Authorization: Bearer`; classic deployments use `api-key`.
        // Both headers are sent.
        let mut bearer =
            reqwest::header::HeaderValue::from_str(&format!("Bearer {}", credential.expose()))
                .map_err(|e| LlmError::ConfigurationError(format!("Invalid API key: {e}")))?;
        bearer.set_sensitive(true);
        headers.insert(reqwest::header::AUTHORIZATION, bearer);

        let mut api_key = reqwest::header::HeaderValue::from_str(credential.expose())
            .map_err(|e| LlmError::ConfigurationError(format!("Invalid API key: {e}")))?;
        api_key.set_sensitive(true);
        headers.insert("api-key", api_key);

        for (key, value) in &self.config.http_config.headers {
            let header_name = reqwest::header::HeaderName::from_bytes(key.as_bytes())
                .map_err(|e| {
                    LlmError::ConfigurationError(format!("Invalid header name '{key}': {e}"))
                })?;
            let header_value = reqwest::header::HeaderValue::from_str(value).map_err(|e| {
                LlmError::ConfigurationError(format!("Invalid header value '{value}': {e}"))
            })?;
            headers.insert(header_name, header_value);
        }

        Ok(headers)
    }

    /// Reject requests the configured model cannot serve, before any
    /// network traffic.
    fn ensure_supported(
        &self,
        messages: &[ChatMessage],
        tools: Option<&[Tool]>,
    ) -> Result<(), LlmError> {
        if tools.is_some_and(|tools| !tools.is_empty()) && !self.model_info.function_calling {
            return Err(LlmError::UnsupportedOperation(
                "Model does not support function calling".to_string(),
            ));
        }

        if !self.model_info.vision
            && messages.iter().any(|msg| msg.content.contains_image())
        {
            return Err(LlmError::UnsupportedOperation(format!(
                "Model {} does not support vision and image was provided",
                self.config.model
            )));
        }

        Ok(())
    }

    async fn execute_chat(
        &self,
        messages: &[ChatMessage],
        tools: Option<&[Tool]>,
    ) -> Result<ChatResponse, LlmError> {
        self.ensure_supported(messages, tools)?;

        let body = build_request_body(&self.config, messages, tools, false)?;
        let headers = self.build_headers()?;

        tracing::debug!(
            model = %self.config.model,
            messages = messages.len(),
            tools = tools.map_or(0, |tools| tools.len()),
            "sending chat completion request"
        );

        let response = self
            .http_client
            .post(self.config.chat_completions_url())
            .headers(headers)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::HttpError(format!("Failed to send request: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let details = serde_json::from_str(&error_text).ok();
            return Err(LlmError::ApiError {
                code: status.as_u16(),
                message: error_text,
                details,
            });
        }

        let completion: AzureChatCompletion = response
            .json()
            .await
            .map_err(|e| LlmError::ParseError(format!("Failed to parse chat response: {e}")))?;

        let result = parse_chat_response(completion, &self.model_info.family)?;
        tracing::debug!(
            model = %self.config.model,
            finish_reason = ?result.finish_reason,
            usage = ?result.usage,
            "chat completion finished"
        );
        Ok(result)
    }

    async fn execute_chat_stream(
        &self,
        messages: &[ChatMessage],
        tools: Option<&[Tool]>,
    ) -> Result<ChatStream, LlmError> {
        self.ensure_supported(messages, tools)?;

        let body = build_request_body(&self.config, messages, tools, true)?;
        let headers = self.build_headers()?;

        tracing::debug!(
            model = %self.config.model,
            messages = messages.len(),
            "starting chat completion stream"
        );

        let request_builder = self
            .http_client
            .post(self.config.chat_completions_url())
            .headers(headers)
            .json(&body);

        let converter =
            AzureEventConverter::new(&self.config.model, self.model_info.family.clone());
        create_chat_stream(request_builder, converter).await
    }

    /// Non-streaming chat request observing a cancellation handle.
    ///
    /// Returns [`LlmError::Cancelled`] when the handle fires before or
    /// during the request; dropping the in-flight request closes the
    /// connection.
    pub async fn chat_with_tools_cancellable(
        &self,
        messages: Vec<ChatMessage>,
        tools: Option<Vec<Tool>>,
        cancel: &CancelHandle,
    ) -> Result<ChatResponse, LlmError> {
        if cancel.is_cancelled() {
            return Err(LlmError::Cancelled);
        }
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(LlmError::Cancelled),
            result = self.execute_chat(&messages, tools.as_deref()) => result,
        }
    }

    /// Streaming chat request observing a cancellation handle.
    ///
    /// The returned stream yields a terminal [`LlmError::Cancelled`] when
    /// the handle fires before the request or between chunks.
    pub async fn chat_stream_cancellable(
        &self,
        messages: Vec<ChatMessage>,
        tools: Option<Vec<Tool>>,
        cancel: &CancelHandle,
    ) -> Result<ChatStream, LlmError> {
        if cancel.is_cancelled() {
            return Err(LlmError::Cancelled);
        }
        let stream = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(LlmError::Cancelled),
            result = self.execute_chat_stream(&messages, tools.as_deref()) => result?,
        };
        Ok(wrap_cancellable(stream, cancel.clone()))
    }
}

#[async_trait]
impl ChatCapability for AzureAiChatCompletionClient {
    async fn chat_with_tools(
        &self,
        messages: Vec<ChatMessage>,
        tools: Option<Vec<Tool>>,
    ) -> Result<ChatResponse, LlmError> {
        self.execute_chat(&messages, tools.as_deref()).await
    }

    async fn chat_stream(
        &self,
        messages: Vec<ChatMessage>,
        tools: Option<Vec<Tool>>,
    ) -> Result<ChatStream, LlmError> {
        self.execute_chat_stream(&messages, tools.as_deref()).await
    }
}

/// Builder for [`AzureAiChatCompletionClient`].
#[derive(Debug, Clone, Default)]
pub struct AzureAiChatCompletionClientBuilder {
    config: AzureAiConfig,
}

impl AzureAiChatCompletionClientBuilder {
    /// Set the inference endpoint URL.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.endpoint = endpoint.into();
        self
    }

    /// Set the API key credential.
    pub fn credential(mut self, credential: impl Into<KeyCredential>) -> Self {
        self.config.credential = Some(credential.into());
        self
    }

    /// Set the model (deployment) name.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Set the model capability descriptor.
    pub fn model_info(mut self, model_info: ModelInfo) -> Self {
        self.config.model_info = Some(model_info);
        self
    }

    /// Set sampling parameters.
    pub fn common_params(mut self, params: CommonParams) -> Self {
        self.config.common_params = params;
        self
    }

    /// Set HTTP configuration.
    pub fn http_config(mut self, http_config: HttpConfig) -> Self {
        self.config.http_config = http_config;
        self
    }

    /// Build the client, validating the configuration.
    pub fn build(self) -> Result<AzureAiChatCompletionClient, LlmError> {
        AzureAiChatCompletionClient::new(self.config)
    }
}
