//! Azure AI model inference configuration

use crate::error::LlmError;
use crate::types::{CommonParams, HttpConfig, ModelInfo};
use secrecy::{ExposeSecret, SecretString};

/// Endpoint serving the GitHub Models catalog through the Azure AI model
/// inference API.
pub const GITHUB_MODELS_ENDPOINT: &str = "https://models.inference.ai.azure.com";

/// Environment variable for the inference endpoint URL
pub const ENDPOINT_ENV_VAR: &str = "AZURE_AI_INFERENCE_ENDPOINT";
/// Environment variable for the inference API key
pub const API_KEY_ENV_VAR: &str = "AZURE_AI_INFERENCE_API_KEY";

/// API key credential for an inference endpoint.
///
/// The key is held as a [`SecretString`] so it never shows up in Debug
/// output or logs.
#[derive(Clone)]
pub struct KeyCredential {
    secret: SecretString,
}

impl KeyCredential {
    /// Create a credential from an API key.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            secret: SecretString::from(key.into()),
        }
    }

    /// Expose the raw key for header construction.
    pub(crate) fn expose(&self) -> &str {
        self.secret.expose_secret()
    }
}

impl std::fmt::Debug for KeyCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyCredential").finish_non_exhaustive()
    }
}

impl From<&str> for KeyCredential {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for KeyCredential {
    fn from(key: String) -> Self {
        Self::new(key)
    }
}

/// Configuration for [`AzureAiChatCompletionClient`](super::AzureAiChatCompletionClient).
///
/// `endpoint`, `credential`, `model` and `model_info` are all required;
/// [`validate`](Self::validate) reports the first missing one by name.
#[derive(Debug, Clone, Default)]
pub struct AzureAiConfig {
    /// Inference endpoint URL
    pub endpoint: String,
    /// API key credential
    pub credential: Option<KeyCredential>,
    /// Model (deployment) name
    pub model: String,
    /// Capability descriptor for the deployed model
    pub model_info: Option<ModelInfo>,
    /// Sampling parameters applied to every request
    pub common_params: CommonParams,
    /// HTTP client configuration
    pub http_config: HttpConfig,
}

impl AzureAiConfig {
    /// Create a configuration with all required fields.
    pub fn new(
        endpoint: impl Into<String>,
        credential: impl Into<KeyCredential>,
        model: impl Into<String>,
        model_info: ModelInfo,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            credential: Some(credential.into()),
            model: model.into(),
            model_info: Some(model_info),
            common_params: CommonParams::default(),
            http_config: HttpConfig::default(),
        }
    }

    /// Create a configuration reading endpoint and credential from the
    /// `AZURE_AI_INFERENCE_ENDPOINT` / `AZURE_AI_INFERENCE_API_KEY`
    /// environment variables.
    pub fn from_env(model: impl Into<String>, model_info: ModelInfo) -> Result<Self, LlmError> {
        let endpoint = std::env::var(ENDPOINT_ENV_VAR).map_err(|_| {
            LlmError::ConfigurationError(format!("{ENDPOINT_ENV_VAR} is not set"))
        })?;
        let api_key = std::env::var(API_KEY_ENV_VAR).map_err(|_| {
            LlmError::ConfigurationError(format!("{API_KEY_ENV_VAR} is not set"))
        })?;
        Ok(Self::new(endpoint, api_key, model, model_info))
    }

    /// Set sampling parameters.
    pub fn with_common_params(mut self, params: CommonParams) -> Self {
        self.common_params = params;
        self
    }

    /// Set HTTP configuration.
    pub fn with_http_config(mut self, http_config: HttpConfig) -> Self {
        self.http_config = http_config;
        self
    }

    /// Validate the configuration, reporting the first missing required
    /// field by name.
    pub fn validate(&self) -> Result<(), LlmError> {
        if self.endpoint.trim().is_empty() {
            return Err(LlmError::ConfigurationError(
                "endpoint is required".to_string(),
            ));
        }

        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(LlmError::ConfigurationError(
                "endpoint must start with http:// or https://".to_string(),
            ));
        }

        if self.credential.is_none() {
            return Err(LlmError::ConfigurationError(
                "credential is required".to_string(),
            ));
        }

        if self.model.trim().is_empty() {
            return Err(LlmError::ConfigurationError(
                "model is required".to_string(),
            ));
        }

        if self.model_info.is_none() {
            return Err(LlmError::ConfigurationError(
                "model_info is required".to_string(),
            ));
        }

        self.common_params.validate_params()?;

        Ok(())
    }

    /// URL of the chat completions route for this endpoint.
    pub(crate) fn chat_completions_url(&self) -> String {
        format!("{}/chat/completions", self.endpoint.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ModelFamily;

    fn model_info() -> ModelInfo {
        ModelInfo::builder()
            .family(ModelFamily::Unknown)
            .build()
            .unwrap()
    }

    #[test]
    fn test_validate_complete_config() {
        let config = AzureAiConfig::new(GITHUB_MODELS_ENDPOINT, "key", "model", model_info());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_reports_missing_fields_by_name() {
        let config = AzureAiConfig {
            credential: Some("key".into()),
            model: "model".to_string(),
            model_info: Some(model_info()),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("endpoint is required"));

        let config = AzureAiConfig {
            endpoint: "https://endpoint".to_string(),
            model: "model".to_string(),
            model_info: Some(model_info()),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("credential is required"));

        let config = AzureAiConfig {
            endpoint: GITHUB_MODELS_ENDPOINT.to_string(),
            credential: Some("key".into()),
            model_info: Some(model_info()),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("model is required"));

        let config = AzureAiConfig {
            endpoint: "https://endpoint".to_string(),
            credential: Some("key".into()),
            model: "model".to_string(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("model_info is required"));
    }

    #[test]
    fn test_validate_rejects_non_http_endpoint() {
        let config = AzureAiConfig::new("endpoint", "key", "model", model_info());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("http"));
    }

    #[test]
    fn test_chat_completions_url_trims_trailing_slash() {
        let config = AzureAiConfig::new("https://endpoint/", "key", "model", model_info());
        assert_eq!(
            config.chat_completions_url(),
            "https://endpoint/chat/completions"
        );
    }

    #[test]
    fn test_credential_debug_is_redacted() {
        let credential = KeyCredential::new("super-secret");
        let debug = format!("{credential:?}");
        assert!(!debug.contains("super-secret"));
    }
}
