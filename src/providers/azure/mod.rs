//! Azure AI model inference provider.
//!
//! Serves the OpenAI-compatible chat completions route exposed by Azure AI
//! Foundry serverless deployments and the GitHub Models endpoint.

pub mod chat;
pub mod client;
pub mod config;
pub mod streaming;
pub mod thinking;
pub mod types;

pub use client::{AzureAiChatCompletionClient, AzureAiChatCompletionClientBuilder};
pub use config::{AzureAiConfig, GITHUB_MODELS_ENDPOINT, KeyCredential};
