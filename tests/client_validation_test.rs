//! Construction-time validation of the Azure AI chat client.
//!
//! Every required field missing from the configuration must fail with an
//! error naming that field.

use azure_ai_chat::prelude::*;

fn model_info() -> ModelInfo {
    ModelInfo::builder()
        .family(ModelFamily::Unknown)
        .build()
        .unwrap()
}

#[test]
fn missing_endpoint_is_rejected() {
    let err = AzureAiChatCompletionClient::builder()
        .credential("api_key")
        .model("model")
        .model_info(model_info())
        .build()
        .unwrap_err();

    assert!(err.to_string().contains("endpoint is required"));
}

#[test]
fn missing_credential_is_rejected() {
    let err = AzureAiChatCompletionClient::builder()
        .endpoint("https://endpoint")
        .model("model")
        .model_info(model_info())
        .build()
        .unwrap_err();

    assert!(err.to_string().contains("credential is required"));
}

#[test]
fn missing_model_is_rejected() {
    let err = AzureAiChatCompletionClient::builder()
        .endpoint(GITHUB_MODELS_ENDPOINT)
        .credential("api_key")
        .model_info(model_info())
        .build()
        .unwrap_err();

    assert!(err.to_string().contains("model is required"));
}

#[test]
fn missing_model_info_is_rejected() {
    let err = AzureAiChatCompletionClient::builder()
        .endpoint("https://endpoint")
        .credential("api_key")
        .model("model")
        .build()
        .unwrap_err();

    assert!(err.to_string().contains("model_info is required"));
}

#[test]
fn model_info_without_family_is_rejected() {
    let err = ModelInfo::builder()
        .json_output(false)
        .function_calling(false)
        .vision(false)
        .build()
        .unwrap_err();

    assert!(err.to_string().contains("Missing required field 'family'"));
}

#[test]
fn complete_configuration_builds() {
    let client = AzureAiChatCompletionClient::builder()
        .endpoint(GITHUB_MODELS_ENDPOINT)
        .credential("api_key")
        .model("model")
        .model_info(model_info())
        .build()
        .unwrap();

    assert_eq!(client.model(), "model");
    assert_eq!(client.model_info().family, ModelFamily::Unknown);
}

#[test]
fn config_constructor_round_trips() {
    let config = AzureAiConfig::new("https://endpoint", "api_key", "model", model_info());
    assert!(AzureAiChatCompletionClient::new(config).is_ok());
}
