//! Integration tests for the Ollama provider
//!
//! These tests do NOT require a running Ollama instance; a wiremock server
//! plays the role of the chat API so wire format and error mapping can be
//! verified exactly.

use serde_json::json;
use wiremock::matchers::{body_partial_json, body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use steward_engine::config::OllamaConfig;
use steward_engine::llm::ollama::OllamaProvider;
use steward_engine::llm::{Message, ModelProvider, ProviderError};

fn provider_for(server: &MockServer) -> OllamaProvider {
    let config = OllamaConfig {
        base_url: server.uri(),
        model: "llama3.1:8b".to_string(),
    };
    OllamaProvider::new(&config, 0.2, 64)
}

fn conversation() -> Vec<Message> {
    vec![
        Message::system("You are a helpful assistant"),
        Message::user("Say hello"),
    ]
}

#[tokio::test]
async fn test_generate_parses_content_and_usage() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "llama3.1:8b",
            "message": { "role": "assistant", "content": "Hello!" },
            "done": true,
            "prompt_eval_count": 10,
            "eval_count": 5
        })))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let response = provider.generate(&conversation(), &[]).await.unwrap();

    assert_eq!(response.content, "Hello!");
    assert!(response.call.is_none());

    let usage = response.usage.unwrap();
    assert_eq!(usage.prompt_tokens, 10);
    assert_eq!(usage.completion_tokens, 5);
    assert_eq!(usage.total_tokens, 15);
}

#[tokio::test]
async fn test_request_carries_model_and_sampling_options() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_partial_json(json!({
            "model": "llama3.1:8b",
            "stream": false,
            "options": { "temperature": 0.2, "num_predict": 64 }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": { "role": "assistant", "content": "ok" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let response = provider.generate(&conversation(), &[]).await.unwrap();
    assert_eq!(response.content, "ok");
}

#[tokio::test]
async fn test_tool_definitions_are_not_forwarded() {
    let server = MockServer::start().await;

    // Any request mentioning tools would hit this mock and fail the
    // expectation check on teardown.
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_string_contains("tools"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": { "role": "assistant", "content": "no tools here" }
        })))
        .mount(&server)
        .await;

    let definitions = vec![sdk::ToolDefinition {
        name: "calculator".to_string(),
        description: "Performs basic arithmetic operations".to_string(),
        parameters: json!({ "type": "object", "properties": {} }),
    }];

    let provider = provider_for(&server);
    let response = provider.generate(&conversation(), &definitions).await.unwrap();

    assert_eq!(response.content, "no tools here");
    assert!(response.call.is_none());
}

#[tokio::test]
async fn test_auth_failure_maps_to_authentication_failed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let error = provider.generate(&conversation(), &[]).await.unwrap_err();

    match error {
        ProviderError::AuthenticationFailed(message) => {
            assert!(message.contains("unauthorized"));
        }
        other => panic!("Expected AuthenticationFailed, got: {:?}", other),
    }
}

#[tokio::test]
async fn test_rate_limit_maps_to_rate_limited() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let error = provider.generate(&conversation(), &[]).await.unwrap_err();

    assert!(matches!(error, ProviderError::RateLimited));
}

#[tokio::test]
async fn test_server_error_maps_to_invalid_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model exploded"))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let error = provider.generate(&conversation(), &[]).await.unwrap_err();

    match error {
        ProviderError::InvalidRequest(message) => {
            assert!(message.contains("500"));
            assert!(message.contains("model exploded"));
        }
        other => panic!("Expected InvalidRequest, got: {:?}", other),
    }
}

#[tokio::test]
async fn test_connection_error_maps_to_transport_variant() {
    // Nothing listens on the discard port, so the connection is refused
    let config = OllamaConfig {
        base_url: "http://127.0.0.1:9".to_string(),
        model: "llama3.1:8b".to_string(),
    };
    let provider = OllamaProvider::new(&config, 0.2, 64);

    let error = provider.generate(&conversation(), &[]).await.unwrap_err();

    match error {
        ProviderError::Unavailable(_) => {}
        ProviderError::Network(_) => {
            // Also acceptable - refused connections can surface either way
        }
        other => panic!("Expected Unavailable or Network, got: {:?}", other),
    }
}
