//! Integration tests for the OpenAI provider
//!
//! A wiremock server stands in for the chat completions endpoint so the
//! request shape (auth header, tools block) and both response shapes
//! (text and tool call) can be pinned down.

use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sdk::ToolDefinition;
use steward_engine::config::OpenAIConfig;
use steward_engine::llm::openai::OpenAIProvider;
use steward_engine::llm::{Message, ModelProvider, ProviderError};

fn provider_for(server: &MockServer) -> OpenAIProvider {
    let config = OpenAIConfig {
        api_key: Some("test-key".to_string()),
        base_url: server.uri(),
        model: "gpt-4o-mini".to_string(),
    };
    OpenAIProvider::new(&config, 0.7, 256).unwrap()
}

fn calculator_definition() -> ToolDefinition {
    ToolDefinition {
        name: "calculator".to_string(),
        description: "Performs basic arithmetic operations".to_string(),
        parameters: json!({ "type": "object", "properties": {} }),
    }
}

#[tokio::test]
async fn test_generate_parses_text_choice_and_usage() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [
                { "message": { "role": "assistant", "content": "Four." } }
            ],
            "usage": { "prompt_tokens": 12, "completion_tokens": 3, "total_tokens": 15 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let response = provider
        .generate(&[Message::user("What is 2 + 2?")], &[])
        .await
        .unwrap();

    assert_eq!(response.content, "Four.");
    assert!(response.call.is_none());

    let usage = response.usage.unwrap();
    assert_eq!(usage.prompt_tokens, 12);
    assert_eq!(usage.total_tokens, 15);
}

#[tokio::test]
async fn test_generate_parses_tool_call() {
    let server = MockServer::start().await;

    // Tool-call choices carry null content and the arguments as a string
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [
                {
                    "message": {
                        "role": "assistant",
                        "content": null,
                        "tool_calls": [
                            {
                                "id": "call_1",
                                "type": "function",
                                "function": {
                                    "name": "calculator",
                                    "arguments": "{\"operation\": \"add\", \"a\": 2, \"b\": 2}"
                                }
                            }
                        ]
                    }
                }
            ]
        })))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let response = provider
        .generate(&[Message::user("What is 2 + 2?")], &[calculator_definition()])
        .await
        .unwrap();

    assert_eq!(response.content, "");
    let call = response.call.unwrap();
    assert_eq!(call.name, "calculator");
    assert!(call.arguments.contains("\"operation\""));
    assert!(response.usage.is_none());
}

#[tokio::test]
async fn test_request_advertises_tools() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("\"tool_choice\":\"auto\""))
        .and(body_string_contains("\"name\":\"calculator\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [
                { "message": { "role": "assistant", "content": "ok" } }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let response = provider
        .generate(&[Message::user("2+2")], &[calculator_definition()])
        .await
        .unwrap();

    assert_eq!(response.content, "ok");
}

#[tokio::test]
async fn test_empty_choices_is_a_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let error = provider
        .generate(&[Message::user("hello")], &[])
        .await
        .unwrap_err();

    match error {
        ProviderError::Parse(message) => {
            assert!(message.contains("No choices"));
        }
        other => panic!("Expected Parse error, got: {:?}", other),
    }
}

#[tokio::test]
async fn test_auth_rejection_maps_to_authentication_failed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(403).set_body_string("key revoked"))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let error = provider
        .generate(&[Message::user("hello")], &[])
        .await
        .unwrap_err();

    match error {
        ProviderError::AuthenticationFailed(message) => {
            assert!(message.contains("key revoked"));
        }
        other => panic!("Expected AuthenticationFailed, got: {:?}", other),
    }
}
