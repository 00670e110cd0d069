//! Integration tests for the models action

use actionloop::actions::{Action, ModelsAction};
use actionloop::config::OpenAiConfig;
use actionloop::params::{EnvSnapshot, OPENAI_API_HOST, OPENAI_API_KEY, Params};
use actionloop::response::ActionResponse;
use serde_json::json;
use wiremock::matchers::{any, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn listing() -> serde_json::Value {
    json!({
        "object": "list",
        "data": [
            {"id": "gpt-35-turbo", "object": "model", "created": 0, "owned_by": "system"},
            {"id": "gpt-4o", "object": "model", "created": 0, "owned_by": "system"}
        ]
    })
}

fn models_action(fallback_host: &str) -> ModelsAction {
    let config = OpenAiConfig {
        fallback_host: fallback_host.to_string(),
        ..OpenAiConfig::default()
    };
    ModelsAction::new(reqwest::Client::new(), &config)
}

#[tokio::test]
async fn test_missing_key_makes_no_outbound_call() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let action = models_action(&server.uri());

    let absent = action.invoke(&Params::new(), &EnvSnapshot::new()).await;
    assert_eq!(
        serde_json::to_value(&absent).unwrap(),
        json!({"error": "OpenAI Key is not set"})
    );

    let empty = action
        .invoke(
            &Params::new().with(OPENAI_API_KEY, "").with(OPENAI_API_HOST, server.uri()),
            &EnvSnapshot::new(),
        )
        .await;
    assert_eq!(empty, ActionResponse::error("OpenAI Key is not set"));
}

#[tokio::test]
async fn test_returns_serialized_listing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/models"))
        .and(header("authorization", "Bearer sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing()))
        .expect(1)
        .mount(&server)
        .await;

    let params = Params::new()
        .with(OPENAI_API_KEY, "sk-test")
        .with(OPENAI_API_HOST, server.uri());

    let response = models_action("openai.nuvolaris.io")
        .invoke(&params, &EnvSnapshot::new())
        .await;

    let text = response.body_text().expect("should have text body");
    let parsed: serde_json::Value = serde_json::from_str(text).expect("body should be JSON text");
    assert_eq!(parsed, listing());
    assert_eq!(text, serde_json::to_string_pretty(&listing()).unwrap());
}

#[tokio::test]
async fn test_defaults_to_fallback_host() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing()))
        .expect(1)
        .mount(&server)
        .await;

    let action = models_action(&server.uri());
    let params = Params::new().with(OPENAI_API_KEY, "sk-test");
    assert_eq!(action.target_host(&params), server.uri());

    let response = action.invoke(&params, &EnvSnapshot::new()).await;
    assert!(!response.is_error(), "unexpected error: {:?}", response);
}

#[test]
fn test_literal_fallback_host_by_default() {
    let action = ModelsAction::new(reqwest::Client::new(), &OpenAiConfig::default());
    let params = Params::new().with(OPENAI_API_KEY, "sk-test");
    assert_eq!(action.target_host(&params), "openai.nuvolaris.io");
}

#[tokio::test]
async fn test_auth_failure_is_structured_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    let params = Params::new()
        .with(OPENAI_API_KEY, "sk-wrong")
        .with(OPENAI_API_HOST, server.uri());

    let response = models_action("openai.nuvolaris.io")
        .invoke(&params, &EnvSnapshot::new())
        .await;
    match response {
        ActionResponse::Error(message) => {
            assert!(message.contains("401"));
            assert!(message.contains("invalid api key"));
        }
        other => panic!("expected error response, got {:?}", other),
    }
}

#[tokio::test]
async fn test_non_json_listing_is_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let params = Params::new()
        .with(OPENAI_API_KEY, "sk-test")
        .with(OPENAI_API_HOST, server.uri());

    let response = models_action("openai.nuvolaris.io")
        .invoke(&params, &EnvSnapshot::new())
        .await;
    assert!(response.is_error());
}

#[tokio::test]
async fn test_repeated_invocations_are_identical() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing()))
        .expect(2)
        .mount(&server)
        .await;

    let action = models_action("openai.nuvolaris.io");
    let params = Params::new()
        .with(OPENAI_API_KEY, "sk-test")
        .with(OPENAI_API_HOST, server.uri());

    let first = serde_json::to_vec(&action.invoke(&params, &EnvSnapshot::new()).await).unwrap();
    let second = serde_json::to_vec(&action.invoke(&params, &EnvSnapshot::new()).await).unwrap();
    assert_eq!(first, second);
}
