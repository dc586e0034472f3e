//! OpenAI-compatible provider contract tests
//!
//! Verify bearer auth, full-history submission across sequential calls,
//! parameter merging, model discovery, and the empty-content rule.

use dbchat_providers::{ChatSession, OpenAiProvider, ProviderKind, ProviderSettings};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings_for(server: &MockServer) -> ProviderSettings {
    ProviderSettings::new(ProviderKind::OpenAiCompatible, "gpt-4o", server.uri())
}

fn completion_body(content: &str) -> serde_json::Value {
    json!({
        "choices": [{"message": {"role": "assistant", "content": content}}]
    })
}

#[tokio::test]
async fn completion_sends_bearer_credential() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("hi")))
        .expect(1)
        .mount(&server)
        .await;

    let provider = OpenAiProvider::new(settings_for(&server).with_api_key("sk-test"));
    let mut session = ChatSession::new(Box::new(provider));

    let reply = session.send_message("hello", None).await.unwrap();
    assert_eq!(reply, "hi");
}

#[tokio::test]
async fn completion_works_without_credential() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("hi")))
        .expect(1)
        .mount(&server)
        .await;

    // Local compatible servers take unauthenticated requests.
    let mut session = ChatSession::new(Box::new(OpenAiProvider::new(settings_for(&server))));
    session.send_message("hello", None).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert!(!requests[0].headers.contains_key("authorization"));
}

#[tokio::test]
async fn sequential_calls_submit_the_full_accumulated_history() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("alpha")))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({
            "messages": [
                {"role": "user", "content": "a"},
                {"role": "assistant", "content": "alpha"},
                {"role": "user", "content": "b"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("beta")))
        .expect(1)
        .mount(&server)
        .await;

    let mut session = ChatSession::new(Box::new(OpenAiProvider::new(settings_for(&server))));
    session.send_message("a", None).await.unwrap();
    let reply = session.send_message("b", None).await.unwrap();

    assert_eq!(reply, "beta");
}

#[tokio::test]
async fn completion_carries_sampling_params_and_extras() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({
            "model": "gpt-4o",
            "max_tokens": 256,
            "top_p": 0.9
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("ok")))
        .expect(1)
        .mount(&server)
        .await;

    let mut extra = serde_json::Map::new();
    extra.insert("top_p".to_string(), json!(0.9));
    let provider = OpenAiProvider::new(
        settings_for(&server)
            .with_max_tokens(256)
            .with_temperature(0.2)
            .with_extra_params(extra),
    );

    ChatSession::new(Box::new(provider))
        .send_message("hello", None)
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert!(body["temperature"].is_number());
}

#[tokio::test]
async fn empty_content_is_an_empty_reply_not_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": null}}]
        })))
        .mount(&server)
        .await;

    let mut session = ChatSession::new(Box::new(OpenAiProvider::new(settings_for(&server))));
    let reply = session.send_message("hello", None).await.unwrap();

    assert_eq!(reply, "");
    assert_eq!(session.history().len(), 2);
    assert_eq!(session.history()[1].content, "");
}

#[tokio::test]
async fn completion_error_status_propagates_body_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    let mut session = ChatSession::new(Box::new(OpenAiProvider::new(settings_for(&server))));
    let err = session.send_message("hello", None).await.unwrap_err();

    assert!(err.is_generation());
    let rendered = err.to_string();
    assert!(rendered.contains("401"));
    assert!(rendered.contains("invalid api key"));
}

#[tokio::test]
async fn discovery_lists_model_ids() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/models"))
        .and(header("Authorization", "Bearer sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "list",
            "data": [{"id": "gpt-4o"}, {"id": "gpt-4o-mini"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = OpenAiProvider::new(settings_for(&server).with_api_key("sk-test"));
    let models = ChatSession::new(Box::new(provider)).list_models().await.unwrap();

    assert_eq!(models, vec!["gpt-4o".to_string(), "gpt-4o-mini".to_string()]);
}

#[tokio::test]
async fn discovery_error_status_is_a_discovery_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .mount(&server)
        .await;

    let err = ChatSession::new(Box::new(OpenAiProvider::new(settings_for(&server))))
        .list_models()
        .await
        .unwrap_err();

    assert!(err.is_discovery());
    assert!(err.to_string().contains("403"));
}
