//! Integration tests for the /prompt relay endpoint.
//!
//! All tests script the model provider with a mock; each covers one piece of
//! the client-visible contract.
//! Run with: cargo test -p chat-service --test prompt

use chat_service::config::ChatConfig;
use chat_service::models::Role;
use chat_service::services::providers::mock::MockTextProvider;
use chat_service::startup::Application;
use reqwest::Client;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

/// Spawn the application against the given mock and return the port number.
async fn spawn_app(provider: Arc<MockTextProvider>) -> u16 {
    // Set test environment variables
    std::env::set_var("ENVIRONMENT", "test");
    std::env::set_var("APP__PORT", "0"); // Random port
    std::env::set_var("LANGUAGE_MODEL_API_KEY", "test-api-key");
    std::env::set_var("CHAT_TEXT_MODEL", "gemini-pro");

    let config = ChatConfig::load().expect("Failed to load config");
    let app = Application::build_with_provider(config, provider)
        .await
        .expect("Failed to build application");

    let port = app.port();

    // Spawn the server in the background
    tokio::spawn(async move {
        let _ = app.run_until_stopped().await;
    });

    // Wait for server to start
    tokio::time::sleep(Duration::from_millis(100)).await;

    port
}

async fn post_prompt(port: u16, body: Value) -> reqwest::Response {
    Client::new()
        .post(format!("http://localhost:{}/prompt", port))
        .json(&body)
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .expect("Failed to send request")
}

#[tokio::test]
async fn clean_message_has_no_grammar_error_fields() {
    let mock = Arc::new(MockTextProvider::with_replies("NO", "Glad to hear it!"));
    let port = spawn_app(mock).await;

    let response = post_prompt(
        port,
        json!({
            "userInput": { "userType": "user", "message": "I am happy." },
            "messageHistory": []
        }),
    )
    .await;

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["userType"], "model");
    assert_eq!(body["message"], "Glad to hear it!");
    assert_eq!(body["grammarCheck"]["isGrammarErrors"], false);
    assert!(body["grammarCheck"].get("errorDescription").is_none());
}

#[tokio::test]
async fn grammar_errors_are_reported_verbatim() {
    let verdict = "Subject-verb agreement: \"I are\" should be \"I am\".";
    let mock = Arc::new(MockTextProvider::with_replies(verdict, "I see."));
    let port = spawn_app(mock).await;

    let response = post_prompt(
        port,
        json!({
            "userInput": { "userType": "user", "message": "I are happy." },
            "messageHistory": []
        }),
    )
    .await;

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["userType"], "model");
    assert_eq!(body["message"], "I see.");
    assert_eq!(body["grammarCheck"]["isGrammarErrors"], true);
    assert_eq!(body["grammarCheck"]["errorDescription"], verdict);
}

#[tokio::test]
async fn missing_user_input_returns_placeholder() {
    let mock = Arc::new(MockTextProvider::new());
    let port = spawn_app(mock.clone()).await;

    let response = post_prompt(
        port,
        json!({
            "messageHistory": [
                { "userType": "user", "message": "hello" }
            ]
        }),
    )
    .await;

    // HTTP 200 with the placeholder body, regardless of history contents
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body, json!({ "message": "Please enter message" }));

    // Missing input short-circuits: the model is never called
    assert!(mock.chat_calls().is_empty());
}

#[tokio::test]
async fn provider_failure_returns_internal_error() {
    let mock = Arc::new(MockTextProvider::failing());
    let port = spawn_app(mock).await;

    let response = post_prompt(
        port,
        json!({
            "userInput": { "userType": "user", "message": "I am happy." },
            "messageHistory": []
        }),
    )
    .await;

    // Failures are reported with HTTP 200 and a uniform body
    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body, json!({ "message": "Internal Error" }));
}

#[tokio::test]
async fn history_is_forwarded_in_order() {
    let mock = Arc::new(MockTextProvider::new());
    let port = spawn_app(mock.clone()).await;

    let response = post_prompt(
        port,
        json!({
            "userInput": { "userType": "user", "message": "Four" },
            "messageHistory": [
                { "userType": "user", "message": "One" },
                { "userType": "model", "message": "Two" },
                { "userType": "user", "message": "Three" }
            ]
        }),
    )
    .await;

    assert!(response.status().is_success());

    let calls = mock.chat_calls();
    assert_eq!(calls.len(), 1);

    let (history, message) = &calls[0];
    assert_eq!(history.len(), 3);
    assert_eq!(history[0].role, Role::User);
    assert_eq!(history[0].message, "One");
    assert_eq!(history[1].role, Role::Model);
    assert_eq!(history[1].message, "Two");
    assert_eq!(history[2].role, Role::User);
    assert_eq!(history[2].message, "Three");
    assert_eq!(message, "Four");
}

#[tokio::test]
async fn empty_history_is_accepted() {
    let mock = Arc::new(MockTextProvider::new());
    let port = spawn_app(mock.clone()).await;

    let response = post_prompt(
        port,
        json!({
            "userInput": { "userType": "user", "message": "hello" }
        }),
    )
    .await;

    assert!(response.status().is_success());

    let calls = mock.chat_calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].0.is_empty());
}

#[tokio::test]
async fn unknown_role_is_rejected_as_malformed() {
    let mock = Arc::new(MockTextProvider::new());
    let port = spawn_app(mock).await;

    let response = post_prompt(
        port,
        json!({
            "userInput": { "userType": "system", "message": "hello" },
            "messageHistory": []
        }),
    )
    .await;

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn oversized_message_is_rejected() {
    let mock = Arc::new(MockTextProvider::new());
    let port = spawn_app(mock).await;

    let response = post_prompt(
        port,
        json!({
            "userInput": { "userType": "user", "message": "x".repeat(40_000) },
            "messageHistory": []
        }),
    )
    .await;

    assert_eq!(response.status().as_u16(), 422);
}

#[tokio::test]
async fn prompt_requests_show_up_in_metrics() {
    let mock = Arc::new(MockTextProvider::new());
    let port = spawn_app(mock).await;

    let response = post_prompt(
        port,
        json!({
            "userInput": { "userType": "user", "message": "hello" },
            "messageHistory": []
        }),
    )
    .await;
    assert!(response.status().is_success());

    let metrics = Client::new()
        .get(format!("http://localhost:{}/metrics", port))
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .expect("Failed to send request")
        .text()
        .await
        .expect("Failed to read body");

    assert!(metrics.contains("prompt_requests_total"));
    assert!(metrics.contains("provider_latency_seconds"));
}
