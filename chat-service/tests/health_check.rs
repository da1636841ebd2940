//! Integration tests for chat-service health and readiness endpoints.
//!
//! These tests run against the mock provider; no external API is contacted.
//! Run with: cargo test -p chat-service --test health_check

use chat_service::config::ChatConfig;
use chat_service::services::providers::mock::MockTextProvider;
use chat_service::services::providers::TextProvider;
use chat_service::startup::Application;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

/// Spawn the application on a random port and return the port number.
async fn spawn_app(provider: Arc<dyn TextProvider>) -> u16 {
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

#[tokio::test]
async fn health_check_returns_ok() {
    let port = spawn_app(Arc::new(MockTextProvider::new())).await;
    let client = Client::new();

    let response = client
        .get(format!("http://localhost:{}/health", port))
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "chat-service");
}

#[tokio::test]
async fn readiness_check_returns_ok_when_provider_is_healthy() {
    let port = spawn_app(Arc::new(MockTextProvider::new())).await;
    let client = Client::new();

    let response = client
        .get(format!("http://localhost:{}/ready", port))
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
}

#[tokio::test]
async fn readiness_check_fails_when_provider_is_down() {
    let port = spawn_app(Arc::new(MockTextProvider::failing())).await;
    let client = Client::new();

    let response = client
        .get(format!("http://localhost:{}/ready", port))
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 503);
}

#[tokio::test]
async fn metrics_endpoint_serves_prometheus_text() {
    let port = spawn_app(Arc::new(MockTextProvider::new())).await;
    let client = Client::new();

    let response = client
        .get(format!("http://localhost:{}/metrics", port))
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    // Body may be empty until a counter is first incremented; it must not
    // report an uninitialized registry.
    let body = response.text().await.expect("Failed to read body");
    assert!(!body.contains("not initialized"));
}
