use httpmock::Method::POST;
use httpmock::MockServer;
use serde_json::json;

use store_agents_rs::llm::{is_error_text, GenerationClient, TextGenerator};
use store_agents_rs::ClientConfig;

mod common;
use common::fast_client_config;

fn client_for(server: &MockServer) -> GenerationClient {
    let cfg = ClientConfig {
        base_url: server.base_url(),
        ..fast_client_config()
    };
    GenerationClient::new(cfg).unwrap()
}

#[test]
fn posts_generate_body_and_reads_response_field() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/generate")
            .json_body_partial(
                r#"{"model": "llama3.2", "prompt": "Find a cheap sedan", "system": "You are sales.", "stream": false}"#,
            );
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({"model": "llama3.2", "response": "Try a 2019 Corolla.", "done": true}));
    });

    let client = client_for(&server);
    let text = client.generate("llama3.2", "Find a cheap sedan", "You are sales.");

    mock.assert();
    assert_eq!(text, "Try a 2019 Corolla.");
}

#[test]
fn server_errors_are_retried_then_reported() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/api/generate");
        then.status(500).body("model not loaded");
    });

    let client = client_for(&server);
    let text = client.generate("llama3.2", "anything", "");

    mock.assert_hits(3);
    assert!(is_error_text(&text));
    assert!(text.contains("500"), "unexpected text: {}", text);
}

#[test]
fn malformed_json_counts_as_failure() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/api/generate");
        then.status(200).body("<html>proxy error</html>");
    });

    let client = client_for(&server);
    let text = client.generate("llama3.2", "anything", "");

    mock.assert_hits(3);
    assert!(text.contains("parse_error"), "unexpected text: {}", text);
}

#[test]
fn unreachable_server_yields_error_text() {
    let cfg = ClientConfig {
        base_url: "http://127.0.0.1:9".to_string(),
        max_retries: 2,
        ..fast_client_config()
    };
    let client = GenerationClient::new(cfg).unwrap();
    let text = client.generate("llama3.2", "hello", "");
    assert!(is_error_text(&text));
    assert!(text.contains("after 2 attempts"));
}
