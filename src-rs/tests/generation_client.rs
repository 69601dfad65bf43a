use std::sync::Arc;

use store_agents_rs::llm::{
    is_error_text, GenerationClient, GenerationRequest, InteractionEvent, TextGenerator,
};

mod common;
use common::{count_kind, event_recorder, fast_client_config, FlakyTransport};

#[test]
fn recovers_after_two_failures() {
    let transport = Arc::new(FlakyTransport::new(2, "Hello from the showroom floor"));
    let (callback, events) = event_recorder();
    let client = GenerationClient::with_transport(fast_client_config(), transport.clone())
        .with_interaction_callback(callback);

    let text = client.generate("llama3.2", "Find a cheap sedan", "You are sales.");

    assert_eq!(text, "Hello from the showroom floor");
    assert_eq!(transport.calls(), 3);
    let events = events.lock().unwrap();
    assert_eq!(count_kind(&events, "request"), 3);
    assert_eq!(count_kind(&events, "response"), 1);
    assert_eq!(count_kind(&events, "error"), 0);
}

#[test]
fn exhausted_retries_return_error_text() {
    let transport = Arc::new(FlakyTransport::always_failing());
    let (callback, events) = event_recorder();
    let client = GenerationClient::with_transport(fast_client_config(), transport.clone())
        .with_interaction_callback(callback);

    let text = client.generate("llama3.2", "Explain a 60-month loan", "");

    assert!(is_error_text(&text), "unexpected text: {}", text);
    assert!(text.contains("after 3 attempts"));
    assert_eq!(transport.calls(), 3);
    let events = events.lock().unwrap();
    assert_eq!(count_kind(&events, "request"), 3);
    assert_eq!(count_kind(&events, "response"), 0);
    assert_eq!(count_kind(&events, "error"), 1);
    match events.last().unwrap() {
        InteractionEvent::Error { attempts, request_id, .. } => {
            assert_eq!(*attempts, 3);
            assert_eq!(*request_id, 3);
        }
        other => panic!("expected error event, got {:?}", other),
    }
}

#[test]
fn request_events_carry_attempt_and_running_counter() {
    let transport = Arc::new(FlakyTransport::new(1, "second time lucky"));
    let (callback, events) = event_recorder();
    let client = GenerationClient::with_transport(fast_client_config(), transport)
        .with_interaction_callback(callback);

    let mut request = GenerationRequest::new("llama3.2", "abcd", "xy");
    request.agent_type = Some("finance".to_string());
    client.generate_with(request);
    client.generate("llama3.2", "again", "");

    let events = events.lock().unwrap();
    let requests: Vec<(u64, u32)> = events
        .iter()
        .filter_map(|e| match e {
            InteractionEvent::Request { request_id, attempt, .. } => Some((*request_id, *attempt)),
            _ => None,
        })
        .collect();
    assert_eq!(requests, vec![(1, 1), (2, 2), (3, 1)]);
    assert_eq!(client.request_count(), 3);

    match &events[0] {
        InteractionEvent::Request {
            prompt_length,
            system_prompt_length,
            agent_type,
            ..
        } => {
            assert_eq!(*prompt_length, 4);
            assert_eq!(*system_prompt_length, 2);
            assert_eq!(agent_type.as_deref(), Some("finance"));
        }
        other => panic!("expected request event, got {:?}", other),
    }
}

#[test]
fn works_without_an_observer() {
    let transport = Arc::new(FlakyTransport::always_failing());
    let client = GenerationClient::with_transport(fast_client_config(), transport);
    assert!(is_error_text(&client.generate("llama3.2", "", "")));
}

#[test]
fn empty_model_is_rejected_without_sending() {
    let transport = Arc::new(FlakyTransport::new(0, "unused"));
    let (callback, events) = event_recorder();
    let client = GenerationClient::with_transport(fast_client_config(), transport.clone())
        .with_interaction_callback(callback);

    let text = client.generate("", "prompt", "");

    assert!(is_error_text(&text));
    assert_eq!(transport.calls(), 0);
    let events = events.lock().unwrap();
    assert_eq!(count_kind(&events, "error"), 1);
    assert_eq!(count_kind(&events, "request"), 0);
}

#[test]
fn payload_carries_options_and_format() {
    let transport = Arc::new(FlakyTransport::new(0, "{\"ok\": true}"));
    let client = GenerationClient::with_transport(fast_client_config(), transport.clone());

    let mut request = GenerationRequest::new("llama3.2", "list cars", "be terse");
    request.format = Some("json".to_string());
    client.generate_with(request);

    let payload = &transport.payloads()[0];
    assert_eq!(payload.system, "be terse");
    assert!(!payload.stream);
    assert_eq!(payload.format.as_deref(), Some("json"));
    let options = payload.options.as_ref().unwrap();
    assert_eq!(options.top_k, 40);
    assert!((options.temperature - 0.7).abs() < f64::EPSILON);
}
