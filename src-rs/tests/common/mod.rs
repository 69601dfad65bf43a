#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use store_agents_rs::llm::{
    GeneratePayload, GenerationRequest, InteractionEvent, ProviderError, TextGenerator, Transport,
};
use store_agents_rs::{ClientConfig, InteractionCallback, LogCallback, LogKind};

/// Fails the first `failures` sends, then answers with `reply`.
pub struct FlakyTransport {
    failures: usize,
    reply: String,
    calls: AtomicUsize,
    payloads: Mutex<Vec<GeneratePayload>>,
}

impl FlakyTransport {
    pub fn new(failures: usize, reply: &str) -> Self {
        Self {
            failures,
            reply: reply.to_string(),
            calls: AtomicUsize::new(0),
            payloads: Mutex::new(Vec::new()),
        }
    }

    pub fn always_failing() -> Self {
        Self::new(usize::MAX, "")
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn payloads(&self) -> Vec<GeneratePayload> {
        self.payloads.lock().unwrap().clone()
    }
}

impl Transport for FlakyTransport {
    fn send(&self, _endpoint: &str, payload: &GeneratePayload) -> Result<String, ProviderError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        self.payloads.lock().unwrap().push(payload.clone());
        if call < self.failures {
            Err(ProviderError::new("network_error", "connection refused"))
        } else {
            Ok(self.reply.clone())
        }
    }
}

/// Generator that always answers `reply` and remembers every request.
pub struct CannedGenerator {
    reply: String,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl CannedGenerator {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl TextGenerator for CannedGenerator {
    fn generate_with(&self, request: GenerationRequest) -> String {
        self.requests.lock().unwrap().push(request);
        self.reply.clone()
    }
}

/// Panics on any prompt containing `trigger`, answers normally otherwise.
pub struct PanickyGenerator {
    pub trigger: String,
}

impl TextGenerator for PanickyGenerator {
    fn generate_with(&self, request: GenerationRequest) -> String {
        if request.prompt.contains(&self.trigger) {
            panic!("generator exploded");
        }
        "A sufficiently long canned answer.".to_string()
    }
}

pub fn fast_client_config() -> ClientConfig {
    ClientConfig {
        backoff_unit: Duration::ZERO,
        ..ClientConfig::default()
    }
}

pub fn event_recorder() -> (InteractionCallback, Arc<Mutex<Vec<InteractionEvent>>>) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    let callback: InteractionCallback = Arc::new(move |event: &InteractionEvent| {
        sink.lock().unwrap().push(event.clone());
    });
    (callback, events)
}

pub fn log_recorder() -> (LogCallback, Arc<Mutex<Vec<(String, LogKind)>>>) {
    let lines = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&lines);
    let callback: LogCallback = Arc::new(move |message: &str, kind: LogKind| {
        sink.lock().unwrap().push((message.to_string(), kind));
    });
    (callback, lines)
}

pub fn count_kind(events: &[InteractionEvent], kind: &str) -> usize {
    events.iter().filter(|e| e.kind() == kind).count()
}
