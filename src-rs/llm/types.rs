use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

/// Prefix carried by every failure string the generation client returns.
pub const ERROR_PREFIX: &str = "Error:";
const UNEXPECTED_PREFIX: &str = "Unexpected error:";

/// True when `text` is a failure string rather than a model answer.
pub fn is_error_text(text: &str) -> bool {
    text.starts_with(ERROR_PREFIX) || text.starts_with(UNEXPECTED_PREFIX)
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub model: String,
    pub prompt: String,
    pub system_prompt: String,
    pub format: Option<String>,
    pub agent_type: Option<String>,
}

impl GenerationRequest {
    pub fn new(model: &str, prompt: &str, system_prompt: &str) -> Self {
        Self {
            model: model.to_string(),
            prompt: prompt.to_string(),
            system_prompt: system_prompt.to_string(),
            format: None,
            agent_type: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerateOptions {
    pub temperature: f64,
    pub top_k: u32,
    pub top_p: f64,
}

/// Body of `POST /api/generate`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeneratePayload {
    pub model: String,
    pub prompt: String,
    pub system: String,
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<GenerateOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

#[derive(Clone, Debug, Error)]
#[error("{code}: {message}")]
pub struct ProviderError {
    pub code: String,
    pub message: String,
}

impl ProviderError {
    pub fn new(code: &str, message: &str) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
        }
    }
}

/// Lifecycle notification emitted by the generation client.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InteractionEvent {
    Request {
        model: String,
        prompt_length: usize,
        system_prompt_length: usize,
        request_id: u64,
        agent_type: Option<String>,
        attempt: u32,
    },
    Response {
        response_length: usize,
        request_id: u64,
        agent_type: Option<String>,
        attempt: u32,
    },
    Error {
        error: String,
        request_id: u64,
        agent_type: Option<String>,
        attempts: u32,
    },
}

impl InteractionEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            InteractionEvent::Request { .. } => "request",
            InteractionEvent::Response { .. } => "response",
            InteractionEvent::Error { .. } => "error",
        }
    }

    /// Payload as a flat mapping, without the `type` tag.
    pub fn data(&self) -> Value {
        let mut value = serde_json::to_value(self).unwrap_or_else(|_| json!({}));
        if let Some(map) = value.as_object_mut() {
            map.remove("type");
            map.insert(
                "success".to_string(),
                Value::Bool(!matches!(self, InteractionEvent::Error { .. })),
            );
        }
        value
    }
}

/// Sends one generation payload and returns the `response` text.
pub trait Transport: Send + Sync {
    fn send(&self, endpoint: &str, payload: &GeneratePayload) -> Result<String, ProviderError>;
}

/// Anything that turns a prompt into text. Failures come back as strings
/// starting with [`ERROR_PREFIX`]; implementations never return `Err`.
pub trait TextGenerator: Send + Sync {
    fn generate_with(&self, request: GenerationRequest) -> String;

    fn generate(&self, model: &str, prompt: &str, system_prompt: &str) -> String {
        self.generate_with(GenerationRequest::new(model, prompt, system_prompt))
    }
}
