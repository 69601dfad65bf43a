pub mod client;
pub mod ollama_adapter;
pub mod types;

pub use client::GenerationClient;
pub use ollama_adapter::{generate_endpoint, OllamaTransport, GENERATE_PATH};
pub use types::{
    is_error_text, GenerateOptions, GeneratePayload, GenerationRequest, InteractionEvent,
    ProviderError, TextGenerator, Transport, ERROR_PREFIX,
};
