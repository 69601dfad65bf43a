use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;

use tracing::{debug, warn};

use super::ollama_adapter::{generate_endpoint, OllamaTransport};
use super::types::{
    GenerateOptions, GeneratePayload, GenerationRequest, InteractionEvent, ProviderError,
    TextGenerator, Transport, ERROR_PREFIX,
};
use crate::config::ClientConfig;
use crate::helpers::backoff_delay;
use crate::observer::InteractionCallback;

/// Generation client with bounded retries and exponential backoff.
///
/// Every failure mode ends as a returned string beginning with
/// [`ERROR_PREFIX`]; nothing escapes as `Err` or panic from `generate_with`.
pub struct GenerationClient {
    cfg: ClientConfig,
    transport: Arc<dyn Transport>,
    request_count: AtomicU64,
    interaction_callback: Option<InteractionCallback>,
}

impl GenerationClient {
    pub fn new(cfg: ClientConfig) -> Result<Self, ProviderError> {
        let transport = OllamaTransport::new(cfg.timeout)?;
        Ok(Self::with_transport(cfg, Arc::new(transport)))
    }

    pub fn with_transport(mut cfg: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        if cfg.base_url.is_empty() {
            cfg.base_url = ClientConfig::default().base_url;
        }
        Self {
            cfg,
            transport,
            request_count: AtomicU64::new(0),
            interaction_callback: None,
        }
    }

    pub fn with_interaction_callback(mut self, callback: InteractionCallback) -> Self {
        self.interaction_callback = Some(callback);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.cfg
    }

    pub fn endpoint(&self) -> String {
        generate_endpoint(&self.cfg.base_url)
    }

    /// Attempts issued so far, across all calls.
    pub fn request_count(&self) -> u64 {
        self.request_count.load(Ordering::SeqCst)
    }

    fn notify(&self, event: InteractionEvent) {
        if let Some(cb) = &self.interaction_callback {
            cb(&event);
        }
    }

    fn build_payload(&self, request: &GenerationRequest) -> GeneratePayload {
        GeneratePayload {
            model: request.model.clone(),
            prompt: request.prompt.clone(),
            system: request.system_prompt.clone(),
            stream: false,
            options: Some(GenerateOptions {
                temperature: self.cfg.temperature,
                top_k: self.cfg.top_k,
                top_p: self.cfg.top_p,
            }),
            format: request.format.clone(),
        }
    }
}

impl TextGenerator for GenerationClient {
    fn generate_with(&self, request: GenerationRequest) -> String {
        if request.model.trim().is_empty() {
            let message = "model must not be empty";
            self.notify(InteractionEvent::Error {
                error: message.to_string(),
                request_id: self.request_count(),
                agent_type: request.agent_type.clone(),
                attempts: 0,
            });
            return format!("{} {}", ERROR_PREFIX, message);
        }

        let endpoint = self.endpoint();
        let payload = self.build_payload(&request);
        let max_attempts = self.cfg.max_retries.max(1);
        let mut last_error = ProviderError::new("api_error", "request failed");
        let mut request_id = self.request_count();

        for attempt in 0..max_attempts {
            request_id = self.request_count.fetch_add(1, Ordering::SeqCst) + 1;
            self.notify(InteractionEvent::Request {
                model: request.model.clone(),
                prompt_length: request.prompt.chars().count(),
                system_prompt_length: request.system_prompt.chars().count(),
                request_id,
                agent_type: request.agent_type.clone(),
                attempt: attempt + 1,
            });
            debug!(%endpoint, model = %request.model, attempt = attempt + 1, "sending generation request");

            match self.transport.send(&endpoint, &payload) {
                Ok(text) => {
                    self.notify(InteractionEvent::Response {
                        response_length: text.chars().count(),
                        request_id,
                        agent_type: request.agent_type.clone(),
                        attempt: attempt + 1,
                    });
                    return text;
                }
                Err(err) => {
                    warn!(attempt = attempt + 1, max_attempts, error = %err, "generation attempt failed");
                    last_error = err;
                    if attempt + 1 < max_attempts {
                        thread::sleep(backoff_delay(
                            self.cfg.backoff_unit,
                            self.cfg.backoff_factor,
                            attempt,
                        ));
                    }
                }
            }
        }

        self.notify(InteractionEvent::Error {
            error: last_error.to_string(),
            request_id,
            agent_type: request.agent_type.clone(),
            attempts: max_attempts,
        });
        format!(
            "{} generation failed after {} attempts: {}",
            ERROR_PREFIX, max_attempts, last_error
        )
    }
}
