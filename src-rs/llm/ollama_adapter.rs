use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::Value;

use super::types::{GeneratePayload, ProviderError, Transport};

pub const GENERATE_PATH: &str = "/api/generate";

/// Blocking HTTP transport for an Ollama server.
pub struct OllamaTransport {
    client: Client,
}

impl OllamaTransport {
    pub fn new(timeout: Duration) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ProviderError::new("client_error", &err.to_string()))?;
        Ok(Self { client })
    }
}

impl Transport for OllamaTransport {
    fn send(&self, endpoint: &str, payload: &GeneratePayload) -> Result<String, ProviderError> {
        let resp = self
            .client
            .post(endpoint)
            .header("Content-Type", "application/json")
            .json(payload)
            .send()
            .map_err(|err| {
                let code = if err.is_timeout() { "timeout" } else { "network_error" };
                ProviderError::new(code, &err.to_string())
            })?;

        let status = resp.status();
        let body = resp.text().unwrap_or_default();
        if status.is_client_error() || status.is_server_error() {
            let code = if status.is_server_error() { "server_error" } else { "api_error" };
            return Err(ProviderError::new(
                code,
                &format!("http {}: {}", status.as_u16(), body),
            ));
        }

        parse_response(&body)
    }
}

pub fn generate_endpoint(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), GENERATE_PATH)
}

fn parse_response(body: &str) -> Result<String, ProviderError> {
    let raw: Value = serde_json::from_str(body)
        .map_err(|_| ProviderError::new("parse_error", "invalid json"))?;
    Ok(raw
        .get("response")
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string())
}
