use std::env;
use std::time::Duration;

use crate::config::{ClientConfig, DispatcherConfig};

fn env_opt(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Some(value.trim().to_string()),
        _ => None,
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env_opt(key).and_then(|raw| raw.parse::<T>().ok())
}

/// Client settings with `OLLAMA_URL`, `OLLAMA_MODEL`,
/// `STORE_AGENTS_TIMEOUT_SECS` and `STORE_AGENTS_MAX_RETRIES` applied.
pub fn client_config_from_env() -> ClientConfig {
    let mut cfg = ClientConfig::default();
    if let Some(url) = env_opt("OLLAMA_URL") {
        cfg.base_url = url;
    }
    if let Some(model) = env_opt("OLLAMA_MODEL") {
        cfg.model = model;
    }
    if let Some(secs) = env_parse::<u64>("STORE_AGENTS_TIMEOUT_SECS") {
        cfg.timeout = Duration::from_secs(secs);
    }
    if let Some(retries) = env_parse::<u32>("STORE_AGENTS_MAX_RETRIES") {
        cfg.max_retries = retries;
    }
    cfg
}

pub fn dispatcher_config_from_env() -> DispatcherConfig {
    let mut cfg = DispatcherConfig::default();
    if let Some(ms) = env_parse::<u64>("STORE_AGENTS_TASK_DELAY_MS") {
        cfg.inter_task_delay = Duration::from_millis(ms);
    }
    cfg
}

/// `unit * factor^exponent`, saturating instead of overflowing.
pub fn backoff_delay(unit: Duration, factor: f64, exponent: u32) -> Duration {
    let scale = factor.powi(exponent as i32);
    if !scale.is_finite() || scale < 0.0 {
        return unit;
    }
    Duration::try_from_secs_f64(unit.as_secs_f64() * scale).unwrap_or(Duration::MAX)
}

/// First `limit` characters of `text`, with `...` appended when cut.
pub fn preview(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let head: String = text.chars().take(limit).collect();
    format!("{}...", head)
}
