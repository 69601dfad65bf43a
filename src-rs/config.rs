use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "llama3.2";

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
    pub max_retries: u32,
    pub backoff_factor: f64,
    /// Wait before the second attempt; later waits grow by `backoff_factor`.
    pub backoff_unit: Duration,
    pub temperature: f64,
    pub top_k: u32,
    pub top_p: f64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(60),
            max_retries: 3,
            backoff_factor: 1.5,
            backoff_unit: Duration::from_secs(1),
            temperature: 0.7,
            top_k: 40,
            top_p: 0.9,
        }
    }
}

#[derive(Clone, Debug)]
pub struct DispatcherConfig {
    pub task_max_retries: u32,
    pub retry_backoff_factor: f64,
    pub backoff_unit: Duration,
    pub inter_task_delay: Duration,
    pub min_result_chars: usize,
    pub high_priority_threshold: u8,
    pub preview_chars: usize,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            task_max_retries: 3,
            retry_backoff_factor: 1.5,
            backoff_unit: Duration::from_secs(1),
            inter_task_delay: Duration::from_millis(1500),
            min_result_chars: 10,
            high_priority_threshold: 3,
            preview_chars: 80,
        }
    }
}

impl DispatcherConfig {
    /// Same limits, but no backoff or pacing sleeps.
    pub fn without_delays() -> Self {
        Self {
            backoff_unit: Duration::ZERO,
            inter_task_delay: Duration::ZERO,
            ..Self::default()
        }
    }
}
