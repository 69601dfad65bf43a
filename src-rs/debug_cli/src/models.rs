use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug)]
pub struct CLIConfig {
    pub base_url: String,
    pub persona: String,
    pub priority: Option<u8>,
}

#[derive(Debug, Serialize)]
pub struct SubmitRequest {
    pub description: String,
    pub persona: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u8>,
}

#[derive(Debug, Deserialize)]
pub struct SubmitResponse {
    pub task: Option<TaskInfo>,
    pub error: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct TaskInfo {
    pub id: String,
    pub description: String,
    pub persona_type: String,
    pub status: String,
    pub result: Option<String>,
    pub retry_count: u32,
    pub completed_at: Option<String>,
    #[serde(default)]
    pub details: Option<TaskDetailsInfo>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct TaskDetailsInfo {
    pub priority: u8,
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    #[serde(default)]
    pub tools: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct AgentInfo {
    pub key: String,
    pub name: String,
    pub role: String,
    pub status: String,
    pub tasks_completed: u32,
}

#[derive(Debug, Deserialize)]
pub struct TaskCounts {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub failed_tasks: usize,
    pub pending_tasks: usize,
}
