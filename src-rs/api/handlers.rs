use std::collections::BTreeMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::api::worker::WorkerHandle;
use crate::task::{Task, TaskDetails};

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub description: String,
    pub persona: String,
    pub priority: Option<u8>,
    pub context: Option<BTreeMap<String, String>>,
    pub tools: Option<Vec<String>>,
}

impl SubmitRequest {
    fn details(&self) -> Option<TaskDetails> {
        if self.priority.is_none() && self.context.is_none() && self.tools.is_none() {
            return None;
        }
        let mut details = TaskDetails::default().with_priority(self.priority.unwrap_or(1));
        details.context = self.context.clone().unwrap_or_default();
        details.tools = self.tools.clone().unwrap_or_default();
        Some(details)
    }
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub task: Option<Task>,
    pub error: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct TasksQuery {
    pub limit: Option<usize>,
}

pub async fn handle_health() -> Json<Value> {
    Json(json!({"status": "ok", "version": env!("CARGO_PKG_VERSION")}))
}

pub async fn handle_agents(State(worker): State<WorkerHandle>) -> Json<Value> {
    let snapshot = worker.snapshot();
    Json(json!({
        "agents": snapshot.personas,
        "status": snapshot.agent_status(),
    }))
}

pub async fn handle_tasks(
    State(worker): State<WorkerHandle>,
    Query(query): Query<TasksQuery>,
) -> Json<Value> {
    let limit = query.limit.unwrap_or(10);
    let snapshot = worker.snapshot();
    Json(json!({
        "summary": snapshot.task_summary(),
        "current": snapshot.current,
        "tasks": snapshot.recent_tasks(limit),
    }))
}

pub async fn handle_task(
    State(worker): State<WorkerHandle>,
    Path(id): Path<String>,
) -> (StatusCode, Json<Value>) {
    let snapshot = worker.snapshot();
    match snapshot.find_task(&id) {
        Some(task) => (StatusCode::OK, Json(json!({ "task": task }))),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("task not found: {}", id) })),
        ),
    }
}

pub async fn handle_submit(
    State(worker): State<WorkerHandle>,
    Json(req): Json<SubmitRequest>,
) -> (StatusCode, Json<SubmitResponse>) {
    if req.description.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(SubmitResponse {
                task: None,
                error: Some("description required".to_string()),
            }),
        );
    }

    match worker.submit(&req.description, &req.persona, req.details()).await {
        Ok(task) => (
            StatusCode::ACCEPTED,
            Json(SubmitResponse {
                task: Some(task),
                error: None,
            }),
        ),
        Err(err) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(SubmitResponse {
                task: None,
                error: Some(err),
            }),
        ),
    }
}
