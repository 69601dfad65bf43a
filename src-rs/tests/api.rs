use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::json;

use store_agents_rs::api::handlers::{
    handle_agents, handle_health, handle_submit, handle_task, handle_tasks, SubmitRequest,
    TasksQuery,
};
use store_agents_rs::api::{self, WorkerHandle};
use store_agents_rs::persona::PersonaRegistry;
use store_agents_rs::task::TaskStatus;
use store_agents_rs::{Dispatcher, DispatcherConfig, DispatcherSnapshot};

mod common;
use common::CannedGenerator;

fn start_worker() -> WorkerHandle {
    let dispatcher = Dispatcher::new(
        DispatcherConfig::without_delays(),
        PersonaRegistry::standard("llama3.2"),
        Arc::new(CannedGenerator::new("A sufficiently long canned answer.")),
    );
    let (handle, _join) = api::spawn(dispatcher);
    handle
}

fn submit_request(value: serde_json::Value) -> SubmitRequest {
    serde_json::from_value(value).unwrap()
}

async fn wait_until<F>(worker: &WorkerHandle, done: F) -> DispatcherSnapshot
where
    F: Fn(&DispatcherSnapshot) -> bool,
{
    let mut rx = worker.subscribe();
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            {
                let snapshot = rx.borrow_and_update();
                if done(&*snapshot) {
                    return (*snapshot).clone();
                }
            }
            rx.changed().await.unwrap();
        }
    })
    .await
    .expect("worker did not reach the expected state")
}

#[tokio::test]
async fn health_reports_ok() {
    let Json(body) = handle_health().await;
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn agents_lists_the_four_personas() {
    let worker = start_worker();
    let Json(body) = handle_agents(State(worker)).await;
    assert_eq!(body["agents"].as_array().unwrap().len(), 4);
    assert_eq!(body["status"][0]["status"], "idle");
}

#[tokio::test]
async fn submitted_task_is_accepted_then_completed() {
    let worker = start_worker();
    let req = submit_request(json!({
        "description": "Find a cheap sedan",
        "persona": "sales",
        "priority": 4,
        "tools": ["inventory_search"],
    }));

    let (status, Json(resp)) = handle_submit(State(worker.clone()), Json(req)).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert!(resp.error.is_none());
    let task = resp.task.unwrap();
    assert_eq!(task.id, "task_001");
    assert_eq!(task.details.as_ref().unwrap().priority, 4);

    let snapshot = wait_until(&worker, |s| s.completed.len() == 1).await;
    assert_eq!(snapshot.completed[0].status, TaskStatus::Completed);

    let (status, Json(body)) = handle_task(State(worker.clone()), Path(task.id.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["task"]["status"], "completed");
    assert_eq!(body["task"]["result"], "A sufficiently long canned answer.");

    let Json(body) = handle_tasks(State(worker), Query(TasksQuery::default())).await;
    assert_eq!(body["summary"]["completed_tasks"], 1);
    assert_eq!(body["tasks"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn unknown_persona_ends_up_failed() {
    let worker = start_worker();
    let req = submit_request(json!({"description": "anything", "persona": "bogus-type"}));

    let (status, _) = handle_submit(State(worker.clone()), Json(req)).await;
    assert_eq!(status, StatusCode::ACCEPTED);

    let snapshot = wait_until(&worker, |s| s.failed.len() == 1).await;
    assert_eq!(
        snapshot.failed[0].result.as_deref(),
        Some("Error: Unknown agent type 'bogus-type'")
    );
}

#[tokio::test]
async fn empty_description_is_rejected() {
    let worker = start_worker();
    let req = submit_request(json!({"description": "   ", "persona": "sales"}));

    let (status, Json(resp)) = handle_submit(State(worker.clone()), Json(req)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(resp.task.is_none());
    assert_eq!(resp.error.as_deref(), Some("description required"));
    assert_eq!(worker.snapshot().task_summary().total_tasks, 0);
}

#[tokio::test]
async fn unknown_task_id_is_not_found() {
    let worker = start_worker();
    let (status, Json(body)) = handle_task(State(worker), Path("task_404".to_string())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "task not found: task_404");
}

#[tokio::test]
async fn task_listing_honours_limit_newest_first() {
    let worker = start_worker();
    for i in 0..3 {
        let req = submit_request(json!({"description": format!("Check lot {}", i), "persona": "manager"}));
        handle_submit(State(worker.clone()), Json(req)).await;
    }
    wait_until(&worker, |s| s.completed.len() == 3).await;

    let Json(body) = handle_tasks(State(worker), Query(TasksQuery { limit: Some(2) })).await;
    let tasks = body["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0]["id"], "task_003");
    assert_eq!(body["summary"]["total_tasks"], 3);
}
