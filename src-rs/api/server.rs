use std::net::SocketAddr;

use axum::routing::get;
use axum::Router;
use tracing::info;

use crate::api::handlers::{
    handle_agents, handle_health, handle_submit, handle_task, handle_tasks,
};
use crate::api::worker::WorkerHandle;

pub struct StatusServer {
    pub port: u16,
    pub worker: WorkerHandle,
}

impl StatusServer {
    pub fn new(port: u16, worker: WorkerHandle) -> Self {
        Self { port, worker }
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/health", get(handle_health))
            .route("/agents", get(handle_agents))
            .route("/tasks", get(handle_tasks).post(handle_submit))
            .route("/tasks/:id", get(handle_task))
            .with_state(self.worker.clone())
    }

    pub async fn start(&self) -> Result<(), String> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        info!(%addr, "status API listening");
        axum::Server::bind(&addr)
            .serve(self.router().into_make_service())
            .await
            .map_err(|err| err.to_string())
    }
}
