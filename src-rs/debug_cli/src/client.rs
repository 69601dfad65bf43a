use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use serde_json::Value;

use crate::models::{AgentInfo, SubmitRequest, SubmitResponse, TaskCounts, TaskInfo};

pub struct HTTPClient {
    pub base_url: String,
    client: Client,
}

impl HTTPClient {
    pub fn new(base_url: &str) -> Result<Self, String> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|err| err.to_string())?;
        Ok(Self {
            base_url: base_url.to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    pub fn submit(&self, req: SubmitRequest) -> Result<TaskInfo, String> {
        let resp = self
            .client
            .post(self.url("/tasks"))
            .json(&req)
            .send()
            .map_err(|err| err.to_string())?;
        let status = resp.status();
        let body = resp.json::<SubmitResponse>().map_err(|err| err.to_string())?;
        match (body.task, body.error) {
            (Some(task), _) => Ok(task),
            (None, Some(err)) => Err(format!("http {}: {}", status.as_u16(), err)),
            (None, None) => Err(format!("http {}: empty response", status.as_u16())),
        }
    }

    pub fn list_tasks(&self, limit: usize) -> Result<(TaskCounts, Vec<TaskInfo>), String> {
        let value = self.get_json(&format!("/tasks?limit={}", limit))?;
        let counts = value
            .get("summary")
            .cloned()
            .ok_or_else(|| "missing summary".to_string())
            .and_then(|v| serde_json::from_value::<TaskCounts>(v).map_err(|err| err.to_string()))?;
        let tasks = parse_list::<TaskInfo>(&value, "tasks");
        Ok((counts, tasks))
    }

    pub fn get_task(&self, id: &str) -> Result<Option<TaskInfo>, String> {
        let resp = self
            .client
            .get(self.url(&format!("/tasks/{}", id)))
            .send()
            .map_err(|err| err.to_string())?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let value = read_json(resp)?;
        let task = value
            .get("task")
            .cloned()
            .map(serde_json::from_value::<TaskInfo>)
            .transpose()
            .map_err(|err| err.to_string())?;
        Ok(task)
    }

    pub fn agents(&self) -> Result<Vec<AgentInfo>, String> {
        let value = self.get_json("/agents")?;
        Ok(parse_list::<AgentInfo>(&value, "agents"))
    }

    fn get_json(&self, path: &str) -> Result<Value, String> {
        let resp = self
            .client
            .get(self.url(path))
            .send()
            .map_err(|err| err.to_string())?;
        read_json(resp)
    }
}

fn read_json(resp: Response) -> Result<Value, String> {
    if resp.status().is_success() {
        resp.json::<Value>().map_err(|err| err.to_string())
    } else {
        let status = resp.status();
        let body = resp.text().unwrap_or_default();
        Err(format!("http {}: {}", status.as_u16(), body))
    }
}

fn parse_list<T: serde::de::DeserializeOwned>(value: &Value, key: &str) -> Vec<T> {
    let items = value
        .get(key)
        .and_then(|v| v.as_array())
        .cloned()
        .unwrap_or_default();
    let mut out = Vec::new();
    for item in items {
        if let Ok(parsed) = serde_json::from_value::<T>(item) {
            out.push(parsed);
        }
    }
    out
}
