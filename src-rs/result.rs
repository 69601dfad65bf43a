use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::helpers::preview;
use crate::task::{Task, TaskStatus};

/// Outcome of one `process_all` run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total: usize,
    pub completed: usize,
    pub failed: Vec<String>,
}

impl BatchSummary {
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TaskDigest {
    pub id: String,
    pub description: String,
    pub persona_type: String,
    pub status: TaskStatus,
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<&Task> for TaskDigest {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            description: preview(&task.description, 50),
            persona_type: task.persona_type.clone(),
            status: task.status,
            completed_at: task.completed_at,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TaskSummary {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub failed_tasks: usize,
    pub pending_tasks: usize,
    pub tasks: Vec<TaskDigest>,
}
