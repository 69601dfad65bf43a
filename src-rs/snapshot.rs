use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::persona::{Persona, PersonaStatusReport};
use crate::result::{TaskDigest, TaskSummary};
use crate::task::Task;

/// Owned copy of the dispatcher's state, safe to hand to other threads.
/// Finished tasks are shared with the dispatcher, not copied.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DispatcherSnapshot {
    pub personas: Vec<Persona>,
    pub current: Option<Task>,
    pub pending: Vec<Task>,
    pub completed: Vec<Arc<Task>>,
    pub failed: Vec<Arc<Task>>,
}

impl DispatcherSnapshot {
    pub fn find_task(&self, id: &str) -> Option<&Task> {
        self.all_tasks().into_iter().find(|task| task.id == id)
    }

    /// Completed, failed, in-flight, then pending.
    pub fn all_tasks(&self) -> Vec<&Task> {
        self.completed
            .iter()
            .map(Arc::as_ref)
            .chain(self.failed.iter().map(Arc::as_ref))
            .chain(self.current.iter())
            .chain(self.pending.iter())
            .collect()
    }

    /// Up to `limit` tasks, newest first.
    pub fn recent_tasks(&self, limit: usize) -> Vec<Task> {
        let mut items: Vec<Task> = self.all_tasks().into_iter().cloned().collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        items.truncate(limit);
        items
    }

    pub fn agent_status(&self) -> Vec<PersonaStatusReport> {
        self.personas.iter().map(PersonaStatusReport::from).collect()
    }

    pub fn task_summary(&self) -> TaskSummary {
        let tasks = self.all_tasks();
        TaskSummary {
            total_tasks: tasks.len(),
            completed_tasks: self.completed.len(),
            failed_tasks: self.failed.len(),
            pending_tasks: self.pending.len() + usize::from(self.current.is_some()),
            tasks: tasks.into_iter().map(TaskDigest::from).collect(),
        }
    }
}
