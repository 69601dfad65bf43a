use std::collections::VecDeque;
use std::sync::Arc;

use super::types::{Task, TaskDetails, TaskStatus};

/// The dispatcher's three task collections. A task that is not being
/// processed lives in exactly one of them. Finished tasks never change
/// again, so they are kept behind `Arc` and shared with snapshots.
pub struct TaskStore {
    next_id: usize,
    pending: VecDeque<Task>,
    completed: Vec<Arc<Task>>,
    failed: Vec<Arc<Task>>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            pending: VecDeque::new(),
            completed: Vec::new(),
            failed: Vec::new(),
        }
    }

    pub fn create(
        &mut self,
        description: &str,
        persona_type: &str,
        details: Option<TaskDetails>,
        max_retries: u32,
    ) -> Task {
        let id = format!("task_{:03}", self.next_id);
        self.next_id += 1;
        let mut task = Task::new(&id, description, persona_type);
        task.details = details;
        task.max_retries = max_retries;
        self.pending.push_back(task.clone());
        task
    }

    pub fn pop_next(&mut self) -> Option<Task> {
        self.pending.pop_front()
    }

    /// Removes a pending task by id so it can be processed.
    pub fn take_pending(&mut self, id: &str) -> Option<Task> {
        let idx = self.pending.iter().position(|task| task.id == id)?;
        self.pending.remove(idx)
    }

    /// Files a processed task under its terminal collection. Anything not
    /// terminal goes back to the head of the queue.
    pub fn finish(&mut self, task: Task) {
        match task.status {
            TaskStatus::Completed => self.completed.push(Arc::new(task)),
            TaskStatus::Failed => self.failed.push(Arc::new(task)),
            TaskStatus::Pending | TaskStatus::InProgress => self.pending.push_front(task),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.pending
            .iter()
            .chain(self.completed.iter().map(Arc::as_ref))
            .chain(self.failed.iter().map(Arc::as_ref))
            .find(|task| task.id == id)
    }

    pub fn pending(&self) -> Vec<Task> {
        self.pending.iter().cloned().collect()
    }

    pub fn completed(&self) -> &[Arc<Task>] {
        &self.completed
    }

    pub fn failed(&self) -> &[Arc<Task>] {
        &self.failed
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_keep_counting_after_tasks_leave_the_queue() {
        let mut store = TaskStore::new();
        let first = store.create("one", "sales", None, 3);
        let mut taken = store.pop_next().unwrap();
        taken.fail("gone".to_string()).unwrap();
        store.finish(taken);
        let second = store.create("two", "sales", None, 3);
        assert_eq!(first.id, "task_001");
        assert_eq!(second.id, "task_002");
        assert_eq!(store.failed().len(), 1);
        assert_eq!(store.pending_len(), 1);
        assert_eq!(store.get("task_001").unwrap().status, TaskStatus::Failed);
    }

    #[test]
    fn take_pending_only_finds_queued_tasks() {
        let mut store = TaskStore::new();
        store.create("one", "sales", None, 3);
        let two = store.create("two", "finance", None, 3);
        assert!(store.take_pending(&two.id).is_some());
        assert!(store.take_pending(&two.id).is_none());
        assert_eq!(store.pending_len(), 1);
    }
}
