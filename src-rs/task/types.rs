use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DispatchError;

pub const DEFAULT_MAX_RETRIES: u32 = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
}

impl TaskStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }

    pub fn can_transition_to(self, next: TaskStatus) -> bool {
        matches!(
            (self, next),
            (TaskStatus::Pending, TaskStatus::InProgress)
                | (TaskStatus::Pending, TaskStatus::Failed)
                | (TaskStatus::InProgress, TaskStatus::Completed)
                | (TaskStatus::InProgress, TaskStatus::Failed)
        )
    }
}

/// Optional structure attached to a task: priority on a 1-5 scale, extra
/// context lines for the system prompt, and tool names for the prompt.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TaskDetails {
    pub priority: u8,
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    #[serde(default)]
    pub tools: Vec<String>,
}

impl Default for TaskDetails {
    fn default() -> Self {
        Self {
            priority: 1,
            context: BTreeMap::new(),
            tools: Vec::new(),
        }
    }
}

impl TaskDetails {
    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority.clamp(1, 5);
        self
    }

    pub fn with_context(mut self, key: &str, value: &str) -> Self {
        self.context.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_tool(mut self, tool: &str) -> Self {
        self.tools.push(tool.to_string());
        self
    }

    /// A `json` tool asks the model for JSON-formatted output.
    pub fn wants_json(&self) -> bool {
        self.tools.iter().any(|tool| tool == "json")
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub description: String,
    pub persona_type: String,
    pub status: TaskStatus,
    pub result: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub retry_count: u32,
    pub max_retries: u32,
    pub details: Option<TaskDetails>,
}

impl Task {
    pub fn new(id: &str, description: &str, persona_type: &str) -> Self {
        Self {
            id: id.to_string(),
            description: description.to_string(),
            persona_type: persona_type.to_string(),
            status: TaskStatus::Pending,
            result: None,
            created_at: Utc::now(),
            completed_at: None,
            retry_count: 0,
            max_retries: DEFAULT_MAX_RETRIES,
            details: None,
        }
    }

    fn transition(&mut self, next: TaskStatus) -> Result<(), DispatchError> {
        if !self.status.can_transition_to(next) {
            return Err(DispatchError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        if next.is_terminal() {
            self.completed_at = Some(Utc::now());
        }
        Ok(())
    }

    pub fn start(&mut self) -> Result<(), DispatchError> {
        self.transition(TaskStatus::InProgress)
    }

    pub fn complete(&mut self, result: String) -> Result<(), DispatchError> {
        self.transition(TaskStatus::Completed)?;
        self.result = Some(result);
        Ok(())
    }

    pub fn fail(&mut self, message: String) -> Result<(), DispatchError> {
        self.transition(TaskStatus::Failed)?;
        self.result = Some(message);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states_are_final() {
        let mut task = Task::new("task_001", "Appraise a 2018 Civic", "appraisal");
        task.start().unwrap();
        task.complete("Worth about $14,000 in good condition.".to_string())
            .unwrap();
        let stamped = task.completed_at;
        assert!(stamped.is_some());

        let err = task.fail("late failure".to_string()).unwrap_err();
        assert_eq!(
            err,
            DispatchError::InvalidTransition {
                from: TaskStatus::Completed,
                to: TaskStatus::Failed,
            }
        );
        assert_eq!(task.status, TaskStatus::Completed);
        assert_eq!(task.completed_at, stamped);
    }

    #[test]
    fn pending_can_fail_but_not_complete() {
        let mut task = Task::new("task_002", "anything", "bogus");
        assert!(task.complete("done".to_string()).is_err());
        assert!(task.result.is_none());
        task.fail("Error: Unknown agent type 'bogus'".to_string()).unwrap();
        assert_eq!(task.status, TaskStatus::Failed);
        assert!(task.start().is_err());
    }

    #[test]
    fn priority_is_clamped() {
        assert_eq!(TaskDetails::default().with_priority(9).priority, 5);
        assert_eq!(TaskDetails::default().with_priority(0).priority, 1);
        assert!(TaskDetails::default().with_tool("json").wants_json());
    }
}
