use thiserror::Error;

use crate::task::TaskStatus;

/// Failures raised while routing a task or validating its result. The
/// `Display` text is what ends up in a failed task's `result`.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum DispatchError {
    #[error("Error: Unknown agent type '{0}'")]
    UnknownPersona(String),
    #[error("Error: Task '{0}' is not pending")]
    NotPending(String),
    #[error("Result too short or empty")]
    ResultTooShort,
    #[error("LLM returned error: {0}")]
    Upstream(String),
    #[error("invalid status transition {from:?} -> {to:?}")]
    InvalidTransition { from: TaskStatus, to: TaskStatus },
}
