use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::llm::InteractionEvent;

/// Styling hint attached to each user-facing log line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogKind {
    Info,
    Success,
    Error,
    Warning,
    Text,
    TextSecondary,
    TextDim,
}

impl LogKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogKind::Info => "info",
            LogKind::Success => "success",
            LogKind::Error => "error",
            LogKind::Warning => "warning",
            LogKind::Text => "text",
            LogKind::TextSecondary => "text_secondary",
            LogKind::TextDim => "text_dim",
        }
    }
}

impl fmt::Display for LogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub type LogCallback = Arc<dyn Fn(&str, LogKind) + Send + Sync>;

pub type InteractionCallback = Arc<dyn Fn(&InteractionEvent) + Send + Sync>;

/// Sends `message` to `callback`, or prints it when there is none.
pub fn emit_log(callback: Option<&LogCallback>, message: &str, kind: LogKind) {
    match callback {
        Some(cb) => cb(message, kind),
        None => write_line(&mut io::stdout().lock(), message),
    }
}

fn write_line<W: Write>(out: &mut W, message: &str) {
    // stdout may already be closed
    let _ = writeln!(out, "{}", message);
}
