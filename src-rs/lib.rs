pub mod config;
pub mod demo;
pub mod dispatcher;
pub mod error;
pub mod helpers;
pub mod observer;
pub mod result;
pub mod snapshot;

#[path = "llm/lib.rs"]
pub mod llm;
#[path = "persona/lib.rs"]
pub mod persona;
#[path = "task/lib.rs"]
pub mod task;
#[path = "api/lib.rs"]
pub mod api;

pub use config::{ClientConfig, DispatcherConfig};
pub use dispatcher::Dispatcher;
pub use error::DispatchError;
pub use observer::{InteractionCallback, LogCallback, LogKind};
pub use result::{BatchSummary, TaskSummary};
pub use snapshot::DispatcherSnapshot;
