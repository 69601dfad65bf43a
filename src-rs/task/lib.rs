pub mod store;
pub mod types;

pub use store::TaskStore;
pub use types::{Task, TaskDetails, TaskStatus, DEFAULT_MAX_RETRIES};
