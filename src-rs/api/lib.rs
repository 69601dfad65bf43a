pub mod handlers;
pub mod server;
pub mod worker;

pub use server::StatusServer;
pub use worker::{spawn, Submission, WorkerHandle};
