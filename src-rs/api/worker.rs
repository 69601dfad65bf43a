use std::thread::{self, JoinHandle};

use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info};

use crate::dispatcher::Dispatcher;
use crate::snapshot::DispatcherSnapshot;
use crate::task::{Task, TaskDetails};

/// A task request coming from outside the worker thread.
pub struct Submission {
    pub description: String,
    pub persona_type: String,
    pub details: Option<TaskDetails>,
    pub reply: oneshot::Sender<Task>,
}

/// Cloneable handle to the worker: submit tasks, read snapshots.
#[derive(Clone)]
pub struct WorkerHandle {
    submissions: mpsc::UnboundedSender<Submission>,
    snapshots: watch::Receiver<DispatcherSnapshot>,
}

impl WorkerHandle {
    pub async fn submit(
        &self,
        description: &str,
        persona_type: &str,
        details: Option<TaskDetails>,
    ) -> Result<Task, String> {
        let (reply, rx) = oneshot::channel();
        self.submissions
            .send(Submission {
                description: description.to_string(),
                persona_type: persona_type.to_string(),
                details,
                reply,
            })
            .map_err(|_| "dispatch worker stopped".to_string())?;
        rx.await.map_err(|_| "dispatch worker dropped the request".to_string())
    }

    pub fn snapshot(&self) -> DispatcherSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<DispatcherSnapshot> {
        self.snapshots.clone()
    }
}

/// Moves `dispatcher` onto its own thread. The thread blocks while the queue
/// is empty, and between tasks it takes in whatever submissions arrived.
/// It exits once every handle is dropped and the queue has drained.
pub fn spawn(mut dispatcher: Dispatcher) -> (WorkerHandle, JoinHandle<()>) {
    let (tx, mut rx) = mpsc::unbounded_channel::<Submission>();
    let handle = WorkerHandle {
        submissions: tx,
        snapshots: dispatcher.subscribe(),
    };

    let join = thread::spawn(move || {
        let delay = dispatcher.config().inter_task_delay;
        loop {
            if dispatcher.pending_len() == 0 {
                match rx.blocking_recv() {
                    Some(submission) => accept(&mut dispatcher, submission),
                    None => break,
                }
            }
            while let Ok(submission) = rx.try_recv() {
                accept(&mut dispatcher, submission);
            }
            if dispatcher.process_next().is_some() && dispatcher.pending_len() > 0 && !delay.is_zero() {
                thread::sleep(delay);
            }
        }
        info!("dispatch worker stopped");
    });

    (handle, join)
}

fn accept(dispatcher: &mut Dispatcher, submission: Submission) {
    let task = dispatcher.create_task_with(
        &submission.description,
        &submission.persona_type,
        submission.details,
    );
    debug!(task_id = %task.id, "submission accepted");
    let _ = submission.reply.send(task);
}
