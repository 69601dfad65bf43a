use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;

use tokio::sync::watch;
use tracing::{debug, error, info};

use crate::config::DispatcherConfig;
use crate::error::DispatchError;
use crate::helpers::{backoff_delay, preview};
use crate::llm::{is_error_text, GenerationRequest, TextGenerator, ERROR_PREFIX};
use crate::observer::{emit_log, LogCallback, LogKind};
use crate::persona::{Persona, PersonaRegistry, PersonaStatus, PersonaStatusReport};
use crate::result::{BatchSummary, TaskSummary};
use crate::snapshot::DispatcherSnapshot;
use crate::task::{Task, TaskDetails, TaskStatus, TaskStore};

/// Routes queued tasks to personas, one at a time, and owns all task and
/// persona state. Readers outside the dispatcher get snapshots only.
pub struct Dispatcher {
    config: DispatcherConfig,
    personas: PersonaRegistry,
    tasks: TaskStore,
    generator: Arc<dyn TextGenerator>,
    log_callback: Option<LogCallback>,
    current: Option<Task>,
    snapshots: watch::Sender<DispatcherSnapshot>,
}

impl Dispatcher {
    pub fn new(
        config: DispatcherConfig,
        personas: PersonaRegistry,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        let (snapshots, _) = watch::channel(DispatcherSnapshot::default());
        let dispatcher = Self {
            config,
            personas,
            tasks: TaskStore::new(),
            generator,
            log_callback: None,
            current: None,
            snapshots,
        };
        dispatcher.publish();
        dispatcher
    }

    pub fn with_log_callback(mut self, callback: LogCallback) -> Self {
        self.log_callback = Some(callback);
        self
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    pub fn generator(&self) -> &dyn TextGenerator {
        self.generator.as_ref()
    }

    pub fn personas(&self) -> &PersonaRegistry {
        &self.personas
    }

    pub fn persona(&self, key: &str) -> Option<&Persona> {
        self.personas.get(key)
    }

    pub fn pending(&self) -> Vec<Task> {
        self.tasks.pending()
    }

    pub fn completed(&self) -> &[Arc<Task>] {
        self.tasks.completed()
    }

    pub fn failed(&self) -> &[Arc<Task>] {
        self.tasks.failed()
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.get(id)
    }

    pub fn pending_len(&self) -> usize {
        self.tasks.pending_len()
    }

    pub fn log_message(&self, message: &str, kind: LogKind) {
        emit_log(self.log_callback.as_ref(), message, kind);
    }

    pub fn snapshot(&self) -> DispatcherSnapshot {
        DispatcherSnapshot {
            personas: self.personas.all().to_vec(),
            current: self.current.clone(),
            pending: self.tasks.pending(),
            completed: self.tasks.completed().to_vec(),
            failed: self.tasks.failed().to_vec(),
        }
    }

    /// Receiver that observes a fresh snapshot after every state change.
    pub fn subscribe(&self) -> watch::Receiver<DispatcherSnapshot> {
        self.snapshots.subscribe()
    }

    pub fn agent_status(&self) -> Vec<PersonaStatusReport> {
        self.personas.all().iter().map(PersonaStatusReport::from).collect()
    }

    pub fn task_summary(&self) -> TaskSummary {
        self.snapshot().task_summary()
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.snapshot());
    }

    pub fn create_task(&mut self, description: &str, persona_type: &str) -> Task {
        self.create_task_with(description, persona_type, None)
    }

    pub fn create_task_with(
        &mut self,
        description: &str,
        persona_type: &str,
        details: Option<TaskDetails>,
    ) -> Task {
        let max_retries = self.config.task_max_retries;
        let task = self.tasks.create(description, persona_type, details, max_retries);
        debug!(task_id = %task.id, persona = persona_type, "task queued");
        self.publish();
        task
    }

    /// Processes one pending task and returns its result text, which is an
    /// `Error:` string when the task failed.
    pub fn assign_task(&mut self, task_id: &str) -> String {
        match self.tasks.take_pending(task_id) {
            Some(task) => self.run_task(task).result.unwrap_or_default(),
            None => {
                let message = DispatchError::NotPending(task_id.to_string()).to_string();
                self.log_message(&format!("[ERROR] {}", message), LogKind::Error);
                message
            }
        }
    }

    /// Processes the head of the queue, returning the finished task.
    pub fn process_next(&mut self) -> Option<Task> {
        let task = self.tasks.pop_next()?;
        Some(self.run_task(task))
    }

    pub fn process_all(&mut self) -> BatchSummary {
        let total = self.tasks.pending_len();
        self.log_message(
            &format!("[PROCESS] Starting processing of {} tasks...", total),
            LogKind::Info,
        );

        let mut summary = BatchSummary {
            total,
            ..BatchSummary::default()
        };
        let mut failed_tasks = Vec::new();
        while let Some(task) = self.process_next() {
            if task.status == TaskStatus::Completed {
                summary.completed += 1;
            } else {
                summary.failed.push(task.id.clone());
                failed_tasks.push(task);
            }
            if self.tasks.pending_len() > 0 && !self.config.inter_task_delay.is_zero() {
                thread::sleep(self.config.inter_task_delay);
            }
        }
        summary.total = summary.completed + summary.failed.len();

        if failed_tasks.is_empty() {
            self.log_message(
                &format!("[DONE] All {} tasks completed successfully!", summary.total),
                LogKind::Success,
            );
        } else {
            self.log_message(
                &format!(
                    "[SUMMARY] {}/{} tasks completed, {} failed",
                    summary.completed,
                    summary.total,
                    failed_tasks.len()
                ),
                LogKind::Error,
            );
            for task in &failed_tasks {
                self.log_message(
                    &format!("   Failed: {} - {}", task.id, preview(&task.description, 50)),
                    LogKind::Error,
                );
            }
        }
        info!(
            total = summary.total,
            completed = summary.completed,
            failed = summary.failed.len(),
            "batch finished"
        );
        summary
    }

    fn run_task(&mut self, mut task: Task) -> Task {
        let persona = match self.personas.get(&task.persona_type) {
            Some(persona) => persona.clone(),
            None => {
                let message = DispatchError::UnknownPersona(task.persona_type.clone()).to_string();
                self.record_failure(&mut task, &message);
                self.log_message(&format!("[ERROR] {}", message), LogKind::Error);
                return self.file(task);
            }
        };

        self.log_message(
            &format!("[ASSIGN] Task {} → {}", task.id, persona.name),
            LogKind::Info,
        );
        self.log_message(
            &format!("   Task: {}", preview(&task.description, self.config.preview_chars)),
            LogKind::TextSecondary,
        );

        self.set_persona_status(&persona.key, PersonaStatus::Working);
        if let Err(err) = task.start() {
            error!(task_id = %task.id, error = %err, "task could not start");
        }
        self.current = Some(task.clone());
        self.publish();

        let generator = Arc::clone(&self.generator);
        let config = self.config.clone();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            generate_until_valid(generator.as_ref(), &config, &persona, &mut task)
        }));

        match outcome {
            Ok(Ok(result)) => {
                let shown = preview(&result, self.config.preview_chars);
                if let Err(err) = task.complete(result) {
                    error!(task_id = %task.id, error = %err, "task could not complete");
                }
                if let Some(p) = self.personas.get_mut(&persona.key) {
                    p.status = PersonaStatus::Completed;
                    p.tasks_completed += 1;
                }
                self.log_message(
                    &format!("[COMPLETE] {} finished task {}", persona.name, task.id),
                    LogKind::Success,
                );
                self.log_message(&format!("   Result: {}", shown), LogKind::TextSecondary);
            }
            Ok(Err(message)) => {
                self.record_failure(&mut task, &message);
                self.set_persona_status(&persona.key, PersonaStatus::Error);
                self.log_message(
                    &format!("[FAILED] {} failed task {}", persona.name, task.id),
                    LogKind::Error,
                );
                self.log_message(
                    &format!("   {}", preview(&message, self.config.preview_chars)),
                    LogKind::Error,
                );
            }
            Err(payload) => {
                let message = format!(
                    "{} Critical error assigning task {}: {}",
                    ERROR_PREFIX,
                    task.id,
                    panic_message(payload.as_ref())
                );
                self.record_failure(&mut task, &message);
                self.set_persona_status(&persona.key, PersonaStatus::Error);
                self.log_message(&format!("[CRITICAL] {}", message), LogKind::Error);
            }
        }

        self.file(task)
    }

    fn record_failure(&self, task: &mut Task, message: &str) {
        if let Err(err) = task.fail(message.to_string()) {
            error!(task_id = %task.id, error = %err, "task could not be marked failed");
        }
        info!(task_id = %task.id, reason = message, "task failed");
    }

    fn set_persona_status(&mut self, key: &str, status: PersonaStatus) {
        if let Some(p) = self.personas.get_mut(key) {
            p.status = status;
        }
    }

    fn file(&mut self, task: Task) -> Task {
        self.current = None;
        self.tasks.finish(task.clone());
        self.publish();
        task
    }
}

/// Calls the generator until a usable answer arrives or the task's retry
/// budget runs out.
fn generate_until_valid(
    generator: &dyn TextGenerator,
    config: &DispatcherConfig,
    persona: &Persona,
    task: &mut Task,
) -> Result<String, String> {
    let request = GenerationRequest {
        model: persona.model.clone(),
        prompt: build_prompt(task, config.high_priority_threshold),
        system_prompt: build_system_prompt(persona, task),
        format: task
            .details
            .as_ref()
            .filter(|d| d.wants_json())
            .map(|_| "json".to_string()),
        agent_type: Some(persona.key.clone()),
    };

    let mut last_error = DispatchError::ResultTooShort;
    while task.retry_count < task.max_retries {
        let text = generator.generate_with(request.clone());
        match validate_result(&text, config.min_result_chars) {
            Ok(result) => return Ok(result),
            Err(err) => {
                task.retry_count += 1;
                debug!(task_id = %task.id, retry = task.retry_count, error = %err, "result rejected");
                last_error = err;
                if task.retry_count < task.max_retries {
                    thread::sleep(backoff_delay(
                        config.backoff_unit,
                        config.retry_backoff_factor,
                        task.retry_count,
                    ));
                }
            }
        }
    }

    Err(format!(
        "{} task failed after {} attempts: {}",
        ERROR_PREFIX, task.max_retries, last_error
    ))
}

pub fn build_system_prompt(persona: &Persona, task: &Task) -> String {
    let mut prompt = persona.system_prompt();
    if let Some(details) = task.details.as_ref().filter(|d| !d.context.is_empty()) {
        prompt.push_str("\n\nAdditional Context:\n");
        for (key, value) in &details.context {
            prompt.push_str(&format!("- {}: {}\n", key, value));
        }
    }
    prompt
}

pub fn build_prompt(task: &Task, high_priority_threshold: u8) -> String {
    let mut prompt = task.description.clone();
    if let Some(details) = &task.details {
        if details.priority > high_priority_threshold {
            prompt = format!("[HIGH PRIORITY] {}", prompt);
        }
        if !details.tools.is_empty() {
            prompt.push_str(&format!("\n\nAvailable tools: {}", details.tools.join(", ")));
        }
    }
    prompt
}

/// Trimmed answer, or why it can't be used.
pub fn validate_result(text: &str, min_chars: usize) -> Result<String, DispatchError> {
    let trimmed = text.trim();
    if trimmed.chars().count() < min_chars {
        return Err(DispatchError::ResultTooShort);
    }
    if is_error_text(text) {
        return Err(DispatchError::Upstream(text.to_string()));
    }
    Ok(trimmed.to_string())
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
