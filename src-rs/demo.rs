//! The scripted store demo: canned tasks, a connectivity probe for the model
//! server, and the end-of-run reports.

use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;

use crate::dispatcher::Dispatcher;
use crate::helpers::preview;
use crate::llm::{is_error_text, TextGenerator};
use crate::observer::LogKind;
use crate::persona::PersonaStatus;

const PROBE_PROMPT: &str = "Say 'Hello' in exactly one word.";
const PROBE_SYSTEM: &str = "You are a test agent. Respond with exactly one word.";
const STARTUP_CHECKS: u32 = 10;

/// `(description, persona key)` pairs run by the demo.
pub fn demo_tasks() -> Vec<(&'static str, &'static str)> {
    vec![
        ("Help a customer find a reliable family SUV under $25,000", "sales"),
        ("Create a plan for training new sales consultants", "manager"),
        ("Appraise a 2018 Honda Civic with 45,000 miles", "appraisal"),
        ("Explain financing options for a customer with 650 credit score", "finance"),
        ("Review and improve our customer service approach", "manager"),
        ("Plan a 30-day sales training program for new hires", "manager"),
        ("Analyze current market trends for electric vehicles", "appraisal"),
        ("Help a first-time buyer understand CarMax warranties", "sales"),
    ]
}

pub fn role_label(persona_key: &str) -> &str {
    match persona_key {
        "sales" => "Sales",
        "appraisal" => "Appraisal",
        "finance" => "Finance",
        "manager" => "Manager",
        other => other,
    }
}

/// Sends one tiny prompt; `Ok` carries the model's reply.
pub fn probe(generator: &dyn TextGenerator, model: &str) -> Result<String, String> {
    let reply = generator.generate(model, PROBE_PROMPT, PROBE_SYSTEM);
    if is_error_text(&reply) || reply.trim().is_empty() {
        Err(reply)
    } else {
        Ok(reply.trim().to_string())
    }
}

/// Probes the model server and, when `autostart` is set, tries launching
/// `ollama serve` and polls until it answers.
pub fn check_connection(dispatcher: &Dispatcher, model: &str, autostart: bool) -> bool {
    let generator = dispatcher.generator();
    dispatcher.log_message("[CHECK] Checking Ollama connection...", LogKind::Info);
    match probe(generator, model) {
        Ok(reply) => {
            dispatcher.log_message("[OK] Ollama connection successful!", LogKind::Success);
            dispatcher.log_message(&format!("   Test response: {}", reply), LogKind::TextSecondary);
            return true;
        }
        Err(err) => {
            dispatcher.log_message(&format!("[WARN] {}", preview(&err, 120)), LogKind::Warning);
        }
    }

    if autostart {
        dispatcher.log_message(
            "[WARN] Ollama not responding. Attempting to start Ollama...",
            LogKind::Warning,
        );
        match Command::new("ollama")
            .arg("serve")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(_) => {
                dispatcher.log_message("[INFO] Starting Ollama service... Please wait...", LogKind::Info);
                for i in 1..=STARTUP_CHECKS {
                    thread::sleep(Duration::from_secs(1));
                    dispatcher.log_message(
                        &format!("[WAIT] Checking connection... ({}/{})", i, STARTUP_CHECKS),
                        LogKind::Info,
                    );
                    if let Ok(reply) = probe(generator, model) {
                        dispatcher.log_message("[OK] Ollama started successfully!", LogKind::Success);
                        dispatcher.log_message(
                            &format!("   Test response: {}", reply),
                            LogKind::TextSecondary,
                        );
                        return true;
                    }
                }
                dispatcher.log_message("[ERROR] Failed to start Ollama automatically.", LogKind::Error);
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                dispatcher.log_message("[ERROR] Ollama not found in system PATH.", LogKind::Error);
            }
            Err(err) => {
                dispatcher.log_message(&format!("[ERROR] Error starting Ollama: {}", err), LogKind::Error);
            }
        }
    }

    for line in [
        "OLLAMA CONNECTION FAILED",
        "Please start Ollama manually:",
        "1. Run: ollama serve",
        "2. In another terminal, run: ollama pull llama3.2",
        "3. Restart this demo",
    ] {
        dispatcher.log_message(line, LogKind::Error);
    }
    false
}

/// Queues every demo task and logs the plan.
pub fn enqueue_demo_tasks(dispatcher: &mut Dispatcher) -> usize {
    let tasks = demo_tasks();
    dispatcher.log_message(
        &format!("[TASKS] Creating {} tasks for the team...", tasks.len()),
        LogKind::Info,
    );
    for (i, (description, persona)) in tasks.iter().enumerate() {
        dispatcher.create_task(description, persona);
        dispatcher.log_message(
            &format!("   {}. {} → {}", i + 1, preview(description, 50), role_label(persona)),
            LogKind::TextSecondary,
        );
    }
    tasks.len()
}

pub fn log_agent_summary(dispatcher: &Dispatcher) {
    dispatcher.log_message("[STATS] Agent Performance Summary", LogKind::Info);
    dispatcher.log_message(&"=".repeat(40), LogKind::TextDim);
    for report in dispatcher.agent_status() {
        let icon = if report.status == PersonaStatus::Completed { "[OK]" } else { "[WAIT]" };
        dispatcher.log_message(
            &format!(
                "{} {:15} | {:15} | Tasks: {}",
                icon, report.name, report.role, report.tasks_completed
            ),
            LogKind::TextSecondary,
        );
    }
    dispatcher.log_message(
        &format!("[TOTAL] Total tasks processed: {}", dispatcher.completed().len()),
        LogKind::Success,
    );
    dispatcher.log_message(&"=".repeat(40), LogKind::TextDim);
}

pub fn log_task_details(dispatcher: &Dispatcher) {
    dispatcher.log_message("[DETAILS] Detailed Task Results", LogKind::Info);
    dispatcher.log_message(&"=".repeat(50), LogKind::TextDim);
    for task in dispatcher.completed().iter().chain(dispatcher.failed().iter()) {
        let name = dispatcher
            .persona(&task.persona_type)
            .map(|p| p.name.as_str())
            .unwrap_or(task.persona_type.as_str());
        let when = task
            .completed_at
            .map(|t| t.format("%H:%M:%S").to_string())
            .unwrap_or_default();
        dispatcher.log_message(&format!("{} | {} | {}", task.id, name, when), LogKind::Info);
        dispatcher.log_message(&format!("Task: {}", task.description), LogKind::TextSecondary);
        let result = task.result.as_deref().unwrap_or("");
        dispatcher.log_message(&format!("Result: {}", preview(result, 100)), LogKind::Text);
        dispatcher.log_message(&"-".repeat(50), LogKind::TextDim);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persona::PersonaRegistry;

    #[test]
    fn demo_tasks_target_registered_personas() {
        let registry = PersonaRegistry::standard("llama3.2");
        let tasks = demo_tasks();
        assert_eq!(tasks.len(), 8);
        assert!(tasks.iter().all(|(_, persona)| registry.get(persona).is_some()));
    }

    #[test]
    fn role_label_falls_back_to_key() {
        assert_eq!(role_label("finance"), "Finance");
        assert_eq!(role_label("valet"), "valet");
    }
}
