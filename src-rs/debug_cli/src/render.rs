use std::io::{self, Write};

use crate::models::{AgentInfo, CLIConfig, TaskCounts, TaskInfo};

pub fn banner(cfg: &CLIConfig) {
    println!("Store Agents Debug CLI");
    println!("API: {}", cfg.base_url);
    println!("Persona: {}  Priority: {}", cfg.persona, priority_label(cfg.priority));
    println!("Type a task to submit it, or /help for commands.");
}

pub fn prompt() {
    print!("> ");
    let _ = io::stdout().flush();
}

pub fn help() {
    println!("Commands:");
    println!("  /help                  Show commands");
    println!("  /exit | /quit          Exit");
    println!("  /agents                List personas and their status");
    println!("  /tasks [limit]         List tasks, newest first");
    println!("  /task <id>             Show one task with its result");
    println!("  /submit <persona> <description>");
    println!("                         Submit a task to a specific persona");
    println!("  /persona <key>         Set persona for plain input");
    println!("  /priority <1-5|off>    Set priority for submitted tasks");
    println!("  /config                Show current config");
    println!("  /base <url>            Update base URL");
}

pub fn submitted(task: &TaskInfo) {
    println!("queued {} for {} [{}]", task.id, task.persona_type, task.status);
}

pub fn agents(agents: &[AgentInfo]) {
    if agents.is_empty() {
        println!("no agents");
        return;
    }
    for agent in agents {
        println!(
            "{:10} {:32} {:26} {:10} tasks: {}",
            agent.key, agent.name, agent.role, agent.status, agent.tasks_completed
        );
    }
}

pub fn tasks(counts: &TaskCounts, tasks: &[TaskInfo]) {
    println!(
        "total {}  completed {}  failed {}  pending {}",
        counts.total_tasks, counts.completed_tasks, counts.failed_tasks, counts.pending_tasks
    );
    if tasks.is_empty() {
        println!("no tasks");
        return;
    }
    for task in tasks {
        println!("[{}] {} ({}) - {}", task.status, task.id, task.persona_type, task.description);
    }
}

pub fn task(task: &TaskInfo) {
    println!("{} [{}] -> {}", task.id, task.status, task.persona_type);
    println!("  description: {}", task.description);
    if let Some(details) = &task.details {
        println!("  priority: {}", details.priority);
        for (key, value) in &details.context {
            println!("  context {}: {}", key, value);
        }
        if !details.tools.is_empty() {
            println!("  tools: {}", details.tools.join(", "));
        }
    }
    println!("  retries: {}", task.retry_count);
    if let Some(at) = &task.completed_at {
        println!("  finished: {}", at);
    }
    if let Some(result) = &task.result {
        println!("  result: {}", result);
    }
}

pub fn config(cfg: &CLIConfig) {
    println!("config:");
    println!("  base: {}", cfg.base_url);
    println!("  persona: {}", cfg.persona);
    println!("  priority: {}", priority_label(cfg.priority));
}

fn priority_label(priority: Option<u8>) -> String {
    priority.map(|p| p.to_string()).unwrap_or_else(|| "-".to_string())
}

pub fn info(msg: &str) {
    println!("{}", msg);
}

pub fn error(msg: &str) {
    eprintln!("error: {}", msg);
}
