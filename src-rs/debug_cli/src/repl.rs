use std::io;

use crate::client::HTTPClient;
use crate::models::{CLIConfig, SubmitRequest};
use crate::render;

pub struct REPL {
    pub config: CLIConfig,
    pub client: HTTPClient,
}

impl REPL {
    pub fn new(config: CLIConfig, client: HTTPClient) -> Self {
        Self { config, client }
    }

    pub fn run(&mut self) {
        render::banner(&self.config);
        loop {
            render::prompt();
            let mut line = String::new();
            match io::stdin().read_line(&mut line) {
                Ok(0) | Err(_) => break,
                Ok(_) => {}
            }
            let line = line.trim().to_string();
            if line.is_empty() {
                continue;
            }
            if line.starts_with('/') {
                if self.handle_command(&line) {
                    break;
                }
                continue;
            }
            let persona = self.config.persona.clone();
            self.submit(&persona, &line);
        }
    }

    fn handle_command(&mut self, line: &str) -> bool {
        let mut parts = line.splitn(2, ' ');
        let cmd = parts.next().unwrap_or("").trim_start_matches('/');
        let rest = parts.next().unwrap_or("").trim();
        match cmd {
            "exit" | "quit" => return true,
            "help" => render::help(),
            "agents" => match self.client.agents() {
                Ok(agents) => render::agents(&agents),
                Err(err) => render::error(&err),
            },
            "tasks" => {
                let limit = rest.parse::<usize>().unwrap_or(10);
                match self.client.list_tasks(limit) {
                    Ok((counts, tasks)) => render::tasks(&counts, &tasks),
                    Err(err) => render::error(&err),
                }
            }
            "task" => {
                if rest.is_empty() {
                    render::error("usage: /task <id>");
                } else {
                    match self.client.get_task(rest) {
                        Ok(Some(task)) => render::task(&task),
                        Ok(None) => render::info(&format!("no task {}", rest)),
                        Err(err) => render::error(&err),
                    }
                }
            }
            "submit" => match rest.split_once(' ') {
                Some((persona, description)) if !description.trim().is_empty() => {
                    self.submit(persona, description.trim())
                }
                _ => render::error("usage: /submit <persona> <description>"),
            },
            "persona" => {
                if rest.is_empty() {
                    render::info(&format!("persona: {}", self.config.persona));
                } else {
                    self.config.persona = rest.to_string();
                    render::info("persona updated");
                }
            }
            "priority" => {
                if rest.is_empty() {
                    render::info(&format!("priority: {:?}", self.config.priority));
                } else if rest == "off" {
                    self.config.priority = None;
                    render::info("priority cleared");
                } else if let Ok(val) = rest.parse::<u8>() {
                    self.config.priority = Some(val.clamp(1, 5));
                    render::info("priority updated");
                } else {
                    render::error("invalid priority");
                }
            }
            "config" => render::config(&self.config),
            "base" => {
                if rest.is_empty() {
                    render::info(&format!("base: {}", self.config.base_url));
                } else {
                    match HTTPClient::new(rest) {
                        Ok(client) => {
                            self.config.base_url = rest.to_string();
                            self.client = client;
                            render::info("base url updated");
                        }
                        Err(err) => render::error(&err),
                    }
                }
            }
            _ => render::info("unknown command, type /help"),
        }
        false
    }

    fn submit(&self, persona: &str, description: &str) {
        let req = SubmitRequest {
            description: description.to_string(),
            persona: persona.to_string(),
            priority: self.config.priority,
        };
        match self.client.submit(req) {
            Ok(task) => render::submitted(&task),
            Err(err) => render::error(&err),
        }
    }
}
