use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonaStatus {
    Idle,
    Working,
    Completed,
    Error,
}

impl PersonaStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PersonaStatus::Idle => "idle",
            PersonaStatus::Working => "working",
            PersonaStatus::Completed => "completed",
            PersonaStatus::Error => "error",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Persona {
    pub key: String,
    pub name: String,
    pub role: String,
    pub model: String,
    pub instructions: String,
    pub tools: Vec<String>,
    pub status: PersonaStatus,
    pub tasks_completed: u32,
}

impl Persona {
    pub fn new(key: &str, name: &str, role: &str, model: &str, instructions: &str) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            role: role.to_string(),
            model: model.to_string(),
            instructions: instructions.to_string(),
            tools: Vec::new(),
            status: PersonaStatus::Idle,
            tasks_completed: 0,
        }
    }

    pub fn with_tools(mut self, tools: &[&str]) -> Self {
        self.tools = tools.iter().map(|t| t.to_string()).collect();
        self
    }

    /// Identity line followed by the persona's fixed preamble.
    pub fn system_prompt(&self) -> String {
        format!("You are {}, a {}. {}", self.name, self.role, self.instructions)
    }
}

/// One row of the status report.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PersonaStatusReport {
    pub key: String,
    pub name: String,
    pub role: String,
    pub status: PersonaStatus,
    pub tasks_completed: u32,
}

impl From<&Persona> for PersonaStatusReport {
    fn from(persona: &Persona) -> Self {
        Self {
            key: persona.key.clone(),
            name: persona.name.clone(),
            role: persona.role.clone(),
            status: persona.status,
            tasks_completed: persona.tasks_completed,
        }
    }
}
