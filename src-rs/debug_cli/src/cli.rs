use clap::Parser;

use crate::models::CLIConfig;

#[derive(Parser)]
#[command(name = "store-agents-debug", about = "Interactive client for the store-agents status API")]
struct Args {
    /// Status API base URL
    #[arg(long, env = "STORE_AGENTS_URL", default_value = "http://localhost:8080")]
    base: String,
    /// Persona that plain input lines are submitted to
    #[arg(long, env = "STORE_AGENTS_PERSONA", default_value = "sales")]
    persona: String,
    /// Priority (1-5) attached to submitted tasks
    #[arg(long, env = "STORE_AGENTS_PRIORITY")]
    priority: Option<u8>,
}

pub fn parse_config() -> CLIConfig {
    let args = Args::parse();
    CLIConfig {
        base_url: args.base,
        persona: args.persona,
        priority: args.priority.map(|p| p.clamp(1, 5)),
    }
}
