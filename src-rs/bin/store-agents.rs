use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use store_agents_rs::api::{self, StatusServer};
use store_agents_rs::demo;
use store_agents_rs::helpers::{client_config_from_env, dispatcher_config_from_env};
use store_agents_rs::llm::{GenerationClient, InteractionEvent};
use store_agents_rs::persona::PersonaRegistry;
use store_agents_rs::{Dispatcher, LogKind};

#[derive(Parser)]
#[command(name = "store-agents", about = "CarMax store agents backed by a local Ollama server")]
struct Args {
    /// Ollama base URL (defaults to OLLAMA_URL or http://localhost:11434)
    #[arg(long, global = true)]
    base_url: Option<String>,
    /// Model used by every persona (defaults to OLLAMA_MODEL or llama3.2)
    #[arg(long, global = true)]
    model: Option<String>,
    #[command(subcommand)]
    command: Option<Cmd>,
}

#[derive(Subcommand)]
enum Cmd {
    /// Run the scripted store demo and print the reports
    Demo {
        /// Try `ollama serve` when the server does not answer
        #[arg(long)]
        autostart: bool,
        /// Pause between tasks in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,
    },
    /// Serve the status API and process submitted tasks
    Serve {
        #[arg(long, env = "PORT", default_value_t = 8080)]
        port: u16,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_dispatcher(args: &Args, delay_ms: Option<u64>) -> Result<Dispatcher, Box<dyn Error>> {
    let mut client_cfg = client_config_from_env();
    if let Some(url) = &args.base_url {
        client_cfg.base_url = url.clone();
    }
    if let Some(model) = &args.model {
        client_cfg.model = model.clone();
    }
    let mut dispatch_cfg = dispatcher_config_from_env();
    if let Some(ms) = delay_ms {
        dispatch_cfg.inter_task_delay = Duration::from_millis(ms);
    }

    let personas = PersonaRegistry::standard(&client_cfg.model);
    let client = GenerationClient::new(client_cfg)?.with_interaction_callback(Arc::new(
        |event: &InteractionEvent| {
            info!(kind = event.kind(), data = %event.data(), "ollama interaction");
        },
    ));
    Ok(Dispatcher::new(dispatch_cfg, personas, Arc::new(client)))
}

fn run_demo(args: &Args, autostart: bool, delay_ms: Option<u64>) -> Result<(), Box<dyn Error>> {
    println!("{}", "=".repeat(70));
    println!("           CarMax Store Demo");
    println!("  Team: Sales | Appraisal | Finance | Manager");
    println!("{}", "=".repeat(70));

    let mut dispatcher = build_dispatcher(args, delay_ms)?;
    let model = dispatcher
        .personas()
        .all()
        .first()
        .map(|p| p.model.clone())
        .unwrap_or_default();
    if !demo::check_connection(&dispatcher, &model, autostart) {
        return Err("model server unavailable".into());
    }

    dispatcher.log_message("[START] Starting CarMax Store Demo", LogKind::Info);
    demo::enqueue_demo_tasks(&mut dispatcher);
    let summary = dispatcher.process_all();
    demo::log_agent_summary(&dispatcher);
    demo::log_task_details(&dispatcher);
    if !summary.all_succeeded() {
        warn!(failed = ?summary.failed, "some demo tasks failed");
    }
    Ok(())
}

fn run_server(args: &Args, port: u16) -> Result<(), Box<dyn Error>> {
    // The blocking HTTP client must be created and dropped outside the
    // async runtime, so the dispatcher is built here and lives on the worker.
    let dispatcher = build_dispatcher(args, None)?;
    let (worker, join) = api::spawn(dispatcher);
    let server = StatusServer::new(port, worker);
    println!("store-agents listening on :{}", port);

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server.start())?;
    drop(server);
    let _ = join.join();
    Ok(())
}

fn main() {
    init_logging();
    let args = Args::parse();
    let result = match &args.command {
        Some(Cmd::Serve { port }) => run_server(&args, *port),
        Some(Cmd::Demo { autostart, delay_ms }) => run_demo(&args, *autostart, *delay_ms),
        None => run_demo(&args, false, None),
    };
    if let Err(err) = result {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}
