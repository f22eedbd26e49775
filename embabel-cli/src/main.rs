//! Embabel CLI - demo runner for the Embabel agent runtime.
//!
//! Single binary that provides:
//! - `embabel run` - run the bundled zoo demo agent to completion
//! - `embabel init` - write a default runtime config file
//! - `embabel` (no args) - print usage

mod demo;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, EnvFilter};

use embabel_agent::config::AgentRuntimeConfig;
use embabel_agent::driver::{concurrent, sequential};
use embabel_agent::process::{AgentProcess, PlannerType, ProcessOptions, ProcessStatus, Verbosity};
use embabel_agent::policy::EarlyTerminationPolicy;
use embabel_events::{EventKind, LogLevel, OutputChannel};

use demo::{Elephant, Scenario, Zoo};

#[derive(Parser)]
#[command(name = "embabel")]
#[command(about = "Embabel agent runtime demo", version)]
struct Cli {
    /// Runtime config file (YAML); unset fields fall back to built-in defaults
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the zoo demo agent to completion
    Run {
        /// Which planner drives the process
        #[arg(long, value_enum, default_value = "goap")]
        planner: PlannerArg,

        /// Dispatch every achievable action per tick instead of one at a time
        #[arg(long)]
        concurrent: bool,

        /// Which elephant `makeElephant` produces
        #[arg(long, value_enum, default_value = "success")]
        scenario: Scenario,
    },

    /// Write a default runtime config file
    Init {
        /// Where to write it
        #[arg(long, default_value = "embabel.yaml")]
        path: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PlannerArg {
    Goap,
    Utility,
}

impl From<PlannerArg> for PlannerType {
    fn from(value: PlannerArg) -> Self {
        match value {
            PlannerArg::Goap => PlannerType::Goap,
            PlannerArg::Utility => PlannerType::Utility,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { EnvFilter::new("debug") } else { EnvFilter::new("info") };
    fmt().with_env_filter(filter).with_target(false).init();

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Some(Commands::Run { planner, concurrent, scenario }) => run_demo(config, planner.into(), concurrent, scenario).await,
        Some(Commands::Init { path }) => init_config(&path),
        None => {
            println!("Embabel - goal-directed agent runtime");
            println!();
            println!("Usage: embabel <COMMAND>");
            println!();
            println!("Commands:");
            println!("  run    Run the zoo demo agent to completion");
            println!("  init   Write a default runtime config file");
            println!();
            println!("Run 'embabel --help' for more information.");
            Ok(())
        }
    }
}

fn load_config(path: Option<&std::path::Path>) -> Result<AgentRuntimeConfig> {
    let Some(path) = path else {
        return Ok(AgentRuntimeConfig::default());
    };
    let source = std::fs::read_to_string(path).with_context(|| format!("reading config at {}", path.display()))?;
    AgentRuntimeConfig::from_yaml(&source).with_context(|| format!("parsing config at {}", path.display()))
}

async fn run_demo(config: AgentRuntimeConfig, planner_type: PlannerType, concurrent_driver: bool, scenario: Scenario) -> Result<()> {
    let definition = std::sync::Arc::new(demo::build(scenario));
    let output_channel = std::sync::Arc::new(OutputChannel::default());

    let mut listener = output_channel.subscribe();
    let listener_task = tokio::spawn(async move {
        while let Ok(event) = listener.recv().await {
            print_event(&event.kind);
        }
    });

    let planner_type = ProcessOptions::coerce_planner_type(planner_type, true, &output_channel);

    let mut options = ProcessOptions {
        planner_type,
        verbosity: Verbosity {
            show_prompts: config.show_prompts,
            show_planning: config.show_planning,
            show_long_plans: config.show_long_plans,
        },
        output_channel,
        ..ProcessOptions::default()
    };
    if config.on_stuck_terminates {
        options.early_termination_policies.push(EarlyTerminationPolicy::on_stuck());
    }

    let mut process = AgentProcess::new(definition, options);
    tracing::info!(process_id = %process.id, scenario = ?scenario, "starting zoo demo agent");

    let status = if concurrent_driver {
        concurrent::run(&mut process, config.max_ticks).await?
    } else {
        sequential::run(&mut process, config.max_ticks).await?
    };

    // Give the listener task a beat to drain the final events before we
    // print the summary underneath them.
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    listener_task.abort();

    print_summary(&status, &process);
    Ok(())
}

fn print_event(kind: &EventKind) {
    match kind {
        EventKind::Progress { message } => println!("[progress] {message}"),
        EventKind::Logging { level, message } => println!("[{}] {message}", log_level_label(*level)),
        EventKind::Completion { goal_name } => println!("[completion] goal `{goal_name}` satisfied"),
        EventKind::Failure { reason } => println!("[failure] {reason}"),
        EventKind::Message { content, .. } => println!("[message] {content}"),
        EventKind::Content { type_name, .. } => println!("[content] {type_name}"),
        EventKind::RagRequest { query } => println!("[rag-request] {query}"),
        EventKind::RagResponse { summary } => println!("[rag-response] {summary}"),
    }
}

fn log_level_label(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Trace => "trace",
        LogLevel::Debug => "debug",
        LogLevel::Info => "info",
        LogLevel::Warn => "warn",
        LogLevel::Error => "error",
    }
}

fn print_summary(status: &ProcessStatus, process: &AgentProcess) {
    println!();
    println!("Status: {status:?}");
    println!("History:");
    for entry in &process.history {
        println!("  {} -> {:?}", entry.action_name, entry.status);
    }

    if let Some(elephant) = process.blackboard.last_of_type::<Elephant>() {
        println!("Elephant: {} (age {})", elephant.name, elephant.age);
    }
    if let Some(zoo) = process.blackboard.last_of_type::<Zoo>() {
        println!("Zoo: built around {}", zoo.elephant_name);
    } else {
        println!("Zoo: none");
    }
}

fn init_config(path: &std::path::Path) -> Result<()> {
    if path.exists() {
        println!("{} already exists, leaving it untouched", path.display());
        return Ok(());
    }

    let default_config = r#"# Embabel agent runtime configuration
planner_type: goap
max_ticks: 64
on_stuck_terminates: true
show_planning: false
show_prompts: false
show_long_plans: false
"#;
    std::fs::write(path, default_config).with_context(|| format!("writing config to {}", path.display()))?;

    println!("Wrote {}", path.display());
    println!();
    println!("Next steps:");
    println!("  embabel run --config {}", path.display());

    Ok(())
}
