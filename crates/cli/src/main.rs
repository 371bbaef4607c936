//! `workflow-builder` CLI entry-point.
//!
//! Available sub-commands:
//! - `types`   : list the node and edge types the editor offers.
//! - `new`     : build the starter input → prompt → output workflow.
//! - `inspect` : load a workflow request file and summarise it.
//! - `execute` : submit a workflow to the execution service.
//! - `validate`: check a workflow locally, then against the service.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use api::{ApiConfig, ExecutionService, HttpExecutionService, Outcome, SubmissionTracker};
use engine::session::seeded_session;
use engine::{Connection, EditorSession, WorkflowRequest, DEFAULT_INPUT};
use nodes::EdgeKind;

#[derive(Parser)]
#[command(
    name = "workflow-builder",
    about = "Build, inspect and run AI prompt workflows",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List node types, edge types and models.
    Types,
    /// Print a starter workflow request (input → prompt → output).
    New {
        /// Make the prompt → output edge conditional on this label.
        #[arg(long)]
        condition: Option<String>,
        /// Execution input as a JSON object.
        #[arg(long, default_value = DEFAULT_INPUT)]
        input: String,
        /// Seed for node placement.
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
    /// Summarise a workflow request file.
    Inspect {
        /// Path to the workflow request JSON file.
        path: PathBuf,
    },
    /// Submit a workflow request file for execution.
    Execute {
        path: PathBuf,
        /// Execution input as a JSON object; defaults to the file's input.
        #[arg(long)]
        input: Option<String>,
        /// Overrides `WORKFLOW_API_URL`.
        #[arg(long)]
        base_url: Option<String>,
    },
    /// Check a workflow request file locally and with the validation service.
    Validate {
        path: PathBuf,
        /// Overrides `WORKFLOW_API_URL`.
        #[arg(long)]
        base_url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Types => {
            print_types();
            Ok(ExitCode::SUCCESS)
        }
        Command::New { condition, input, seed } => {
            let input = engine::parse_input(&input)?;
            let session = starter_session(seed, condition.as_deref())?;
            println!("{}", serde_json::to_string_pretty(&session.serialize(input))?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Inspect { path } => {
            let (session, _) = load(&path)?;
            print_summary(&session)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Execute { path, input, base_url } => {
            let (session, request) = load(&path)?;
            let input = match input {
                Some(text) => engine::parse_input(&text)?,
                None => request.input,
            };
            let service = HttpExecutionService::new(api_config(base_url))?;
            info!(base_url = %service.config().base_url, "executing workflow");

            let mut tracker = SubmissionTracker::new();
            tracker.submit(&service, &session.serialize(input)).await;
            match tracker.outcome() {
                Some(Outcome::Success(resp)) => {
                    println!("{}", serde_json::to_string_pretty(resp)?);
                    Ok(ExitCode::SUCCESS)
                }
                Some(Outcome::Failure(message)) => {
                    eprintln!("Execution failed: {message}");
                    Ok(ExitCode::FAILURE)
                }
                None => bail!("execution did not settle"),
            }
        }
        Command::Validate { path, base_url } => {
            let (session, request) = load(&path)?;
            let report = session.check_integrity()?;
            for dangling in &report.dangling {
                println!(
                    "warning: edge '{}' has a missing {} node '{}'",
                    dangling.edge_id, dangling.side, dangling.node_id
                );
            }

            let service = HttpExecutionService::new(api_config(base_url))?;
            let remote = service.validate(&request).await;
            if remote.valid {
                println!("Workflow is valid.");
                Ok(ExitCode::SUCCESS)
            } else {
                for error in remote.errors() {
                    println!("error: {error}");
                }
                Ok(ExitCode::FAILURE)
            }
        }
    }
}

/// Environment settings, with `--base-url` taking precedence.
fn api_config(base_url: Option<String>) -> ApiConfig {
    let config = ApiConfig::from_env();
    match base_url {
        Some(url) => config.with_base_url(url),
        None => config,
    }
}

/// Read a request file and load its workflow into a fresh session.
fn load(path: &Path) -> anyhow::Result<(EditorSession, WorkflowRequest)> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read file {}", path.display()))?;
    let request: WorkflowRequest = serde_json::from_str(&content)
        .with_context(|| format!("{} is not a workflow request", path.display()))?;

    let mut session = EditorSession::new();
    session.load_request(&request)?;
    Ok((session, request))
}

fn starter_session(seed: u64, condition: Option<&str>) -> anyhow::Result<EditorSession> {
    let mut session = seeded_session(seed);
    let (Some(input), Some(prompt), Some(output)) = (
        session.add_node("input", None),
        session.add_node("prompt", None),
        session.add_node("output", None),
    ) else {
        bail!("node catalog is missing a starter type");
    };

    session.connect(Connection::new(&input, &prompt));
    let last = session.connect(Connection::new(&prompt, &output));

    if let Some(condition) = condition {
        session.click_edge(&last);
        let editor = session.edge_editor_mut()?;
        editor.set_kind(EdgeKind::Conditional)?;
        editor.set_condition(condition);
        session.save()?;
    }
    Ok(session)
}

fn print_types() {
    println!("Node types:");
    for config in nodes::NODE_TYPES {
        println!(
            "  {:<8} {:<8} {}  {}",
            config.kind, config.label, config.color, config.description
        );
    }
    println!("Edge types:");
    for config in nodes::EDGE_TYPES {
        println!("  {:<12} {}", config.kind, config.description);
    }
    println!("Models: {}", nodes::DEFAULT_MODELS.join(", "));
}

fn print_summary(session: &EditorSession) -> anyhow::Result<()> {
    let store = session.store();
    let stats = session.stats();
    println!("Nodes: {}  Edges: {}", stats.nodes, stats.edges);

    for node in store.nodes() {
        println!("  [{}] {}: {}", node.type_name(), node.id, node.data.display_text());
    }
    for edge in store.edges() {
        let kind = edge.kind.clone().unwrap_or_default();
        let label = match kind {
            EdgeKind::Conditional => format!(" ({})", edge.condition_label()),
            _ => String::new(),
        };
        println!("  {} → {} [{}]{}", edge.source, edge.target, kind, label);
    }

    let report = session.check_integrity()?;
    if report.is_clean() {
        println!("No dangling edges.");
    } else {
        for dangling in &report.dangling {
            println!(
                "  dangling: edge '{}' {} '{}'",
                dangling.edge_id, dangling.side, dangling.node_id
            );
        }
    }
    Ok(())
}
