//! `workflow-sim` CLI entry-point.
//!
//! Available sub-commands:
//! - `simulate`    — validate a workflow JSON file and print its trace.
//! - `validate`    — exit non-zero when a workflow has issues.
//! - `export`      — re-emit a workflow file in canonical form.
//! - `automations` — print the automation action catalog.
//! - `serve`       — start the HTTP API.

mod report;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use actions::{ActionRegistry, StaticCatalog};
use engine::{interchange, GraphModel};

#[derive(Parser)]
#[command(
    name = "workflow-sim",
    about = "Validate and dry-run workflow designs",
    version
)]
struct Cli {
    /// JSON file with the automation action catalog (defaults to the built-in one).
    #[arg(long, global = true, env = "WORKFLOW_CATALOG")]
    catalog: Option<PathBuf>,

    /// Artificial delay for every catalog lookup.
    #[arg(long, global = true, default_value_t = 0)]
    catalog_delay_ms: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a workflow file and print the simulated steps.
    Simulate {
        /// Path to the workflow JSON file.
        path: PathBuf,
        /// Print the result as JSON instead of a report.
        #[arg(long)]
        json: bool,
    },
    /// Validate a workflow file; exit code 1 when issues are found.
    Validate {
        /// Path to the workflow JSON file.
        path: PathBuf,
    },
    /// Print a workflow file in canonical serialized form.
    Export {
        /// Path to the workflow JSON file.
        path: PathBuf,
    },
    /// List the automation actions available to Automated nodes.
    Automations,
    /// Start the REST API server.
    Serve {
        #[arg(long, env = "WORKFLOW_BIND", default_value = "0.0.0.0:8080")]
        bind: String,
        /// Artificial delay before each simulation response.
        #[arg(long, default_value_t = 0)]
        simulate_delay_ms: u64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Logs go to stderr so `--json` output stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let registry = load_registry(cli.catalog.as_deref(), cli.catalog_delay_ms)?;

    match cli.command {
        Command::Simulate { path, json } => {
            let graph = load_workflow(&path)?;
            let catalog = registry.list_actions().await?;
            let result = engine::evaluate(&graph, &catalog);

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print!("{}", report::render(&result));
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Validate { path } => {
            let graph = load_workflow(&path)?;
            let catalog = registry.list_actions().await?;
            let result = engine::evaluate(&graph, &catalog);

            if result.valid {
                println!("✅ Workflow is valid ({} steps).", result.steps.len());
                Ok(ExitCode::SUCCESS)
            } else {
                eprintln!("❌ Validation failed:");
                for issue in &result.issues {
                    eprintln!("  - {issue}");
                }
                Ok(ExitCode::FAILURE)
            }
        }
        Command::Export { path } => {
            let graph = load_workflow(&path)?;
            println!("{}", interchange::to_json_pretty(&graph)?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Automations => {
            let catalog = registry.list_actions().await?;
            println!("{}", serde_json::to_string_pretty(&catalog)?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Serve {
            bind,
            simulate_delay_ms,
        } => {
            info!("Starting API server on {bind}");
            let config = api::ApiConfig {
                simulate_delay: Duration::from_millis(simulate_delay_ms),
            };
            api::serve(&bind, api::AppState::new(registry, config)).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn load_registry(path: Option<&Path>, delay_ms: u64) -> anyhow::Result<Arc<dyn ActionRegistry>> {
    let catalog = match path {
        Some(path) => StaticCatalog::from_path(path)?,
        None => StaticCatalog::default(),
    };
    Ok(Arc::new(catalog.with_latency(Duration::from_millis(delay_ms))))
}

fn load_workflow(path: &Path) -> anyhow::Result<GraphModel> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read file {}", path.display()))?;
    let graph = interchange::parse_document(&content)
        .with_context(|| format!("invalid workflow file {}", path.display()))?;
    info!(
        "loaded workflow {} ({} nodes, {} edges)",
        path.display(),
        graph.nodes.len(),
        graph.edges.len()
    );
    Ok(graph)
}
