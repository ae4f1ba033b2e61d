#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{Parser, Subcommand};
use collabnet_analysis::AnalysisConfig;
use output::{OutputMode, render_error, resolve_output_mode};
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "cnet: social-interaction graph analysis for repository collaboration history",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Output format (overrides `--json` and `CNET_FORMAT`).
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Analysis config file (default: ./collabnet.toml, then the user config dir).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Run the full network analysis",
        long_about = "Compute centrality rankings, cohesion metrics, and Girvan–Newman communities for an edge list.",
        after_help = "EXAMPLES:\n    # Analyze with defaults\n    cnet analyze edges.csv\n\n    # Dense backend, 5 splits, top 10, JSON output\n    cnet analyze edges.csv --backend dense --splits 5 --top 10 --json"
    )]
    Analyze(cmd::analyze::AnalyzeArgs),

    #[command(
        about = "Export the graph topology as GEXF",
        after_help = "EXAMPLES:\n    cnet export edges.csv out/graph.gexf"
    )]
    Export(cmd::export::ExportArgs),

    #[command(
        about = "Show graph statistics and the edge-list content hash",
        after_help = "EXAMPLES:\n    cnet stats edges.csv --json\n\n    # Comment interactions only\n    cnet stats edges.csv --kind comments"
    )]
    Stats(cmd::stats::StatsArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("CNET_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "collabnet=debug,cnet=debug,info"
        } else {
            "collabnet=info,cnet=info,warn"
        })
    });

    let format = env::var("CNET_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn run(cli: &Cli, output: OutputMode) -> anyhow::Result<()> {
    let working_dir = env::current_dir()?;
    let (config, source) = AnalysisConfig::resolve(cli.config.as_deref(), &working_dir)?;
    match &source {
        Some(path) => info!(path = %path.display(), "using analysis config"),
        None => debug!("no config file found, using defaults"),
    }

    match &cli.command {
        Commands::Analyze(args) => cmd::analyze::run_analyze(args, config, output),
        Commands::Export(args) => cmd::export::run_export(args, config.backend, output),
        Commands::Stats(args) => cmd::stats::run_stats(args, config.backend, output),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let output = resolve_output_mode(cli.format, cli.json);
    match run(&cli, output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if render_error(output, &err).is_err() {
                eprintln!("error: {err:#}");
            }
            ExitCode::FAILURE
        }
    }
}
