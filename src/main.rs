//! Bike-Parts main entry point
//!
//! This is the command-line interface for pricing a custom bike build.

use anyhow::Context;
use bike_parts::bike::load_bike_spec;
use bike_parts::config::load_config_with_hash;
use bike_parts::output::{print_bill, print_plan, write_markdown_summary, BillSummary};
use bike_parts::Orchestrator;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Exit status when some components could not be priced
const EXIT_PARTIAL: u8 = 2;

/// Bike-Parts: a priced bill of materials for a custom bicycle
///
/// Bike-Parts maps a bike specification to vendor product pages, reads the
/// current name and price of each part and totals the build.
#[derive(Parser, Debug)]
#[command(name = "bike-parts")]
#[command(version)]
#[command(about = "Prices a custom bike build from vendor product pages", long_about = None)]
struct Cli {
    /// Path to the TOML bike specification
    #[arg(value_name = "SPEC")]
    spec: PathBuf,

    /// Vendor and catalog configuration (defaults to the built-in catalog)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Resolve product pages without fetching them
    #[arg(long, conflicts_with = "summary")]
    plan: bool,

    /// Also write a markdown summary of the bill to this file
    #[arg(long, value_name = "FILE")]
    summary: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    match &cli.config {
        Some(path) => tracing::info!("Loading configuration from: {}", path.display()),
        None => tracing::info!("Using built-in configuration"),
    }
    let (config, config_hash) = load_config_with_hash(cli.config.as_deref())
        .context("Failed to load configuration")?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    let spec = load_bike_spec(&cli.spec)
        .with_context(|| format!("Failed to load bike specification {}", cli.spec.display()))?;

    let orchestrator = Orchestrator::new(config).context("Failed to build HTTP client")?;

    if cli.plan {
        let plan = orchestrator.plan(spec);
        print_plan(&plan);
        return Ok(exit_status(plan.unresolved_count() == 0));
    }

    let run = orchestrator.run(spec).await;
    print_bill(&run.bill);

    let complete = run.bill.is_complete();
    if let Some(path) = &cli.summary {
        let summary = BillSummary::new(config_hash, run.spec, run.patches, run.bill);
        write_markdown_summary(&summary, path)
            .with_context(|| format!("Failed to write summary to {}", path.display()))?;
        tracing::info!("Summary written to: {}", path.display());
    }

    Ok(exit_status(complete))
}

fn exit_status(complete: bool) -> ExitCode {
    if complete {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_PARTIAL)
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("bike_parts=info,warn"),
            1 => EnvFilter::new("bike_parts=debug,info"),
            2 => EnvFilter::new("bike_parts=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}
