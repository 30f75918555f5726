use std::path::PathBuf;
use std::time::Instant;
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use sweeplib::config::{RenderConfig, SweepConfig};
use sweeplib::invoker::ExternalSimulator;
use sweeplib::render::render_document;
use sweeplib::sweep::sweep_to_table;

#[cfg(debug_assertions)]
const DEBUG_DEFAULT: bool = true;

#[cfg(not(debug_assertions))]
const DEBUG_DEFAULT: bool = false;

#[derive(Parser, Debug)]
#[command(about = String::from("Sweeps a cache simulator across cache configurations and charts the results"))]
struct Args {
    #[command(subcommand)]
    stage: Stage,

    #[arg(short, long, global = true)]
    performance: bool,

    #[arg(short, long, default_value_t = DEBUG_DEFAULT, global = true)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Stage {
    /// Runs the simulator once per configuration point and appends the metrics to a result table
    Sweep {
        /// JSON sweep configuration
        config: PathBuf,
        /// Result table to append to, overriding the configuration
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Also print the collected records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Draws comparison charts for result tables into one HTML document
    Render {
        /// JSON render configuration. Without one, the block size, cache size and associativity
        /// tables in the working directory are rendered
        config: Option<PathBuf>,
        /// Document to write, overriding the configuration
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<(), String> {
    let start = Instant::now();
    let args = Args::parse();
    init_logging(args.debug);
    if args.debug {
        #[cfg(debug_assertions)]
        debug!("Running the debug binary, debug logging is enabled by default. Pass --release to cargo to turn it off");
    }
    match args.stage {
        Stage::Sweep { config, output, json } => sweep(config, output, json)?,
        Stage::Render { config, output } => render(config, output)?,
    }
    if args.performance {
        let total_time = Instant::now() - start;
        println!("Total execution time: {}s", total_time.as_nanos() as f64 / 1e9);
    }
    Ok(())
}

fn sweep(config_path: PathBuf, output: Option<PathBuf>, json: bool) -> Result<(), String> {
    let mut config = SweepConfig::load(&config_path).map_err(|e| e.to_string())?;
    if let Some(output) = output {
        config.output = output;
    }
    debug!(?config, "parsed sweep configuration");
    info!(points = config.axes.len(), table = %config.output.display(), "starting sweep");
    let mut simulator = ExternalSimulator::new(config.simulator.clone());
    let outcome = sweep_to_table(&config.axes, &mut simulator, &config.output)
        .map_err(|e| format!("Sweep failed: {e}"))?;
    println!(
        "Results written to {} ({} of {} points succeeded)",
        config.output.display(),
        outcome.records.len(),
        outcome.attempted()
    );
    for failure in &outcome.failures {
        println!("Skipped {}: {}", failure.point, failure.reason);
    }
    if json {
        println!("{}", serde_json::to_string_pretty(&outcome.records).map_err(|e| format!("Couldn't serialise the output {e}"))?);
    }
    Ok(())
}

fn render(config_path: Option<PathBuf>, output: Option<PathBuf>) -> Result<(), String> {
    let mut config = match config_path {
        Some(path) => RenderConfig::load(&path).map_err(|e| e.to_string())?,
        None => RenderConfig::default(),
    };
    if let Some(output) = output {
        config.output = output;
    }
    debug!(?config, "parsed render configuration");
    let summary = render_document(&config).map_err(|e| format!("Rendering failed: {e}"))?;
    println!(
        "Successfully generated {} from {} of {} tables",
        config.output.display(),
        summary.rendered.len(),
        config.tables.len()
    );
    for (path, reason) in &summary.skipped {
        println!("Skipped {}: {reason}", path.display());
    }
    Ok(())
}

// RUST_LOG takes precedence over --debug
fn init_logging(debug: bool) {
    let default = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}
