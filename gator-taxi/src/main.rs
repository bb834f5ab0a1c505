//! gator-taxi: run a ride command file against a fresh registry.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use gator_dispatch::{DEFAULT_CAPACITY, DEFAULT_SURCHARGE, RideRegistry};
use gator_taxi::Driver;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Command line arguments.
#[derive(Parser, Debug)]
#[command(name = "gator-taxi", version)]
#[command(about = "Process ride insert, dispatch, cancel, update, and print commands")]
struct Args {
    /// Command file, one command per line
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// File receiving one line per query result
    #[arg(short, long, value_name = "PATH", default_value = "output_file.txt")]
    output: PathBuf,

    /// Maximum number of pending rides
    #[arg(long, default_value_t = DEFAULT_CAPACITY)]
    capacity: usize,

    /// Cost added when a trip is lengthened up to double
    #[arg(long, default_value_t = DEFAULT_SURCHARGE)]
    surcharge: u64,
}

fn enable_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    enable_tracing();

    let registry = RideRegistry::builder()
        .capacity(args.capacity)
        .surcharge(args.surcharge)
        .build()
        .context("invalid registry configuration")?;

    let input = File::open(&args.input)
        .with_context(|| format!("failed to open {}", args.input.display()))?;
    let output = File::create(&args.output)
        .with_context(|| format!("failed to create {}", args.output.display()))?;

    let mut driver = Driver::new(registry);
    let summary = driver.run(BufReader::new(input), BufWriter::new(output))?;

    info!(
        executed = summary.executed,
        skipped = summary.skipped,
        written = summary.written,
        pending = driver.registry().len(),
        output = %args.output.display(),
        "done"
    );
    Ok(())
}
