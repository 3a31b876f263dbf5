//! Fibonacci memoization comparison plot - command line entry point
//!
//! Usage:
//! ```bash
//! fib_memo_plot --no-memo fib-no-memo-results.csv --memo fib-memo-results.csv \
//!     --output comparison.svg --set legend.position=2,140
//! ```

use anyhow::Context;
use clap::Parser;
use fib_memo_plot::config::PlotConfig;
use fib_memo_plot::pipeline;
use fib_memo_plot::timing::{registry, PropertyReader};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// CSV timings without memoization (overrides input.no_memo)
    #[arg(long = "no-memo")]
    no_memo: Option<PathBuf>,

    /// CSV timings with memoization (overrides input.memo)
    #[arg(long)]
    memo: Option<PathBuf>,

    /// Chart output path (overrides output.path)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON object of property values, e.g. {"plot.width": 1200}
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Property override KEY=VALUE (repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE")]
    overrides: Vec<String>,

    /// List all properties with their defaults and exit
    #[arg(long)]
    list_properties: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.list_properties {
        print_properties();
        return;
    }

    println!("Fibonacci memoization plot v{}\n", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(cli) {
        eprintln!("\n✗ {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli)?;
    let result = pipeline::run(&config)?;

    println!("\n✓ Saved {}", result.rendered.path.display());
    Ok(())
}

/// Resolve properties: config file, then `--set`, then explicit flags
fn load_config(cli: &Cli) -> anyhow::Result<PlotConfig> {
    let mut props = match &cli.config {
        Some(path) => {
            let props = PropertyReader::from_json_file(path)?;
            println!("  Loaded configuration from {}", path.display());
            props
        }
        None => PropertyReader::new(),
    };

    for assignment in &cli.overrides {
        props.apply_override(assignment)?;
    }

    let flags = [
        ("input.no_memo", &cli.no_memo),
        ("input.memo", &cli.memo),
        ("output.path", &cli.output),
    ];
    for (name, value) in flags {
        if let Some(path) = value {
            props.set(name, path.to_string_lossy())?;
        }
    }

    PlotConfig::from_properties(&props).context("Failed to resolve plot configuration")
}

fn print_properties() {
    for prop in registry().iter() {
        println!("{} = '{}'", prop.name, prop.default_value);
        if !prop.description.is_empty() {
            println!("    {}", prop.description);
        }
        if let Some(values) = &prop.valid_values {
            println!("    values: {}", values.join(", "));
        }
    }
}
