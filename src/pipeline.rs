//! Plot generation pipeline
//!
//! One linear pass, executed once per invocation:
//! 1. Load the no-memo table
//! 2. Load the memo table
//! 3. Rescale the memo table's `time` column to seconds
//! 4. Build the comparison chart and render it
//!
//! Any load failure aborts before anything is rendered.

use crate::config::PlotConfig;
use crate::render::{self, ChartSpec, OutputTarget, RenderError, RenderedPlot};
use crate::timing::{ConfigError, DataLoadError, TimingTable};
use thiserror::Error;

/// Error type for pipeline operations
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Failed to load timing data")]
    Load(#[from] DataLoadError),

    #[error("Failed to render plot")]
    Render(#[from] RenderError),

    #[error("Invalid configuration")]
    Config(#[from] ConfigError),
}

/// Everything produced by one run
#[derive(Debug, Clone)]
pub struct PlotResult {
    pub no_memo: TimingTable,
    /// Memoized timings after rescaling
    pub memo: TimingTable,
    pub chart: ChartSpec,
    pub rendered: RenderedPlot,
}

/// Load both tables, rescale the memoized one and render the chart
pub fn run(config: &PlotConfig) -> Result<PlotResult, PipelineError> {
    print_config_info(config);

    println!("\n[1/4] Loading {}...", config.no_memo_path.display());
    let no_memo = TimingTable::load(&config.no_memo_path)?;
    print_table_info(&no_memo);

    println!("\n[2/4] Loading {}...", config.memo_path.display());
    let memo = TimingTable::load(&config.memo_path)?;
    print_table_info(&memo);

    println!(
        "\n[3/4] Rescaling memoized timings (÷ {})...",
        config.memo_time_divisor
    );
    let memo = memo.rescale(config.memo_time_divisor);
    print_table_info(&memo);

    println!("\n[4/4] Rendering plot...");
    let chart = ChartSpec::comparison(&no_memo, &memo, config);
    let target = OutputTarget::new(config.output_path.as_deref(), config.to_output_format())?;
    println!(
        "  {} points in {} series → {} ({})",
        chart.point_count(),
        chart.series.len(),
        target.path.display(),
        target.format
    );
    let rendered = render::render(&chart, &target)?;
    println!(
        "✓ Plot generated ({} bytes, {}×{})",
        rendered.size, rendered.width, rendered.height
    );

    Ok(PlotResult {
        no_memo,
        memo,
        chart,
        rendered,
    })
}

/// Display resolved configuration
fn print_config_info(config: &PlotConfig) {
    println!("Configuration:");
    println!("  No memoization: {}", config.no_memo_path.display());
    println!("  Memoization: {}", config.memo_path.display());
    println!("  Memo time divisor: {}", config.memo_time_divisor);
    match &config.output_path {
        Some(path) => println!("  Output: {}", path.display()),
        None => println!("  Output: none"),
    }
    println!(
        "  Plot dimensions: {} × {}",
        config.plot_width, config.plot_height
    );
    println!(
        "  Legend position: ({}, {})",
        config.legend_position.0, config.legend_position.1
    );
}

fn print_table_info(table: &TimingTable) {
    println!("✓ {} rows", table.len());
    if let (Some((n_min, n_max)), Some((t_min, t_max))) = (table.n_range(), table.time_range()) {
        println!("  n: {} to {}", n_min, n_max);
        println!("  time: {} to {}", t_min, t_max);
    }
}
