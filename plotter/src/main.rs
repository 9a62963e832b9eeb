use anyhow::Context;
use clap::{Parser, Subcommand};
use generator::profile::{write_capture_set, CaptureConfig};
use std::path::PathBuf;
use workflow::config::AnalysisConfig;
use workflow::runner::{AngularChart, Runner};

mod generator;
mod render;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Plots PDoA rotation captures")]
struct Args {
    /// Load an analysis config from YAML
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Directory holding the <index>.csv captures
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    /// Number of evenly spaced rotation positions
    #[arg(long, global = true)]
    positions: Option<u32>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Grid of per-capture time series
    Grid {
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Mean with ±1 std error bars against angle
    ErrorBars {
        #[arg(long)]
        output: Option<PathBuf>,
        /// Also write the per-angle statistics as JSON
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Polar radiation pattern of the mean against angle
    Radiation {
        #[arg(long)]
        output: Option<PathBuf>,
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Write a synthetic capture sweep
    Generate {
        #[arg(long)]
        out_dir: PathBuf,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value_t = 200)]
        samples: usize,
        /// Positions recorded with random signs, e.g. `3,6,11`
        #[arg(long, value_delimiter = ',')]
        sign_artifacts: Vec<u32>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let base_config = if let Some(path) = args.config {
        AnalysisConfig::load(path)?
    } else {
        AnalysisConfig::default()
    };
    let analysis_config = base_config.with_overrides(args.data_dir, args.positions);

    let runner = Runner::new(analysis_config);

    match args.command {
        Command::Grid { output } => {
            let output = output.unwrap_or_else(|| runner.config().grid.output.clone());
            let outcome = runner.run_grid(&output)?;
            match outcome.output {
                Some(path) => {
                    println!("Plot saved as {}", path.display());
                    if outcome.failed > 0 {
                        println!(
                            "{} of {} captures could not be read",
                            outcome.failed, outcome.panels
                        );
                    }
                }
                None => println!(
                    "No CSV files found in {}.",
                    runner.config().data_dir.display()
                ),
            }
        }
        Command::ErrorBars { output, report } => {
            let output = output.unwrap_or_else(|| runner.config().error_bars.output.clone());
            run_angular(&runner, AngularChart::ErrorBars, output, report)?;
        }
        Command::Radiation { output, report } => {
            let output = output.unwrap_or_else(|| runner.config().radiation.output.clone());
            run_angular(&runner, AngularChart::Radiation, output, report)?;
        }
        Command::Generate {
            out_dir,
            seed,
            samples,
            sign_artifacts,
        } => {
            let capture = CaptureConfig {
                positions: runner.config().positions,
                samples,
                seed,
                sign_artifacts,
                ..Default::default()
            };
            let paths = write_capture_set(&capture, &out_dir)
                .with_context(|| format!("generating captures in {}", out_dir.display()))?;
            println!("Wrote {} captures to {}", paths.len(), out_dir.display());
        }
    }

    Ok(())
}

fn run_angular(
    runner: &Runner,
    chart: AngularChart,
    output: PathBuf,
    report_path: Option<PathBuf>,
) -> anyhow::Result<()> {
    let report = runner.run_angular(chart, &output)?;
    println!("Plot saved as '{}'", output.display());
    println!();
    println!("{}", report.summary);

    if let Some(path) = report_path {
        report.write_json(&path)?;
        println!("Report written to {}", path.display());
    }
    Ok(())
}
