//! Deviation Plots - command line entry point
//!
//! Draws the diagnostic charts for one dataset into `plots/` and prints the
//! written paths as a JSON array.

use anyhow::Context;
use clap::Parser;
use deviation_plots::Plotter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "deviation-plots", version, about = "Draw deviation diagnostic charts")]
struct Cli {
    /// Dataset file (.json, .jsonl, .ndjson or .csv)
    input: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let plotter = Plotter::new();
    let paths = plotter
        .draw(&cli.input)
        .with_context(|| format!("drawing charts for {}", cli.input.display()))?;

    println!("{}", serde_json::to_string_pretty(&paths)?);
    Ok(())
}
