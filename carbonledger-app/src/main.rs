use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

mod config;
mod workbook;
mod workflow;

/// GHG emissions calculator: normalizes an emission-factor workbook,
/// aggregates activity entries into scope totals, and writes a CSV
/// report plus yearly, product-intensity, and waste breakdowns.
#[derive(Parser, Debug)]
#[command(name = "carbonledger", version, about)]
struct Cli {
    /// Emission-factor workbook: a directory of per-sheet .csv files, or
    /// a single .csv file treated as a one-sheet workbook
    #[arg(long)]
    factors: PathBuf,

    /// Activity entries, grouped per scope (YAML)
    #[arg(long)]
    inputs: PathBuf,

    /// Production volumes for the product-intensity report (YAML)
    #[arg(long)]
    production: Option<PathBuf>,

    /// Directory under which the timestamped run directory is created
    #[arg(long, default_value = "./runs")]
    out: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    println!("--- Carbonledger ---");
    workflow::run(&cli.factors, &cli.inputs, cli.production.as_deref(), &cli.out)
}
