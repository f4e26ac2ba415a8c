use anyhow::{Context, Result};
use carbonforge_core::files::read_yaml;
use carbonforge_schemas::{
    file_formats::{AssessmentFile, InventoryFile, ScoreFile},
    units::OutputUnit,
};
use clap::{Parser, Subcommand};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing_subscriber::EnvFilter;

mod config;
mod plotting;
mod workflow;

#[derive(Debug, Parser)]
#[command(name = "carbonforge", about = "Greenhouse gas inventory and ESG scoring")]
struct Cli {
    /// Directory timestamped run folders are created in.
    #[arg(long, global = true, default_value = "./data/runs")]
    runs_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compute emissions for an inventory file.
    Calculate {
        inventory: PathBuf,
        /// Factor override directory; missing subdirectories keep the built-in tables.
        #[arg(long, default_value = "./data/factors")]
        factors: PathBuf,
        /// Overrides the inventory's output unit (kg, tonnes, g, short_ton).
        #[arg(long, value_parser = parse_output_unit)]
        unit: Option<OutputUnit>,
    },
    /// Score a reviewer's 1-3 score sheet.
    Score {
        sheet: PathBuf,
        /// Record a final submission instead of a draft.
        #[arg(long)]
        submit: bool,
        #[arg(long)]
        scored_by: Option<String>,
    },
    /// Derive scores and recommendations from questionnaire answers.
    Assess { answers: PathBuf },
}

fn parse_output_unit(value: &str) -> Result<OutputUnit, String> {
    OutputUnit::parse(value).ok_or_else(|| format!("unknown output unit '{}'", value))
}

/// Creates `<runs_dir>/<prefix>_<timestamp>` and copies the input into it.
fn prepare_run_dir(runs_dir: &Path, prefix: &str, input: &Path) -> Result<PathBuf> {
    let output_dir = runs_dir.join(format!("{}_{}", prefix, chrono::Utc::now().format("%Y%m%d_%H%M%S")));
    fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create output directory: {:?}", output_dir))?;
    if let Some(name) = input.file_name() {
        fs::copy(input, output_dir.join(name))
            .with_context(|| format!("Failed to copy {:?} into the run directory", input))?;
    }
    Ok(output_dir)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    println!("--- Carbonforge Application ---");

    let output_dir = match cli.command {
        Command::Calculate {
            inventory,
            factors,
            unit,
        } => {
            let library = config::load_factor_library(&factors)?;
            let file: InventoryFile = read_yaml(&inventory)?;
            let output_dir = prepare_run_dir(&cli.runs_dir, "inventory", &inventory)?;
            workflow::run_inventory(&file, &library, unit, &output_dir)?;
            output_dir
        }
        Command::Score {
            sheet,
            submit,
            scored_by,
        } => {
            let file: ScoreFile = read_yaml(&sheet)?;
            let scored_by = scored_by
                .or_else(|| file.scored_by.clone())
                .unwrap_or_else(|| "unassigned".to_string());
            let output_dir = prepare_run_dir(&cli.runs_dir, "score", &sheet)?;
            workflow::run_score(&file, submit, &scored_by, &output_dir)?;
            output_dir
        }
        Command::Assess { answers } => {
            let file: AssessmentFile = read_yaml(&answers)?;
            let output_dir = prepare_run_dir(&cli.runs_dir, "assessment", &answers)?;
            workflow::run_assessment(&file, &output_dir)?;
            output_dir
        }
    };

    println!("\nRun complete. Results are in '{}'", output_dir.display());
    Ok(())
}
