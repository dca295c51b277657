//! Entry point: builds the synthetic demo town and runs one of the four
//! school place allocation models over it.

use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use log::error;
use serde::Serialize;

mod capacity;
mod catchment;
mod demand;
mod engine;
mod errors;
mod geometry;
mod lsoa_sweep;
mod models;
mod ordering;
mod projector;
mod reporting;
mod scenario;
mod school_sweep;

use models::{ModelVariant, SweepConfig, TieBreak};
use projector::{LsoaRow, RunReport, SchoolRow};

#[derive(Parser)]
#[command(name = "catchment-sim")]
#[command(about = "Greedy school place allocation against capacity-constrained PANs")]
struct Cli {
    /// Allocation model to run
    #[arg(long, value_enum, default_value = "schools-first")]
    model: ModelVariant,

    /// PAN year to resolve targets for
    #[arg(long, default_value_t = 2024)]
    year: u16,

    /// School the sweep ordering starts from (defaults to Dorothy Stringer
    /// School, or the roster head if absent)
    #[arg(long)]
    seed_school: Option<String>,

    /// Tie-break for equally spaced schools in the ordering chain
    #[arg(long, value_enum, default_value = "first-in-table")]
    tie_break: TieBreak,

    /// LSOA grid width
    #[arg(long, default_value_t = 16)]
    cols: usize,

    /// LSOA grid height
    #[arg(long, default_value_t = 10)]
    rows: usize,

    /// Mean 5-9 population per LSOA cell
    #[arg(long, default_value_t = 85.0)]
    mean_population: f64,

    /// RNG seed for the synthetic demographics
    #[arg(long, default_value_t = 7)]
    rng_seed: u64,

    /// Write the result tables as JSON
    #[arg(long)]
    json: Option<PathBuf>,

    /// Show every LSOA row instead of the head of the table
    #[arg(long)]
    full_table: bool,
}

#[derive(Serialize)]
struct RunDump<'a> {
    report: &'a RunReport,
    schools: &'a [SchoolRow],
    lsoas: &'a [LsoaRow],
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();
    if let Err(e) = run() {
        error!("{e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let scenario = scenario::build(cli.cols, cli.rows, cli.mean_population, cli.rng_seed);
    let (lsoas, schools) = catchment::label_catchments(
        &scenario.catchments,
        scenario.lsoa_records,
        scenario.school_sites,
    )?;
    let plan = scenario.pans.resolve(cli.year, &schools)?;

    let seed_school = match cli.seed_school {
        Some(name) => name,
        None => schools
            .iter()
            .find(|s| s.name == scenario::DEFAULT_SEED_SCHOOL)
            .or_else(|| schools.first())
            .map(|s| s.name.clone())
            .unwrap_or_default(),
    };
    let config = SweepConfig {
        seed_school,
        tie_break: cli.tie_break,
    };

    let run = engine::run(cli.model, schools, lsoas, &plan, &config)?;
    let (lsoa_rows, school_rows, report) = projector::project(cli.model, &run, &plan)?;

    reporting::display_run_header(cli.model, cli.year);
    reporting::display_school_table(&school_rows, &scenario::school_colours());
    let limit = if cli.full_table { lsoa_rows.len() } else { 15 };
    reporting::display_assignment_table(&lsoa_rows, limit);
    reporting::display_report(&report);

    if let Some(path) = cli.json {
        let dump = RunDump {
            report: &report,
            schools: &school_rows,
            lsoas: &lsoa_rows,
        };
        fs::write(&path, serde_json::to_string_pretty(&dump)?)?;
        println!("Wrote JSON results to {}", path.display());
    }

    Ok(())
}
