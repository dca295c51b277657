//! Console presentation of allocation results.

use crate::models::ModelVariant;
use crate::projector::{LsoaRow, RunOutcome, RunReport, SchoolRow};

/// Display the run banner.
pub fn display_run_header(variant: ModelVariant, year: u16) {
    println!("╔══════════════════════════════════════════════════════════════════════════════╗");
    println!("║                  SCHOOL PLACE ALLOCATION - PAN CATCHMENT MODELS              ║");
    println!("╚══════════════════════════════════════════════════════════════════════════════╝\n");
    println!("Model: {variant:?} | PAN year: {year}\n");
}

/// Display per-school intakes against their PANs, with the configured
/// display colour where one exists.
pub fn display_school_table(rows: &[SchoolRow], colours: &[(&str, &str)]) {
    println!("School intakes:");
    for row in rows {
        let colour = colours
            .iter()
            .find(|(name, _)| *name == row.name)
            .map(|(_, colour)| *colour)
            .unwrap_or("-");
        let state = if row.saturated { "saturated" } else { "open" };
        println!(
            "  {:<45} PAN {:>4} | intake {:>4} | {:<9} | {}",
            row.name, row.pan, row.intake, state, colour
        );
    }
    println!();
}

/// Display the head of the per-LSOA assignment table.
pub fn display_assignment_table(rows: &[LsoaRow], limit: usize) {
    println!("LSOA assignments ({} rows):", rows.len());
    for row in rows.iter().take(limit) {
        println!(
            "  {:<12} -> {:<45} {:>8.0}m | {:>3} pupils | {:?}",
            row.code, row.school, row.distance, row.intake_estimate, row.kind
        );
    }
    if rows.len() > limit {
        println!("  ... {} more (use --full-table to show all)", rows.len() - limit);
    }
    println!();
}

/// Display the feasibility summary.
pub fn display_report(report: &RunReport) {
    println!("╔══════════════════════════════════════════════════════════════════════════════╗");
    println!("║                                 RUN SUMMARY                                  ║");
    println!("╚══════════════════════════════════════════════════════════════════════════════╝\n");

    let resolution = match report.outcome {
        RunOutcome::WithinCapacity => "solved within capacity",
        RunOutcome::OverflowAbsorbed => "solved via overflow absorption",
        RunOutcome::SafetyValveForced => "solved via safety-valve forcing",
    };
    println!("Resolution: {resolution}");
    println!(
        "Estimated pupils: {} | Booked intake: {} | Combined PAN: {}",
        report.total_estimate, report.total_intake, report.total_pan
    );
    println!("Cross-catchment placements: {}", report.cross_catchment);

    if report.overbooked_intake > 0 {
        println!(
            "Double-booked intake: {} pupils across {} LSOAs: {}",
            report.overbooked_intake,
            report.overbooked_lsoas.len(),
            report.overbooked_lsoas.join(", ")
        );
    }
    if !report.over_pan.is_empty() {
        println!("Schools over target:");
        for (name, overage) in &report.over_pan {
            println!("  {name}: +{overage}");
        }
    }
    if report.infeasible {
        println!("\nWARNING: booked intake exceeds the combined PAN for this year.");
    }
    println!();
}
