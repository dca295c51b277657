//! Materializes final run state into result tables and a run report.
//! Pure read: nothing here mutates the run.

use serde::Serialize;

use crate::capacity::PanPlan;
use crate::errors::AllocationError;
use crate::models::{AllocationRun, AssignmentKind, ModelVariant};

/// One row of the per-LSOA result table.
#[derive(Clone, Debug, Serialize)]
pub struct LsoaRow {
    pub code: String,
    pub school: String,
    pub distance: f64,
    pub population_5_to_9: u32,
    pub intake_estimate: u32,
    pub catchment_id: u32,
    pub school_catchment: Option<u32>,
    pub kind: AssignmentKind,
}

/// One row of the per-school result table.
#[derive(Clone, Debug, Serialize)]
pub struct SchoolRow {
    pub name: String,
    pub pan: u32,
    pub intake: u32,
    pub saturated: bool,
}

/// How a run resolved, worst case over all placements.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum RunOutcome {
    /// Every placement respected its school's PAN rules.
    WithinCapacity,
    /// At least one school absorbed a breach as the last open school.
    OverflowAbsorbed,
    /// At least one placement happened with every school saturated.
    SafetyValveForced,
}

/// Feasibility and provenance summary of one run.
#[derive(Clone, Debug, Serialize)]
pub struct RunReport {
    pub variant: ModelVariant,
    pub outcome: RunOutcome,
    pub total_estimate: u32,
    pub total_intake: u32,
    pub total_pan: u32,
    /// Placements whose school sits in a different catchment than the LSOA.
    pub cross_catchment: u32,
    /// Intake booked twice by the LSOAs-first catchment model.
    pub overbooked_intake: u32,
    pub overbooked_lsoas: Vec<String>,
    /// Schools that finished above target, with the overage.
    pub over_pan: Vec<(String, u32)>,
    /// Set when the summed intake exceeds the summed PANs.
    pub infeasible: bool,
}

/// Project a finished run into its result tables and report. Fails if any
/// LSOA is still unassigned, which no model should allow.
pub fn project(
    variant: ModelVariant,
    run: &AllocationRun,
    plan: &PanPlan,
) -> Result<(Vec<LsoaRow>, Vec<SchoolRow>, RunReport), AllocationError> {
    let mut lsoa_rows = Vec::with_capacity(run.lsoas.len());
    let mut outcome = RunOutcome::WithinCapacity;
    let mut cross_catchment = 0u32;

    for lsoa in &run.lsoas {
        let assignment = lsoa
            .assignment
            .as_ref()
            .ok_or_else(|| AllocationError::UnassignedLsoa {
                code: lsoa.code.clone(),
            })?;
        let placed = match assignment.kind {
            AssignmentKind::WithinCapacity => RunOutcome::WithinCapacity,
            AssignmentKind::Overflow => RunOutcome::OverflowAbsorbed,
            AssignmentKind::Forced => RunOutcome::SafetyValveForced,
        };
        outcome = outcome.max(placed);
        if assignment
            .school_catchment
            .is_some_and(|catchment| catchment != lsoa.catchment_id)
        {
            cross_catchment += 1;
        }
        lsoa_rows.push(LsoaRow {
            code: lsoa.code.clone(),
            school: assignment.school.clone(),
            distance: assignment.distance,
            population_5_to_9: lsoa.population_5_to_9,
            intake_estimate: lsoa.intake_estimate,
            catchment_id: lsoa.catchment_id,
            school_catchment: assignment.school_catchment,
            kind: assignment.kind,
        });
    }

    let mut school_rows = Vec::with_capacity(run.schools.len());
    let mut over_pan = Vec::new();
    for school in &run.schools {
        let pan = plan
            .target(&school.name)
            .ok_or_else(|| AllocationError::MissingPan {
                school: school.name.clone(),
                year: plan.year,
            })?;
        if school.intake > pan {
            over_pan.push((school.name.clone(), school.intake - pan));
        }
        school_rows.push(SchoolRow {
            name: school.name.clone(),
            pan,
            intake: school.intake,
            saturated: school.saturated,
        });
    }

    let total_estimate: u32 = run.lsoas.iter().map(|l| l.intake_estimate).sum();
    let total_intake: u32 = run.schools.iter().map(|s| s.intake).sum();
    let total_pan = plan.total();

    let report = RunReport {
        variant,
        outcome,
        total_estimate,
        total_intake,
        total_pan,
        cross_catchment,
        overbooked_intake: run.overbookings.iter().map(|o| o.pupils).sum(),
        overbooked_lsoas: run.overbookings.iter().map(|o| o.lsoa.clone()).collect(),
        over_pan,
        infeasible: total_intake > total_pan,
    };

    Ok((lsoa_rows, school_rows, report))
}
