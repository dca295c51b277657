//! Domain types shared by the allocation models.

use clap::ValueEnum;
use geo::{Point, Polygon};
use serde::Serialize;

/// Sequential 1-based catchment identity, assigned in table order.
pub type CatchmentId = u32;

/// A predefined catchment polygon.
#[derive(Clone, Debug)]
pub struct Catchment {
    pub id: CatchmentId,
    pub boundary: Polygon<f64>,
}

impl Catchment {
    /// Number the catchment polygons 1..n in table order.
    pub fn sequence(boundaries: Vec<Polygon<f64>>) -> Vec<Catchment> {
        boundaries
            .into_iter()
            .enumerate()
            .map(|(i, boundary)| Catchment {
                id: i as CatchmentId + 1,
                boundary,
            })
            .collect()
    }
}

/// A school roster row before catchment labeling.
#[derive(Clone, Debug)]
pub struct SchoolSite {
    pub name: String,
    pub location: Point<f64>,
}

/// An LSOA table row before labeling: code, boundary, raw 5–9 count.
#[derive(Clone, Debug)]
pub struct LsoaRecord {
    pub code: String,
    pub boundary: Polygon<f64>,
    pub population_5_to_9: u32,
}

/// A school site with its running intake state.
#[derive(Clone, Debug)]
pub struct School {
    pub name: String,
    pub site: Point<f64>,
    pub catchment_id: CatchmentId,
    /// Pupils accumulated so far in the current run.
    pub intake: u32,
    /// Once true, the school is skipped for capacity-respecting assignment
    /// for the rest of the run.
    pub saturated: bool,
}

/// How an LSOA ended up at its school.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum AssignmentKind {
    /// Placed while the school's PAN rules still held.
    WithinCapacity,
    /// Placed on the last open school even though its PAN was breached.
    Overflow,
    /// Placed with every school already saturated (safety valve).
    Forced,
}

/// The school an LSOA was allocated to, with realized distance.
#[derive(Clone, Debug)]
pub struct Assignment {
    pub school: String,
    pub distance: f64,
    /// Catchment of the receiving school; recorded by the catchment-aware
    /// models, where it may differ from the LSOA's own label after fallback.
    pub school_catchment: Option<CatchmentId>,
    pub kind: AssignmentKind,
}

/// A small census area with an estimated pupil intake.
#[derive(Clone, Debug)]
pub struct Lsoa {
    pub code: String,
    pub boundary: Polygon<f64>,
    pub population_5_to_9: u32,
    pub intake_estimate: u32,
    pub catchment_id: CatchmentId,
    pub assignment: Option<Assignment>,
}

/// The four allocation models.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, ValueEnum)]
pub enum ModelVariant {
    /// Sweep schools in nearest-neighbour order, each pulling its closest LSOA.
    SchoolsFirst,
    /// Walk LSOAs in table order, each picking its closest open school.
    LsoasFirst,
    /// Schools-first, preferring LSOAs inside each school's catchment.
    SchoolsFirstCatchment,
    /// LSOAs-first, preferring schools inside each LSOA's catchment.
    LsoasFirstCatchment,
}

/// Tie-break applied when two schools are equally near in the ordering chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum TieBreak {
    /// Keep the school that appears first in the roster.
    FirstInTable,
    /// Keep the lexicographically smaller school name.
    Lexicographic,
}

/// Ordering parameters for the schools-first sweeps. The visiting order is
/// part of each model's contract, so both knobs are explicit inputs.
#[derive(Clone, Debug)]
pub struct SweepConfig {
    /// School the nearest-neighbour chain starts from.
    pub seed_school: String,
    pub tie_break: TieBreak,
}

/// Intake booked twice against a school by the LSOAs-first catchment model.
#[derive(Clone, Debug, Serialize)]
pub struct Overbooking {
    pub lsoa: String,
    pub school: String,
    pub pupils: u32,
}

/// Final state of one allocation run, consumed by the projector.
#[derive(Debug)]
pub struct AllocationRun {
    pub schools: Vec<School>,
    pub lsoas: Vec<Lsoa>,
    pub overbookings: Vec<Overbooking>,
}
