//! LSOAs-first allocation: walk the LSOA table in input order, each LSOA
//! picking its closest open school.

use log::{debug, info, warn};

use crate::capacity::PanPlan;
use crate::errors::AllocationError;
use crate::geometry::distance_to_lsoa;
use crate::models::{
    AllocationRun, Assignment, AssignmentKind, Lsoa, Overbooking, School,
};

/// Run the LSOAs-first sweep. With `catchment_constrained` set, candidate
/// schools are restricted to the LSOA's catchment until every school there
/// is saturated, at which point the pool widens to the whole roster.
///
/// Saturation flags are snapshotted at the start of each scan and the commit
/// below is the scan's single mutation point. Cross-catchment placements on
/// the widened pool double-book the receiving school's intake (a known
/// quirk of this model family); the run report quantifies the overshoot.
/// When every school is saturated the LSOA
/// is force-assigned to its nearest school so the walk always terminates.
pub fn allocate(
    mut schools: Vec<School>,
    mut lsoas: Vec<Lsoa>,
    plan: &PanPlan,
    catchment_constrained: bool,
) -> Result<AllocationRun, AllocationError> {
    if schools.is_empty() {
        return Err(AllocationError::NoSchools);
    }
    let pans = plan.roster_targets(&schools)?;
    let mut overbookings: Vec<Overbooking> = Vec::new();

    for i_lsoa in 0..lsoas.len() {
        let mut scans = 0usize;
        while lsoas[i_lsoa].assignment.is_none() {
            // each scan either assigns the LSOA or saturates one school
            scans += 1;
            if scans > schools.len() + 1 {
                let unassigned = lsoas.iter().filter(|l| l.assignment.is_none()).count();
                return Err(AllocationError::Stalled {
                    passes: scans,
                    unassigned,
                });
            }

            let open: Vec<bool> = schools.iter().map(|school| !school.saturated).collect();

            let (pool, widened) = if catchment_constrained {
                let home = lsoas[i_lsoa].catchment_id;
                let in_catchment: Vec<usize> = (0..schools.len())
                    .filter(|&i| schools[i].catchment_id == home)
                    .collect();
                if in_catchment.iter().any(|&i| open[i]) {
                    (in_catchment, false)
                } else {
                    ((0..schools.len()).collect(), true)
                }
            } else {
                ((0..schools.len()).collect(), false)
            };

            // every school saturated: nearest takes the LSOA past its PAN
            if pool.iter().all(|&i| !open[i]) {
                let ranked = rank_by_distance(&lsoas[i_lsoa], &schools, &pool);
                if let Some(&(i_school, distance)) = ranked.first() {
                    let estimate = lsoas[i_lsoa].intake_estimate;
                    schools[i_school].intake += estimate;
                    lsoas[i_lsoa].assignment = Some(Assignment {
                        school: schools[i_school].name.clone(),
                        distance,
                        school_catchment: catchment_constrained
                            .then_some(schools[i_school].catchment_id),
                        kind: AssignmentKind::Forced,
                    });
                    warn!(
                        "forced {} onto {} with every school saturated",
                        lsoas[i_lsoa].code, schools[i_school].name
                    );
                }
                continue;
            }

            let ranked = rank_by_distance(&lsoas[i_lsoa], &schools, &pool);
            if let Some(&(i_school, distance)) =
                ranked.iter().find(|&&(i, _)| open[i])
            {
                let estimate = lsoas[i_lsoa].intake_estimate;
                if schools[i_school].intake + estimate <= pans[i_school] {
                    schools[i_school].intake += estimate;
                    if widened {
                        // cross-catchment placements land on both the
                        // widened candidate table and the roster, so the
                        // intake is booked twice
                        schools[i_school].intake += estimate;
                        overbookings.push(Overbooking {
                            lsoa: lsoas[i_lsoa].code.clone(),
                            school: schools[i_school].name.clone(),
                            pupils: estimate,
                        });
                        warn!(
                            "{} double-booked {} pupils from {}",
                            schools[i_school].name, estimate, lsoas[i_lsoa].code
                        );
                    }
                    lsoas[i_lsoa].assignment = Some(Assignment {
                        school: schools[i_school].name.clone(),
                        distance,
                        school_catchment: catchment_constrained
                            .then_some(schools[i_school].catchment_id),
                        kind: AssignmentKind::WithinCapacity,
                    });
                    debug!(
                        "{} -> {} ({} pupils)",
                        lsoas[i_lsoa].code, schools[i_school].name, estimate
                    );
                } else {
                    schools[i_school].saturated = true;
                    info!(
                        "{} saturated at intake {} (PAN {})",
                        schools[i_school].name, schools[i_school].intake, pans[i_school]
                    );
                }
            }
        }
    }

    Ok(AllocationRun {
        schools,
        lsoas,
        overbookings,
    })
}

/// Pool indices ranked by ascending distance to the LSOA; the stable sort
/// keeps roster order on exact ties.
fn rank_by_distance(lsoa: &Lsoa, schools: &[School], pool: &[usize]) -> Vec<(usize, f64)> {
    let mut ranked: Vec<(usize, f64)> = pool
        .iter()
        .map(|&i| (i, distance_to_lsoa(&schools[i].site, &lsoa.boundary)))
        .collect();
    ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
    ranked
}
