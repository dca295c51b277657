//! Schools-first allocation: sweep the roster in its fixed visiting order,
//! each open school pulling its nearest unassigned LSOA, until every LSOA
//! is placed.

use geo::Point;
use log::{debug, warn};

use crate::capacity::PanPlan;
use crate::errors::AllocationError;
use crate::geometry::distance_to_lsoa;
use crate::models::{
    AllocationRun, Assignment, AssignmentKind, Lsoa, School, SweepConfig,
};
use crate::ordering::school_visit_order;

/// Run the schools-first sweep. With `catchment_constrained` set, each
/// school prefers unassigned LSOAs sharing its catchment label and falls
/// back to the full pool only when none remain.
///
/// One decision per school per pass: assign the nearest candidate while the
/// PAN holds (strict), absorb the breach when this is the last open school,
/// otherwise saturate without assigning. Once every school is saturated the
/// school under the cursor force-assigns its nearest remaining LSOA, so the
/// outer loop cannot spin.
pub fn allocate(
    mut schools: Vec<School>,
    mut lsoas: Vec<Lsoa>,
    plan: &PanPlan,
    config: &SweepConfig,
    catchment_constrained: bool,
) -> Result<AllocationRun, AllocationError> {
    let order = school_visit_order(&schools, config)?;
    let pans = plan.roster_targets(&schools)?;

    let mut passes = 0usize;
    while lsoas.iter().any(|lsoa| lsoa.assignment.is_none()) {
        passes += 1;
        let assigned_before = assigned_count(&lsoas);
        let saturated_before = saturated_count(&schools);

        for &i_school in &order {
            if !schools[i_school].saturated {
                let site = schools[i_school].site;
                let home = schools[i_school].catchment_id;
                let candidate = if catchment_constrained {
                    nearest_unassigned(site, &lsoas, |lsoa| lsoa.catchment_id == home)
                        .or_else(|| nearest_unassigned(site, &lsoas, |_| true))
                } else {
                    nearest_unassigned(site, &lsoas, |_| true)
                };

                if let Some((i_lsoa, distance)) = candidate {
                    let estimate = lsoas[i_lsoa].intake_estimate;
                    if schools[i_school].intake + estimate < pans[i_school] {
                        commit(
                            &mut schools[i_school],
                            &mut lsoas[i_lsoa],
                            distance,
                            catchment_constrained,
                            AssignmentKind::WithinCapacity,
                        );
                    } else if open_count(&schools) == 1 {
                        // last open school absorbs the remainder past its PAN
                        commit(
                            &mut schools[i_school],
                            &mut lsoas[i_lsoa],
                            distance,
                            catchment_constrained,
                            AssignmentKind::Overflow,
                        );
                        schools[i_school].saturated = true;
                        warn!(
                            "{} absorbed {} past its PAN of {} (intake {})",
                            schools[i_school].name, estimate, pans[i_school], schools[i_school].intake
                        );
                    } else {
                        schools[i_school].saturated = true;
                        debug!(
                            "{} saturated at intake {} (PAN {})",
                            schools[i_school].name, schools[i_school].intake, pans[i_school]
                        );
                    }
                }
            }

            // every school saturated: the cursor school still takes its
            // nearest remaining LSOA, regardless of the PAN
            if open_count(&schools) == 0 {
                let site = schools[i_school].site;
                if let Some((i_lsoa, distance)) = nearest_unassigned(site, &lsoas, |_| true) {
                    commit(
                        &mut schools[i_school],
                        &mut lsoas[i_lsoa],
                        distance,
                        catchment_constrained,
                        AssignmentKind::Forced,
                    );
                    warn!(
                        "forced {} onto {} with every school saturated",
                        lsoas[i_lsoa].code, schools[i_school].name
                    );
                }
            }
        }

        let progressed = assigned_count(&lsoas) > assigned_before
            || saturated_count(&schools) > saturated_before;
        if !progressed {
            let unassigned = lsoas.len() - assigned_count(&lsoas);
            return Err(AllocationError::Stalled { passes, unassigned });
        }
    }

    Ok(AllocationRun {
        schools,
        lsoas,
        overbookings: Vec::new(),
    })
}

/// Nearest unassigned LSOA to `site` among those passing `keep`; the
/// earliest table row wins ties.
fn nearest_unassigned<F>(site: Point<f64>, lsoas: &[Lsoa], keep: F) -> Option<(usize, f64)>
where
    F: Fn(&Lsoa) -> bool,
{
    let mut best: Option<(usize, f64)> = None;
    for (i, lsoa) in lsoas.iter().enumerate() {
        if lsoa.assignment.is_some() || !keep(lsoa) {
            continue;
        }
        let distance = distance_to_lsoa(&site, &lsoa.boundary);
        if best.map_or(true, |(_, held)| distance < held) {
            best = Some((i, distance));
        }
    }
    best
}

fn commit(
    school: &mut School,
    lsoa: &mut Lsoa,
    distance: f64,
    record_catchment: bool,
    kind: AssignmentKind,
) {
    school.intake += lsoa.intake_estimate;
    lsoa.assignment = Some(Assignment {
        school: school.name.clone(),
        distance,
        school_catchment: record_catchment.then_some(school.catchment_id),
        kind,
    });
    debug!("{} -> {} ({:?})", lsoa.code, school.name, kind);
}

fn open_count(schools: &[School]) -> usize {
    schools.iter().filter(|school| !school.saturated).count()
}

fn saturated_count(schools: &[School]) -> usize {
    schools.len() - open_count(schools)
}

fn assigned_count(lsoas: &[Lsoa]) -> usize {
    lsoas.iter().filter(|lsoa| lsoa.assignment.is_some()).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capacity::{PanRow, PanTable};
    use crate::models::TieBreak;
    use geo::Rect;
    use std::collections::BTreeMap;

    fn school(name: &str, x: f64, y: f64, catchment_id: u32) -> School {
        School {
            name: name.to_string(),
            site: Point::new(x, y),
            catchment_id,
            intake: 0,
            saturated: false,
        }
    }

    fn lsoa(code: &str, cx: f64, cy: f64, estimate: u32, catchment_id: u32) -> Lsoa {
        Lsoa {
            code: code.to_string(),
            boundary: Rect::new((cx - 0.5, cy - 0.5), (cx + 0.5, cy + 0.5)).to_polygon(),
            population_5_to_9: 0,
            intake_estimate: estimate,
            catchment_id,
            assignment: None,
        }
    }

    fn plan_for(schools: &[School], pans: &[u32]) -> PanPlan {
        let rows = schools
            .iter()
            .zip(pans)
            .map(|(school, &pan)| PanRow {
                school: school.name.clone(),
                pan_by_year: BTreeMap::from([(2024, pan)]),
            })
            .collect();
        PanTable::new(rows).resolve(2024, schools).unwrap()
    }

    fn config(seed: &str) -> SweepConfig {
        SweepConfig {
            seed_school: seed.to_string(),
            tie_break: TieBreak::FirstInTable,
        }
    }

    fn school_named<'a>(run: &'a AllocationRun, name: &str) -> &'a School {
        run.schools.iter().find(|s| s.name == name).unwrap()
    }

    fn assignment_of<'a>(run: &'a AllocationRun, code: &str) -> &'a Assignment {
        run.lsoas
            .iter()
            .find(|l| l.code == code)
            .unwrap()
            .assignment
            .as_ref()
            .unwrap()
    }

    /// Fully equidistant fixture: every tie resolves by table order, so the
    /// whole run can be walked by hand. Pass 1 places u1 on A and u2 on B
    /// while C saturates refusing u3; pass 2 saturates A, overflows u3 onto
    /// B as the last open school, then the safety valve fires within the
    /// same iteration and B also takes u4.
    #[test]
    fn pinned_walkthrough_over_equidistant_ties() {
        let schools = vec![
            school("A", 0.0, 0.0, 1),
            school("B", 0.0, 0.0, 1),
            school("C", 0.0, 0.0, 1),
        ];
        let lsoas = vec![
            lsoa("u1", 10.0, 0.0, 6, 1),
            lsoa("u2", 10.0, 0.0, 6, 1),
            lsoa("u3", 10.0, 0.0, 6, 1),
            lsoa("u4", 10.0, 0.0, 2, 1),
        ];
        let plan = plan_for(&schools, &[10, 10, 5]);

        let run = allocate(schools, lsoas, &plan, &config("A"), false).unwrap();

        assert_eq!(school_named(&run, "A").intake, 6);
        assert_eq!(school_named(&run, "B").intake, 14);
        assert_eq!(school_named(&run, "C").intake, 0);
        assert!(run.schools.iter().all(|s| s.saturated));

        assert_eq!(assignment_of(&run, "u1").school, "A");
        assert_eq!(assignment_of(&run, "u1").kind, AssignmentKind::WithinCapacity);
        assert_eq!(assignment_of(&run, "u2").school, "B");
        assert_eq!(assignment_of(&run, "u2").kind, AssignmentKind::WithinCapacity);
        assert_eq!(assignment_of(&run, "u3").school, "B");
        assert_eq!(assignment_of(&run, "u3").kind, AssignmentKind::Overflow);
        assert_eq!(assignment_of(&run, "u4").school, "B");
        assert_eq!(assignment_of(&run, "u4").kind, AssignmentKind::Forced);

        // nothing dropped or duplicated, even through the forced paths
        let estimate_sum: u32 = run.lsoas.iter().map(|l| l.intake_estimate).sum();
        let intake_sum: u32 = run.schools.iter().map(|s| s.intake).sum();
        assert_eq!(estimate_sum, 20);
        assert_eq!(intake_sum, 20);
    }

    #[test]
    fn catchment_preference_overrides_raw_distance() {
        let schools = vec![school("SA", 0.0, 0.0, 1), school("SB", 100.0, 0.0, 2)];
        // p is nearer SB but labeled 1; q is nearer SA but labeled 2
        let lsoas = vec![lsoa("p", 60.0, 0.0, 5, 1), lsoa("q", 40.0, 0.0, 5, 2)];
        let plan = plan_for(&schools, &[100, 100]);

        let run = allocate(
            schools.clone(),
            lsoas.clone(),
            &plan,
            &config("SA"),
            true,
        )
        .unwrap();
        assert_eq!(assignment_of(&run, "p").school, "SA");
        assert_eq!(assignment_of(&run, "p").school_catchment, Some(1));
        assert_eq!(assignment_of(&run, "q").school, "SB");

        // unconstrained, raw distance wins and the allocation flips
        let run = allocate(schools, lsoas, &plan, &config("SA"), false).unwrap();
        assert_eq!(assignment_of(&run, "p").school, "SB");
        assert_eq!(assignment_of(&run, "p").school_catchment, None);
        assert_eq!(assignment_of(&run, "q").school, "SA");
    }

    #[test]
    fn empty_home_pool_falls_back_across_catchments() {
        let schools = vec![school("SA", 0.0, 0.0, 1)];
        let lsoas = vec![lsoa("x", 5.0, 0.0, 4, 2), lsoa("y", 30.0, 0.0, 4, 1)];
        let plan = plan_for(&schools, &[100]);

        let run = allocate(schools, lsoas, &plan, &config("SA"), true).unwrap();

        // pass 1 drains the home catchment, pass 2 crosses for x
        assert_eq!(assignment_of(&run, "y").school, "SA");
        assert_eq!(assignment_of(&run, "x").school, "SA");
        assert_eq!(assignment_of(&run, "x").school_catchment, Some(1));
        let crossed = run
            .lsoas
            .iter()
            .filter(|l| {
                l.assignment
                    .as_ref()
                    .and_then(|a| a.school_catchment)
                    .is_some_and(|c| c != l.catchment_id)
            })
            .count();
        assert_eq!(crossed, 1);
    }

    #[test]
    fn distances_are_recorded_at_assignment_time() {
        let schools = vec![school("SA", 0.0, 0.0, 1)];
        let lsoas = vec![lsoa("near", 10.0, 0.0, 3, 1)];
        let plan = plan_for(&schools, &[50]);

        let run = allocate(schools, lsoas, &plan, &config("SA"), false).unwrap();
        // square around (10, 0) has its nearest edge at x = 9.5
        assert!((assignment_of(&run, "near").distance - 9.5).abs() < 1e-9);
    }
}
