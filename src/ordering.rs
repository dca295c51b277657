//! Fixed visiting order for the schools-first sweeps.
//!
//! The chain starts at the configured seed school and repeatedly hops to the
//! nearest not-yet-visited school. It is computed once per run and never
//! recomputed; the final allocation depends on it, so the seed and the
//! tie-break rule are explicit inputs rather than hidden defaults.

use crate::errors::AllocationError;
use crate::geometry::school_spacing;
use crate::models::{School, SweepConfig, TieBreak};

/// Indices into the roster, in nearest-neighbour chain order from the seed.
pub fn school_visit_order(
    schools: &[School],
    config: &SweepConfig,
) -> Result<Vec<usize>, AllocationError> {
    if schools.is_empty() {
        return Err(AllocationError::NoSchools);
    }
    let seed = schools
        .iter()
        .position(|school| school.name == config.seed_school)
        .ok_or_else(|| AllocationError::UnknownSeedSchool {
            name: config.seed_school.clone(),
        })?;

    let mut order = Vec::with_capacity(schools.len());
    let mut visited = vec![false; schools.len()];
    let mut current = seed;
    loop {
        order.push(current);
        visited[current] = true;
        let here = schools[current].site;

        let mut next: Option<(usize, f64)> = None;
        for (i, school) in schools.iter().enumerate() {
            if visited[i] {
                continue;
            }
            let spacing = school_spacing(&here, &school.site);
            let closer = match next {
                None => true,
                Some((held, best)) => {
                    if spacing < best {
                        true
                    } else if spacing == best {
                        match config.tie_break {
                            // ascending scan already holds the earlier row
                            TieBreak::FirstInTable => false,
                            TieBreak::Lexicographic => school.name < schools[held].name,
                        }
                    } else {
                        false
                    }
                }
            };
            if closer {
                next = Some((i, spacing));
            }
        }

        match next {
            Some((i, _)) => current = i,
            None => break,
        }
    }
    Ok(order)
}
