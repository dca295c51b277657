//! PAN lookup and per-run capacity targets.
//!
//! The table is resolved once against the roster before any allocation runs;
//! targets stay immutable for the whole run. Saturation lives on the
//! `School` records and is only ever flipped by the allocation models.

use std::collections::BTreeMap;

use crate::errors::AllocationError;
use crate::models::School;

/// One school's planned admission numbers, keyed by entry year.
#[derive(Clone, Debug)]
pub struct PanRow {
    pub school: String,
    pub pan_by_year: BTreeMap<u16, u32>,
}

/// The full PAN table in load order.
#[derive(Clone, Debug, Default)]
pub struct PanTable {
    pub rows: Vec<PanRow>,
}

impl PanTable {
    pub fn new(rows: Vec<PanRow>) -> Self {
        PanTable { rows }
    }

    fn pan_for(&self, school: &str, year: u16) -> Option<u32> {
        self.rows
            .iter()
            .find(|row| row.school == school)
            .and_then(|row| row.pan_by_year.get(&year).copied())
    }

    /// Resolve a PAN for every rostered school, failing on any gap. A school
    /// without a row (or a row without the year) is an error, never an
    /// implicit zero.
    pub fn resolve(&self, year: u16, roster: &[School]) -> Result<PanPlan, AllocationError> {
        let mut targets = BTreeMap::new();
        for school in roster {
            let pan = self
                .pan_for(&school.name, year)
                .ok_or_else(|| AllocationError::MissingPan {
                    school: school.name.clone(),
                    year,
                })?;
            targets.insert(school.name.clone(), pan);
        }
        Ok(PanPlan { year, targets })
    }
}

/// Immutable per-run targets resolved from the PAN table.
#[derive(Clone, Debug)]
pub struct PanPlan {
    pub year: u16,
    targets: BTreeMap<String, u32>,
}

impl PanPlan {
    /// Target for a school, if the plan covers it.
    pub fn target(&self, school: &str) -> Option<u32> {
        self.targets.get(school).copied()
    }

    /// Per-school targets in roster order, failing if any school is uncovered.
    pub fn roster_targets(&self, roster: &[School]) -> Result<Vec<u32>, AllocationError> {
        roster
            .iter()
            .map(|school| {
                self.target(&school.name)
                    .ok_or_else(|| AllocationError::MissingPan {
                        school: school.name.clone(),
                        year: self.year,
                    })
            })
            .collect()
    }

    /// Combined PAN across the plan.
    pub fn total(&self) -> u32 {
        self.targets.values().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AllocationError;
    use geo::Point;

    fn school(name: &str) -> School {
        School {
            name: name.to_string(),
            site: Point::new(0.0, 0.0),
            catchment_id: 1,
            intake: 0,
            saturated: false,
        }
    }

    fn table() -> PanTable {
        PanTable::new(vec![
            PanRow {
                school: "Longhill High School".to_string(),
                pan_by_year: BTreeMap::from([(2024, 270), (2025, 240)]),
            },
            PanRow {
                school: "Varndean School".to_string(),
                pan_by_year: BTreeMap::from([(2024, 300)]),
            },
        ])
    }

    #[test]
    fn resolves_targets_for_the_roster() {
        let roster = vec![school("Longhill High School"), school("Varndean School")];
        let plan = table().resolve(2024, &roster).unwrap();
        assert_eq!(plan.target("Longhill High School"), Some(270));
        assert_eq!(plan.target("Varndean School"), Some(300));
        assert_eq!(plan.total(), 570);
        assert_eq!(plan.roster_targets(&roster).unwrap(), vec![270, 300]);
    }

    #[test]
    fn missing_year_is_an_error() {
        let roster = vec![school("Varndean School")];
        let err = table().resolve(2025, &roster).unwrap_err();
        assert!(matches!(
            err,
            AllocationError::MissingPan { ref school, year: 2025 } if school == "Varndean School"
        ));
    }

    #[test]
    fn missing_school_row_is_an_error() {
        let roster = vec![school("Patcham High School")];
        let err = table().resolve(2024, &roster).unwrap_err();
        assert!(matches!(err, AllocationError::MissingPan { year: 2024, .. }));
    }
}
