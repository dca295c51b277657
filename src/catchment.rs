//! One-time catchment labeling of LSOAs and school sites.
//!
//! Runs before any allocation model and never again: every LSOA gets the
//! catchment holding the largest share of its area, every school gets the
//! catchment containing its site. Pure function of its inputs apart from
//! the labels it writes.

use log::debug;

use crate::demand::intake_estimate;
use crate::errors::AllocationError;
use crate::geometry::{contains_point, overlap_fraction};
use crate::models::{Catchment, CatchmentId, Lsoa, LsoaRecord, School, SchoolSite};

/// Label every record and site, producing the working structs the
/// allocation models mutate. A school outside all catchments is fatal: an
/// unlabeled school could never match a real catchment and would silently
/// degrade the constrained models to unconstrained behavior.
pub fn label_catchments(
    catchments: &[Catchment],
    lsoa_records: Vec<LsoaRecord>,
    school_sites: Vec<SchoolSite>,
) -> Result<(Vec<Lsoa>, Vec<School>), AllocationError> {
    if catchments.is_empty() {
        return Err(AllocationError::NoCatchments);
    }

    let mut lsoas = Vec::with_capacity(lsoa_records.len());
    for record in lsoa_records {
        let catchment_id = majority_catchment(catchments, &record);
        lsoas.push(Lsoa {
            intake_estimate: intake_estimate(record.population_5_to_9),
            code: record.code,
            boundary: record.boundary,
            population_5_to_9: record.population_5_to_9,
            catchment_id,
            assignment: None,
        });
    }

    let mut schools = Vec::with_capacity(school_sites.len());
    for site in school_sites {
        let catchment_id = catchments
            .iter()
            .find(|catchment| contains_point(&catchment.boundary, &site.location))
            .map(|catchment| catchment.id)
            .ok_or_else(|| AllocationError::SchoolOutsideCatchments {
                name: site.name.clone(),
            })?;
        debug!("school {} labeled catchment {}", site.name, catchment_id);
        schools.push(School {
            name: site.name,
            site: site.location,
            catchment_id,
            intake: 0,
            saturated: false,
        });
    }

    Ok((lsoas, schools))
}

/// Catchment holding the largest area share of the record. Ties keep the
/// earliest catchment in table order; an LSOA overlapping nothing falls to
/// the first catchment, with a share of zero.
fn majority_catchment(catchments: &[Catchment], record: &LsoaRecord) -> CatchmentId {
    let mut best_id = catchments[0].id;
    let mut best_share = f64::NEG_INFINITY;
    for catchment in catchments {
        let share = overlap_fraction(&record.boundary, &catchment.boundary);
        if share > best_share {
            best_id = catchment.id;
            best_share = share;
        }
    }
    best_id
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{Point, Rect};

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> geo::Polygon<f64> {
        Rect::new((x0, y0), (x1, y1)).to_polygon()
    }

    fn two_bands() -> Vec<Catchment> {
        Catchment::sequence(vec![
            square(0.0, 0.0, 10.0, 10.0),
            square(10.0, 0.0, 20.0, 10.0),
        ])
    }

    fn record(code: &str, x0: f64, x1: f64) -> LsoaRecord {
        LsoaRecord {
            code: code.to_string(),
            boundary: square(x0, 4.0, x1, 6.0),
            population_5_to_9: 100,
        }
    }

    #[test]
    fn lsoa_takes_the_majority_catchment() {
        let catchments = two_bands();
        let (lsoas, _) = label_catchments(
            &catchments,
            vec![record("E01-A", 8.0, 16.0)], // 2m in band 1, 6m in band 2
            vec![],
        )
        .unwrap();
        assert_eq!(lsoas[0].catchment_id, 2);
        assert_eq!(lsoas[0].intake_estimate, 19);
        assert!(lsoas[0].assignment.is_none());
    }

    #[test]
    fn exact_tie_keeps_the_earlier_catchment() {
        let catchments = two_bands();
        let (lsoas, _) =
            label_catchments(&catchments, vec![record("E01-B", 8.0, 12.0)], vec![]).unwrap();
        assert_eq!(lsoas[0].catchment_id, 1);
    }

    #[test]
    fn school_takes_the_containing_catchment() {
        let catchments = two_bands();
        let (_, schools) = label_catchments(
            &catchments,
            vec![],
            vec![SchoolSite {
                name: "Longhill High School".to_string(),
                location: Point::new(14.0, 5.0),
            }],
        )
        .unwrap();
        assert_eq!(schools[0].catchment_id, 2);
        assert_eq!(schools[0].intake, 0);
        assert!(!schools[0].saturated);
    }

    #[test]
    fn school_outside_every_catchment_is_fatal() {
        let catchments = two_bands();
        let err = label_catchments(
            &catchments,
            vec![],
            vec![SchoolSite {
                name: "King's School".to_string(),
                location: Point::new(50.0, 50.0),
            }],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            AllocationError::SchoolOutsideCatchments { ref name } if name == "King's School"
        ));
    }

    #[test]
    fn empty_catchment_table_is_fatal() {
        let err = label_catchments(&[], vec![record("E01-C", 0.0, 2.0)], vec![]).unwrap_err();
        assert!(matches!(err, AllocationError::NoCatchments));
    }
}
