//! Synthetic demo scenario: a coastal town on a 12km x 8km plane with ten
//! secondary schools, quadrant catchments, a square LSOA grid, and a PAN
//! table covering recent entry years. Real inputs arrive through external
//! loaders; this stands in for them so the binary can demonstrate the
//! models end to end.

use std::collections::BTreeMap;

use geo::{Point, Rect};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::capacity::{PanRow, PanTable};
use crate::demand::sample_population;
use crate::models::{Catchment, LsoaRecord, SchoolSite};

/// Seed school used by the sweeps when the caller does not pick one.
pub const DEFAULT_SEED_SCHOOL: &str = "Dorothy Stringer School";

const PLANE_WIDTH: f64 = 12_000.0;
const PLANE_HEIGHT: f64 = 8_000.0;

/// name, x, y, PANs for 2024..=2026
const SCHOOLS: &[(&str, f64, f64, [u32; 3])] = &[
    ("Blatchington Mill School", 1_500.0, 5_200.0, [300, 300, 300]),
    ("Brighton Aldridge Community Academy", 9_500.0, 6_500.0, [270, 240, 240]),
    ("Cardinal Newman Catholic School", 4_200.0, 3_200.0, [210, 210, 240]),
    ("Dorothy Stringer School", 5_200.0, 4_800.0, [300, 300, 270]),
    ("Hove Park School and Sixth Form Centre", 1_800.0, 3_500.0, [270, 270, 270]),
    ("King's School", 900.0, 2_200.0, [150, 180, 180]),
    ("Longhill High School", 11_000.0, 1_500.0, [270, 240, 210]),
    ("Patcham High School", 6_800.0, 7_200.0, [240, 240, 240]),
    ("Portslade Aldridge Community Academy", 600.0, 4_600.0, [210, 210, 210]),
    ("Varndean School", 5_400.0, 5_600.0, [300, 300, 300]),
];

/// Display colour per school, used by the console legend.
pub fn school_colours() -> Vec<(&'static str, &'static str)> {
    vec![
        ("Blatchington Mill School", "steelblue"),
        ("Brighton Aldridge Community Academy", "orange"),
        ("Cardinal Newman Catholic School", "limegreen"),
        ("Dorothy Stringer School", "firebrick"),
        ("Hove Park School and Sixth Form Centre", "mediumpurple"),
        ("King's School", "sienna"),
        ("Longhill High School", "palevioletred"),
        ("Patcham High School", "gray"),
        ("Portslade Aldridge Community Academy", "darkkhaki"),
        ("Varndean School", "darkturquoise"),
    ]
}

/// A complete synthetic input set.
pub struct Scenario {
    pub catchments: Vec<Catchment>,
    pub lsoa_records: Vec<LsoaRecord>,
    pub school_sites: Vec<SchoolSite>,
    pub pans: PanTable,
}

/// Build the demo town: quadrant catchments, a `cols` x `rows` LSOA grid
/// with Normal-distributed 5–9 counts, and the fixed school roster.
pub fn build(cols: usize, rows: usize, mean_population: f64, rng_seed: u64) -> Scenario {
    let half_w = PLANE_WIDTH / 2.0;
    let half_h = PLANE_HEIGHT / 2.0;
    let catchments = Catchment::sequence(vec![
        Rect::new((0.0, 0.0), (half_w, half_h)).to_polygon(),
        Rect::new((half_w, 0.0), (PLANE_WIDTH, half_h)).to_polygon(),
        Rect::new((0.0, half_h), (half_w, PLANE_HEIGHT)).to_polygon(),
        Rect::new((half_w, half_h), (PLANE_WIDTH, PLANE_HEIGHT)).to_polygon(),
    ]);

    let mut rng = StdRng::seed_from_u64(rng_seed);
    let cell_w = PLANE_WIDTH / cols as f64;
    let cell_h = PLANE_HEIGHT / rows as f64;
    let mut lsoa_records = Vec::with_capacity(cols * rows);
    for row in 0..rows {
        for col in 0..cols {
            let x0 = col as f64 * cell_w;
            let y0 = row as f64 * cell_h;
            lsoa_records.push(LsoaRecord {
                code: format!("E01{:06}", row * cols + col + 1),
                boundary: Rect::new((x0, y0), (x0 + cell_w, y0 + cell_h)).to_polygon(),
                population_5_to_9: sample_population(&mut rng, mean_population, mean_population * 0.3),
            });
        }
    }

    let school_sites = SCHOOLS
        .iter()
        .map(|(name, x, y, _)| SchoolSite {
            name: name.to_string(),
            location: Point::new(*x, *y),
        })
        .collect();

    let pan_rows = SCHOOLS
        .iter()
        .map(|(name, _, _, pans)| PanRow {
            school: name.to_string(),
            pan_by_year: BTreeMap::from([(2024, pans[0]), (2025, pans[1]), (2026, pans[2])]),
        })
        .collect();

    Scenario {
        catchments,
        lsoa_records,
        school_sites,
        pans: PanTable::new(pan_rows),
    }
}
