//! Thin adapter over the `geo` primitives the allocation models consume:
//! distances, overlap fractions, and point-in-polygon tests.

use geo::{Area, BooleanOps, Contains, EuclideanDistance, Point, Polygon};

/// Fraction of `area` lying inside `region`. Zero for a degenerate `area`.
pub fn overlap_fraction(area: &Polygon<f64>, region: &Polygon<f64>) -> f64 {
    let total = area.unsigned_area();
    if total == 0.0 {
        return 0.0;
    }
    area.intersection(region).unsigned_area() / total
}

/// Whether `region` contains the given point.
pub fn contains_point(region: &Polygon<f64>, point: &Point<f64>) -> bool {
    region.contains(point)
}

/// Distance from a school site to an LSOA boundary; zero when the site lies
/// inside the polygon.
pub fn distance_to_lsoa(site: &Point<f64>, boundary: &Polygon<f64>) -> f64 {
    site.euclidean_distance(boundary)
}

/// Straight-line spacing between two school sites.
pub fn school_spacing(a: &Point<f64>, b: &Point<f64>) -> f64 {
    a.euclidean_distance(b)
}
