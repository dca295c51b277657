//! Pupil intake estimation from demographic counts.

use rand::Rng;
use rand_distr::Normal;

/// Share of the 5–9 age band expected to enter school in a single year.
pub const INTAKE_RATIO: f64 = 0.19288;

/// Estimated entry-year pupils in an LSOA, from its 5–9 population band.
pub fn intake_estimate(population_5_to_9: u32) -> u32 {
    (population_5_to_9 as f64 * INTAKE_RATIO).floor() as u32
}

/// Draw a synthetic 5–9 population count around `mean`, truncated at zero
/// and capped three standard deviations above the mean.
pub fn sample_population<R: Rng>(rng: &mut R, mean: f64, std_dev: f64) -> u32 {
    let normal = Normal::new(mean, std_dev).expect("Invalid normal distribution parameters");
    let draw: f64 = rng.sample(normal);
    let cap = mean + 3.0 * std_dev;
    (draw.max(0.0) as u32).min(cap as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn estimate_floors_the_product() {
        assert_eq!(intake_estimate(0), 0);
        assert_eq!(intake_estimate(100), 19); // 19.288 floors to 19
        assert_eq!(intake_estimate(1000), 192); // 192.88 floors to 192
    }

    #[test]
    fn samples_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let draw = sample_population(&mut rng, 100.0, 25.0);
            assert!(draw <= 175); // mean + 3 sigma
        }
    }
}
