//! Dispatch over the four allocation models.

use log::info;

use crate::capacity::PanPlan;
use crate::errors::AllocationError;
use crate::models::{AllocationRun, Lsoa, ModelVariant, School, SweepConfig};
use crate::{lsoa_sweep, school_sweep};

/// Run one allocation model over a labeled roster and LSOA table. Consumes
/// the working state and returns it fully assigned; the LSOAs-first models
/// ignore the sweep ordering config.
pub fn run(
    variant: ModelVariant,
    schools: Vec<School>,
    lsoas: Vec<Lsoa>,
    plan: &PanPlan,
    config: &SweepConfig,
) -> Result<AllocationRun, AllocationError> {
    info!(
        "running {variant:?} over {} schools and {} LSOAs for PAN year {}",
        schools.len(),
        lsoas.len(),
        plan.year
    );
    match variant {
        ModelVariant::SchoolsFirst => school_sweep::allocate(schools, lsoas, plan, config, false),
        ModelVariant::SchoolsFirstCatchment => {
            school_sweep::allocate(schools, lsoas, plan, config, true)
        }
        ModelVariant::LsoasFirst => lsoa_sweep::allocate(schools, lsoas, plan, false),
        ModelVariant::LsoasFirstCatchment => lsoa_sweep::allocate(schools, lsoas, plan, true),
    }
}
