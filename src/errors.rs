//! Error types for scenario preparation and allocation runs.

use thiserror::Error;

/// Fatal failures raised before or during an allocation run.
///
/// Labeling and PAN-resolution failures abort before any allocation state
/// is mutated. `Stalled` converts a run that stopped making progress into a
/// reported fault instead of a spin.
#[derive(Debug, Error)]
pub enum AllocationError {
    /// A rostered school has no PAN row, or its row lacks the requested year.
    #[error("no PAN found for {school} in year {year}")]
    MissingPan { school: String, year: u16 },

    /// A school site lies outside every catchment polygon.
    #[error("school {name} is outside every catchment")]
    SchoolOutsideCatchments { name: String },

    /// The catchment table is empty, so nothing can be labeled.
    #[error("catchment table is empty")]
    NoCatchments,

    /// The configured sweep seed is not in the school roster.
    #[error("seed school {name} is not in the roster")]
    UnknownSeedSchool { name: String },

    /// An allocation run needs at least one school.
    #[error("school roster is empty")]
    NoSchools,

    /// A full pass assigned nothing and saturated nothing.
    #[error("allocation stalled after {passes} passes with {unassigned} LSOAs unassigned")]
    Stalled { passes: usize, unassigned: usize },

    /// An LSOA reached projection without an assignment.
    #[error("LSOA {code} finished the run unassigned")]
    UnassignedLsoa { code: String },
}
