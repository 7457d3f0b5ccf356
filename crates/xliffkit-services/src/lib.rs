//! Reconciliation engine: set-theoretic and join operations over unit
//! stores. Every operation borrows its inputs and returns a fresh store plus
//! a report, so results compose without aliasing surprises.

mod combine;
mod diff;
mod enrich;
mod sample;

pub use combine::{combine, combine_dir, combine_with_policy};
pub use diff::diff;
pub use enrich::enrich;
pub use sample::{sample, sample_with_rng, SamplePolicy};

pub use xliffkit_core::{
    CombineReport, DiffReport, EnrichReport, Result, SampleReport, TransUnit, UnitStore,
};
