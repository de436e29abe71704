//! Energy and CO2 emissions estimates for ML training runs.
//!
//! - [`reference`]: GPU TDP and regional carbon intensity tables.
//! - [`run`] / [`validation`]: run descriptors and their checks.
//! - [`calculator`]: the per-run energy and emissions formula.
//! - [`aggregation`]: batch totals.
//! - [`persistence`]: the append-only CSV log.
//! - [`pipeline`]: the whole batch, end to end.
//!
//! Everything here is synchronous and free of global state; reference
//! tables are passed in explicitly.

pub mod aggregation;
pub mod calculator;
pub mod error;
pub mod persistence;
pub mod pipeline;
pub mod reference;
pub mod run;
pub mod types;
pub mod validation;

pub use aggregation::{aggregate, BatchTotals};
pub use calculator::{calculate, calculate_at, EmissionsResult};
pub use error::{CoreError, LookupError, RunError};
pub use persistence::{append_results, AppendSummary};
pub use pipeline::{
    process_batch, run_pipeline, BatchOutcome, PipelineReport, RejectedRun, RunOutcome,
};
pub use reference::{
    CarbonIntensity, CarbonIntensityTable, GpuSpec, GpuSpecTable, InputPaths, ReferenceData,
};
pub use run::{RunDescriptor, RunDraft};
pub use validation::{validate, FieldViolation, ViolationKind};
