//! Maintenance of the reference tables the calculator reads.
//!
//! GPU specifications are refreshed from a remote catalog and merged into
//! the on-disk table without dropping manual entries. Carbon intensity is
//! curated by hand; [`guidance`] describes where the numbers come from.

pub mod backup;
pub mod extract;
pub mod guidance;
pub mod merge;
pub mod source;
pub mod updater;

pub use extract::{extract_datacenter_gpus, match_target_model, CatalogSpecs, TARGET_MODELS};
pub use guidance::render_carbon_guidance;
pub use merge::{diff_specs, merge_specs, RawSpecTable, SpecDiff, TdpChange};
pub use source::{FetchError, GpuCatalogSource, HttpCatalogSource, GPU_DATA_URL};
pub use updater::{update_gpu_specs, GpuUpdateReport, UpdateError};
