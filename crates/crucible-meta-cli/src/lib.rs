//! Frontends for the `manage-instances` and `result-processor` binaries.
//!
//! Argument parsing and rendering live here; all document handling is in
//! `crucible_meta`.

pub mod instances_cmd;
pub mod logging;
pub mod results_cmd;
