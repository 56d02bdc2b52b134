//! Instance registry: the JSON document naming the CDM endpoints that results
//! are indexed to and queried from.
//!
//! Each invocation is a fresh load, at most one mutation, and a save when the
//! mutation (or a missing file) calls for it:
//!
//! ```rust,ignore
//! use crucible_meta::instances::{self, NewInstance};
//!
//! let mut loaded = instances::load(path)?;
//! let report = instances::add_instance(&mut loaded.document, new)?;
//! if report.changed() || loaded.needs_save() {
//!     instances::save(path, &loaded.document)?;
//! }
//! ```
//!
//! There is no locking: concurrent writers against the same file race and the
//! last one wins.

mod document;
mod ops;
mod query;
mod store;

pub use document::{Instance, RegistryDocument};
pub use ops::{
    add_instance, remove_instance, update_instance, EditNote, EditReport, InstanceUpdate,
    NewInstance,
};
pub use query::{query_args, query_options};
pub use store::{load, save, to_json_string, DocumentOrigin, LoadedDocument};
