//! Crucible Meta - benchmark run metadata management.
//!
//! Two independent areas:
//!
//! - [`instances`]: the instance registry, a small JSON file naming the CDM
//!   endpoints results are indexed to (`index-to`) and queried from
//!   (`query-from`).
//! - [`results`]: result directories produced by rickshaw, and the tags stored
//!   in their run documents.
//!
//! Neither area prints anything; status lines are emitted as `tracing` events
//! and returned as typed reports so frontends decide how to render them.
//!
//! # Example
//!
//! ```rust,ignore
//! use crucible_meta::instances;
//!
//! fn main() -> crucible_meta::Result<()> {
//!     let loaded = instances::load("instances.json".as_ref())?;
//!     println!("{}", instances::query_options(&loaded.document));
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod instances;
pub mod persist;
pub mod results;

pub use config::{RegistryConfig, ResultsConfig};
pub use error::{MetaError, Result};
pub use instances::{
    EditNote, EditReport, Instance, InstanceUpdate, LoadedDocument, NewInstance, RegistryDocument,
};
pub use results::{ResultEntry, Tag, TagFilter};
