//! Add, remove and update operations on a [`RegistryDocument`].
//!
//! Every operation either applies completely and returns an [`EditReport`],
//! or is rejected with a [`MetaError`] and leaves the document as it was.

use super::document::{Instance, RegistryDocument};
use crate::{MetaError, Result};
use std::fmt;

/// Parameters for [`add_instance`].
#[derive(Debug, Clone, Default)]
pub struct NewInstance {
    pub name: String,
    pub host: String,
    pub cdmver: String,
    /// `Some("")` still writes the key.
    pub userpass: Option<String>,
    /// Also append the name to `query-from`.
    pub query: bool,
    /// Also point `index-to` at this instance.
    pub index: bool,
}

/// Field changes for [`update_instance`]. Every field is independent.
#[derive(Debug, Clone, Default)]
pub struct InstanceUpdate {
    pub host: Option<String>,
    pub cdmver: Option<String>,
    pub userpass: Option<String>,
    /// Wins over `userpass` when both are given.
    pub remove_userpass: bool,
    pub index: bool,
    pub query: bool,
    /// Applied after `query`, so passing both leaves the name out of
    /// `query-from`.
    pub no_query: bool,
}

impl InstanceUpdate {
    /// Whether any change was requested at all.
    pub fn is_empty(&self) -> bool {
        self.host.is_none()
            && self.cdmver.is_none()
            && self.userpass.is_none()
            && !self.remove_userpass
            && !self.index
            && !self.query
            && !self.no_query
    }
}

/// One sub-action performed (or found unnecessary) by an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditNote {
    InstanceAdded(String),
    InstanceRemoved(String),
    HostSet(String),
    CdmverSet(String),
    UserpassSet(String),
    UserpassRemoved,
    UserpassAlreadyAbsent,
    IndexToSet(String),
    IndexToAlreadySet(String),
    /// `index-to` pointed at a removed instance and is now unset.
    IndexToCleared(String),
    QueryFromAdded(String),
    QueryFromAlreadyPresent(String),
    QueryFromRemoved(String),
    QueryFromAlreadyAbsent(String),
    /// `query-from` became empty.
    QueryFromEmptied,
}

impl EditNote {
    /// Whether this note records an actual modification of the document.
    pub fn is_change(&self) -> bool {
        !matches!(
            self,
            EditNote::UserpassAlreadyAbsent
                | EditNote::IndexToAlreadySet(_)
                | EditNote::QueryFromAlreadyPresent(_)
                | EditNote::QueryFromAlreadyAbsent(_)
                | EditNote::QueryFromEmptied
        )
    }

    /// Whether the resulting configuration deserves the operator's attention.
    pub fn is_warning(&self) -> bool {
        matches!(self, EditNote::IndexToCleared(_) | EditNote::QueryFromEmptied)
    }
}

impl fmt::Display for EditNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditNote::InstanceAdded(name) => {
                write!(f, "Instance '{name}' added to 'instances' list.")
            }
            EditNote::InstanceRemoved(name) => {
                write!(f, "Instance '{name}' removed from 'instances' list.")
            }
            EditNote::HostSet(host) => write!(f, "host set to '{host}'"),
            EditNote::CdmverSet(cdmver) => write!(f, "cdmver set to '{cdmver}'"),
            EditNote::UserpassSet(userpass) => write!(f, "userpass set to '{userpass}'"),
            EditNote::UserpassRemoved => f.write_str("userpass removed"),
            EditNote::UserpassAlreadyAbsent => {
                f.write_str("userpass was not set, no change to userpass")
            }
            EditNote::IndexToSet(name) => write!(f, "'index-to' set to '{name}'"),
            EditNote::IndexToAlreadySet(name) => write!(f, "'index-to' was already '{name}'"),
            EditNote::IndexToCleared(name) => write!(
                f,
                "'index-to' was '{name}', now unset. Warning: No instance is currently configured for 'index-to'."
            ),
            EditNote::QueryFromAdded(name) => write!(f, "'{name}' added to 'query-from'"),
            EditNote::QueryFromAlreadyPresent(name) => {
                write!(f, "'{name}' was already in 'query-from'")
            }
            EditNote::QueryFromRemoved(name) => write!(f, "'{name}' removed from 'query-from'"),
            EditNote::QueryFromAlreadyAbsent(name) => {
                write!(f, "'{name}' was not present in 'query-from'")
            }
            EditNote::QueryFromEmptied => {
                f.write_str("Warning: No instance is currently configured for 'query-from'")
            }
        }
    }
}

/// What an applied operation did, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditReport {
    pub name: String,
    pub notes: Vec<EditNote>,
}

impl EditReport {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            notes: Vec::new(),
        }
    }

    /// Whether the document was modified and must be saved.
    pub fn changed(&self) -> bool {
        self.notes.iter().any(EditNote::is_change)
    }

    /// Single-line summary of an update, e.g.
    /// `Instance 'a' updated: host set to 'h2'; 'a' added to 'query-from'.`
    pub fn summary(&self) -> String {
        let parts: Vec<String> = self.notes.iter().map(ToString::to_string).collect();
        format!("Instance '{}' updated: {}.", self.name, parts.join("; "))
    }
}

/// Append a new instance, optionally registering it in `query-from` and as
/// `index-to`.
pub fn add_instance(doc: &mut RegistryDocument, new: NewInstance) -> Result<EditReport> {
    if new.name.is_empty() {
        return Err(MetaError::EmptyName);
    }
    if doc.contains(&new.name) {
        return Err(MetaError::DuplicateInstance { name: new.name });
    }

    let mut report = EditReport::new(&new.name);
    let NewInstance {
        name,
        host,
        cdmver,
        userpass,
        query,
        index,
    } = new;

    let mut instance = Instance::new(name.clone(), host, cdmver);
    instance.userpass = userpass;
    doc.instances.push(instance);
    report.notes.push(EditNote::InstanceAdded(name.clone()));

    if query {
        if doc.is_query_source(&name) {
            report.notes.push(EditNote::QueryFromAlreadyPresent(name.clone()));
        } else {
            doc.query_from.push(name.clone());
            report.notes.push(EditNote::QueryFromAdded(name.clone()));
        }
    }

    if index {
        doc.index_to = Some(name.clone());
        report.notes.push(EditNote::IndexToSet(name));
    }

    Ok(report)
}

/// Remove an instance and every reference to it.
pub fn remove_instance(doc: &mut RegistryDocument, name: &str) -> Result<EditReport> {
    let before = doc.instances.len();
    doc.instances.retain(|inst| inst.name != name);
    if doc.instances.len() == before {
        return Err(MetaError::InstanceNotFound {
            name: name.to_string(),
        });
    }

    let mut report = EditReport::new(name);
    report.notes.push(EditNote::InstanceRemoved(name.to_string()));

    if let Some(pos) = doc.query_from.iter().position(|n| n == name) {
        doc.query_from.remove(pos);
        report.notes.push(EditNote::QueryFromRemoved(name.to_string()));
    }

    if doc.is_index_target(name) {
        doc.index_to = None;
        report.notes.push(EditNote::IndexToCleared(name.to_string()));
    }

    Ok(report)
}

/// Apply a set of independent field changes to an existing instance.
///
/// Fails with [`MetaError::NoUpdateFields`] when no change was requested and
/// with [`MetaError::NoChanges`] when nothing was actually modified.
pub fn update_instance(
    doc: &mut RegistryDocument,
    name: &str,
    update: InstanceUpdate,
) -> Result<EditReport> {
    if update.is_empty() {
        return Err(MetaError::NoUpdateFields);
    }
    let Some(instance) = doc.find_mut(name) else {
        return Err(MetaError::InstanceNotFound {
            name: name.to_string(),
        });
    };

    let mut report = EditReport::new(name);

    if let Some(host) = update.host {
        instance.host = host.clone();
        report.notes.push(EditNote::HostSet(host));
    }

    if let Some(cdmver) = update.cdmver {
        instance.cdmver = cdmver.clone();
        report.notes.push(EditNote::CdmverSet(cdmver));
    }

    if update.remove_userpass {
        if instance.clear_userpass() {
            report.notes.push(EditNote::UserpassRemoved);
        } else {
            report.notes.push(EditNote::UserpassAlreadyAbsent);
        }
    } else if let Some(userpass) = update.userpass {
        instance.set_userpass(userpass.clone());
        report.notes.push(EditNote::UserpassSet(userpass));
    }

    if update.index {
        if doc.is_index_target(name) {
            report.notes.push(EditNote::IndexToAlreadySet(name.to_string()));
        } else {
            doc.index_to = Some(name.to_string());
            report.notes.push(EditNote::IndexToSet(name.to_string()));
        }
    }

    if update.query {
        if doc.is_query_source(name) {
            report.notes.push(EditNote::QueryFromAlreadyPresent(name.to_string()));
        } else {
            doc.query_from.push(name.to_string());
            report.notes.push(EditNote::QueryFromAdded(name.to_string()));
        }
    }

    if update.no_query {
        if let Some(pos) = doc.query_from.iter().position(|n| n == name) {
            doc.query_from.remove(pos);
            report.notes.push(EditNote::QueryFromRemoved(name.to_string()));
            if doc.query_from.is_empty() {
                report.notes.push(EditNote::QueryFromEmptied);
            }
        } else {
            report.notes.push(EditNote::QueryFromAlreadyAbsent(name.to_string()));
        }
    }

    if !report.changed() {
        return Err(MetaError::NoChanges {
            name: name.to_string(),
        });
    }

    Ok(report)
}
