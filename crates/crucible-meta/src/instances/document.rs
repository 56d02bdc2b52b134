//! Registry document model.

use crate::config::RegistryConfig;
use crate::{MetaError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

const INSTANCES_KEY: &str = "instances";
const INDEX_TO_KEY: &str = "index-to";
const QUERY_FROM_KEY: &str = "query-from";
const USERPASS_KEY: &str = "userpass";

/// A named service endpoint that results can be indexed to or queried from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    pub name: String,
    pub host: String,
    pub cdmver: String,
    /// Credential file path. `Some("")` is kept distinct from `None`: the key
    /// is written either way.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub userpass: Option<String>,
    /// Keys this tool does not manage, carried through load/save untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Instance {
    pub fn new(name: impl Into<String>, host: impl Into<String>, cdmver: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            host: host.into(),
            cdmver: cdmver.into(),
            userpass: None,
            extra: Map::new(),
        }
    }

    pub fn with_userpass(mut self, userpass: impl Into<String>) -> Self {
        self.userpass = Some(userpass.into());
        self
    }

    /// Decode one registry entry. A `"userpass": null` is not a credential
    /// path, but the key is kept in `extra` so it survives a save.
    fn from_entry(mut entry: Value) -> serde_json::Result<Self> {
        let null_userpass = entry
            .as_object_mut()
            .filter(|map| map.get(USERPASS_KEY).is_some_and(Value::is_null))
            .and_then(|map| map.remove(USERPASS_KEY))
            .is_some();

        let mut instance: Instance = serde_json::from_value(entry)?;
        if null_userpass {
            instance.extra.insert(USERPASS_KEY.to_string(), Value::Null);
        }
        Ok(instance)
    }

    /// Set the credential path, replacing a null placeholder.
    pub fn set_userpass(&mut self, userpass: String) {
        self.extra.remove(USERPASS_KEY);
        self.userpass = Some(userpass);
    }

    /// Drop the `userpass` key, null or not. Returns whether it was present.
    pub fn clear_userpass(&mut self) -> bool {
        let placeholder = self.extra.remove(USERPASS_KEY).is_some();
        self.userpass.take().is_some() || placeholder
    }
}

/// The complete registry: all instances plus the `index-to` and `query-from`
/// references, both by instance name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RegistryDocument {
    pub instances: Vec<Instance>,
    #[serde(rename = "index-to")]
    pub index_to: Option<String>,
    #[serde(rename = "query-from")]
    pub query_from: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RegistryDocument {
    /// The document materialized when no registry file exists yet: one
    /// `local` instance that is both the index target and the only query
    /// source.
    pub fn builtin() -> Self {
        let name = RegistryConfig::DEFAULT_INSTANCE_NAME;
        Self {
            instances: vec![Instance::new(
                name,
                RegistryConfig::DEFAULT_INSTANCE_HOST,
                RegistryConfig::DEFAULT_INSTANCE_CDMVER,
            )],
            index_to: Some(name.to_string()),
            query_from: vec![name.to_string()],
            extra: Map::new(),
        }
    }

    /// Build a document from parsed JSON, normalizing the managed keys.
    ///
    /// A missing or non-array `instances`/`query-from` is reset to empty and a
    /// missing `index-to` becomes unset. Malformed instance entries are a
    /// decode error.
    pub fn from_json(value: Value, origin: &str) -> Result<Self> {
        let Value::Object(mut map) = value else {
            return Err(MetaError::Json {
                message: format!("Could not decode JSON from '{origin}': expected an object"),
                source: None,
            });
        };

        let instances = match map.remove(INSTANCES_KEY) {
            Some(Value::Array(items)) => items
                .into_iter()
                .map(Instance::from_entry)
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| MetaError::Json {
                    message: format!("Could not decode JSON from '{origin}': {e}"),
                    source: Some(e),
                })?,
            _ => {
                warn!("Warning: '{INSTANCES_KEY}' key not found or not a list in {origin}. Initializing '{INSTANCES_KEY}'.");
                Vec::new()
            }
        };

        let index_to = match map.remove(INDEX_TO_KEY) {
            None | Some(Value::Null) => None,
            Some(Value::String(name)) => Some(name),
            Some(other) => {
                warn!("Warning: '{INDEX_TO_KEY}' in {origin} is not a string ({other}). Treating it as unset.");
                None
            }
        };

        let query_from = match map.remove(QUERY_FROM_KEY) {
            Some(Value::Array(items)) if items.iter().all(Value::is_string) => items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(name) => Some(name),
                    _ => None,
                })
                .collect(),
            _ => {
                warn!("Warning: '{QUERY_FROM_KEY}' key not found or not a list in {origin}. Initializing '{QUERY_FROM_KEY}'.");
                Vec::new()
            }
        };

        Ok(Self {
            instances,
            index_to,
            query_from,
            extra: map,
        })
    }

    /// First instance with the given name.
    pub fn find(&self, name: &str) -> Option<&Instance> {
        self.instances.iter().find(|inst| inst.name == name)
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut Instance> {
        self.instances.iter_mut().find(|inst| inst.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    pub fn is_query_source(&self, name: &str) -> bool {
        self.query_from.iter().any(|n| n == name)
    }

    pub fn is_index_target(&self, name: &str) -> bool {
        self.index_to.as_deref() == Some(name)
    }

    /// Names referenced by `index-to` or `query-from` that match no instance.
    pub fn dangling_references(&self) -> Vec<&str> {
        self.index_to
            .iter()
            .chain(self.query_from.iter())
            .map(String::as_str)
            .filter(|name| !self.contains(name))
            .collect()
    }
}
