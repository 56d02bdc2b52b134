//! Result tags stored in the run document as `"tags": [{"name", "val"}]`.

use crate::{MetaError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::sync::LazyLock;
use tracing::debug;

const TAGS_KEY: &str = "tags";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub val: String,
}

static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([a-zA-Z0-9_\s-]+):([a-zA-Z0-9_:\s\\/-]+)$").unwrap());

/// Split `name:value`. The value may itself contain `:`.
pub fn parse_tag(text: &str) -> Result<Tag> {
    TAG_PATTERN
        .captures(text)
        .map(|caps| Tag {
            name: caps[1].to_string(),
            val: caps[2].to_string(),
        })
        .ok_or_else(|| MetaError::InvalidTag(text.to_string()))
}

/// Tags of a run document, or `None` when it has no `tags` key.
///
/// Entries that are not `{name, val}` string pairs are ignored.
pub fn read_tags(data: &Value) -> Option<Vec<Tag>> {
    let items = data.get(TAGS_KEY)?.as_array()?;
    Some(
        items
            .iter()
            .filter_map(|item| Tag::deserialize(item).ok())
            .collect(),
    )
}

fn tags_mut(data: &mut Value) -> Result<&mut Vec<Value>> {
    let map = data.as_object_mut().ok_or_else(|| MetaError::Json {
        message: "run document is not a JSON object".to_string(),
        source: None,
    })?;
    let tags = map.entry(TAGS_KEY).or_insert_with(|| json!([]));
    if !tags.is_array() {
        *tags = json!([]);
    }
    tags.as_array_mut().ok_or_else(|| MetaError::Json {
        message: "'tags' is not a list".to_string(),
        source: None,
    })
}

fn entry_name(item: &Value) -> Option<&str> {
    item.get("name").and_then(Value::as_str)
}

/// Add `name:value` tags, overwriting the value of tags that already exist.
///
/// All entries are validated before anything is modified.
pub fn add_tags(data: &mut Value, entries: &[String]) -> Result<Vec<Tag>> {
    if entries.is_empty() {
        return Err(MetaError::MissingTags { action: "add" });
    }
    let parsed = entries
        .iter()
        .map(|text| parse_tag(text))
        .collect::<Result<Vec<_>>>()?;

    let items = tags_mut(data)?;
    for tag in parsed {
        let mut found = false;
        for item in items
            .iter_mut()
            .filter(|item| entry_name(item) == Some(tag.name.as_str()))
        {
            item["val"] = Value::String(tag.val.clone());
            found = true;
        }
        if found {
            debug!("updated tag {}", tag.name);
        } else {
            debug!("appended tag {}", tag.name);
            items.push(json!({ "name": tag.name, "val": tag.val }));
        }
    }

    Ok(read_tags(data).unwrap_or_default())
}

/// Remove every tag with one of the given names.
pub fn remove_tags(data: &mut Value, names: &[String]) -> Result<Vec<Tag>> {
    if read_tags(data).is_none() {
        return Err(MetaError::NoTags);
    }
    if names.is_empty() {
        return Err(MetaError::MissingTags { action: "remove" });
    }
    if let Some(bad) = names.iter().find(|name| name.contains(':')) {
        return Err(MetaError::TagValueOnRemove(bad.clone()));
    }

    let items = tags_mut(data)?;
    let before = items.len();
    items.retain(|item| {
        entry_name(item)
            .map(|name| !names.iter().any(|n| n == name))
            .unwrap_or(true)
    });
    if items.len() == before {
        return Err(MetaError::NoMatchingTags);
    }

    Ok(read_tags(data).unwrap_or_default())
}

/// `name:val` pairs joined by `, `; values containing whitespace are quoted.
pub fn format_tags(tags: &[Tag]) -> String {
    tags.iter()
        .map(|tag| {
            if tag.val.chars().any(char::is_whitespace) {
                format!("{}:\"{}\"", tag.name, tag.val)
            } else {
                format!("{}:{}", tag.name, tag.val)
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Selects results carrying a tag, optionally with a specific value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagFilter {
    pub name: String,
    pub value: Option<String>,
}

impl TagFilter {
    /// `name:value` filters on both; anything else is taken as a bare name.
    pub fn parse(text: &str) -> Self {
        match parse_tag(text) {
            Ok(tag) => Self {
                name: tag.name,
                value: Some(tag.val),
            },
            Err(_) => Self {
                name: text.to_string(),
                value: None,
            },
        }
    }

    pub fn matches(&self, tags: &[Tag]) -> bool {
        tags.iter().any(|tag| {
            tag.name == self.name
                && self
                    .value
                    .as_deref()
                    .map_or(true, |value| tag.val == value)
        })
    }
}

impl fmt::Display for TagFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}:{}", self.name, value),
            None => f.write_str(&self.name),
        }
    }
}
