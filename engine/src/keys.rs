//! Item key specifications and the key mapper.
//!
//! A specification is an ordered list whose first entry names the primary key,
//! optionally aliased between the local and remote shapes, and whose remaining
//! entries are secondary keys shared verbatim by both shapes:
//!
//! ```json
//! [{"text": "value"}, "count"]
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One entry of an item key specification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyEntry {
    /// Same field name on both sides.
    Plain(String),
    /// `{ localName: remoteName }`. Only valid as the first entry.
    Mapped(BTreeMap<String, String>),
}

impl From<&str> for KeyEntry {
    fn from(name: &str) -> Self {
        KeyEntry::Plain(name.to_string())
    }
}

impl From<String> for KeyEntry {
    fn from(name: String) -> Self {
        KeyEntry::Plain(name)
    }
}

/// An item key specification, as handed over by the UI layer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemKeys(Vec<KeyEntry>);

impl ItemKeys {
    pub fn new(entries: Vec<KeyEntry>) -> Self {
        Self(entries)
    }

    /// Specification whose primary key has the same name on both sides.
    pub fn plain<I, S>(primary: &str, secondary: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut entries = vec![KeyEntry::from(primary)];
        entries.extend(secondary.into_iter().map(|k| KeyEntry::Plain(k.into())));
        Self(entries)
    }

    /// Specification whose primary key is renamed between the two shapes.
    pub fn mapped<I, S>(local: &str, remote: &str, secondary: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut primary = BTreeMap::new();
        primary.insert(local.to_string(), remote.to_string());
        let mut entries = vec![KeyEntry::Mapped(primary)];
        entries.extend(secondary.into_iter().map(|k| KeyEntry::Plain(k.into())));
        Self(entries)
    }

    pub fn entries(&self) -> &[KeyEntry] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The specification truncated to its primary key.
    pub fn primary_only(&self) -> Self {
        Self(self.0.iter().take(1).cloned().collect())
    }

    /// Resolve the specification into local/remote primary keys and the
    /// shared secondary keys.
    pub fn resolve(&self) -> Result<KeyMap> {
        let (first, rest) = self
            .0
            .split_first()
            .ok_or_else(|| Error::InvalidSpec("specification is empty".into()))?;

        let (local_primary, remote_primary) = match first {
            KeyEntry::Plain(name) => (name.clone(), name.clone()),
            KeyEntry::Mapped(map) => {
                let mut pairs = map.iter();
                match (pairs.next(), pairs.next()) {
                    (Some((local, remote)), None) => (local.clone(), remote.clone()),
                    _ => {
                        return Err(Error::InvalidSpec(format!(
                            "primary key mapping must have exactly one entry, got {}",
                            map.len()
                        )))
                    }
                }
            }
        };

        let secondary = rest
            .iter()
            .map(|entry| match entry {
                KeyEntry::Plain(name) => Ok(name.clone()),
                KeyEntry::Mapped(_) => Err(Error::InvalidSpec(
                    "only the primary key may be mapped".into(),
                )),
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(KeyMap {
            local_primary,
            remote_primary,
            secondary,
        })
    }
}

impl From<Vec<KeyEntry>> for ItemKeys {
    fn from(entries: Vec<KeyEntry>) -> Self {
        Self(entries)
    }
}

/// Resolved form of an [`ItemKeys`] specification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyMap {
    /// Primary key name in the local (UI) shape
    pub local_primary: String,
    /// Primary key name in the remote (API) shape
    pub remote_primary: String,
    /// Keys copied as-is between the two shapes
    pub secondary: Vec<String>,
}
