//! Asset manifest: logical asset name to emitted (hashed) file name.
//!
//! The manifest accumulates across the modern and legacy passes. Keys are
//! `<logical name><extension>` (`main.mjs`, `main.js`) and values are the file
//! names the engine actually emitted. A key produced again on a later pass is
//! overwritten.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetManifest {
    entries: BTreeMap<String, String>,
}

impl AssetManifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace `key`. Returns the previous file name, if any.
    pub fn upsert(&mut self, key: impl Into<String>, file_name: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), file_name.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Look up a logical name with an explicit extension (`".mjs"`).
    pub fn lookup(&self, name: &str, extension: &str) -> Option<&str> {
        self.get(&manifest_key(name, extension))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Apply a batch of staged entries in order.
    pub fn extend<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in entries {
            self.entries.insert(key, value);
        }
    }
}

/// Manifest key for a logical name and an extension such as `.mjs`.
pub fn manifest_key(name: &str, extension: &str) -> String {
    format!("{name}{extension}")
}
