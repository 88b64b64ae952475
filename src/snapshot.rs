/// In-memory mirror of a page's local storage
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Ordered key/value copy of a page's storage, in the order the store enumerated it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StorageSnapshot {
    entries: IndexMap<String, String>,
}

impl StorageSnapshot {
    pub fn new() -> Self {
        StorageSnapshot {
            entries: IndexMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Write a value; an existing key keeps its position
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Remove a key, keeping the order of the others
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.shift_remove(key)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Byte length of the compact JSON form, as a rough size of what the page stores
    pub fn approximate_size(&self) -> usize {
        serde_json::to_string(&self.entries)
            .map(|json| json.len())
            .unwrap_or(0)
    }

    /// Two-space indented JSON, as written to export files
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.entries)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for StorageSnapshot {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        StorageSnapshot {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
