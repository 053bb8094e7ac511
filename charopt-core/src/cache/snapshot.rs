//! Frozen view of the populated settings.

use compact_str::CompactString;
use dashmap::DashMap;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Read-only mapping from settings key to settings object.
///
/// Produced once when the cache becomes ready and never modified after.
pub struct SettingsMap<T> {
    entries: HashMap<CompactString, Arc<T>>,
}

impl<T> SettingsMap<T> {
    /// Copy the current contents of the insertion map.
    pub(crate) fn freeze(entries: &DashMap<CompactString, Arc<T>>) -> Self {
        Self {
            entries: entries
                .iter()
                .map(|entry| (entry.key().clone(), Arc::clone(entry.value())))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Arc<T>> {
        self.entries.get(key)
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

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(CompactString::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<T>)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Keys in lexical order.
    pub fn sorted_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.keys().collect();
        keys.sort_unstable();
        keys
    }
}

impl<T> Default for SettingsMap<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for SettingsMap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}
