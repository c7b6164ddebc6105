//! Recently used locations, most recent first.
//!
//! Entries are unique by rounded coordinate. The whole list is persisted as
//! one JSON array in a single key-value slot after every change.

use meteogram_core::{ForecastError, HistoryConfig, StorageError};

use crate::storage::KeyValueStore;
use crate::types::Location;

pub const DEFAULT_MAX_ITEMS: usize = 10;
pub const DEFAULT_STORAGE_KEY: &str = "weatherSearchHistory";

pub struct HistoryStore<K> {
    entries: Vec<Location>,
    max_items: usize,
    key: String,
    store: K,
}

impl<K: KeyValueStore> HistoryStore<K> {
    /// Create an empty history; call [`HistoryStore::load`] to restore saved entries.
    pub fn new(store: K, key: impl Into<String>, max_items: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_items: max_items.max(1),
            key: key.into(),
            store,
        }
    }

    pub fn from_config(store: K, config: &HistoryConfig) -> Self {
        Self::new(store, config.storage_key.clone(), config.max_items)
    }

    /// Create a history and immediately restore saved entries.
    pub fn open(store: K, config: &HistoryConfig) -> Self {
        let mut history = Self::from_config(store, config);
        history.load();
        history
    }

    pub fn entries(&self) -> &[Location] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Location> {
        self.entries.get(index)
    }

    pub fn most_recent(&self) -> Option<&Location> {
        self.entries.first()
    }

    pub fn max_items(&self) -> usize {
        self.max_items
    }

    /// Record a location.
    ///
    /// A location already present (same rounded coordinates) only has its
    /// name updated and keeps its position. Anything else goes to the front,
    /// evicting the oldest entry past `max_items`.
    pub fn add(&mut self, location: &Location) {
        if let Some(existing) = self
            .entries
            .iter_mut()
            .find(|entry| entry.same_place(location))
        {
            existing.name = location.name.clone();
        } else {
            self.entries.insert(0, location.clone());
            self.entries.truncate(self.max_items);
        }
        self.persist();
    }

    /// Remove the entry at `index`. Out-of-range indices are ignored.
    pub fn remove(&mut self, index: usize) -> Option<Location> {
        if index >= self.entries.len() {
            tracing::warn!(
                "Ignoring history removal at {} (len {})",
                index,
                self.entries.len()
            );
            return None;
        }

        let removed = self.entries.remove(index);
        self.persist();
        Some(removed)
    }

    /// Rename the entry at `index`.
    ///
    /// Returns the renamed entry, or `None` when the trimmed name is empty or
    /// the index is out of range (nothing changes in either case).
    pub fn rename(&mut self, index: usize, new_name: &str) -> Option<&Location> {
        let new_name = new_name.trim();
        if new_name.is_empty() || index >= self.entries.len() {
            return None;
        }

        self.entries[index].name = new_name.to_string();
        self.persist();
        self.entries.get(index)
    }

    /// Replace in-memory entries with the persisted ones.
    ///
    /// A missing slot yields an empty history. So does a corrupt one; it is
    /// logged and overwritten by the next save.
    pub fn load(&mut self) {
        self.entries = match self.store.get(&self.key) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Location>>(&raw) {
                Ok(mut entries) => {
                    entries.truncate(self.max_items);
                    entries
                }
                Err(e) => {
                    let err = ForecastError::MalformedHistory(e.to_string());
                    tracing::warn!("Resetting history: {}", err);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!("Could not read history: {}", e);
                Vec::new()
            }
        };
        tracing::debug!("Loaded {} history entries", self.entries.len());
    }

    /// Write the current entries to the store.
    pub fn save(&self) -> Result<(), StorageError> {
        let payload = serde_json::to_string(&self.entries)
            .map_err(|e| StorageError::QueryFailed(e.to_string()))?;
        self.store.set(&self.key, &payload)
    }

    fn persist(&self) {
        if let Err(e) = self.save() {
            tracing::warn!("Failed to save history: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryKeyValueStore;
    use std::sync::Arc;

    fn history() -> HistoryStore<Arc<MemoryKeyValueStore>> {
        HistoryStore::new(
            Arc::new(MemoryKeyValueStore::new()),
            DEFAULT_STORAGE_KEY,
            DEFAULT_MAX_ITEMS,
        )
    }

    fn place(i: usize) -> Location {
        Location::new(format!("Place {}", i), 30.0 + i as f64, -100.0 - i as f64)
    }

    #[test]
    fn test_add_prepends() {
        let mut h = history();
        h.add(&place(1));
        h.add(&place(2));
        assert_eq!(h.entries()[0].name, "Place 2");
        assert_eq!(h.entries()[1].name, "Place 1");
    }

    #[test]
    fn test_add_same_place_updates_name_only() {
        let mut h = history();
        h.add(&place(1));
        h.add(&place(2));
        h.add(&Location::new("Renamed", 31.00001, -101.00002));
        h.add(&Location::new("Renamed again", 31.0, -101.0));

        assert_eq!(h.len(), 2);
        assert_eq!(h.entries()[1].name, "Renamed again");
        assert_eq!(h.entries()[0].name, "Place 2");
    }

    #[test]
    fn test_capped_at_max_items() {
        let mut h = history();
        for i in 0..11 {
            h.add(&place(i));
        }
        assert_eq!(h.len(), 10);
        assert_eq!(h.entries()[0].name, "Place 10");
        assert!(h.entries().iter().all(|l| l.name != "Place 0"));
    }

    #[test]
    fn test_remove() {
        let mut h = history();
        h.add(&place(1));
        h.add(&place(2));
        let removed = h.remove(0).unwrap();
        assert_eq!(removed.name, "Place 2");
        assert_eq!(h.len(), 1);
        assert!(h.remove(5).is_none());
        assert_eq!(h.len(), 1);
    }

    #[test]
    fn test_rename_whitespace_is_noop() {
        let mut h = history();
        for i in 0..3 {
            h.add(&place(i));
        }
        assert!(h.rename(2, "  ").is_none());
        assert_eq!(h.entries()[2].name, "Place 0");
    }

    #[test]
    fn test_rename_trims_and_persists() {
        let store = Arc::new(MemoryKeyValueStore::new());
        let mut h = HistoryStore::new(store.clone(), DEFAULT_STORAGE_KEY, DEFAULT_MAX_ITEMS);
        h.add(&place(1));
        assert_eq!(h.rename(0, "  Cabin ").map(|l| l.name.clone()).as_deref(), Some("Cabin"));

        let saved = store.get(DEFAULT_STORAGE_KEY).unwrap().unwrap();
        assert!(saved.contains("\"Cabin\""));
    }

    #[test]
    fn test_load_restores_saved_entries() {
        let store = Arc::new(MemoryKeyValueStore::new());
        {
            let mut h = HistoryStore::new(store.clone(), DEFAULT_STORAGE_KEY, DEFAULT_MAX_ITEMS);
            h.add(&place(1));
            h.add(&place(2));
        }

        let mut h = HistoryStore::new(store, DEFAULT_STORAGE_KEY, DEFAULT_MAX_ITEMS);
        h.load();
        assert_eq!(h.len(), 2);
        assert_eq!(h.most_recent().map(|l| l.name.as_str()), Some("Place 2"));
    }

    #[test]
    fn test_corrupt_payload_resets_then_is_overwritten() {
        let store = Arc::new(MemoryKeyValueStore::with_slot(DEFAULT_STORAGE_KEY, "{not json"));
        let mut h = HistoryStore::new(store.clone(), DEFAULT_STORAGE_KEY, DEFAULT_MAX_ITEMS);
        h.load();
        assert!(h.is_empty());

        h.add(&place(1));
        let saved = store.get(DEFAULT_STORAGE_KEY).unwrap().unwrap();
        let parsed: Vec<Location> = serde_json::from_str(&saved).unwrap();
        assert_eq!(parsed.len(), 1);
    }

    #[test]
    fn test_load_truncates_oversized_payload() {
        let entries: Vec<Location> = (0..15).map(place).collect();
        let payload = serde_json::to_string(&entries).unwrap();
        let store = MemoryKeyValueStore::with_slot(DEFAULT_STORAGE_KEY, &payload);
        let mut h = HistoryStore::new(store, DEFAULT_STORAGE_KEY, DEFAULT_MAX_ITEMS);
        h.load();
        assert_eq!(h.len(), DEFAULT_MAX_ITEMS);
    }
}
