use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use indexmap::IndexMap;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::ops::favorites::FavoritesSet;

/// Preference record holding the saved module order
pub const MODULE_ORDER_KEY: &str = "module-order";
/// Preference record holding saved item orders per group
pub const GROUP_ITEM_ORDER_KEY: &str = "group-item-order";
/// Preference record holding the favorites map
pub const FAVORITES_KEY: &str = "favorites";

/// Error type for preference writes
#[derive(Debug, thiserror::Error)]
pub enum PrefsError {
    #[error("could not write preference {key} at {path}: {source}")]
    WriteError {
        key: String,
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not serialize preference {key}: {source}")]
    SerializeError {
        key: String,
        source: serde_json::Error,
    },
}

/// Durable string-keyed records. Last writer wins per key.
pub trait PreferenceStore {
    /// Raw record, or `None` when absent or unreadable
    fn read(&self, key: &str) -> Option<String>;
    fn write(&self, key: &str, value: &str) -> Result<(), PrefsError>;
}

/// One JSON file per key in a directory
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    dir: PathBuf,
}

impl FilePreferenceStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FilePreferenceStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn read(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path_for(key)).ok()
    }

    /// Write to a temp file in the same directory, then rename over the
    /// record so a crash never leaves a half-written file behind.
    fn write(&self, key: &str, value: &str) -> Result<(), PrefsError> {
        let path = self.path_for(key);
        let write_err = |source: std::io::Error| PrefsError::WriteError {
            key: key.to_string(),
            path: path.clone(),
            source,
        };
        fs::create_dir_all(&self.dir).map_err(write_err)?;
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir).map_err(write_err)?;
        tmp.write_all(value.as_bytes()).map_err(write_err)?;
        tmp.persist(&path).map_err(|e| write_err(e.error))?;
        Ok(())
    }
}

/// In-memory store for tests and ephemeral sessions
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    records: Mutex<HashMap<String, String>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the stored records
    pub fn records(&self) -> HashMap<String, String> {
        self.records.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn read(&self, key: &str) -> Option<String> {
        self.records.lock().ok()?.get(key).cloned()
    }

    fn write(&self, key: &str, value: &str) -> Result<(), PrefsError> {
        if let Ok(mut records) = self.records.lock() {
            records.insert(key.to_string(), value.to_string());
        }
        Ok(())
    }
}

/// The three durable navigation records, as loaded at mount.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preferences {
    pub module_order: Option<Vec<String>>,
    pub group_item_order: Option<IndexMap<String, Vec<String>>>,
    pub favorites: FavoritesSet,
}

/// Read and parse one record. Absent or malformed data both yield `None`.
fn read_json<T: DeserializeOwned>(store: &dyn PreferenceStore, key: &str) -> Option<T> {
    let content = store.read(key)?;
    match serde_json::from_str(&content) {
        Ok(value) => Some(value),
        Err(e) => {
            log::debug!("ignoring malformed preference {}: {}", key, e);
            None
        }
    }
}

fn write_json<T: Serialize>(
    store: &dyn PreferenceStore,
    key: &str,
    value: &T,
) -> Result<(), PrefsError> {
    let content = serde_json::to_string(value).map_err(|e| PrefsError::SerializeError {
        key: key.to_string(),
        source: e,
    })?;
    store.write(key, &content)
}

impl Preferences {
    /// Load all three records; each falls back independently.
    pub fn load(store: &dyn PreferenceStore) -> Self {
        Preferences {
            module_order: read_json(store, MODULE_ORDER_KEY),
            group_item_order: read_json(store, GROUP_ITEM_ORDER_KEY),
            favorites: read_json(store, FAVORITES_KEY).unwrap_or_default(),
        }
    }
}

pub fn save_module_order(store: &dyn PreferenceStore, order: &[String]) -> Result<(), PrefsError> {
    write_json(store, MODULE_ORDER_KEY, &order)
}

pub fn save_group_item_order(
    store: &dyn PreferenceStore,
    orders: &IndexMap<String, Vec<String>>,
) -> Result<(), PrefsError> {
    write_json(store, GROUP_ITEM_ORDER_KEY, orders)
}

pub fn save_favorites(store: &dyn PreferenceStore, favorites: &FavoritesSet) -> Result<(), PrefsError> {
    write_json(store, FAVORITES_KEY, favorites)
}

/// The records `order reset` removes. Favorites are kept.
pub const ORDER_KEYS: [&str; 2] = [MODULE_ORDER_KEY, GROUP_ITEM_ORDER_KEY];

/// Remove the given records. Missing files are fine.
pub fn clear_records(store: &FilePreferenceStore, keys: &[&str]) -> Result<(), std::io::Error> {
    for key in keys {
        match fs::remove_file(store.path_for(key)) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn write_and_read_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = FilePreferenceStore::new(dir.path().join("prefs"));

        let mut groups = IndexMap::new();
        groups.insert("crm-sales".to_string(), vec!["/crm/quotes".to_string()]);
        let mut favorites = FavoritesSet::new();
        favorites.toggle("/hrm/employees");

        save_module_order(&store, &["hrm".to_string(), "crm".to_string()]).unwrap();
        save_group_item_order(&store, &groups).unwrap();
        save_favorites(&store, &favorites).unwrap();

        let loaded = Preferences::load(&store);
        assert_eq!(loaded.module_order, Some(vec!["hrm".into(), "crm".into()]));
        assert_eq!(loaded.group_item_order, Some(groups));
        assert!(loaded.favorites.is_starred("/hrm/employees"));
    }

    #[test]
    fn read_missing_records_returns_defaults() {
        let dir = TempDir::new().unwrap();
        let store = FilePreferenceStore::new(dir.path());
        assert_eq!(Preferences::load(&store), Preferences::default());
    }

    #[test]
    fn malformed_record_is_absent_others_survive() {
        let dir = TempDir::new().unwrap();
        let store = FilePreferenceStore::new(dir.path());
        fs::write(dir.path().join("module-order.json"), "not json {{{").unwrap();
        fs::write(dir.path().join("favorites.json"), r#"["wrong","shape"]"#).unwrap();
        save_group_item_order(&store, &IndexMap::new()).unwrap();

        let loaded = Preferences::load(&store);
        assert!(loaded.module_order.is_none());
        assert_eq!(loaded.favorites, FavoritesSet::new());
        assert_eq!(loaded.group_item_order, Some(IndexMap::new()));
    }

    #[test]
    fn each_record_is_an_independent_key() {
        let store = MemoryPreferenceStore::new();
        save_module_order(&store, &["crm".to_string()]).unwrap();
        save_favorites(&store, &FavoritesSet::new()).unwrap();

        let records = store.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[MODULE_ORDER_KEY], r#"["crm"]"#);
        assert_eq!(records[FAVORITES_KEY], "{}");
    }

    #[test]
    fn overwrite_is_last_writer_wins() {
        let dir = TempDir::new().unwrap();
        let store = FilePreferenceStore::new(dir.path());
        save_module_order(&store, &["a".to_string()]).unwrap();
        save_module_order(&store, &["b".to_string()]).unwrap();
        assert_eq!(Preferences::load(&store).module_order, Some(vec!["b".into()]));
    }

    #[test]
    fn clear_removes_records() {
        let dir = TempDir::new().unwrap();
        let store = FilePreferenceStore::new(dir.path());
        save_module_order(&store, &["a".to_string()]).unwrap();
        let mut favorites = FavoritesSet::new();
        favorites.toggle("/crm/quotes");
        save_favorites(&store, &favorites).unwrap();

        clear_records(&store, &ORDER_KEYS).unwrap();
        clear_records(&store, &ORDER_KEYS).unwrap();
        let prefs = Preferences::load(&store);
        assert!(prefs.module_order.is_none());
        assert!(prefs.favorites.is_starred("/crm/quotes"));
    }
}
