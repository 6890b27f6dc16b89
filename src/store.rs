//! Persistence of logged quantities.
//!
//! The tracker never owns its storage; a `QuantityStore` is handed to it
//! for loading and saving.

use std::collections::BTreeMap;
use std::path::Path;

use rusqlite::Connection;

use crate::db;
use crate::error::StoreError;
use crate::models::{ActivityDefinition, LoggedActivity};

pub trait QuantityStore {
    /// Stored (activity id, quantity) pairs
    fn load_quantities(&self) -> Result<Vec<(String, f64)>, StoreError>;

    /// Replace the stored quantities; only positive quantities are kept
    fn save_quantities(&mut self, entries: &[LoggedActivity]) -> Result<(), StoreError>;
}

fn logged_only(entries: &[LoggedActivity]) -> impl Iterator<Item = &LoggedActivity> {
    entries.iter().filter(|a| a.quantity > 0.0)
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    quantities: BTreeMap<String, f64>,
}

impl MemoryStore {
    pub fn insert(&mut self, id: impl Into<String>, quantity: f64) {
        self.quantities.insert(id.into(), quantity);
    }

    pub fn len(&self) -> usize {
        self.quantities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quantities.is_empty()
    }
}

impl QuantityStore for MemoryStore {
    fn load_quantities(&self) -> Result<Vec<(String, f64)>, StoreError> {
        Ok(self.quantities.iter().map(|(id, q)| (id.clone(), *q)).collect())
    }

    fn save_quantities(&mut self, entries: &[LoggedActivity]) -> Result<(), StoreError> {
        self.quantities = logged_only(entries)
            .map(|a| (a.activity_id.clone(), a.quantity))
            .collect();
        Ok(())
    }
}

/// SQLite-backed store; also holds imported activity definitions
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        Self::from_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    pub fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        db::init_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn custom_activities(&self) -> Result<Vec<ActivityDefinition>, StoreError> {
        db::list_activities(&self.conn)
    }

    pub fn upsert_activity(&self, activity: &ActivityDefinition) -> Result<(), StoreError> {
        db::upsert_activity(&self.conn, activity)
    }

    pub fn clear_activities(&self) -> Result<(), StoreError> {
        db::clear_activities(&self.conn)
    }
}

impl QuantityStore for SqliteStore {
    fn load_quantities(&self) -> Result<Vec<(String, f64)>, StoreError> {
        db::list_quantities(&self.conn)
    }

    fn save_quantities(&mut self, entries: &[LoggedActivity]) -> Result<(), StoreError> {
        let rows: Vec<(&str, f64)> = logged_only(entries)
            .map(|a| (a.activity_id.as_str(), a.quantity))
            .collect();
        db::replace_quantities(&mut self.conn, &rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries() -> Vec<LoggedActivity> {
        vec![
            LoggedActivity::new("beef", 0.5),
            LoggedActivity::new("bus", 0.0),
            LoggedActivity::new("car-petrol", 10.0),
        ]
    }

    #[test]
    fn test_memory_store_keeps_positive_quantities() {
        let mut store = MemoryStore::default();
        store.save_quantities(&entries()).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(
            store.load_quantities().unwrap(),
            vec![("beef".to_string(), 0.5), ("car-petrol".to_string(), 10.0)]
        );
    }

    #[test]
    fn test_sqlite_store_round_trip() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.save_quantities(&entries()).unwrap();
        assert_eq!(
            store.load_quantities().unwrap(),
            vec![("beef".to_string(), 0.5), ("car-petrol".to_string(), 10.0)]
        );

        store.save_quantities(&[]).unwrap();
        assert!(store.load_quantities().unwrap().is_empty());
    }

    #[test]
    fn test_sqlite_store_persists_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("footprint.db");

        let mut store = SqliteStore::open(&path).unwrap();
        store.save_quantities(&entries()).unwrap();
        drop(store);

        let reopened = SqliteStore::open(&path).unwrap();
        assert_eq!(reopened.load_quantities().unwrap().len(), 2);
    }
}
