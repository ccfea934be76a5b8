use std::path::Path;

use redb::{
    Database,
    ReadableDatabase,
    ReadableTable,
    ReadableTableMetadata,
    TableDefinition,
};

use crate::{destination::CatalogRow, error::Result};

/// Destination rows keyed by insertion sequence, stored as JSON.
const DESTINATIONS: TableDefinition<u64, &[u8]> =
    TableDefinition::new("destinations");
const SETTINGS: TableDefinition<&str, &str> = TableDefinition::new("settings");

/// The relational store behind the catalog.
///
/// Rows come back in the order they were imported, which is the order every
/// filtered and ranked view preserves.
pub struct CatalogDb {
    db: Database,
}

impl CatalogDb {
    pub fn open(path: &Path) -> Result<Self> {
        let db = Database::create(path).map_err(redb::Error::from)?;

        // Ensure all tables exist by opening them in a write transaction.
        let txn = db.begin_write()?;
        txn.open_table(DESTINATIONS)?;
        txn.open_table(SETTINGS)?;
        txn.commit()?;

        Ok(Self { db })
    }

    // -- Destinations --

    /// Append rows after the existing ones in a single transaction.
    pub fn insert_rows(&self, rows: &[CatalogRow]) -> Result<usize> {
        if rows.is_empty() {
            return Ok(0);
        }
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(DESTINATIONS)?;
            let mut next = match table.last()? {
                Some((k, _v)) => k.value() + 1,
                None => 0,
            };
            for row in rows {
                let bytes = serde_json::to_vec(row)?;
                table.insert(next, bytes.as_slice())?;
                next += 1;
            }
        }
        txn.commit()?;
        Ok(rows.len())
    }

    /// Drop every stored row and store `rows` in their place.
    pub fn replace_rows(&self, rows: &[CatalogRow]) -> Result<usize> {
        let txn = self.db.begin_write()?;
        txn.delete_table(DESTINATIONS)?;
        {
            let mut table = txn.open_table(DESTINATIONS)?;
            for (seq, row) in rows.iter().enumerate() {
                let bytes = serde_json::to_vec(row)?;
                table.insert(seq as u64, bytes.as_slice())?;
            }
        }
        txn.commit()?;
        Ok(rows.len())
    }

    /// Return all rows in insertion order in a single read transaction.
    pub fn list_rows(&self) -> Result<Vec<CatalogRow>> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(DESTINATIONS)?;
        let mut result = Vec::new();
        for entry in table.iter()? {
            let (_k, v) = entry?;
            result.push(serde_json::from_slice(v.value())?);
        }
        Ok(result)
    }

    pub fn count(&self) -> Result<usize> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(DESTINATIONS)?;
        Ok(table.len()? as usize)
    }

    pub fn clear(&self) -> Result<()> {
        self.replace_rows(&[]).map(|_| ())
    }

    // -- Settings --

    pub fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(SETTINGS)?;
            table.insert(key, value)?;
        }
        txn.commit()?;
        Ok(())
    }

    pub fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(SETTINGS)?;
        Ok(table.get(key)?.map(|v| v.value().to_string()))
    }

    /// Get a setting, returning the default if not set.
    pub fn get_setting_or(&self, key: &str, default: &str) -> Result<String> {
        Ok(self
            .get_setting(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    pub fn remove_setting(&self, key: &str) -> Result<bool> {
        let txn = self.db.begin_write()?;
        let removed = {
            let mut table = txn.open_table(SETTINGS)?;
            table.remove(key)?.is_some()
        };
        txn.commit()?;
        Ok(removed)
    }

    pub fn list_settings(&self) -> Result<Vec<(String, String)>> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(SETTINGS)?;
        let mut result = Vec::new();
        for entry in table.iter()? {
            let (k, v) = entry?;
            result.push((k.value().to_string(), v.value().to_string()));
        }
        Ok(result)
    }
}

impl std::fmt::Debug for CatalogDb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogDb").finish_non_exhaustive()
    }
}
