use rusqlite::{Connection, OptionalExtension};

use crate::error::StorageError;
use crate::store::KeyValueStore;

fn checksum(value: &str) -> [u8; 32] {
    *blake3::hash(value.as_bytes()).as_bytes()
}

/// Key-value store in a single SQLite table. Every value carries a blake3
/// checksum that is verified on read.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &str) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        crate::schema::init_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        crate::schema::init_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let row: Option<(String, Vec<u8>)> = self
            .conn
            .query_row(
                "SELECT value, checksum FROM kv WHERE key = ?1",
                rusqlite::params![key],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let Some((value, stored)) = row else {
            return Ok(None);
        };
        let stored: [u8; 32] = stored
            .try_into()
            .map_err(|_| StorageError::InvalidChecksum { key: key.to_string() })?;
        if stored != checksum(&value) {
            tracing::warn!(target: "gazetteer.storage", key, "checksum mismatch");
            return Err(StorageError::ChecksumMismatch { key: key.to_string() });
        }
        Ok(Some(value))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO kv (key, value, checksum) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                checksum = excluded.checksum,
                updated_at = CAST(unixepoch('now','subsec') * 1000 AS INTEGER)",
            rusqlite::params![key, value, &checksum(value)[..]],
        )?;
        tracing::trace!(target: "gazetteer.storage", key, bytes = value.len(), "kv write");
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", rusqlite::params![key])?;
        Ok(())
    }
}
