use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use rusqlite::{Connection, params};

use crate::store::KeyValueStore;

pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        let db = Database { conn };
        db.migrate()?;
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Database { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<()> {
        let version: i64 = self
            .conn
            .pragma_query_value(None, "user_version", |row| row.get(0))?;

        if version < 1 {
            self.conn.execute_batch(
                "CREATE TABLE IF NOT EXISTS kv_store (
                    key TEXT PRIMARY KEY NOT NULL,
                    value TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                );

                PRAGMA user_version = 1;",
            )?;
        }

        Ok(())
    }

    pub fn get_value(&self, key: &str) -> Result<Option<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT value FROM kv_store WHERE key = ?1")?;
        let mut rows = stmt.query(params![key])?;
        if let Some(row) = rows.next()? {
            Ok(Some(row.get(0)?))
        } else {
            Ok(None)
        }
    }

    pub fn set_value(&self, key: &str, value: &str) -> Result<()> {
        let now = Local::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, now],
        )?;
        Ok(())
    }

    pub fn delete_value(&self, key: &str) -> Result<bool> {
        let rows = self
            .conn
            .execute("DELETE FROM kv_store WHERE key = ?1", params![key])?;
        Ok(rows > 0)
    }
}

impl KeyValueStore for Database {
    fn load(&self, key: &str) -> Result<Option<String>> {
        self.get_value(key)
    }

    fn save(&mut self, key: &str, value: &str) -> Result<()> {
        self.set_value(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<bool> {
        self.delete_value(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get_value() {
        let db = Database::open_in_memory().unwrap();
        db.set_value("test_key", "test_value").unwrap();
        let val = db.get_value("test_key").unwrap();
        assert_eq!(val.as_deref(), Some("test_value"));
    }

    #[test]
    fn test_get_missing_value() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.get_value("nonexistent").unwrap().is_none());
    }

    #[test]
    fn test_set_value_overwrites() {
        let db = Database::open_in_memory().unwrap();
        db.set_value("key", "value1").unwrap();
        db.set_value("key", "value2").unwrap();
        assert_eq!(db.get_value("key").unwrap().as_deref(), Some("value2"));
    }

    #[test]
    fn test_delete_value() {
        let db = Database::open_in_memory().unwrap();
        db.set_value("key", "value").unwrap();
        assert!(db.delete_value("key").unwrap());
        assert!(db.get_value("key").unwrap().is_none());
        assert!(!db.delete_value("key").unwrap());
    }

    #[test]
    fn test_migrate_is_idempotent() {
        let db = Database::open_in_memory().unwrap();
        db.set_value("key", "value").unwrap();
        db.migrate().unwrap();
        assert_eq!(db.get_value("key").unwrap().as_deref(), Some("value"));
    }

    #[test]
    fn test_reopen_file_keeps_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("larder.db");
        {
            let mut db = Database::open(&path).unwrap();
            db.save("ingredients", "[]").unwrap();
        }
        let db = Database::open(&path).unwrap();
        assert_eq!(db.load("ingredients").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_store_remove_deletes_row() {
        let mut db = Database::open_in_memory().unwrap();
        db.save("ingredients", "[]").unwrap();
        assert!(db.remove("ingredients").unwrap());
        assert!(db.load("ingredients").unwrap().is_none());
        assert!(!db.remove("ingredients").unwrap());
    }
}
