use std::path::Path;
use std::time::Duration;
use async_trait::async_trait;
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use r2d2_sqlite::rusqlite::{params, OpenFlags, OptionalExtension};

use crate::engine::errors::StorageError;
use crate::engine::storage::area::KeyValueStore;

type SqlitePool = Pool<SqliteConnectionManager>;

/// SQLite-based persistent storage.
///
/// All records live in a single `records` table. Queries are blocking, so
/// every call is moved onto tokio's blocking pool.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens (or creates) the database at `path` and ensures the schema exists.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let manager = SqliteConnectionManager::file(path.as_ref())
            .with_flags(
                OpenFlags::SQLITE_OPEN_READ_WRITE |
                    OpenFlags::SQLITE_OPEN_CREATE |
                    OpenFlags::SQLITE_OPEN_URI
            )
            .with_init(|c| {
                c.busy_timeout(Duration::from_millis(500))?;
                c.pragma_update(None, "journal_mode", "WAL")?;
                c.execute_batch(
                    "CREATE TABLE IF NOT EXISTS records (
                        key TEXT NOT NULL PRIMARY KEY,
                        value TEXT NOT NULL,
                        updated_at INTEGER NOT NULL DEFAULT (strftime('%s','now'))
                    );"
                )?;
                Ok(())
            });

        let pool = Pool::builder()
            .max_size(8)
            .connection_timeout(Duration::from_secs(5))
            .build(manager)?;

        Ok(Self { pool })
    }

    /// Runs `f` with a pooled connection on the blocking thread pool.
    async fn with_conn<T, F>(&self, f: F) -> Result<T, StorageError>
    where
        T: Send + 'static,
        F: FnOnce(PooledConnection<SqliteConnectionManager>) -> Result<T, StorageError> + Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || f(pool.get()?)).await?
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let key = key.to_string();
        self.with_conn(move |conn| {
            Ok(conn
                .query_row("SELECT value FROM records WHERE key=?1", params![key], |row| row.get::<_, String>(0))
                .optional()?)
        })
        .await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let (key, value) = (key.to_string(), value.to_string());
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO records(key,value) VALUES (?1,?2)
                 ON CONFLICT(key) DO UPDATE
                 SET value=excluded.value, updated_at=strftime('%s','now')",
                params![key, value],
            )?;
            Ok(())
        })
        .await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let key = key.to_string();
        self.with_conn(move |conn| {
            conn.execute("DELETE FROM records WHERE key=?1", params![key])?;
            Ok(())
        })
        .await
    }

    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let prefix = prefix.to_string();
        self.with_conn(move |conn| {
            // substr() instead of LIKE: keys may contain `_` and `%`.
            let mut stmt = conn.prepare(
                "SELECT key FROM records WHERE substr(key, 1, length(?1)) = ?1 ORDER BY key",
            )?;
            let rows = stmt.query_map(params![prefix], |row| row.get::<_, String>(0))?;
            let mut keys = Vec::new();
            for row in rows {
                keys.push(row?);
            }
            Ok(keys)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("containers.db");

        {
            let store = SqliteStore::new(&path).unwrap();
            store.set("domainOwnerMap/example.com", "\"work\"").await.unwrap();
            store.set("cookies_work_example.com", "[]").await.unwrap();
            store.set("a", "1").await.unwrap();
            store.set("a", "2").await.unwrap();
        }

        let store = SqliteStore::new(&path).unwrap();
        assert_eq!(
            store.get("domainOwnerMap/example.com").await.unwrap().as_deref(),
            Some("\"work\"")
        );
        assert_eq!(store.get("a").await.unwrap().as_deref(), Some("2"));

        store.remove("a").await.unwrap();
        assert!(store.get("a").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn prefix_scan_treats_underscore_literally() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::new(dir.path().join("db.sqlite")).unwrap();

        store.set("cookies_work_a.com", "[]").await.unwrap();
        store.set("cookiesXwork_b.com", "[]").await.unwrap();
        store.set("cookies_work_c.com", "[]").await.unwrap();

        let keys = store.keys_with_prefix("cookies_work_").await.unwrap();
        assert_eq!(keys, vec!["cookies_work_a.com", "cookies_work_c.com"]);
    }
}
