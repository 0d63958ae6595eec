use crate::domain::ports::KeyValueStore;
use crate::error::{JournalError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, Options};
use std::path::Path;
use std::sync::Arc;

/// Column Family holding every journal key.
pub const CF_JOURNAL: &str = "journal";

/// A persistent key-value store backed by RocksDB.
///
/// All journal keys live in a single column family. Clones share the
/// underlying `Arc<DB>`.
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the "journal" column family exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_journal = ColumnFamilyDescriptor::new(CF_JOURNAL, Options::default());
        let db = DB::open_cf_descriptors(&opts, path, vec![cf_journal])?;

        Ok(Self { db: Arc::new(db) })
    }

    fn journal_cf(&self) -> Result<&ColumnFamily> {
        self.db.cf_handle(CF_JOURNAL).ok_or_else(|| {
            JournalError::InternalError(Box::new(std::io::Error::other(
                "Journal column family not found",
            )))
        })
    }
}

#[async_trait]
impl KeyValueStore for RocksDBStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let cf = self.journal_cf()?;
        Ok(self.db.get_cf(cf, key.as_bytes())?)
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<()> {
        let cf = self.journal_cf()?;
        self.db.put_cf(cf, key.as_bytes(), value)?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let cf = self.journal_cf()?;
        self.db.delete_cf(cf, key.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_rocksdb_open_cf() {
        let dir = tempdir().unwrap();
        let store = RocksDBStore::open(dir.path()).expect("Failed to open RocksDB");
        assert!(store.db.cf_handle(CF_JOURNAL).is_some());
    }

    #[tokio::test]
    async fn test_rocksdb_store() {
        let dir = tempdir().unwrap();
        let store = RocksDBStore::open(dir.path()).unwrap();

        store.put("sa_students", b"[]".to_vec()).await.unwrap();
        assert_eq!(store.get("sa_students").await.unwrap(), Some(b"[]".to_vec()));

        store.remove("sa_students").await.unwrap();
        assert!(store.get("sa_students").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_rocksdb_survives_reopen() {
        let dir = tempdir().unwrap();
        {
            let store = RocksDBStore::open(dir.path()).unwrap();
            store.put("sa_pass", b"\"secret\"".to_vec()).await.unwrap();
        }
        let store = RocksDBStore::open(dir.path()).unwrap();
        assert_eq!(store.get("sa_pass").await.unwrap(), Some(b"\"secret\"".to_vec()));
    }
}
