use crate::domain::ports::KeyValueStore;
use crate::error::{JournalError, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;
use tokio::sync::Mutex;

/// A key-value store kept in a single JSON document on disk.
///
/// The document is an object mapping each key to its JSON-encoded value as a
/// string, the same shape browser local storage uses. Every `put` and
/// `remove` rewrites the whole file through a temporary file in the same
/// directory followed by a rename, so readers never observe a torn write.
///
/// A malformed document is renamed to `<file name>.corrupt-<timestamp>` and
/// the store starts over from an empty document.
#[derive(Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles on the file within this process.
    guard: Arc<Mutex<()>>,
}

type Document = BTreeMap<String, String>;

impl JsonFileStore {
    /// Uses `path` as the backing document. The file is created on first write.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            guard: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<Document> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Document::new()),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_slice(&bytes) {
            Ok(document) => Ok(document),
            Err(e) => {
                let aside = self.corrupt_path();
                std::fs::rename(&self.path, &aside)?;
                tracing::warn!(
                    path = %self.path.display(),
                    moved_to = %aside.display(),
                    error = %e,
                    "malformed journal file moved aside; starting from an empty journal"
                );
                Ok(Document::new())
            }
        }
    }

    /// `<file name>.corrupt-<UTC timestamp>` next to the journal file.
    fn corrupt_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(format!(".corrupt-{}", Utc::now().format("%Y%m%dT%H%M%S%.3fZ")));
        self.path.with_file_name(name)
    }

    fn write_document(&self, document: &Document) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir)?;

        let mut tmp = NamedTempFile::new_in(&dir)?;
        serde_json::to_writer_pretty(&mut tmp, document)?;
        tmp.write_all(b"\n")?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path)
            .map_err(|e| JournalError::IoError(e.error))?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let _guard = self.guard.lock().await;
        let document = self.read_document()?;
        Ok(document.get(key).map(|value| value.as_bytes().to_vec()))
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> Result<()> {
        let value = String::from_utf8(value).map_err(|e| {
            JournalError::InternalError(Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Value for '{}' is not UTF-8: {}", key, e),
            )))
        })?;

        let _guard = self.guard.lock().await;
        let mut document = self.read_document()?;
        document.insert(key.to_string(), value);
        self.write_document(&document)
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let _guard = self.guard.lock().await;
        let mut document = self.read_document()?;
        if document.remove(key).is_some() {
            self.write_document(&document)?;
        }
        Ok(())
    }
}
