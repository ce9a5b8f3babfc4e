use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tokio::sync::Mutex;

use super::backend::TodoStore;
use super::types::{StoreError, Todo};

/// Whole-document JSON persistence: one array of todos at a fixed path.
///
/// Every mutation is a read-modify-write of the full document. Writes within
/// this process are serialized; concurrent processes race at document
/// granularity and the last writer wins.
pub struct FileStore {
    path: PathBuf,
    write_guard: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_guard: Mutex::new(()),
        }
    }
}

#[async_trait]
impl TodoStore for FileStore {
    async fn read_all(&self) -> Result<Vec<Todo>, StoreError> {
        match std::fs::read(&self.path) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_all(&self, todos: Vec<Todo>) -> Result<(), StoreError> {
        let _guard = self.write_guard.lock().await;

        let dir = self
            .path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        // Write the new document beside the old one, then swap atomically.
        let mut tmp = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut tmp, &todos)?;
        tmp.flush()?;
        tmp.persist(&self.path)
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        Ok(())
    }
}
