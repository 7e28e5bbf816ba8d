use async_trait::async_trait;
use media_acquire_models::AcquiredMediaRecord;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use crate::traits::{AppendStatus, HistoryStore};
use crate::SourceError;

/// Acquisition history kept as a JSON array on disk, oldest first
pub struct JsonHistoryStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process
    lock: Mutex<()>,
}

impl JsonHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<Vec<AcquiredMediaRecord>, SourceError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) if content.trim().is_empty() => Ok(Vec::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_all(&self, records: &[AcquiredMediaRecord]) -> Result<(), SourceError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(records)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, content).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl HistoryStore for JsonHistoryStore {
    async fn append(&self, record: &AcquiredMediaRecord) -> Result<AppendStatus, SourceError> {
        let _guard = self.lock.lock().await;
        let mut records = self.read_all().await?;
        if records.iter().any(|existing| existing.same_item(record)) {
            return Ok(AppendStatus::Duplicate);
        }
        records.push(record.clone());
        self.write_all(&records).await?;
        Ok(AppendStatus::Inserted)
    }

    async fn recent(&self, limit: usize) -> Result<Vec<AcquiredMediaRecord>, SourceError> {
        let _guard = self.lock.lock().await;
        let mut records = self.read_all().await?;
        records.reverse();
        records.truncate(limit);
        Ok(records)
    }
}
