use anyhow::Result;
use async_trait::async_trait;

use droplink_core::StoredFile;

/// Repository over persisted file records.
///
/// Records are write-once: there is no update or delete operation.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Persist a new record. A primary-key clash surfaces as
    /// [`droplink_core::DropError::DuplicateId`] so callers can retry with
    /// a fresh id.
    async fn insert(&self, file: &StoredFile) -> Result<()>;

    /// Look up a record by its share-link id. A miss is `Ok(None)`, never
    /// an error.
    async fn find(&self, id: &str) -> Result<Option<StoredFile>>;
}
