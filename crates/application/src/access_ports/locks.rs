use async_trait::async_trait;
use folio_core::AppResult;
use folio_domain::{LockRecord, ResourcePath};

/// Port for the per-resource lock table.
///
/// Only `Exclusive` and `SharedExclusive` records are ever written.
#[async_trait]
pub trait LockRepository: Send + Sync {
    /// Reads the record stored on the resource itself.
    async fn read_lock_record(&self, resource: &ResourcePath) -> AppResult<Option<LockRecord>>;

    /// Writes the record for its resource, replacing any previous one.
    async fn write_lock_record(&self, record: LockRecord) -> AppResult<()>;

    /// Removes the record stored on the resource.
    async fn clear_lock_record(&self, resource: &ResourcePath) -> AppResult<()>;

    /// Lists records on the folder and every resource below it.
    async fn list_lock_records_under(&self, folder: &ResourcePath) -> AppResult<Vec<LockRecord>>;
}
