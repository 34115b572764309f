use async_trait::async_trait;
use folio_application::LockRepository;
use folio_core::{AppError, AppResult};
use folio_domain::{LockKind, LockRecord, ResourcePath};

use super::InMemoryContentRepository;

#[async_trait]
impl LockRepository for InMemoryContentRepository {
    async fn read_lock_record(&self, resource: &ResourcePath) -> AppResult<Option<LockRecord>> {
        Ok(self.locks.read().await.get(resource).cloned())
    }

    async fn write_lock_record(&self, record: LockRecord) -> AppResult<()> {
        if !matches!(record.kind(), LockKind::Exclusive | LockKind::SharedExclusive) {
            return Err(AppError::Validation(format!(
                "cannot store {} lock record for '{}'",
                record.kind(),
                record.resource()
            )));
        }

        self.locks
            .write()
            .await
            .insert(record.resource().clone(), record);
        Ok(())
    }

    async fn clear_lock_record(&self, resource: &ResourcePath) -> AppResult<()> {
        self.locks.write().await.remove(resource);
        Ok(())
    }

    async fn list_lock_records_under(&self, folder: &ResourcePath) -> AppResult<Vec<LockRecord>> {
        Ok(self
            .locks
            .read()
            .await
            .values()
            .filter(|record| {
                record.resource() == folder || record.resource().is_descendant_of(folder)
            })
            .cloned()
            .collect())
    }
}
