use async_trait::async_trait;
use folio_application::AccessControlRepository;
use folio_core::{AppResult, PrincipalId};
use folio_domain::{AccessControlEntry, ResourcePath};

use super::InMemoryContentRepository;

#[async_trait]
impl AccessControlRepository for InMemoryContentRepository {
    async fn read_own_entries(
        &self,
        resource: &ResourcePath,
    ) -> AppResult<Vec<AccessControlEntry>> {
        Ok(self
            .entries
            .read()
            .await
            .iter()
            .filter_map(|((stored_resource, _), entry)| {
                (stored_resource == resource).then(|| entry.clone())
            })
            .collect())
    }

    async fn persist_entry(&self, entry: AccessControlEntry) -> AppResult<()> {
        self.entries
            .write()
            .await
            .insert((entry.resource().clone(), entry.principal_id()), entry);
        Ok(())
    }

    async fn delete_entry(
        &self,
        resource: &ResourcePath,
        principal_id: PrincipalId,
    ) -> AppResult<()> {
        self.entries
            .write()
            .await
            .remove(&(resource.clone(), principal_id));
        Ok(())
    }
}
