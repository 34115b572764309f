use async_trait::async_trait;
use folio_core::{AppResult, PrincipalId};
use folio_domain::{AccessControlEntry, ResourcePath};

/// Port for resource tree lookups.
#[async_trait]
pub trait ResourceRepository: Send + Sync {
    /// Returns whether the resource exists in the store.
    async fn resource_exists(&self, resource: &ResourcePath) -> AppResult<bool>;

    /// Returns the enclosing folders of a resource, nearest first.
    async fn read_ancestor_chain(&self, resource: &ResourcePath) -> AppResult<Vec<ResourcePath>>;

    /// Returns other resources sharing content with this resource.
    async fn read_siblings(&self, resource: &ResourcePath) -> AppResult<Vec<ResourcePath>>;
}

/// Port for access control entry persistence.
#[async_trait]
pub trait AccessControlRepository: Send + Sync {
    /// Lists entries stored directly on the resource.
    async fn read_own_entries(&self, resource: &ResourcePath)
    -> AppResult<Vec<AccessControlEntry>>;

    /// Inserts or replaces the entry for its (resource, principal) pair.
    async fn persist_entry(&self, entry: AccessControlEntry) -> AppResult<()>;

    /// Deletes the entry for a (resource, principal) pair.
    async fn delete_entry(&self, resource: &ResourcePath, principal_id: PrincipalId)
    -> AppResult<()>;
}
