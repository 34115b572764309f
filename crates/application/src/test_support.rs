use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::Mutex;

use folio_core::{AppError, AppResult, PrincipalId, ProjectId};
use folio_domain::{AccessControlEntry, LockRecord, Principal, PrincipalKind, ResourcePath};

use crate::{
    AccessControlRepository, AuditEvent, AuditRepository, LockRepository, PrincipalRepository,
    ProjectRepository, ResourceRepository,
};

pub(crate) fn path(value: &str) -> ResourcePath {
    ResourcePath::new(value).unwrap_or_else(|error| panic!("{value}: {error}"))
}

/// One fake backing every content port, so services built from it share state.
pub(crate) struct FakeContentStore {
    pub offline_project: ProjectId,
    pub online_project: ProjectId,
    resources: BTreeMap<ResourcePath, usize>,
    principals: Mutex<HashMap<PrincipalId, Principal>>,
    entries: Mutex<Vec<AccessControlEntry>>,
    locks: Mutex<BTreeMap<ResourcePath, LockRecord>>,
    failing_resource: Mutex<Option<ResourcePath>>,
}

impl FakeContentStore {
    pub(crate) fn with_resources(paths: &[&str]) -> Self {
        let mut resources = BTreeMap::new();
        resources.insert(ResourcePath::root(), 0);
        for (index, value) in paths.iter().enumerate() {
            resources.insert(path(value), index + 1);
        }

        Self {
            offline_project: ProjectId::new(),
            online_project: ProjectId::new(),
            resources,
            principals: Mutex::new(HashMap::new()),
            entries: Mutex::new(Vec::new()),
            locks: Mutex::new(BTreeMap::new()),
            failing_resource: Mutex::new(None),
        }
    }

    /// Makes every listed path share content with the first one.
    pub(crate) fn with_siblings(mut self, paths: &[&str]) -> Self {
        let content_id = self.resources.values().max().copied().unwrap_or_default() + 1;
        for value in paths {
            self.resources.insert(path(value), content_id);
        }
        self
    }

    pub(crate) fn with_principal(mut self, kind: PrincipalKind, name: &str) -> (Self, PrincipalId) {
        let id = PrincipalId::new();
        let principal = Principal::new(id, kind, name)
            .unwrap_or_else(|error| panic!("principal {name}: {error}"));
        self.principals.get_mut().insert(id, principal);
        (self, id)
    }

    pub(crate) async fn forget_principal(&self, principal_id: PrincipalId) {
        self.principals.lock().await.remove(&principal_id);
    }

    /// Makes every entry or lock write touching `resource` fail from now on.
    pub(crate) async fn fail_writes_on(&self, resource: &str) {
        *self.failing_resource.lock().await = Some(path(resource));
    }

    async fn check_write(&self, resource: &ResourcePath) -> AppResult<()> {
        if self.failing_resource.lock().await.as_ref() == Some(resource) {
            return Err(AppError::Store(format!("write to '{resource}' rejected")));
        }
        Ok(())
    }

    pub(crate) async fn stored_entries(&self) -> Vec<AccessControlEntry> {
        self.entries.lock().await.clone()
    }

    pub(crate) async fn stored_lock(&self, resource: &str) -> Option<LockRecord> {
        self.locks.lock().await.get(&path(resource)).cloned()
    }
}

#[async_trait]
impl ResourceRepository for FakeContentStore {
    async fn resource_exists(&self, resource: &ResourcePath) -> AppResult<bool> {
        Ok(self.resources.contains_key(resource))
    }

    async fn read_ancestor_chain(&self, resource: &ResourcePath) -> AppResult<Vec<ResourcePath>> {
        Ok(resource
            .ancestors()
            .into_iter()
            .filter(|folder| self.resources.contains_key(folder))
            .collect())
    }

    async fn read_siblings(&self, resource: &ResourcePath) -> AppResult<Vec<ResourcePath>> {
        let Some(content_id) = self.resources.get(resource) else {
            return Ok(Vec::new());
        };

        Ok(self
            .resources
            .iter()
            .filter(|(other, other_id)| *other != resource && *other_id == content_id)
            .map(|(other, _)| other.clone())
            .collect())
    }
}

#[async_trait]
impl AccessControlRepository for FakeContentStore {
    async fn read_own_entries(
        &self,
        resource: &ResourcePath,
    ) -> AppResult<Vec<AccessControlEntry>> {
        Ok(self
            .entries
            .lock()
            .await
            .iter()
            .filter(|entry| entry.resource() == resource)
            .cloned()
            .collect())
    }

    async fn persist_entry(&self, entry: AccessControlEntry) -> AppResult<()> {
        self.check_write(entry.resource()).await?;
        let mut entries = self.entries.lock().await;
        entries.retain(|stored| {
            !(stored.resource() == entry.resource() && stored.principal_id() == entry.principal_id())
        });
        entries.push(entry);
        Ok(())
    }

    async fn delete_entry(
        &self,
        resource: &ResourcePath,
        principal_id: PrincipalId,
    ) -> AppResult<()> {
        self.check_write(resource).await?;
        self.entries.lock().await.retain(|stored| {
            !(stored.resource() == resource && stored.principal_id() == principal_id)
        });
        Ok(())
    }
}

#[async_trait]
impl PrincipalRepository for FakeContentStore {
    async fn resolve_principal(&self, principal_id: PrincipalId) -> AppResult<Option<Principal>> {
        Ok(self.principals.lock().await.get(&principal_id).cloned())
    }
}

#[async_trait]
impl ProjectRepository for FakeContentStore {
    async fn current_project(&self) -> AppResult<ProjectId> {
        Ok(self.offline_project)
    }

    async fn is_published_project(&self, project_id: ProjectId) -> AppResult<bool> {
        Ok(project_id == self.online_project)
    }
}

#[async_trait]
impl LockRepository for FakeContentStore {
    async fn read_lock_record(&self, resource: &ResourcePath) -> AppResult<Option<LockRecord>> {
        Ok(self.locks.lock().await.get(resource).cloned())
    }

    async fn write_lock_record(&self, record: LockRecord) -> AppResult<()> {
        self.check_write(record.resource()).await?;
        self.locks
            .lock()
            .await
            .insert(record.resource().clone(), record);
        Ok(())
    }

    async fn clear_lock_record(&self, resource: &ResourcePath) -> AppResult<()> {
        self.check_write(resource).await?;
        self.locks.lock().await.remove(resource);
        Ok(())
    }

    async fn list_lock_records_under(&self, folder: &ResourcePath) -> AppResult<Vec<LockRecord>> {
        Ok(self
            .locks
            .lock()
            .await
            .values()
            .filter(|record| {
                record.resource() == folder || record.resource().is_descendant_of(folder)
            })
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub(crate) struct FakeAuditRepository {
    pub events: Mutex<Vec<AuditEvent>>,
    rejects_events: bool,
}

impl FakeAuditRepository {
    /// Audit log whose appends always fail.
    pub(crate) fn rejecting() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            rejects_events: true,
        }
    }
}

#[async_trait]
impl AuditRepository for FakeAuditRepository {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        if self.rejects_events {
            return Err(AppError::Store("audit log unavailable".to_owned()));
        }
        self.events.lock().await.push(event);
        Ok(())
    }
}
