use std::collections::{BTreeMap, HashMap};

use folio_core::{AppError, AppResult, PrincipalId, ProjectId};
use folio_domain::{AccessControlEntry, LockRecord, Principal, Project, ResourcePath};
use tokio::sync::RwLock;
use uuid::Uuid;

mod directory;
mod entries;
mod locks;
mod tree;


/// In-memory workplace store backing every content port.
///
/// Resources sharing a content id are siblings. The root folder always
/// exists.
#[derive(Debug)]
pub struct InMemoryContentRepository {
    resources: RwLock<BTreeMap<ResourcePath, Uuid>>,
    principals: RwLock<HashMap<PrincipalId, Principal>>,
    projects: RwLock<HashMap<ProjectId, Project>>,
    current_project: RwLock<Option<ProjectId>>,
    entries: RwLock<BTreeMap<(ResourcePath, PrincipalId), AccessControlEntry>>,
    locks: RwLock<BTreeMap<ResourcePath, LockRecord>>,
}

impl InMemoryContentRepository {
    /// Creates a store holding only the root folder.
    #[must_use]
    pub fn new() -> Self {
        let mut resources = BTreeMap::new();
        resources.insert(ResourcePath::root(), Uuid::new_v4());

        Self {
            resources: RwLock::new(resources),
            principals: RwLock::new(HashMap::new()),
            projects: RwLock::new(HashMap::new()),
            current_project: RwLock::new(None),
            entries: RwLock::new(BTreeMap::new()),
            locks: RwLock::new(BTreeMap::new()),
        }
    }

    /// Adds a resource below an existing folder.
    ///
    /// Passing the content id of another resource makes the two siblings;
    /// `None` gives the resource content of its own.
    pub async fn insert_resource(
        &self,
        resource: ResourcePath,
        content_id: Option<Uuid>,
    ) -> AppResult<Uuid> {
        let mut resources = self.resources.write().await;

        if resources.contains_key(&resource) {
            return Err(AppError::Conflict(format!(
                "resource '{resource}' already exists"
            )));
        }
        if let Some(parent) = resource.parent()
            && !resources.contains_key(&parent)
        {
            return Err(AppError::NotFound(format!(
                "parent folder '{parent}' of '{resource}' does not exist"
            )));
        }

        let content_id = content_id.unwrap_or_else(Uuid::new_v4);
        resources.insert(resource, content_id);
        Ok(content_id)
    }

    /// Adds a user or group to the directory.
    pub async fn insert_principal(&self, principal: Principal) -> AppResult<()> {
        let mut principals = self.principals.write().await;

        if principals.contains_key(&principal.id()) {
            return Err(AppError::Conflict(format!(
                "principal '{}' already exists",
                principal.id()
            )));
        }

        principals.insert(principal.id(), principal);
        Ok(())
    }

    /// Removes a user or group from the directory, keeping its entries.
    pub async fn remove_principal(&self, principal_id: PrincipalId) -> Option<Principal> {
        self.principals.write().await.remove(&principal_id)
    }

    /// Adds a project.
    pub async fn insert_project(&self, project: Project) -> AppResult<()> {
        let mut projects = self.projects.write().await;

        if projects.contains_key(&project.id()) {
            return Err(AppError::Conflict(format!(
                "project '{}' already exists",
                project.id()
            )));
        }

        projects.insert(project.id(), project);
        Ok(())
    }

    /// Selects the project requests work in.
    pub async fn set_current_project(&self, project_id: ProjectId) -> AppResult<()> {
        if !self.projects.read().await.contains_key(&project_id) {
            return Err(AppError::NotFound(format!(
                "project '{project_id}' does not exist"
            )));
        }

        *self.current_project.write().await = Some(project_id);
        Ok(())
    }
}

impl Default for InMemoryContentRepository {
    fn default() -> Self {
        Self::new()
    }
}
