use async_trait::async_trait;
use folio_core::{AppResult, PrincipalId, ProjectId};
use folio_domain::Principal;

/// Directory port for users and groups.
#[async_trait]
pub trait PrincipalRepository: Send + Sync {
    /// Finds a user or group by identifier.
    async fn resolve_principal(&self, principal_id: PrincipalId) -> AppResult<Option<Principal>>;
}

/// Port for project context lookups.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Returns the project the current request works in.
    async fn current_project(&self) -> AppResult<ProjectId>;

    /// Returns whether the project is the published project.
    async fn is_published_project(&self, project_id: ProjectId) -> AppResult<bool>;
}
