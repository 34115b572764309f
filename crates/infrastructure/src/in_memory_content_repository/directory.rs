use async_trait::async_trait;
use folio_application::{PrincipalRepository, ProjectRepository};
use folio_core::{AppError, AppResult, PrincipalId, ProjectId};
use folio_domain::Principal;

use super::InMemoryContentRepository;

#[async_trait]
impl PrincipalRepository for InMemoryContentRepository {
    async fn resolve_principal(&self, principal_id: PrincipalId) -> AppResult<Option<Principal>> {
        Ok(self.principals.read().await.get(&principal_id).cloned())
    }
}

#[async_trait]
impl ProjectRepository for InMemoryContentRepository {
    async fn current_project(&self) -> AppResult<ProjectId> {
        self.current_project
            .read()
            .await
            .ok_or_else(|| AppError::NotFound("no current project selected".to_owned()))
    }

    async fn is_published_project(&self, project_id: ProjectId) -> AppResult<bool> {
        self.projects
            .read()
            .await
            .get(&project_id)
            .map(|project| project.is_published())
            .ok_or_else(|| AppError::NotFound(format!("project '{project_id}' does not exist")))
    }
}
