use std::sync::Arc;

use folio_core::{PrincipalId, ProjectId};
use folio_domain::{EditDecision, EditabilitySettings, LockRecord, ResourcePath};
use tracing::{debug, warn};

use crate::{LockService, ProjectRepository};

/// Application service deciding whether an actor may edit a resource now.
///
/// Holds no state beyond its settings; every call re-reads the lock table
/// and project context.
#[derive(Clone)]
pub struct EditabilityService {
    lock_service: LockService,
    projects: Arc<dyn ProjectRepository>,
    settings: EditabilitySettings,
}

impl EditabilityService {
    /// Creates a new service from its collaborators.
    #[must_use]
    pub fn new(
        lock_service: LockService,
        projects: Arc<dyn ProjectRepository>,
        settings: EditabilitySettings,
    ) -> Self {
        Self {
            lock_service,
            projects,
            settings,
        }
    }

    /// Returns the active settings.
    #[must_use]
    pub fn settings(&self) -> EditabilitySettings {
        self.settings
    }

    /// Returns whether `actor` may edit the resource in `project`.
    ///
    /// When this returns `true` for an unlocked resource, the caller is
    /// expected to lock it before writing.
    pub async fn is_editable(
        &self,
        resource: &ResourcePath,
        actor: PrincipalId,
        project: ProjectId,
    ) -> bool {
        self.editability(resource, actor, project)
            .await
            .is_editable()
    }

    /// Returns the edit decision together with the rule that produced it.
    ///
    /// Store failures never surface here: an unreadable project counts as
    /// published and an unreadable lock counts as `Null`.
    pub async fn editability(
        &self,
        resource: &ResourcePath,
        actor: PrincipalId,
        project: ProjectId,
    ) -> EditDecision {
        let project_is_published = match self.projects.is_published_project(project).await {
            Ok(published) => published,
            Err(error) => {
                warn!(project = %project, %error, "project lookup failed, treating as published");
                true
            }
        };

        let lock = if project_is_published {
            LockRecord::null(resource.clone())
        } else {
            match self.lock_service.read_effective_lock(resource).await {
                Ok(lock) => lock,
                Err(error) => {
                    warn!(resource = %resource, %error, "lock read failed, treating as unlocked");
                    LockRecord::null(resource.clone())
                }
            }
        };

        let decision =
            EditDecision::evaluate(self.settings, project_is_published, &lock, actor, project);
        debug!(
            resource = %resource,
            actor = %actor,
            project = %project,
            lock = lock.kind().as_str(),
            ?decision,
            "edit decision"
        );

        decision
    }
}
