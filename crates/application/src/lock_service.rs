use std::sync::Arc;

use folio_core::{AppResult, PrincipalId, ProjectId};
use folio_domain::{AuditAction, LockOwner, LockRecord, LockTransitionError, ResourcePath};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::errors::LockError;
use crate::{AuditEvent, AuditRepository, LockRepository, ProjectRepository, ResourceRepository};

mod transitions;


/// One lock table write planned by a transition.
enum LockChange {
    Write(LockRecord),
    Clear(ResourcePath),
}

impl LockChange {
    fn resource(&self) -> &ResourcePath {
        match self {
            Self::Write(record) => record.resource(),
            Self::Clear(resource) => resource,
        }
    }
}

/// Application service owning lock state transitions.
///
/// Every transition runs under one lock-table gate: folder, descendant and
/// sibling records are read and written as one step, so the state checked
/// is the state committed.
#[derive(Clone)]
pub struct LockService {
    resources: Arc<dyn ResourceRepository>,
    locks: Arc<dyn LockRepository>,
    projects: Arc<dyn ProjectRepository>,
    audit_repository: Arc<dyn AuditRepository>,
    write_gate: Arc<Mutex<()>>,
}

impl LockService {
    /// Creates a new service from repository implementations.
    #[must_use]
    pub fn new(
        resources: Arc<dyn ResourceRepository>,
        locks: Arc<dyn LockRepository>,
        projects: Arc<dyn ProjectRepository>,
        audit_repository: Arc<dyn AuditRepository>,
    ) -> Self {
        Self {
            resources,
            locks,
            projects,
            audit_repository,
            write_gate: Arc::new(Mutex::new(())),
        }
    }

    /// Returns the lock that applies to a resource.
    ///
    /// Falls back to the nearest locked ancestor, reported as
    /// `SharedInherited`, and to `Null` when nothing is locked.
    pub async fn effective_lock(&self, resource: &ResourcePath) -> Result<LockRecord, LockError> {
        self.require_resource(resource, "read lock").await?;
        Ok(self.read_effective_lock(resource).await?)
    }

    /// Lists lock records stored on a folder and everything below it.
    pub async fn locked_resources(
        &self,
        folder: &ResourcePath,
    ) -> Result<Vec<LockRecord>, LockError> {
        self.require_resource(folder, "list locks").await?;

        let mut records = self.locks.list_lock_records_under(folder).await?;
        records.sort_by(|left, right| left.resource().cmp(right.resource()));
        Ok(records)
    }

    pub(crate) async fn read_effective_lock(
        &self,
        resource: &ResourcePath,
    ) -> AppResult<LockRecord> {
        let own = self.locks.read_lock_record(resource).await?;
        if own.as_ref().is_some_and(|record| !record.is_null()) {
            return Ok(LockRecord::effective(resource.clone(), own, None));
        }

        let mut nearest = None;
        for folder in self.resources.read_ancestor_chain(resource).await? {
            if let Some(record) = self.locks.read_lock_record(&folder).await? {
                nearest = Some(record);
                break;
            }
        }

        Ok(LockRecord::effective(resource.clone(), None, nearest))
    }

    async fn require_resource(
        &self,
        resource: &ResourcePath,
        operation: &'static str,
    ) -> Result<(), LockError> {
        if self.resources.resource_exists(resource).await? {
            return Ok(());
        }

        Err(LockError::ResourceNotFound {
            resource: resource.clone(),
            operation,
        })
    }

    async fn require_offline_project(
        &self,
        resource: &ResourcePath,
        project: ProjectId,
        operation: &'static str,
    ) -> Result<(), LockError> {
        if !self.projects.is_published_project(project).await? {
            return Ok(());
        }

        Err(LockError::PublishedProject {
            resource: resource.clone(),
            project,
            operation,
        })
    }

    fn transition_error(
        resource: &ResourcePath,
        error: LockTransitionError,
        operation: &'static str,
    ) -> LockError {
        match error {
            LockTransitionError::AlreadyLocked { kind, holder } => LockError::AlreadyLocked {
                resource: resource.clone(),
                kind,
                owner_id: holder.owner_id,
                operation,
            },
            LockTransitionError::NotLocked => LockError::NotLocked {
                resource: resource.clone(),
                operation,
            },
            LockTransitionError::InheritedLock(folder) => LockError::InheritedLock {
                resource: resource.clone(),
                folder,
            },
        }
    }

    async fn record_lock_event(
        &self,
        actor: PrincipalId,
        action: AuditAction,
        resource: &ResourcePath,
        owner: Option<LockOwner>,
        detail: String,
    ) {
        info!(
            actor = %actor,
            resource = %resource,
            owner = ?owner.map(|owner| owner.owner_id.to_string()),
            project = ?owner.map(|owner| owner.project_id.to_string()),
            action = action.as_str(),
            "lock state changed"
        );

        // Runs after the lock table commits, so failures are only logged.
        if let Err(error) = self
            .audit_repository
            .append_event(AuditEvent {
                subject: actor.to_string(),
                action,
                resource_type: "resource_lock".to_owned(),
                resource_id: resource.to_string(),
                detail: Some(detail),
            })
            .await
        {
            warn!(
                resource = %resource,
                action = action.as_str(),
                %error,
                "failed to append audit event"
            );
        }
    }

    /// Applies planned writes in order.
    ///
    /// When a write fails, every record touched so far is put back before the
    /// error is returned, so a failed transition leaves the lock table as it was.
    async fn apply_changes(&self, changes: Vec<LockChange>) -> AppResult<()> {
        let mut touched = Vec::with_capacity(changes.len());
        for change in changes {
            if let Err(error) = self.apply_change(change, &mut touched).await {
                self.restore(touched).await;
                return Err(error);
            }
        }

        Ok(())
    }

    async fn apply_change(
        &self,
        change: LockChange,
        touched: &mut Vec<(ResourcePath, Option<LockRecord>)>,
    ) -> AppResult<()> {
        let previous = self.locks.read_lock_record(change.resource()).await?;
        touched.push((change.resource().clone(), previous));

        match change {
            LockChange::Write(record) => self.locks.write_lock_record(record).await,
            LockChange::Clear(resource) => self.locks.clear_lock_record(&resource).await,
        }
    }

    async fn restore(&self, touched: Vec<(ResourcePath, Option<LockRecord>)>) {
        for (resource, previous) in touched.into_iter().rev() {
            let restored = match previous {
                Some(record) => self.locks.write_lock_record(record).await,
                None => self.locks.clear_lock_record(&resource).await,
            };
            if let Err(error) = restored {
                warn!(resource = %resource, %error, "failed to restore lock record");
            }
        }
    }
}
