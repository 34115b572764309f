use folio_core::{PrincipalId, ProjectId};
use folio_domain::{AuditAction, LockOwner, LockRecord, ResourcePath};

use crate::errors::LockError;

use super::*;

impl LockService {
    /// Locks a resource exclusively for `actor` in `project`.
    ///
    /// Siblings of the resource receive `SharedExclusive` records. Locking a
    /// folder absorbs locks below it held by the same owner in the same
    /// project and fails on any other descendant lock.
    pub async fn lock(
        &self,
        resource: &ResourcePath,
        actor: PrincipalId,
        project: ProjectId,
    ) -> Result<(), LockError> {
        const OPERATION: &str = "lock";

        self.require_resource(resource, OPERATION).await?;
        self.require_offline_project(resource, project, OPERATION)
            .await?;
        let owner = LockOwner::new(actor, project);

        let _guard = self.write_gate.lock().await;

        let current = self.read_effective_lock(resource).await?;
        let locked = current
            .lock(owner)
            .map_err(|error| Self::transition_error(resource, error, OPERATION))?;

        let siblings = self.resources.read_siblings(resource).await?;
        for sibling in &siblings {
            let sibling_lock = self.read_effective_lock(sibling).await?;
            if let Some(holder) = sibling_lock.owner().filter(|holder| *holder != owner) {
                return Err(LockError::AlreadyLocked {
                    resource: sibling.clone(),
                    kind: sibling_lock.kind(),
                    owner_id: holder.owner_id,
                    operation: OPERATION,
                });
            }
        }

        let mut absorbed = Vec::new();
        if resource.is_folder() {
            for record in self.locks.list_lock_records_under(resource).await? {
                if record.resource() == resource {
                    continue;
                }
                match record.owner() {
                    Some(holder) if holder != owner => {
                        return Err(LockError::LockedDescendant {
                            resource: resource.clone(),
                            descendant: record.resource().clone(),
                            owner_id: holder.owner_id,
                        });
                    }
                    _ => absorbed.push(record.resource().clone()),
                }
            }
        }

        let mut changes: Vec<LockChange> = absorbed
            .iter()
            .cloned()
            .map(LockChange::Clear)
            .collect();
        changes.push(LockChange::Write(locked));
        for sibling in siblings {
            if self.locks.read_lock_record(&sibling).await?.is_none() {
                changes.push(LockChange::Write(LockRecord::shared_exclusive(sibling, owner)));
            }
        }
        self.apply_changes(changes).await?;

        self.record_lock_event(
            actor,
            AuditAction::ResourceLocked,
            resource,
            Some(owner),
            format!(
                "locked '{resource}' in project '{project}' (absorbed {} descendant locks)",
                absorbed.len()
            ),
        )
        .await;

        Ok(())
    }

    /// Reassigns an existing lock to `actor` in `project`, whoever held it.
    ///
    /// Siblings held by the previous owner, or not locked at all, move to the
    /// new owner as `SharedExclusive`. Taking over an inherited lock writes an
    /// own `Exclusive` record and leaves the folder lock in place.
    pub async fn change_lock(
        &self,
        resource: &ResourcePath,
        actor: PrincipalId,
        project: ProjectId,
    ) -> Result<(), LockError> {
        const OPERATION: &str = "change lock on";

        self.require_resource(resource, OPERATION).await?;
        self.require_offline_project(resource, project, OPERATION)
            .await?;
        let owner = LockOwner::new(actor, project);

        let _guard = self.write_gate.lock().await;

        let current = self.read_effective_lock(resource).await?;
        let changed = current
            .change_lock(owner)
            .map_err(|error| Self::transition_error(resource, error, OPERATION))?;
        let previous = current.owner();

        let mut changes = vec![LockChange::Write(changed)];
        if let Some(previous) = previous {
            for sibling in self.resources.read_siblings(resource).await? {
                let follows_previous = match self.locks.read_lock_record(&sibling).await? {
                    Some(record) => record.is_held_by(previous),
                    None => self
                        .read_effective_lock(&sibling)
                        .await?
                        .owner()
                        .is_none_or(|holder| holder == previous),
                };
                if follows_previous {
                    changes.push(LockChange::Write(LockRecord::shared_exclusive(sibling, owner)));
                }
            }
        }
        self.apply_changes(changes).await?;

        self.record_lock_event(
            actor,
            AuditAction::ResourceLockChanged,
            resource,
            Some(owner),
            format!(
                "changed {} lock on '{resource}' from '{}' to '{actor}'",
                current.kind(),
                previous
                    .map(|previous| previous.owner_id.to_string())
                    .unwrap_or_default()
            ),
        )
        .await;

        Ok(())
    }

    /// Releases the lock on a resource and its sibling group.
    ///
    /// Without `force` the actor must own the lock in the same project.
    pub async fn unlock(
        &self,
        resource: &ResourcePath,
        actor: PrincipalId,
        project: ProjectId,
        force: bool,
    ) -> Result<(), LockError> {
        const OPERATION: &str = "unlock";

        self.require_resource(resource, OPERATION).await?;

        let _guard = self.write_gate.lock().await;

        let current = self.read_effective_lock(resource).await?;
        current
            .unlock()
            .map_err(|error| Self::transition_error(resource, error, OPERATION))?;
        let Some(holder) = current.owner() else {
            return Err(LockError::NotLocked {
                resource: resource.clone(),
                operation: OPERATION,
            });
        };

        if !force {
            if holder.owner_id != actor {
                return Err(LockError::NotOwner {
                    resource: resource.clone(),
                    actor,
                    owner_id: holder.owner_id,
                    operation: OPERATION,
                });
            }
            if holder.project_id != project {
                return Err(LockError::WrongProject {
                    resource: resource.clone(),
                    project,
                    lock_project: holder.project_id,
                    operation: OPERATION,
                });
            }
        }

        let mut changes = vec![LockChange::Clear(resource.clone())];
        for sibling in self.resources.read_siblings(resource).await? {
            let held_by_holder = self
                .locks
                .read_lock_record(&sibling)
                .await?
                .is_some_and(|record| record.is_held_by(holder));
            if held_by_holder {
                changes.push(LockChange::Clear(sibling));
            }
        }
        self.apply_changes(changes).await?;

        self.record_lock_event(
            actor,
            AuditAction::ResourceUnlocked,
            resource,
            Some(holder),
            format!(
                "released {} lock on '{resource}' held by '{}' (force={force})",
                current.kind(),
                holder.owner_id
            ),
        )
        .await;

        Ok(())
    }
}
