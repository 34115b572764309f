use folio_core::{AppError, PrincipalId, ProjectId};
use folio_domain::{LockKind, PrincipalKind, ResourcePath};
use thiserror::Error;

/// Failure of an access control entry operation.
#[derive(Debug, Error)]
pub enum AccessControlError {
    /// The referenced user or group does not exist.
    #[error("cannot {operation} on '{resource}': principal '{principal_id}' does not exist")]
    PrincipalNotFound {
        /// Resource the operation targeted.
        resource: ResourcePath,
        /// Unresolvable principal identifier.
        principal_id: PrincipalId,
        /// Attempted operation.
        operation: &'static str,
    },

    /// The supplied principal kind does not match the directory or stored entry.
    #[error(
        "cannot {operation} on '{resource}': principal '{principal}' is a {actual}, not a {expected}"
    )]
    PrincipalKindMismatch {
        /// Resource the operation targeted.
        resource: ResourcePath,
        /// Principal display name.
        principal: String,
        /// Kind supplied by the caller.
        expected: PrincipalKind,
        /// Kind known to the directory or store.
        actual: PrincipalKind,
        /// Attempted operation.
        operation: &'static str,
    },

    /// An own entry already exists for the principal.
    #[error("cannot add entry on '{resource}': principal '{principal}' already has an entry")]
    DuplicateEntry {
        /// Resource the operation targeted.
        resource: ResourcePath,
        /// Principal display name.
        principal: String,
    },

    /// No own entry exists for the principal.
    #[error("cannot {operation} on '{resource}': principal '{principal}' has no entry")]
    EntryNotFound {
        /// Resource the operation targeted.
        resource: ResourcePath,
        /// Principal display name.
        principal: String,
        /// Attempted operation.
        operation: &'static str,
    },

    /// The resource does not exist in the store.
    #[error("cannot {operation}: resource '{resource}' does not exist")]
    ResourceNotFound {
        /// Unknown resource.
        resource: ResourcePath,
        /// Attempted operation.
        operation: &'static str,
    },

    /// The backing store failed.
    #[error(transparent)]
    Store(#[from] AppError),
}

/// Failure of [`crate::AccessControlService::add_entry`].
pub type AddEntryError = AccessControlError;
/// Failure of [`crate::AccessControlService::remove_entry`].
pub type RemoveEntryError = AccessControlError;
/// Failure of [`crate::AccessControlService::modify_entry`].
pub type ModifyEntryError = AccessControlError;
/// Failure of permission resolution.
pub type ResolveError = AccessControlError;

impl From<AccessControlError> for AppError {
    fn from(error: AccessControlError) -> Self {
        match error {
            AccessControlError::Store(error) => error,
            AccessControlError::PrincipalNotFound { .. }
            | AccessControlError::EntryNotFound { .. }
            | AccessControlError::ResourceNotFound { .. } => AppError::NotFound(error.to_string()),
            AccessControlError::PrincipalKindMismatch { .. } => {
                AppError::Validation(error.to_string())
            }
            AccessControlError::DuplicateEntry { .. } => AppError::Conflict(error.to_string()),
        }
    }
}

/// Failure of a lock transition.
#[derive(Debug, Error)]
pub enum LockError {
    /// The resource is already locked.
    #[error("cannot {operation} '{resource}': already locked ({kind}) by '{owner_id}'")]
    AlreadyLocked {
        /// Resource whose lock state blocked the transition.
        resource: ResourcePath,
        /// Current lock state.
        kind: LockKind,
        /// Current lock owner.
        owner_id: PrincipalId,
        /// Attempted operation.
        operation: &'static str,
    },

    /// A resource inside the folder is locked by another user.
    #[error("cannot lock folder '{resource}': '{descendant}' is locked by '{owner_id}'")]
    LockedDescendant {
        /// Folder being locked.
        resource: ResourcePath,
        /// Locked resource inside the folder.
        descendant: ResourcePath,
        /// Owner of the descendant lock.
        owner_id: PrincipalId,
    },

    /// The resource is not locked.
    #[error("cannot {operation} '{resource}': resource is not locked")]
    NotLocked {
        /// Unlocked resource.
        resource: ResourcePath,
        /// Attempted operation.
        operation: &'static str,
    },

    /// The lock is inherited from an ancestor folder.
    #[error("cannot unlock '{resource}': lock is inherited from folder '{folder}'")]
    InheritedLock {
        /// Resource the caller tried to unlock.
        resource: ResourcePath,
        /// Folder holding the lock.
        folder: ResourcePath,
    },

    /// The actor does not own the lock.
    #[error("cannot {operation} '{resource}': lock is owned by '{owner_id}', not '{actor}'")]
    NotOwner {
        /// Locked resource.
        resource: ResourcePath,
        /// Caller.
        actor: PrincipalId,
        /// Lock owner.
        owner_id: PrincipalId,
        /// Attempted operation.
        operation: &'static str,
    },

    /// The lock belongs to another project.
    #[error(
        "cannot {operation} '{resource}': lock belongs to project '{lock_project}', not '{project}'"
    )]
    WrongProject {
        /// Locked resource.
        resource: ResourcePath,
        /// Caller's project.
        project: ProjectId,
        /// Project the lock was taken in.
        lock_project: ProjectId,
        /// Attempted operation.
        operation: &'static str,
    },

    /// Locks cannot be taken in the published project.
    #[error("cannot {operation} '{resource}': project '{project}' is the published project")]
    PublishedProject {
        /// Resource the operation targeted.
        resource: ResourcePath,
        /// Published project.
        project: ProjectId,
        /// Attempted operation.
        operation: &'static str,
    },

    /// The resource does not exist in the store.
    #[error("cannot {operation}: resource '{resource}' does not exist")]
    ResourceNotFound {
        /// Unknown resource.
        resource: ResourcePath,
        /// Attempted operation.
        operation: &'static str,
    },

    /// The backing store failed.
    #[error(transparent)]
    Store(#[from] AppError),
}

impl From<LockError> for AppError {
    fn from(error: LockError) -> Self {
        match error {
            LockError::Store(error) => error,
            LockError::ResourceNotFound { .. } => AppError::NotFound(error.to_string()),
            LockError::AlreadyLocked { .. }
            | LockError::LockedDescendant { .. }
            | LockError::NotLocked { .. }
            | LockError::InheritedLock { .. } => AppError::Conflict(error.to_string()),
            LockError::NotOwner { .. }
            | LockError::WrongProject { .. }
            | LockError::PublishedProject { .. } => AppError::Forbidden(error.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use folio_core::{AppError, PrincipalId};
    use folio_domain::{LockKind, ResourcePath};

    use super::{AccessControlError, LockError};

    #[test]
    fn lock_errors_name_resource_and_owner() {
        let owner_id = PrincipalId::new();
        let error = LockError::AlreadyLocked {
            resource: ResourcePath::root(),
            kind: LockKind::Exclusive,
            owner_id,
            operation: "lock",
        };

        let message = error.to_string();
        assert!(message.contains("'/'"));
        assert!(message.contains(owner_id.to_string().as_str()));
        assert!(matches!(AppError::from(error), AppError::Conflict(_)));
    }

    #[test]
    fn store_failures_pass_through_unchanged() {
        let error = AccessControlError::from(AppError::Store("disk full".to_owned()));
        assert!(matches!(AppError::from(error), AppError::Store(message) if message == "disk full"));
    }

    #[test]
    fn duplicate_entry_is_a_conflict() {
        let error = AccessControlError::DuplicateEntry {
            resource: ResourcePath::root(),
            principal: "editors".to_owned(),
        };
        assert!(matches!(AppError::from(error), AppError::Conflict(_)));
    }
}
