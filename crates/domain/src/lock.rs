//! Lock records and the per-resource lock state machine.
//!
//! ```text
//!              lock                      change_lock
//!   Null ───────────────▶ Exclusive ◀──────────────────┐
//!    ▲                      │                          │
//!    └──────── unlock ──────┘        any non-Null state┘
//! ```
//!
//! `SharedExclusive` records are written on siblings of an exclusively
//! locked resource. `SharedInherited` is never stored; it is derived at read
//! time from the nearest locked ancestor folder.

use folio_core::{PrincipalId, ProjectId};
use serde::{Deserialize, Serialize};

use crate::ResourcePath;

/// Lock state of one resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockKind {
    /// No lock applies.
    Null,
    /// Locked directly by its owner.
    Exclusive,
    /// Locked through an exclusively locked sibling.
    SharedExclusive,
    /// Locked through an ancestor folder.
    SharedInherited,
}

impl LockKind {
    /// Returns a stable storage value for this kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Exclusive => "exclusive",
            Self::SharedExclusive => "shared_exclusive",
            Self::SharedInherited => "shared_inherited",
        }
    }

    /// Returns whether this kind is one of the shared variants.
    #[must_use]
    pub fn is_shared(&self) -> bool {
        matches!(self, Self::SharedExclusive | Self::SharedInherited)
    }
}

impl std::fmt::Display for LockKind {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// User and project holding a lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LockOwner {
    /// User owning the lock.
    pub owner_id: PrincipalId,
    /// Project the lock was taken in.
    pub project_id: ProjectId,
}

impl LockOwner {
    /// Creates a lock owner.
    #[must_use]
    pub fn new(owner_id: PrincipalId, project_id: ProjectId) -> Self {
        Self {
            owner_id,
            project_id,
        }
    }
}

/// Lock state of a resource together with its holder.
///
/// A `Null` record never has an owner; every other kind always has one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LockRecord {
    resource: ResourcePath,
    kind: LockKind,
    owner: Option<LockOwner>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inherited_from: Option<ResourcePath>,
}

/// Rejected lock state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockTransitionError {
    /// The resource is not in the `Null` state.
    AlreadyLocked {
        /// Current lock state.
        kind: LockKind,
        /// Current lock holder.
        holder: LockOwner,
    },
    /// The resource is in the `Null` state.
    NotLocked,
    /// The lock belongs to the named ancestor folder.
    InheritedLock(ResourcePath),
}

impl LockRecord {
    /// Returns the `Null` state for a resource.
    #[must_use]
    pub fn null(resource: ResourcePath) -> Self {
        Self {
            resource,
            kind: LockKind::Null,
            owner: None,
            inherited_from: None,
        }
    }

    /// Returns an exclusive lock held by `owner`.
    #[must_use]
    pub fn exclusive(resource: ResourcePath, owner: LockOwner) -> Self {
        Self {
            resource,
            kind: LockKind::Exclusive,
            owner: Some(owner),
            inherited_from: None,
        }
    }

    /// Returns a sibling lock held by `owner`.
    #[must_use]
    pub fn shared_exclusive(resource: ResourcePath, owner: LockOwner) -> Self {
        Self {
            resource,
            kind: LockKind::SharedExclusive,
            owner: Some(owner),
            inherited_from: None,
        }
    }

    /// Returns the lock `resource` sees through this ancestor record.
    #[must_use]
    pub fn inherited_by(&self, resource: ResourcePath) -> Self {
        match self.owner {
            Some(owner) => Self {
                resource,
                kind: LockKind::SharedInherited,
                owner: Some(owner),
                inherited_from: Some(self.resource.clone()),
            },
            None => Self::null(resource),
        }
    }

    /// Resolves the lock that applies to `resource`.
    ///
    /// The own record wins. Otherwise the first non-null record among
    /// `ancestor_records` (nearest first) is reported as `SharedInherited`.
    #[must_use]
    pub fn effective(
        resource: ResourcePath,
        own: Option<LockRecord>,
        ancestor_records: impl IntoIterator<Item = LockRecord>,
    ) -> Self {
        if let Some(own) = own.filter(|record| !record.is_null()) {
            return own;
        }

        ancestor_records
            .into_iter()
            .find(|record| !record.is_null())
            .map(|ancestor| ancestor.inherited_by(resource.clone()))
            .unwrap_or_else(|| Self::null(resource))
    }

    /// Returns the locked resource.
    #[must_use]
    pub fn resource(&self) -> &ResourcePath {
        &self.resource
    }

    /// Returns the lock state.
    #[must_use]
    pub fn kind(&self) -> LockKind {
        self.kind
    }

    /// Returns the lock holder, `None` in the `Null` state.
    #[must_use]
    pub fn owner(&self) -> Option<LockOwner> {
        self.owner
    }

    /// Returns the owning user, `None` in the `Null` state.
    #[must_use]
    pub fn owner_id(&self) -> Option<PrincipalId> {
        self.owner.map(|owner| owner.owner_id)
    }

    /// Returns the owning project, `None` in the `Null` state.
    #[must_use]
    pub fn project_id(&self) -> Option<ProjectId> {
        self.owner.map(|owner| owner.project_id)
    }

    /// Returns the ancestor folder an inherited lock comes from.
    #[must_use]
    pub fn inherited_from(&self) -> Option<&ResourcePath> {
        self.inherited_from.as_ref()
    }

    /// Returns whether no lock applies.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.kind == LockKind::Null
    }

    /// Returns whether `owner` holds this lock in the same project.
    #[must_use]
    pub fn is_held_by(&self, owner: LockOwner) -> bool {
        self.owner == Some(owner)
    }

    /// Acquires an exclusive lock; legal only from `Null`.
    pub fn lock(&self, owner: LockOwner) -> Result<LockRecord, LockTransitionError> {
        if let Some(holder) = self.owner {
            return Err(LockTransitionError::AlreadyLocked {
                kind: self.kind,
                holder,
            });
        }

        Ok(Self::exclusive(self.resource.clone(), owner))
    }

    /// Reassigns the lock to `owner`; legal from any non-`Null` state.
    pub fn change_lock(&self, owner: LockOwner) -> Result<LockRecord, LockTransitionError> {
        if self.is_null() {
            return Err(LockTransitionError::NotLocked);
        }

        Ok(Self::exclusive(self.resource.clone(), owner))
    }

    /// Releases a directly held lock.
    pub fn unlock(&self) -> Result<LockRecord, LockTransitionError> {
        match self.kind {
            LockKind::Exclusive | LockKind::SharedExclusive => {
                Ok(Self::null(self.resource.clone()))
            }
            LockKind::Null => Err(LockTransitionError::NotLocked),
            LockKind::SharedInherited => Err(LockTransitionError::InheritedLock(
                self.inherited_from
                    .clone()
                    .unwrap_or_else(ResourcePath::root),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use folio_core::{PrincipalId, ProjectId};

    use super::{LockKind, LockOwner, LockRecord, LockTransitionError};
    use crate::ResourcePath;

    fn path(value: &str) -> ResourcePath {
        ResourcePath::new(value).unwrap_or_else(|error| panic!("{value}: {error}"))
    }

    fn owner() -> LockOwner {
        LockOwner::new(PrincipalId::new(), ProjectId::new())
    }

    #[test]
    fn lock_from_null_produces_exclusive() {
        let alice = owner();
        let locked = LockRecord::null(path("/x.html")).lock(alice);

        assert!(matches!(
            locked,
            Ok(ref record) if record.kind() == LockKind::Exclusive && record.is_held_by(alice)
        ));
    }

    #[test]
    fn lock_from_any_locked_state_is_rejected() {
        let held = LockRecord::exclusive(path("/x.html"), owner());
        assert!(matches!(
            held.lock(owner()),
            Err(LockTransitionError::AlreadyLocked { .. })
        ));

        let inherited = held.inherited_by(path("/x.html"));
        assert!(matches!(
            inherited.lock(owner()),
            Err(LockTransitionError::AlreadyLocked { .. })
        ));
    }

    #[test]
    fn change_lock_overwrites_owner_from_every_locked_state() {
        let bob = owner();
        let states = [
            LockRecord::exclusive(path("/x.html"), owner()),
            LockRecord::shared_exclusive(path("/x.html"), owner()),
            LockRecord::exclusive(path("/f/"), owner()).inherited_by(path("/f/x.html")),
        ];

        for state in states {
            let changed = state.change_lock(bob);
            assert!(matches!(
                changed,
                Ok(ref record) if record.kind() == LockKind::Exclusive
                    && record.owner_id() == Some(bob.owner_id)
                    && record.project_id() == Some(bob.project_id)
            ));
        }
    }

    #[test]
    fn change_lock_from_null_is_rejected() {
        let result = LockRecord::null(path("/x.html")).change_lock(owner());
        assert_eq!(result, Err(LockTransitionError::NotLocked));
    }

    #[test]
    fn unlock_rejects_inherited_and_null_states() {
        let folder_lock = LockRecord::exclusive(path("/f/"), owner());
        let inherited = folder_lock.inherited_by(path("/f/x.html"));

        assert_eq!(
            inherited.unlock(),
            Err(LockTransitionError::InheritedLock(path("/f/")))
        );
        assert_eq!(
            LockRecord::null(path("/x.html")).unlock(),
            Err(LockTransitionError::NotLocked)
        );
        assert!(matches!(folder_lock.unlock(), Ok(record) if record.is_null()));
    }

    #[test]
    fn effective_lock_prefers_own_then_nearest_ancestor() {
        let alice = owner();
        let bob = owner();
        let resource = path("/a/b/c.html");

        let own = LockRecord::exclusive(resource.clone(), alice);
        let ancestors = vec![
            LockRecord::null(path("/a/b/")),
            LockRecord::exclusive(path("/a/"), bob),
        ];

        let with_own = LockRecord::effective(resource.clone(), Some(own), ancestors.clone());
        assert!(with_own.is_held_by(alice));
        assert_eq!(with_own.kind(), LockKind::Exclusive);

        let inherited = LockRecord::effective(resource.clone(), None, ancestors);
        assert_eq!(inherited.kind(), LockKind::SharedInherited);
        assert!(inherited.is_held_by(bob));
        assert_eq!(inherited.inherited_from(), Some(&path("/a/")));

        let unlocked = LockRecord::effective(resource, None, Vec::new());
        assert!(unlocked.is_null());
        assert_eq!(unlocked.owner(), None);
    }
}
