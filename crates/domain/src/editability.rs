use folio_core::{PrincipalId, ProjectId};
use serde::{Deserialize, Serialize};

use crate::{LockKind, LockRecord};

/// System-wide switches that influence the edit decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EditabilitySettings {
    /// Unlocked resources count as editable; the caller locks them on edit.
    pub auto_lock_on_edit: bool,
    /// Locks held by the actor in another project still grant edit rights.
    pub temp_file_project_override: bool,
}

impl EditabilitySettings {
    /// Creates settings from explicit switches.
    #[must_use]
    pub fn new(auto_lock_on_edit: bool, temp_file_project_override: bool) -> Self {
        Self {
            auto_lock_on_edit,
            temp_file_project_override,
        }
    }
}

/// Outcome of the edit check, naming the rule that decided it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditDecision {
    /// Published content is never editable.
    PublishedProject,
    /// Sibling and inherited locks never grant edit rights.
    SharedLock,
    /// The actor holds an exclusive lock in a matching project.
    LockedByActor,
    /// Unlocked, and auto-lock on edit is enabled.
    AutoLock,
    /// The exclusive lock belongs to another user.
    LockedByOther,
    /// The actor's exclusive lock was taken in another project.
    LockedInOtherProject,
    /// Unlocked, and auto-lock on edit is disabled.
    NotLocked,
}

impl EditDecision {
    /// Decides whether `actor` may edit a resource with `lock` in `project`.
    #[must_use]
    pub fn evaluate(
        settings: EditabilitySettings,
        project_is_published: bool,
        lock: &LockRecord,
        actor: PrincipalId,
        project: ProjectId,
    ) -> Self {
        if project_is_published {
            return Self::PublishedProject;
        }

        match lock.kind() {
            LockKind::SharedExclusive | LockKind::SharedInherited => Self::SharedLock,
            LockKind::Exclusive => {
                if lock.owner_id() != Some(actor) {
                    Self::LockedByOther
                } else if lock.project_id() == Some(project) || settings.temp_file_project_override
                {
                    Self::LockedByActor
                } else {
                    Self::LockedInOtherProject
                }
            }
            LockKind::Null if settings.auto_lock_on_edit => Self::AutoLock,
            LockKind::Null => Self::NotLocked,
        }
    }

    /// Returns whether the decision grants edit rights.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::LockedByActor | Self::AutoLock)
    }

    /// Returns whether the caller must lock the resource before editing.
    #[must_use]
    pub fn requires_lock(&self) -> bool {
        matches!(self, Self::AutoLock)
    }
}

#[cfg(test)]
mod tests {
    use folio_core::{PrincipalId, ProjectId};

    use super::{EditDecision, EditabilitySettings};
    use crate::{LockOwner, LockRecord, ResourcePath};

    fn path(value: &str) -> ResourcePath {
        ResourcePath::new(value).unwrap_or_else(|error| panic!("{value}: {error}"))
    }

    #[test]
    fn published_project_is_never_editable() {
        let alice = PrincipalId::new();
        let project = ProjectId::new();
        let lock = LockRecord::exclusive(path("/x.html"), LockOwner::new(alice, project));

        let decision = EditDecision::evaluate(
            EditabilitySettings::new(true, true),
            true,
            &lock,
            alice,
            project,
        );
        assert_eq!(decision, EditDecision::PublishedProject);
        assert!(!decision.is_editable());
    }

    #[test]
    fn exclusive_lock_requires_matching_owner_and_project() {
        let alice = PrincipalId::new();
        let project = ProjectId::new();
        let lock = LockRecord::exclusive(path("/x.html"), LockOwner::new(alice, project));
        let settings = EditabilitySettings::default();

        assert_eq!(
            EditDecision::evaluate(settings, false, &lock, alice, project),
            EditDecision::LockedByActor
        );
        assert_eq!(
            EditDecision::evaluate(settings, false, &lock, PrincipalId::new(), project),
            EditDecision::LockedByOther
        );
        assert_eq!(
            EditDecision::evaluate(settings, false, &lock, alice, ProjectId::new()),
            EditDecision::LockedInOtherProject
        );
    }

    #[test]
    fn temp_file_override_accepts_lock_from_other_project() {
        let alice = PrincipalId::new();
        let lock = LockRecord::exclusive(path("/x.html"), LockOwner::new(alice, ProjectId::new()));

        let decision = EditDecision::evaluate(
            EditabilitySettings::new(false, true),
            false,
            &lock,
            alice,
            ProjectId::new(),
        );
        assert!(decision.is_editable());
    }

    #[test]
    fn shared_locks_never_grant_edit_rights() {
        let alice = PrincipalId::new();
        let project = ProjectId::new();
        let owner = LockOwner::new(alice, project);
        let settings = EditabilitySettings::new(true, true);

        let sibling = LockRecord::shared_exclusive(path("/x.html"), owner);
        let inherited = LockRecord::exclusive(path("/f/"), owner).inherited_by(path("/f/x.html"));

        for lock in [sibling, inherited] {
            assert_eq!(
                EditDecision::evaluate(settings, false, &lock, alice, project),
                EditDecision::SharedLock
            );
        }
    }

    #[test]
    fn unlocked_resource_depends_on_auto_lock() {
        let lock = LockRecord::null(path("/x.html"));
        let actor = PrincipalId::new();
        let project = ProjectId::new();

        let auto = EditDecision::evaluate(
            EditabilitySettings::new(true, false),
            false,
            &lock,
            actor,
            project,
        );
        assert!(auto.is_editable());
        assert!(auto.requires_lock());

        let manual =
            EditDecision::evaluate(EditabilitySettings::default(), false, &lock, actor, project);
        assert_eq!(manual, EditDecision::NotLocked);
        assert!(!manual.is_editable());
    }
}
