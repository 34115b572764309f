use serde::{Deserialize, Serialize};

/// Stable audit actions emitted by access control and lock use-cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Emitted when an access control entry is created.
    AccessEntryAdded,
    /// Emitted when an access control entry is changed.
    AccessEntryModified,
    /// Emitted when an access control entry is deleted.
    AccessEntryRemoved,
    /// Emitted when a resource is locked.
    ResourceLocked,
    /// Emitted when a lock is reassigned to another user.
    ResourceLockChanged,
    /// Emitted when a resource is unlocked.
    ResourceUnlocked,
}

impl AuditAction {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AccessEntryAdded => "access.entry.added",
            Self::AccessEntryModified => "access.entry.modified",
            Self::AccessEntryRemoved => "access.entry.removed",
            Self::ResourceLocked => "lock.acquired",
            Self::ResourceLockChanged => "lock.changed",
            Self::ResourceUnlocked => "lock.released",
        }
    }
}
