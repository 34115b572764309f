use folio_core::PrincipalId;
use serde::{Deserialize, Serialize};

use crate::{PermissionSet, PrincipalKind, ResourcePath};

/// Permission grant stored on one resource for one principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessControlEntry {
    resource: ResourcePath,
    principal_id: PrincipalId,
    principal_kind: PrincipalKind,
    permissions: PermissionSet,
    inherit_to_children: bool,
    overwrites_inherited: bool,
}

impl AccessControlEntry {
    /// Creates an entry with both flags cleared.
    #[must_use]
    pub fn new(
        resource: ResourcePath,
        principal_id: PrincipalId,
        principal_kind: PrincipalKind,
        permissions: PermissionSet,
    ) -> Self {
        Self {
            resource,
            principal_id,
            principal_kind,
            permissions,
            inherit_to_children: false,
            overwrites_inherited: false,
        }
    }

    /// Returns a copy that descendants see during resolution when `inherit` is set.
    #[must_use]
    pub fn with_inherit_to_children(mut self, inherit: bool) -> Self {
        self.inherit_to_children = inherit;
        self
    }

    /// Returns a copy that discards inherited grants when `overwrite` is set.
    #[must_use]
    pub fn with_overwrites_inherited(mut self, overwrite: bool) -> Self {
        self.overwrites_inherited = overwrite;
        self
    }

    /// Returns a copy carrying a replacement permission set.
    #[must_use]
    pub fn with_permissions(mut self, permissions: PermissionSet) -> Self {
        self.permissions = permissions;
        self
    }

    /// Returns the resource owning this entry.
    #[must_use]
    pub fn resource(&self) -> &ResourcePath {
        &self.resource
    }

    /// Returns the principal the entry applies to.
    #[must_use]
    pub fn principal_id(&self) -> PrincipalId {
        self.principal_id
    }

    /// Returns whether the principal is a user or a group.
    #[must_use]
    pub fn principal_kind(&self) -> PrincipalKind {
        self.principal_kind
    }

    /// Returns the granted and denied bits.
    #[must_use]
    pub fn permissions(&self) -> PermissionSet {
        self.permissions
    }

    /// Returns whether descendants inherit this entry.
    #[must_use]
    pub fn inherit_to_children(&self) -> bool {
        self.inherit_to_children
    }

    /// Returns whether this entry replaces inherited grants for its principal.
    #[must_use]
    pub fn overwrites_inherited(&self) -> bool {
        self.overwrites_inherited
    }
}
