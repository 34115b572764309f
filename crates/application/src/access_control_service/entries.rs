use folio_core::PrincipalId;
use folio_domain::{
    AccessControlEntry, AuditAction, PermissionBits, PermissionSet, PrincipalKind, ResourcePath,
};

use crate::errors::{AddEntryError, ModifyEntryError, RemoveEntryError};

use super::*;

impl AccessControlService {
    /// Creates an own entry for a principal on a resource.
    ///
    /// Entries on folders are created with the inherit flag set so the grant
    /// reaches the folder's content; use [`Self::modify_entry`] to change it.
    pub async fn add_entry(
        &self,
        actor: PrincipalId,
        resource: &ResourcePath,
        principal_id: PrincipalId,
        principal_kind: PrincipalKind,
        permissions: PermissionSet,
    ) -> Result<(), AddEntryError> {
        const OPERATION: &str = "add entry";

        self.require_resource(resource, OPERATION).await?;
        let principal = self
            .require_principal(resource, principal_id, OPERATION)
            .await?;
        Self::check_kind(
            resource,
            principal.name(),
            principal_kind,
            principal.kind(),
            OPERATION,
        )?;

        let _guard = self.write_gate.acquire(resource).await;

        if self.find_own_entry(resource, principal_id).await?.is_some() {
            return Err(AccessControlError::DuplicateEntry {
                resource: resource.clone(),
                principal: principal.name().to_owned(),
            });
        }

        let entry =
            AccessControlEntry::new(resource.clone(), principal_id, principal_kind, permissions)
                .with_inherit_to_children(resource.is_folder());
        self.entries.persist_entry(entry).await?;

        self.record_entry_event(
            actor,
            AuditAction::AccessEntryAdded,
            resource,
            principal.name(),
            format!(
                "added {} entry '{}' for '{}'",
                principal_kind,
                permissions,
                principal.name()
            ),
        )
        .await;

        Ok(())
    }

    /// Deletes the own entry of a principal on a resource.
    ///
    /// Principals that have since been removed from the directory can still
    /// be removed; the stored entry supplies the kind to check against.
    pub async fn remove_entry(
        &self,
        actor: PrincipalId,
        resource: &ResourcePath,
        principal_id: PrincipalId,
        principal_kind: PrincipalKind,
    ) -> Result<(), RemoveEntryError> {
        const OPERATION: &str = "remove entry";

        self.require_resource(resource, OPERATION).await?;
        let principal = self.principal_name(principal_id).await;

        let _guard = self.write_gate.acquire(resource).await;

        let entry = self
            .find_own_entry(resource, principal_id)
            .await?
            .ok_or_else(|| AccessControlError::EntryNotFound {
                resource: resource.clone(),
                principal: principal.clone(),
                operation: OPERATION,
            })?;
        Self::check_kind(
            resource,
            principal.as_str(),
            principal_kind,
            entry.principal_kind(),
            OPERATION,
        )?;

        self.entries.delete_entry(resource, principal_id).await?;

        self.record_entry_event(
            actor,
            AuditAction::AccessEntryRemoved,
            resource,
            principal.as_str(),
            format!(
                "removed {} entry '{}' for '{}'",
                principal_kind,
                entry.permissions(),
                principal
            ),
        )
        .await;

        Ok(())
    }

    /// Replaces permission bits and flags of an existing own entry.
    ///
    /// The replacement is built completely before the single store write, so
    /// a rejected call leaves the previous entry untouched.
    #[allow(clippy::too_many_arguments)]
    pub async fn modify_entry(
        &self,
        actor: PrincipalId,
        resource: &ResourcePath,
        principal_id: PrincipalId,
        principal_kind: PrincipalKind,
        allowed: PermissionBits,
        denied: PermissionBits,
        inherit_to_children: bool,
        overwrites_inherited: bool,
    ) -> Result<(), ModifyEntryError> {
        const OPERATION: &str = "modify entry";

        self.require_resource(resource, OPERATION).await?;
        let principal = self.principal_name(principal_id).await;

        let _guard = self.write_gate.acquire(resource).await;

        let existing = self
            .find_own_entry(resource, principal_id)
            .await?
            .ok_or_else(|| AccessControlError::EntryNotFound {
                resource: resource.clone(),
                principal: principal.clone(),
                operation: OPERATION,
            })?;
        Self::check_kind(
            resource,
            principal.as_str(),
            principal_kind,
            existing.principal_kind(),
            OPERATION,
        )?;

        let previous = existing.permissions();
        let replacement = existing
            .with_permissions(PermissionSet::new(allowed, denied))
            .with_inherit_to_children(inherit_to_children)
            .with_overwrites_inherited(overwrites_inherited);
        let detail = format!(
            "changed entry for '{}' from '{}' to '{}' (inherit={}, overwrite={})",
            principal,
            previous,
            replacement.permissions(),
            inherit_to_children,
            overwrites_inherited
        );
        self.entries.persist_entry(replacement).await?;

        self.record_entry_event(
            actor,
            AuditAction::AccessEntryModified,
            resource,
            principal.as_str(),
            detail,
        )
        .await;

        Ok(())
    }
}
