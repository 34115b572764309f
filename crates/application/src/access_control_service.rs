use std::sync::Arc;

use folio_core::{AppResult, PrincipalId};
use folio_domain::{
    AccessControlEntry, AccessControlList, AncestorEntries, AuditAction, Principal, PrincipalKind,
    ResolvedEntry, ResourcePath,
};
use tracing::{info, warn};

use crate::errors::AccessControlError;
use crate::write_gate::ResourceWriteGate;
use crate::{
    AccessControlRepository, AuditEvent, AuditRepository, PrincipalRepository, ResourceRepository,
};

mod entries;
mod resolution;


/// Resolved entry paired with the principal's display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessControlListing {
    /// Principal display name, or its id when the directory no longer knows it.
    pub principal_name: String,
    /// Own and inherited entries with the merged result.
    pub resolved: ResolvedEntry,
}

/// Application service for access control entries and permission resolution.
#[derive(Clone)]
pub struct AccessControlService {
    principals: Arc<dyn PrincipalRepository>,
    resources: Arc<dyn ResourceRepository>,
    entries: Arc<dyn AccessControlRepository>,
    audit_repository: Arc<dyn AuditRepository>,
    write_gate: Arc<ResourceWriteGate>,
}

impl AccessControlService {
    /// Creates a new service from repository implementations.
    #[must_use]
    pub fn new(
        principals: Arc<dyn PrincipalRepository>,
        resources: Arc<dyn ResourceRepository>,
        entries: Arc<dyn AccessControlRepository>,
        audit_repository: Arc<dyn AuditRepository>,
    ) -> Self {
        Self {
            principals,
            resources,
            entries,
            audit_repository,
            write_gate: Arc::new(ResourceWriteGate::new()),
        }
    }

    async fn require_resource(
        &self,
        resource: &ResourcePath,
        operation: &'static str,
    ) -> Result<(), AccessControlError> {
        if self.resources.resource_exists(resource).await? {
            return Ok(());
        }

        Err(AccessControlError::ResourceNotFound {
            resource: resource.clone(),
            operation,
        })
    }

    async fn require_principal(
        &self,
        resource: &ResourcePath,
        principal_id: PrincipalId,
        operation: &'static str,
    ) -> Result<Principal, AccessControlError> {
        self.principals
            .resolve_principal(principal_id)
            .await?
            .ok_or_else(|| AccessControlError::PrincipalNotFound {
                resource: resource.clone(),
                principal_id,
                operation,
            })
    }

    async fn principal_name(&self, principal_id: PrincipalId) -> String {
        match self.principals.resolve_principal(principal_id).await {
            Ok(Some(principal)) => principal.name().to_owned(),
            Ok(None) => principal_id.to_string(),
            Err(error) => {
                warn!(principal = %principal_id, %error, "principal lookup failed, showing id");
                principal_id.to_string()
            }
        }
    }

    fn check_kind(
        resource: &ResourcePath,
        principal: &str,
        expected: PrincipalKind,
        actual: PrincipalKind,
        operation: &'static str,
    ) -> Result<(), AccessControlError> {
        if expected == actual {
            return Ok(());
        }

        Err(AccessControlError::PrincipalKindMismatch {
            resource: resource.clone(),
            principal: principal.to_owned(),
            expected,
            actual,
            operation,
        })
    }

    async fn find_own_entry(
        &self,
        resource: &ResourcePath,
        principal_id: PrincipalId,
    ) -> AppResult<Option<AccessControlEntry>> {
        Ok(self
            .entries
            .read_own_entries(resource)
            .await?
            .into_iter()
            .find(|entry| entry.principal_id() == principal_id))
    }

    async fn resolve_list(
        &self,
        resource: &ResourcePath,
        operation: &'static str,
    ) -> Result<AccessControlList, AccessControlError> {
        self.require_resource(resource, operation).await?;

        let own_entries = self.entries.read_own_entries(resource).await?;
        let chain = self.resources.read_ancestor_chain(resource).await?;

        let mut ancestors = Vec::with_capacity(chain.len());
        for folder in chain {
            let entries = self.entries.read_own_entries(&folder).await?;
            ancestors.push(AncestorEntries { folder, entries });
        }

        Ok(AccessControlList::resolve(
            resource.clone(),
            own_entries,
            ancestors,
        ))
    }

    async fn record_entry_event(
        &self,
        actor: PrincipalId,
        action: AuditAction,
        resource: &ResourcePath,
        principal: &str,
        detail: String,
    ) {
        info!(
            actor = %actor,
            resource = %resource,
            principal,
            action = action.as_str(),
            "access control entry changed"
        );

        // Runs after the entry write commits, so failures are only logged.
        if let Err(error) = self
            .audit_repository
            .append_event(AuditEvent {
                subject: actor.to_string(),
                action,
                resource_type: "access_control_entry".to_owned(),
                resource_id: format!("{resource}:{principal}"),
                detail: Some(detail),
            })
            .await
        {
            warn!(
                resource = %resource,
                principal,
                action = action.as_str(),
                %error,
                "failed to append audit event"
            );
        }
    }
}
