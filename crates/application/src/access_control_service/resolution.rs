use folio_core::PrincipalId;
use folio_domain::{PermissionSet, ResourcePath};

use crate::errors::ResolveError;

use super::*;

impl AccessControlService {
    /// Returns the merged permission set of one principal on a resource.
    ///
    /// A principal without any entry on the chain gets the empty set.
    pub async fn effective_permission(
        &self,
        resource: &ResourcePath,
        principal_id: PrincipalId,
    ) -> Result<PermissionSet, ResolveError> {
        Ok(self
            .find_effective_permission(resource, principal_id)
            .await?
            .unwrap_or_default())
    }

    /// Returns the merged permission set, or `None` when no entry applies.
    pub async fn find_effective_permission(
        &self,
        resource: &ResourcePath,
        principal_id: PrincipalId,
    ) -> Result<Option<PermissionSet>, ResolveError> {
        const OPERATION: &str = "resolve permissions";

        self.require_principal(resource, principal_id, OPERATION)
            .await?;
        let list = self.resolve_list(resource, OPERATION).await?;

        Ok(list.effective_permission(principal_id))
    }

    /// Returns every principal's resolution on a resource for display.
    ///
    /// Groups come before users; each kind is ordered by name.
    pub async fn access_control_list(
        &self,
        resource: &ResourcePath,
    ) -> Result<Vec<AccessControlListing>, ResolveError> {
        let list = self
            .resolve_list(resource, "list access control entries")
            .await?;

        let mut listings = Vec::with_capacity(list.len());
        for resolved in list.entries() {
            listings.push(AccessControlListing {
                principal_name: self.principal_name(resolved.principal_id()).await,
                resolved: resolved.clone(),
            });
        }

        listings.sort_by(|left, right| {
            left.resolved
                .principal_kind()
                .cmp(&right.resolved.principal_kind())
                .then_with(|| left.principal_name.cmp(&right.principal_name))
        });

        Ok(listings)
    }
}
