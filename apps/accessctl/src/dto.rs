use folio_application::AccessControlListing;
use folio_core::{PrincipalId, ProjectId};
use folio_domain::{EditDecision, LockRecord, PermissionKind, PermissionSet, ResourcePath};
use folio_infrastructure::SeedDirectory;
use serde::Serialize;

/// One principal's row in an access control listing.
#[derive(Debug, Serialize)]
pub struct AclEntryResponse {
    pub principal: String,
    pub kind: String,
    pub effective: String,
    pub own: Option<String>,
    pub overwrites_inherited: bool,
    pub inherited: Vec<InheritedEntryResponse>,
}

/// Entry contributed by an ancestor folder.
#[derive(Debug, Serialize)]
pub struct InheritedEntryResponse {
    pub folder: String,
    pub distance: usize,
    pub permissions: String,
}

/// Merged permissions of one principal on one resource.
#[derive(Debug, Serialize)]
pub struct EffectivePermissionResponse {
    pub resource: String,
    pub principal: String,
    pub permissions: String,
    pub granted: Vec<&'static str>,
}

/// Lock that applies to a resource.
#[derive(Debug, Serialize)]
pub struct LockResponse {
    pub resource: String,
    pub kind: String,
    pub owner: Option<String>,
    pub project: Option<String>,
    pub inherited_from: Option<String>,
}

/// Edit decision for one user on one resource.
#[derive(Debug, Serialize)]
pub struct EditabilityResponse {
    pub resource: String,
    pub user: String,
    pub project: String,
    pub editable: bool,
    pub requires_lock: bool,
    pub decision: EditDecision,
}

impl AclEntryResponse {
    pub fn from_listing(listing: &AccessControlListing) -> Self {
        let resolved = &listing.resolved;

        Self {
            principal: listing.principal_name.clone(),
            kind: resolved.principal_kind().to_string(),
            effective: resolved.effective().permission_string(),
            own: resolved
                .own()
                .map(|entry| entry.permissions().permission_string()),
            overwrites_inherited: resolved.is_overwriting(),
            inherited: resolved
                .inherited()
                .iter()
                .map(|inherited| InheritedEntryResponse {
                    folder: inherited.entry().resource().to_string(),
                    distance: inherited.distance(),
                    permissions: inherited.entry().permissions().permission_string(),
                })
                .collect(),
        }
    }
}

impl EffectivePermissionResponse {
    pub fn new(resource: &ResourcePath, principal: &str, permissions: PermissionSet) -> Self {
        Self {
            resource: resource.to_string(),
            principal: principal.to_owned(),
            permissions: permissions.permission_string(),
            granted: PermissionKind::all()
                .iter()
                .copied()
                .filter(|kind| permissions.is_effectively_allowed(*kind))
                .map(PermissionKind::as_str)
                .collect(),
        }
    }
}

impl LockResponse {
    pub fn new(record: &LockRecord, directory: &SeedDirectory) -> Self {
        Self {
            resource: record.resource().to_string(),
            kind: record.kind().to_string(),
            owner: record
                .owner_id()
                .map(|owner_id| principal_label(directory, owner_id)),
            project: record
                .project_id()
                .map(|project_id| project_label(directory, project_id)),
            inherited_from: record.inherited_from().map(ToString::to_string),
        }
    }
}

pub fn principal_label(directory: &SeedDirectory, principal_id: PrincipalId) -> String {
    directory
        .principal_name(principal_id)
        .map_or_else(|| principal_id.to_string(), ToOwned::to_owned)
}

pub fn project_label(directory: &SeedDirectory, project_id: ProjectId) -> String {
    directory
        .project_name(project_id)
        .map_or_else(|| project_id.to_string(), ToOwned::to_owned)
}
