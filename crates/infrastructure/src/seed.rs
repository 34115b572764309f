//! JSON seed documents describing a workplace to load into the in-memory store.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use folio_application::{AccessControlRepository, LockRepository, ResourceRepository};
use folio_core::{AppError, AppResult, PrincipalId, ProjectId};
use folio_domain::{
    AccessControlEntry, LockOwner, LockRecord, PermissionSet, Principal, PrincipalKind, Project,
    ResourcePath,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::InMemoryContentRepository;

/// Top-level seed document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedDocument {
    /// Projects; exactly one should be marked current.
    #[serde(default)]
    pub projects: Vec<SeedProject>,
    /// Users and groups.
    #[serde(default)]
    pub principals: Vec<SeedPrincipal>,
    /// Folders and files below the root.
    #[serde(default)]
    pub resources: Vec<SeedResource>,
    /// Own access control entries.
    #[serde(default)]
    pub entries: Vec<SeedEntry>,
    /// Exclusive locks.
    #[serde(default)]
    pub locks: Vec<SeedLock>,
}

/// Seeded project.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedProject {
    /// Unique project name.
    pub name: String,
    /// Fixed identifier; generated when absent.
    #[serde(default)]
    pub id: Option<Uuid>,
    /// Whether this is the published project.
    #[serde(default)]
    pub published: bool,
    /// Whether requests work in this project.
    #[serde(default)]
    pub current: bool,
}

/// Seeded user or group.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedPrincipal {
    /// Unique principal name.
    pub name: String,
    /// User or group.
    pub kind: PrincipalKind,
    /// Fixed identifier; generated when absent.
    #[serde(default)]
    pub id: Option<Uuid>,
}

/// Seeded resource.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedResource {
    /// Resource path; folders end with `/`.
    pub path: ResourcePath,
    /// Content key; resources with the same key are siblings.
    #[serde(default)]
    pub content: Option<String>,
}

/// Seeded access control entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedEntry {
    /// Resource the entry is attached to.
    pub resource: ResourcePath,
    /// Principal name.
    pub principal: String,
    /// Permission string such as `+r+w-c`.
    pub permissions: String,
    /// Inherit flag; defaults to whether the resource is a folder.
    #[serde(default)]
    pub inherit: Option<bool>,
    /// Overwrite-inherited flag.
    #[serde(default)]
    pub overwrite: bool,
}

/// Seeded exclusive lock.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedLock {
    /// Locked resource.
    pub resource: ResourcePath,
    /// Name of the owning user.
    pub owner: String,
    /// Name of the project the lock was taken in.
    pub project: String,
}

/// Name lookups for everything a seed document created.
#[derive(Debug, Clone, Default)]
pub struct SeedDirectory {
    principals: BTreeMap<String, Principal>,
    projects: BTreeMap<String, ProjectId>,
    current_project: Option<ProjectId>,
}

impl SeedDirectory {
    /// Finds a seeded principal by name.
    pub fn principal(&self, name: &str) -> AppResult<&Principal> {
        self.principals
            .get(name)
            .ok_or_else(|| AppError::NotFound(format!("principal '{name}' is not seeded")))
    }

    /// Finds a seeded project by name.
    pub fn project(&self, name: &str) -> AppResult<ProjectId> {
        self.projects
            .get(name)
            .copied()
            .ok_or_else(|| AppError::NotFound(format!("project '{name}' is not seeded")))
    }

    /// Returns the project marked current, if any.
    #[must_use]
    pub fn current_project(&self) -> Option<ProjectId> {
        self.current_project
    }

    /// Returns the name of a seeded principal id.
    #[must_use]
    pub fn principal_name(&self, principal_id: PrincipalId) -> Option<&str> {
        self.principals
            .values()
            .find(|principal| principal.id() == principal_id)
            .map(Principal::name)
    }

    /// Returns the name of a seeded project id.
    #[must_use]
    pub fn project_name(&self, project_id: ProjectId) -> Option<&str> {
        self.projects
            .iter()
            .find(|(_, id)| **id == project_id)
            .map(|(name, _)| name.as_str())
    }
}

impl SeedDocument {
    /// Parses a seed document from JSON text.
    pub fn from_json(value: &str) -> AppResult<Self> {
        serde_json::from_str(value)
            .map_err(|error| AppError::Validation(format!("invalid seed document: {error}")))
    }

    /// Reads and parses a seed document file.
    pub fn from_file(path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|error| {
            AppError::Store(format!(
                "failed to read seed file '{}': {error}",
                path.display()
            ))
        })?;

        Self::from_json(&contents)
    }

    /// Loads the document into `repository` and returns the name lookups.
    pub async fn apply(&self, repository: &InMemoryContentRepository) -> AppResult<SeedDirectory> {
        let mut directory = SeedDirectory::default();

        for seed in &self.projects {
            let id = seed.id.map(ProjectId::from_uuid).unwrap_or_default();
            let project = if seed.published {
                Project::published(id, seed.name.as_str())?
            } else {
                Project::offline(id, seed.name.as_str())?
            };
            repository.insert_project(project).await?;
            if directory.projects.insert(seed.name.clone(), id).is_some() {
                return Err(AppError::Conflict(format!(
                    "project name '{}' is seeded twice",
                    seed.name
                )));
            }
            if seed.current {
                repository.set_current_project(id).await?;
                directory.current_project = Some(id);
            }
        }

        for seed in &self.principals {
            let id = seed.id.map(PrincipalId::from_uuid).unwrap_or_default();
            let principal = Principal::new(id, seed.kind, seed.name.as_str())?;
            repository.insert_principal(principal.clone()).await?;
            if directory
                .principals
                .insert(seed.name.clone(), principal)
                .is_some()
            {
                return Err(AppError::Conflict(format!(
                    "principal name '{}' is seeded twice",
                    seed.name
                )));
            }
        }

        let mut resources: Vec<&SeedResource> = self.resources.iter().collect();
        resources.sort_by(|left, right| left.path.cmp(&right.path));
        let mut content_ids: HashMap<&str, Uuid> = HashMap::new();
        for seed in resources.into_iter().filter(|seed| !seed.path.is_root()) {
            let shared = seed
                .content
                .as_deref()
                .and_then(|key| content_ids.get(key).copied());
            let content_id = repository
                .insert_resource(seed.path.clone(), shared)
                .await?;
            if let Some(key) = seed.content.as_deref() {
                content_ids.entry(key).or_insert(content_id);
            }
        }

        for seed in &self.entries {
            if !repository.resource_exists(&seed.resource).await? {
                return Err(AppError::NotFound(format!(
                    "entry resource '{}' is not seeded",
                    seed.resource
                )));
            }
            let principal = directory.principal(&seed.principal)?;
            let permissions: PermissionSet = seed.permissions.parse()?;
            let entry = AccessControlEntry::new(
                seed.resource.clone(),
                principal.id(),
                principal.kind(),
                permissions,
            )
            .with_inherit_to_children(seed.inherit.unwrap_or_else(|| seed.resource.is_folder()))
            .with_overwrites_inherited(seed.overwrite);
            repository.persist_entry(entry).await?;
        }

        for seed in &self.locks {
            if !repository.resource_exists(&seed.resource).await? {
                return Err(AppError::NotFound(format!(
                    "lock resource '{}' is not seeded",
                    seed.resource
                )));
            }
            let principal = directory.principal(&seed.owner)?;
            if principal.kind() != PrincipalKind::User {
                return Err(AppError::Validation(format!(
                    "lock owner '{}' is not a user",
                    seed.owner
                )));
            }
            let owner = LockOwner::new(principal.id(), directory.project(&seed.project)?);

            repository
                .write_lock_record(LockRecord::exclusive(seed.resource.clone(), owner))
                .await?;
            for sibling in repository.read_siblings(&seed.resource).await? {
                if repository.read_lock_record(&sibling).await?.is_none() {
                    repository
                        .write_lock_record(LockRecord::shared_exclusive(sibling, owner))
                        .await?;
                }
            }
        }

        info!(
            projects = self.projects.len(),
            principals = self.principals.len(),
            resources = self.resources.len(),
            entries = self.entries.len(),
            locks = self.locks.len(),
            "seed document applied"
        );

        Ok(directory)
    }
}
