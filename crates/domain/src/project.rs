use folio_core::{AppResult, NonEmptyString, ProjectId};
use serde::{Deserialize, Serialize};

/// Offline work project, or the published project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    id: ProjectId,
    name: NonEmptyString,
    published: bool,
}

impl Project {
    /// Creates an offline project where content can be edited.
    pub fn offline(id: ProjectId, name: impl Into<String>) -> AppResult<Self> {
        Ok(Self {
            id,
            name: NonEmptyString::new(name)?,
            published: false,
        })
    }

    /// Creates the published project whose content is immutable.
    pub fn published(id: ProjectId, name: impl Into<String>) -> AppResult<Self> {
        Ok(Self {
            id,
            name: NonEmptyString::new(name)?,
            published: true,
        })
    }

    /// Returns the project identifier.
    #[must_use]
    pub fn id(&self) -> ProjectId {
        self.id
    }

    /// Returns the project display name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns whether this is the published project.
    #[must_use]
    pub fn is_published(&self) -> bool {
        self.published
    }
}
