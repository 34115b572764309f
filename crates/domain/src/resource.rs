//! Resource addressing within the content tree.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use folio_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Absolute, `/`-separated resource path.
///
/// Folder paths end with `/`; the root folder is `/`. Segments are never
/// empty and never `.` or `..`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResourcePath(String);

impl ResourcePath {
    /// Creates a validated resource path.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim();

        if !trimmed.starts_with('/') {
            return Err(AppError::Validation(format!(
                "resource path '{trimmed}' must start with '/'"
            )));
        }

        if trimmed.len() > 1 {
            let inner = trimmed
                .trim_start_matches('/')
                .strip_suffix('/')
                .unwrap_or_else(|| trimmed.trim_start_matches('/'));
            if trimmed.starts_with("//") {
                return Err(AppError::Validation(format!(
                    "resource path '{trimmed}' contains an empty segment"
                )));
            }
            for segment in inner.split('/') {
                if segment.is_empty() {
                    return Err(AppError::Validation(format!(
                        "resource path '{trimmed}' contains an empty segment"
                    )));
                }
                if segment == "." || segment == ".." {
                    return Err(AppError::Validation(format!(
                        "resource path '{trimmed}' contains a relative segment"
                    )));
                }
            }
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the root folder path.
    #[must_use]
    pub fn root() -> Self {
        Self("/".to_owned())
    }

    /// Returns the path as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns whether this path names a folder.
    #[must_use]
    pub fn is_folder(&self) -> bool {
        self.0.ends_with('/')
    }

    /// Returns whether this path is the root folder.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    /// Returns the last segment, without the folder slash.
    #[must_use]
    pub fn name(&self) -> &str {
        let without_slash = self.0.strip_suffix('/').unwrap_or(self.0.as_str());
        without_slash
            .rsplit('/')
            .next()
            .unwrap_or(without_slash)
    }

    /// Returns the enclosing folder, or `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }

        let without_slash = self.0.strip_suffix('/').unwrap_or(self.0.as_str());
        without_slash
            .rfind('/')
            .map(|index| Self(without_slash[..=index].to_owned()))
    }

    /// Returns every enclosing folder, nearest first, ending at the root.
    #[must_use]
    pub fn ancestors(&self) -> Vec<Self> {
        let mut ancestors = Vec::new();
        let mut current = self.parent();
        while let Some(folder) = current {
            current = folder.parent();
            ancestors.push(folder);
        }

        ancestors
    }

    /// Returns whether this path lies strictly below `folder`.
    #[must_use]
    pub fn is_descendant_of(&self, folder: &ResourcePath) -> bool {
        folder.is_folder() && self.0.len() > folder.0.len() && self.0.starts_with(folder.as_str())
    }
}

impl Display for ResourcePath {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

impl FromStr for ResourcePath {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::new(value)
    }
}

impl TryFrom<String> for ResourcePath {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ResourcePath> for String {
    fn from(value: ResourcePath) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::ResourcePath;

    fn path(value: &str) -> ResourcePath {
        ResourcePath::new(value).unwrap_or_else(|error| panic!("{value}: {error}"))
    }

    #[test]
    fn rejects_relative_and_empty_segments() {
        assert!(ResourcePath::new("a/b.html").is_err());
        assert!(ResourcePath::new("/a//b.html").is_err());
        assert!(ResourcePath::new("//a/").is_err());
        assert!(ResourcePath::new("/a/../b.html").is_err());
        assert!(ResourcePath::new("/").is_ok());
    }

    #[test]
    fn ancestors_are_nearest_first_and_end_at_root() {
        let ancestors = path("/a/b/c.html").ancestors();
        let rendered: Vec<&str> = ancestors.iter().map(ResourcePath::as_str).collect();
        assert_eq!(rendered, vec!["/a/b/", "/a/", "/"]);
    }

    #[test]
    fn root_has_no_ancestors() {
        assert!(ResourcePath::root().parent().is_none());
        assert!(ResourcePath::root().ancestors().is_empty());
    }

    #[test]
    fn folder_parent_drops_last_segment() {
        assert_eq!(path("/a/b/").parent(), Some(path("/a/")));
        assert_eq!(path("/a/").parent(), Some(ResourcePath::root()));
        assert_eq!(path("/a/b/").name(), "b");
    }

    #[test]
    fn descendant_requires_folder_prefix() {
        assert!(path("/a/b/c.html").is_descendant_of(&path("/a/")));
        assert!(!path("/a/").is_descendant_of(&path("/a/")));
        assert!(!path("/ab/c.html").is_descendant_of(&path("/a/")));
        assert!(!path("/a/b.html").is_descendant_of(&path("/a/b")));
    }
}
