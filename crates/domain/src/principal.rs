use std::str::FromStr;

use folio_core::{AppError, NonEmptyString, PrincipalId};
use serde::{Deserialize, Serialize};

/// Kind of principal an access control entry is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrincipalKind {
    /// A group of users.
    Group,
    /// A single user.
    User,
}

impl PrincipalKind {
    /// Returns a stable storage value for this kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Group => "group",
            Self::User => "user",
        }
    }
}

impl std::fmt::Display for PrincipalKind {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for PrincipalKind {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "group" => Ok(Self::Group),
            "user" => Ok(Self::User),
            _ => Err(AppError::Validation(format!(
                "unknown principal kind '{value}'"
            ))),
        }
    }
}

/// User or group as known to the principal directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    id: PrincipalId,
    kind: PrincipalKind,
    name: NonEmptyString,
}

impl Principal {
    /// Creates a principal with a validated name.
    pub fn new(
        id: PrincipalId,
        kind: PrincipalKind,
        name: impl Into<String>,
    ) -> Result<Self, AppError> {
        Ok(Self {
            id,
            kind,
            name: NonEmptyString::new(name)?,
        })
    }

    /// Returns the directory identifier.
    #[must_use]
    pub fn id(&self) -> PrincipalId {
        self.id
    }

    /// Returns whether this principal is a user or a group.
    #[must_use]
    pub fn kind(&self) -> PrincipalKind {
        self.kind
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use folio_core::PrincipalId;

    use super::{Principal, PrincipalKind};

    #[test]
    fn principal_kind_roundtrip_storage_value() {
        let restored = PrincipalKind::from_str(PrincipalKind::Group.as_str());
        assert!(matches!(restored, Ok(PrincipalKind::Group)));
        assert!(PrincipalKind::from_str("role").is_err());
    }

    #[test]
    fn principal_requires_name() {
        let principal = Principal::new(PrincipalId::new(), PrincipalKind::User, " ");
        assert!(principal.is_err());
    }
}
