use std::fmt::{Display, Formatter};
use std::str::FromStr;

use bitflags::bitflags;
use folio_core::AppError;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Bitmask over [`PermissionKind`] values.
    ///
    /// Bit positions are fixed and shared by every stored entry:
    ///
    /// | Kind | Bit |
    /// |------|-----|
    /// | [`READ`](Self::READ) | `0b0_0001` |
    /// | [`WRITE`](Self::WRITE) | `0b0_0010` |
    /// | [`VIEW`](Self::VIEW) | `0b0_0100` |
    /// | [`CONTROL`](Self::CONTROL) | `0b0_1000` |
    /// | [`DIRECT_PUBLISH`](Self::DIRECT_PUBLISH) | `0b1_0000` |
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct PermissionBits: u8 {
        /// Read resource content and properties.
        const READ           = 0b0_0001;
        /// Write resource content and properties.
        const WRITE          = 0b0_0010;
        /// See the resource in the explorer tree.
        const VIEW           = 0b0_0100;
        /// Change access control entries of the resource.
        const CONTROL        = 0b0_1000;
        /// Publish the resource without a workflow.
        const DIRECT_PUBLISH = 0b1_0000;
    }
}

/// Closed set of rights an access control entry can grant or deny.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionKind {
    /// Read resource content and properties.
    Read,
    /// Write resource content and properties.
    Write,
    /// See the resource in the explorer tree.
    View,
    /// Change access control entries of the resource.
    Control,
    /// Publish the resource without a workflow.
    DirectPublish,
}

impl PermissionKind {
    /// Returns all known kinds in bit order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[PermissionKind] = &[
            PermissionKind::Read,
            PermissionKind::Write,
            PermissionKind::View,
            PermissionKind::Control,
            PermissionKind::DirectPublish,
        ];

        ALL
    }

    /// Returns the single bit this kind occupies.
    #[must_use]
    pub fn bit(self) -> PermissionBits {
        match self {
            Self::Read => PermissionBits::READ,
            Self::Write => PermissionBits::WRITE,
            Self::View => PermissionBits::VIEW,
            Self::Control => PermissionBits::CONTROL,
            Self::DirectPublish => PermissionBits::DIRECT_PUBLISH,
        }
    }

    /// Returns a stable storage value for this kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::View => "view",
            Self::Control => "control",
            Self::DirectPublish => "direct_publish",
        }
    }

    /// Returns the one-letter code used in permission strings.
    #[must_use]
    pub fn code(self) -> char {
        match self {
            Self::Read => 'r',
            Self::Write => 'w',
            Self::View => 'v',
            Self::Control => 'c',
            Self::DirectPublish => 'd',
        }
    }

    fn from_code(code: char) -> Option<Self> {
        Self::all().iter().copied().find(|kind| kind.code() == code)
    }
}

impl FromStr for PermissionKind {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|kind| kind.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown permission kind '{value}'")))
    }
}

/// Allowed and denied permission bits carried by one entry or one resolution.
///
/// The two masks are not required to be disjoint. A kind present in both is
/// denied when evaluated, see [`PermissionSet::is_effectively_allowed`]. A kind
/// present in neither is unspecified and grants nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PermissionSet {
    allowed: PermissionBits,
    denied: PermissionBits,
}

impl PermissionSet {
    /// Creates a set from explicit masks.
    #[must_use]
    pub fn new(allowed: PermissionBits, denied: PermissionBits) -> Self {
        Self { allowed, denied }
    }

    /// Returns a set with nothing allowed and nothing denied.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a set from lists of allowed and denied kinds.
    #[must_use]
    pub fn from_kinds(allowed: &[PermissionKind], denied: &[PermissionKind]) -> Self {
        let fold = |kinds: &[PermissionKind]| {
            kinds
                .iter()
                .fold(PermissionBits::empty(), |bits, kind| bits | kind.bit())
        };

        Self::new(fold(allowed), fold(denied))
    }

    /// Returns a copy with `kind` added to the allowed mask.
    #[must_use]
    pub fn with_allowed(mut self, kind: PermissionKind) -> Self {
        self.allowed |= kind.bit();
        self
    }

    /// Returns a copy with `kind` added to the denied mask.
    #[must_use]
    pub fn with_denied(mut self, kind: PermissionKind) -> Self {
        self.denied |= kind.bit();
        self
    }

    /// Returns the allowed mask.
    #[must_use]
    pub fn allowed(&self) -> PermissionBits {
        self.allowed
    }

    /// Returns the denied mask.
    #[must_use]
    pub fn denied(&self) -> PermissionBits {
        self.denied
    }

    /// Returns whether the kind's bit is set in the allowed mask.
    #[must_use]
    pub fn is_allowed(&self, kind: PermissionKind) -> bool {
        self.allowed.contains(kind.bit())
    }

    /// Returns whether the kind's bit is set in the denied mask.
    #[must_use]
    pub fn is_denied(&self, kind: PermissionKind) -> bool {
        self.denied.contains(kind.bit())
    }

    /// Returns whether the kind is allowed and not denied.
    #[must_use]
    pub fn is_effectively_allowed(&self, kind: PermissionKind) -> bool {
        self.is_allowed(kind) && !self.is_denied(kind)
    }

    /// Returns the allowed bits that survive deny.
    #[must_use]
    pub fn effective(&self) -> PermissionBits {
        self.allowed.difference(self.denied)
    }

    /// Returns the union of both sets, mask by mask.
    #[must_use]
    pub fn merge(&self, other: &PermissionSet) -> PermissionSet {
        Self::new(self.allowed | other.allowed, self.denied | other.denied)
    }

    /// Returns whether neither mask carries any bit.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty() && self.denied.is_empty()
    }

    /// Renders the set as `+r+w-v` style text, allowed before denied per kind.
    #[must_use]
    pub fn permission_string(&self) -> String {
        let mut rendered = String::new();
        for kind in PermissionKind::all() {
            if self.is_allowed(*kind) {
                rendered.push('+');
                rendered.push(kind.code());
            }
            if self.is_denied(*kind) {
                rendered.push('-');
                rendered.push(kind.code());
            }
        }

        rendered
    }
}

impl Display for PermissionSet {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.permission_string().as_str())
    }
}

impl FromStr for PermissionSet {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let mut allowed = PermissionBits::empty();
        let mut denied = PermissionBits::empty();
        let mut characters = value.trim().chars();

        while let Some(sign) = characters.next() {
            let code = characters.next().ok_or_else(|| {
                AppError::Validation(format!(
                    "permission string '{value}' ends after sign '{sign}'"
                ))
            })?;
            let kind = PermissionKind::from_code(code).ok_or_else(|| {
                AppError::Validation(format!(
                    "permission string '{value}' has unknown code '{code}'"
                ))
            })?;

            match sign {
                '+' => allowed |= kind.bit(),
                '-' => denied |= kind.bit(),
                other => {
                    return Err(AppError::Validation(format!(
                        "permission string '{value}' has unexpected sign '{other}'"
                    )));
                }
            }
        }

        Ok(Self::new(allowed, denied))
    }
}
