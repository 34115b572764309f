//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod access_control;
mod audit;
mod editability;
mod lock;
mod permission;
mod principal;
mod project;
pub mod resolver;
pub mod resource;

pub use access_control::AccessControlEntry;
pub use audit::AuditAction;
pub use editability::{EditDecision, EditabilitySettings};
pub use lock::{LockKind, LockOwner, LockRecord, LockTransitionError};
pub use permission::{PermissionBits, PermissionKind, PermissionSet};
pub use principal::{Principal, PrincipalKind};
pub use project::Project;
pub use resolver::{AccessControlList, AncestorEntries, InheritedEntry, ResolvedEntry};
pub use resource::ResourcePath;
