//! Application services and ports for workplace access control and locking.

#![forbid(unsafe_code)]

mod access_control_service;
mod access_ports;
mod editability_service;
mod errors;
mod lock_service;
mod write_gate;

#[cfg(test)]
mod test_support;

pub use access_control_service::{AccessControlListing, AccessControlService};
pub use access_ports::{
    AccessControlRepository, AuditEvent, AuditRepository, LockRepository, PrincipalRepository,
    ProjectRepository, ResourceRepository,
};
pub use editability_service::EditabilityService;
pub use errors::{
    AccessControlError, AddEntryError, LockError, ModifyEntryError, RemoveEntryError, ResolveError,
};
pub use lock_service::LockService;
