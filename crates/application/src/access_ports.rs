mod audit;
mod content;
mod directory;
mod locks;

pub use audit::{AuditEvent, AuditRepository};
pub use content::{AccessControlRepository, ResourceRepository};
pub use directory::{PrincipalRepository, ProjectRepository};
pub use locks::LockRepository;
