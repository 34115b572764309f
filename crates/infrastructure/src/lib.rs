//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod console_audit_repository;
mod in_memory_audit_repository;
mod in_memory_content_repository;
pub mod seed;

pub use console_audit_repository::ConsoleAuditRepository;
pub use in_memory_audit_repository::{InMemoryAuditRepository, RecordedAuditEvent};
pub use in_memory_content_repository::InMemoryContentRepository;
pub use seed::{SeedDirectory, SeedDocument};
