//! Console audit sink for development. Writes audit events to tracing output.

use async_trait::async_trait;
use folio_application::{AuditEvent, AuditRepository};
use folio_core::AppResult;
use tracing::info;

/// Development audit repository that logs events instead of storing them.
#[derive(Clone)]
pub struct ConsoleAuditRepository;

impl ConsoleAuditRepository {
    /// Creates a new console audit repository.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsoleAuditRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuditRepository for ConsoleAuditRepository {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        info!(
            target: "folio::audit",
            subject = %event.subject,
            action = event.action.as_str(),
            resource_type = %event.resource_type,
            resource_id = %event.resource_id,
            detail = event.detail.as_deref().unwrap_or_default(),
            "audit event"
        );

        Ok(())
    }
}
