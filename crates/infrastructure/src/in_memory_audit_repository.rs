use async_trait::async_trait;
use chrono::{DateTime, Utc};
use folio_application::{AuditEvent, AuditRepository};
use folio_core::AppResult;
use tokio::sync::RwLock;

/// Audit event together with the time it was appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedAuditEvent {
    /// Append timestamp.
    pub recorded_at: DateTime<Utc>,
    /// Event payload.
    pub event: AuditEvent,
}

/// Append-only in-memory audit log.
#[derive(Debug, Default)]
pub struct InMemoryAuditRepository {
    events: RwLock<Vec<RecordedAuditEvent>>,
}

impl InMemoryAuditRepository {
    /// Creates an empty audit log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every event in append order.
    pub async fn list_events(&self) -> Vec<RecordedAuditEvent> {
        self.events.read().await.clone()
    }
}

#[async_trait]
impl AuditRepository for InMemoryAuditRepository {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        self.events.write().await.push(RecordedAuditEvent {
            recorded_at: Utc::now(),
            event,
        });
        Ok(())
    }
}
