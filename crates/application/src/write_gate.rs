use std::collections::HashMap;
use std::sync::Arc;

use folio_domain::ResourcePath;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Serializes writes per resource path.
///
/// Writers for different resources proceed concurrently. Idle slots are
/// dropped on the next acquisition.
#[derive(Debug, Default)]
pub(crate) struct ResourceWriteGate {
    slots: Mutex<HashMap<ResourcePath, Arc<Mutex<()>>>>,
}

impl ResourceWriteGate {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Waits until no other writer holds `resource`.
    pub(crate) async fn acquire(&self, resource: &ResourcePath) -> OwnedMutexGuard<()> {
        let slot = {
            let mut slots = self.slots.lock().await;
            slots.retain(|_, slot| Arc::strong_count(slot) > 1);
            slots.entry(resource.clone()).or_default().clone()
        };

        slot.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use folio_domain::ResourcePath;

    use super::ResourceWriteGate;

    fn path(value: &str) -> ResourcePath {
        ResourcePath::new(value).unwrap_or_else(|error| panic!("{value}: {error}"))
    }

    #[tokio::test]
    async fn same_resource_waits_for_release() {
        let gate = ResourceWriteGate::new();
        let guard = gate.acquire(&path("/a.html")).await;

        let blocked =
            tokio::time::timeout(Duration::from_millis(50), gate.acquire(&path("/a.html"))).await;
        assert!(blocked.is_err());

        drop(guard);
        let released =
            tokio::time::timeout(Duration::from_millis(50), gate.acquire(&path("/a.html"))).await;
        assert!(released.is_ok());
    }

    #[tokio::test]
    async fn different_resources_do_not_block() {
        let gate = ResourceWriteGate::new();
        let _guard = gate.acquire(&path("/a.html")).await;

        let other =
            tokio::time::timeout(Duration::from_millis(50), gate.acquire(&path("/b.html"))).await;
        assert!(other.is_ok());
    }
}
