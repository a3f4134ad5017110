//! Slice registry: location-transparent lookup of a slice's lifecycle plus a
//! read-only snapshot query surface. An `RwLock<HashMap<Uuid, Arc<SliceLifecycle>>>`
//! backs registration and lookup; runtime state stays owned by each slice's
//! own state machine and is only ever read, never mutated, through here.

use crate::lifecycle::SliceLifecycle;
use mano_types::SliceState;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Clone, Copy)]
pub struct SliceSnapshot {
    pub slice_id: uuid::Uuid,
    pub state: SliceState,
    pub transition_count: usize,
}

#[derive(Default)]
pub struct SliceRegistry {
    slices: RwLock<HashMap<uuid::Uuid, Arc<SliceLifecycle>>>,
}

impl SliceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register(&self, lifecycle: Arc<SliceLifecycle>) {
        self.slices.write().await.insert(lifecycle.slice_id(), lifecycle);
    }

    pub async fn unregister(&self, slice_id: uuid::Uuid) -> Option<Arc<SliceLifecycle>> {
        self.slices.write().await.remove(&slice_id)
    }

    pub async fn get(&self, slice_id: uuid::Uuid) -> Option<Arc<SliceLifecycle>> {
        self.slices.read().await.get(&slice_id).cloned()
    }

    pub async fn snapshot(&self, slice_id: uuid::Uuid) -> Option<SliceSnapshot> {
        let lifecycle = self.get(slice_id).await?;
        Some(SliceSnapshot { slice_id, state: lifecycle.current_state(), transition_count: lifecycle.history().len() })
    }

    pub async fn snapshot_all(&self) -> Vec<SliceSnapshot> {
        let slices = self.slices.read().await;
        slices
            .values()
            .map(|lifecycle| SliceSnapshot {
                slice_id: lifecycle.slice_id(),
                state: lifecycle.current_state(),
                transition_count: lifecycle.history().len(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transitions::SliceEvent;
    use std::time::Duration;

    #[tokio::test]
    async fn register_then_snapshot_reflects_current_state() {
        let registry = SliceRegistry::new();
        let (lifecycle, dispatcher, watchdog) = SliceLifecycle::spawn(uuid::Uuid::new_v4(), Duration::from_secs(300));
        let slice_id = lifecycle.slice_id();
        registry.register(lifecycle.clone()).await;

        lifecycle.send(SliceEvent::Validate).unwrap();
        let snapshot = registry.snapshot(slice_id).await.unwrap();
        assert_eq!(snapshot.state, SliceState::Validating);
        assert_eq!(snapshot.transition_count, 1);

        dispatcher.abort();
        watchdog.abort();
    }

    #[tokio::test]
    async fn unregister_removes_from_snapshot_all() {
        let registry = SliceRegistry::new();
        let (lifecycle, dispatcher, watchdog) = SliceLifecycle::spawn(uuid::Uuid::new_v4(), Duration::from_secs(300));
        let slice_id = lifecycle.slice_id();
        registry.register(lifecycle).await;
        assert_eq!(registry.snapshot_all().await.len(), 1);

        registry.unregister(slice_id).await;
        assert!(registry.snapshot_all().await.is_empty());

        dispatcher.abort();
        watchdog.abort();
    }
}
