//! Atomic hot-swap for the config record: pass an immutable record at
//! construction; reconfigure by building a new record and atomically
//! swapping it in, publishing an event; in-flight operations keep seeing
//! the old record.

use crate::types::Config;
use arc_swap::ArcSwap;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Holds the live `Config` behind an atomic pointer swap. Cloning a
/// `SharedConfig` is cheap (it shares the same `ArcSwap`); call
/// [`SharedConfig::current`] once per operation rather than re-reading it
/// mid-operation, so that operation sees one consistent record.
#[derive(Clone)]
pub struct SharedConfig {
    inner: Arc<ArcSwap<Config>>,
    changes: Arc<broadcast::Sender<()>>,
}

impl SharedConfig {
    pub fn new(initial: Config) -> Self {
        let (tx, _) = broadcast::channel(8);
        Self { inner: Arc::new(ArcSwap::from_pointee(initial)), changes: Arc::new(tx) }
    }

    /// Snapshot the config record currently in effect.
    pub fn current(&self) -> Arc<Config> {
        self.inner.load_full()
    }

    /// Publish a new config record. Existing `Arc<Config>` snapshots held by
    /// in-flight operations are unaffected.
    pub fn replace(&self, new_config: Config) {
        self.inner.store(Arc::new(new_config));
        let _ = self.changes.send(());
    }

    /// Subscribe to be notified (not given the new value, just a tick) after
    /// each `replace`; call `current()` to fetch the fresh record.
    pub fn subscribe_changes(&self) -> broadcast::Receiver<()> {
        self.changes.subscribe()
    }
}

impl Default for SharedConfig {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replace_publishes_without_affecting_held_snapshot() {
        let shared = SharedConfig::default();
        let held = shared.current();
        assert_eq!(held.tc.overhead_factor, 1.10);

        let mut changed = (*shared.current()).clone();
        changed.tc.overhead_factor = 2.0;
        shared.replace(changed);

        assert_eq!(held.tc.overhead_factor, 1.10, "stale snapshot unaffected");
        assert_eq!(shared.current().tc.overhead_factor, 2.0);
    }
}
