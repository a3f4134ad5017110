//! Agent registry: read-mostly map from cluster name to its client, an
//! `RwLock<HashMap<_, _>>` with a read path for lookups and a narrow write
//! path for registration.

use crate::client::TnAgentClient;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct AgentRegistry {
    agents: RwLock<HashMap<String, Arc<dyn TnAgentClient>>>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a client for `cluster`, verifying reachability first. A second
    /// registration for the same cluster replaces the prior client (spec
    /// §4.6: "duplicates replace").
    pub async fn register(&self, cluster: impl Into<String>, client: Arc<dyn TnAgentClient>) -> mano_types::Result<()> {
        client.connect().await?;
        self.agents.write().await.insert(cluster.into(), client);
        Ok(())
    }

    pub async fn get(&self, cluster: &str) -> Option<Arc<dyn TnAgentClient>> {
        self.agents.read().await.get(cluster).cloned()
    }

    pub async fn snapshot(&self) -> Vec<(String, Arc<dyn TnAgentClient>)> {
        self.agents.read().await.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    pub async fn len(&self) -> usize {
        self.agents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mano_types::tn::TnSlice;
    use mano_types::Result;
    use mano_wire::{AgentStatus, PerfMetrics, PerfTestConfig};
    use std::sync::atomic::{AtomicBool, Ordering};

    struct FakeClient {
        reachable: bool,
        connected: AtomicBool,
    }

    #[async_trait]
    impl TnAgentClient for FakeClient {
        async fn connect(&self) -> Result<()> {
            if self.reachable {
                self.connected.store(true, Ordering::SeqCst);
                Ok(())
            } else {
                Err(mano_types::ManoError::new(mano_types::ErrorKind::AgentUnreachable, "down"))
            }
        }
        async fn configure_slice(&self, _slice_id: uuid::Uuid, _config: TnSlice) -> Result<()> {
            Ok(())
        }
        async fn get_status(&self) -> Result<AgentStatus> {
            Ok(AgentStatus { cluster: "fake".into(), configured_slices: vec![], healthy: true })
        }
        async fn run_performance_test(&self, _config: PerfTestConfig) -> Result<PerfMetrics> {
            Ok(PerfMetrics { throughput_mbps: 1.0, rtt_ms: 1.0, deploy_time_ms: 1 })
        }
        async fn stop(&self) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn register_checks_reachability_before_storing() {
        let registry = AgentRegistry::new();
        let unreachable = Arc::new(FakeClient { reachable: false, connected: AtomicBool::new(false) });
        assert!(registry.register("site-a", unreachable).await.is_err());
        assert!(registry.get("site-a").await.is_none());
    }

    #[tokio::test]
    async fn second_registration_replaces_the_first() {
        let registry = AgentRegistry::new();
        let first = Arc::new(FakeClient { reachable: true, connected: AtomicBool::new(false) });
        let second = Arc::new(FakeClient { reachable: true, connected: AtomicBool::new(false) });
        registry.register("site-a", first).await.unwrap();
        registry.register("site-a", second).await.unwrap();
        assert_eq!(registry.len().await, 1);
    }
}
