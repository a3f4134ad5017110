//! # Metrics Provider & Site Scoring (data side)
//!
//! `SiteMetricsProvider` is the read surface the placement engine and
//! orchestrator poll for live site load. `SyntheticMetricsProvider`
//! is the test/demo implementation: base values perturbed by random variance
//! and a slow time-based drift, with async subscriber dispatch on every
//! `tick`.

use async_trait::async_trait;
use mano_types::site::SiteMetrics;
use rand::Rng;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::{broadcast, RwLock};

#[async_trait]
pub trait SiteMetricsProvider: Send + Sync {
    async fn get(&self, site_id: &str) -> Option<SiteMetrics>;
    async fn get_all(&self) -> HashMap<String, SiteMetrics>;
    async fn subscribe(&self, site_id: &str) -> broadcast::Receiver<SiteMetrics>;
}

/// The steady-state values a synthetic site drifts and jitters around.
#[derive(Debug, Clone, Copy)]
pub struct BaseProfile {
    pub cpu_pct: f64,
    pub memory_pct: f64,
    pub available_bandwidth_mbps: f64,
    pub current_latency_ms: f64,
    pub active_slice_count: u32,
}

pub struct SyntheticMetricsProvider {
    bases: RwLock<HashMap<String, BaseProfile>>,
    current: RwLock<HashMap<String, SiteMetrics>>,
    subscribers: RwLock<HashMap<String, broadcast::Sender<SiteMetrics>>>,
    started_at: Instant,
    /// Fractional variance applied each tick, e.g. `0.1` = +/-10%.
    variance_fraction: f64,
    /// Linear degradation applied to cpu/memory/latency per second of
    /// uptime, simulating a site slowly saturating under sustained load.
    drift_per_sec: f64,
}

impl SyntheticMetricsProvider {
    pub fn new(variance_fraction: f64, drift_per_sec: f64) -> Self {
        Self {
            bases: RwLock::new(HashMap::new()),
            current: RwLock::new(HashMap::new()),
            subscribers: RwLock::new(HashMap::new()),
            started_at: Instant::now(),
            variance_fraction,
            drift_per_sec,
        }
    }

    pub async fn register_site(&self, site_id: impl Into<String>, base: BaseProfile) {
        let site_id = site_id.into();
        let snapshot = self.compute(&base);
        self.bases.write().await.insert(site_id.clone(), base);
        self.current.write().await.insert(site_id, snapshot);
    }

    fn jitter(&self, value: f64) -> f64 {
        let mut rng = rand::thread_rng();
        let spread = value * self.variance_fraction;
        value + rng.gen_range(-spread..=spread)
    }

    fn compute(&self, base: &BaseProfile) -> SiteMetrics {
        let elapsed_secs = self.started_at.elapsed().as_secs_f64();
        let drift = elapsed_secs * self.drift_per_sec;
        SiteMetrics::new(
            self.jitter(base.cpu_pct) + drift,
            self.jitter(base.memory_pct) + drift,
            (self.jitter(base.available_bandwidth_mbps) - drift).max(0.0),
            self.jitter(base.current_latency_ms) + drift * 0.1,
            base.active_slice_count,
        )
    }

    /// Recompute every registered site's metrics and publish to its
    /// subscribers. Sites with no subscribers still get a fresh snapshot;
    /// the `send` is best-effort (a closed channel just means "nobody's
    /// listening right now").
    pub async fn tick(&self) {
        let bases = self.bases.read().await.clone();
        let mut current = self.current.write().await;
        let subscribers = self.subscribers.read().await;

        for (site_id, base) in bases.iter() {
            let snapshot = self.compute(base);
            current.insert(site_id.clone(), snapshot.clone());
            if let Some(tx) = subscribers.get(site_id) {
                let _ = tx.send(snapshot);
            }
        }
    }

    /// Spawn a background task calling `tick` every `interval` until the
    /// returned handle is aborted or dropped by an aborting owner.
    pub fn spawn_ticker(self: std::sync::Arc<Self>, interval: Duration) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(interval).await;
                self.tick().await;
            }
        })
    }
}

#[async_trait]
impl SiteMetricsProvider for SyntheticMetricsProvider {
    async fn get(&self, site_id: &str) -> Option<SiteMetrics> {
        self.current.read().await.get(site_id).cloned()
    }

    async fn get_all(&self) -> HashMap<String, SiteMetrics> {
        self.current.read().await.clone()
    }

    async fn subscribe(&self, site_id: &str) -> broadcast::Receiver<SiteMetrics> {
        let mut subs = self.subscribers.write().await;
        subs.entry(site_id.to_string()).or_insert_with(|| broadcast::channel(32).0).subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> BaseProfile {
        BaseProfile { cpu_pct: 40.0, memory_pct: 50.0, available_bandwidth_mbps: 100.0, current_latency_ms: 5.0, active_slice_count: 3 }
    }

    #[tokio::test]
    async fn get_returns_none_for_unregistered_site() {
        let provider = SyntheticMetricsProvider::new(0.1, 0.0);
        assert!(provider.get("edge-1").await.is_none());
    }

    #[tokio::test]
    async fn registered_site_metrics_are_clamped() {
        let provider = SyntheticMetricsProvider::new(0.5, 0.0);
        provider.register_site("edge-1", base()).await;
        let metrics = provider.get("edge-1").await.unwrap();
        assert!((0.0..=100.0).contains(&metrics.cpu_pct));
        assert!(metrics.available_bandwidth_mbps >= 0.0);
    }

    #[tokio::test]
    async fn subscriber_receives_tick_updates() {
        let provider = std::sync::Arc::new(SyntheticMetricsProvider::new(0.0, 0.0));
        provider.register_site("edge-1", base()).await;
        let mut rx = provider.subscribe("edge-1").await;

        provider.tick().await;

        let update = rx.recv().await.unwrap();
        assert_eq!(update.active_slice_count, 3);
    }

    #[tokio::test]
    async fn get_all_contains_every_registered_site() {
        let provider = SyntheticMetricsProvider::new(0.1, 0.0);
        provider.register_site("edge-1", base()).await;
        provider.register_site("regional-1", base()).await;
        let all = provider.get_all().await;
        assert_eq!(all.len(), 2);
    }
}
