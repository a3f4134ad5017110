//! Cluster/site inventory and live metrics snapshot.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SiteType {
    Edge,
    Regional,
    Central,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub region: String,
}

/// A point-in-time measurement of a site's load. Invariants:
/// `cpu_pct`/`memory_pct` clamped to `[0, 100]`; `available_bandwidth_mbps`
/// and `current_latency_ms` non-negative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteMetrics {
    pub cpu_pct: f64,
    pub memory_pct: f64,
    pub available_bandwidth_mbps: f64,
    pub current_latency_ms: f64,
    pub active_slice_count: u32,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl SiteMetrics {
    pub fn new(
        cpu_pct: f64,
        memory_pct: f64,
        available_bandwidth_mbps: f64,
        current_latency_ms: f64,
        active_slice_count: u32,
    ) -> Self {
        Self {
            cpu_pct: cpu_pct.clamp(0.0, 100.0),
            memory_pct: memory_pct.clamp(0.0, 100.0),
            available_bandwidth_mbps: available_bandwidth_mbps.max(0.0),
            current_latency_ms: current_latency_ms.max(0.0),
            active_slice_count,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn age(&self) -> chrono::Duration {
        chrono::Utc::now() - self.timestamp
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Site {
    pub id: String,
    pub site_type: SiteType,
    pub location: GeoLocation,
    pub capabilities: HashSet<String>,
    pub metrics: SiteMetrics,
}

impl Site {
    pub fn is_feasible(&self, cpu_max_pct: f64, memory_max_pct: f64) -> bool {
        self.metrics.cpu_pct <= cpu_max_pct && self.metrics.memory_pct <= memory_max_pct
    }
}
