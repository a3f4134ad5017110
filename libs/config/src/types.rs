//! Configuration record types covering the platform's recognized key surface.

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacementWeights {
    pub utilization: f64,
    pub latency: f64,
    pub type_match: f64,
}

impl Default for PlacementWeights {
    fn default() -> Self {
        Self { utilization: 0.4, latency: 0.4, type_match: 0.2 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteCaps {
    pub cpu_max_pct: f64,
    pub memory_max_pct: f64,
    pub storage_max_pct: f64,
}

impl Default for SiteCaps {
    fn default() -> Self {
        Self { cpu_max_pct: 85.0, memory_max_pct: 85.0, storage_max_pct: 90.0 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacementConfig {
    pub weights: PlacementWeights,
    pub site_caps: SiteCaps,
    /// Fraction of the latency budget reserved as intra-site slack when
    /// computing connectivity latency requirements.
    pub intra_site_slack_fraction: f64,
    /// Site metrics older than this are re-scored before a placement is
    /// emitted.
    #[serde(with = "duration_secs")]
    pub metrics_staleness: Duration,
    pub vni_range_start: u32,
    pub vni_range_end: u32,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            weights: PlacementWeights::default(),
            site_caps: SiteCaps::default(),
            intra_site_slack_fraction: 0.5,
            metrics_staleness: Duration::from_secs(30),
            vni_range_start: 2_000,
            vni_range_end: 16_777_215,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateMachineConfig {
    #[serde(with = "duration_secs")]
    pub state_timeout: Duration,
}

impl Default for StateMachineConfig {
    fn default() -> Self {
        Self { state_timeout: Duration::from_secs(300) }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryPolicy {
    #[serde(with = "duration_millis")]
    pub initial_delay: Duration,
    #[serde(with = "duration_millis")]
    pub max_delay: Duration,
    pub backoff_factor: f64,
    pub max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
            backoff_factor: 2.0,
            max_attempts: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VxlanConfig {
    pub mtu: u16,
    pub port: u16,
    pub vni_range: (u32, u32),
}

impl Default for VxlanConfig {
    fn default() -> Self {
        Self { mtu: 1450, port: 4789, vni_range: (2_000, 16_777_215) }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TcConfig {
    pub overhead_factor: f64,
}

impl Default for TcConfig {
    fn default() -> Self {
        Self { overhead_factor: 1.10 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThesisConfig {
    pub throughput_targets_mbps: Vec<f64>,
    pub rtt_targets_ms: Vec<f64>,
    pub deploy_target_ms: u64,
}

impl Default for ThesisConfig {
    fn default() -> Self {
        Self {
            throughput_targets_mbps: vec![0.93, 2.77, 4.57],
            rtt_targets_ms: vec![6.3, 15.7, 16.1],
            deploy_target_ms: 600_000,
        }
    }
}

/// The full, immutable configuration record for one process. Construct via
/// [`Config::load`] or [`Config::default`]; reconfigure by building a new
/// record and publishing it through a [`crate::SharedConfig`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub placement: PlacementConfig,
    pub state_machine: StateMachineConfig,
    pub retry: RetryPolicy,
    pub vxlan: VxlanConfig,
    pub tc: TcConfig,
    pub thesis: ThesisConfig,
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_secs(u64::deserialize(d)?))
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(d)?))
    }
}
