//! Request/response message shapes for the TN agent RPC.

use mano_types::tn::TnSlice;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TnRequest {
    ConfigureSlice { slice_id: uuid::Uuid, config: TnSlice },
    GetStatus,
    RunPerformanceTest { config: PerfTestConfig },
    Stop,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TnResponse {
    Ack,
    Status(AgentStatus),
    PerfResult(PerfMetrics),
    Error(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerfTestConfig {
    pub slice_id: uuid::Uuid,
    pub duration_secs: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentStatus {
    pub cluster: String,
    pub configured_slices: Vec<uuid::Uuid>,
    pub healthy: bool,
}

/// One cluster's measured performance for a slice. The TN manager
/// aggregates one of these per agent into a single `PerfMetrics` (spec
/// §4.6: "mean of averages, max of peaks").
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PerfMetrics {
    pub throughput_mbps: f64,
    pub rtt_ms: f64,
    pub deploy_time_ms: u64,
}

impl PerfMetrics {
    /// Commutative aggregation across agent replies: mean of
    /// throughput, max of RTT (the worst-case path governs compliance), max
    /// of deploy time.
    pub fn aggregate(samples: &[PerfMetrics]) -> Option<PerfMetrics> {
        if samples.is_empty() {
            return None;
        }
        let n = samples.len() as f64;
        let throughput_mbps = samples.iter().map(|s| s.throughput_mbps).sum::<f64>() / n;
        let rtt_ms = samples.iter().map(|s| s.rtt_ms).fold(f64::MIN, f64::max);
        let deploy_time_ms = samples.iter().map(|s| s.deploy_time_ms).max().unwrap_or(0);
        Some(PerfMetrics { throughput_mbps, rtt_ms, deploy_time_ms })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregation_is_commutative_under_permutation() {
        let samples = vec![
            PerfMetrics { throughput_mbps: 5.0, rtt_ms: 5.5, deploy_time_ms: 100 },
            PerfMetrics { throughput_mbps: 3.0, rtt_ms: 15.0, deploy_time_ms: 400 },
            PerfMetrics { throughput_mbps: 4.7, rtt_ms: 16.0, deploy_time_ms: 250 },
        ];
        let forward = PerfMetrics::aggregate(&samples).unwrap();

        let mut reversed = samples.clone();
        reversed.reverse();
        let backward = PerfMetrics::aggregate(&reversed).unwrap();

        assert!((forward.throughput_mbps - backward.throughput_mbps).abs() < 1e-9);
        assert!((forward.rtt_ms - backward.rtt_ms).abs() < 1e-9);
        assert_eq!(forward.deploy_time_ms, backward.deploy_time_ms);
    }

    #[test]
    fn request_round_trips_through_bincode() {
        let req = TnRequest::GetStatus;
        let bytes = bincode::serialize(&req).unwrap();
        let decoded: TnRequest = bincode::deserialize(&bytes).unwrap();
        assert!(matches!(decoded, TnRequest::GetStatus));
    }
}
