//! Fault detection: synthesizes `mano_types::fault::NetworkFault` records
//! from performance-test results, site metrics, and agent reachability by
//! comparing each measurement against a configured threshold and emitting a
//! fault when it's crossed.

use mano_types::fault::{FaultType, NetworkFault, Severity};
use mano_types::site::SiteMetrics;
use mano_wire::PerfMetrics;
use parking_lot::Mutex;
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy)]
pub struct FaultThresholds {
    pub high_latency_ms: f64,
    pub packet_loss_pct: f64,
    pub low_bandwidth_mbps: f64,
}

impl Default for FaultThresholds {
    fn default() -> Self {
        Self { high_latency_ms: 50.0, packet_loss_pct: 1.0, low_bandwidth_mbps: 1.0 }
    }
}

pub struct FaultDetector {
    thresholds: FaultThresholds,
    max_history: usize,
    history: Mutex<VecDeque<NetworkFault>>,
}

impl FaultDetector {
    pub fn new(thresholds: FaultThresholds, max_history: usize) -> Self {
        Self { thresholds, max_history, history: Mutex::new(VecDeque::with_capacity(max_history)) }
    }

    fn record(&self, fault: NetworkFault) -> NetworkFault {
        let mut history = self.history.lock();
        if history.len() >= self.max_history {
            history.pop_front();
        }
        history.push_back(fault.clone());
        fault
    }

    pub fn inspect_reachability(&self, node: &str, reachable: bool) -> Option<NetworkFault> {
        if reachable {
            return None;
        }
        Some(self.record(NetworkFault::new(FaultType::NodeUnreachable, Severity::Critical, node, format!("{node} did not respond to the agent RPC"))))
    }

    pub fn inspect_performance(&self, node: &str, perf: &PerfMetrics) -> Option<NetworkFault> {
        if perf.rtt_ms <= self.thresholds.high_latency_ms {
            return None;
        }
        Some(self.record(NetworkFault::new(
            FaultType::HighLatency,
            Severity::High,
            node,
            format!("measured RTT {:.2}ms exceeds threshold {:.2}ms", perf.rtt_ms, self.thresholds.high_latency_ms),
        )))
    }

    pub fn inspect_packet_loss(&self, node: &str, packet_loss_pct: f64) -> Option<NetworkFault> {
        if packet_loss_pct <= self.thresholds.packet_loss_pct {
            return None;
        }
        Some(self.record(NetworkFault::new(
            FaultType::PacketLoss,
            Severity::High,
            node,
            format!("measured packet loss {:.2}% exceeds threshold {:.2}%", packet_loss_pct, self.thresholds.packet_loss_pct),
        )))
    }

    pub fn inspect_site(&self, node: &str, site: &SiteMetrics) -> Option<NetworkFault> {
        if site.available_bandwidth_mbps >= self.thresholds.low_bandwidth_mbps {
            return None;
        }
        Some(self.record(NetworkFault::new(
            FaultType::BandwidthSaturation,
            Severity::Medium,
            node,
            format!("available bandwidth {:.2}Mbps below threshold {:.2}Mbps", site.available_bandwidth_mbps, self.thresholds.low_bandwidth_mbps),
        )))
    }

    pub fn history(&self) -> Vec<NetworkFault> {
        self.history.lock().iter().cloned().collect()
    }

    pub fn active_faults(&self) -> Vec<NetworkFault> {
        self.history.lock().iter().filter(|f| !f.is_resolved()).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreachable_node_raises_a_critical_fault() {
        let detector = FaultDetector::new(FaultThresholds::default(), 16);
        let fault = detector.inspect_reachability("edge-1", false).unwrap();
        assert_eq!(fault.fault_type, FaultType::NodeUnreachable);
        assert_eq!(fault.severity, Severity::Critical);
    }

    #[test]
    fn reachable_node_raises_nothing() {
        let detector = FaultDetector::new(FaultThresholds::default(), 16);
        assert!(detector.inspect_reachability("edge-1", true).is_none());
    }

    #[test]
    fn high_rtt_raises_high_latency_fault() {
        let detector = FaultDetector::new(FaultThresholds::default(), 16);
        let perf = PerfMetrics { throughput_mbps: 5.0, rtt_ms: 120.0, deploy_time_ms: 1000 };
        let fault = detector.inspect_performance("edge-1", &perf).unwrap();
        assert_eq!(fault.fault_type, FaultType::HighLatency);
    }

    #[test]
    fn history_is_bounded() {
        let detector = FaultDetector::new(FaultThresholds::default(), 2);
        for _ in 0..5 {
            detector.inspect_reachability("edge-1", false);
        }
        assert_eq!(detector.history().len(), 2);
    }

    #[test]
    fn resolved_faults_drop_out_of_active_faults() {
        let detector = FaultDetector::new(FaultThresholds::default(), 16);
        detector.inspect_reachability("edge-1", false);
        assert_eq!(detector.active_faults().len(), 1);

        let mut history = detector.history.lock();
        history[0].resolve("restarted agent process");
        drop(history);
        assert!(detector.active_faults().is_empty());
    }
}
