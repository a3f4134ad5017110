//! Transport-network slice: the per-slice shape handed to TN agents.

use serde::{Deserialize, Serialize};
use std::net::IpAddr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndpointRole {
    Source,
    Destination,
    Transit,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TnEndpoint {
    pub node_name: String,
    pub ip: IpAddr,
    pub interface: String,
    pub role: EndpointRole,
}

/// A slice as seen by the transport network: VNI, QoS numbers in the units
/// TC and VXLAN care about, and the endpoint set forming the overlay mesh.
/// Invariants: at least 2 endpoints, all IPs valid and distinct.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TnSlice {
    pub slice_id: uuid::Uuid,
    pub vni: u32,
    pub bandwidth_mbps: f64,
    pub latency_ms: f64,
    pub jitter_ms: f64,
    pub packet_loss_pct: f64,
    pub priority: u8,
    pub endpoints: Vec<TnEndpoint>,
}

impl TnSlice {
    pub fn validate(&self) -> Result<(), String> {
        if self.endpoints.len() < 2 {
            return Err(format!("tn slice needs >= 2 endpoints, got {}", self.endpoints.len()));
        }
        let mut seen = std::collections::HashSet::new();
        for ep in &self.endpoints {
            if !seen.insert(ep.ip) {
                return Err(format!("duplicate endpoint IP {}", ep.ip));
            }
        }
        if !(1..=16_777_215).contains(&self.vni) {
            return Err(format!("vni {} out of range [1, 16777215]", self.vni));
        }
        if !(0.1..=10.0).contains(&self.bandwidth_mbps) {
            return Err(format!("bandwidth {} Mbps out of range [0.1, 10]", self.bandwidth_mbps));
        }
        if !(1.0..=100.0).contains(&self.latency_ms) {
            return Err(format!("latency {} ms out of range [1, 100]", self.latency_ms));
        }
        if !(0.0..=5.0).contains(&self.packet_loss_pct) {
            return Err(format!("packet loss {} out of range [0, 5]", self.packet_loss_pct));
        }
        if !(1..=10).contains(&self.priority) {
            return Err(format!("priority {} out of range [1, 10]", self.priority));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint(ip: &str) -> TnEndpoint {
        TnEndpoint {
            node_name: format!("node-{ip}"),
            ip: ip.parse().unwrap(),
            interface: "eth0".into(),
            role: EndpointRole::Source,
        }
    }

    fn base_slice(endpoints: Vec<TnEndpoint>) -> TnSlice {
        TnSlice {
            slice_id: uuid::Uuid::new_v4(),
            vni: 2000,
            bandwidth_mbps: 4.57,
            latency_ms: 16.1,
            jitter_ms: 2.0,
            packet_loss_pct: 0.1,
            priority: 5,
            endpoints,
        }
    }

    #[test]
    fn valid_slice_passes() {
        let slice = base_slice(vec![endpoint("10.0.0.1"), endpoint("10.0.0.2")]);
        assert!(slice.validate().is_ok());
    }

    #[test]
    fn single_endpoint_rejected() {
        let slice = base_slice(vec![endpoint("10.0.0.1")]);
        assert!(slice.validate().is_err());
    }

    #[test]
    fn duplicate_ip_rejected() {
        let slice = base_slice(vec![endpoint("10.0.0.1"), endpoint("10.0.0.1")]);
        assert!(slice.validate().is_err());
    }
}
