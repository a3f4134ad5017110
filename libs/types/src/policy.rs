//! Network policy: the isolation/QoS/security envelope attached to a
//! slice's VXLAN segment.

use serde::{Deserialize, Serialize};
use std::net::IpAddr;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VxlanSegment {
    pub vni: u32,
    pub mtu: u16,
    pub multicast_ip: Option<IpAddr>,
    pub subnets: Vec<String>,
    pub encryption_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BandwidthPolicy {
    pub guaranteed_mbps: f64,
    pub ceiling_mbps: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecurityPolicy {
    pub encrypted: bool,
    pub allowed_sources: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoutingPolicy {
    pub preferred_paths: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkPolicy {
    pub slice_isolation: bool,
    pub vxlan: VxlanSegment,
    pub bandwidth: BandwidthPolicy,
    pub security: SecurityPolicy,
    pub routing: RoutingPolicy,
}
