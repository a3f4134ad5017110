//! Slice runtime state: the mutable record owned exclusively by a slice's
//! lifecycle state machine.

use crate::qos::QosProfile;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Lifecycle states, exhaustive over the transition table. Ordering in the
/// enum is declaration order only; it carries no transition meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SliceState {
    Initializing,
    Validating,
    Pending,
    Planning,
    Planned,
    Deploying,
    Deployed,
    Active,
    ValidationFailed,
    PlanningFailed,
    DeploymentFailed,
    RollingBack,
    RolledBack,
    Terminating,
    Terminated,
}

impl SliceState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SliceState::Terminated)
    }
}

/// VXLAN segment configuration for a slice's overlay. VNI is unique per
/// active slice; enforced by the allocator, not here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VxlanConfig {
    pub vni: u32,
    pub mtu: u16,
    pub multicast_ip: Option<std::net::IpAddr>,
    pub subnets: Vec<String>,
    pub encryption_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tunnel {
    pub node: String,
    pub interface: String,
    pub remote_ips: Vec<std::net::IpAddr>,
}

/// Read-only snapshot of a slice's mutable runtime state. External queries
/// (status GET) consume a clone of this; only the owning state machine
/// mutates the live copy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SliceRuntimeState {
    pub slice_id: uuid::Uuid,
    pub state: SliceState,
    pub vxlan: Option<VxlanConfig>,
    pub qos: QosProfile,
    pub tunnels: Vec<Tunnel>,
    pub measured_metrics: Option<crate::site::SiteMetrics>,
    pub endpoint_status: HashMap<String, String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub metadata: HashMap<String, String>,
}

impl SliceRuntimeState {
    pub fn new(slice_id: uuid::Uuid, qos: QosProfile) -> Self {
        let now = chrono::Utc::now();
        Self {
            slice_id,
            state: SliceState::Initializing,
            vxlan: None,
            qos,
            tunnels: Vec::new(),
            measured_metrics: None,
            endpoint_status: HashMap::new(),
            created_at: now,
            updated_at: now,
            metadata: HashMap::new(),
        }
    }
}
