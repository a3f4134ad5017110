//! Placement decision: the output of the placement engine.

use crate::site::SiteType;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VnfType {
    Ran,
    Core,
    Transport,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceRequest {
    pub vcpu: u32,
    pub memory_mb: u32,
    pub storage_gb: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VnfPlacement {
    pub name: String,
    pub vnf_type: VnfType,
    pub resource_request: ResourceRequest,
    pub interfaces: Vec<String>,
    /// Names of VNFs this one depends on. Invariant: every named dependency
    /// appears earlier in the enclosing cluster placement's deployment
    /// order.
    pub dependencies: Vec<String>,
}

/// Required connectivity between two chosen clusters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectivityRequirement {
    pub from_cluster: String,
    pub to_cluster: String,
    pub bandwidth_mbps: f64,
    pub latency_ms: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterPlacement {
    pub cluster_name: String,
    pub cluster_type: SiteType,
    pub vnfs: Vec<VnfPlacement>,
    pub connectivity: Vec<ConnectivityRequirement>,
}

/// Assignment of every slice component to exactly one cluster, plus the
/// inter-cluster connectivity it requires. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacementDecision {
    pub slice_id: uuid::Uuid,
    pub clusters: Vec<ClusterPlacement>,
    pub vni: u32,
}

impl PlacementDecision {
    /// Deployment order respects every VNF's `dependencies` (spec invariant,
    /// §3). Returns the VNFs across all clusters in an order where every
    /// dependency precedes its dependent, or `None` if the dependency graph
    /// contains an unresolvable cycle or a reference to an unknown VNF.
    pub fn deployment_order(&self) -> Option<Vec<&VnfPlacement>> {
        let all: Vec<&VnfPlacement> = self.clusters.iter().flat_map(|c| c.vnfs.iter()).collect();
        let mut resolved: Vec<&str> = Vec::new();
        let mut ordered: Vec<&VnfPlacement> = Vec::new();
        let mut remaining: Vec<&VnfPlacement> = all;

        while !remaining.is_empty() {
            let before = remaining.len();
            remaining.retain(|vnf| {
                let ready = vnf.dependencies.iter().all(|d| resolved.contains(&d.as_str()));
                if ready {
                    resolved.push(&vnf.name);
                    ordered.push(vnf);
                }
                !ready
            });
            if remaining.len() == before {
                return None;
            }
        }
        Some(ordered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vnf(name: &str, deps: &[&str]) -> VnfPlacement {
        VnfPlacement {
            name: name.to_string(),
            vnf_type: VnfType::Core,
            resource_request: ResourceRequest::default(),
            interfaces: vec![],
            dependencies: deps.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn deployment_order_respects_dependencies() {
        let decision = PlacementDecision {
            slice_id: uuid::Uuid::new_v4(),
            vni: 2000,
            clusters: vec![ClusterPlacement {
                cluster_name: "edge-1".into(),
                cluster_type: SiteType::Edge,
                vnfs: vec![vnf("upf", &["amf"]), vnf("amf", &[])],
                connectivity: vec![],
            }],
        };
        let order = decision.deployment_order().expect("acyclic graph");
        let names: Vec<&str> = order.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["amf", "upf"]);
    }

    #[test]
    fn deployment_order_detects_cycle() {
        let decision = PlacementDecision {
            slice_id: uuid::Uuid::new_v4(),
            vni: 2000,
            clusters: vec![ClusterPlacement {
                cluster_name: "edge-1".into(),
                cluster_type: SiteType::Edge,
                vnfs: vec![vnf("a", &["b"]), vnf("b", &["a"])],
                connectivity: vec![],
            }],
        };
        assert!(decision.deployment_order().is_none());
    }
}
