//! Turns a service class and an aggregate resource estimate into the named
//! VNF requirements the placement engine assigns one-by-one.

use mano_types::placement::{ResourceRequest, VnfType};
use mano_types::ServiceClass;

#[derive(Debug, Clone)]
pub struct VnfRequirement {
    pub name: String,
    pub vnf_type: VnfType,
    pub resource_request: ResourceRequest,
    pub dependencies: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AffinityKind {
    Affinity,
    AntiAffinity,
}

#[derive(Debug, Clone)]
pub struct AffinityRule {
    pub vnf_a: String,
    pub vnf_b: String,
    pub kind: AffinityKind,
}

fn split_resources(total_vcpu: u32, total_memory_mb: u32, total_storage_gb: u32, shares: u32) -> ResourceRequest {
    let shares = shares.max(1);
    ResourceRequest {
        vcpu: (total_vcpu / shares).max(1),
        memory_mb: (total_memory_mb / shares).max(256),
        storage_gb: (total_storage_gb / shares).max(1),
    }
}

/// The fixed VNF topology per service class: RAN, core, and transport.
/// Core is always deployed first; RAN and transport gateways depend on it.
pub fn default_vnf_requirements(class: ServiceClass, resources: &mano_intent::ResourceProfile) -> Vec<VnfRequirement> {
    let names: &[(&str, VnfType, &[&str])] = match class {
        ServiceClass::Urllc => &[
            ("upf", VnfType::Core, &[]),
            ("gnb-du", VnfType::Ran, &["upf"]),
            ("tn-gateway", VnfType::Transport, &["upf"]),
        ],
        ServiceClass::Embb => &[("upf", VnfType::Core, &[]), ("gnb-cu", VnfType::Ran, &["upf"])],
        ServiceClass::Mmtc => &[("upf", VnfType::Core, &[]), ("nb-iot-gw", VnfType::Ran, &["upf"])],
        ServiceClass::Custom => &[("upf", VnfType::Core, &[])],
    };

    names
        .iter()
        .map(|(name, vnf_type, deps)| VnfRequirement {
            name: name.to_string(),
            vnf_type: *vnf_type,
            resource_request: split_resources(resources.vcpu, resources.memory_mb, resources.storage_gb, names.len() as u32),
            dependencies: deps.iter().map(|d| d.to_string()).collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urllc_topology_has_transport_gateway() {
        let resources = mano_intent::ResourceProfile { vcpu: 7, memory_mb: 11264, storage_gb: 20, vnf_count: 3 };
        let reqs = default_vnf_requirements(ServiceClass::Urllc, &resources);
        assert_eq!(reqs.len(), 3);
        assert!(reqs.iter().any(|r| r.vnf_type == VnfType::Transport));
        let upf = reqs.iter().find(|r| r.name == "upf").unwrap();
        assert!(upf.dependencies.is_empty());
    }

    #[test]
    fn embb_topology_has_no_transport_vnf() {
        let resources = mano_intent::ResourceProfile { vcpu: 2, memory_mb: 4096, storage_gb: 10, vnf_count: 2 };
        let reqs = default_vnf_requirements(ServiceClass::Embb, &resources);
        assert!(!reqs.iter().any(|r| r.vnf_type == VnfType::Transport));
    }
}
