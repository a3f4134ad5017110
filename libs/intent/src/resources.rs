//! `generate-resources(class, qos)`: a coarse compute/storage estimate for a
//! slice, derived from its service class and QoS profile. Downstream
//! placement (`mano-placement`) turns this into
//! per-VNF `ResourceRequest`s; this is the slice-level starting point.

use mano_types::qos::QosProfile;
use mano_types::ServiceClass;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResourceProfile {
    pub vcpu: u32,
    pub memory_mb: u32,
    pub storage_gb: u32,
    pub vnf_count: u32,
}

struct BaseProfile {
    vcpu: u32,
    memory_mb: u32,
    storage_gb: u32,
    vnf_count: u32,
}

fn base_for_class(class: ServiceClass) -> BaseProfile {
    match class {
        ServiceClass::Urllc => BaseProfile { vcpu: 4, memory_mb: 8192, storage_gb: 20, vnf_count: 3 },
        ServiceClass::Embb => BaseProfile { vcpu: 2, memory_mb: 4096, storage_gb: 10, vnf_count: 2 },
        ServiceClass::Mmtc => BaseProfile { vcpu: 1, memory_mb: 2048, storage_gb: 5, vnf_count: 2 },
        ServiceClass::Custom => BaseProfile { vcpu: 2, memory_mb: 4096, storage_gb: 10, vnf_count: 2 },
    }
}

/// Bandwidth-driven headroom: one extra vCPU and 1 GiB of memory per 10 Mbps
/// of committed bandwidth (target if set, else min), rounded up.
pub fn generate_resources(class: ServiceClass, qos: &QosProfile) -> ResourceProfile {
    let base = base_for_class(class);
    let committed_mbps = qos.bandwidth.target.or(qos.bandwidth.min).unwrap_or(0.0);
    let headroom_units = (committed_mbps / 10.0).ceil() as u32;

    ResourceProfile {
        vcpu: base.vcpu + headroom_units,
        memory_mb: base.memory_mb + headroom_units * 1024,
        storage_gb: base.storage_gb,
        vnf_count: base.vnf_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mano_types::qos::QosRequirement;

    #[test]
    fn mmtc_with_no_bandwidth_target_uses_base_profile() {
        let qos = QosProfile::default();
        let r = generate_resources(ServiceClass::Mmtc, &qos);
        assert_eq!(r.vcpu, 1);
        assert_eq!(r.memory_mb, 2048);
    }

    #[test]
    fn urllc_with_high_bandwidth_scales_up() {
        let mut qos = QosProfile::default();
        qos.bandwidth = QosRequirement::min_target(1.0, 25.0);
        let r = generate_resources(ServiceClass::Urllc, &qos);
        assert_eq!(r.vcpu, 4 + 3);
        assert_eq!(r.memory_mb, 8192 + 3 * 1024);
    }
}
