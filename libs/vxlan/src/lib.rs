//! # VXLAN Orchestrator
//!
//! For a VNI and an endpoint set, emits the exact, deterministic sequence of
//! host-side operations needed to establish the overlay mesh.
//! Every function here is pure: same inputs, same command strings, every
//! time and on every host — execution of the commands is the TN agent's
//! concern, not this crate's.

use mano_types::tn::TnEndpoint;
use mano_types::{ErrorKind, ManoError, Result};
use std::collections::HashSet;
use std::net::IpAddr;

const DEFAULT_MTU: u32 = 1450;
const VXLAN_UDP_PORT: u16 = 4789;

/// One node's share of the overlay mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct TunnelPlan {
    pub node_name: String,
    pub interface: String,
    pub local_ip: IpAddr,
    pub remote_ips: Vec<IpAddr>,
    pub mtu: u32,
    pub udp_port: u16,
    pub overlay_ip: String,
    pub commands: Vec<String>,
}

/// Fail when fewer than 2 endpoints, any interface is empty, or any two
/// endpoints share an IP. IP malformedness can't occur here because
/// `TnEndpoint::ip` is already a parsed `IpAddr`; a string-typed caller
/// should reject unparsed input before reaching this contract.
pub fn validate_endpoints(endpoints: &[TnEndpoint]) -> Result<()> {
    if endpoints.len() < 2 {
        return Err(ManoError::new(
            ErrorKind::InvalidInput,
            format!("need at least 2 endpoints, got {}", endpoints.len()),
        ));
    }
    if endpoints.iter().any(|e| e.interface.trim().is_empty()) {
        return Err(ManoError::new(ErrorKind::InvalidInput, "endpoint interface must not be empty"));
    }
    let mut seen = HashSet::new();
    for ep in endpoints {
        if !seen.insert(ep.ip) {
            return Err(ManoError::new(ErrorKind::InvalidInput, format!("duplicate endpoint IP {}", ep.ip)));
        }
    }
    Ok(())
}

/// Deterministic overlay IP plan: `10.<(vni/256)%256>.<vni%256>.<last octet of node IP>/24`.
pub fn overlay_ip(vni: u32, node_ip: IpAddr) -> String {
    let third = (vni / 256) % 256;
    let fourth = vni % 256;
    let last_octet = match node_ip {
        IpAddr::V4(v4) => v4.octets()[3],
        IpAddr::V6(v6) => *v6.octets().last().unwrap(),
    };
    format!("10.{third}.{fourth}.{last_octet}/24")
}

fn interface_name(vni: u32) -> String {
    format!("vxlan{vni}")
}

fn tunnel_commands(iface: &str, vni: u32, local_ip: IpAddr, remotes: &[IpAddr], parent_if: &str, mtu: u32, overlay: &str) -> Vec<String> {
    let mut cmds = Vec::new();

    // (a) idempotent delete of any pre-existing interface of the same name.
    cmds.push(format!("ip link del {iface} 2>/dev/null || true"));

    // (b) create, bound to VNI/local IP/dstport/parent interface.
    if remotes.is_empty() {
        cmds.push(format!(
            "ip link add {iface} type vxlan id {vni} local {local_ip} dstport {VXLAN_UDP_PORT} dev {parent_if} nolearning"
        ));
    } else {
        cmds.push(format!(
            "ip link add {iface} type vxlan id {vni} local {local_ip} dstport {VXLAN_UDP_PORT} dev {parent_if}"
        ));
        for remote in remotes {
            cmds.push(format!("bridge fdb append 00:00:00:00:00:00 dev {iface} dst {remote}"));
        }
    }

    // (c) MTU, (d) bring up.
    cmds.push(format!("ip link set {iface} mtu {mtu}"));
    cmds.push(format!("ip link set {iface} up"));

    // (e) assign overlay IP.
    cmds.push(format!("ip addr add {overlay} dev {iface}"));

    // (f) proxy-ARP on, reverse-path filter off.
    cmds.push(format!("sysctl -w net.ipv4.conf.{iface}.proxy_arp=1"));
    cmds.push(format!("sysctl -w net.ipv4.conf.{iface}.rp_filter=0"));

    cmds
}

/// Build one `TunnelPlan` per node in `endpoints`, for the mesh identified
/// by `vni`. Every node's remote set is every other node's IP.
pub fn build_tunnels(vni: u32, endpoints: &[TnEndpoint]) -> Result<Vec<TunnelPlan>> {
    validate_endpoints(endpoints)?;

    let iface = interface_name(vni);
    let mut plans = Vec::with_capacity(endpoints.len());

    for ep in endpoints {
        let remote_ips: Vec<IpAddr> = endpoints.iter().filter(|other| other.ip != ep.ip).map(|other| other.ip).collect();
        let overlay = overlay_ip(vni, ep.ip);
        let commands = tunnel_commands(&iface, vni, ep.ip, &remote_ips, &ep.interface, DEFAULT_MTU, &overlay);

        plans.push(TunnelPlan {
            node_name: ep.node_name.clone(),
            interface: iface.clone(),
            local_ip: ep.ip,
            remote_ips,
            mtu: DEFAULT_MTU,
            udp_port: VXLAN_UDP_PORT,
            overlay_ip: overlay,
            commands,
        });
    }

    Ok(plans)
}

/// Teardown commands for a VNI's overlay interface, regardless of node.
pub fn build_cleanup(vni: u32) -> Vec<String> {
    let iface = interface_name(vni);
    vec![
        format!("ip link set {iface} down 2>/dev/null || true"),
        format!("ip link del {iface} 2>/dev/null || true"),
    ]
}
