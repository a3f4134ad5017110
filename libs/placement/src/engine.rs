//! The placement engine's entry point: `place`.

use crate::requirements::{AffinityKind, AffinityRule, VnfRequirement};
use crate::scoring::{is_feasible, rank_sites};
use crate::vni_pool::VniPool;
use mano_config::PlacementConfig;
use mano_metrics::SiteMetricsProvider;
use mano_types::intent::{Constraint, ConstraintType};
use mano_types::placement::{ClusterPlacement, ConnectivityRequirement, PlacementDecision, VnfPlacement};
use mano_types::qos::QosProfile;
use mano_types::site::Site;
use mano_types::{ErrorKind, ManoError, Result, ServiceClass};
use std::collections::{BTreeMap, HashSet};

/// `true` if `site` clears every mandatory constraint (location, compliance,
/// security). Soft constraints never exclude a site here;
/// they only inform scoring indirectly through the caller's own weighting.
fn passes_hard_constraints(site: &Site, constraints: &[Constraint]) -> bool {
    constraints.iter().filter(|c| c.mandatory).all(|c| match c.kind {
        ConstraintType::Location => site.location.region.eq_ignore_ascii_case(&c.value),
        ConstraintType::Compliance => site.capabilities.iter().any(|cap| cap.eq_ignore_ascii_case(&c.value)),
        ConstraintType::Security => site.capabilities.contains("secure") || site.capabilities.contains("encrypted"),
        ConstraintType::Cost | ConstraintType::Latency | ConstraintType::Bandwidth | ConstraintType::Availability => true,
    })
}

fn site_satisfies_affinity(candidate_name: &str, assigned: &BTreeMap<String, String>, vnf_name: &str, rules: &[AffinityRule]) -> bool {
    for rule in rules {
        let (other_name, this_is_a) = if rule.vnf_a == vnf_name {
            (&rule.vnf_b, true)
        } else if rule.vnf_b == vnf_name {
            (&rule.vnf_a, false)
        } else {
            continue;
        };
        let _ = this_is_a;
        if let Some(other_site) = assigned.get(other_name) {
            match rule.kind {
                AffinityKind::Affinity if other_site != candidate_name => return false,
                AffinityKind::AntiAffinity if other_site == candidate_name => return false,
                _ => {}
            }
        }
    }
    true
}

/// Re-fetch and re-score any site whose metrics snapshot is older than
/// `staleness` before it's ranked. Without a provider (e.g. in tests, or
/// when the caller has no live metrics source) the snapshot already
/// attached to each `Site` is used as-is.
async fn refresh_stale_metrics(sites: Vec<Site>, staleness: std::time::Duration, provider: Option<&dyn SiteMetricsProvider>) -> Vec<Site> {
    let Some(provider) = provider else {
        return sites;
    };
    let max_age = match chrono::Duration::from_std(staleness) {
        Ok(d) => d,
        Err(_) => return sites,
    };

    let mut refreshed = Vec::with_capacity(sites.len());
    for mut site in sites {
        if site.metrics.age() > max_age {
            if let Some(fresh) = provider.get(&site.id).await {
                tracing::debug!(site = %site.id, "site metrics stale, re-scored from provider");
                site.metrics = fresh;
            }
        }
        refreshed.push(site);
    }
    refreshed
}

/// Assign every requirement in `vnfs` to exactly one feasible site, emit
/// inter-site connectivity requirements, and reserve a VNI. Returns
/// `infeasible-placement` if any requirement cannot be placed; no partial
/// placement is ever returned.
#[allow(clippy::too_many_arguments)]
pub async fn place(
    slice_id: uuid::Uuid,
    qos: &QosProfile,
    service_class: ServiceClass,
    constraints: &[Constraint],
    vnfs: &[VnfRequirement],
    affinity_rules: &[AffinityRule],
    sites: &[Site],
    config: &PlacementConfig,
    vni_pool: &VniPool,
    metrics_provider: Option<&dyn SiteMetricsProvider>,
) -> Result<PlacementDecision> {
    let hard_filtered: Vec<Site> = sites.iter().filter(|s| passes_hard_constraints(s, constraints)).cloned().collect();
    if hard_filtered.is_empty() {
        return Err(ManoError::infeasible("no site satisfies the slice's mandatory constraints"));
    }
    let hard_filtered = refresh_stale_metrics(hard_filtered, config.metrics_staleness, metrics_provider).await;

    let feasible: Vec<Site> = hard_filtered
        .into_iter()
        .filter(|s| is_feasible(s, qos, &config.site_caps, config.intra_site_slack_fraction))
        .collect();
    if feasible.is_empty() {
        return Err(ManoError::infeasible("no site meets QoS/utilization feasibility for this slice"));
    }

    let ranked = rank_sites(&feasible, qos, service_class, &config.weights);

    let mut assignment: BTreeMap<String, String> = BTreeMap::new(); // vnf name -> site id
    for vnf in vnfs {
        let chosen = ranked
            .iter()
            .find(|site| site_satisfies_affinity(&site.id, &assignment, &vnf.name, affinity_rules))
            .ok_or_else(|| ManoError::infeasible(format!("no feasible site satisfies affinity rules for vnf '{}'", vnf.name)))?;
        assignment.insert(vnf.name.clone(), chosen.id.clone());
    }

    let mut clusters: BTreeMap<String, ClusterPlacement> = BTreeMap::new();
    for vnf in vnfs {
        let site_id = assignment.get(&vnf.name).expect("every vnf was assigned above");
        let site = feasible.iter().find(|s| &s.id == site_id).expect("assigned site exists in feasible set");
        let entry = clusters.entry(site_id.clone()).or_insert_with(|| ClusterPlacement {
            cluster_name: site.id.clone(),
            cluster_type: site.site_type,
            vnfs: Vec::new(),
            connectivity: Vec::new(),
        });
        entry.vnfs.push(VnfPlacement {
            name: vnf.name.clone(),
            vnf_type: vnf.vnf_type,
            resource_request: vnf.resource_request.clone(),
            interfaces: Vec::new(),
            dependencies: vnf.dependencies.clone(),
        });
    }

    let chosen_sites: HashSet<&String> = assignment.values().collect();
    let committed_bandwidth = qos.bandwidth.target.or(qos.bandwidth.min).unwrap_or(0.0);
    let site_latency_budget = qos.latency.max.unwrap_or(0.0) * (1.0 - config.intra_site_slack_fraction);

    let mut connectivity = Vec::new();
    let mut sorted_sites: Vec<&String> = chosen_sites.into_iter().collect();
    sorted_sites.sort();
    for i in 0..sorted_sites.len() {
        for j in (i + 1)..sorted_sites.len() {
            connectivity.push(ConnectivityRequirement {
                from_cluster: sorted_sites[i].clone(),
                to_cluster: sorted_sites[j].clone(),
                bandwidth_mbps: committed_bandwidth,
                latency_ms: site_latency_budget,
            });
        }
    }
    for cluster in clusters.values_mut() {
        cluster.connectivity = connectivity.clone();
    }

    let vni = vni_pool.allocate()?;
    if vni < config.vni_range_start || vni >= config.vni_range_end {
        return Err(ManoError::new(ErrorKind::Internal, "allocated vni outside configured pool range"));
    }

    Ok(PlacementDecision { slice_id, clusters: clusters.into_values().collect(), vni })
}
