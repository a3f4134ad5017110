//! Feasibility filtering and weighted scoring.

use mano_config::{PlacementWeights, SiteCaps};
use mano_types::qos::QosProfile;
use mano_types::site::{Site, SiteType};
use mano_types::ServiceClass;

/// Preferred site type per service class; `mMTC` is indifferent so every
/// site type scores the same for type-match.
fn preferred_site_type(class: ServiceClass) -> Option<SiteType> {
    match class {
        ServiceClass::Urllc => Some(SiteType::Edge),
        ServiceClass::Embb => Some(SiteType::Regional),
        ServiceClass::Mmtc | ServiceClass::Custom => None,
    }
}

/// `true` if `site` clears the hard feasibility bar: sufficient bandwidth,
/// latency headroom (reserving `intra_site_slack_fraction` of the budget for
/// inter-site hops), and within the configured utilization caps.
pub fn is_feasible(site: &Site, qos: &QosProfile, caps: &SiteCaps, intra_site_slack_fraction: f64) -> bool {
    if !site.is_feasible(caps.cpu_max_pct, caps.memory_max_pct) {
        return false;
    }
    if let Some(min_bw) = qos.bandwidth.min {
        if site.metrics.available_bandwidth_mbps < min_bw {
            return false;
        }
    }
    if let Some(max_latency) = qos.latency.max {
        let site_budget = max_latency * (1.0 - intra_site_slack_fraction);
        if site.metrics.current_latency_ms > site_budget {
            return false;
        }
    }
    true
}

/// Weighted feasibility score; higher is better. Deterministic given equal
/// inputs — callers break ties by site id.
pub fn score_site(site: &Site, qos: &QosProfile, class: ServiceClass, weights: &PlacementWeights) -> f64 {
    let utilization = (site.metrics.cpu_pct + site.metrics.memory_pct) / 200.0;
    let utilization_score = 1.0 - utilization;

    let latency_score = match qos.latency.max {
        Some(max) if max > 0.0 => (1.0 - site.metrics.current_latency_ms / max).clamp(0.0, 1.0),
        _ => 1.0,
    };

    let type_match_score = match preferred_site_type(class) {
        Some(preferred) if preferred == site.site_type => 1.0,
        Some(_) => 0.5,
        None => 1.0,
    };

    weights.utilization * utilization_score + weights.latency * latency_score + weights.type_match * type_match_score
}

/// Rank feasible sites best-first; ties broken by ascending site id (spec
/// §4.2 step 3: "deterministic tie-break: prefer site whose id sorts
/// earliest").
pub fn rank_sites<'a>(sites: &'a [Site], qos: &QosProfile, class: ServiceClass, weights: &PlacementWeights) -> Vec<&'a Site> {
    let mut scored: Vec<(&Site, f64)> = sites.iter().map(|s| (s, score_site(s, qos, class, weights))).collect();
    scored.sort_by(|(site_a, score_a), (site_b, score_b)| {
        score_b.partial_cmp(score_a).unwrap_or(std::cmp::Ordering::Equal).then_with(|| site_a.id.cmp(&site_b.id))
    });
    scored.into_iter().map(|(site, _)| site).collect()
}
