//! Wires the intent parser, placement engine, slice lifecycle state machine
//! and TN manager into one request: text in, a `SliceReport` out.

use mano_actors::{SliceEvent, SliceLifecycle};
use mano_config::Config;
use mano_intent::IntentParser;
use mano_metrics::SiteMetricsProvider;
use mano_placement::{default_vnf_requirements, place, VniPool};
use mano_tn_manager::TnManager;
use mano_types::intent::ConstraintType;
use mano_types::policy::{BandwidthPolicy, NetworkPolicy, RoutingPolicy, SecurityPolicy, VxlanSegment};
use mano_types::{ErrorKind, ManoError, Priority, Result, ServiceClass, SliceState};
use serde::Serialize;
use std::sync::Arc;

use crate::sites::SiteCatalog;

#[derive(Debug, Clone, Serialize)]
pub struct SliceReport {
    pub slice_id: uuid::Uuid,
    pub service_class: ServiceClass,
    pub confidence: f64,
    pub vni: u32,
    pub clusters: Vec<String>,
    pub final_state: SliceState,
    pub compliance: Option<mano_tn_manager::ComplianceReport>,
    pub network_policy: Option<NetworkPolicy>,
}

fn priority_to_tc(priority: Priority) -> u8 {
    match priority {
        Priority::Low => 2,
        Priority::Medium => 5,
        Priority::High => 7,
        Priority::Critical => 10,
    }
}

/// Assemble the isolation/QoS/security envelope for an activated slice's
/// VXLAN segment from its placement decision, TN tunnel plan and intent.
fn network_policy(intent: &mano_types::Intent, placement: &mano_types::placement::PlacementDecision, tunnels: &[mano_vxlan::TunnelPlan], cluster_names: &[String]) -> NetworkPolicy {
    let encrypted = intent.constraints.iter().any(|c| c.kind == ConstraintType::Security);
    let guaranteed = intent.qos_profile.bandwidth.min.or(intent.qos_profile.bandwidth.target).unwrap_or(0.0);
    let ceiling = intent.qos_profile.bandwidth.target.or(intent.qos_profile.bandwidth.min).unwrap_or(guaranteed);

    NetworkPolicy {
        slice_isolation: true,
        vxlan: VxlanSegment {
            vni: placement.vni,
            mtu: tunnels.first().map(|t| t.mtu as u16).unwrap_or(1450),
            multicast_ip: None,
            subnets: tunnels.iter().map(|t| t.overlay_ip.clone()).collect(),
            encryption_key: None,
        },
        bandwidth: BandwidthPolicy { guaranteed_mbps: guaranteed, ceiling_mbps: ceiling.max(guaranteed) },
        security: SecurityPolicy { encrypted, allowed_sources: cluster_names.to_vec() },
        routing: RoutingPolicy { preferred_paths: cluster_names.to_vec() },
    }
}

/// Run one intent end to end: parse, admit, place, deploy (VXLAN/TC plans
/// computed and logged, slice configuration fanned out to TN agents), and
/// activate. Every failure after the lifecycle is spawned drives it into
/// its matching failure state before returning the error, so a caller that
/// only sees `Err` still knows the slice's state machine ended somewhere
/// consistent rather than hanging in an intermediate state.
pub async fn run_intent(
    text: &str,
    config: Arc<Config>,
    catalog: &SiteCatalog,
    vni_pool: &VniPool,
    tn_manager: &TnManager,
    metrics_provider: Option<&dyn SiteMetricsProvider>,
) -> Result<SliceReport> {
    let parser = IntentParser::new();
    let intent = parser.parse(text, None).await?;

    let validation = parser.validate(&intent);
    if !validation.is_admission_acceptable() {
        let reasons: Vec<String> = validation.issues.iter().filter(|i| i.critical).map(|i| i.message.clone()).collect();
        return Err(ManoError::invalid_input(format!("intent failed admission: {}", reasons.join("; "))));
    }

    let (lifecycle, dispatcher, watchdog) = SliceLifecycle::spawn(intent.id, config.state_machine.state_timeout);
    let result = drive(&intent, &parser, &lifecycle, config, catalog, vni_pool, tn_manager, metrics_provider).await;
    dispatcher.abort();
    watchdog.abort();
    result
}

#[allow(clippy::too_many_arguments)]
async fn drive(
    intent: &mano_types::Intent,
    parser: &IntentParser,
    lifecycle: &Arc<SliceLifecycle>,
    config: Arc<Config>,
    catalog: &SiteCatalog,
    vni_pool: &VniPool,
    tn_manager: &TnManager,
    metrics_provider: Option<&dyn SiteMetricsProvider>,
) -> Result<SliceReport> {
    lifecycle.send(SliceEvent::Validate)?;
    lifecycle.send(SliceEvent::ValidationSuccess)?;
    lifecycle.send(SliceEvent::Plan)?;

    let resources = parser.generate_resources(intent.service_class, &intent.qos_profile);
    let vnfs = default_vnf_requirements(intent.service_class, &resources);

    let placement = match place(
        intent.id,
        &intent.qos_profile,
        intent.service_class,
        &intent.constraints,
        &vnfs,
        &[],
        &catalog.sites,
        &config.placement,
        vni_pool,
        metrics_provider,
    )
    .await
    {
        Ok(decision) => {
            lifecycle.send(SliceEvent::PlanningSuccess)?;
            decision
        }
        Err(err) => {
            let _ = lifecycle.send(SliceEvent::PlanningFailure);
            return Err(err);
        }
    };

    lifecycle.send(SliceEvent::Deploy)?;

    let cluster_names: Vec<String> = placement.clusters.iter().map(|c| c.cluster_name.clone()).collect();
    let endpoints = catalog.endpoints_for(&cluster_names);
    let mut policy = None;

    if endpoints.len() >= 2 {
        let tunnels = match mano_vxlan::build_tunnels(placement.vni, &endpoints) {
            Ok(plans) => plans,
            Err(err) => {
                let _ = lifecycle.send(SliceEvent::DeploymentFailure);
                return Err(err);
            }
        };
        for plan in &tunnels {
            tracing::debug!(node = %plan.node_name, commands = plan.commands.len(), "vxlan tunnel plan built");
        }
        policy = Some(network_policy(intent, &placement, &tunnels, &cluster_names));

        let iface = tunnels[0].interface.clone();
        let bandwidth = intent.qos_profile.bandwidth.target.or(intent.qos_profile.bandwidth.min).unwrap_or(1.0);
        let latency = intent.qos_profile.latency.max.unwrap_or(50.0);
        let jitter = intent.qos_profile.jitter.max.or(intent.qos_profile.jitter.target);
        let loss = intent.qos_profile.packet_loss.max;
        let priority = priority_to_tc(intent.priority);

        match mano_tc::build_plan(&iface, bandwidth, latency, jitter, loss, priority) {
            Ok(plan) => tracing::debug!(rate_kbit = plan.adjusted_rate_kbit, "tc plan built"),
            Err(err) => {
                let _ = lifecycle.send(SliceEvent::DeploymentFailure);
                return Err(err);
            }
        }

        let tn_slice = mano_types::tn::TnSlice {
            slice_id: intent.id,
            vni: placement.vni,
            bandwidth_mbps: bandwidth.clamp(0.1, 10.0),
            latency_ms: latency.clamp(1.0, 100.0),
            jitter_ms: jitter.unwrap_or(0.0),
            packet_loss_pct: loss.unwrap_or(0.0).clamp(0.0, 5.0),
            priority,
            endpoints,
        };
        if let Err(message) = tn_slice.validate() {
            let _ = lifecycle.send(SliceEvent::DeploymentFailure);
            return Err(ManoError::invalid_input(message));
        }

        if let Err(err) = tn_manager.configure_slice(intent.id, tn_slice).await {
            let _ = lifecycle.send(SliceEvent::DeploymentFailure);
            return Err(err);
        }
    } else {
        tracing::warn!(clusters = cluster_names.len(), "fewer than 2 endpoints resolved, skipping vxlan/tc/tn-manager deploy");
    }

    lifecycle.send(SliceEvent::DeploymentSuccess)?;
    lifecycle.send(SliceEvent::Activate)?;

    let compliance = match tn_manager
        .run_performance_test(mano_wire::PerfTestConfig { slice_id: intent.id, duration_secs: 10 })
        .await
    {
        Ok((_metrics, report)) => Some(report),
        Err(err) if err.is_kind(ErrorKind::Internal) => None, // no agents registered to sample
        Err(err) => {
            tracing::warn!(%err, "post-activation performance test failed, reporting without a compliance score");
            None
        }
    };

    Ok(SliceReport {
        slice_id: intent.id,
        service_class: intent.service_class,
        confidence: intent.confidence,
        vni: placement.vni,
        clusters: cluster_names,
        final_state: lifecycle.current_state(),
        compliance,
        network_policy: policy,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mano_config::SharedConfig;
    use mano_tn_manager::FaultDetector;

    #[tokio::test]
    async fn embb_intent_reaches_active_against_the_demo_catalog() {
        let config = Arc::new(Config::default());
        let catalog = SiteCatalog::load(Some(std::path::Path::new("/nonexistent/sites.toml"))).unwrap();
        let vni_pool = VniPool::new(config.placement.vni_range_start, config.placement.vni_range_end);
        let tn_manager = TnManager::new(SharedConfig::new((*config).clone()), FaultDetector::new(Default::default(), 16));

        let report = run_intent("4K streaming to 10,000 users", config, &catalog, &vni_pool, &tn_manager, None).await.unwrap();
        assert_eq!(report.service_class, ServiceClass::Embb);
        assert_eq!(report.final_state, SliceState::Active);
        assert!(report.compliance.is_none(), "no agents registered, performance test has nothing to sample");
        if let Some(policy) = &report.network_policy {
            assert_eq!(policy.vxlan.vni, report.vni);
        }
    }

    #[tokio::test]
    async fn network_policy_is_reported_when_the_slice_spans_multiple_sites() {
        let config = Arc::new(Config::default());
        let catalog = SiteCatalog::load(Some(std::path::Path::new("/nonexistent/sites.toml"))).unwrap();
        let vni_pool = VniPool::new(config.placement.vni_range_start, config.placement.vni_range_end);
        let tn_manager = TnManager::new(SharedConfig::new((*config).clone()), FaultDetector::new(Default::default(), 16));

        let report = run_intent("4K streaming to 10,000 users", config, &catalog, &vni_pool, &tn_manager, None).await.unwrap();
        if report.clusters.len() >= 2 {
            let policy = report.network_policy.expect("multi-cluster slice should report a network policy");
            assert_eq!(policy.vxlan.subnets.len(), report.clusters.len());
            assert!(policy.bandwidth.ceiling_mbps >= policy.bandwidth.guaranteed_mbps);
        }
    }

    #[tokio::test]
    async fn unmatched_text_fails_before_any_placement() {
        let config = Arc::new(Config::default());
        let catalog = SiteCatalog::load(Some(std::path::Path::new("/nonexistent/sites.toml"))).unwrap();
        let vni_pool = VniPool::new(config.placement.vni_range_start, config.placement.vni_range_end);
        let tn_manager = TnManager::new(SharedConfig::new((*config).clone()), FaultDetector::new(Default::default(), 16));

        let err = run_intent("please water the office plants", config, &catalog, &vni_pool, &tn_manager, None).await.unwrap_err();
        assert!(err.is_kind(ErrorKind::NoPattern));
    }

    #[tokio::test]
    async fn urllc_intent_reaches_active_with_no_tn_agents_registered() {
        let config = Arc::new(Config::default());
        let catalog = SiteCatalog::load(Some(std::path::Path::new("/nonexistent/sites.toml"))).unwrap();
        let vni_pool = VniPool::new(config.placement.vni_range_start, config.placement.vni_range_end);
        let tn_manager = TnManager::new(SharedConfig::new((*config).clone()), FaultDetector::new(Default::default(), 16));

        let report = run_intent("Emergency ambulance dispatch", config, &catalog, &vni_pool, &tn_manager, None).await.unwrap();
        assert_eq!(report.service_class, ServiceClass::Urllc);
        assert_eq!(report.final_state, SliceState::Active);
        assert!(!report.clusters.is_empty());
    }

    #[tokio::test]
    async fn placement_consults_the_live_metrics_provider_when_one_is_given() {
        let config = Arc::new(Config::default());
        let catalog = SiteCatalog::load(Some(std::path::Path::new("/nonexistent/sites.toml"))).unwrap();
        let vni_pool = VniPool::new(config.placement.vni_range_start, config.placement.vni_range_end);
        let tn_manager = TnManager::new(SharedConfig::new((*config).clone()), FaultDetector::new(Default::default(), 16));
        let provider = catalog.metrics_provider(0.1, 0.0).await;

        let report = run_intent("4K streaming to 10,000 users", config, &catalog, &vni_pool, &tn_manager, Some(&*provider)).await.unwrap();
        assert_eq!(report.final_state, SliceState::Active);
    }
}
