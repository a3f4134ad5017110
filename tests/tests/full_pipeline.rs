//! Cross-crate integration tests: intent parsing through placement, the
//! slice lifecycle state machine, and TN manager fan-out, exercised
//! together rather than unit-tested in isolation per crate.

use async_trait::async_trait;
use mano_actors::{SliceEvent, SliceLifecycle};
use mano_config::{Config, SharedConfig};
use mano_intent::IntentParser;
use mano_placement::{default_vnf_requirements, place, VniPool};
use mano_tn_manager::{FaultDetector, TnAgentClient, TnManager};
use mano_types::tn::{EndpointRole, TnEndpoint, TnSlice};
use mano_types::{ErrorKind, ManoError, Result, ServiceClass, SliceState};
use mano_wire::{AgentStatus, PerfMetrics, PerfTestConfig};
use std::time::Duration;

struct FakeAgent {
    cluster: &'static str,
    fail: Option<ErrorKind>,
    throughput_mbps: f64,
    rtt_ms: f64,
}

#[async_trait]
impl TnAgentClient for FakeAgent {
    async fn connect(&self) -> Result<()> {
        Ok(())
    }

    async fn configure_slice(&self, _slice_id: uuid::Uuid, _config: TnSlice) -> Result<()> {
        match self.fail {
            Some(kind) => Err(ManoError::new(kind, format!("{} is unavailable", self.cluster))),
            None => Ok(()),
        }
    }

    async fn get_status(&self) -> Result<AgentStatus> {
        Ok(AgentStatus { cluster: self.cluster.into(), configured_slices: vec![], healthy: self.fail.is_none() })
    }

    async fn run_performance_test(&self, _config: PerfTestConfig) -> Result<PerfMetrics> {
        Ok(PerfMetrics { throughput_mbps: self.throughput_mbps, rtt_ms: self.rtt_ms, deploy_time_ms: 400_000 })
    }

    async fn stop(&self) -> Result<()> {
        Ok(())
    }
}

fn endpoint(name: &str, ip: &str) -> TnEndpoint {
    TnEndpoint { node_name: name.into(), ip: ip.parse().unwrap(), interface: "eth0".into(), role: EndpointRole::Source }
}

fn site(id: &str) -> mano_types::site::Site {
    mano_types::site::Site {
        id: id.into(),
        site_type: mano_types::site::SiteType::Edge,
        location: mano_types::site::GeoLocation { latitude: 0.0, longitude: 0.0, region: "eu-west".into() },
        capabilities: Default::default(),
        metrics: mano_types::site::SiteMetrics::new(20.0, 20.0, 100.0, 5.0, 0),
    }
}

/// Scenario: a 3-agent fan-out where one agent times out. The TN manager's
/// composite error must name the failing cluster, and the slice's lifecycle
/// must be driven into `DeploymentFailed` rather than left mid-transition.
#[tokio::test]
async fn fan_out_partial_failure_fails_the_slice_and_names_the_agent() {
    let manager = TnManager::new(SharedConfig::default(), FaultDetector::new(Default::default(), 16));
    manager.register("edge-1", std::sync::Arc::new(FakeAgent { cluster: "edge-1", fail: None, throughput_mbps: 5.0, rtt_ms: 5.5 })).await.unwrap();
    manager.register("edge-2", std::sync::Arc::new(FakeAgent { cluster: "edge-2", fail: None, throughput_mbps: 3.0, rtt_ms: 15.0 })).await.unwrap();
    manager
        .register("edge-3", std::sync::Arc::new(FakeAgent { cluster: "edge-3", fail: Some(ErrorKind::AgentTimeout), throughput_mbps: 0.0, rtt_ms: 0.0 }))
        .await
        .unwrap();

    let (lifecycle, dispatcher, watchdog) = SliceLifecycle::spawn(uuid::Uuid::new_v4(), Duration::from_secs(300));
    for event in [SliceEvent::Validate, SliceEvent::ValidationSuccess, SliceEvent::Plan, SliceEvent::PlanningSuccess, SliceEvent::Deploy] {
        lifecycle.send(event).unwrap();
    }
    assert_eq!(lifecycle.current_state(), SliceState::Deploying);

    let slice = TnSlice {
        slice_id: lifecycle.slice_id(),
        vni: 2_000,
        bandwidth_mbps: 4.57,
        latency_ms: 16.1,
        jitter_ms: 2.0,
        packet_loss_pct: 0.1,
        priority: 5,
        endpoints: vec![endpoint("a", "10.0.0.1"), endpoint("b", "10.0.0.2")],
    };

    let err = manager.configure_slice(lifecycle.slice_id(), slice).await.unwrap_err();
    assert!(err.is_kind(ErrorKind::AgentTimeout));
    assert!(err.message.contains("edge-3"));

    lifecycle.send(SliceEvent::DeploymentFailure).unwrap();
    assert_eq!(lifecycle.current_state(), SliceState::DeploymentFailed);

    dispatcher.abort();
    watchdog.abort();
}

/// Scenario: a full intent reaches placement, its endpoints form a VXLAN
/// mesh and TC plan, and a TN fan-out over three compliant agents drives
/// the slice to `Active` with a passing thesis-compliance score.
#[tokio::test]
async fn full_intent_to_tn_fanout_reaches_active_and_is_thesis_compliant() {
    let parser = IntentParser::new();
    let intent = parser.parse("4K streaming to 10,000 users", None).await.unwrap();
    assert_eq!(intent.service_class, ServiceClass::Embb);

    let validation = parser.validate(&intent);
    assert!(validation.is_admission_acceptable());

    let config = Config::default();
    let vni_pool = VniPool::new(config.placement.vni_range_start, config.placement.vni_range_end);
    let sites = vec![site("edge-1"), site("edge-2")];
    let resources = parser.generate_resources(intent.service_class, &intent.qos_profile);
    let vnfs = default_vnf_requirements(intent.service_class, &resources);

    let decision = place(intent.id, &intent.qos_profile, intent.service_class, &intent.constraints, &vnfs, &[], &sites, &config.placement, &vni_pool, None)
        .await
        .unwrap();
    assert!(decision.deployment_order().is_some());

    let endpoints = vec![endpoint("edge-1", "10.0.0.1"), endpoint("edge-2", "10.0.0.2")];
    let tunnels = mano_vxlan::build_tunnels(decision.vni, &endpoints).unwrap();
    assert_eq!(tunnels.len(), 2);

    let tc_plan = mano_tc::build_plan(&tunnels[0].interface, 4.57, 16.1, Some(2.0), Some(0.1), 5).unwrap();
    assert!(tc_plan.adjusted_rate_kbit > 0);

    let (lifecycle, dispatcher, watchdog) = SliceLifecycle::spawn(intent.id, config.state_machine.state_timeout);
    for event in [SliceEvent::Validate, SliceEvent::ValidationSuccess, SliceEvent::Plan, SliceEvent::PlanningSuccess, SliceEvent::Deploy] {
        lifecycle.send(event).unwrap();
    }

    let manager = TnManager::new(SharedConfig::new(config), FaultDetector::new(Default::default(), 16));
    manager.register("a", std::sync::Arc::new(FakeAgent { cluster: "a", fail: None, throughput_mbps: 5.0, rtt_ms: 5.5 })).await.unwrap();
    manager.register("b", std::sync::Arc::new(FakeAgent { cluster: "b", fail: None, throughput_mbps: 3.0, rtt_ms: 15.0 })).await.unwrap();
    manager.register("c", std::sync::Arc::new(FakeAgent { cluster: "c", fail: None, throughput_mbps: 4.7, rtt_ms: 16.0 })).await.unwrap();

    let slice = TnSlice {
        slice_id: intent.id,
        vni: decision.vni,
        bandwidth_mbps: 4.57,
        latency_ms: 16.1,
        jitter_ms: 2.0,
        packet_loss_pct: 0.1,
        priority: 5,
        endpoints,
    };
    manager.configure_slice(intent.id, slice).await.unwrap();
    lifecycle.send(SliceEvent::DeploymentSuccess).unwrap();
    lifecycle.send(SliceEvent::Activate).unwrap();
    assert_eq!(lifecycle.current_state(), SliceState::Active);

    let (_metrics, report) = manager.run_performance_test(PerfTestConfig { slice_id: intent.id, duration_secs: 10 }).await.unwrap();
    assert!(report.sla_compliant);

    dispatcher.abort();
    watchdog.abort();
}
