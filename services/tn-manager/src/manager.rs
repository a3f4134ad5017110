//! `TnManager`: the fan-out/aggregation surface over every registered TN
//! agent. Each call splits into one task per registered agent, joined with
//! `futures::future::join_all` rather than a hand-rolled loop of awaits, so
//! agents genuinely run in parallel and a single slow agent doesn't
//! serialize the others.

use crate::client::TnAgentClient;
use crate::fault::FaultDetector;
use crate::registry::AgentRegistry;
use crate::thesis::{self, ComplianceReport};
use futures::future::join_all;
use mano_config::SharedConfig;
use mano_metrics::SiteMetricsProvider;
use mano_types::tn::TnSlice;
use mano_types::{ErrorKind, ManoError, Result};
use mano_wire::{AgentStatus, PerfMetrics, PerfTestConfig};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::watch;

/// One agent's outcome in a fan-out, kept alongside its cluster name so a
/// partial failure can name which agent failed.
struct Outcome<T> {
    cluster: String,
    result: Result<T>,
}

fn composite_error(failures: Vec<(String, ManoError)>) -> ManoError {
    let kind = failures.first().map(|(_, e)| e.kind).unwrap_or(ErrorKind::Internal);
    let message = failures.iter().map(|(cluster, err)| format!("{cluster}: {err}")).collect::<Vec<_>>().join("; ");
    ManoError::new(kind, format!("{} of {} agents failed: {message}", failures.len(), failures.len()))
}

pub struct TnManager {
    registry: AgentRegistry,
    config: SharedConfig,
    faults: FaultDetector,
    stopped: watch::Sender<bool>,
}

impl TnManager {
    pub fn new(config: SharedConfig, faults: FaultDetector) -> Self {
        let (stopped, _) = watch::channel(false);
        Self { registry: AgentRegistry::new(), config, faults, stopped }
    }

    pub fn faults(&self) -> &FaultDetector {
        &self.faults
    }

    fn ensure_running(&self) -> Result<()> {
        if *self.stopped.borrow() {
            return Err(ManoError::canceled());
        }
        Ok(())
    }

    pub async fn register(&self, cluster: impl Into<String>, client: Arc<dyn TnAgentClient>) -> Result<()> {
        self.ensure_running()?;
        self.registry.register(cluster, client).await
    }

    async fn fan_out<T, F, Fut>(&self, op: F) -> Vec<Outcome<T>>
    where
        F: Fn(Arc<dyn TnAgentClient>) -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let agents = self.registry.snapshot().await;
        let tasks = agents.into_iter().map(|(cluster, client)| {
            let fut = op(client);
            async move { Outcome { cluster, result: fut.await } }
        });
        join_all(tasks).await
    }

    /// Fan out `config` to every registered agent; succeeds only if every
    /// agent accepts it.
    pub async fn configure_slice(&self, slice_id: uuid::Uuid, config: TnSlice) -> Result<()> {
        self.ensure_running()?;
        if self.registry.is_empty().await {
            return Ok(());
        }

        let outcomes = self
            .fan_out(|client| {
                let config = config.clone();
                async move { client.configure_slice(slice_id, config).await }
            })
            .await;

        let failures: Vec<_> = outcomes.into_iter().filter_map(|o| o.result.err().map(|e| (o.cluster, e))).collect();
        if failures.is_empty() {
            Ok(())
        } else {
            Err(composite_error(failures))
        }
    }

    /// Fan out a performance test, aggregate, and score against the
    /// configured thesis targets. A per-agent failure still fails the whole
    /// call, unlike `configure_slice`'s partial-failure contract.
    pub async fn run_performance_test(&self, test_config: PerfTestConfig) -> Result<(PerfMetrics, ComplianceReport)> {
        self.ensure_running()?;

        let outcomes = self.fan_out(|client| { let cfg = test_config.clone(); async move { client.run_performance_test(cfg).await } }).await;

        let mut samples = Vec::with_capacity(outcomes.len());
        let mut failures = Vec::new();
        for outcome in outcomes {
            match outcome.result {
                Ok(metrics) => {
                    self.faults.inspect_performance(&outcome.cluster, &metrics);
                    samples.push(metrics);
                }
                Err(err) => failures.push((outcome.cluster, err)),
            }
        }

        if !failures.is_empty() {
            return Err(composite_error(failures));
        }

        let aggregated = PerfMetrics::aggregate(&samples).ok_or_else(|| ManoError::internal("no agents registered for performance test"))?;
        let thesis = self.config.current().thesis.clone();
        let report = thesis::score(&samples, &aggregated, &thesis);
        Ok((aggregated, report))
    }

    /// Poll `provider` for every site it knows about and raise a fault for
    /// any site whose available bandwidth has dropped below threshold. Has
    /// no polling loop of its own; call it periodically (e.g. from the same
    /// task driving the provider's ticker) to get continuous coverage.
    pub async fn inspect_sites(&self, provider: &dyn SiteMetricsProvider) {
        for (site_id, metrics) in provider.get_all().await {
            self.faults.inspect_site(&site_id, &metrics);
        }
    }

    pub async fn get_status(&self) -> Result<HashMap<String, AgentStatus>> {
        self.ensure_running()?;
        let outcomes = self.fan_out(|client| async move { client.get_status().await }).await;

        let mut statuses = HashMap::new();
        for outcome in outcomes {
            match outcome.result {
                Ok(status) => {
                    self.faults.inspect_reachability(&outcome.cluster, status.healthy);
                    statuses.insert(outcome.cluster, status);
                }
                Err(_) => {
                    self.faults.inspect_reachability(&outcome.cluster, false);
                }
            }
        }
        Ok(statuses)
    }

    /// Cancel outstanding work and disconnect every agent. Idempotent:
    /// calling `stop` twice is a no-op the second time.
    pub async fn stop(&self) -> Result<()> {
        let _ = self.stopped.send(true);
        let outcomes = self.fan_out(|client| async move { client.stop().await }).await;
        let failures: Vec<_> = outcomes.into_iter().filter_map(|o| o.result.err().map(|e| (o.cluster, e))).collect();
        if failures.is_empty() {
            Ok(())
        } else {
            Err(composite_error(failures))
        }
    }
}
