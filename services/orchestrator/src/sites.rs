//! Site/endpoint inventory for the orchestrator binary. Not part of the
//! placement or transport crates themselves, since the site catalog is an
//! external input rather than a computed value — this is the thinnest
//! possible loader: a TOML file of sites plus their TN endpoint, falling
//! back to a small built-in demo inventory, mirroring
//! `mano_config::Config::load`'s "missing file is not an error" contract.

use mano_metrics::{BaseProfile, SyntheticMetricsProvider};
use mano_types::site::{GeoLocation, Site, SiteMetrics, SiteType};
use mano_types::tn::{EndpointRole, TnEndpoint};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
struct SiteFile {
    site: Vec<SiteEntry>,
}

#[derive(Debug, Deserialize)]
struct SiteEntry {
    id: String,
    site_type: SiteTypeName,
    region: String,
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    capabilities: Vec<String>,
    endpoint_ip: std::net::IpAddr,
    endpoint_interface: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum SiteTypeName {
    Edge,
    Regional,
    Central,
}

impl From<SiteTypeName> for SiteType {
    fn from(name: SiteTypeName) -> Self {
        match name {
            SiteTypeName::Edge => SiteType::Edge,
            SiteTypeName::Regional => SiteType::Regional,
            SiteTypeName::Central => SiteType::Central,
        }
    }
}

/// The sites a placement decision may choose from, plus the TN endpoint
/// each one exposes to the overlay mesh.
pub struct SiteCatalog {
    pub sites: Vec<Site>,
    endpoints: Vec<(String, TnEndpoint)>,
}

impl SiteCatalog {
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let default_path = Path::new("config/sites.toml");
        let path = path.unwrap_or(default_path);

        if !path.exists() {
            tracing::warn!(?path, "site catalog not found, using built-in demo sites");
            return Ok(Self::demo());
        }

        tracing::info!(?path, "loading site catalog");
        let raw = std::fs::read_to_string(path)?;
        let parsed: SiteFile = toml::from_str(&raw)?;

        let mut sites = Vec::with_capacity(parsed.site.len());
        let mut endpoints = Vec::with_capacity(parsed.site.len());
        for entry in parsed.site {
            endpoints.push((
                entry.id.clone(),
                TnEndpoint {
                    node_name: entry.id.clone(),
                    ip: entry.endpoint_ip,
                    interface: entry.endpoint_interface.clone(),
                    role: EndpointRole::Source,
                },
            ));
            sites.push(Site {
                id: entry.id,
                site_type: entry.site_type.into(),
                location: GeoLocation { latitude: entry.latitude, longitude: entry.longitude, region: entry.region },
                capabilities: entry.capabilities.into_iter().collect(),
                metrics: SiteMetrics::new(20.0, 20.0, 50.0, 5.0, 0),
            });
        }

        Ok(Self { sites, endpoints })
    }

    fn demo() -> Self {
        let sites = vec![
            Site {
                id: "edge-1".into(),
                site_type: SiteType::Edge,
                location: GeoLocation { latitude: 52.52, longitude: 13.40, region: "eu-west".into() },
                capabilities: HashSet::from(["secure".to_string()]),
                metrics: SiteMetrics::new(25.0, 30.0, 80.0, 2.0, 1),
            },
            Site {
                id: "regional-1".into(),
                site_type: SiteType::Regional,
                location: GeoLocation { latitude: 50.11, longitude: 8.68, region: "eu-west".into() },
                capabilities: HashSet::from(["secure".to_string(), "gdpr".to_string()]),
                metrics: SiteMetrics::new(35.0, 40.0, 200.0, 6.0, 3),
            },
            Site {
                id: "central-1".into(),
                site_type: SiteType::Central,
                location: GeoLocation { latitude: 48.85, longitude: 2.35, region: "eu-west".into() },
                capabilities: HashSet::from(["gdpr".to_string()]),
                metrics: SiteMetrics::new(40.0, 45.0, 500.0, 12.0, 5),
            },
        ];
        let endpoints = vec![
            ("edge-1".to_string(), TnEndpoint { node_name: "edge-1".into(), ip: "10.0.1.1".parse().unwrap(), interface: "eth0".into(), role: EndpointRole::Source }),
            ("regional-1".to_string(), TnEndpoint { node_name: "regional-1".into(), ip: "10.0.2.1".parse().unwrap(), interface: "eth0".into(), role: EndpointRole::Transit }),
            ("central-1".to_string(), TnEndpoint { node_name: "central-1".into(), ip: "10.0.3.1".parse().unwrap(), interface: "eth0".into(), role: EndpointRole::Destination }),
        ];
        Self { sites, endpoints }
    }

    /// The TN endpoint for each named cluster, in the order the clusters
    /// were named. Silently drops a cluster with no known endpoint: the
    /// placement engine only ever names clusters drawn from `self.sites`,
    /// so that would mean the catalog is missing an endpoint entry for one
    /// of its own sites.
    pub fn endpoints_for(&self, cluster_names: &[String]) -> Vec<TnEndpoint> {
        cluster_names
            .iter()
            .filter_map(|name| self.endpoints.iter().find(|(id, _)| id == name).map(|(_, ep)| ep.clone()))
            .collect()
    }

    /// A live metrics provider seeded from this catalog's initial snapshot of
    /// every site, for the placement engine to re-score against if a site's
    /// metrics go stale between admission and placement.
    pub async fn metrics_provider(&self, variance_fraction: f64, drift_per_sec: f64) -> Arc<SyntheticMetricsProvider> {
        let provider = Arc::new(SyntheticMetricsProvider::new(variance_fraction, drift_per_sec));
        for site in &self.sites {
            provider
                .register_site(
                    site.id.clone(),
                    BaseProfile {
                        cpu_pct: site.metrics.cpu_pct,
                        memory_pct: site.metrics.memory_pct,
                        available_bandwidth_mbps: site.metrics.available_bandwidth_mbps,
                        current_latency_ms: site.metrics.current_latency_ms,
                        active_slice_count: site.metrics.active_slice_count,
                    },
                )
                .await;
        }
        provider
    }
}
