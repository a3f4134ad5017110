//! QoS profile: the six dimensions every slice is judged against.

use serde::{Deserialize, Serialize};

/// One of the six QoS dimensions tracked for a slice. Used as a map key when
/// components need to iterate "every dimension" generically (validation,
/// thesis compliance scoring).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QosDimension {
    Bandwidth,
    Latency,
    Jitter,
    PacketLoss,
    Reliability,
    Throughput,
}

impl QosDimension {
    pub fn all() -> [QosDimension; 6] {
        [
            QosDimension::Bandwidth,
            QosDimension::Latency,
            QosDimension::Jitter,
            QosDimension::PacketLoss,
            QosDimension::Reliability,
            QosDimension::Throughput,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QosDimension::Bandwidth => "bandwidth",
            QosDimension::Latency => "latency",
            QosDimension::Jitter => "jitter",
            QosDimension::PacketLoss => "packet_loss",
            QosDimension::Reliability => "reliability",
            QosDimension::Throughput => "throughput",
        }
    }
}

/// A single bound on a QoS dimension. At least one of `min`/`max`/`target`
/// must be set for a requirement that is actually referenced by a profile;
/// an all-`None` requirement means "dimension not constrained".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QosRequirement {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub target: Option<f64>,
    pub critical: bool,
}

impl Default for QosRequirement {
    fn default() -> Self {
        Self {
            min: None,
            max: None,
            target: None,
            critical: false,
        }
    }
}

impl QosRequirement {
    pub fn min(value: f64) -> Self {
        Self { min: Some(value), ..Default::default() }
    }

    pub fn max(value: f64, _unit: &str) -> Self {
        Self { max: Some(value), ..Default::default() }
    }

    pub fn min_target(min: f64, target: f64) -> Self {
        Self { min: Some(min), target: Some(target), ..Default::default() }
    }

    pub fn range(min: f64, max: f64) -> Self {
        Self { min: Some(min), max: Some(max), ..Default::default() }
    }

    pub fn is_set(&self) -> bool {
        self.min.is_some() || self.max.is_some() || self.target.is_some()
    }

    pub fn mark_critical(mut self) -> Self {
        self.critical = true;
        self
    }

    /// Merge `other` into `self`, keeping `self`'s bounds where already set.
    /// Used when a pattern's extractor overrides only some bounds of the
    /// class default template.
    pub fn overlay(self, other: QosRequirement) -> Self {
        Self {
            min: self.min.or(other.min),
            max: self.max.or(other.max),
            target: self.target.or(other.target),
            critical: self.critical || other.critical,
        }
    }

    pub fn satisfies_max(&self, value: f64) -> bool {
        self.max.map(|m| value <= m).unwrap_or(true)
    }

    pub fn satisfies_min(&self, value: f64) -> bool {
        self.min.map(|m| value >= m).unwrap_or(true)
    }
}

/// The six-dimensional QoS envelope attached to an intent and, derived from
/// it, to every slice component placed for that intent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QosProfile {
    pub bandwidth: QosRequirement,
    pub latency: QosRequirement,
    pub jitter: QosRequirement,
    pub packet_loss: QosRequirement,
    pub reliability: QosRequirement,
    pub throughput: QosRequirement,
}

impl QosProfile {
    pub fn get(&self, dim: QosDimension) -> &QosRequirement {
        match dim {
            QosDimension::Bandwidth => &self.bandwidth,
            QosDimension::Latency => &self.latency,
            QosDimension::Jitter => &self.jitter,
            QosDimension::PacketLoss => &self.packet_loss,
            QosDimension::Reliability => &self.reliability,
            QosDimension::Throughput => &self.throughput,
        }
    }

    pub fn get_mut(&mut self, dim: QosDimension) -> &mut QosRequirement {
        match dim {
            QosDimension::Bandwidth => &mut self.bandwidth,
            QosDimension::Latency => &mut self.latency,
            QosDimension::Jitter => &mut self.jitter,
            QosDimension::PacketLoss => &mut self.packet_loss,
            QosDimension::Reliability => &mut self.reliability,
            QosDimension::Throughput => &mut self.throughput,
        }
    }

    /// Overlay `override_profile`'s set dimensions on top of `self` (the
    /// class/template default), keeping `self`'s bound wherever the override
    /// leaves a dimension unset. Mirrors the parser's "template then
    /// extractor override" build order.
    pub fn overlay(mut self, override_profile: &QosProfile) -> Self {
        for dim in QosDimension::all() {
            if override_profile.get(dim).is_set() {
                let merged = override_profile.get(dim).overlay(*self.get(dim));
                *self.get_mut(dim) = merged;
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_keeps_template_bounds_not_overridden() {
        let mut template = QosProfile::default();
        template.latency = QosRequirement::max(50.0, "ms");
        template.bandwidth = QosRequirement::min(1.0);

        let mut extracted = QosProfile::default();
        extracted.latency = QosRequirement::max(20.0, "ms");

        let merged = template.overlay(&extracted);
        assert_eq!(merged.latency.max, Some(20.0));
        assert_eq!(merged.bandwidth.min, Some(1.0));
    }

    #[test]
    fn unset_requirement_satisfies_everything() {
        let req = QosRequirement::default();
        assert!(req.satisfies_max(1_000_000.0));
        assert!(req.satisfies_min(-1.0));
    }
}
