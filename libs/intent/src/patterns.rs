//! Static pattern registry. Each pattern is a tagged record:
//! keywords that signal it, the service class it implies, a base confidence,
//! a QoS template, and the dimension extractors that may override the
//! template from numbers actually present in the text. Patterns are data on
//! purpose — adding a sixth use case means adding an entry here, not a new
//! branch of parsing logic.

use mano_types::qos::{QosProfile, QosRequirement};
use mano_types::ServiceClass;
use once_cell::sync::Lazy;
use regex::Regex;

/// One QoS dimension's extractor: a compiled regex whose first capture group
/// is a number, an optional unit conversion applied to that number, and
/// which bound of the dimension it sets.
#[derive(Clone)]
pub struct Extractor {
    pub regex: Regex,
    pub dimension: fn(&mut QosProfile) -> &mut QosRequirement,
    pub bound: Bound,
    /// Multiply the captured number by this to normalize units (e.g. Gbps
    /// capture × 1000.0 → Mbps).
    pub scale: f64,
}

#[derive(Clone, Copy)]
pub enum Bound {
    Min,
    Max,
    Target,
}

impl Extractor {
    /// Try to pull a value out of `text`; apply it to `profile` under
    /// `self.bound` if found. Returns whether it matched.
    pub fn apply(&self, text: &str, profile: &mut QosProfile) -> bool {
        let Some(caps) = self.regex.captures(text) else {
            return false;
        };
        let Some(raw) = caps.get(1) else { return false };
        let Ok(value) = raw.as_str().parse::<f64>() else {
            return false;
        };
        let value = value * self.scale;
        let req = (self.dimension)(profile);
        match self.bound {
            Bound::Min => req.min = Some(value),
            Bound::Max => req.max = Some(value),
            Bound::Target => req.target = Some(value),
        }
        true
    }
}

pub struct PatternDef {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
    pub service_class: ServiceClass,
    pub base_confidence: f64,
    pub template: fn() -> QosProfile,
    pub extractors: Vec<Extractor>,
}

fn latency_mut(p: &mut QosProfile) -> &mut QosRequirement {
    &mut p.latency
}
fn bandwidth_mut(p: &mut QosProfile) -> &mut QosRequirement {
    &mut p.bandwidth
}
fn jitter_mut(p: &mut QosProfile) -> &mut QosRequirement {
    &mut p.jitter
}
fn loss_mut(p: &mut QosProfile) -> &mut QosRequirement {
    &mut p.packet_loss
}
fn reliability_mut(p: &mut QosProfile) -> &mut QosRequirement {
    &mut p.reliability
}

fn latency_extractors() -> Vec<Extractor> {
    vec![
        Extractor {
            regex: Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*ms\b[^.]{0,20}?(?:latency|delay|rtt)").unwrap(),
            dimension: latency_mut,
            bound: Bound::Max,
            scale: 1.0,
        },
        Extractor {
            regex: Regex::new(r"(?i)(?:latency|delay|rtt)[^0-9]{0,20}?(\d+(?:\.\d+)?)\s*ms\b").unwrap(),
            dimension: latency_mut,
            bound: Bound::Max,
            scale: 1.0,
        },
        Extractor {
            regex: Regex::new(r"(?i)(?:latency|delay|rtt)[^0-9]{0,20}?(\d+(?:\.\d+)?)\s*s\b").unwrap(),
            dimension: latency_mut,
            bound: Bound::Max,
            scale: 1000.0,
        },
    ]
}

fn bandwidth_extractors() -> Vec<Extractor> {
    vec![
        Extractor {
            regex: Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*gbps").unwrap(),
            dimension: bandwidth_mut,
            bound: Bound::Target,
            scale: 1000.0,
        },
        Extractor {
            regex: Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*mbps").unwrap(),
            dimension: bandwidth_mut,
            bound: Bound::Target,
            scale: 1.0,
        },
    ]
}

fn jitter_extractors() -> Vec<Extractor> {
    vec![Extractor {
        regex: Regex::new(r"(?i)jitter[^0-9]{0,20}?(\d+(?:\.\d+)?)\s*ms").unwrap(),
        dimension: jitter_mut,
        bound: Bound::Max,
        scale: 1.0,
    }]
}

fn loss_extractors() -> Vec<Extractor> {
    vec![Extractor {
        regex: Regex::new(r"(?i)(?:packet )?loss[^0-9]{0,20}?(\d+(?:\.\d+)?)\s*%").unwrap(),
        dimension: loss_mut,
        bound: Bound::Max,
        scale: 1.0,
    }]
}

fn reliability_extractors() -> Vec<Extractor> {
    vec![Extractor {
        regex: Regex::new(r"(?i)reliab\w*[^0-9]{0,20}?(\d+(?:\.\d+)?)\s*%").unwrap(),
        dimension: reliability_mut,
        bound: Bound::Min,
        scale: 1.0,
    }]
}

fn emergency_template() -> QosProfile {
    let mut p = QosProfile::default();
    p.latency = QosRequirement::max(1.0, "ms").mark_critical();
    p.bandwidth = QosRequirement::min(4.0);
    p.reliability = QosRequirement::min(99.999).mark_critical();
    p.packet_loss = QosRequirement::max(0.001, "%");
    p
}

fn video_template() -> QosProfile {
    let mut p = QosProfile::default();
    p.bandwidth = QosRequirement::min_target(2.5, 10.0);
    p.latency = QosRequirement::max(20.0, "ms");
    p.jitter = QosRequirement::max(5.0, "ms");
    p.packet_loss = QosRequirement::max(0.1, "%");
    p
}

fn iot_template() -> QosProfile {
    let mut p = QosProfile::default();
    p.bandwidth = QosRequirement::range(0.1, 1.0);
    p.latency = QosRequirement::max(100.0, "ms");
    p.reliability = QosRequirement::min(99.0);
    p
}

fn autonomous_template() -> QosProfile {
    let mut p = QosProfile::default();
    p.latency = QosRequirement::max(5.0, "ms").mark_critical();
    p.bandwidth = QosRequirement::min_target(1.0, 5.0);
    p.reliability = QosRequirement::min(99.99).mark_critical();
    p
}

fn industrial_template() -> QosProfile {
    let mut p = QosProfile::default();
    p.latency = QosRequirement::max(10.0, "ms");
    p.jitter = QosRequirement::max(1.0, "ms");
    p.bandwidth = QosRequirement::min_target(0.5, 2.0);
    p.reliability = QosRequirement::min(99.9);
    p
}

/// The registry, built once per process. `once_cell` rather than `const`
/// because `Regex::new` is not `const fn`.
pub static PATTERNS: Lazy<Vec<PatternDef>> = Lazy::new(|| {
    vec![
        PatternDef {
            name: "emergency",
            keywords: &["emergency", "911", "first responder", "ambulance", "disaster"],
            service_class: ServiceClass::Urllc,
            base_confidence: 0.95,
            template: emergency_template,
            extractors: [latency_extractors(), bandwidth_extractors(), reliability_extractors()].concat(),
        },
        PatternDef {
            name: "video",
            keywords: &["streaming", "video", "4k", "8k", "broadcast", "conferencing"],
            service_class: ServiceClass::Embb,
            base_confidence: 0.90,
            template: video_template,
            extractors: [bandwidth_extractors(), latency_extractors(), jitter_extractors(), loss_extractors()].concat(),
        },
        PatternDef {
            name: "iot",
            keywords: &["iot", "sensor", "sensors", "telemetry", "meter", "smart meter"],
            service_class: ServiceClass::Mmtc,
            base_confidence: 0.85,
            template: iot_template,
            extractors: [bandwidth_extractors(), latency_extractors(), reliability_extractors()].concat(),
        },
        PatternDef {
            name: "autonomous",
            keywords: &["autonomous", "v2x", "vehicle", "drone", "self-driving", "platooning"],
            service_class: ServiceClass::Urllc,
            base_confidence: 0.93,
            template: autonomous_template,
            extractors: [latency_extractors(), bandwidth_extractors(), reliability_extractors()].concat(),
        },
        PatternDef {
            name: "industrial",
            keywords: &["industrial", "factory", "plc", "robotics", "manufacturing", "automation"],
            service_class: ServiceClass::Urllc,
            base_confidence: 0.88,
            template: industrial_template,
            extractors: [latency_extractors(), jitter_extractors(), bandwidth_extractors(), reliability_extractors()].concat(),
        },
    ]
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emergency_template_sets_critical_dimensions() {
        let p = emergency_template();
        assert_eq!(p.latency.max, Some(1.0));
        assert!(p.latency.critical);
        assert_eq!(p.reliability.min, Some(99.999));
    }

    #[test]
    fn latency_extractor_picks_up_trailing_keyword() {
        let ext = &latency_extractors()[0];
        let mut profile = QosProfile::default();
        let matched = ext.apply("keep latency under 20ms latency please", &mut profile);
        assert!(matched);
        assert_eq!(profile.latency.max, Some(20.0));
    }

    #[test]
    fn registry_has_all_five_patterns() {
        assert_eq!(PATTERNS.len(), 5);
        let names: Vec<&str> = PATTERNS.iter().map(|p| p.name).collect();
        assert!(names.contains(&"emergency"));
        assert!(names.contains(&"industrial"));
    }
}
