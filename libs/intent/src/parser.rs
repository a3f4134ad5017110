//! The parser's public contract: `parse`, `validate`,
//! `extract_qos`, `generate_resources`.

use crate::normalize::normalize;
use crate::patterns::PATTERNS;
use crate::priority::extract_priority;
use crate::resources::generate_resources as compute_resources;
use crate::ResourceProfile;
use mano_types::error::{ManoError, Result, ValidationIssue, ValidationResult};
use mano_types::intent::{Comparator, Constraint, ConstraintType};
use mano_types::qos::{QosDimension, QosProfile, QosRequirement};
use mano_types::{Intent, Priority, ServiceClass, SliceConfiguration};
use once_cell::sync::Lazy;
use regex::Regex;

const MIN_TEXT_LEN: usize = 1;
const MAX_TEXT_LEN: usize = 10_000;

struct ConstraintRule {
    regex: Regex,
    kind: ConstraintType,
    mandatory: bool,
    comparator: Comparator,
}

static CONSTRAINT_RULES: Lazy<Vec<ConstraintRule>> = Lazy::new(|| {
    vec![
        ConstraintRule {
            regex: Regex::new(r"(?i)\bin ([a-z][a-z '-]{2,30})\b").unwrap(),
            kind: ConstraintType::Location,
            mandatory: false,
            comparator: Comparator::Eq,
        },
        ConstraintRule {
            regex: Regex::new(r"(?i)(?:under|below|budget of)\s*\$?\s*(\d+(?:,\d{3})*(?:\.\d+)?)").unwrap(),
            kind: ConstraintType::Cost,
            mandatory: true,
            comparator: Comparator::Le,
        },
        ConstraintRule {
            regex: Regex::new(r"(?i)(secure|encrypted|private network)").unwrap(),
            kind: ConstraintType::Security,
            mandatory: true,
            comparator: Comparator::Eq,
        },
        ConstraintRule {
            regex: Regex::new(r"(?i)(gdpr|hipaa|pci[- ]dss|compliant)").unwrap(),
            kind: ConstraintType::Compliance,
            mandatory: true,
            comparator: Comparator::Eq,
        },
        ConstraintRule {
            regex: Regex::new(r"(?i)(\d{2}(?:\.\d+)?)\s*%\s*(?:uptime|availability)").unwrap(),
            kind: ConstraintType::Availability,
            mandatory: false,
            comparator: Comparator::Ge,
        },
    ]
});

fn extract_constraints(normalized_text: &str) -> Vec<Constraint> {
    let mut out = Vec::new();
    for rule in CONSTRAINT_RULES.iter() {
        if let Some(caps) = rule.regex.captures(normalized_text) {
            let value = caps.get(1).map(|m| m.as_str().to_string()).unwrap_or_default();
            out.push(Constraint { kind: rule.kind, comparator: rule.comparator, value, mandatory: rule.mandatory });
        }
    }
    out
}

/// Fill any dimension left unset by the pattern's template with the bound
/// that defines its service class.
fn apply_service_class_defaults(mut profile: QosProfile, class: ServiceClass) -> QosProfile {
    let defaults = match class {
        ServiceClass::Urllc => {
            let mut d = QosProfile::default();
            d.latency = QosRequirement::max(10.0, "ms");
            d.reliability = QosRequirement::min(99.9);
            d.packet_loss = QosRequirement::max(0.1, "%");
            d
        }
        ServiceClass::Embb => {
            let mut d = QosProfile::default();
            d.bandwidth = QosRequirement::min(1.0);
            d.latency = QosRequirement::max(50.0, "ms");
            d
        }
        ServiceClass::Mmtc => {
            let mut d = QosProfile::default();
            d.bandwidth = QosRequirement::max(1.0, "mbps");
            d.latency = QosRequirement::max(1000.0, "ms");
            d
        }
        ServiceClass::Custom => QosProfile::default(),
    };
    for dim in QosDimension::all() {
        if !profile.get(dim).is_set() && defaults.get(dim).is_set() {
            *profile.get_mut(dim) = *defaults.get(dim);
        }
    }
    profile
}

/// Length tempering applied to a pattern's match bonus: very short text is
/// less trustworthy, very long text is noisier.
fn length_factor(normalized_text: &str) -> f64 {
    let len = normalized_text.chars().count();
    if len < 50 {
        0.9
    } else if len > 500 {
        0.95
    } else {
        1.0
    }
}

struct ScoredPattern<'a> {
    pattern: &'a crate::patterns::PatternDef,
    score: f64,
    qos: QosProfile,
}

fn score_patterns(normalized_text: &str) -> Option<ScoredPattern<'static>> {
    let factor = length_factor(normalized_text);
    let mut best: Option<ScoredPattern<'static>> = None;

    for pattern in PATTERNS.iter() {
        let match_count = pattern.keywords.iter().filter(|kw| normalized_text.contains(**kw)).count();
        if match_count == 0 {
            continue;
        }

        let mut qos = (pattern.template)();
        let mut extractor_hits = 0usize;
        for extractor in &pattern.extractors {
            if extractor.apply(normalized_text, &mut qos) {
                extractor_hits += 1;
            }
        }

        let bonus = factor * (0.05 * match_count as f64 + 0.1 * extractor_hits as f64);
        let score = (pattern.base_confidence + bonus).min(1.0);

        if best.as_ref().map(|b| score > b.score).unwrap_or(true) {
            best = Some(ScoredPattern { pattern, score, qos });
        }
    }

    best
}

#[derive(Debug, Default, Clone, Copy)]
pub struct IntentParser;

impl IntentParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse `text` into an `Intent`. Cooperatively cancelable: if `deadline`
    /// is set and has already passed by the time the single await point is
    /// reached, returns `ErrorKind::Canceled` instead of completing.
    pub async fn parse(&self, text: &str, deadline: Option<tokio::time::Instant>) -> Result<Intent> {
        let char_len = text.chars().count();
        if text.trim().is_empty() {
            return Err(ManoError::invalid_input("intent text must not be empty").with_field("text"));
        }
        if char_len < MIN_TEXT_LEN || char_len > MAX_TEXT_LEN {
            return Err(ManoError::invalid_input(format!(
                "intent text exceeds maximum length of {MAX_TEXT_LEN} characters"
            ))
            .with_field("text"));
        }

        tokio::task::yield_now().await;
        if let Some(deadline) = deadline {
            if tokio::time::Instant::now() >= deadline {
                return Err(ManoError::canceled());
            }
        }

        let normalized = normalize(text);
        let scored = score_patterns(&normalized)
            .ok_or_else(|| ManoError::no_pattern("no registered pattern matched the intent text"))?;

        let qos_profile = apply_service_class_defaults(scored.qos, scored.pattern.service_class);
        let constraints = extract_constraints(&normalized);
        let priority = extract_priority(&normalized);
        let slice_config = SliceConfiguration::for_class(scored.pattern.name, scored.pattern.service_class);

        Ok(Intent {
            id: uuid::Uuid::new_v4(),
            raw_text: text.to_string(),
            service_class: scored.pattern.service_class,
            qos_profile,
            slice_config,
            constraints,
            priority,
            confidence: scored.score,
            timestamp: chrono::Utc::now(),
        })
    }

    /// Re-derive a QoS profile directly from raw text, independent of a full
    /// `parse`. Used by callers that only need the QoS envelope (e.g. a
    /// what-if tool) without paying for constraint/priority extraction.
    pub fn extract_qos(&self, text: &str) -> Result<QosProfile> {
        let normalized = normalize(text);
        let scored = score_patterns(&normalized)
            .ok_or_else(|| ManoError::no_pattern("no registered pattern matched the intent text"))?;
        Ok(apply_service_class_defaults(scored.qos, scored.pattern.service_class))
    }

    pub fn generate_resources(&self, class: ServiceClass, qos: &QosProfile) -> ResourceProfile {
        compute_resources(class, qos)
    }

    /// Validate an already-parsed intent against the class invariants (spec
    /// §3): URLLC mandates `latency.max <= 50ms` and `reliability.min >=
    /// 99.0%`; eMBB mandates `bandwidth.min >= 1 Mbps`. Never short-circuits.
    pub fn validate(&self, intent: &Intent) -> ValidationResult {
        let mut result = ValidationResult::default();

        if intent.raw_text.trim().is_empty() {
            result.push(ValidationIssue::critical("empty-text", "raw intent text is empty", "raw_text"));
        }

        match intent.service_class {
            ServiceClass::Urllc => {
                if !intent.qos_profile.latency.max.map(|m| m <= 50.0).unwrap_or(false) {
                    result.push(ValidationIssue::critical(
                        "urllc-latency-bound",
                        "URLLC slices must declare latency.max <= 50ms",
                        "qos_profile.latency",
                    ));
                }
                if !intent.qos_profile.reliability.min.map(|m| m >= 99.0).unwrap_or(false) {
                    result.push(ValidationIssue::critical(
                        "urllc-reliability-bound",
                        "URLLC slices must declare reliability.min >= 99.0%",
                        "qos_profile.reliability",
                    ));
                }
            }
            ServiceClass::Embb => {
                if !intent.qos_profile.bandwidth.min.map(|m| m >= 1.0).unwrap_or(false) {
                    result.push(ValidationIssue::critical(
                        "embb-bandwidth-bound",
                        "eMBB slices must declare bandwidth.min >= 1 Mbps",
                        "qos_profile.bandwidth",
                    ));
                }
            }
            ServiceClass::Mmtc | ServiceClass::Custom => {}
        }

        if intent.confidence < 0.5 {
            result.push(ValidationIssue::warning(
                "low-confidence",
                "pattern match confidence is below 0.5",
                "confidence",
            ));
        }

        result
    }
}
