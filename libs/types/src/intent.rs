//! Intent and its constituent constraint/priority vocabulary.

use crate::qos::QosProfile;
use crate::slice::SliceConfiguration;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceClass {
    Embb,
    Urllc,
    Mmtc,
    Custom,
}

impl ServiceClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceClass::Embb => "eMBB",
            ServiceClass::Urllc => "URLLC",
            ServiceClass::Mmtc => "mMTC",
            ServiceClass::Custom => "custom",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstraintType {
    Location,
    Cost,
    Latency,
    Bandwidth,
    Security,
    Compliance,
    Availability,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparator {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Comparator {
    /// Evaluate `lhs <cmp> rhs`, e.g. `Lt.eval(current_latency, bound)`.
    pub fn eval(&self, lhs: f64, rhs: f64) -> bool {
        match self {
            Comparator::Eq => (lhs - rhs).abs() < f64::EPSILON,
            Comparator::Ne => (lhs - rhs).abs() >= f64::EPSILON,
            Comparator::Lt => lhs < rhs,
            Comparator::Le => lhs <= rhs,
            Comparator::Gt => lhs > rhs,
            Comparator::Ge => lhs >= rhs,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Constraint {
    pub kind: ConstraintType,
    pub comparator: Comparator,
    pub value: String,
    pub mandatory: bool,
}

impl Constraint {
    pub fn mandatory(kind: ConstraintType, comparator: Comparator, value: impl Into<String>) -> Self {
        Self { kind, comparator, value: value.into(), mandatory: true }
    }

    pub fn soft(kind: ConstraintType, comparator: Comparator, value: impl Into<String>) -> Self {
        Self { kind, comparator, value: value.into(), mandatory: false }
    }
}

/// A parsed, validated intent. Immutable after parse: a retried parse of the
/// same text produces a new `Intent` with a new id, never a mutation of this
/// one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Intent {
    pub id: uuid::Uuid,
    pub raw_text: String,
    pub service_class: ServiceClass,
    pub qos_profile: QosProfile,
    pub slice_config: SliceConfiguration,
    pub constraints: Vec<Constraint>,
    pub priority: Priority,
    pub confidence: f64,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}
