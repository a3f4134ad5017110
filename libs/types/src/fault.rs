//! Network fault records raised by detectors and tracked to resolution.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FaultType {
    VxlanDown,
    QosViolation,
    LinkDown,
    HighLatency,
    PacketLoss,
    BandwidthSaturation,
    NodeUnreachable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkFault {
    pub id: uuid::Uuid,
    pub fault_type: FaultType,
    pub severity: Severity,
    pub node: String,
    pub slice_id: Option<uuid::Uuid>,
    pub description: String,
    pub detected_at: chrono::DateTime<chrono::Utc>,
    pub resolved_at: Option<chrono::DateTime<chrono::Utc>>,
    pub recovery_actions: Vec<String>,
}

impl NetworkFault {
    pub fn new(fault_type: FaultType, severity: Severity, node: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            fault_type,
            severity,
            node: node.into(),
            slice_id: None,
            description: description.into(),
            detected_at: chrono::Utc::now(),
            resolved_at: None,
            recovery_actions: Vec::new(),
        }
    }

    pub fn resolve(&mut self, action: impl Into<String>) {
        self.recovery_actions.push(action.into());
        self.resolved_at = Some(chrono::Utc::now());
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved_at.is_some()
    }
}
