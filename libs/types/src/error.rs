//! Shared error surface for the MANO workspace.
//!
//! Every public operation in this workspace returns `mano_types::Result`.
//! `ErrorKind` is the stable, language-neutral taxonomy callers match on;
//! `ManoError` adds a human message and an optional field/source for
//! diagnostics without growing the taxonomy itself.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ManoError>;

/// Stable error taxonomy. Adding a variant is a breaking change for callers
/// that match exhaustively; prefer reusing an existing kind with a more
/// specific message over adding one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidInput,
    NoPattern,
    InvalidTransition,
    InfeasiblePlacement,
    AgentUnreachable,
    AgentTimeout,
    AgentProtocol,
    QosViolation,
    VniExhausted,
    VniConflict,
    Canceled,
    DeadlineExceeded,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "invalid-input",
            ErrorKind::NoPattern => "no-pattern",
            ErrorKind::InvalidTransition => "invalid-transition",
            ErrorKind::InfeasiblePlacement => "infeasible-placement",
            ErrorKind::AgentUnreachable => "agent-unreachable",
            ErrorKind::AgentTimeout => "agent-timeout",
            ErrorKind::AgentProtocol => "agent-protocol",
            ErrorKind::QosViolation => "qos-violation",
            ErrorKind::VniExhausted => "vni-exhausted",
            ErrorKind::VniConflict => "vni-conflict",
            ErrorKind::Canceled => "canceled",
            ErrorKind::DeadlineExceeded => "deadline-exceeded",
            ErrorKind::Internal => "internal",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Error, Debug, Clone)]
#[error("{kind}: {message}")]
pub struct ManoError {
    pub kind: ErrorKind,
    pub message: String,
    pub field: Option<String>,
}

impl ManoError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            field: None,
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidInput, message)
    }

    pub fn no_pattern(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NoPattern, message)
    }

    pub fn invalid_transition(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidTransition, message)
    }

    pub fn infeasible(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InfeasiblePlacement, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    pub fn canceled() -> Self {
        Self::new(ErrorKind::Canceled, "operation canceled")
    }

    pub fn deadline_exceeded() -> Self {
        Self::new(ErrorKind::DeadlineExceeded, "deadline exceeded")
    }

    pub fn is_kind(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }
}

/// A single validation issue collected by `validate()`. Distinct from
/// `ManoError`: validation never short-circuits, it accumulates.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ValidationIssue {
    pub code: String,
    pub message: String,
    pub field: String,
    pub critical: bool,
}

impl ValidationIssue {
    pub fn critical(code: impl Into<String>, message: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            field: field.into(),
            critical: true,
        }
    }

    pub fn warning(code: impl Into<String>, message: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            field: field.into(),
            critical: false,
        }
    }
}

/// Collected result of `validate(intent)`. Admission is acceptable iff no
/// critical issue is present; warnings flow through.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct ValidationResult {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationResult {
    pub fn push(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }

    pub fn is_admission_acceptable(&self) -> bool {
        !self.issues.iter().any(|i| i.critical)
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }
}
