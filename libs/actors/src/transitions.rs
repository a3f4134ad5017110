//! Lifecycle events and the transition table, exhaustive over every state.

use mano_types::SliceState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SliceEvent {
    Validate,
    ValidationSuccess,
    ValidationFailure,
    Plan,
    PlanningSuccess,
    PlanningFailure,
    Deploy,
    DeploymentSuccess,
    DeploymentFailure,
    Activate,
    Terminate,
    Rollback,
    RollbackSuccess,
    RollbackFailure,
    Retry,
}

/// `Some(next)` if `(state, event)` is a legal transition, `None` otherwise
/// (the caller turns `None` into an `invalid-transition` error and leaves
/// state unchanged).
pub fn next_state(state: SliceState, event: SliceEvent) -> Option<SliceState> {
    use SliceEvent::*;
    use SliceState::*;

    match (state, event) {
        (Initializing, Validate) => Some(Validating),
        (Validating, ValidationSuccess) => Some(Pending),
        (Validating, ValidationFailure) => Some(ValidationFailed),
        (Pending, Plan) => Some(Planning),
        (Planning, PlanningSuccess) => Some(Planned),
        (Planning, PlanningFailure) => Some(PlanningFailed),
        (Planned, Deploy) => Some(Deploying),
        (Deploying, DeploymentSuccess) => Some(Deployed),
        (Deploying, DeploymentFailure) => Some(DeploymentFailed),
        (Deployed, Activate) => Some(Active),
        (Active, Terminate) => Some(Terminating),
        (Terminating, _) => Some(Terminated),
        (ValidationFailed, Retry) => Some(Validating),
        (PlanningFailed, Retry) => Some(Planning),
        (DeploymentFailed, Rollback) => Some(RollingBack),
        (RollingBack, RollbackSuccess) => Some(RolledBack),
        (RollingBack, RollbackFailure) => Some(DeploymentFailed),
        _ => None,
    }
}

/// The event this state's timeout watchdog raises if no transition arrives
/// before the configured timeout. `None` means the
/// state has no timeout-driven escape (terminal states, or states a human
/// operator must move along).
pub fn timeout_event(state: SliceState) -> Option<SliceEvent> {
    use SliceEvent::*;
    use SliceState::*;

    match state {
        Validating => Some(ValidationFailure),
        Planning => Some(PlanningFailure),
        Deploying => Some(DeploymentFailure),
        RollingBack => Some(RollbackFailure),
        ValidationFailed | PlanningFailed => Some(Retry),
        _ => None,
    }
}
