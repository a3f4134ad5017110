mod lifecycle;
mod registry;
mod retry;
mod transitions;

pub use lifecycle::{EventRecord, SliceLifecycle, SliceListener, TransitionRecord};
pub use registry::{SliceRegistry, SliceSnapshot};
pub use retry::retry_with_backoff;
pub use transitions::{next_state, timeout_event, SliceEvent};
