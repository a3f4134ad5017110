//! # Mano Wire Protocol
//!
//! Message construction for the request/reply RPC between the TN manager
//! and TN agents: `configure-slice`, `get-status`, `run-performance-test`,
//! `stop`. Framing and transport are pluggable; this crate only fixes the
//! message shapes and their encode/decode rules, separate from whatever
//! carries the bytes.
//!
//! Implementations must preserve operation idempotency: the same
//! `slice_id` + `TnSlice` passed to `ConfigureSlice` twice is a no-op on
//! the agent the second time. That contract is documented here and
//! enforced by each `TnAgentClient` implementation, not by this crate.

mod message;

pub use message::{AgentStatus, PerfMetrics, PerfTestConfig, TnRequest, TnResponse};
