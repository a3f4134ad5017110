//! # Mano Data Model
//!
//! Unified type system for the intent-driven O-RAN slice MANO platform.
//!
//! ## Design Philosophy
//!
//! - **Immutable facts, mutable state**: `Intent`, `SliceConfiguration` and
//!   `PlacementDecision` are produced once and never mutated; only
//!   `SliceRuntimeState` changes over a slice's life, and only through its
//!   owning state machine.
//! - **No floating ambiguity at the wire boundary**: every quantity that
//!   crosses a component boundary (VNI, IP, bandwidth) carries its unit in
//!   the type or field name.
//! - **Errors are data**: `ManoError` is the single error surface shared by
//!   every crate in the workspace; callers match on `ErrorKind`.
//!
//! ## Quick Start
//!
//! ```
//! use mano_types::qos::{QosProfile, QosRequirement};
//!
//! let mut profile = QosProfile::default();
//! profile.latency = QosRequirement::max(10.0, "ms");
//! assert!(profile.latency.max.unwrap() <= 10.0);
//! ```

pub mod error;
pub mod fault;
pub mod intent;
pub mod placement;
pub mod policy;
pub mod qos;
pub mod runtime;
pub mod site;
pub mod slice;
pub mod tn;

pub use error::{ErrorKind, ManoError, Result};
pub use intent::{Constraint, ConstraintType, Intent, Priority, ServiceClass};
pub use placement::{ClusterPlacement, PlacementDecision, VnfPlacement};
pub use policy::NetworkPolicy;
pub use qos::{QosDimension, QosProfile, QosRequirement};
pub use runtime::{SliceRuntimeState, SliceState};
pub use site::{Site, SiteMetrics, SiteType};
pub use slice::SliceConfiguration;
pub use tn::{EndpointRole, TnEndpoint, TnSlice};
