//! # Mano Configuration
//!
//! Centralized configuration for every component of the slice MANO
//! platform: placement scoring weights, site capability ceilings,
//! lifecycle state timeouts, retry policy, VXLAN/TC defaults, and the
//! thesis compliance targets.
//!
//! ## Usage
//!
//! ```no_run
//! use mano_config::Config;
//!
//! let config = Config::load(None, None).unwrap();
//! let weights = &config.placement.weights;
//! ```
//!
//! Runtime reconfiguration is a new `Config` published through
//! [`SharedConfig`]; existing in-flight operations hold their own `Arc`
//! and are unaffected by a later swap.

mod loader;
mod shared;
mod types;

pub use shared::SharedConfig;
pub use types::{
    Config, PlacementConfig, PlacementWeights, RetryPolicy, SiteCaps, StateMachineConfig,
    TcConfig, ThesisConfig, VxlanConfig,
};
