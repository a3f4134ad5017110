//! # Placement Engine
//!
//! Assigns every slice component to exactly one cluster, minimizing soft
//! constraint violations while respecting hard constraints and QoS
//! feasibility.

mod engine;
mod requirements;
mod scoring;
mod vni_pool;

pub use engine::place;
pub use requirements::{default_vnf_requirements, AffinityKind, AffinityRule, VnfRequirement};
pub use scoring::{is_feasible, rank_sites, score_site};
pub use vni_pool::VniPool;
