//! # TN Manager
//!
//! Fans out slice configuration and performance testing across a set of
//! registered per-cluster transport-network agents, aggregates results
//! (commutative: mean of throughput, max of RTT and deploy time), and
//! scores the aggregate against a configurable thesis-compliance target.
//! Also runs fault detection over performance results, site metrics, and
//! agent reachability.

mod client;
mod fault;
mod manager;
mod registry;
mod thesis;

pub use client::{TcpTnAgentClient, TnAgentClient};
pub use fault::{FaultDetector, FaultThresholds};
pub use manager::TnManager;
pub use registry::AgentRegistry;
pub use thesis::{score as score_thesis_compliance, ComplianceReport};
