//! # Mano Transport
//!
//! Pooled, length-prefixed TCP transport carrying the transport-network
//! agent RPC between the TN manager and TN agents.

mod error;
mod frame;
mod pool;

pub use error::{NetError, Result};
pub use frame::{read_frame, write_frame};
pub use pool::{ConnectionPool, PooledConnection};
