//! Transport error types for agent client failures.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, NetError>;

#[derive(Error, Debug)]
pub enum NetError {
    #[error("agent unreachable at {addr}: {message}")]
    Unreachable { addr: String, message: String },

    #[error("agent call to {addr} timed out after {timeout_ms}ms")]
    Timeout { addr: String, timeout_ms: u64 },

    #[error("protocol mismatch with {addr}: {message}")]
    Protocol { addr: String, message: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("frame too large: {0} bytes")]
    FrameTooLarge(usize),
}
