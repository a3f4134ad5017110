//! Agent client contract and its one concrete transport, built over
//! `mano-net`'s pooled TCP connections and `mano-wire`'s request/reply
//! shapes: a small trait at the transport seam with one TCP implementation
//! behind it, so tests can swap in a fake client.

use async_trait::async_trait;
use mano_net::{read_frame, write_frame, ConnectionPool};
use mano_types::tn::TnSlice;
use mano_types::{ErrorKind, ManoError, Result};
use mano_wire::{AgentStatus, PerfMetrics, PerfTestConfig, TnRequest, TnResponse};
use std::time::Duration;

#[async_trait]
pub trait TnAgentClient: Send + Sync {
    async fn connect(&self) -> Result<()>;
    async fn configure_slice(&self, slice_id: uuid::Uuid, config: TnSlice) -> Result<()>;
    async fn get_status(&self) -> Result<AgentStatus>;
    async fn run_performance_test(&self, config: PerfTestConfig) -> Result<PerfMetrics>;
    async fn stop(&self) -> Result<()>;
}

/// Maps a transport failure onto the stable error taxonomy: unreachable
/// and protocol errors pass through by kind, everything else (framing,
/// io) surfaces as a protocol mismatch since the agent did respond, just
/// not sensibly.
fn to_mano_error(addr: &str, err: mano_net::NetError) -> ManoError {
    match err {
        mano_net::NetError::Unreachable { message, .. } => {
            ManoError::new(ErrorKind::AgentUnreachable, format!("{addr}: {message}"))
        }
        mano_net::NetError::Timeout { timeout_ms, .. } => {
            ManoError::new(ErrorKind::AgentTimeout, format!("{addr}: timed out after {timeout_ms}ms"))
        }
        other => ManoError::new(ErrorKind::AgentProtocol, format!("{addr}: {other}")),
    }
}

pub struct TcpTnAgentClient {
    addr: String,
    pool: ConnectionPool,
    call_timeout: Duration,
}

impl TcpTnAgentClient {
    pub fn new(addr: impl Into<String>, pool: ConnectionPool, call_timeout: Duration) -> Self {
        Self { addr: addr.into(), pool, call_timeout }
    }

    async fn call(&self, request: TnRequest) -> Result<TnResponse> {
        let mut conn = self.pool.checkout(&self.addr).await.map_err(|e| to_mano_error(&self.addr, e))?;

        let outcome = tokio::time::timeout(self.call_timeout, async {
            write_frame(&mut conn.stream, &request).await?;
            read_frame::<_, TnResponse>(&mut conn.stream).await
        })
        .await;

        match outcome {
            Ok(Ok(response)) => {
                conn.release().await;
                match response {
                    TnResponse::Error(message) => Err(ManoError::new(ErrorKind::AgentProtocol, format!("{}: {message}", self.addr))),
                    other => Ok(other),
                }
            }
            Ok(Err(err)) => Err(to_mano_error(&self.addr, err)),
            Err(_) => Err(ManoError::new(
                ErrorKind::AgentTimeout,
                format!("{}: call timed out after {}ms", self.addr, self.call_timeout.as_millis()),
            )),
        }
    }
}

#[async_trait]
impl TnAgentClient for TcpTnAgentClient {
    async fn connect(&self) -> Result<()> {
        self.pool.checkout(&self.addr).await.map(|conn| drop(conn)).map_err(|e| to_mano_error(&self.addr, e))
    }

    async fn configure_slice(&self, slice_id: uuid::Uuid, config: TnSlice) -> Result<()> {
        match self.call(TnRequest::ConfigureSlice { slice_id, config }).await? {
            TnResponse::Ack => Ok(()),
            other => Err(ManoError::new(ErrorKind::AgentProtocol, format!("{}: unexpected reply {other:?}", self.addr))),
        }
    }

    async fn get_status(&self) -> Result<AgentStatus> {
        match self.call(TnRequest::GetStatus).await? {
            TnResponse::Status(status) => Ok(status),
            other => Err(ManoError::new(ErrorKind::AgentProtocol, format!("{}: unexpected reply {other:?}", self.addr))),
        }
    }

    async fn run_performance_test(&self, config: PerfTestConfig) -> Result<PerfMetrics> {
        match self.call(TnRequest::RunPerformanceTest { config }).await? {
            TnResponse::PerfResult(metrics) => Ok(metrics),
            other => Err(ManoError::new(ErrorKind::AgentProtocol, format!("{}: unexpected reply {other:?}", self.addr))),
        }
    }

    async fn stop(&self) -> Result<()> {
        match self.call(TnRequest::Stop).await? {
            TnResponse::Ack => Ok(()),
            other => Err(ManoError::new(ErrorKind::AgentProtocol, format!("{}: unexpected reply {other:?}", self.addr))),
        }
    }
}
