//
// Copyright 2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Connection identity and metadata.

use std::fmt;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier for one connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Wraps a raw id.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Allocates the next id.
    pub fn next() -> Self {
        Self(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw ID value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Connection({})", self.0)
    }
}

/// Facts about an established connection, kept for logging and metrics.
#[derive(Debug, Clone)]
pub struct ConnectionMetadata {
    /// Unique identifier for this connection
    pub id: ConnectionId,

    /// Local socket address
    pub local_addr: SocketAddr,

    /// Remote socket address
    pub peer_addr: SocketAddr,

    /// Time spent establishing the connection
    pub connect_latency: Duration,

    /// When the connection became ready
    pub connected_at: Instant,
}

impl ConnectionMetadata {
    /// Creates metadata for a connection that just became ready.
    pub fn new(local_addr: SocketAddr, peer_addr: SocketAddr, connect_latency: Duration) -> Self {
        Self {
            id: ConnectionId::next(),
            local_addr,
            peer_addr,
            connect_latency,
            connected_at: Instant::now(),
        }
    }

    /// Returns how long the connection has been open.
    pub fn age(&self) -> Duration {
        self.connected_at.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let first = ConnectionId::next();
        let second = ConnectionId::next();
        assert!(second > first);
        assert_eq!(ConnectionId::new(7).to_string(), "Connection(7)");
    }

    #[test]
    fn test_metadata() {
        let local: SocketAddr = "127.0.0.1:50000".parse().unwrap();
        let peer: SocketAddr = "127.0.0.1:7001".parse().unwrap();
        let metadata = ConnectionMetadata::new(local, peer, Duration::from_millis(2));

        assert_eq!(metadata.peer_addr, peer);
        assert_eq!(metadata.connect_latency, Duration::from_millis(2));
        assert!(metadata.age() < Duration::from_secs(5));
    }
}
