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

//! TCP transport implementation.
//!
//! This module wraps a Tokio `TcpStream` with the operations one exchange
//! needs: connect within a deadline, write one message, read one message
//! until the peer closes, and shut down.

use super::ConnectionMetadata;
use crate::error::{Result, TcpError};
use bytes::{Bytes, BytesMut};
use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::time::{Duration, Instant};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

#[cfg(feature = "observability")]
use tracing::{debug, info, instrument, warn};

const READ_CHUNK: usize = 8 * 1024;

/// TCP transport for a single request/response exchange.
///
/// `TcpTransport` owns its `TcpStream`. Dropping it closes the socket, so an
/// abandoned call never leaks a connection.
///
/// # Examples
///
/// ```rust,no_run
/// use envelope_tcp::transport::TcpTransport;
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let addr = "127.0.0.1:7001".parse()?;
/// let mut transport = TcpTransport::connect_timeout(addr, Duration::from_secs(3)).await?;
///
/// transport.send(b"<Request/>", None).await?;
/// let response = transport.receive(64 * 1024, Some(Duration::from_secs(30))).await?;
/// println!("Received {} bytes", response.len());
///
/// transport.shutdown().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct TcpTransport {
    stream: TcpStream,
    metadata: ConnectionMetadata,
}

impl TcpTransport {
    /// Wraps an established stream.
    pub fn from_stream(stream: TcpStream, connect_latency: Duration) -> io::Result<Self> {
        let local_addr = stream.local_addr()?;
        let peer_addr = stream.peer_addr()?;
        let metadata = ConnectionMetadata::new(local_addr, peer_addr, connect_latency);

        #[cfg(feature = "observability")]
        debug!(connection = %metadata.id, %local_addr, %peer_addr, "Created TCP transport from stream");

        Ok(Self { stream, metadata })
    }

    /// Connects to `addr`, giving up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`TcpError::ConnectionError`] if the connection is refused,
    /// the peer is unreachable, or the deadline expires first.
    #[cfg_attr(feature = "observability", instrument(skip_all, fields(%addr)))]
    pub async fn connect_timeout(addr: SocketAddr, timeout: Duration) -> Result<Self> {
        #[cfg(feature = "observability")]
        debug!(?timeout, "Connecting to TCP endpoint");

        let started = Instant::now();
        let stream = match tokio::time::timeout(timeout, TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(_e)) => {
                #[cfg(feature = "observability")]
                warn!(error = %_e, "Failed to connect");
                return Err(TcpError::ConnectionError);
            }
            Err(_) => {
                #[cfg(feature = "observability")]
                warn!(?timeout, "Connection was not ready before the deadline");
                return Err(TcpError::ConnectionError);
            }
        };

        let transport = Self::from_stream(stream, started.elapsed()).map_err(|_e| {
            #[cfg(feature = "observability")]
            warn!(error = %_e, "Connection dropped while becoming ready");
            TcpError::ConnectionError
        })?;

        #[cfg(feature = "observability")]
        info!(
            connection = %transport.metadata.id,
            latency = ?transport.metadata.connect_latency,
            "TCP connection established"
        );

        Ok(transport)
    }

    /// Returns the connection metadata.
    pub fn metadata(&self) -> &ConnectionMetadata {
        &self.metadata
    }

    /// Returns the local address of this transport.
    pub fn local_addr(&self) -> SocketAddr {
        self.metadata.local_addr
    }

    /// Returns the peer address of this transport.
    pub fn peer_addr(&self) -> SocketAddr {
        self.metadata.peer_addr
    }

    /// Sets the TCP_NODELAY option on the underlying socket.
    pub fn set_nodelay(&self, nodelay: bool) -> io::Result<()> {
        self.stream.set_nodelay(nodelay)
    }

    /// Gets the TCP_NODELAY option on the underlying socket.
    pub fn nodelay(&self) -> io::Result<bool> {
        self.stream.nodelay()
    }

    /// Writes `message` in full and flushes it.
    ///
    /// # Errors
    ///
    /// - [`TcpError::SendRequestError`] if the write fails
    /// - [`TcpError::TimeoutError`] if `deadline` expires first
    pub async fn send(&mut self, message: &[u8], deadline: Option<Duration>) -> Result<()> {
        let stream = &mut self.stream;
        let write = async move {
            stream.write_all(message).await?;
            stream.flush().await
        };

        with_deadline(deadline, async move {
            write.await.map_err(|_e| {
                #[cfg(feature = "observability")]
                warn!(error = %_e, "Failed to write request");
                TcpError::SendRequestError
            })
        })
        .await?;

        #[cfg(feature = "observability")]
        debug!(connection = %self.metadata.id, size = message.len(), "Request written");

        Ok(())
    }

    /// Reads one complete message: everything the peer writes before closing
    /// its side of the connection.
    ///
    /// # Errors
    ///
    /// - [`TcpError::UnexpectedResponseFormatError`] if the read fails, the
    ///   peer closes without sending anything, or the message grows past
    ///   `max_size` bytes
    /// - [`TcpError::TimeoutError`] if `deadline` expires first
    pub async fn receive(&mut self, max_size: usize, deadline: Option<Duration>) -> Result<Bytes> {
        let message = with_deadline(deadline, read_to_close(&mut self.stream, max_size)).await?;

        #[cfg(feature = "observability")]
        debug!(connection = %self.metadata.id, size = message.len(), "Response received");

        Ok(message.freeze())
    }

    /// Shuts down the write side and releases the connection.
    pub async fn shutdown(&mut self) -> io::Result<()> {
        self.stream.shutdown().await
    }
}

async fn read_to_close(stream: &mut TcpStream, max_size: usize) -> Result<BytesMut> {
    let mut buffer = BytesMut::with_capacity(READ_CHUNK);
    loop {
        buffer.reserve(READ_CHUNK);
        let read = stream.read_buf(&mut buffer).await.map_err(|_e| {
            #[cfg(feature = "observability")]
            warn!(error = %_e, "Failed to read response");
            TcpError::UnexpectedResponseFormatError
        })?;

        if read == 0 {
            break;
        }
        if buffer.len() > max_size {
            #[cfg(feature = "observability")]
            warn!(received = buffer.len(), max_size, "Response exceeds size limit");
            return Err(TcpError::UnexpectedResponseFormatError);
        }
    }

    if buffer.is_empty() {
        #[cfg(feature = "observability")]
        warn!("Peer closed without sending a response");
        return Err(TcpError::UnexpectedResponseFormatError);
    }

    Ok(buffer)
}

async fn with_deadline<T, F>(deadline: Option<Duration>, future: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match deadline {
        Some(limit) => tokio::time::timeout(limit, future).await.unwrap_or_else(|_| {
            #[cfg(feature = "observability")]
            warn!(?limit, "Deadline expired");
            Err(TcpError::TimeoutError)
        }),
        None => future.await,
    }
}
