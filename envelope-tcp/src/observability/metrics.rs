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

//! Session metrics.
//!
//! Counters are kept in atomics so a shared [`SessionMetrics`] can be read at
//! any time, and are mirrored to the `metrics` crate facade when the
//! `observability` feature is enabled.

use crate::error::TcpError;
use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for call sessions.
///
/// Tracks session outcomes, connection lifecycle, bytes transferred and
/// failures by error class.
///
/// # Examples
///
/// ```rust
/// use envelope_tcp::observability::SessionMetrics;
/// use envelope_tcp::TcpError;
///
/// let metrics = SessionMetrics::new();
/// metrics.record_session_started();
/// metrics.record_connection_opened();
/// metrics.record_bytes_sent(256);
/// metrics.record_connection_closed();
/// metrics.record_session_failed(&TcpError::BadCommandError);
///
/// assert_eq!(metrics.active_sessions(), 0);
/// assert_eq!(metrics.total_protocol_errors(), 1);
/// assert_eq!(metrics.total_bytes_sent(), 256);
/// ```
#[derive(Debug, Default)]
pub struct SessionMetrics {
    /// Sessions started
    sessions_started: AtomicU64,
    /// Sessions that returned output
    sessions_succeeded: AtomicU64,
    /// Sessions that returned an error
    sessions_failed: AtomicU64,
    /// Sessions dropped before reaching a terminal state
    sessions_cancelled: AtomicU64,
    /// Connections that became ready
    connections_opened: AtomicU64,
    /// Connections torn down
    connections_closed: AtomicU64,
    /// Request bytes written
    bytes_sent: AtomicU64,
    /// Response bytes read
    bytes_received: AtomicU64,
    /// Failures reaching the server or moving bytes
    transport_errors: AtomicU64,
    /// Rejections and unusable answers from the server
    protocol_errors: AtomicU64,
    /// Configuration or message format failures
    format_errors: AtomicU64,
    /// Send or receive deadlines that expired
    timeouts: AtomicU64,
}

impl SessionMetrics {
    /// Creates a metrics tracker with all counters at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a session entering `Resolving`.
    pub fn record_session_started(&self) {
        self.sessions_started.fetch_add(1, Ordering::Relaxed);
        #[cfg(feature = "observability")]
        {
            metrics::counter!("envelope_tcp.sessions.started").increment(1);
            metrics::gauge!("envelope_tcp.sessions.active").increment(1.0);
        }
    }

    /// Records a session closing with output.
    pub fn record_session_succeeded(&self) {
        self.sessions_succeeded.fetch_add(1, Ordering::Relaxed);
        #[cfg(feature = "observability")]
        {
            metrics::counter!("envelope_tcp.sessions.succeeded").increment(1);
            metrics::gauge!("envelope_tcp.sessions.active").decrement(1.0);
        }
    }

    /// Records a session closing with `error`.
    pub fn record_session_failed(&self, error: &TcpError) {
        self.sessions_failed.fetch_add(1, Ordering::Relaxed);
        let class = if error.is_transport_error() {
            &self.transport_errors
        } else if error.is_protocol_error() {
            &self.protocol_errors
        } else {
            &self.format_errors
        };
        class.fetch_add(1, Ordering::Relaxed);
        if matches!(error, TcpError::TimeoutError) {
            self.timeouts.fetch_add(1, Ordering::Relaxed);
        }

        #[cfg(feature = "observability")]
        {
            metrics::counter!("envelope_tcp.sessions.failed", "kind" => error.kind_name()).increment(1);
            metrics::gauge!("envelope_tcp.sessions.active").decrement(1.0);
        }
    }

    /// Records a session dropped mid-flight.
    pub fn record_session_cancelled(&self) {
        self.sessions_cancelled.fetch_add(1, Ordering::Relaxed);
        #[cfg(feature = "observability")]
        {
            metrics::counter!("envelope_tcp.sessions.cancelled").increment(1);
            metrics::gauge!("envelope_tcp.sessions.active").decrement(1.0);
        }
    }

    /// Records a connection becoming ready.
    pub fn record_connection_opened(&self) {
        self.connections_opened.fetch_add(1, Ordering::Relaxed);
        #[cfg(feature = "observability")]
        {
            metrics::counter!("envelope_tcp.connections.opened").increment(1);
            metrics::gauge!("envelope_tcp.connections.active").increment(1.0);
        }
    }

    /// Records a connection being torn down.
    pub fn record_connection_closed(&self) {
        self.connections_closed.fetch_add(1, Ordering::Relaxed);
        #[cfg(feature = "observability")]
        {
            metrics::counter!("envelope_tcp.connections.closed").increment(1);
            metrics::gauge!("envelope_tcp.connections.active").decrement(1.0);
        }
    }

    /// Records request bytes written.
    pub fn record_bytes_sent(&self, bytes: u64) {
        self.bytes_sent.fetch_add(bytes, Ordering::Relaxed);
        #[cfg(feature = "observability")]
        metrics::counter!("envelope_tcp.bytes.sent").increment(bytes);
    }

    /// Records response bytes read.
    pub fn record_bytes_received(&self, bytes: u64) {
        self.bytes_received.fetch_add(bytes, Ordering::Relaxed);
        #[cfg(feature = "observability")]
        metrics::counter!("envelope_tcp.bytes.received").increment(bytes);
    }

    /// Returns the number of sessions that have started but not closed.
    #[must_use]
    pub fn active_sessions(&self) -> u64 {
        let started = self.sessions_started.load(Ordering::Relaxed);
        let finished = self.sessions_succeeded.load(Ordering::Relaxed)
            + self.sessions_failed.load(Ordering::Relaxed)
            + self.sessions_cancelled.load(Ordering::Relaxed);
        started.saturating_sub(finished)
    }

    /// Returns the number of connections currently open.
    #[must_use]
    pub fn active_connections(&self) -> u64 {
        let opened = self.connections_opened.load(Ordering::Relaxed);
        let closed = self.connections_closed.load(Ordering::Relaxed);
        opened.saturating_sub(closed)
    }

    /// Returns the total number of sessions started.
    #[must_use]
    pub fn total_sessions_started(&self) -> u64 {
        self.sessions_started.load(Ordering::Relaxed)
    }

    /// Returns the total number of sessions that returned output.
    #[must_use]
    pub fn total_sessions_succeeded(&self) -> u64 {
        self.sessions_succeeded.load(Ordering::Relaxed)
    }

    /// Returns the total number of sessions that failed.
    #[must_use]
    pub fn total_sessions_failed(&self) -> u64 {
        self.sessions_failed.load(Ordering::Relaxed)
    }

    /// Returns the total number of sessions dropped mid-flight.
    #[must_use]
    pub fn total_sessions_cancelled(&self) -> u64 {
        self.sessions_cancelled.load(Ordering::Relaxed)
    }

    /// Returns the total number of connections opened.
    #[must_use]
    pub fn total_connections_opened(&self) -> u64 {
        self.connections_opened.load(Ordering::Relaxed)
    }

    /// Returns the total number of connections closed.
    #[must_use]
    pub fn total_connections_closed(&self) -> u64 {
        self.connections_closed.load(Ordering::Relaxed)
    }

    /// Returns the total bytes sent.
    #[must_use]
    pub fn total_bytes_sent(&self) -> u64 {
        self.bytes_sent.load(Ordering::Relaxed)
    }

    /// Returns the total bytes received.
    #[must_use]
    pub fn total_bytes_received(&self) -> u64 {
        self.bytes_received.load(Ordering::Relaxed)
    }

    /// Returns the total number of transport-class failures.
    #[must_use]
    pub fn total_transport_errors(&self) -> u64 {
        self.transport_errors.load(Ordering::Relaxed)
    }

    /// Returns the total number of protocol-class failures.
    #[must_use]
    pub fn total_protocol_errors(&self) -> u64 {
        self.protocol_errors.load(Ordering::Relaxed)
    }

    /// Returns the total number of configuration and format failures.
    #[must_use]
    pub fn total_format_errors(&self) -> u64 {
        self.format_errors.load(Ordering::Relaxed)
    }

    /// Returns the total number of expired deadlines.
    #[must_use]
    pub fn total_timeouts(&self) -> u64 {
        self.timeouts.load(Ordering::Relaxed)
    }

    /// Resets all counters to zero.
    pub fn reset(&self) {
        for counter in [
            &self.sessions_started,
            &self.sessions_succeeded,
            &self.sessions_failed,
            &self.sessions_cancelled,
            &self.connections_opened,
            &self.connections_closed,
            &self.bytes_sent,
            &self.bytes_received,
            &self.transport_errors,
            &self.protocol_errors,
            &self.format_errors,
            &self.timeouts,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}
