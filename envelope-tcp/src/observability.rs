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

//! Observability support.
//!
//! - **[`SessionMetrics`]**: session outcomes, connection lifecycle and byte
//!   counts, kept in atomics and mirrored to the `metrics` crate
//! - **[`log_error`]**: structured logging of a call's terminal error
//!
//! Both are active only with the `observability` feature; without it the
//! counters still work but nothing is exported or logged.
//!
//! # Reading Metrics
//!
//! ```rust
//! use envelope_tcp::{StaticCredentials, TcpClient};
//!
//! let client = TcpClient::builder(StaticCredentials::new("ORG-1", "secret")).build();
//!
//! let metrics = client.metrics();
//! assert_eq!(metrics.active_sessions(), 0);
//! ```
//!
//! # Exporting
//!
//! Install any `metrics` recorder (Prometheus, StatsD, ...) before making
//! calls; the counters are published under the `envelope_tcp.` prefix:
//!
//! - `envelope_tcp.sessions.started` / `.succeeded` / `.failed{kind}` / `.cancelled`
//! - `envelope_tcp.sessions.active` (gauge)
//! - `envelope_tcp.connections.opened` / `.closed`
//! - `envelope_tcp.connections.active` (gauge)
//! - `envelope_tcp.bytes.sent` / `.received`

mod metrics;

pub use self::metrics::SessionMetrics;

use crate::error::TcpError;

/// Logs a call's terminal error with structured context.
///
/// Protocol rejections are expected outcomes and log at `INFO`; everything
/// else logs at `WARN`, or `ERROR` when the caller cannot fix it by retrying.
#[cfg(feature = "observability")]
pub fn log_error(error: &TcpError) {
    if error.is_protocol_error() {
        tracing::info!(
            error = %error,
            kind = error.kind_name(),
            detail = error.detail(),
            "Server rejected call"
        );
    } else if error.is_recoverable() {
        tracing::warn!(
            error = %error,
            kind = error.kind_name(),
            recoverable = true,
            "Call failed"
        );
    } else {
        tracing::error!(
            error = %error,
            kind = error.kind_name(),
            recoverable = false,
            "Call failed"
        );
    }
}

/// Logs a call's terminal error (no-op when tracing is disabled).
#[cfg(not(feature = "observability"))]
pub fn log_error(_error: &TcpError) {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_every_class() {
        log_error(&TcpError::ConfigurationError);
        log_error(&TcpError::TimeoutError);
        log_error(&TcpError::CommandSpecificError("USER_EXISTS".to_string()));
    }
}
