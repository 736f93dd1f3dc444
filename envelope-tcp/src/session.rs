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

//! Session state machine.
//!
//! A [`Session`] drives one call from endpoint to decoded output over its own
//! connection:
//!
//! ```text
//! Idle -> Resolving -> Connecting -> Ready -> Sending -> AwaitingResponse -> Closed(Success)
//!            |             |           |         |               |
//!            +-------------+-----------+---------+---------------+------> Closed(Failure)
//! ```
//!
//! States only move forward and nothing is retried. The connection, once
//! open, is shut down exactly once before the session reaches `Closed`. If
//! the call future is dropped first, dropping the session closes the socket.

use crate::codec::{EnvelopeCodec, Payload, RequestEnvelope};
use crate::command::Command;
use crate::config::{CredentialProvider, SessionConfig};
use crate::endpoint::{Endpoint, Resolver};
use crate::error::{Result, TcpError};
use crate::observability::{log_error, SessionMetrics};
use crate::transport::TcpTransport;
use serde::Serialize;
use std::fmt;

#[cfg(feature = "observability")]
use tracing::{debug, instrument, warn};

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionOutcome {
    /// Output was returned.
    Success,
    /// An error was returned.
    Failure,
}

/// Lifecycle state of a [`Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// Created, not yet started.
    Idle,
    /// Turning the endpoint into a socket address.
    Resolving,
    /// Waiting for the connection to become ready.
    Connecting,
    /// Connected; the request is being encoded.
    Ready,
    /// Writing the request.
    Sending,
    /// Reading the response.
    AwaitingResponse,
    /// Terminal.
    Closed(SessionOutcome),
}

impl SessionState {
    /// Returns `true` for `Closed` states.
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed(_))
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Resolving => write!(f, "resolving"),
            Self::Connecting => write!(f, "connecting"),
            Self::Ready => write!(f, "ready"),
            Self::Sending => write!(f, "sending"),
            Self::AwaitingResponse => write!(f, "awaiting_response"),
            Self::Closed(SessionOutcome::Success) => write!(f, "closed(success)"),
            Self::Closed(SessionOutcome::Failure) => write!(f, "closed(failure)"),
        }
    }
}

#[derive(Debug)]
struct StateLog {
    history: Vec<SessionState>,
}

impl StateLog {
    fn new() -> Self {
        Self {
            history: vec![SessionState::Idle],
        }
    }

    fn current(&self) -> SessionState {
        self.history.last().copied().unwrap_or(SessionState::Idle)
    }

    fn advance(&mut self, next: SessionState) {
        #[cfg(feature = "observability")]
        debug!(from = %self.current(), to = %next, "Session state changed");
        self.history.push(next);
    }
}

/// One request/response exchange.
///
/// Sessions are created by [`TcpClient`](crate::TcpClient) for every call.
/// They borrow the client's shared, read-only collaborators and own nothing
/// but their connection and state history.
///
/// # Examples
///
/// ```rust,no_run
/// use envelope_tcp::codec::{EmptyOutput, XmlCodec};
/// use envelope_tcp::endpoint::Resolver;
/// use envelope_tcp::observability::SessionMetrics;
/// use envelope_tcp::session::{Session, SessionOutcome, SessionState};
/// use envelope_tcp::{Command, Endpoint, SessionConfig, StaticCredentials, StaticRegistry};
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let resolver = Resolver::new(Arc::new(StaticRegistry::new().with_endpoint("users", "127.0.0.1", 7001)));
/// let credentials = StaticCredentials::new("ORG-1", "secret");
/// let (codec, config, metrics) = (XmlCodec::new(), SessionConfig::default(), SessionMetrics::new());
///
/// let mut session = Session::new(&resolver, &credentials, &codec, &config, &metrics);
/// let _: EmptyOutput = session
///     .run(&Endpoint::named("users"), Command::DeleteUser, None::<&()>)
///     .await?;
/// assert_eq!(session.state(), SessionState::Closed(SessionOutcome::Success));
/// # Ok(())
/// # }
/// ```
pub struct Session<'a, C> {
    resolver: &'a Resolver,
    credentials: &'a dyn CredentialProvider,
    codec: &'a C,
    config: &'a SessionConfig,
    metrics: &'a SessionMetrics,
    log: StateLog,
    transport: Option<TcpTransport>,
}

impl<'a, C> Session<'a, C>
where
    C: EnvelopeCodec,
{
    /// Creates an idle session.
    pub fn new(
        resolver: &'a Resolver,
        credentials: &'a dyn CredentialProvider,
        codec: &'a C,
        config: &'a SessionConfig,
        metrics: &'a SessionMetrics,
    ) -> Self {
        Self {
            resolver,
            credentials,
            codec,
            config,
            metrics,
            log: StateLog::new(),
            transport: None,
        }
    }

    /// Returns the current state.
    pub fn state(&self) -> SessionState {
        self.log.current()
    }

    /// Returns every state this session has been in, oldest first.
    pub fn history(&self) -> &[SessionState] {
        &self.log.history
    }

    /// Runs the exchange and returns the command output.
    ///
    /// A session serves exactly one exchange.
    ///
    /// # Errors
    ///
    /// Returns the [`TcpError`] of the phase that failed; see the crate
    /// documentation for the full table. Running a session that has left
    /// `Idle` returns [`TcpError::ConfigurationError`].
    #[cfg_attr(
        feature = "observability",
        instrument(skip_all, fields(%endpoint, %command, codec = self.codec.name()))
    )]
    pub async fn run<I, O>(&mut self, endpoint: &Endpoint, command: Command, input: Option<&I>) -> Result<O>
    where
        I: Serialize + ?Sized,
        O: Payload,
    {
        if self.state() != SessionState::Idle {
            #[cfg(feature = "observability")]
            warn!(state = %self.state(), "Session has already run");
            return Err(TcpError::ConfigurationError);
        }

        self.metrics.record_session_started();
        let result = self.exchange(endpoint, command, input).await;
        self.close().await;

        match &result {
            Ok(_) => {
                self.log.advance(SessionState::Closed(SessionOutcome::Success));
                self.metrics.record_session_succeeded();
            }
            Err(error) => {
                self.log.advance(SessionState::Closed(SessionOutcome::Failure));
                self.metrics.record_session_failed(error);
                log_error(error);
            }
        }

        result
    }

    async fn exchange<I, O>(&mut self, endpoint: &Endpoint, command: Command, input: Option<&I>) -> Result<O>
    where
        I: Serialize + ?Sized,
        O: Payload,
    {
        self.log.advance(SessionState::Resolving);
        let resolved = self.resolver.resolve(endpoint).await?;

        self.log.advance(SessionState::Connecting);
        let transport = TcpTransport::connect_timeout(resolved.addr, self.config.connect_timeout).await?;
        if let Err(_e) = transport.set_nodelay(self.config.nodelay) {
            #[cfg(feature = "observability")]
            debug!(error = %_e, "Failed to set TCP_NODELAY");
        }
        self.metrics.record_connection_opened();
        let transport = self.transport.insert(transport);

        self.log.advance(SessionState::Ready);
        let envelope = RequestEnvelope::new(self.credentials, command, input);
        let request = self.codec.encode_request(&envelope)?;

        self.log.advance(SessionState::Sending);
        transport.send(&request, self.config.send_timeout).await?;
        self.metrics.record_bytes_sent(request.len() as u64);

        self.log.advance(SessionState::AwaitingResponse);
        let response = transport
            .receive(self.config.max_response_size, self.config.receive_timeout)
            .await?;
        self.metrics.record_bytes_received(response.len() as u64);

        self.codec.decode_response::<O>(&response)?.into_output()
    }

    /// Shuts the connection down if it is open. Later calls do nothing.
    pub async fn close(&mut self) {
        if let Some(mut transport) = self.transport.take() {
            if let Err(_e) = transport.shutdown().await {
                #[cfg(feature = "observability")]
                debug!(connection = %transport.metadata().id, error = %_e, "Shutdown reported an error");
            }
            self.metrics.record_connection_closed();

            #[cfg(feature = "observability")]
            debug!(
                connection = %transport.metadata().id,
                age = ?transport.metadata().age(),
                "Connection closed"
            );
        }
    }
}

impl<C> fmt::Debug for Session<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.log.current())
            .field("transport", &self.transport)
            .finish_non_exhaustive()
    }
}

impl<C> Drop for Session<'_, C> {
    fn drop(&mut self) {
        if self.transport.take().is_some() {
            self.metrics.record_connection_closed();
        }

        let state = self.log.current();
        if state != SessionState::Idle && !state.is_closed() {
            #[cfg(feature = "observability")]
            warn!(%state, "Session dropped before completing");
            self.metrics.record_session_cancelled();
        }
    }
}
