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

//! Client entry point.

use crate::codec::{EmptyInput, EnvelopeCodec, Payload, XmlCodec};
use crate::command::Command;
use crate::config::{ClientConfig, CredentialProvider, SessionConfig};
use crate::endpoint::{Endpoint, EndpointRegistry, Resolver, StaticRegistry};
use crate::error::Result;
use crate::observability::SessionMetrics;
use crate::session::Session;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

struct ClientInner<C> {
    resolver: Resolver,
    credentials: Arc<dyn CredentialProvider>,
    codec: C,
    config: SessionConfig,
    metrics: Arc<SessionMetrics>,
}

/// Issues calls, one connection per call.
///
/// `TcpClient` is cheap to clone; clones share the registry, credentials,
/// codec, settings and metrics. Calls on the same client may run
/// concurrently, each on its own connection, and share no mutable state.
///
/// # Examples
///
/// ```rust,no_run
/// use envelope_tcp::codec::EmptyOutput;
/// use envelope_tcp::{Command, Endpoint, StaticCredentials, StaticRegistry, TcpClient};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct UserKey {
///     #[serde(rename = "UserCd")]
///     user_code: String,
/// }
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = TcpClient::builder(StaticCredentials::new("ORG-1", "secret"))
///     .with_registry(StaticRegistry::new().with_endpoint("users", "10.0.0.5", 7001))
///     .build();
///
/// let key = UserKey { user_code: "U1".to_string() };
/// let _: EmptyOutput = client
///     .call(&Endpoint::named("users"), Command::DeleteUser, Some(&key))
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct TcpClient<C = XmlCodec> {
    inner: Arc<ClientInner<C>>,
}

impl TcpClient<XmlCodec> {
    /// Starts building a client that sends `credentials` with every request.
    pub fn builder(credentials: impl CredentialProvider) -> TcpClientBuilder<XmlCodec> {
        TcpClientBuilder::new(credentials)
    }

    /// Creates a client from a loaded [`ClientConfig`].
    pub fn from_config(config: &ClientConfig) -> Self {
        TcpClientBuilder::new(config.credentials())
            .with_registry(config.registry())
            .with_session_config(config.session_config())
            .build()
    }
}

impl<C> TcpClient<C>
where
    C: EnvelopeCodec,
{
    /// Sends `command` with `input` to `endpoint` and returns the decoded
    /// output.
    ///
    /// `input` is omitted from the request when `None`. The output type `O`
    /// decides whether a success response without `OutputData` is
    /// acceptable; see [`Payload`].
    ///
    /// # Errors
    ///
    /// Returns the [`TcpError`](crate::TcpError) of the phase that failed.
    pub async fn call<I, O>(&self, endpoint: &Endpoint, command: Command, input: Option<&I>) -> Result<O>
    where
        I: Serialize + ?Sized,
        O: Payload,
    {
        let inner = &*self.inner;
        let mut session = Session::new(
            &inner.resolver,
            inner.credentials.as_ref(),
            &inner.codec,
            &inner.config,
            &inner.metrics,
        );
        session.run(endpoint, command, input).await
    }

    /// Sends `command` without input.
    pub async fn execute<O>(&self, endpoint: &Endpoint, command: Command) -> Result<O>
    where
        O: Payload,
    {
        self.call::<EmptyInput, O>(endpoint, command, None).await
    }

    /// Returns the shared session metrics.
    pub fn metrics(&self) -> &Arc<SessionMetrics> {
        &self.inner.metrics
    }

    /// Returns the settings applied to every session.
    pub fn session_config(&self) -> &SessionConfig {
        &self.inner.config
    }

    /// Returns the resolver used for every call.
    pub fn resolver(&self) -> &Resolver {
        &self.inner.resolver
    }

    /// Returns the envelope codec.
    pub fn codec(&self) -> &C {
        &self.inner.codec
    }
}

impl<C> Clone for TcpClient<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C> fmt::Debug for TcpClient<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TcpClient")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

/// Builder for [`TcpClient`].
///
/// Only credentials are required. Without a registry, only explicit
/// endpoints can be called.
pub struct TcpClientBuilder<C = XmlCodec> {
    credentials: Arc<dyn CredentialProvider>,
    registry: Arc<dyn EndpointRegistry>,
    codec: C,
    config: SessionConfig,
    metrics: Option<Arc<SessionMetrics>>,
}

impl TcpClientBuilder<XmlCodec> {
    /// Creates a builder with an empty registry, the XML codec and default
    /// session settings.
    pub fn new(credentials: impl CredentialProvider) -> Self {
        Self {
            credentials: Arc::new(credentials),
            registry: Arc::new(StaticRegistry::new()),
            codec: XmlCodec::new(),
            config: SessionConfig::default(),
            metrics: None,
        }
    }
}

impl<C> TcpClientBuilder<C>
where
    C: EnvelopeCodec,
{
    /// Sets the registry used to look up named endpoints.
    pub fn with_registry(mut self, registry: impl EndpointRegistry) -> Self {
        self.registry = Arc::new(registry);
        self
    }

    /// Sets a registry shared with other owners.
    pub fn with_shared_registry(mut self, registry: Arc<dyn EndpointRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Replaces the envelope codec.
    pub fn with_codec<D>(self, codec: D) -> TcpClientBuilder<D>
    where
        D: EnvelopeCodec,
    {
        TcpClientBuilder {
            credentials: self.credentials,
            registry: self.registry,
            codec,
            config: self.config,
            metrics: self.metrics,
        }
    }

    /// Replaces the session settings.
    pub fn with_session_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// Adjusts the session settings in place.
    ///
    /// ```rust
    /// use envelope_tcp::{StaticCredentials, TcpClient};
    /// use std::time::Duration;
    ///
    /// let client = TcpClient::builder(StaticCredentials::new("ORG-1", "secret"))
    ///     .configure(|config| config.connect_timeout = Duration::from_secs(1))
    ///     .build();
    /// assert_eq!(client.session_config().connect_timeout, Duration::from_secs(1));
    /// ```
    pub fn configure<F>(mut self, f: F) -> Self
    where
        F: FnOnce(&mut SessionConfig),
    {
        f(&mut self.config);
        self
    }

    /// Records into `metrics` instead of a fresh tracker.
    pub fn with_metrics(mut self, metrics: Arc<SessionMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Builds the client.
    pub fn build(self) -> TcpClient<C> {
        TcpClient {
            inner: Arc::new(ClientInner {
                resolver: Resolver::new(self.registry),
                credentials: self.credentials,
                codec: self.codec,
                config: self.config,
                metrics: self.metrics.unwrap_or_default(),
            }),
        }
    }
}
