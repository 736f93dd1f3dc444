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

//! Configuration types.
//!
//! - [`SessionConfig`]: timeouts and limits applied to every session
//! - [`CredentialProvider`]: source of the organization id and auth code
//!   injected into each request envelope
//! - [`ClientConfig`]: a serializable bundle of credentials, named endpoints
//!   and session settings, loadable from JSON or the environment

use crate::endpoint::{EndpointAddress, StaticRegistry};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Default connection-establishment timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(3);

/// Default send and receive timeout.
pub const DEFAULT_IO_TIMEOUT: Duration = Duration::from_secs(30);

/// Default upper bound on the size of a response message.
pub const DEFAULT_MAX_RESPONSE_SIZE: usize = 16 * 1024 * 1024;

/// Settings applied to each session.
///
/// # Examples
///
/// ```rust
/// use envelope_tcp::SessionConfig;
/// use std::time::Duration;
///
/// let config = SessionConfig::new()
///     .with_connect_timeout(Duration::from_secs(1))
///     .with_receive_timeout(None);
///
/// assert_eq!(config.connect_timeout, Duration::from_secs(1));
/// assert_eq!(config.receive_timeout, None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Time allowed for the connection to become ready.
    ///
    /// Default: 3 seconds
    pub connect_timeout: Duration,

    /// Time allowed for writing the request. `None` waits indefinitely.
    ///
    /// Default: 30 seconds
    pub send_timeout: Option<Duration>,

    /// Time allowed for the complete response to arrive. `None` waits
    /// indefinitely.
    ///
    /// Default: 30 seconds
    pub receive_timeout: Option<Duration>,

    /// Largest response accepted, in bytes.
    ///
    /// Default: 16 MB
    pub max_response_size: usize,

    /// Disable Nagle's algorithm on the connection.
    ///
    /// Default: true
    pub nodelay: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            send_timeout: Some(DEFAULT_IO_TIMEOUT),
            receive_timeout: Some(DEFAULT_IO_TIMEOUT),
            max_response_size: DEFAULT_MAX_RESPONSE_SIZE,
            nodelay: true,
        }
    }
}

impl SessionConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the connection-establishment timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the send timeout.
    pub fn with_send_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.send_timeout = timeout;
        self
    }

    /// Sets the receive timeout.
    pub fn with_receive_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.receive_timeout = timeout;
        self
    }

    /// Sets the maximum response size.
    pub fn with_max_response_size(mut self, size: usize) -> Self {
        self.max_response_size = size;
        self
    }

    /// Sets `TCP_NODELAY` for session connections.
    pub fn with_nodelay(mut self, nodelay: bool) -> Self {
        self.nodelay = nodelay;
        self
    }
}

/// Source of the credentials placed in every request envelope.
///
/// Called once per request, so implementations may return values that
/// change between calls.
pub trait CredentialProvider: Send + Sync + 'static {
    /// Returns the organization id (`OrgID`).
    fn organization_id(&self) -> String;

    /// Returns the authentication code (`AuthCode`).
    fn auth_code(&self) -> String;
}

/// Fixed credentials.
///
/// The auth code is redacted from `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct StaticCredentials {
    organization_id: String,
    auth_code: String,
}

impl StaticCredentials {
    /// Creates fixed credentials.
    pub fn new(organization_id: impl Into<String>, auth_code: impl Into<String>) -> Self {
        Self {
            organization_id: organization_id.into(),
            auth_code: auth_code.into(),
        }
    }
}

impl fmt::Debug for StaticCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticCredentials")
            .field("organization_id", &self.organization_id)
            .field("auth_code", &"<redacted>")
            .finish()
    }
}

impl CredentialProvider for StaticCredentials {
    fn organization_id(&self) -> String {
        self.organization_id.clone()
    }

    fn auth_code(&self) -> String {
        self.auth_code.clone()
    }
}

/// Errors raised while loading a [`ClientConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path of the file
        path: String,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The configuration document is not valid JSON for this schema.
    #[cfg(feature = "json")]
    #[error("invalid configuration document: {0}")]
    Json(#[from] serde_json::Error),

    /// A required environment variable is not set.
    #[error("missing environment variable {0}")]
    MissingVariable(String),

    /// An environment variable holds an unusable value.
    #[error("invalid value for {name}: {value}")]
    InvalidVariable {
        /// Variable name
        name: String,
        /// The rejected value
        value: String,
    },
}

/// Environment variable holding the organization id.
pub const ENV_ORG_ID: &str = "ENVELOPE_ORG_ID";

/// Environment variable holding the authentication code.
pub const ENV_AUTH_CODE: &str = "ENVELOPE_AUTH_CODE";

/// Prefix of environment variables declaring named endpoints
/// (`ENVELOPE_ENDPOINT_PRIMARY=10.0.0.5:7001` registers `primary`).
pub const ENV_ENDPOINT_PREFIX: &str = "ENVELOPE_ENDPOINT_";

/// Environment variable overriding the connect timeout, in milliseconds.
pub const ENV_CONNECT_TIMEOUT_MS: &str = "ENVELOPE_CONNECT_TIMEOUT_MS";

fn default_connect_timeout_ms() -> u64 {
    DEFAULT_CONNECT_TIMEOUT.as_millis() as u64
}

fn default_io_timeout_ms() -> u64 {
    DEFAULT_IO_TIMEOUT.as_millis() as u64
}

fn default_max_response_size() -> usize {
    DEFAULT_MAX_RESPONSE_SIZE
}

/// Client configuration document.
///
/// Timeouts are in milliseconds; a send or receive timeout of `0` disables
/// that deadline.
///
/// ```json
/// {
///   "organization_id": "ORG-0042",
///   "auth_code": "4f9a",
///   "endpoints": {
///     "primary": { "host": "10.0.0.5", "port": 7001 }
///   },
///   "connect_timeout_ms": 3000
/// }
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Organization id sent as `OrgID`
    pub organization_id: String,

    /// Authentication code sent as `AuthCode`
    pub auth_code: String,

    /// Named endpoints
    #[serde(default)]
    pub endpoints: HashMap<String, EndpointAddress>,

    /// Connect timeout in milliseconds
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    /// Send timeout in milliseconds, `0` for none
    #[serde(default = "default_io_timeout_ms")]
    pub send_timeout_ms: u64,

    /// Receive timeout in milliseconds, `0` for none
    #[serde(default = "default_io_timeout_ms")]
    pub receive_timeout_ms: u64,

    /// Largest response accepted, in bytes
    #[serde(default = "default_max_response_size")]
    pub max_response_size: usize,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("organization_id", &self.organization_id)
            .field("auth_code", &"<redacted>")
            .field("endpoints", &self.endpoints)
            .field("connect_timeout_ms", &self.connect_timeout_ms)
            .field("send_timeout_ms", &self.send_timeout_ms)
            .field("receive_timeout_ms", &self.receive_timeout_ms)
            .field("max_response_size", &self.max_response_size)
            .finish()
    }
}

impl ClientConfig {
    /// Creates a configuration with the given credentials, no endpoints and
    /// default session settings.
    pub fn new(organization_id: impl Into<String>, auth_code: impl Into<String>) -> Self {
        Self {
            organization_id: organization_id.into(),
            auth_code: auth_code.into(),
            endpoints: HashMap::new(),
            connect_timeout_ms: default_connect_timeout_ms(),
            send_timeout_ms: default_io_timeout_ms(),
            receive_timeout_ms: default_io_timeout_ms(),
            max_response_size: default_max_response_size(),
        }
    }

    /// Adds a named endpoint.
    pub fn with_endpoint(mut self, name: impl Into<String>, host: impl Into<String>, port: i32) -> Self {
        self.endpoints.insert(name.into(), EndpointAddress::new(host, port));
        self
    }

    /// Parses a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] if the document does not match the schema.
    #[cfg(feature = "json")]
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Json`] if it does not parse.
    #[cfg(feature = "json")]
    pub fn from_json_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Builds a configuration from the process environment.
    ///
    /// See [`ClientConfig::from_vars`] for the variables read.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars())
    }

    /// Builds a configuration from `(name, value)` pairs.
    ///
    /// Reads [`ENV_ORG_ID`] and [`ENV_AUTH_CODE`] (required),
    /// [`ENV_CONNECT_TIMEOUT_MS`] (optional), and every variable starting
    /// with [`ENV_ENDPOINT_PREFIX`] as a `host:port` endpoint whose name is
    /// the lowercased suffix.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingVariable`] or
    /// [`ConfigError::InvalidVariable`].
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars: HashMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        let required = |name: &str| {
            vars.get(name)
                .cloned()
                .ok_or_else(|| ConfigError::MissingVariable(name.to_string()))
        };
        let mut config = Self::new(required(ENV_ORG_ID)?, required(ENV_AUTH_CODE)?);

        if let Some(value) = vars.get(ENV_CONNECT_TIMEOUT_MS) {
            config.connect_timeout_ms = value.parse().map_err(|_| ConfigError::InvalidVariable {
                name: ENV_CONNECT_TIMEOUT_MS.to_string(),
                value: value.clone(),
            })?;
        }

        for (key, value) in &vars {
            let Some(name) = key.strip_prefix(ENV_ENDPOINT_PREFIX) else {
                continue;
            };
            let address = value.parse::<EndpointAddress>().map_err(|_| ConfigError::InvalidVariable {
                name: key.clone(),
                value: value.clone(),
            })?;
            config.endpoints.insert(name.to_lowercase(), address);
        }

        Ok(config)
    }

    /// Returns the session settings described by this configuration.
    pub fn session_config(&self) -> SessionConfig {
        let optional = |ms: u64| (ms > 0).then(|| Duration::from_millis(ms));
        SessionConfig::new()
            .with_connect_timeout(Duration::from_millis(self.connect_timeout_ms))
            .with_send_timeout(optional(self.send_timeout_ms))
            .with_receive_timeout(optional(self.receive_timeout_ms))
            .with_max_response_size(self.max_response_size)
    }

    /// Returns a registry holding the configured endpoints.
    pub fn registry(&self) -> StaticRegistry {
        StaticRegistry::from(self.endpoints.clone())
    }

    /// Returns the configured credentials.
    pub fn credentials(&self) -> StaticCredentials {
        StaticCredentials::new(self.organization_id.clone(), self.auth_code.clone())
    }
}
