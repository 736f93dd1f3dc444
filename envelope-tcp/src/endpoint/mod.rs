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

//! Endpoint descriptors, the endpoint registry, and address resolution.
//!
//! # Overview
//!
//! - **[`Endpoint`]**: what the caller asks for, either a registry name or an
//!   explicit host and port
//! - **[`EndpointRegistry`]**: read-only table of named endpoints, injected
//!   into the client
//! - **[`Resolver`]**: turns an [`Endpoint`] into a numeric [`ResolvedAddress`]
//!
//! Endpoints are resolved lazily, at the start of each session, so a
//! registry that changes between calls is observed by the next call.
//!
//! # Examples
//!
//! ```rust
//! use envelope_tcp::endpoint::{Endpoint, Resolver, StaticRegistry};
//! use std::sync::Arc;
//!
//! let registry = StaticRegistry::new().with_endpoint("primary", "10.0.0.5", 7001);
//! let resolver = Resolver::new(Arc::new(registry));
//!
//! let (host, port) = resolver.locate(&Endpoint::named("primary")).unwrap();
//! assert_eq!(host, "10.0.0.5");
//! assert_eq!(port, 7001);
//! ```

mod registry;
mod resolver;

pub use self::registry::{EndpointRegistry, StaticRegistry};
pub use self::resolver::Resolver;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

/// A logical network destination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// A name looked up in the [`EndpointRegistry`].
    Named(String),

    /// An explicit host and port.
    ///
    /// The port is kept as read from configuration and validated when the
    /// endpoint is resolved.
    Explicit {
        /// Host name or IP literal
        host: String,
        /// Port number, must fit in 16 bits
        port: i32,
    },
}

impl Endpoint {
    /// Creates a reference to a registered endpoint.
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// Creates an explicit endpoint.
    pub fn explicit(host: impl Into<String>, port: i32) -> Self {
        Self::Explicit {
            host: host.into(),
            port,
        }
    }
}

impl From<SocketAddr> for Endpoint {
    fn from(addr: SocketAddr) -> Self {
        Self::explicit(addr.ip().to_string(), i32::from(addr.port()))
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => write!(f, "@{}", name),
            Self::Explicit { host, port } => write!(f, "{}:{}", host, port),
        }
    }
}

/// A host and port pair as stored in an endpoint registry.
///
/// Parses from `host:port`; IPv6 literals must be bracketed
/// (`[::1]:7001`).
///
/// ```rust
/// use envelope_tcp::endpoint::EndpointAddress;
///
/// let address: EndpointAddress = "db.internal:7001".parse().unwrap();
/// assert_eq!(address.host, "db.internal");
/// assert_eq!(address.port, 7001);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EndpointAddress {
    /// Host name or IP literal
    pub host: String,
    /// Port number as configured
    pub port: i32,
}

impl EndpointAddress {
    /// Creates a new endpoint address.
    pub fn new(host: impl Into<String>, port: i32) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for EndpointAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') && !self.host.starts_with('[') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

/// Error returned when an `host:port` string is malformed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidEndpointAddress(pub String);

impl fmt::Display for InvalidEndpointAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid endpoint address: {}", self.0)
    }
}

impl std::error::Error for InvalidEndpointAddress {}

impl FromStr for EndpointAddress {
    type Err = InvalidEndpointAddress;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidEndpointAddress(s.to_string());
        let (host, port) = s.trim().rsplit_once(':').ok_or_else(invalid)?;
        let host = host
            .strip_prefix('[')
            .and_then(|h| h.strip_suffix(']'))
            .unwrap_or(host);
        if host.is_empty() || (host.contains(':') && !s.trim().starts_with('[')) {
            return Err(invalid());
        }
        let port = port.parse::<i32>().map_err(|_| invalid())?;
        Ok(Self::new(host, port))
    }
}

/// The numeric address an endpoint resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAddress {
    /// The host string the address was resolved from
    pub host: String,
    /// Numeric socket address to connect to
    pub addr: SocketAddr,
}

impl fmt::Display for ResolvedAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host == self.addr.ip().to_string() {
            write!(f, "{}", self.addr)
        } else {
            write!(f, "{} ({})", self.addr, self.host)
        }
    }
}
