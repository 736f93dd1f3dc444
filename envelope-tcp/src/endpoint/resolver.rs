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

//! Address resolution.
//!
//! Resolution runs in two steps. [`Resolver::locate`] turns an [`Endpoint`]
//! into a validated host and port without touching the network; a missing
//! registry entry or a bad port fails here with
//! [`TcpError::ConfigurationError`]. [`Resolver::resolve`] then turns a
//! symbolic host into a numeric address using the system resolver.

use super::{Endpoint, EndpointRegistry, ResolvedAddress};
use crate::error::{Result, TcpError};
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

#[cfg(feature = "observability")]
use tracing::{debug, instrument, warn};

/// Resolves endpoints against an injected registry.
#[derive(Clone)]
pub struct Resolver {
    registry: Arc<dyn EndpointRegistry>,
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver").finish_non_exhaustive()
    }
}

impl Resolver {
    /// Creates a resolver backed by `registry`.
    pub fn new(registry: Arc<dyn EndpointRegistry>) -> Self {
        Self { registry }
    }

    /// Returns the host and validated port for `endpoint`.
    ///
    /// Performs no network I/O.
    ///
    /// # Errors
    ///
    /// Returns [`TcpError::ConfigurationError`] if a named endpoint is not
    /// registered, the host is empty, or the port does not fit in 16 bits.
    pub fn locate(&self, endpoint: &Endpoint) -> Result<(String, u16)> {
        let (host, port) = match endpoint {
            Endpoint::Named(name) => {
                let address = self.registry.lookup(name).ok_or_else(|| {
                    #[cfg(feature = "observability")]
                    warn!(endpoint = %name, "Endpoint is not registered");
                    TcpError::ConfigurationError
                })?;
                (address.host, address.port)
            }
            Endpoint::Explicit { host, port } => (host.clone(), *port),
        };

        if host.trim().is_empty() {
            #[cfg(feature = "observability")]
            warn!(%endpoint, "Endpoint host is empty");
            return Err(TcpError::ConfigurationError);
        }

        let port = u16::try_from(port).map_err(|_| {
            #[cfg(feature = "observability")]
            warn!(%endpoint, port, "Endpoint port is out of range");
            TcpError::ConfigurationError
        })?;

        Ok((host, port))
    }

    /// Resolves `endpoint` to a numeric socket address.
    ///
    /// IP literals (including bracketed IPv6) are used as-is. Other hosts
    /// go through the system resolver for stream sockets of any address
    /// family, and the first returned address is used.
    ///
    /// # Errors
    ///
    /// Returns [`TcpError::ConfigurationError`] as [`Resolver::locate`] does,
    /// and [`TcpError::AddressResolutionError`] if the lookup fails or
    /// yields nothing.
    #[cfg_attr(feature = "observability", instrument(skip_all, fields(endpoint = %endpoint)))]
    pub async fn resolve(&self, endpoint: &Endpoint) -> Result<ResolvedAddress> {
        let (host, port) = self.locate(endpoint)?;

        if let Some(ip) = parse_ip_literal(&host) {
            return Ok(ResolvedAddress {
                addr: SocketAddr::new(ip, port),
                host,
            });
        }

        let addr = lookup(&host, port).await?;

        #[cfg(feature = "observability")]
        debug!(%host, %addr, "Resolved endpoint");

        Ok(ResolvedAddress { host, addr })
    }
}

fn parse_ip_literal(host: &str) -> Option<IpAddr> {
    let host = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host);
    host.parse().ok()
}

async fn lookup(host: &str, port: u16) -> Result<SocketAddr> {
    // The returned iterator owns the whole result list and is dropped here.
    let mut addrs = tokio::net::lookup_host((host, port)).await.map_err(|_e| {
        #[cfg(feature = "observability")]
        warn!(%host, error = %_e, "Name resolution failed");
        TcpError::AddressResolutionError
    })?;

    addrs.next().ok_or_else(|| {
        #[cfg(feature = "observability")]
        warn!(%host, "Name resolution returned no addresses");
        TcpError::AddressResolutionError
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::{EndpointAddress, StaticRegistry};

    fn resolver() -> Resolver {
        let registry = StaticRegistry::new()
            .with_endpoint("primary", "192.168.10.4", 7001)
            .with_endpoint("loopback", "localhost", 7002)
            .with_endpoint("v6", "[::1]", 7003)
            .with_endpoint("negative", "10.0.0.1", -1)
            .with_endpoint("too-large", "10.0.0.1", 65_536)
            .with_endpoint("blank", "  ", 7004);
        Resolver::new(Arc::new(registry))
    }

    #[test]
    fn test_locate_named() {
        let (host, port) = resolver().locate(&Endpoint::named("primary")).unwrap();
        assert_eq!(host, "192.168.10.4");
        assert_eq!(port, 7001);
    }

    #[test]
    fn test_locate_unregistered() {
        let result = resolver().locate(&Endpoint::named("missing"));
        assert_eq!(result, Err(TcpError::ConfigurationError));
    }

    #[test]
    fn test_locate_port_range() {
        let resolver = resolver();
        assert_eq!(
            resolver.locate(&Endpoint::named("negative")),
            Err(TcpError::ConfigurationError)
        );
        assert_eq!(
            resolver.locate(&Endpoint::named("too-large")),
            Err(TcpError::ConfigurationError)
        );
        assert_eq!(
            resolver.locate(&Endpoint::explicit("10.0.0.1", 65_535)),
            Ok(("10.0.0.1".to_string(), 65_535))
        );
        assert_eq!(
            resolver.locate(&Endpoint::explicit("10.0.0.1", 0)),
            Ok(("10.0.0.1".to_string(), 0))
        );
    }

    #[test]
    fn test_locate_blank_host() {
        assert_eq!(
            resolver().locate(&Endpoint::named("blank")),
            Err(TcpError::ConfigurationError)
        );
    }

    #[test]
    fn test_registry_changes_are_seen() {
        let mut registry = StaticRegistry::new();
        assert!(Resolver::new(Arc::new(registry.clone()))
            .locate(&Endpoint::named("late"))
            .is_err());

        registry.insert("late", EndpointAddress::new("10.9.9.9", 9));
        assert!(Resolver::new(Arc::new(registry))
            .locate(&Endpoint::named("late"))
            .is_ok());
    }

    #[tokio::test]
    async fn test_resolve_ip_literal() {
        let resolved = resolver().resolve(&Endpoint::named("primary")).await.unwrap();
        assert_eq!(resolved.addr, "192.168.10.4:7001".parse().unwrap());
        assert_eq!(resolved.host, "192.168.10.4");
    }

    #[tokio::test]
    async fn test_resolve_bracketed_ipv6() {
        let resolved = resolver().resolve(&Endpoint::named("v6")).await.unwrap();
        assert_eq!(resolved.addr, "[::1]:7003".parse().unwrap());
    }

    #[tokio::test]
    async fn test_resolve_localhost() {
        let resolved = resolver().resolve(&Endpoint::named("loopback")).await.unwrap();
        assert!(resolved.addr.ip().is_loopback());
        assert_eq!(resolved.addr.port(), 7002);
    }

    #[tokio::test]
    async fn test_resolve_unknown_host() {
        // `.invalid` is reserved and never resolves.
        let result = resolver()
            .resolve(&Endpoint::explicit("no-such-host.invalid", 7001))
            .await;
        assert_eq!(result, Err(TcpError::AddressResolutionError));
    }

    #[tokio::test]
    async fn test_resolve_unregistered_fails_before_lookup() {
        let result = resolver().resolve(&Endpoint::named("missing")).await;
        assert_eq!(result, Err(TcpError::ConfigurationError));
    }
}
