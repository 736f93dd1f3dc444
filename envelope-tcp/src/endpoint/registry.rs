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

//! Named endpoint tables.

use super::EndpointAddress;
use std::collections::HashMap;

/// Source of named endpoints.
///
/// The resolver treats a registry as read-only for the duration of a call.
/// Implementations that change over time must synchronize internally.
///
/// # Examples
///
/// ```rust
/// use envelope_tcp::endpoint::{EndpointAddress, EndpointRegistry};
///
/// struct SingleEndpoint;
///
/// impl EndpointRegistry for SingleEndpoint {
///     fn lookup(&self, name: &str) -> Option<EndpointAddress> {
///         (name == "primary").then(|| EndpointAddress::new("127.0.0.1", 7001))
///     }
/// }
/// ```
pub trait EndpointRegistry: Send + Sync + 'static {
    /// Returns the address registered under `name`, if any.
    fn lookup(&self, name: &str) -> Option<EndpointAddress>;
}

/// A fixed, in-memory endpoint table.
///
/// # Examples
///
/// ```rust
/// use envelope_tcp::endpoint::{EndpointRegistry, StaticRegistry};
///
/// let registry = StaticRegistry::new()
///     .with_endpoint("a", "10.0.0.1", 7001)
///     .with_endpoint("b", "10.0.0.2", 7002);
///
/// assert_eq!(registry.len(), 2);
/// assert_eq!(registry.lookup("b").unwrap().port, 7002);
/// assert!(registry.lookup("c").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticRegistry {
    endpoints: HashMap<String, EndpointAddress>,
}

impl StaticRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an endpoint and returns the registry.
    pub fn with_endpoint(mut self, name: impl Into<String>, host: impl Into<String>, port: i32) -> Self {
        self.insert(name, EndpointAddress::new(host, port));
        self
    }

    /// Adds or replaces an endpoint, returning the previous address.
    pub fn insert(&mut self, name: impl Into<String>, address: EndpointAddress) -> Option<EndpointAddress> {
        self.endpoints.insert(name.into(), address)
    }

    /// Returns the number of registered endpoints.
    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    /// Returns `true` if no endpoints are registered.
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// Iterates over the registered names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.endpoints.keys().map(String::as_str)
    }
}

impl EndpointRegistry for StaticRegistry {
    fn lookup(&self, name: &str) -> Option<EndpointAddress> {
        self.endpoints.get(name).cloned()
    }
}

impl From<HashMap<String, EndpointAddress>> for StaticRegistry {
    fn from(endpoints: HashMap<String, EndpointAddress>) -> Self {
        Self { endpoints }
    }
}

impl FromIterator<(String, EndpointAddress)> for StaticRegistry {
    fn from_iter<I: IntoIterator<Item = (String, EndpointAddress)>>(iter: I) -> Self {
        Self {
            endpoints: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_replaces() {
        let mut registry = StaticRegistry::new();
        assert!(registry.insert("a", EndpointAddress::new("10.0.0.1", 1)).is_none());
        let previous = registry.insert("a", EndpointAddress::new("10.0.0.2", 2));

        assert_eq!(previous, Some(EndpointAddress::new("10.0.0.1", 1)));
        assert_eq!(registry.lookup("a"), Some(EndpointAddress::new("10.0.0.2", 2)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_from_iterator() {
        let registry: StaticRegistry = vec![
            ("a".to_string(), EndpointAddress::new("10.0.0.1", 7001)),
            ("b".to_string(), EndpointAddress::new("10.0.0.2", 7002)),
        ]
        .into_iter()
        .collect();

        let mut names: Vec<_> = registry.names().collect();
        names.sort_unstable();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn test_empty() {
        let registry = StaticRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.lookup("anything").is_none());
    }
}
