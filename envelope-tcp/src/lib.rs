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

#![allow(clippy::module_inception)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

//! # envelope-tcp
//!
//! An async client for services that speak XML envelopes over plain TCP.
//! Every call opens a fresh connection, writes one `Request` document, reads
//! one `Response` document until the server closes, and maps the outcome to
//! a typed result or one member of a closed error set.
//!
//! ## Architecture
//!
//! - **[`endpoint`]**: named and explicit endpoints, the registry trait and
//!   the [`Resolver`](endpoint::Resolver)
//! - **[`codec`]**: request/response envelopes and the XML wire format
//! - **[`transport`]**: the per-call TCP connection
//! - **[`session`]**: the state machine driving one exchange
//! - **[`client`]**: [`TcpClient`], the public entry point
//! - **[`error`]**: [`TcpError`], the error taxonomy
//! - **[`config`]**: session settings, credentials and loadable client config
//! - **[`observability`]**: session metrics and error logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use envelope_tcp::codec::{base64_bytes, EmptyOutput};
//! use envelope_tcp::{Command, Endpoint, StaticCredentials, StaticRegistry, TcpClient, TcpError};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct UserInfo {
//!     #[serde(rename = "UserCd")]
//!     user_code: String,
//!     #[serde(rename = "Name")]
//!     name: String,
//!     #[serde(rename = "Img", with = "base64_bytes")]
//!     image: Vec<u8>,
//! }
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = TcpClient::builder(StaticCredentials::new("ORG-1", "secret"))
//!     .with_registry(StaticRegistry::new().with_endpoint("aSocket", "10.0.0.5", 7001))
//!     .build();
//!
//! let user = UserInfo {
//!     user_code: "U1".to_string(),
//!     name: "Alice".to_string(),
//!     image: Vec::new(),
//! };
//!
//! match client
//!     .call::<_, EmptyOutput>(&Endpoint::named("aSocket"), Command::CreateUser, Some(&user))
//!     .await
//! {
//!     Ok(_) => println!("created"),
//!     Err(TcpError::CommandSpecificError(detail)) => println!("server said {detail}"),
//!     Err(e) => return Err(e.into()),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Errors
//!
//! Each phase of a call fails with its own kind:
//!
//! | Phase | Kinds |
//! |---|---|
//! | Resolve | `ConfigurationError`, `AddressResolutionError` |
//! | Connect | `ConnectionError` |
//! | Encode | `RequestConfigurationError` |
//! | Send | `SendRequestError`, `TimeoutError` |
//! | Receive | `UnexpectedResponseFormatError`, `TimeoutError` |
//! | Decode | `XMLParseError`, `UnexpectedResponseFormatError`, server rejections, `OutputMissingError` |
//!
//! Nothing is retried. [`TcpError::is_recoverable`] tells callers which
//! failures are worth issuing again.
//!
//! ## Feature Flags
//!
//! - `observability` (default): `tracing` spans and events, `metrics` export
//! - `json` (default): [`ClientConfig`] loading from JSON

pub mod client;
pub mod codec;
pub mod command;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod observability;
pub mod session;
pub mod transport;

pub use client::{TcpClient, TcpClientBuilder};
pub use command::Command;
pub use config::{ClientConfig, ConfigError, CredentialProvider, SessionConfig, StaticCredentials};
pub use endpoint::{Endpoint, EndpointAddress, EndpointRegistry, StaticRegistry};
pub use error::{Result, TcpError};
pub use observability::{log_error, SessionMetrics};
pub use session::{Session, SessionOutcome, SessionState};
