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

//! Transport layer.
//!
//! Every call opens its own plain TCP connection, writes one request, reads
//! one response and closes. [`TcpTransport`] is that connection; failures
//! are reported with the [`TcpError`](crate::TcpError) kind of the phase
//! they occur in:
//!
//! | Operation | Failure | Deadline |
//! |---|---|---|
//! | [`TcpTransport::connect_timeout`] | `ConnectionError` | `ConnectionError` |
//! | [`TcpTransport::send`] | `SendRequestError` | `TimeoutError` |
//! | [`TcpTransport::receive`] | `UnexpectedResponseFormatError` | `TimeoutError` |
//!
//! A response is complete when the server closes its side of the
//! connection. There is no length prefix or delimiter.

mod tcp;
mod types;

pub use tcp::TcpTransport;
pub use types::{ConnectionId, ConnectionMetadata};
