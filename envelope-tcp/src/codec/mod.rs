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

//! Envelope codec.
//!
//! Requests and responses travel as XML documents wrapping a typed payload:
//!
//! ```text
//! <?xml version="1.0" encoding="UTF-8" standalone="yes"?>
//! <Request>
//!   <OrgID>...</OrgID>
//!   <AuthCode>...</AuthCode>
//!   <ExecCommand>REQ_CREATE_USER</ExecCommand>
//!   <InputData>...</InputData>
//! </Request>
//!
//! <Response>
//!   <Result>OK</Result>
//!   <ErrorContents>...</ErrorContents>
//!   <OutputData>...</OutputData>
//! </Response>
//! ```
//!
//! The layer is split in two:
//!
//! - **[`EnvelopeCodec`] trait**: turns envelopes into bytes and back
//!   ([`XmlCodec`] is the wire format)
//! - **[`ResponseEnvelope::into_output`]**: applies the protocol rules to a
//!   decoded response (result discriminator, error sentinels, empty output)
//!
//! # Payloads
//!
//! Output types implement [`Payload`]. A type that is valid when the server
//! sends no `OutputData` says so through [`Payload::absent`]; [`EmptyOutput`]
//! is the stock marker for commands with no result.
//!
//! # Examples
//!
//! ```rust
//! use envelope_tcp::codec::{EmptyOutput, EnvelopeCodec, XmlCodec};
//!
//! let codec = XmlCodec::new();
//! let response = codec
//!     .decode_response::<EmptyOutput>(b"<Response><Result>OK</Result></Response>")
//!     .unwrap();
//! assert_eq!(response.into_output(), Ok(EmptyOutput {}));
//! ```

pub mod base64_bytes;
mod envelope;
mod payload;
mod xml;

pub use self::envelope::{RequestEnvelope, ResponseEnvelope, RESULT_OK};
pub use self::payload::{EmptyInput, EmptyOutput, Payload};
pub use self::xml::{XmlCodec, XML_DECLARATION};

use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Converts envelopes to and from their wire representation.
///
/// Implementations must report every failure: encode failures as
/// [`TcpError::RequestConfigurationError`](crate::TcpError::RequestConfigurationError)
/// and decode failures as [`TcpError::XMLParseError`](crate::TcpError::XMLParseError).
pub trait EnvelopeCodec: Send + Sync + 'static {
    /// Serializes a request envelope into one wire message.
    fn encode_request<T>(&self, envelope: &RequestEnvelope<T>) -> Result<Vec<u8>>
    where
        T: Serialize;

    /// Parses one wire message into a response envelope.
    ///
    /// This checks shape only; protocol rules are applied by
    /// [`ResponseEnvelope::into_output`].
    fn decode_response<T>(&self, bytes: &[u8]) -> Result<ResponseEnvelope<T>>
    where
        T: DeserializeOwned;

    /// Returns the name of the wire format.
    fn name(&self) -> &'static str;
}
