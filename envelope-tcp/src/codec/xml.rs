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

//! XML envelope codec.

use super::{EnvelopeCodec, RequestEnvelope, ResponseEnvelope};
use crate::error::{Result, TcpError};
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::de::DeserializeOwned;
use serde::Serialize;

#[cfg(feature = "observability")]
use tracing::{debug, warn};

/// Declaration line written ahead of every encoded document.
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

const REQUEST_ROOT: &str = "Request";
const RESPONSE_ROOT: &str = "Response";

/// XML codec.
///
/// `XmlCodec` writes requests as a `Request` document and reads responses
/// from a `Response` document. Element names come from the serde attributes
/// on the envelope and payload types, and elements appear in field
/// declaration order.
///
/// Decoding is lenient about the root element name and ignores unknown
/// elements, but a document that is not well formed, not UTF-8, or missing
/// the `Result` element is rejected.
///
/// # Examples
///
/// ```rust
/// use envelope_tcp::codec::{EmptyInput, EnvelopeCodec, RequestEnvelope, XmlCodec};
/// use envelope_tcp::{Command, StaticCredentials};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let credentials = StaticCredentials::new("ORG-1", "secret");
/// let envelope = RequestEnvelope::new(&credentials, Command::FetchUsers, Some(EmptyInput {}));
///
/// let bytes = XmlCodec::new().with_pretty_print().encode_request(&envelope)?;
/// println!("{}", String::from_utf8_lossy(&bytes));
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default)]
pub struct XmlCodec {
    pretty: bool,
}

impl XmlCodec {
    /// Creates a codec producing compact documents.
    pub fn new() -> Self {
        Self { pretty: false }
    }

    /// Configures the codec to indent nested elements by two spaces.
    pub fn with_pretty_print(mut self) -> Self {
        self.pretty = true;
        self
    }

    /// Configures the codec to produce compact documents.
    ///
    /// This is the default behavior.
    pub fn with_compact(mut self) -> Self {
        self.pretty = false;
        self
    }

    /// Returns `true` if output is indented.
    pub fn is_pretty(&self) -> bool {
        self.pretty
    }

    /// Serializes a response envelope.
    ///
    /// Clients never send responses; this exists for test servers and
    /// fixtures that play the server side of the exchange.
    pub fn encode_response<T>(&self, envelope: &ResponseEnvelope<T>) -> Result<Vec<u8>>
    where
        T: Serialize,
    {
        self.to_document(RESPONSE_ROOT, envelope)
    }

    fn to_document<T>(&self, root: &'static str, value: &T) -> Result<Vec<u8>>
    where
        T: Serialize,
    {
        let mut body = String::new();
        let serialized = if self.pretty {
            quick_xml::se::Serializer::with_root(&mut body, Some(root)).and_then(|mut serializer| {
                serializer.indent(' ', 2);
                value.serialize(serializer)
            })
        } else {
            quick_xml::se::Serializer::with_root(&mut body, Some(root))
                .and_then(|serializer| value.serialize(serializer))
        };

        if let Err(_e) = serialized {
            #[cfg(feature = "observability")]
            warn!(root, error = %_e, "Failed to encode envelope");
            return Err(TcpError::RequestConfigurationError);
        }

        let mut document = String::with_capacity(XML_DECLARATION.len() + 1 + body.len());
        document.push_str(XML_DECLARATION);
        document.push('\n');
        document.push_str(&body);
        Ok(document.into_bytes())
    }
}

impl EnvelopeCodec for XmlCodec {
    fn encode_request<T>(&self, envelope: &RequestEnvelope<T>) -> Result<Vec<u8>>
    where
        T: Serialize,
    {
        let bytes = self.to_document(REQUEST_ROOT, envelope)?;
        #[cfg(feature = "observability")]
        debug!(command = %envelope.command, size = bytes.len(), "Encoded request");
        Ok(bytes)
    }

    fn decode_response<T>(&self, bytes: &[u8]) -> Result<ResponseEnvelope<T>>
    where
        T: DeserializeOwned,
    {
        let text = std::str::from_utf8(bytes).map_err(|_e| {
            #[cfg(feature = "observability")]
            warn!(error = %_e, size = bytes.len(), "Response is not valid UTF-8");
            TcpError::XMLParseError
        })?;

        if let Err(_reason) = check_document(text) {
            #[cfg(feature = "observability")]
            warn!(reason = %_reason, size = bytes.len(), "Response is not a well-formed document");
            return Err(TcpError::XMLParseError);
        }

        quick_xml::de::from_str(text).map_err(|_e| {
            #[cfg(feature = "observability")]
            warn!(error = %_e, size = bytes.len(), "Failed to parse response");
            TcpError::XMLParseError
        })
    }

    fn name(&self) -> &'static str {
        "xml"
    }
}

/// Checks that `text` holds exactly one closed root element.
///
/// Whitespace, comments and processing instructions may surround the root;
/// anything else outside it is rejected.
fn check_document(text: &str) -> std::result::Result<(), String> {
    let mut reader = Reader::from_str(text);
    let mut depth = 0usize;
    let mut roots = 0usize;

    loop {
        let event = reader.read_event().map_err(|e| e.to_string())?;
        match event {
            Event::Eof => break,
            Event::Start(_) => {
                if depth == 0 {
                    roots += 1;
                }
                depth += 1;
            }
            Event::End(_) => depth = depth.saturating_sub(1),
            Event::Empty(_) if depth == 0 => roots += 1,
            Event::Text(content) if depth == 0 => {
                if !content.iter().all(u8::is_ascii_whitespace) {
                    return Err("text outside the root element".to_string());
                }
            }
            Event::CData(_) if depth == 0 => return Err("CDATA outside the root element".to_string()),
            _ => {}
        }
        if roots > 1 {
            return Err("more than one root element".to_string());
        }
    }

    match (roots, depth) {
        (0, _) => Err("no root element".to_string()),
        (_, 0) => Ok(()),
        _ => Err("root element is not closed".to_string()),
    }
}
