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

//! Error taxonomy for envelope sessions.
//!
//! Every failure a call can run into is mapped, at the point where it happens,
//! to exactly one [`TcpError`] kind. The set is closed and flat:
//!
//! - **Configuration errors**: the endpoint cannot be located or is invalid
//! - **Connection errors**: resolution, connect, send and receive failures
//! - **Protocol errors**: the server answered, but not with a usable result
//!
//! Low-level causes (I/O errors, serializer messages) are logged where they
//! occur and are not carried in the error value, so a `TcpError` is cheap to
//! clone and compare.
//!
//! # Recovery
//!
//! The session never retries. [`TcpError::is_recoverable`] is advisory: it
//! tells callers which kinds may succeed if the whole call is issued again.

use thiserror::Error;

/// Result type for envelope operations.
pub type Result<T> = std::result::Result<T, TcpError>;

/// `ErrorContents` sentinel for a request the server could not parse.
pub const PARSE_FAILED: &str = "PARSE_FAILED";

/// `ErrorContents` sentinel for an unknown organization id.
pub const BAD_ORG_ID: &str = "BAD_ORG_ID";

/// Legacy `ErrorContents` sentinel for an unknown organization id.
pub const BAD_CLIENT_ID: &str = "BAD_CLIENT_ID";

/// `ErrorContents` sentinel for a rejected authentication code.
pub const BAD_AUTH_CODE: &str = "BAD_AUTH_CODE";

/// `ErrorContents` sentinel for an unknown command.
pub const BAD_COMMAND: &str = "BAD_COMMAND";

/// Errors that can be returned from a single request/response exchange.
///
/// # Examples
///
/// ```rust
/// use envelope_tcp::TcpError;
///
/// let error = TcpError::from_error_contents("BAD_COMMAND");
/// assert_eq!(error, TcpError::BadCommandError);
/// assert!(error.is_protocol_error());
///
/// let error = TcpError::from_error_contents("USER_NOT_FOUND");
/// assert_eq!(error, TcpError::CommandSpecificError("USER_NOT_FOUND".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum TcpError {
    /// The endpoint name is not registered, or its port or host is invalid.
    ///
    /// Raised before any network I/O takes place.
    #[error("endpoint configuration error")]
    ConfigurationError,

    /// Name resolution produced no usable address.
    #[error("address resolution failed")]
    AddressResolutionError,

    /// The connection failed or did not become ready within the connect timeout.
    #[error("connection could not be established")]
    ConnectionError,

    /// The outbound envelope could not be serialized.
    #[error("request envelope could not be serialized")]
    RequestConfigurationError,

    /// Writing the request to the connection failed.
    #[error("failed to send request")]
    SendRequestError,

    /// The response was empty, missing, oversized, or a failure result
    /// without any error detail.
    #[error("unexpected response format")]
    UnexpectedResponseFormatError,

    /// The response did not parse into the envelope shape, or the server
    /// reported that it could not parse the request.
    #[error("XML parse error")]
    XMLParseError,

    /// The server rejected the organization id.
    #[error("server rejected the organization id")]
    BadOrganizationIdError,

    /// The server rejected the authentication code.
    #[error("server rejected the authentication code")]
    BadAuthCodeError,

    /// The server does not know the command.
    #[error("server rejected the command")]
    BadCommandError,

    /// The server reported a command-specific failure.
    #[error("command failed: {0}")]
    CommandSpecificError(String),

    /// The server reported success without a payload for an output type that
    /// requires one.
    #[error("response carried no output data")]
    OutputMissingError,

    /// A send or receive deadline expired.
    #[error("operation timed out")]
    TimeoutError,
}

impl TcpError {
    /// Maps a non-empty `ErrorContents` string to its taxonomy kind.
    ///
    /// Known sentinels map to dedicated kinds; anything else is carried
    /// through verbatim as [`TcpError::CommandSpecificError`].
    pub fn from_error_contents(contents: &str) -> Self {
        match contents {
            PARSE_FAILED => Self::XMLParseError,
            BAD_ORG_ID | BAD_CLIENT_ID => Self::BadOrganizationIdError,
            BAD_AUTH_CODE => Self::BadAuthCodeError,
            BAD_COMMAND => Self::BadCommandError,
            other => Self::CommandSpecificError(other.to_string()),
        }
    }

    /// Returns a stable name for this kind, suitable for logs and metric labels.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::ConfigurationError => "configuration",
            Self::AddressResolutionError => "address_resolution",
            Self::ConnectionError => "connection",
            Self::RequestConfigurationError => "request_configuration",
            Self::SendRequestError => "send_request",
            Self::UnexpectedResponseFormatError => "unexpected_response_format",
            Self::XMLParseError => "xml_parse",
            Self::BadOrganizationIdError => "bad_organization_id",
            Self::BadAuthCodeError => "bad_auth_code",
            Self::BadCommandError => "bad_command",
            Self::CommandSpecificError(_) => "command_specific",
            Self::OutputMissingError => "output_missing",
            Self::TimeoutError => "timeout",
        }
    }

    /// Returns `true` if the server answered and the answer was a rejection
    /// or an unusable result.
    #[must_use]
    pub const fn is_protocol_error(&self) -> bool {
        matches!(
            self,
            Self::BadOrganizationIdError
                | Self::BadAuthCodeError
                | Self::BadCommandError
                | Self::CommandSpecificError(_)
                | Self::OutputMissingError
        )
    }

    /// Returns `true` if the failure happened while reaching the server or
    /// moving bytes to and from it.
    #[must_use]
    pub const fn is_transport_error(&self) -> bool {
        matches!(
            self,
            Self::AddressResolutionError
                | Self::ConnectionError
                | Self::SendRequestError
                | Self::TimeoutError
        )
    }

    /// Returns `true` if issuing the same call again may succeed.
    ///
    /// Configuration, serialization and protocol rejections are permanent
    /// for a given input; transport failures are not.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        self.is_transport_error()
    }

    /// Returns the server's detail string for command-specific failures.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::CommandSpecificError(detail) => Some(detail),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_sentinels() {
        assert_eq!(TcpError::from_error_contents("PARSE_FAILED"), TcpError::XMLParseError);
        assert_eq!(
            TcpError::from_error_contents("BAD_ORG_ID"),
            TcpError::BadOrganizationIdError
        );
        assert_eq!(
            TcpError::from_error_contents("BAD_CLIENT_ID"),
            TcpError::BadOrganizationIdError
        );
        assert_eq!(
            TcpError::from_error_contents("BAD_AUTH_CODE"),
            TcpError::BadAuthCodeError
        );
        assert_eq!(TcpError::from_error_contents("BAD_COMMAND"), TcpError::BadCommandError);
    }

    #[test]
    fn test_unknown_contents_pass_through() {
        for detail in ["USER_NOT_FOUND", "bad_command", " BAD_COMMAND", "중복된 사용자"] {
            let error = TcpError::from_error_contents(detail);
            assert_eq!(error, TcpError::CommandSpecificError(detail.to_string()));
            assert_eq!(error.detail(), Some(detail));
        }
    }

    #[test]
    fn test_classification() {
        assert!(TcpError::ConnectionError.is_transport_error());
        assert!(TcpError::TimeoutError.is_recoverable());
        assert!(!TcpError::ConfigurationError.is_recoverable());
        assert!(!TcpError::ConfigurationError.is_transport_error());

        assert!(TcpError::BadAuthCodeError.is_protocol_error());
        assert!(TcpError::OutputMissingError.is_protocol_error());
        assert!(!TcpError::BadCommandError.is_recoverable());
        assert!(!TcpError::XMLParseError.is_protocol_error());
    }

    #[test]
    fn test_display() {
        let error = TcpError::CommandSpecificError("DUPLICATE_USER".to_string());
        assert_eq!(error.to_string(), "command failed: DUPLICATE_USER");
        assert_eq!(error.kind_name(), "command_specific");
        assert_eq!(TcpError::XMLParseError.to_string(), "XML parse error");
    }
}
