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

//! Request and response envelope models.

use super::Payload;
use crate::command::Command;
use crate::config::CredentialProvider;
use crate::error::{Result, TcpError};
use serde::{Deserialize, Serialize};

/// Result discriminator sent by the server on success.
pub const RESULT_OK: &str = "OK";

/// Outbound envelope.
///
/// Field order and element names are fixed by the protocol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestEnvelope<T> {
    /// Organization id, `OrgID`
    #[serde(rename = "OrgID")]
    pub organization_id: String,

    /// Authentication code, `AuthCode`
    #[serde(rename = "AuthCode")]
    pub auth_code: String,

    /// Command wire string, `ExecCommand`
    #[serde(rename = "ExecCommand")]
    pub command: String,

    /// Command input, `InputData`; omitted when `None`
    #[serde(rename = "InputData", skip_serializing_if = "Option::is_none")]
    pub input_data: Option<T>,
}

impl<T> RequestEnvelope<T> {
    /// Builds an envelope, taking credentials from `credentials`.
    pub fn new(credentials: &dyn CredentialProvider, command: Command, input_data: Option<T>) -> Self {
        Self {
            organization_id: credentials.organization_id(),
            auth_code: credentials.auth_code(),
            command: command.as_str().to_string(),
            input_data,
        }
    }
}

/// Inbound envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseEnvelope<T> {
    /// Result discriminator, `Result`
    #[serde(rename = "Result")]
    pub result: String,

    /// Failure detail, `ErrorContents`
    #[serde(rename = "ErrorContents", default, skip_serializing_if = "Option::is_none")]
    pub error_contents: Option<String>,

    /// Command output, `OutputData`
    #[serde(rename = "OutputData", skip_serializing_if = "Option::is_none")]
    pub output_data: Option<T>,
}

impl<T> ResponseEnvelope<T> {
    /// Creates a success envelope, with or without output.
    pub fn success(output_data: Option<T>) -> Self {
        Self {
            result: RESULT_OK.to_string(),
            error_contents: None,
            output_data,
        }
    }

    /// Creates a failure envelope.
    pub fn failure(result: impl Into<String>, error_contents: Option<String>) -> Self {
        Self {
            result: result.into(),
            error_contents,
            output_data: None,
        }
    }

    /// Returns `true` if the result discriminator is the success sentinel.
    pub fn is_success(&self) -> bool {
        self.result == RESULT_OK
    }

    /// Applies the protocol rules and returns the command output.
    ///
    /// # Errors
    ///
    /// - Failure result without `ErrorContents`:
    ///   [`TcpError::UnexpectedResponseFormatError`]
    /// - Failure result with `ErrorContents`: the kind given by
    ///   [`TcpError::from_error_contents`]
    /// - Success without `OutputData` for a type with no absent value:
    ///   [`TcpError::OutputMissingError`]
    pub fn into_output(self) -> Result<T>
    where
        T: Payload,
    {
        if !self.is_success() {
            return Err(match self.error_contents.as_deref() {
                None | Some("") => TcpError::UnexpectedResponseFormatError,
                Some(contents) => TcpError::from_error_contents(contents),
            });
        }

        match self.output_data {
            Some(output) => Ok(output),
            None => T::absent().ok_or(TcpError::OutputMissingError),
        }
    }
}
