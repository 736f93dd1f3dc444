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

//! Payload marker types.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A type that can be returned as command output.
///
/// The caller picks the output type at the call site. When the server
/// reports success without `OutputData`, the session returns
/// [`Payload::absent`] if the type provides one and
/// [`TcpError::OutputMissingError`](crate::TcpError::OutputMissingError)
/// otherwise.
///
/// # Examples
///
/// ```rust
/// use envelope_tcp::codec::Payload;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct UserRecord {
///     #[serde(rename = "UserCd")]
///     user_code: String,
/// }
///
/// // Output is required: no `absent` override.
/// impl Payload for UserRecord {}
/// ```
pub trait Payload: DeserializeOwned {
    /// Value to return when the server sends no output. Defaults to `None`,
    /// meaning output is required.
    fn absent() -> Option<Self> {
        None
    }
}

/// Input marker for commands that take no input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmptyInput {}

/// Output marker for commands that return nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmptyOutput {}

impl Payload for EmptyOutput {
    fn absent() -> Option<Self> {
        Some(EmptyOutput {})
    }
}

/// Optional output: a success without `OutputData` yields `None`.
impl<T: Payload> Payload for Option<T> {
    fn absent() -> Option<Self> {
        Some(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Required {}

    impl Payload for Required {}

    #[test]
    fn test_absent_values() {
        assert_eq!(EmptyOutput::absent(), Some(EmptyOutput {}));
        assert!(Required::absent().is_none());
    }

    #[test]
    fn test_optional_output() {
        assert!(matches!(<Option<Required>>::absent(), Some(None)));
        assert_eq!(<Option<EmptyOutput>>::absent(), Some(None));
    }
}
