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

//! Protocol command identifiers.

use std::fmt;
use std::str::FromStr;

/// A protocol operation, carried on the wire as the `ExecCommand` element.
///
/// The set is closed: supporting a new server operation means adding a
/// variant here.
///
/// # Examples
///
/// ```rust
/// use envelope_tcp::Command;
///
/// assert_eq!(Command::CreateUser.as_str(), "REQ_CREATE_USER");
/// assert_eq!("REQ_DELETE_USER".parse::<Command>(), Ok(Command::DeleteUser));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Register a new user.
    CreateUser,
    /// Fetch a single user.
    FetchUser,
    /// Fetch a list of users.
    FetchUsers,
    /// Update an existing user.
    UpdateUser,
    /// Delete a user.
    DeleteUser,
}

impl Command {
    /// Every command, in declaration order.
    pub const ALL: [Command; 5] = [
        Command::CreateUser,
        Command::FetchUser,
        Command::FetchUsers,
        Command::UpdateUser,
        Command::DeleteUser,
    ];

    /// Returns the wire string for this command.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CreateUser => "REQ_CREATE_USER",
            Self::FetchUser => "REQ_FETCH_USER",
            Self::FetchUsers => "REQ_FETCH_USERS",
            Self::UpdateUser => "REQ_UPDATE_USER",
            Self::DeleteUser => "REQ_DELETE_USER",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown command string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCommand(pub String);

impl fmt::Display for UnknownCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown command: {}", self.0)
    }
}

impl std::error::Error for UnknownCommand {}

impl FromStr for Command {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|command| command.as_str() == s)
            .ok_or_else(|| UnknownCommand(s.to_string()))
    }
}
