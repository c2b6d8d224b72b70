// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use thiserror::Error;

/// Errors that can occur during a current-weather lookup.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LookupError {
    /// The service answered but refused the query (unknown city, bad key, ...).
    #[error("{message}")]
    Rejected { code: u16, message: String },

    /// The request never produced a response body.
    #[error("transport failure: {0}")]
    Transport(String),

    /// A body arrived but could not be decoded into a report.
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl LookupError {
    /// True for failures where the service never gave a usable answer.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, LookupError::Transport(_) | LookupError::Malformed(_))
    }
}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        LookupError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for LookupError {
    fn from(err: serde_json::Error) -> Self {
        LookupError::Malformed(err.to_string())
    }
}
