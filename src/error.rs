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

use owm_client::LookupError;
use thiserror::Error;

/// Failures while starting the application
#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to start lookup runtime: {0}")]
    Runtime(#[from] std::io::Error),

    #[error("failed to create weather client: {0}")]
    Client(#[from] LookupError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = AppError::from(LookupError::Transport("no tls backend".to_string()));
        assert!(err.to_string().starts_with("failed to create weather client"));

        let err = AppError::from(std::io::Error::other("no threads"));
        assert_eq!(err.to_string(), "failed to start lookup runtime: no threads");
    }
}
