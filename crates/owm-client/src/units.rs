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

//! Unit system selection for lookups and temperature display.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unit system requested from the service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    /// Fahrenheit, miles per hour.
    #[default]
    Imperial,
    /// Celsius, metres per second.
    Metric,
}

impl Units {
    /// Value of the `units` query parameter.
    #[must_use]
    pub fn as_param(self) -> &'static str {
        match self {
            Units::Imperial => "imperial",
            Units::Metric => "metric",
        }
    }

    /// Suffix appended to a displayed temperature.
    #[must_use]
    pub fn temperature_suffix(self) -> &'static str {
        match self {
            Units::Imperial => "°F",
            Units::Metric => "°C",
        }
    }

    /// The other unit system.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Units::Imperial => Units::Metric,
            Units::Metric => Units::Imperial,
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_param())
    }
}

/// Returned when a unit name is neither `imperial` nor `metric`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown unit system '{0}' (expected 'imperial' or 'metric')")]
pub struct ParseUnitsError(String);

impl FromStr for Units {
    type Err = ParseUnitsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "imperial" | "f" | "fahrenheit" => Ok(Units::Imperial),
            "metric" | "c" | "celsius" => Ok(Units::Metric),
            other => Err(ParseUnitsError(other.to_string())),
        }
    }
}
