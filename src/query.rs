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

//! Weather query state.
//!
//! Holds the city input and unit preference, and the loading, error and
//! result state of the most recent lookup. Network I/O lives in
//! [`crate::lookup`]; this type only decides how a completion changes what
//! the user sees.

use log::{debug, info};
use owm_client::{Coordinates, LookupError, Units, WeatherReport};

use crate::map::MapInputs;

/// Service message that gets a friendlier wording
const CITY_NOT_FOUND: &str = "city not found";
const CITY_NOT_FOUND_FRIENDLY: &str = "City not found. Please try again.";

/// Shown when the service never gave a usable answer
pub const GENERIC_FAILURE: &str = "Failed to fetch data";

/// A lookup to run, tagged with the ticket that must come back with it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    pub ticket: u64,
    pub city: String,
    pub units: Units,
}

/// User-facing text for a failed lookup
pub fn error_message(error: &LookupError) -> String {
    match error {
        LookupError::Rejected { message, .. } if message == CITY_NOT_FOUND => {
            CITY_NOT_FOUND_FRIENDLY.to_string()
        }
        LookupError::Rejected { message, .. } => message.clone(),
        LookupError::Transport(_) | LookupError::Malformed(_) => GENERIC_FAILURE.to_string(),
    }
}

/// Format a temperature the way the result card shows it
pub fn format_temperature(value: f64, units: Units) -> String {
    format!("{}{}", value, units.temperature_suffix())
}

/// State of the weather query form and its latest result
#[derive(Debug, Clone, Default)]
pub struct WeatherQuery {
    city: String,
    units: Units,
    loading: bool,
    report: Option<WeatherReport>,
    coordinates: Option<Coordinates>,
    error: Option<String>,
    latest_ticket: u64,
    revision: u64,
}

impl WeatherQuery {
    pub fn new(units: Units) -> Self {
        Self {
            units,
            ..Default::default()
        }
    }

    #[cfg(test)]
    pub fn city(&self) -> &str {
        &self.city
    }

    /// Mutable access for the text input
    pub fn city_mut(&mut self) -> &mut String {
        &mut self.city
    }

    pub fn set_city(&mut self, city: impl Into<String>) {
        self.city = city.into();
    }

    pub fn units(&self) -> Units {
        self.units
    }

    /// Switch the unit preference. Never starts a lookup; the next
    /// submission uses the new units and the display suffix follows at once.
    pub fn set_units(&mut self, units: Units) {
        if self.units != units {
            info!("Units set to {}", units);
            self.units = units;
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn report(&self) -> Option<&WeatherReport> {
        self.report.as_ref()
    }

    #[cfg(test)]
    pub fn coordinates(&self) -> Option<Coordinates> {
        self.coordinates
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Start a lookup for the current input.
    ///
    /// Every call issues a new ticket; any earlier lookup still in flight
    /// becomes stale and its completion will be ignored.
    pub fn submit(&mut self) -> LookupRequest {
        self.latest_ticket += 1;
        self.loading = true;
        let request = LookupRequest {
            ticket: self.latest_ticket,
            city: self.city.trim().to_string(),
            units: self.units,
        };
        debug!("Submitting lookup #{} for '{}'", request.ticket, request.city);
        request
    }

    /// Apply the outcome of lookup `ticket`. Returns `false` if it was stale.
    pub fn resolve(&mut self, ticket: u64, outcome: Result<WeatherReport, LookupError>) -> bool {
        if ticket != self.latest_ticket {
            debug!(
                "Ignoring stale lookup #{} (latest is #{})",
                ticket, self.latest_ticket
            );
            return false;
        }

        self.loading = false;
        match outcome {
            Ok(report) => {
                self.coordinates = Some(report.coordinates);
                self.report = Some(report);
                self.error = None;
                self.revision += 1;
            }
            Err(error) => {
                self.report = None;
                self.coordinates = None;
                self.error = Some(error_message(&error));
            }
        }
        true
    }

    /// Temperature of the current report with the current unit suffix
    pub fn temperature_label(&self) -> Option<String> {
        self.report
            .as_ref()
            .map(|report| format_temperature(report.temperature, self.units))
    }

    /// Inputs for the map, present only while coordinates and a report
    /// are both present
    pub fn map_inputs(&self) -> Option<MapInputs> {
        match (&self.report, self.coordinates) {
            (Some(report), Some(coordinates)) => Some(MapInputs {
                revision: self.revision,
                coordinates,
                label: report.name.clone(),
            }),
            _ => None,
        }
    }
}
