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

//! HTTP layer for the current-weather endpoint.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use reqwest::Url;

use crate::error::LookupError;
use crate::model::{interpret_body, WeatherReport};
use crate::units::Units;

/// Default current-weather endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.openweathermap.org/data/2.5/weather";

const USER_AGENT: &str = concat!("cityweather-desktop/", env!("CARGO_PKG_VERSION"));

/// Configuration for the lookup client.
#[derive(Clone)]
pub struct ClientConfig {
    /// Full URL of the current-weather endpoint.
    pub endpoint: String,
    /// API key sent as `appid`. An empty key is still sent; the service
    /// answers with a 401 body which surfaces as a rejection.
    pub api_key: String,
    /// Optional whole-request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: String::new(),
            timeout: None,
        }
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &if self.api_key.is_empty() { "<empty>" } else { "<set>" })
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Cheaply cloneable handle for current-weather lookups.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    config: Arc<ClientConfig>,
}

impl Client {
    /// Build a client. Fails only if the HTTP stack cannot be initialised.
    pub fn new(config: ClientConfig) -> Result<Self, LookupError> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        if config.api_key.is_empty() {
            warn!("No OpenWeatherMap API key configured; lookups will be rejected by the service");
        }

        Ok(Self {
            http,
            config: Arc::new(config),
        })
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// URL for a lookup of `city` in `units`, with query values encoded.
    pub fn request_url(&self, city: &str, units: Units) -> Result<Url, LookupError> {
        Url::parse_with_params(
            &self.config.endpoint,
            &[
                ("q", city),
                ("appid", self.config.api_key.as_str()),
                ("units", units.as_param()),
            ],
        )
        .map_err(|e| LookupError::Transport(format!("invalid endpoint '{}': {e}", self.config.endpoint)))
    }

    /// Look up the current weather for a city.
    ///
    /// Issues exactly one GET. There is no retry; callers decide what to do
    /// with a failure.
    pub async fn current_weather(&self, city: &str, units: Units) -> Result<WeatherReport, LookupError> {
        let url = self.request_url(city, units)?;
        info!("Looking up current weather for '{city}' ({units})");

        let response = self.http.get(url).send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        debug!("Weather service answered HTTP {status} with {} bytes", body.len());

        let outcome = interpret_body(&body, units);
        match &outcome {
            Ok(report) => info!(
                "Weather for '{}': {} {} ({})",
                report.name,
                report.temperature,
                units.temperature_suffix(),
                report.condition.description
            ),
            Err(LookupError::Rejected { code, message }) => {
                warn!("Weather service rejected '{city}': {code} {message}");
            }
            Err(e) => warn!("Weather lookup for '{city}' failed: {e}"),
        }
        outcome
    }
}
