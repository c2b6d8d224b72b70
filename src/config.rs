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

//! Application configuration management.
//!
//! This module handles persistent configuration storage using TOML format.
//! It covers the OpenWeatherMap keys, unit preference, and map settings.
//! API keys from the environment take precedence over the file.

use std::path::PathBuf;
use std::time::Duration;

use owm_client::{ClientConfig, Units, DEFAULT_ENDPOINT};
use serde::{Deserialize, Serialize};

use crate::map::MapSettings;

/// Name confy stores the configuration under
pub const APP_NAME: &str = "cityweather-desktop";

/// Environment variable holding the lookup API key
pub const API_KEY_ENV: &str = "OPENWEATHERMAP_API_KEY";

/// Environment variable holding the overlay tile API key
pub const TILE_API_KEY_ENV: &str = "OPENWEATHERMAP_TILE_API_KEY";

/// Application configuration stored in TOML format
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    /// Configuration schema version for migrations
    #[serde(default = "default_config_version")]
    pub config_version: u32,

    /// OpenWeatherMap API key for lookups (env var takes precedence)
    #[serde(default)]
    pub openweathermap_api_key: Option<String>,

    /// Separate key for overlay tiles; falls back to the lookup key
    #[serde(default)]
    pub tile_api_key: Option<String>,

    /// Unit system for lookups and display
    #[serde(default)]
    pub units: Units,

    /// Zoom level a new map opens at
    #[serde(default = "default_zoom")]
    pub map_zoom: f64,

    /// Weather overlay opacity (0.0 - 1.0)
    #[serde(default = "default_overlay_opacity")]
    pub overlay_opacity: f32,

    /// Current-weather endpoint
    #[serde(default = "default_weather_endpoint")]
    pub weather_endpoint: String,

    /// Keep downloaded map tiles on disk
    #[serde(default = "default_true")]
    pub cache_tiles: bool,

    /// Give up on a lookup after this many seconds (unset waits forever)
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

// Default value functions for serde
fn default_config_version() -> u32 {
    1 // Current schema version
}

fn default_zoom() -> f64 {
    10.0
}

fn default_overlay_opacity() -> f32 {
    0.6
}

fn default_weather_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_version: default_config_version(),
            openweathermap_api_key: None,
            tile_api_key: None,
            units: Units::default(),
            map_zoom: default_zoom(),
            overlay_opacity: default_overlay_opacity(),
            weather_endpoint: default_weather_endpoint(),
            cache_tiles: true,
            request_timeout_secs: None,
        }
    }
}

/// Pick the first non-empty key: environment first, then config
fn resolve_key(env_value: Option<String>, config_value: Option<&str>) -> Option<String> {
    env_value
        .filter(|key| !key.is_empty())
        .or_else(|| config_value.map(str::to_string).filter(|key| !key.is_empty()))
}

fn env_key(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

impl AppConfig {
    /// Load configuration from disk
    pub fn load() -> Result<Self, confy::ConfyError> {
        confy::load(APP_NAME, "config")
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<(), confy::ConfyError> {
        confy::store(APP_NAME, "config", self)
    }

    /// Get the config file path for display to user
    pub fn get_config_path() -> Result<PathBuf, confy::ConfyError> {
        confy::get_configuration_file_path(APP_NAME, "config")
    }

    /// Lookup API key from environment variable or config
    pub fn resolve_api_key(&self) -> Option<String> {
        resolve_key(env_key(API_KEY_ENV), self.openweathermap_api_key.as_deref())
    }

    /// Tile API key, falling back to the lookup key
    pub fn resolve_tile_api_key(&self) -> Option<String> {
        resolve_key(env_key(TILE_API_KEY_ENV), self.tile_api_key.as_deref())
            .or_else(|| self.resolve_api_key())
    }

    /// Settings for the lookup client
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            endpoint: self.weather_endpoint.clone(),
            api_key: self.resolve_api_key().unwrap_or_default(),
            timeout: self.request_timeout_secs.map(Duration::from_secs),
        }
    }

    /// Settings for every map instance
    pub fn map_settings(&self) -> MapSettings {
        MapSettings {
            zoom: self.map_zoom,
            overlay_api_key: self.resolve_tile_api_key(),
            overlay_opacity: self.overlay_opacity.clamp(0.0, 1.0),
            cache_root: self.cache_tiles.then(MapSettings::default_cache_root),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.units, Units::Imperial);
        assert!((config.map_zoom - 10.0).abs() < f64::EPSILON);
        assert!((config.overlay_opacity - 0.6).abs() < f32::EPSILON);
        assert_eq!(config.weather_endpoint, DEFAULT_ENDPOINT);
        assert!(config.cache_tiles);
        assert!(config.request_timeout_secs.is_none());
    }

    #[test]
    fn test_env_key_takes_precedence() {
        assert_eq!(
            resolve_key(Some("from-env".to_string()), Some("from-file")),
            Some("from-env".to_string())
        );
        assert_eq!(
            resolve_key(Some(String::new()), Some("from-file")),
            Some("from-file".to_string())
        );
        assert_eq!(resolve_key(None, Some("")), None);
        assert_eq!(resolve_key(None, None), None);
    }

    #[test]
    fn test_partial_file_uses_field_defaults() {
        let config: AppConfig = toml_from_str("units = \"metric\"\nmap_zoom = 8.0\n");
        assert_eq!(config.units, Units::Metric);
        assert!((config.map_zoom - 8.0).abs() < f64::EPSILON);
        assert!((config.overlay_opacity - 0.6).abs() < f32::EPSILON);
        assert_eq!(config.config_version, 1);
    }

    #[test]
    fn test_map_settings_clamp_opacity_and_cache() {
        let config = AppConfig {
            overlay_opacity: 3.0,
            cache_tiles: false,
            ..Default::default()
        };
        let settings = config.map_settings();
        assert!((settings.overlay_opacity - 1.0).abs() < f32::EPSILON);
        assert!(settings.cache_root.is_none());
    }

    #[test]
    fn test_client_config_timeout() {
        let config = AppConfig {
            request_timeout_secs: Some(15),
            ..Default::default()
        };
        assert_eq!(config.client_config().timeout, Some(Duration::from_secs(15)));
    }

    fn toml_from_str(text: &str) -> AppConfig {
        toml::from_str(text).unwrap()
    }
}
