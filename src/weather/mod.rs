//! Weather overlay tile management.
//!
//! This module provides weather tile fetching from OpenWeatherMap
//! for the temperature, precipitation, cloud, pressure and wind layers.

pub mod openweathermap;

pub use openweathermap::{overlay_attribution, WeatherLayer, WeatherTiles};
