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

//! OpenWeatherMap tile source implementation.

use std::path::Path;

use eframe::egui;
use log::info;
use walkers::sources::{Attribution, TileSource};
use walkers::{HttpOptions, HttpTiles, TileId};

/// Available weather layer types from OpenWeatherMap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeatherLayer {
    Temperature,
    Precipitation,
    Clouds,
    Pressure,
    Wind,
}

impl WeatherLayer {
    /// Every overlay, in the order the layer control lists them
    pub const ALL: [WeatherLayer; 5] = [
        WeatherLayer::Temperature,
        WeatherLayer::Precipitation,
        WeatherLayer::Clouds,
        WeatherLayer::Pressure,
        WeatherLayer::Wind,
    ];

    /// Get the OpenWeatherMap layer name for URL construction
    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherLayer::Temperature => "temp_new",
            WeatherLayer::Precipitation => "precipitation_new",
            WeatherLayer::Clouds => "clouds_new",
            WeatherLayer::Pressure => "pressure_new",
            WeatherLayer::Wind => "wind_new",
        }
    }

    /// Get human-readable display name
    pub fn display_name(&self) -> &'static str {
        match self {
            WeatherLayer::Temperature => "Temperature",
            WeatherLayer::Precipitation => "Precipitation",
            WeatherLayer::Clouds => "Clouds",
            WeatherLayer::Pressure => "Pressure",
            WeatherLayer::Wind => "Wind",
        }
    }

    fn index(self) -> usize {
        match self {
            WeatherLayer::Temperature => 0,
            WeatherLayer::Precipitation => 1,
            WeatherLayer::Clouds => 2,
            WeatherLayer::Pressure => 3,
            WeatherLayer::Wind => 4,
        }
    }
}

/// Tile source for OpenWeatherMap weather layers
pub struct OpenWeatherMapSource {
    layer: WeatherLayer,
    api_key: String,
}

impl OpenWeatherMapSource {
    /// Create a new OpenWeatherMap tile source for the specified layer
    pub fn new(layer: WeatherLayer, api_key: String) -> Self {
        Self { layer, api_key }
    }
}

impl TileSource for OpenWeatherMapSource {
    fn tile_url(&self, tile_id: TileId) -> String {
        format!(
            "https://tile.openweathermap.org/map/{}/{}/{}/{}.png?appid={}",
            self.layer.as_str(),
            tile_id.zoom,
            tile_id.x,
            tile_id.y,
            self.api_key
        )
    }

    fn attribution(&self) -> Attribution {
        overlay_attribution()
    }
}

/// Attribution shown while any overlay is visible
pub fn overlay_attribution() -> Attribution {
    Attribution {
        text: "Weather data © OpenWeatherMap",
        url: "https://openweathermap.org/",
        logo_light: None,
        logo_dark: None,
    }
}

/// Which overlays the user has switched on. All start hidden.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverlaySelection {
    visible: [bool; WeatherLayer::ALL.len()],
}

impl OverlaySelection {
    pub fn is_visible(&self, layer: WeatherLayer) -> bool {
        self.visible[layer.index()]
    }

    pub fn set_visible(&mut self, layer: WeatherLayer, visible: bool) {
        self.visible[layer.index()] = visible;
    }

    pub fn any_visible(&self) -> bool {
        self.visible.iter().any(|v| *v)
    }

    /// Visible layers in control order
    #[cfg(test)]
    pub fn visible_layers(&self) -> impl Iterator<Item = WeatherLayer> + '_ {
        WeatherLayer::ALL
            .into_iter()
            .filter(move |layer| self.is_visible(*layer))
    }
}

/// The five overlay tile layers belonging to one map instance
pub struct WeatherTiles {
    layers: Vec<(WeatherLayer, HttpTiles)>,
    selection: OverlaySelection,
    opacity: f32,
}

impl WeatherTiles {
    /// Create every overlay layer up front. Tiles are only fetched once a
    /// layer is drawn, so hidden layers cost nothing on the network.
    ///
    /// Without an API key no layers are created and the control shows them
    /// as unavailable.
    pub fn new(
        api_key: Option<&str>,
        opacity: f32,
        cache_root: Option<&Path>,
        ctx: &egui::Context,
    ) -> Self {
        let layers = match api_key.filter(|key| !key.is_empty()) {
            Some(key) => WeatherLayer::ALL
                .into_iter()
                .map(|layer| {
                    let http_options = HttpOptions {
                        cache: cache_root.map(|root| root.join("weather").join(layer.as_str())),
                        ..Default::default()
                    };
                    let source = OpenWeatherMapSource::new(layer, key.to_string());
                    (layer, HttpTiles::with_options(source, http_options, ctx.clone()))
                })
                .collect(),
            None => {
                info!("No tile API key available; weather overlays disabled");
                Vec::new()
            }
        };

        Self {
            layers,
            selection: OverlaySelection::default(),
            opacity: opacity.clamp(0.0, 1.0),
        }
    }

    /// Check if overlay tiles can be fetched at all
    pub fn is_available(&self) -> bool {
        !self.layers.is_empty()
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn selection(&self) -> &OverlaySelection {
        &self.selection
    }

    pub fn set_visible(&mut self, layer: WeatherLayer, visible: bool) {
        if self.selection.is_visible(layer) != visible {
            info!(
                "{} overlay {}",
                layer.display_name(),
                if visible { "shown" } else { "hidden" }
            );
        }
        self.selection.set_visible(layer, visible);
    }

    /// Tiles for the layers currently switched on
    pub fn visible_tiles_mut(&mut self) -> impl Iterator<Item = &mut HttpTiles> + '_ {
        let selection = self.selection;
        self.layers
            .iter_mut()
            .filter(move |(layer, _)| selection.is_visible(*layer))
            .map(|(_, tiles)| tiles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlay_tile_urls() {
        let tile = TileId { x: 3, y: 5, zoom: 10 };
        let expected = [
            (WeatherLayer::Temperature, "temp_new"),
            (WeatherLayer::Precipitation, "precipitation_new"),
            (WeatherLayer::Clouds, "clouds_new"),
            (WeatherLayer::Pressure, "pressure_new"),
            (WeatherLayer::Wind, "wind_new"),
        ];
        for (layer, name) in expected {
            let source = OpenWeatherMapSource::new(layer, "tilekey".to_string());
            assert_eq!(
                source.tile_url(tile),
                format!("https://tile.openweathermap.org/map/{name}/10/3/5.png?appid=tilekey")
            );
        }
    }

    #[test]
    fn test_selection_starts_hidden() {
        let selection = OverlaySelection::default();
        assert!(!selection.any_visible());
        assert_eq!(selection.visible_layers().count(), 0);
    }

    #[test]
    fn test_selection_toggles_independently() {
        let mut selection = OverlaySelection::default();
        selection.set_visible(WeatherLayer::Wind, true);
        selection.set_visible(WeatherLayer::Clouds, true);
        assert_eq!(
            selection.visible_layers().collect::<Vec<_>>(),
            vec![WeatherLayer::Clouds, WeatherLayer::Wind]
        );

        selection.set_visible(WeatherLayer::Wind, false);
        assert!(selection.is_visible(WeatherLayer::Clouds));
        assert!(!selection.is_visible(WeatherLayer::Wind));
    }

    #[test]
    fn test_layer_names_are_distinct() {
        let mut names: Vec<_> = WeatherLayer::ALL.iter().map(WeatherLayer::as_str).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 5);
    }
}
