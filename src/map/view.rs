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

//! The map view: base street tiles, weather overlays, marker and controls.

use std::path::PathBuf;

use eframe::egui;
use log::{info, warn};
use walkers::sources::Attribution;
use walkers::{lon_lat, HttpOptions, HttpTiles, Map, MapMemory, Position};

use crate::map::lifecycle::{MapInputs, MapLifecycle, Transition};
use crate::map::marker::{CityMarker, MarkerIcon};
use crate::map::street::{street_attribution, StreetTileSource};
use crate::weather::{overlay_attribution, WeatherLayer, WeatherTiles};

/// Zoom level used when a map is built for a city
pub const DEFAULT_ZOOM: f64 = 10.0;

/// Settings shared by every map instance
#[derive(Debug, Clone)]
pub struct MapSettings {
    pub zoom: f64,
    /// Key for the weather overlay tiles. `None` disables overlays.
    pub overlay_api_key: Option<String>,
    /// Overlay opacity (0.0 - 1.0)
    pub overlay_opacity: f32,
    /// Root of the on-disk tile cache, `None` to keep tiles in memory only
    pub cache_root: Option<PathBuf>,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            zoom: DEFAULT_ZOOM,
            overlay_api_key: None,
            overlay_opacity: 0.6,
            cache_root: None,
        }
    }
}

impl MapSettings {
    /// Default tile cache location under the user cache directory
    pub fn default_cache_root() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from(".cache"))
            .join("cityweather-desktop")
            .join("tiles")
    }
}

/// One rendered map. Dropping it releases its tile downloaders and textures.
pub struct MapView {
    instance: u64,
    center: Position,
    label: String,
    base: HttpTiles,
    overlays: WeatherTiles,
    memory: MapMemory,
    popup_open: bool,
    needs_layout: bool,
}

impl MapView {
    pub fn new(ctx: &egui::Context, inputs: &MapInputs, settings: &MapSettings, instance: u64) -> Self {
        let base_options = HttpOptions {
            cache: settings.cache_root.as_ref().map(|root| root.join("street")),
            ..Default::default()
        };
        let base = HttpTiles::with_options(StreetTileSource, base_options, ctx.clone());

        let overlays = WeatherTiles::new(
            settings.overlay_api_key.as_deref(),
            settings.overlay_opacity,
            settings.cache_root.as_deref(),
            ctx,
        );

        let center = lon_lat(inputs.coordinates.lon, inputs.coordinates.lat);
        let mut memory = MapMemory::default();
        memory.center_at(center);
        if memory.set_zoom(settings.zoom).is_err() {
            warn!("Zoom level {} rejected by the map, keeping default", settings.zoom);
        }

        let mut view = Self {
            instance,
            center,
            label: inputs.label.clone(),
            base,
            overlays,
            memory,
            popup_open: true,
            needs_layout: false,
        };
        view.invalidate_size();
        view
    }

    /// Ask for a re-measure once the view has been placed in its real rect.
    ///
    /// The widget is sized by the panel it lands in, so a fresh instance only
    /// needs one extra frame after its first layout; [`MapView::show`] turns
    /// this flag into that repaint.
    pub fn invalidate_size(&mut self) {
        self.needs_layout = true;
    }

    /// Draw the map into the remaining space of `ui`.
    pub fn show(&mut self, ui: &mut egui::Ui, marker_icon: Option<&MarkerIcon>) -> egui::Response {
        if self.needs_layout {
            self.needs_layout = false;
            ui.ctx().request_repaint();
        }

        let opacity = self.overlays.opacity();
        let mut map = Map::new(Some(&mut self.base), &mut self.memory, self.center);
        for tiles in self.overlays.visible_tiles_mut() {
            map = map.with_layer(tiles, opacity);
        }
        let map = map.with_plugin(CityMarker {
            position: self.center,
            label: &self.label,
            popup_open: &mut self.popup_open,
            icon: marker_icon,
        });

        let response = ui.add(map);
        self.show_layer_control(ui.ctx(), response.rect);
        self.show_attribution(ui.ctx(), response.rect);
        response
    }

    fn show_layer_control(&mut self, ctx: &egui::Context, map_rect: egui::Rect) {
        egui::Area::new(egui::Id::new(("layer_control", self.instance)))
            .order(egui::Order::Foreground)
            .pivot(egui::Align2::RIGHT_TOP)
            .fixed_pos(map_rect.right_top() + egui::vec2(-10.0, 10.0))
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.label(egui::RichText::new("Base Map").strong());
                    // Single base layer, shown as the selected choice
                    let _ = ui.radio(true, "Street Map");

                    ui.separator();
                    ui.label(egui::RichText::new("Weather").strong());

                    let available = self.overlays.is_available();
                    for layer in WeatherLayer::ALL {
                        let mut visible = self.overlays.selection().is_visible(layer);
                        let checkbox = egui::Checkbox::new(&mut visible, layer.display_name());
                        if ui.add_enabled(available, checkbox).changed() {
                            self.overlays.set_visible(layer, visible);
                        }
                    }
                    if !available {
                        ui.weak("Set a tile API key to enable overlays");
                    }
                });
            });
    }

    fn show_attribution(&self, ctx: &egui::Context, map_rect: egui::Rect) {
        let mut attributions = vec![street_attribution()];
        if self.overlays.selection().any_visible() {
            attributions.push(overlay_attribution());
        }

        egui::Area::new(egui::Id::new(("attribution", self.instance)))
            .order(egui::Order::Foreground)
            .pivot(egui::Align2::RIGHT_BOTTOM)
            .fixed_pos(map_rect.right_bottom() + egui::vec2(-6.0, -6.0))
            .show(ctx, |ui| {
                egui::Frame::new()
                    .fill(egui::Color32::from_white_alpha(200))
                    .inner_margin(egui::Margin::symmetric(6, 2))
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            for attribution in &attributions {
                                attribution_link(ui, attribution);
                            }
                        });
                    });
            });
    }
}

fn attribution_link(ui: &mut egui::Ui, attribution: &Attribution) {
    let link = ui.link(egui::RichText::new(attribution.text).size(10.0));
    if link.clicked() {
        if let Err(e) = webbrowser::open(attribution.url) {
            warn!("Failed to open {}: {}", attribution.url, e);
        }
    }
}

impl Drop for MapView {
    fn drop(&mut self) {
        info!("Map #{} for '{}' released", self.instance, self.label);
    }
}

/// The Map Render Component: keeps exactly one [`MapView`] in line with
/// the current map inputs and draws it.
pub struct MapRenderer {
    lifecycle: MapLifecycle<MapView>,
    settings: MapSettings,
    marker_icon: Option<MarkerIcon>,
}

impl MapRenderer {
    pub fn new(settings: MapSettings, marker_icon: Option<MarkerIcon>) -> Self {
        Self {
            lifecycle: MapLifecycle::new(),
            settings,
            marker_icon,
        }
    }

    /// Dispose and rebuild as needed for `inputs`. Call once per frame
    /// before [`MapRenderer::show`].
    pub fn sync(&mut self, ctx: &egui::Context, inputs: Option<&MapInputs>) -> Transition {
        let settings = &self.settings;
        let transition = self
            .lifecycle
            .sync(inputs, |inputs, instance| MapView::new(ctx, inputs, settings, instance));
        if transition != Transition::Unchanged {
            ctx.request_repaint();
        }
        transition
    }

    pub fn is_active(&self) -> bool {
        self.lifecycle.is_active()
    }

    /// Draw the live map, if there is one
    pub fn show(&mut self, ui: &mut egui::Ui) -> Option<egui::Response> {
        let icon = self.marker_icon.as_ref();
        self.lifecycle.instance_mut().map(|view| view.show(ui, icon))
    }

    /// Tear down the live map (window closing)
    pub fn dispose(&mut self) {
        self.lifecycle.dispose();
    }
}

impl std::fmt::Debug for MapRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapRenderer")
            .field("lifecycle", &self.lifecycle)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use owm_client::Coordinates;

    fn inputs(revision: u64, label: &str, lat: f64, lon: f64) -> MapInputs {
        MapInputs {
            revision,
            coordinates: Coordinates::new(lat, lon),
            label: label.to_string(),
        }
    }

    #[test]
    fn test_default_settings() {
        let settings = MapSettings::default();
        assert!((settings.zoom - 10.0).abs() < f64::EPSILON);
        assert!(settings.overlay_api_key.is_none());
        assert!((settings.overlay_opacity - 0.6).abs() < f32::EPSILON);
    }

    #[test]
    fn test_cache_root_is_app_scoped() {
        let root = MapSettings::default_cache_root();
        assert!(root.ends_with("cityweather-desktop/tiles"));
    }

    #[test]
    fn test_london_map_is_centered_with_popup_open() {
        let ctx = egui::Context::default();
        let mut renderer = MapRenderer::new(MapSettings::default(), None);
        let london = inputs(1, "London", 51.5, -0.12);

        assert_eq!(renderer.sync(&ctx, Some(&london)), Transition::Built);
        assert!(renderer.is_active());

        let view = renderer.lifecycle.instance_mut().unwrap();
        assert_eq!(view.center, lon_lat(-0.12, 51.5));
        assert_ne!(view.center, lon_lat(51.5, -0.12));
        assert!((view.memory.zoom() - DEFAULT_ZOOM).abs() < f64::EPSILON);
        assert_eq!(view.label, "London");
        assert!(view.popup_open);
        assert!(view.needs_layout);
        assert!(!view.overlays.selection().any_visible());
        assert!(view.overlays.visible_tiles_mut().next().is_none());
    }

    #[test]
    fn test_renderer_rebuilds_and_tears_down() {
        let ctx = egui::Context::default();
        let mut renderer = MapRenderer::new(MapSettings::default(), None);
        let london = inputs(1, "London", 51.5, -0.12);

        assert_eq!(renderer.sync(&ctx, Some(&london)), Transition::Built);
        assert_eq!(renderer.sync(&ctx, Some(&london)), Transition::Unchanged);

        // Overlay choices belong to the instance and do not survive a rebuild
        let view = renderer.lifecycle.instance_mut().unwrap();
        view.overlays.set_visible(WeatherLayer::Clouds, true);
        view.popup_open = false;
        assert!(view.overlays.selection().any_visible());

        let refetched = inputs(2, "London", 51.5, -0.12);
        assert_eq!(renderer.sync(&ctx, Some(&refetched)), Transition::Rebuilt);
        let view = renderer.lifecycle.instance_mut().unwrap();
        assert_eq!(view.instance, 2);
        assert!(view.popup_open);
        assert!(!view.overlays.selection().any_visible());

        let paris = inputs(3, "Paris", 48.85, 2.35);
        assert_eq!(renderer.sync(&ctx, Some(&paris)), Transition::Rebuilt);
        let view = renderer.lifecycle.instance_mut().unwrap();
        assert_eq!(view.center, lon_lat(2.35, 48.85));
        assert_eq!(view.label, "Paris");

        assert_eq!(renderer.sync(&ctx, None), Transition::TornDown);
        assert!(!renderer.is_active());
        assert_eq!(renderer.sync(&ctx, None), Transition::Unchanged);
    }
}
