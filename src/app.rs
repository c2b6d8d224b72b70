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

//! Top-level application window.

use std::sync::Arc;

use eframe::egui;
use log::{debug, info, warn};
use owm_client::Units;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::lookup::{LookupDispatcher, WeatherService};
use crate::map::{MapRenderer, MarkerIcon, Transition};
use crate::query::WeatherQuery;
use crate::ui::{ReportCard, SearchAction, SearchBar};

/// Background behind the form and card
const PAGE_FILL: egui::Color32 = egui::Color32::from_rgb(243, 244, 246);

pub struct WeatherApp {
    query: WeatherQuery,
    dispatcher: LookupDispatcher,
    map: MapRenderer,
    config: AppConfig,
}

impl WeatherApp {
    /// Build the app against the OpenWeatherMap client described by `config`
    pub fn new(
        ctx: &egui::Context,
        config: AppConfig,
        marker_icon: Option<MarkerIcon>,
    ) -> Result<Self, AppError> {
        let client = owm_client::Client::new(config.client_config())?;
        Self::with_service(ctx, config, marker_icon, Arc::new(client))
    }

    /// Build the app against any lookup service
    pub fn with_service(
        ctx: &egui::Context,
        config: AppConfig,
        marker_icon: Option<MarkerIcon>,
        service: Arc<dyn WeatherService>,
    ) -> Result<Self, AppError> {
        let dispatcher = LookupDispatcher::new(service, ctx.clone())?;
        let map = MapRenderer::new(config.map_settings(), marker_icon);

        Ok(Self {
            query: WeatherQuery::new(config.units),
            dispatcher,
            map,
            config,
        })
    }

    /// Prefill the input with `city` and look it up right away
    pub fn lookup_city(&mut self, city: &str) {
        self.query.set_city(city);
        self.submit();
    }

    fn submit(&mut self) {
        let request = self.query.submit();
        info!("Looking up weather for '{}' ({})", request.city, request.units);
        self.dispatcher.dispatch(request);
    }

    fn change_units(&mut self, units: Units) {
        self.query.set_units(units);
        if self.config.units == units {
            return;
        }
        self.config.units = units;
        if let Err(e) = self.config.save() {
            warn!("Failed to save unit preference: {}", e);
        }
    }

    /// Apply finished lookups to the query state
    fn apply_completions(&mut self) {
        for completion in self.dispatcher.drain() {
            if !self.query.resolve(completion.ticket, completion.outcome) {
                debug!("Dropped completion for lookup #{}", completion.ticket);
            }
        }
    }
}

impl std::fmt::Debug for WeatherApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherApp")
            .field("query", &self.query)
            .field("dispatcher", &self.dispatcher)
            .field("map", &self.map)
            .finish_non_exhaustive()
    }
}

impl eframe::App for WeatherApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_completions();

        let action = egui::TopBottomPanel::top("search")
            .frame(egui::Frame::new().fill(PAGE_FILL).inner_margin(egui::Margin::symmetric(16, 8)))
            .show(ctx, |ui| {
                let action = SearchBar::show(ui, &mut self.query);
                ReportCard::show(ui, &self.query);
                ui.add_space(8.0);
                action
            })
            .inner;

        match action {
            SearchAction::Submit => self.submit(),
            SearchAction::UnitsChanged(units) => self.change_units(units),
            SearchAction::None => {}
        }

        let inputs = self.query.map_inputs();
        match self.map.sync(ctx, inputs.as_ref()) {
            Transition::Built | Transition::Rebuilt => {
                debug!("Map rebuilt for {:?}", inputs.as_ref().map(|i| &i.label));
            }
            Transition::TornDown | Transition::Unchanged => {}
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(PAGE_FILL).inner_margin(egui::Margin::same(16)))
            .show(ctx, |ui| {
                if self.map.is_active() {
                    self.map.show(ui);
                } else {
                    ui.centered_and_justified(|ui| {
                        ui.weak("Search for a city to see it on the map");
                    });
                }
            });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Window closing, releasing map");
        self.map.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::LookupFuture;
    use owm_client::{interpret_body, LookupError, WeatherReport};
    use std::time::{Duration, Instant};

    struct Canned;

    impl WeatherService for Canned {
        fn current_weather(&self, city: String, units: Units) -> LookupFuture {
            Box::pin(async move {
                if city == "London" {
                    interpret_body(
                        br#"{"cod": 200, "coord": {"lat": 51.5, "lon": -0.12}, "name": "London",
                             "main": {"temp": 60},
                             "weather": [{"main": "Clouds", "description": "overcast clouds"}]}"#,
                        units,
                    )
                } else {
                    Err::<WeatherReport, _>(LookupError::Rejected {
                        code: 404,
                        message: "city not found".to_string(),
                    })
                }
            })
        }
    }

    fn app() -> WeatherApp {
        let ctx = egui::Context::default();
        WeatherApp::with_service(&ctx, AppConfig::default(), None, Arc::new(Canned)).unwrap()
    }

    fn settle(app: &mut WeatherApp) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while app.query.is_loading() && Instant::now() < deadline {
            app.apply_completions();
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_startup_lookup_fills_result() {
        let mut app = app();
        app.lookup_city("London");
        assert!(app.query.is_loading());

        settle(&mut app);
        assert_eq!(app.query.temperature_label().as_deref(), Some("60°F"));
        assert_eq!(app.query.map_inputs().map(|i| i.label), Some("London".to_string()));
    }

    #[test]
    fn test_unknown_city_shows_friendly_error() {
        let mut app = app();
        app.lookup_city("Zzzznotacity");
        settle(&mut app);
        assert_eq!(app.query.error(), Some("City not found. Please try again."));
        assert!(app.query.map_inputs().is_none());
    }
}
