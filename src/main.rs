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

mod app;
mod config;
mod error;
mod lookup;
mod map;
mod query;
mod ui;
mod weather;

use clap::Parser;
use eframe::egui;
use log::{error, info, warn};
use mimalloc::MiMalloc;
use owm_client::Units;

use app::WeatherApp;
use config::AppConfig;
use map::MarkerIcon;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Look up the current weather for a city and show it on a map
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// City to look up at startup
    #[arg(long)]
    city: Option<String>,

    /// Unit system, overriding the saved preference (imperial or metric)
    #[arg(long)]
    units: Option<Units>,

    /// Zoom level for new maps
    #[arg(long)]
    zoom: Option<f64>,

    /// Print the configuration file path and exit
    #[arg(long)]
    print_config_path: bool,
}

fn load_config(args: &Args) -> AppConfig {
    let mut config = AppConfig::load().unwrap_or_else(|e| {
        warn!("Failed to load config, using defaults: {}", e);
        AppConfig::default()
    });

    if let Some(units) = args.units {
        config.units = units;
    }
    if let Some(zoom) = args.zoom {
        config.map_zoom = zoom;
    }
    if config.resolve_api_key().is_none() {
        warn!(
            "No OpenWeatherMap API key; set {} or add it to the config file",
            config::API_KEY_ENV
        );
    }
    config
}

fn main() -> Result<(), eframe::Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if args.print_config_path {
        match AppConfig::get_config_path() {
            Ok(path) => println!("{}", path.display()),
            Err(e) => error!("Failed to resolve config path: {}", e),
        }
        return Ok(());
    }

    info!("Starting City Weather...");
    let config = load_config(&args);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 800.0])
            .with_title("City Weather"),
        ..Default::default()
    };

    eframe::run_native(
        "City Weather",
        options,
        Box::new(move |cc| {
            let marker_icon = MarkerIcon::load(&cc.egui_ctx)
                .map_err(|e| warn!("Marker icon unavailable, drawing a plain pin: {}", e))
                .ok();

            let mut app = WeatherApp::new(&cc.egui_ctx, config, marker_icon)?;
            if let Some(city) = args.city.as_deref() {
                app.lookup_city(city);
            }
            Ok(Box::new(app))
        }),
    )
}
