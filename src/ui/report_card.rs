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

//! Result card and error line under the search form.

use chrono::{DateTime, Local, Utc};
use eframe::egui;
use owm_client::{ConditionKind, WeatherReport};

use crate::query::{format_temperature, WeatherQuery};

/// Glyph shown next to the condition description
fn condition_glyph(kind: ConditionKind) -> &'static str {
    match kind {
        ConditionKind::Clear => "☀",
        ConditionKind::Clouds => "☁",
        ConditionKind::Rain | ConditionKind::Drizzle => "☂",
        ConditionKind::Thunderstorm => "⚡",
        ConditionKind::Snow => "❄",
        ConditionKind::Atmosphere => "〰",
        ConditionKind::Other => "•",
    }
}

/// Heading for the card, with the country code when known
pub fn location_title(report: &WeatherReport) -> String {
    match &report.country {
        Some(country) => format!("{}, {}", report.name, country),
        None => report.name.clone(),
    }
}

fn observed_label(observed_at: DateTime<Utc>) -> String {
    format!("Updated {}", observed_at.with_timezone(&Local).format("%H:%M"))
}

#[derive(Debug, Default)]
pub struct ReportCard;

impl ReportCard {
    /// Draw the error line or the result card, whichever applies
    pub fn show(ui: &mut egui::Ui, query: &WeatherQuery) {
        ui.vertical_centered(|ui| {
            if let Some(error) = query.error() {
                ui.add_space(12.0);
                ui.label(
                    egui::RichText::new(error)
                        .size(18.0)
                        .color(egui::Color32::from_rgb(239, 68, 68)),
                );
            }

            let (Some(report), Some(temperature)) = (query.report(), query.temperature_label())
            else {
                return;
            };

            ui.add_space(12.0);
            egui::Frame::new()
                .fill(egui::Color32::WHITE)
                .corner_radius(egui::CornerRadius::same(8))
                .inner_margin(egui::Margin::same(16))
                .shadow(egui::Shadow {
                    offset: [0, 2],
                    blur: 8,
                    spread: 0,
                    color: egui::Color32::from_black_alpha(30),
                })
                .show(ui, |ui| {
                    ui.set_width(320.0);
                    ui.vertical_centered(|ui| {
                        ui.label(
                            egui::RichText::new(location_title(report))
                                .size(22.0)
                                .strong()
                                .color(egui::Color32::from_rgb(31, 41, 55)),
                        );
                        ui.label(
                            egui::RichText::new(format!("Temperature: {temperature}"))
                                .size(18.0)
                                .color(egui::Color32::from_rgb(75, 85, 99)),
                        );
                        ui.label(
                            egui::RichText::new(format!(
                                "Weather: {} {}",
                                condition_glyph(report.condition.kind),
                                report.condition.description
                            ))
                            .size(16.0)
                            .color(egui::Color32::from_rgb(107, 114, 128)),
                        );

                        let mut details = Vec::new();
                        if let Some(feels_like) = report.feels_like {
                            details.push(format!(
                                "Feels like {}",
                                format_temperature(feels_like, query.units())
                            ));
                        }
                        if let Some(humidity) = report.humidity {
                            details.push(format!("Humidity {humidity}%"));
                        }
                        if let Some(observed_at) = report.observed_at {
                            details.push(observed_label(observed_at));
                        }
                        if !details.is_empty() {
                            ui.add_space(4.0);
                            ui.weak(details.join("  ·  "));
                        }
                    });
                });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use owm_client::{interpret_body, Units};

    #[test]
    fn test_location_title() {
        let body = br#"{"cod": 200, "coord": {"lat": 48.85, "lon": 2.35}, "name": "Paris",
            "sys": {"country": "FR"}, "main": {"temp": 12},
            "weather": [{"main": "Rain", "description": "light rain"}]}"#;
        let report = interpret_body(body, Units::Metric).unwrap();
        assert_eq!(location_title(&report), "Paris, FR");
    }

    #[test]
    fn test_condition_glyphs() {
        assert_eq!(condition_glyph(ConditionKind::Clear), "☀");
        assert_eq!(condition_glyph(ConditionKind::Drizzle), condition_glyph(ConditionKind::Rain));
    }

    #[test]
    fn test_card_renders_for_error_and_report() {
        let ctx = egui::Context::default();
        let mut query = WeatherQuery::new(Units::Imperial);

        let request = query.submit();
        query.resolve(
            request.ticket,
            interpret_body(br#"{"cod": "404", "message": "city not found"}"#, request.units),
        );
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| ReportCard::show(ui, &query));
        });

        let request = query.submit();
        query.resolve(
            request.ticket,
            interpret_body(
                br#"{"cod": 200, "coord": {"lat": 51.5, "lon": -0.12}, "name": "London",
                     "main": {"temp": 60, "humidity": 80}, "dt": 1700000000,
                     "weather": [{"main": "Clouds", "description": "overcast clouds"}]}"#,
                request.units,
            ),
        );
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| ReportCard::show(ui, &query));
        });
        assert!(query.report().is_some());
    }
}
