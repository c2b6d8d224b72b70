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

//! City search form with the unit toggle and busy indicator.

use eframe::egui;
use owm_client::Units;

use crate::query::WeatherQuery;

/// What the user asked for this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchAction {
    None,
    Submit,
    UnitsChanged(Units),
}

#[derive(Debug, Default)]
pub struct SearchBar;

impl SearchBar {
    /// Draw the form. The query is only mutated for text edits; submission
    /// and unit changes are returned for the caller to act on.
    pub fn show(ui: &mut egui::Ui, query: &mut WeatherQuery) -> SearchAction {
        let mut action = SearchAction::None;

        ui.vertical_centered(|ui| {
            ui.add_space(8.0);
            ui.heading(
                egui::RichText::new("Weather App")
                    .size(28.0)
                    .color(egui::Color32::from_rgb(55, 65, 81)),
            );
            ui.add_space(8.0);

            let input = ui.add(
                egui::TextEdit::singleline(query.city_mut())
                    .hint_text("Enter city")
                    .desired_width(256.0)
                    .font(egui::TextStyle::Heading),
            );
            let entered = input.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

            ui.add_space(4.0);
            ui.horizontal(|ui| {
                // Center the row under the input
                let row_width = 128.0 + 2.0 * 40.0 + 3.0 * ui.spacing().item_spacing.x + 24.0;
                ui.add_space(((ui.available_width() - row_width) / 2.0).max(0.0));

                let submit = egui::Button::new(
                    egui::RichText::new("Get Weather").color(egui::Color32::WHITE),
                )
                .fill(egui::Color32::from_rgb(59, 130, 246))
                .min_size(egui::vec2(128.0, 0.0));
                if ui.add(submit).clicked() || entered {
                    action = SearchAction::Submit;
                }

                for units in [Units::Imperial, Units::Metric] {
                    let selected = query.units() == units;
                    let toggle = ui.selectable_label(
                        selected,
                        egui::RichText::new(units.temperature_suffix()).size(16.0),
                    );
                    if toggle.clicked() && !selected {
                        action = SearchAction::UnitsChanged(units);
                    }
                }

                if query.is_loading() {
                    ui.add(egui::Spinner::new());
                }
            });
        });

        action
    }
}
