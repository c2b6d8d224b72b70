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

//! City marker and popup drawn on top of the map.
//!
//! The pin artwork is an embedded SVG rasterized once at startup by
//! [`MarkerIcon::load`]. Every map instance borrows the same texture; if
//! rasterization failed the marker falls back to a painted pin.

use eframe::egui::{self, Color32, FontId, Pos2, Rect, Response, Stroke, Ui};
use log::info;
use thiserror::Error;
use walkers::{MapMemory, Plugin, Position, Projector};

const MARKER_SVG: &[u8] = br##"<svg xmlns="http://www.w3.org/2000/svg" width="25" height="41" viewBox="0 0 25 41">
  <path d="M12.5 0C5.6 0 0 5.6 0 12.5 0 21.9 12.5 41 12.5 41S25 21.9 25 12.5C25 5.6 19.4 0 12.5 0z"
        fill="#2a81cb" stroke="#1f5f96" stroke-width="1"/>
  <circle cx="12.5" cy="12.5" r="5" fill="#ffffff"/>
</svg>"##;

/// On-screen marker size in points; the pin tip sits on the coordinate.
const MARKER_SIZE: egui::Vec2 = egui::vec2(25.0, 41.0);

/// Rasterize at this multiple of the on-screen size for HiDPI displays.
const RASTER_SCALE: f32 = 2.0;

#[derive(Debug, Error)]
pub enum MarkerIconError {
    #[error("failed to parse marker SVG: {0}")]
    Parse(#[from] usvg::Error),
    #[error("invalid marker pixmap size {0}x{1}")]
    Pixmap(u32, u32),
}

/// Texture holding the rasterized marker pin
#[derive(Clone)]
pub struct MarkerIcon {
    texture: egui::TextureHandle,
}

impl std::fmt::Debug for MarkerIcon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarkerIcon")
            .field("texture", &self.texture.id())
            .finish()
    }
}

impl MarkerIcon {
    /// Rasterize the embedded pin. Call once while the app is being created.
    pub fn load(ctx: &egui::Context) -> Result<Self, MarkerIconError> {
        let tree = usvg::Tree::from_data(MARKER_SVG, &usvg::Options::default())?;

        let size = tree.size();
        let width = (size.width() * RASTER_SCALE).ceil() as u32;
        let height = (size.height() * RASTER_SCALE).ceil() as u32;
        let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
            .ok_or(MarkerIconError::Pixmap(width, height))?;

        resvg::render(
            &tree,
            resvg::tiny_skia::Transform::from_scale(RASTER_SCALE, RASTER_SCALE),
            &mut pixmap.as_mut(),
        );

        let image = egui::ColorImage::from_rgba_premultiplied(
            [width as usize, height as usize],
            pixmap.data(),
        );
        let texture = ctx.load_texture("city_marker", image, egui::TextureOptions::LINEAR);
        info!("Marker icon rasterized at {}x{}", width, height);

        Ok(Self { texture })
    }
}

/// Screen rect of a pin whose tip is at `anchor`.
pub fn marker_rect(anchor: Pos2) -> Rect {
    Rect::from_min_size(
        anchor - egui::vec2(MARKER_SIZE.x / 2.0, MARKER_SIZE.y),
        MARKER_SIZE,
    )
}

/// Map plugin drawing a single marker with a label popup
pub struct CityMarker<'a> {
    pub position: Position,
    pub label: &'a str,
    pub popup_open: &'a mut bool,
    pub icon: Option<&'a MarkerIcon>,
}

impl Plugin for CityMarker<'_> {
    fn run(
        self: Box<Self>,
        ui: &mut Ui,
        response: &Response,
        projector: &Projector,
        _memory: &MapMemory,
    ) {
        let CityMarker {
            position,
            label,
            popup_open,
            icon,
        } = *self;

        let projected = projector.project(position);
        let anchor = egui::pos2(projected.x, projected.y);
        let pin = marker_rect(anchor);

        // Clicking the pin toggles its popup
        if response.clicked() {
            if let Some(click_pos) = response.interact_pointer_pos() {
                if pin.contains(click_pos) {
                    *popup_open = !*popup_open;
                }
            }
        }

        let painter = ui.painter();
        match icon {
            Some(icon) => {
                painter.image(
                    icon.texture.id(),
                    pin,
                    Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                    Color32::WHITE,
                );
            }
            None => draw_fallback_pin(painter, anchor),
        }

        if *popup_open {
            draw_popup(painter, pin.center_top(), label);
        }
    }
}

fn draw_fallback_pin(painter: &egui::Painter, anchor: Pos2) {
    let head = anchor - egui::vec2(0.0, MARKER_SIZE.y - MARKER_SIZE.x / 2.0);
    let fill = Color32::from_rgb(42, 129, 203);
    painter.add(egui::Shape::convex_polygon(
        vec![
            head + egui::vec2(-9.0, 4.0),
            head + egui::vec2(9.0, 4.0),
            anchor,
        ],
        fill,
        Stroke::NONE,
    ));
    painter.circle_filled(head, MARKER_SIZE.x / 2.0, fill);
    painter.circle_filled(head, 5.0, Color32::WHITE);
}

fn draw_popup(painter: &egui::Painter, tip: Pos2, label: &str) {
    let galley = painter.layout_no_wrap(
        label.to_string(),
        FontId::proportional(14.0),
        Color32::from_gray(30),
    );

    let padding = egui::vec2(10.0, 6.0);
    let tail = 8.0;
    let bubble = Rect::from_center_size(
        tip - egui::vec2(0.0, tail + galley.size().y / 2.0 + padding.y),
        galley.size() + padding * 2.0,
    );

    let corner = egui::CornerRadius::same(4);
    painter.rect_filled(bubble.translate(egui::vec2(1.0, 2.0)), corner, Color32::from_black_alpha(60));
    painter.rect_filled(bubble, corner, Color32::WHITE);
    painter.add(egui::Shape::convex_polygon(
        vec![
            bubble.center_bottom() + egui::vec2(-tail, 0.0),
            bubble.center_bottom() + egui::vec2(tail, 0.0),
            bubble.center_bottom() + egui::vec2(0.0, tail),
        ],
        Color32::WHITE,
        Stroke::NONE,
    ));
    painter.galley(bubble.min + padding, galley, Color32::from_gray(30));
}
