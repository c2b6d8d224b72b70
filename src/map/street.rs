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

use walkers::sources::{Attribution, TileSource};
use walkers::TileId;

/// Tile source for the OpenStreetMap standard street map
/// Uses subdomain load balancing across a-c.tile.openstreetmap.org
#[derive(Debug, Clone, Copy, Default)]
pub struct StreetTileSource;

impl TileSource for StreetTileSource {
    fn tile_url(&self, tile_id: TileId) -> String {
        // Subdomain load balancing (a, b, c) based on tile coordinates
        let subdomain = ['a', 'b', 'c'][((tile_id.x + tile_id.y) % 3) as usize];

        format!(
            "https://{}.tile.openstreetmap.org/{}/{}/{}.png",
            subdomain, tile_id.zoom, tile_id.x, tile_id.y
        )
    }

    fn attribution(&self) -> Attribution {
        street_attribution()
    }
}

/// Attribution for the base layer, always shown
pub fn street_attribution() -> Attribution {
    Attribution {
        text: "© OpenStreetMap contributors",
        url: "https://www.openstreetmap.org/copyright",
        logo_light: None,
        logo_dark: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_street_tile_url() {
        let url = StreetTileSource.tile_url(TileId { x: 511, y: 340, zoom: 10 });
        // (511 + 340) % 3 == 2
        assert_eq!(url, "https://c.tile.openstreetmap.org/10/511/340.png");
    }

    #[test]
    fn test_subdomains_rotate() {
        let hosts: Vec<String> = (0..3)
            .map(|x| StreetTileSource.tile_url(TileId { x, y: 0, zoom: 1 }))
            .map(|url| url[8..9].to_string())
            .collect();
        assert_eq!(hosts, vec!["a", "b", "c"]);
    }
}
