//! Map preview of converted waypoints.
//!
//! Rendering is a collaborator of the conversion pipeline, not part of it: the
//! pipeline hands the parsed waypoints to whatever [`MapRenderer`] it was
//! given. [`LeafletMap`] writes a standalone HTML page with one marker per
//! waypoint; [`NoMap`] does nothing.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::converter::to_feature_collection;
use crate::gpx_types::{OutputMode, Waypoint};
use crate::options::DEFAULT_ZOOM;

const LEAFLET_VERSION: &str = "1.9.4";
const TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
const TILE_ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";

pub trait MapRenderer {
    /// Render `waypoints` to `path`.
    ///
    /// Returns the written path, or `None` when there was nothing to draw.
    fn render(&self, waypoints: &[Waypoint], path: &Path) -> io::Result<Option<PathBuf>>;
}

/// Skips map rendering entirely.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoMap;

impl MapRenderer for NoMap {
    fn render(&self, _waypoints: &[Waypoint], _path: &Path) -> io::Result<Option<PathBuf>> {
        Ok(None)
    }
}

/// Interactive Leaflet/OpenStreetMap page.
#[derive(Debug, Clone)]
pub struct LeafletMap {
    pub zoom: u8,
    /// Route mode also draws a line through the points.
    pub mode: OutputMode,
}

impl Default for LeafletMap {
    fn default() -> Self {
        Self {
            zoom: DEFAULT_ZOOM,
            mode: OutputMode::Waypoints,
        }
    }
}

impl MapRenderer for LeafletMap {
    fn render(&self, waypoints: &[Waypoint], path: &Path) -> io::Result<Option<PathBuf>> {
        let Some(html) = self.to_html(waypoints)? else {
            return Ok(None);
        };

        let mut out = BufWriter::new(File::create(path)?);
        out.write_all(html.as_bytes())?;
        out.flush()?;

        tracing::info!(path = %path.display(), markers = waypoints.len(), "wrote map");
        Ok(Some(path.to_path_buf()))
    }
}

impl LeafletMap {
    /// Build the HTML page, centred on the first waypoint.
    pub fn to_html(&self, waypoints: &[Waypoint]) -> io::Result<Option<String>> {
        let Some(first) = waypoints.first() else {
            return Ok(None);
        };

        let fc = to_feature_collection(waypoints, self.mode);
        let data = serde_json::to_string(&fc)?.replace("</", "<\\/");
        let center = serde_json::to_string(&[first.lat, first.lon])?;

        Ok(Some(format!(
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Olex waypoints</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@{version}/dist/leaflet.css">
<script src="https://unpkg.com/leaflet@{version}/dist/leaflet.js"></script>
<style>html, body, #map {{ height: 100%; margin: 0; }}</style>
</head>
<body>
<div id="map"></div>
<script>
const data = {data};
const map = L.map("map").setView({center}, {zoom});
L.tileLayer("{tiles}", {{ maxZoom: 19, attribution: '{attribution}' }}).addTo(map);
L.geoJSON(data, {{
  onEachFeature: function (feature, layer) {{
    if (feature.properties.name) {{
      const popup = document.createElement("div");
      popup.textContent = feature.properties.name;
      layer.bindPopup(popup);
    }}
  }}
}}).addTo(map);
</script>
</body>
</html>
"#,
            version = LEAFLET_VERSION,
            data = data,
            center = center,
            zoom = self.zoom,
            tiles = TILE_URL,
            attribution = TILE_ATTRIBUTION,
        )))
    }
}

/// Location of the map page: `file_name` in the directory of `gpx_path`.
pub fn map_path(gpx_path: &Path, file_name: &str) -> PathBuf {
    gpx_path
        .parent()
        .map(|dir| dir.join(file_name))
        .unwrap_or_else(|| PathBuf::from(file_name))
}
