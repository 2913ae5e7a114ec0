use serde::Deserialize;

use crate::gpx_types::OutputMode;

pub const DEFAULT_CREATOR: &str = "OlexConverter";
pub const DEFAULT_MAP_FILE_NAME: &str = "map.html";
pub const DEFAULT_ZOOM: u8 = 10;

/// Options for Olex to GPX conversion.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertOptions {
    /// Route or waypoint list (default: waypoints)
    #[serde(default)]
    pub mode: OutputMode,

    /// Value of the `creator` attribute on `<gpx>` (default: "OlexConverter")
    #[serde(default = "default_creator")]
    pub creator: String,

    /// Indent the GPX output (default: true)
    #[serde(default = "default_true")]
    pub indent: bool,

    /// Render an HTML map next to the GPX file (default: true)
    #[serde(default = "default_true")]
    pub map: bool,

    /// File name of the rendered map, placed in the GPX output directory (default: "map.html")
    #[serde(default = "default_map_file_name")]
    pub map_file_name: String,

    /// Initial map zoom level (default: 10)
    #[serde(default = "default_zoom")]
    pub zoom: u8,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            mode: OutputMode::default(),
            creator: default_creator(),
            indent: true,
            map: true,
            map_file_name: default_map_file_name(),
            zoom: DEFAULT_ZOOM,
        }
    }
}

impl ConvertOptions {
    pub fn gpx(&self) -> GpxWriteOptions {
        GpxWriteOptions {
            mode: self.mode,
            creator: self.creator.clone(),
            indent: self.indent,
        }
    }
}

/// The subset of [`ConvertOptions`] the GPX writer needs.
#[derive(Debug, Clone)]
pub struct GpxWriteOptions {
    pub mode: OutputMode,
    pub creator: String,
    pub indent: bool,
}

impl Default for GpxWriteOptions {
    fn default() -> Self {
        ConvertOptions::default().gpx()
    }
}

impl GpxWriteOptions {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    pub fn compact(mut self) -> Self {
        self.indent = false;
        self
    }
}

fn default_true() -> bool {
    true
}

fn default_creator() -> String {
    DEFAULT_CREATOR.to_string()
}

fn default_map_file_name() -> String {
    DEFAULT_MAP_FILE_NAME.to_string()
}

fn default_zoom() -> u8 {
    DEFAULT_ZOOM
}
