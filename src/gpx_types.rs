use serde::Deserialize;

/// A single named point extracted from an Olex record.
#[derive(Debug, Clone, PartialEq)]
pub struct Waypoint {
    /// Latitude in decimal degrees (south negative).
    pub lat: f64,
    /// Longitude in decimal degrees (west negative).
    pub lon: f64,
    /// UTC instant as `YYYY-MM-DDTHH:MM:SSZ`.
    pub time: String,
    pub name: String,
}

impl Waypoint {
    pub fn new(lat: f64, lon: f64, time: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            lat,
            lon,
            time: time.into(),
            name: name.into(),
        }
    }
}

/// Shape of the GPX body: one ordered `<rte>` or a flat list of `<wpt>`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    Route,
    #[default]
    #[serde(alias = "list")]
    Waypoints,
}

/// GPX document read back from XML (routes and top-level waypoints only).
#[derive(Debug, Default)]
pub struct GpxData {
    pub version: Option<String>,
    pub creator: Option<String>,
    pub waypoints: Vec<Waypoint>,
    pub routes: Vec<Vec<Waypoint>>,
}

impl GpxData {
    /// Total number of points across all routes and waypoints.
    pub fn point_count(&self) -> usize {
        self.waypoints.len() + self.routes.iter().map(Vec::len).sum::<usize>()
    }
}
