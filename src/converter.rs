use geojson::{Feature, FeatureCollection, Geometry, Value};
use serde_json::{Map, Value as JsonValue};

use crate::gpx_types::{OutputMode, Waypoint};

/// Convert waypoints to a GeoJSON FeatureCollection.
///
/// Every waypoint becomes a `Point` feature. In route mode a `LineString`
/// joining the points in order is appended when there are at least two.
pub fn to_feature_collection(waypoints: &[Waypoint], mode: OutputMode) -> FeatureCollection {
    let mut features: Vec<Feature> = waypoints.iter().map(waypoint_to_feature).collect();

    if mode == OutputMode::Route && waypoints.len() >= 2 {
        features.push(route_to_feature(waypoints));
    }

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

fn waypoint_to_feature(wpt: &Waypoint) -> Feature {
    let geometry = Geometry::new(Value::Point(point_coords(wpt)));

    let mut props = Map::new();
    props.insert(
        "gpxType".to_string(),
        JsonValue::String("waypoint".to_string()),
    );
    props.insert("name".to_string(), JsonValue::String(wpt.name.clone()));
    props.insert("time".to_string(), JsonValue::String(wpt.time.clone()));

    Feature {
        bbox: None,
        geometry: Some(geometry),
        id: None,
        properties: Some(props),
        foreign_members: None,
    }
}

fn route_to_feature(waypoints: &[Waypoint]) -> Feature {
    let coords: Vec<Vec<f64>> = waypoints.iter().map(point_coords).collect();
    let geometry = Geometry::new(Value::LineString(coords));

    let mut props = Map::new();
    props.insert(
        "gpxType".to_string(),
        JsonValue::String("route".to_string()),
    );

    let times: Vec<JsonValue> = waypoints
        .iter()
        .map(|wpt| JsonValue::String(wpt.time.clone()))
        .collect();
    let mut coord_props = Map::new();
    coord_props.insert("times".to_string(), JsonValue::Array(times));
    props.insert(
        "coordinateProperties".to_string(),
        JsonValue::Object(coord_props),
    );

    Feature {
        bbox: None,
        geometry: Some(geometry),
        id: None,
        properties: Some(props),
        foreign_members: None,
    }
}

/// Build [lon, lat] coordinate array.
fn point_coords(wpt: &Waypoint) -> Vec<f64> {
    vec![wpt.lon, wpt.lat]
}
