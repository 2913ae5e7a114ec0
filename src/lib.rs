//! Olex route/waypoint logs to GPX.
//!
//! Olex plotters export routes and marks as gzip-compressed text, one record
//! per line: latitude and longitude in signed minutes, a Unix timestamp and a
//! name. This crate turns those records into a GPX 1.1 document, either as a
//! single ordered `<rte>` or as a list of `<wpt>`, and can render the points
//! on a Leaflet map.
//!
//! ```rust,no_run
//! use olex2gpx::{ConvertOptions, LeafletMap, OutputMode, convert_file};
//! use std::path::Path;
//!
//! let opts = ConvertOptions { mode: OutputMode::Route, ..Default::default() };
//! let map = LeafletMap { zoom: opts.zoom, mode: opts.mode };
//! let summary = convert_file(Path::new("Ruter.gz"), Path::new("Ruter.gpx"), &opts, &map).unwrap();
//! println!("{summary}");
//! ```

pub mod converter;
pub mod error;
pub mod gpx_types;
pub mod map;
pub mod options;
pub mod parser;
pub mod pipeline;
pub mod record;
pub mod source;
pub mod writer;

use wasm_bindgen::prelude::*;

pub use crate::error::{ConvertError, RecordError};
pub use crate::gpx_types::{GpxData, OutputMode, Waypoint};
pub use crate::map::{LeafletMap, MapRenderer, NoMap};
pub use crate::options::{ConvertOptions, GpxWriteOptions};
pub use crate::pipeline::{ConversionSummary, convert_bytes, convert_file};
pub use crate::record::{parse_records, parse_records_with_report};
pub use crate::writer::{to_gpx_string, write_gpx};

/// Convert a gzip Olex file (as bytes) to a GPX string.
#[wasm_bindgen(js_name = olexToGpx)]
pub fn olex_to_gpx(data: &[u8], options: JsValue) -> Result<String, JsValue> {
    console_error_panic_hook::set_once();

    let opts = parse_options(options)?;
    Ok(pipeline::convert_bytes(data, &opts)?)
}

/// Convert a gzip Olex file (as bytes) to GeoJSON, returned as a JS object.
#[wasm_bindgen(js_name = olexToGeoJson)]
pub fn olex_to_geojson(data: &[u8], options: JsValue) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();

    let opts = parse_options(options)?;
    let waypoints = pipeline::waypoints_from_bytes(data)?;
    let fc = converter::to_feature_collection(&waypoints, opts.mode);
    serde_wasm_bindgen::to_value(&fc).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Convert a gzip Olex file (as bytes) to GeoJSON, returned as a JSON string.
#[wasm_bindgen(js_name = olexToGeoJsonString)]
pub fn olex_to_geojson_string(data: &[u8], options: JsValue) -> Result<String, JsValue> {
    console_error_panic_hook::set_once();

    let opts = parse_options(options)?;
    let waypoints = pipeline::waypoints_from_bytes(data)?;
    let fc = converter::to_feature_collection(&waypoints, opts.mode);
    serde_json::to_string(&fc).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn parse_options(options: JsValue) -> Result<ConvertOptions, JsValue> {
    if options.is_undefined() || options.is_null() {
        Ok(ConvertOptions::default())
    } else {
        serde_wasm_bindgen::from_value(options).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}
